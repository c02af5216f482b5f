pub mod color;
pub mod event_handler;
pub mod events;
pub mod keybinds;
pub mod raw;
pub mod render;

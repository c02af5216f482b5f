// slate Configuration
// Edit this file to customize your editor, then rebuild.

use crate::config::Config;

/// User configuration function
pub fn configure(config: &mut Config) {
    // Settings
    config.set("line-numbers", true);

    // Movement
    config.bind("^F", "forward-character");
    config.bind("^B", "backward-character");
    config.bind("^N", "next-line");
    config.bind("^P", "previous-line");
    config.bind("^A", "beginning-of-line");
    config.bind("^E", "end-of-line");

    // Arrow keys
    config.bind("Right", "forward-character");
    config.bind("Left", "backward-character");
    config.bind("Down", "next-line");
    config.bind("Up", "previous-line");
    config.bind("Home", "beginning-of-line");
    config.bind("End", "end-of-line");
    config.bind("PageDown", "page-down");
    config.bind("PageUp", "page-up");
    config.bind("^V", "page-down");

    // Word, paragraph and file movement
    config.bind("M-f", "forward-word");
    config.bind("Esc f", "forward-word"); // ESC then f
    config.bind("M-b", "backward-word");
    config.bind("Esc b", "backward-word");
    config.bind("M-}", "forward-paragraph");
    config.bind("Esc }", "forward-paragraph");
    config.bind("M-{", "backward-paragraph");
    config.bind("Esc {", "backward-paragraph");
    config.bind("M-<", "beginning-of-file");
    config.bind("Esc <", "beginning-of-file");
    config.bind("M->", "end-of-file");
    config.bind("Esc >", "end-of-file");
    config.bind("M-v", "page-up");
    config.bind("Esc v", "page-up");

    // Editing
    config.bind("^D", "delete-next-character");
    config.bind("Delete", "delete-next-character");
    config.bind("^H", "delete-previous-character");
    config.bind("Backspace", "delete-previous-character");
    config.bind("M-d", "kill-word");
    config.bind("Esc d", "kill-word");
    config.bind("M-Backspace", "backward-kill-word");
    config.bind("Esc Backspace", "backward-kill-word");
    config.bind("^K", "kill-line");
    config.bind("Enter", "insert-newline");
    config.bind("Tab", "insert-tab");

    // Region
    config.bind("^@", "set-mark");
    config.bind("^ ", "set-mark");
    config.bind("^W", "kill-region");

    // Search
    config.bind("^S", "search-forward");
    config.bind("^R", "search-backward");
    config.bind("M-%", "replace-all");
    config.bind("Esc %", "replace-all");

    // Files
    config.bind("^X^S", "save-buffer");
    config.bind("^X^W", "write-file");

    // Display & exit
    config.bind("^L", "redraw-display");
    config.bind("^X^C", "exit");
    config.bind("^Q", "exit");
}

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::core::command::Command;

/// Native key representation for slate
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Ctrl(char),
    Alt(char),
    F(u8),
    Esc,
    Enter,
    Backspace,
    Tab,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c),
            Key::Ctrl(c) => write!(f, "C-{}", c),
            Key::Alt(c) => write!(f, "M-{}", c),
            Key::F(n) => write!(f, "F{}", n),
            Key::Esc => write!(f, "ESC"),
            Key::Enter => write!(f, "RET"),
            Key::Backspace => write!(f, "BS"),
            Key::Tab => write!(f, "TAB"),
            Key::Delete => write!(f, "DEL"),
            Key::Home => write!(f, "Home"),
            Key::End => write!(f, "End"),
            Key::PageUp => write!(f, "PgUp"),
            Key::PageDown => write!(f, "PgDn"),
            Key::Up => write!(f, "Up"),
            Key::Down => write!(f, "Down"),
            Key::Left => write!(f, "Left"),
            Key::Right => write!(f, "Right"),
        }
    }
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let first = chars.next();
        let second = chars.next();
        let single = chars.next().is_none();

        // ^X
        if let (Some('^'), Some(c), true) = (first, second, single) {
            return Ok(Key::Ctrl(c.to_ascii_lowercase()));
        }

        // C-x, M-x
        if let Some(c) = s.strip_prefix("C-").and_then(single_char) {
            return Ok(Key::Ctrl(c.to_ascii_lowercase()));
        }
        if let Some(c) = s.strip_prefix("M-").and_then(single_char) {
            return Ok(Key::Alt(c.to_ascii_lowercase()));
        }

        match s.to_ascii_uppercase().as_str() {
            "ENTER" | "RET" => Ok(Key::Enter),
            "TAB" => Ok(Key::Tab),
            "BACKSPACE" | "BS" => Ok(Key::Backspace),
            "ESC" => Ok(Key::Esc),
            "DELETE" | "DEL" => Ok(Key::Delete),
            "HOME" => Ok(Key::Home),
            "END" => Ok(Key::End),
            "PAGEUP" | "PGUP" => Ok(Key::PageUp),
            "PAGEDOWN" | "PGDN" => Ok(Key::PageDown),
            "UP" => Ok(Key::Up),
            "DOWN" => Ok(Key::Down),
            "LEFT" => Ok(Key::Left),
            "RIGHT" => Ok(Key::Right),
            _ => {
                // F1-F24
                if let Some(n) = s.strip_prefix('F').and_then(|n| n.parse::<u8>().ok()) {
                    if (1..=24).contains(&n) {
                        return Ok(Key::F(n));
                    }
                }

                // Raw character, case preserved
                if let (Some(c), None) = (first, second) {
                    return Ok(Key::Char(c));
                }

                Err(format!("Unknown key: {}", s))
            }
        }
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Native input event representation for slate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    pub key: Key,
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
}

impl InputEvent {
    /// An event whose modifier flags follow from the key itself
    pub fn new(key: Key) -> Self {
        let ctrl = matches!(key, Key::Ctrl(_));
        let alt = matches!(key, Key::Alt(_));
        Self {
            key,
            shift: false,
            alt,
            ctrl,
        }
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(Key::Ctrl(c))
    }

    pub fn alt(c: char) -> Self {
        Self::new(Key::Alt(c))
    }
}

/// Result of a key lookup in the trie
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    /// Found a complete command binding
    Command(Command),
    /// Found a prefix, more keys needed
    Prefix,
    /// No matching binding found (dead end)
    DeadEnd,
    /// Key should be inserted as a character
    InsertChar(char),
}

/// A node in the key binding trie
#[derive(Debug, Clone)]
struct TrieNode {
    command: Option<Command>,
    children: HashMap<KeyInput, TrieNode>,
}

impl TrieNode {
    fn new() -> Self {
        Self {
            command: None,
            children: HashMap::new(),
        }
    }
}

/// Normalized key input for trie lookups
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub key: Key,
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl KeyInput {
    pub fn from_event(event: &InputEvent) -> Self {
        // Caps lock must not change which binding fires
        let key = match &event.key {
            Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
            Key::Alt(c) => Key::Alt(c.to_ascii_lowercase()),
            Key::Ctrl(c) => Key::Ctrl(c.to_ascii_lowercase()),
            other => other.clone(),
        };
        Self {
            key,
            shift: event.shift,
            ctrl: event.ctrl,
            alt: event.alt,
        }
    }

    /// Parse one key of a binding, like "^X", "M-f", "S-Right" or "a"
    pub fn parse(s: &str) -> Option<Self> {
        let (shift, key_str) = match s.strip_prefix("S-") {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        if let Ok(key) = Key::from_str(key_str) {
            let ctrl = matches!(key, Key::Ctrl(_));
            let alt = matches!(key, Key::Alt(_));
            return Some(Self {
                key,
                shift,
                ctrl,
                alt,
            });
        }

        // Meta with a named key, like "M-Backspace"
        let key = Key::from_str(key_str.strip_prefix("M-")?).ok()?;
        if matches!(key, Key::Char(_) | Key::Ctrl(_) | Key::Alt(_)) {
            return None;
        }
        Some(Self {
            key,
            shift,
            ctrl: false,
            alt: true,
        })
    }
}

impl fmt::Display for KeyInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.shift {
            write!(f, "S-")?;
        }
        write!(f, "{}", self.key)
    }
}

/// Trie structure for multi-key binding lookups
pub struct KeyTrie {
    root: TrieNode,
    /// Keys pressed so far in the pending sequence
    current: Vec<KeyInput>,
}

impl KeyTrie {
    pub fn new() -> Self {
        Self {
            root: TrieNode::new(),
            current: Vec::new(),
        }
    }

    /// Insert a binding sequence into the trie.
    /// Returns false if any key in the sequence fails to parse.
    pub fn insert(&mut self, sequence: &[&str], command: Command) -> bool {
        let keys: Option<Vec<KeyInput>> = sequence.iter().map(|s| KeyInput::parse(s)).collect();
        let Some(keys) = keys else {
            return false;
        };
        if keys.is_empty() {
            return false;
        }

        let mut node = &mut self.root;
        for key in keys {
            node = node.children.entry(key).or_insert_with(TrieNode::new);
        }
        node.command = Some(command);
        true
    }

    /// Feed one key event and report what the pending sequence resolves to
    pub fn process_key(&mut self, input_event: &InputEvent) -> LookupResult {
        self.current.push(KeyInput::from_event(input_event));

        let mut node = Some(&self.root);
        for k in &self.current {
            node = node.and_then(|n| n.children.get(k));
        }

        if let Some(node) = node {
            if let Some(command) = node.command {
                self.current.clear();
                return LookupResult::Command(command);
            }
            if !node.children.is_empty() {
                return LookupResult::Prefix;
            }
        }

        // Plain characters outside a sequence insert themselves, with the
        // original case
        let fresh = self.current.len() == 1;
        self.current.clear();
        if let Key::Char(c) = &input_event.key {
            if fresh && !input_event.ctrl && !input_event.alt {
                return LookupResult::InsertChar(*c);
            }
        }
        LookupResult::DeadEnd
    }

    /// Whether a multi-key sequence is in progress
    pub fn is_pending(&self) -> bool {
        !self.current.is_empty()
    }

    /// The pending key sequence as a display string, e.g. "C-x -"
    pub fn current_sequence(&self) -> String {
        if self.current.is_empty() {
            return String::new();
        }
        self.current
            .iter()
            .map(|k| k.to_string())
            .collect::<Vec<_>>()
            .join(" ")
            + " -"
    }
}

impl Default for KeyTrie {
    fn default() -> Self {
        Self::new()
    }
}

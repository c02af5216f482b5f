use crate::core::command::Command;
use crate::core::error::{EditorError, Result};
use crate::core::input::{InputEvent, KeyTrie, LookupResult};

/// Multi-character key names accepted in binding strings
const KEY_NAMES: &[&str] = &[
    "PageUp",
    "PageDown",
    "Backspace",
    "Delete",
    "Enter",
    "Home",
    "End",
    "Tab",
    "Up",
    "Down",
    "Left",
    "Right",
    "Esc",
];

/// KeyBindingManager handles conversion of key events to commands
/// Uses a KeyTrie for efficient multi-key sequence matching
pub struct KeyBindingManager {
    trie: KeyTrie,
}

impl KeyBindingManager {
    pub fn new() -> Self {
        Self {
            trie: KeyTrie::new(),
        }
    }

    /// Add a key binding from a sequence string like "^X^S" or "Esc f"
    pub fn bind(&mut self, sequence: &str, command: &str) -> Result<()> {
        let command: Command = command.parse()?;
        let keys = parse_sequence(sequence);
        let key_refs: Vec<&str> = keys.iter().map(|s| s.as_str()).collect();
        if !self.trie.insert(&key_refs, command) {
            return Err(EditorError::Cli(format!(
                "Invalid key sequence for {}: {}",
                command, sequence
            )));
        }
        Ok(())
    }

    /// Process a key event and return what the pending sequence resolved to
    pub fn process_key(&mut self, input_event: &InputEvent) -> LookupResult {
        self.trie.process_key(input_event)
    }

    pub fn is_pending(&self) -> bool {
        self.trie.is_pending()
    }

    /// Get the current partial key sequence for display
    pub fn current_sequence(&self) -> String {
        self.trie.current_sequence()
    }
}

impl Default for KeyBindingManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a sequence string like "^X^S" into one string per key.
///
/// Keys may be run together or separated by whitespace. "ESC-x" expands
/// to two keys because terminals deliver it as ESC followed by x.
fn parse_sequence(sequence: &str) -> Vec<String> {
    let chars: Vec<char> = sequence.chars().collect();
    let mut keys = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let rest = &chars[i..];
        if rest[0] == '^' {
            // Control key: ^ + char
            if let Some(c) = rest.get(1) {
                keys.push(format!("^{}", c));
            }
            i += 2;
        } else if rest[0].is_whitespace() {
            i += 1;
        } else if starts_with_ignore_case(rest, "ESC-") {
            if let Some(c) = rest.get(4) {
                keys.push("Esc".to_string());
                keys.push(c.to_ascii_lowercase().to_string());
            }
            i += 5;
        } else if let Some(prefix) = modifier_prefix(rest) {
            // Modifier + char or named key
            match key_token(&rest[2..]) {
                Some((key, len)) => {
                    keys.push(format!("{}{}", prefix, key));
                    i += 2 + len;
                }
                None => i += 2,
            }
        } else if let Some((key, len)) = key_token(rest) {
            keys.push(key);
            i += len;
        }
    }

    keys
}

fn modifier_prefix(chars: &[char]) -> Option<&'static str> {
    match chars {
        ['M', '-', _, ..] => Some("M-"),
        ['S', '-', _, ..] => Some("S-"),
        ['C', '-', _, ..] => Some("C-"),
        _ => None,
    }
}

/// The key at the front of `chars` and how many chars it spans
fn key_token(chars: &[char]) -> Option<(String, usize)> {
    for name in KEY_NAMES {
        let len = name.chars().count();
        if chars.len() >= len && chars[..len].iter().copied().eq(name.chars()) {
            return Some((name.to_string(), len));
        }
    }

    // F1-F24
    if chars.first() == Some(&'F') {
        let digits = chars[1..]
            .iter()
            .take(2)
            .take_while(|c| c.is_ascii_digit())
            .count();
        if digits > 0 {
            let token: String = chars[..=digits].iter().collect();
            return Some((token, digits + 1));
        }
    }

    chars.first().map(|c| (c.to_string(), 1))
}

fn starts_with_ignore_case(chars: &[char], prefix: &str) -> bool {
    let len = prefix.chars().count();
    chars.len() >= len
        && chars[..len]
            .iter()
            .zip(prefix.chars())
            .all(|(a, b)| a.eq_ignore_ascii_case(&b))
}

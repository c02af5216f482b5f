//! Syntax Definitions
//!
//! A `SyntaxDefinition` is the immutable rule set the tokenizer runs against:
//! which bytes form identifiers, the keyword classes, the line-comment marker,
//! and the delimiter pairs (strings and block comments) that can span lines.
//! Definitions are built once per language and looked up through the
//! `LanguageRegistry`.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::core::lexer::TokenClass;

// =============================================================================
// DELIMITER PAIRS
// =============================================================================

/// What a delimiter pair encloses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairKind {
    String,
    BlockComment,
}

impl PairKind {
    pub fn token_class(self) -> TokenClass {
        match self {
            PairKind::String => TokenClass::String,
            PairKind::BlockComment => TokenClass::BlockComment,
        }
    }
}

/// An opening/closing marker pair such as `/*` `*/` or `"` `"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimiterPair {
    pub open: Vec<u8>,
    pub close: Vec<u8>,
    pub kind: PairKind,
}

/// A keyword class: every word in `words` is classified as `class`
#[derive(Debug, Clone)]
pub struct WordClass {
    pub class: TokenClass,
    pub words: HashSet<Vec<u8>>,
}

// =============================================================================
// SYNTAX DEFINITION
// =============================================================================

/// Language rules for the tokenizer
#[derive(Debug, Clone)]
pub struct SyntaxDefinition {
    pub name: String,
    pub extensions: Vec<String>,
    /// Bytes treated as identifier characters on top of ASCII alnum and `_`
    pub identifier_extras: Vec<u8>,
    pub line_comment: Option<Vec<u8>>,
    /// Checked in order; the first class containing a word wins
    pub word_classes: Vec<WordClass>,
    /// Checked in order; the first opener matching at an offset wins
    pub pairs: Vec<DelimiterPair>,
}

impl SyntaxDefinition {
    /// An empty definition: every byte run is `normal`
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            extensions: Vec::new(),
            identifier_extras: Vec::new(),
            line_comment: None,
            word_classes: Vec::new(),
            pairs: Vec::new(),
        }
    }

    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions
            .extend(extensions.iter().map(|e| e.to_string()));
        self
    }

    pub fn with_identifier_bytes(mut self, extras: &[u8]) -> Self {
        self.identifier_extras.extend_from_slice(extras);
        self
    }

    pub fn with_line_comment(mut self, marker: &str) -> Self {
        self.line_comment = Some(marker.as_bytes().to_vec());
        self
    }

    /// Append a keyword class. Classes added earlier take priority.
    pub fn with_words(mut self, class: TokenClass, words: &[&str]) -> Self {
        self.word_classes.push(WordClass {
            class,
            words: words.iter().map(|w| w.as_bytes().to_vec()).collect(),
        });
        self
    }

    /// Append a delimiter pair. Pairs added earlier take priority.
    pub fn with_pair(mut self, open: &str, close: &str, kind: PairKind) -> Self {
        assert!(!open.is_empty() && !close.is_empty(), "empty delimiter marker");
        self.pairs.push(DelimiterPair {
            open: open.as_bytes().to_vec(),
            close: close.as_bytes().to_vec(),
            kind,
        });
        self
    }

    /// Identifier-class byte test used by the tokenizer and word motions
    pub fn is_identifier(&self, byte: u8) -> bool {
        byte.is_ascii_alphanumeric() || byte == b'_' || self.identifier_extras.contains(&byte)
    }

    /// Class of an identifier run, `Normal` if no keyword class lists it
    pub fn classify(&self, word: &[u8]) -> TokenClass {
        self.word_classes
            .iter()
            .find(|wc| wc.words.contains(word))
            .map(|wc| wc.class)
            .unwrap_or(TokenClass::Normal)
    }

    pub fn pair(&self, index: usize) -> Option<&DelimiterPair> {
        self.pairs.get(index)
    }

    // =========================================================================
    // BUILT-IN LANGUAGES
    // =========================================================================

    pub fn plain() -> Self {
        Self::new("plain").with_extensions(&["txt", "log"])
    }

    pub fn c() -> Self {
        Self::new("c")
            .with_extensions(&["c", "h"])
            .with_identifier_bytes(b"#")
            .with_line_comment("//")
            .with_words(
                TokenClass::Keyword,
                &[
                    "auto", "break", "case", "const", "continue", "default", "do", "else",
                    "enum", "extern", "for", "goto", "if", "inline", "register", "restrict",
                    "return", "sizeof", "static", "struct", "switch", "typedef", "union",
                    "volatile", "while",
                ],
            )
            .with_words(
                TokenClass::Type,
                &[
                    "void", "char", "short", "int", "long", "float", "double", "signed",
                    "unsigned", "bool", "size_t", "ssize_t", "ptrdiff_t", "intptr_t",
                    "uintptr_t", "int8_t", "int16_t", "int32_t", "int64_t", "uint8_t",
                    "uint16_t", "uint32_t", "uint64_t", "FILE",
                ],
            )
            .with_words(
                TokenClass::Macro,
                &[
                    "#include", "#define", "#undef", "#if", "#ifdef", "#ifndef", "#elif",
                    "#else", "#endif", "#pragma", "#error", "NULL", "true", "false",
                ],
            )
            .with_pair("/*", "*/", PairKind::BlockComment)
            .with_pair("\"", "\"", PairKind::String)
            .with_pair("'", "'", PairKind::String)
    }

    pub fn rust() -> Self {
        Self::new("rust")
            .with_extensions(&["rs"])
            .with_line_comment("//")
            .with_words(
                TokenClass::Keyword,
                &[
                    "as", "async", "await", "break", "const", "continue", "crate", "dyn",
                    "else", "enum", "extern", "false", "fn", "for", "if", "impl", "in", "let",
                    "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "self",
                    "Self", "static", "struct", "super", "trait", "true", "type", "unsafe",
                    "use", "where", "while",
                ],
            )
            .with_words(
                TokenClass::Type,
                &[
                    "bool", "char", "str", "String", "i8", "i16", "i32", "i64", "i128", "u8",
                    "u16", "u32", "u64", "u128", "isize", "usize", "f32", "f64", "Vec",
                    "Option", "Result", "Box", "Rc", "Arc", "Cell", "RefCell",
                ],
            )
            .with_words(
                TokenClass::Macro,
                &[
                    "println", "eprintln", "format", "write", "writeln", "vec", "assert",
                    "assert_eq", "assert_ne", "panic", "matches", "todo", "unreachable",
                ],
            )
            .with_pair("/*", "*/", PairKind::BlockComment)
            .with_pair("\"", "\"", PairKind::String)
    }

    pub fn python() -> Self {
        Self::new("python")
            .with_extensions(&["py", "pyw"])
            .with_line_comment("#")
            .with_words(
                TokenClass::Keyword,
                &[
                    "False", "None", "True", "and", "as", "assert", "async", "await", "break",
                    "class", "continue", "def", "del", "elif", "else", "except", "finally",
                    "for", "from", "global", "if", "import", "in", "is", "lambda", "nonlocal",
                    "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
                ],
            )
            .with_words(
                TokenClass::Type,
                &[
                    "int", "float", "str", "bool", "list", "dict", "tuple", "set", "bytes",
                    "object",
                ],
            )
            .with_pair("\"\"\"", "\"\"\"", PairKind::String)
            .with_pair("'''", "'''", PairKind::String)
            .with_pair("\"", "\"", PairKind::String)
            .with_pair("'", "'", PairKind::String)
    }

    pub fn shell() -> Self {
        Self::new("shell")
            .with_extensions(&["sh", "bash"])
            .with_line_comment("#")
            .with_words(
                TokenClass::Keyword,
                &[
                    "if", "then", "else", "elif", "fi", "for", "while", "until", "do", "done",
                    "case", "esac", "in", "function", "return", "local", "export",
                ],
            )
            .with_pair("\"", "\"", PairKind::String)
            .with_pair("'", "'", PairKind::String)
    }
}

// =============================================================================
// LANGUAGE REGISTRY
// =============================================================================

/// Registry mapping file extensions and names to syntax definitions
pub struct LanguageRegistry {
    /// Extension -> language name
    extension_map: HashMap<String, String>,
    /// Language name -> definition
    definitions: HashMap<String, SyntaxDefinition>,
    plain: SyntaxDefinition,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            extension_map: HashMap::new(),
            definitions: HashMap::new(),
            plain: SyntaxDefinition::plain(),
        };

        registry.register(SyntaxDefinition::c());
        registry.register(SyntaxDefinition::rust());
        registry.register(SyntaxDefinition::python());
        registry.register(SyntaxDefinition::shell());
        registry.register(SyntaxDefinition::plain());

        registry
    }

    pub fn register(&mut self, definition: SyntaxDefinition) {
        for ext in &definition.extensions {
            self.extension_map
                .insert(ext.clone(), definition.name.clone());
        }
        self.definitions
            .insert(definition.name.clone(), definition);
    }

    pub fn by_name(&self, name: &str) -> Option<&SyntaxDefinition> {
        self.definitions.get(name)
    }

    /// Definition for a file extension, falling back to plain text
    pub fn by_extension(&self, extension: &str) -> &SyntaxDefinition {
        self.extension_map
            .get(extension)
            .and_then(|name| self.definitions.get(name))
            .unwrap_or(&self.plain)
    }

    /// Definition for a path, falling back to plain text
    pub fn for_path(&self, path: &Path) -> &SyntaxDefinition {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self.by_extension(ext),
            None => &self.plain,
        }
    }

    pub fn plain(&self) -> &SyntaxDefinition {
        &self.plain
    }

    /// Registered language names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.definitions.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_bytes() {
        let c = SyntaxDefinition::c();
        assert!(c.is_identifier(b'a'));
        assert!(c.is_identifier(b'_'));
        assert!(c.is_identifier(b'9'));
        assert!(c.is_identifier(b'#'));
        assert!(!c.is_identifier(b' '));

        let plain = SyntaxDefinition::plain();
        assert!(!plain.is_identifier(b'#'));
    }

    #[test]
    fn test_classify_uses_declared_order() {
        let def = SyntaxDefinition::new("t")
            .with_words(TokenClass::Type, &["int"])
            .with_words(TokenClass::Keyword, &["int", "if"]);
        assert_eq!(def.classify(b"int"), TokenClass::Type);
        assert_eq!(def.classify(b"if"), TokenClass::Keyword);
        assert_eq!(def.classify(b"main"), TokenClass::Normal);
    }

    #[test]
    fn test_c_macros_include_hash() {
        let c = SyntaxDefinition::c();
        assert_eq!(c.classify(b"#include"), TokenClass::Macro);
        assert_eq!(c.classify(b"return"), TokenClass::Keyword);
        assert_eq!(c.classify(b"size_t"), TokenClass::Type);
    }

    #[test]
    fn test_registry_lookup() {
        let registry = LanguageRegistry::new();
        assert_eq!(registry.by_extension("rs").name, "rust");
        assert_eq!(registry.by_extension("h").name, "c");
        assert_eq!(registry.by_extension("unknown").name, "plain");
        assert_eq!(registry.for_path(Path::new("src/main.py")).name, "python");
        assert_eq!(registry.for_path(Path::new("Makefile")).name, "plain");
        assert!(registry.by_name("shell").is_some());
        assert!(registry.by_name("cobol").is_none());
        assert!(registry.names().contains(&"c"));
    }

    #[test]
    fn test_pair_kind_classes() {
        assert_eq!(PairKind::String.token_class(), TokenClass::String);
        assert_eq!(
            PairKind::BlockComment.token_class(),
            TokenClass::BlockComment
        );
    }
}

//! Identifier validation and name derivation.

/// Name used when nothing better can be derived.
pub const DEFAULT_NAME: &str = "extracted";

const MIN_DERIVED_LEN: usize = 2;
const MAX_DERIVED_LEN: usize = 20;

const RESERVED_WORDS: &[&str] = &[
    "abstract", "arguments", "await", "boolean", "break", "byte", "case", "catch", "char",
    "class", "const", "continue", "debugger", "default", "delete", "do", "double", "else",
    "enum", "eval", "export", "extends", "false", "final", "finally", "float", "for",
    "function", "goto", "if", "implements", "import", "in", "instanceof", "int", "interface",
    "let", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "typeof", "undefined", "var", "void", "volatile", "while",
    "with", "yield",
];

pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// ASCII-only identifier check: `[A-Za-z_$][A-Za-z0-9_$]*`, not reserved.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        && !is_reserved_word(name)
}

/// Derive a camel-cased identifier from a string literal's content.
///
/// `"Hello world!"` becomes `helloWorld`. Returns `None` when the result would
/// be reserved, invalid, or outside 2–20 characters.
pub fn name_from_literal(content: &str) -> Option<String> {
    let words: Vec<&str> = content
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect();

    let mut name = String::new();
    for (i, word) in words.iter().enumerate() {
        let mut chars = word.chars();
        let Some(first) = chars.next() else {
            continue;
        };
        if i == 0 {
            name.push(first.to_ascii_lowercase());
            name.push_str(&chars.as_str().to_ascii_lowercase());
        } else {
            name.push(first.to_ascii_uppercase());
            name.push_str(&chars.as_str().to_ascii_lowercase());
        }
    }

    let length_ok = (MIN_DERIVED_LEN..=MAX_DERIVED_LEN).contains(&name.len());
    (length_ok && is_valid_identifier(&name)).then_some(name)
}

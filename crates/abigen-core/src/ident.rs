//! Identifier sanitizing for names taken from ABI descriptions.
//!
//! ABI names are arbitrary: snake_case, leading underscores, or empty.
//! [`to_identifier`] is the canonical form stored in the struct registry;
//! the Rust emitter derives its own casing from that form.

use crate::ir::TupleElem;

/// Rust keywords that cannot be used as bare identifiers.
const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
    "pub", "ref", "return", "static", "struct", "trait", "true", "type", "unsafe", "use",
    "where", "while", "abstract", "become", "box", "do", "final", "gen", "macro", "override",
    "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Keywords that are not allowed even as raw identifiers.
const NON_RAW_KEYWORDS: &[&str] = &["self", "Self", "super", "crate", "_"];

/// Maps a raw ABI name to its canonical identifier.
///
/// Leading and trailing underscores are stripped. A name without inner
/// underscores is returned as is; otherwise every segment after the first
/// is capitalized and the segments are joined (`token_id` -> `tokenId`).
pub fn to_identifier(raw: &str) -> String {
    let trimmed = raw.trim_matches('_');
    if !trimmed.contains('_') {
        return trimmed.to_string();
    }

    trimmed
        .split('_')
        .enumerate()
        .map(|(i, segment)| if i == 0 { segment.to_string() } else { capitalize(segment) })
        .collect()
}

/// Uppercases the first character.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Public type name for a declared struct or contract name.
pub fn type_name(raw: &str) -> String {
    capitalize(&to_identifier(raw))
}

/// Module name for a contract, e.g. `ERC20Token` -> `erc20_token`.
pub fn module_name(raw: &str) -> String {
    to_snake_case(&type_name(raw))
}

/// Replaces every character that cannot appear in an identifier with `_`.
///
/// Contract names come from file stems, which may hold `-`, `.` or spaces.
pub fn sanitize_name(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Whether `s` is a plain ASCII Rust identifier.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Whether `s` is a Rust keyword, strict or reserved.
pub fn is_keyword(s: &str) -> bool {
    RUST_KEYWORDS.contains(&s) || NON_RAW_KEYWORDS.contains(&s)
}

/// Canonical field name with a positional fallback for empty names.
pub fn field_name(raw: &str, index: usize) -> String {
    let ident = to_identifier(raw);
    if ident.is_empty() {
        format!("arg{}", index)
    } else {
        ident
    }
}

/// Canonical names for a list of elements.
///
/// Empty names fall back to `argN`. Uniqueness is judged on the Rust
/// identifier each name becomes (`tokenURI` and `tokenUri` are both
/// `token_uri`): a taken one gets its index appended, then underscores
/// until it is free.
pub fn field_names(elems: &[TupleElem]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(elems.len());
    let mut idents: Vec<String> = Vec::with_capacity(elems.len());
    for (i, elem) in elems.iter().enumerate() {
        let mut name = field_name(&elem.name, i);
        if idents.contains(&rust_ident(&name)) {
            name = format!("{}{}", name, i);
        }
        while idents.contains(&rust_ident(&name)) {
            name.push('_');
        }
        idents.push(rust_ident(&name));
        names.push(name);
    }
    names
}

/// Converts a camelCase or PascalCase name to snake_case.
///
/// Acronyms stay together: `tokenURI` -> `token_uri`, `URIValue` -> `uri_value`.
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = if i > 0 { chars.get(i - 1) } else { None };
            let next = chars.get(i + 1);
            let after_lower = prev.map_or(false, |p| p.is_lowercase() || p.is_ascii_digit());
            let acronym_end = prev.map_or(false, |p| p.is_uppercase())
                && next.map_or(false, |n| n.is_lowercase());
            if (after_lower || acronym_end) && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Makes a name usable as a Rust identifier.
pub fn escape_keyword(name: &str) -> String {
    if NON_RAW_KEYWORDS.contains(&name) {
        format!("{}_", name)
    } else if RUST_KEYWORDS.contains(&name) {
        format!("r#{}", name)
    } else {
        name.to_string()
    }
}

/// Rust identifier for a field, parameter or method derived from a canonical name.
pub fn rust_ident(canonical: &str) -> String {
    escape_keyword(&to_snake_case(canonical))
}

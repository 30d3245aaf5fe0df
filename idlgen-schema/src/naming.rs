//! Identifier conversion helpers shared by the generators.

/// Converts a string to snake_case.
///
/// Runs of capitals are treated as one word, so `MDEntryPx` becomes
/// `md_entry_px`.
#[must_use]
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == '.' || c == ' ' {
            if !result.ends_with('_') {
                result.push('_');
            }
            continue;
        }
        if c.is_uppercase() && i > 0 && !result.ends_with('_') {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || ((prev.is_uppercase() || prev.is_ascii_digit()) && next_is_lower) {
                result.push('_');
            }
        }
        result.push(c.to_ascii_lowercase());
    }
    result
}

/// Converts a string to PascalCase.
#[must_use]
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for c in s.chars() {
        if c == '_' || c == '-' || c == '.' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// Converts a string to UPPER_SNAKE_CASE.
#[must_use]
pub fn to_upper_snake_case(s: &str) -> String {
    to_snake_case(s).to_ascii_uppercase()
}

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
    "true", "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do",
    "final", "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Returns true if `s` is a Rust keyword.
#[must_use]
pub fn is_rust_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}

/// Escapes a keyword as a raw identifier.
///
/// `self`, `Self`, `super` and `crate` cannot be raw identifiers and get a
/// trailing underscore instead.
#[must_use]
pub fn rust_ident(s: &str) -> String {
    match s {
        "self" | "Self" | "super" | "crate" => format!("{s}_"),
        _ if is_rust_keyword(s) => format!("r#{s}"),
        _ => s.to_string(),
    }
}

/// Snake-cased, keyword-escaped identifier for fields, arguments and functions.
#[must_use]
pub fn field_ident(s: &str) -> String {
    rust_ident(&to_snake_case(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("clOrdId"), "cl_ord_id");
        assert_eq!(to_snake_case("symbol"), "symbol");
        assert_eq!(to_snake_case("MDEntryPx"), "md_entry_px");
        assert_eq!(to_snake_case("getHTTPResponse"), "get_http_response");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
        assert_eq!(to_snake_case("num1"), "num1");
        assert_eq!(to_snake_case("field2Name"), "field2_name");
        assert_eq!(to_snake_case("tutorial.calc"), "tutorial_calc");
    }

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("add_args"), "AddArgs");
        assert_eq!(to_pascal_case("ping"), "Ping");
        assert_eq!(to_pascal_case("InvalidOperation"), "InvalidOperation");
    }

    #[test]
    fn test_upper_snake() {
        assert_eq!(to_upper_snake_case("INT32CONSTANT"), "INT32CONSTANT");
        assert_eq!(to_upper_snake_case("calculateLog"), "CALCULATE_LOG");
    }

    #[test]
    fn test_keyword_escaping() {
        assert_eq!(rust_ident("type"), "r#type");
        assert_eq!(rust_ident("match"), "r#match");
        assert_eq!(rust_ident("self"), "self_");
        assert_eq!(rust_ident("value"), "value");
        assert_eq!(field_ident("Type"), "r#type");
    }
}

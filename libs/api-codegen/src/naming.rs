//! Naming policy: descriptor names (snake_case keys, dotted endpoint names,
//! HTTP method tokens) to Rust identifiers.
//!
//! Every function here is pure and deterministic; the same input always maps
//! to the same identifier.

use heck::{ToSnakeCase, ToUpperCamelCase};

/// Field or parameter identifier for a descriptor key.
pub fn field_ident(key: &str) -> String {
    let snake = key.to_snake_case();
    let snake = if snake.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", snake)
    } else {
        snake
    };
    sanitize(snake)
}

/// Variant identifier for an enum option or other literal value.
pub fn variant_ident(option: &str) -> String {
    let camel = option.to_upper_camel_case();
    if camel.is_empty() {
        return "Empty".to_string();
    }
    if camel.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("V{}", camel);
    }
    sanitize(camel)
}

/// Method identifier for a dotted endpoint name (`indices.get_mapping`).
pub fn method_ident(endpoint_name: &str) -> String {
    field_ident(&endpoint_name.replace('.', "_"))
}

/// Variant of the runtime `HttpMethod` enum for a method token (`GET` -> `Get`).
pub fn http_method_variant(token: &str) -> String {
    token.to_lowercase().to_upper_camel_case()
}

/// File stem of the module holding a generated definition.
pub fn module_name(definition_name: &str) -> String {
    field_ident(definition_name).trim_start_matches("r#").to_string()
}

fn sanitize(ident: String) -> String {
    if matches!(ident.as_str(), "self" | "Self" | "crate" | "super") {
        // not valid as raw identifiers
        format!("{}_", ident)
    } else if is_rust_keyword(&ident) {
        format!("r#{}", ident)
    } else {
        ident
    }
}

/// Check if a string is a Rust keyword
pub fn is_rust_keyword(s: &str) -> bool {
    matches!(
        s,
        "as" | "break"
            | "const"
            | "continue"
            | "crate"
            | "else"
            | "enum"
            | "extern"
            | "false"
            | "fn"
            | "for"
            | "if"
            | "impl"
            | "in"
            | "let"
            | "loop"
            | "match"
            | "mod"
            | "move"
            | "mut"
            | "pub"
            | "ref"
            | "return"
            | "self"
            | "Self"
            | "static"
            | "struct"
            | "super"
            | "trait"
            | "true"
            | "type"
            | "unsafe"
            | "use"
            | "where"
            | "while"
            | "async"
            | "await"
            | "dyn"
            | "abstract"
            | "become"
            | "box"
            | "do"
            | "final"
            | "macro"
            | "override"
            | "priv"
            | "typeof"
            | "unsized"
            | "virtual"
            | "yield"
            | "try"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_idents_are_snake_case() {
        assert_eq!(field_ident("min_score"), "min_score");
        assert_eq!(field_ident("minimumShouldMatch"), "minimum_should_match");
        assert_eq!(field_ident("name"), "name");
    }

    #[test]
    fn keywords_are_escaped() {
        assert_eq!(field_ident("type"), "r#type");
        assert_eq!(field_ident("match"), "r#match");
        assert_eq!(field_ident("self"), "self_");
        assert_eq!(variant_ident("self"), "Self_");
    }

    #[test]
    fn leading_digits_are_prefixed() {
        assert_eq!(field_ident("2d"), "_2d");
        assert_eq!(variant_ident("1h"), "V1h");
    }

    #[test]
    fn variants_are_upper_camel_case() {
        assert_eq!(variant_ident("and"), "And");
        assert_eq!(variant_ident("geo_distance"), "GeoDistance");
        assert_eq!(variant_ident("*"), "Empty");
    }

    #[test]
    fn method_idents_flatten_dots() {
        assert_eq!(method_ident("indices.get_mapping"), "indices_get_mapping");
        assert_eq!(method_ident("search"), "search");
    }

    #[test]
    fn http_methods_map_to_variants() {
        assert_eq!(http_method_variant("GET"), "Get");
        assert_eq!(http_method_variant("DELETE"), "Delete");
    }

    #[test]
    fn module_names_drop_raw_prefix() {
        assert_eq!(module_name("BoolQuery"), "bool_query");
        assert_eq!(module_name("Type"), "type");
    }
}

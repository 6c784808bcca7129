//! Naming utilities for code generation

/// Convert a snake_case database name to camelCase or PascalCase.
///
/// Names containing `_` are split on it; empty segments are skipped, every
/// segment is lower-cased, and the first letter of each segment after the
/// first is upper-cased (the first segment's only when `capitalize_first`).
/// Names without `_` keep their casing apart from the first letter, which
/// makes the conversion idempotent.
pub fn underscore_to_camel(name: &str, capitalize_first: bool) -> String {
    if !name.contains('_') {
        return with_first_case(name, capitalize_first);
    }

    let mut out = String::with_capacity(name.len());
    for segment in name.split('_').filter(|s| !s.is_empty()) {
        let lowered = segment.to_lowercase();
        let capitalize = capitalize_first || !out.is_empty();
        out.push_str(&with_first_case(&lowered, capitalize));
    }
    out
}

/// Entity (class) name for a table, e.g. `user_account` -> `UserAccount`
pub fn to_entity_name(table_name: &str) -> String {
    underscore_to_camel(table_name, true)
}

/// Field (or variable) name for a column, e.g. `created_at` -> `createdAt`
pub fn to_field_name(column_name: &str) -> String {
    underscore_to_camel(column_name, false)
}

/// Whether `name` can be used as a Java class or variable name
pub fn is_java_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

fn with_first_case(s: &str, upper: bool) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if upper => first.to_uppercase().chain(chars).collect(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

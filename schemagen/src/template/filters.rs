//! Filters available to every template
//!
//! ```tera
//! {{ "user_account" | pascal_case }}  {# UserAccount #}
//! {{ entity_name | kebab_case }}      {# user-account #}
//! @Schema(description = "{{ column.comment | java_string }}")
//! ```

use std::collections::HashMap;

use heck::{ToKebabCase, ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};
use tera::{Result as TeraResult, Tera, Value};

/// Register all filters on a Tera instance
pub fn register(tera: &mut Tera) {
    tera.register_filter("pascal_case", pascal_case);
    tera.register_filter("camel_case", camel_case);
    tera.register_filter("snake_case", snake_case);
    tera.register_filter("kebab_case", kebab_case);
    tera.register_filter("java_string", java_string);
}

fn as_str<'a>(value: &'a Value, filter: &str) -> TeraResult<&'a str> {
    value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("{} filter requires a string", filter)))
}

pub fn pascal_case(value: &Value, _args: &HashMap<String, Value>) -> TeraResult<Value> {
    Ok(Value::String(as_str(value, "pascal_case")?.to_upper_camel_case()))
}

pub fn camel_case(value: &Value, _args: &HashMap<String, Value>) -> TeraResult<Value> {
    Ok(Value::String(as_str(value, "camel_case")?.to_lower_camel_case()))
}

pub fn snake_case(value: &Value, _args: &HashMap<String, Value>) -> TeraResult<Value> {
    Ok(Value::String(as_str(value, "snake_case")?.to_snake_case()))
}

pub fn kebab_case(value: &Value, _args: &HashMap<String, Value>) -> TeraResult<Value> {
    Ok(Value::String(as_str(value, "kebab_case")?.to_kebab_case()))
}

/// Escape a value for use inside a Java string literal
pub fn java_string(value: &Value, _args: &HashMap<String, Value>) -> TeraResult<Value> {
    let raw = as_str(value, "java_string")?;
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c => escaped.push(c),
        }
    }
    Ok(Value::String(escaped))
}

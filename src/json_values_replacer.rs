use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;

lazy_static! {
    static ref TOKEN_REGEX: Regex = Regex::new(
        r#"(?P<open>")?%(?P<key>[A-Za-z0-9_][A-Za-z0-9_.\-]*)(?:\|(?P<datatype>string|int|float|bool))?%(?P<close>")?"#
    )
    .unwrap();
}

/// A value substituted for a `%key%` placeholder in a JSON fixture.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplacementValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    Json(Value),
}

impl From<&str> for ReplacementValue {
    fn from(value: &str) -> Self {
        ReplacementValue::Str(value.to_string())
    }
}

impl From<String> for ReplacementValue {
    fn from(value: String) -> Self {
        ReplacementValue::Str(value)
    }
}

impl From<i64> for ReplacementValue {
    fn from(value: i64) -> Self {
        ReplacementValue::Int(value)
    }
}

impl From<i32> for ReplacementValue {
    fn from(value: i32) -> Self {
        ReplacementValue::Int(value as i64)
    }
}

impl From<f64> for ReplacementValue {
    fn from(value: f64) -> Self {
        ReplacementValue::Float(value)
    }
}

impl From<bool> for ReplacementValue {
    fn from(value: bool) -> Self {
        ReplacementValue::Bool(value)
    }
}

impl From<Value> for ReplacementValue {
    fn from(value: Value) -> Self {
        ReplacementValue::Json(value)
    }
}

/// Substitutes `%key%` and `%key|datatype%` placeholders in a JSON string.
///
/// A placeholder quoted on both sides (`"%age|int%"`) is replaced together
/// with its quotes by the JSON literal of the value, so a fixture can hold
/// valid JSON while a test injects a number, boolean or object. A bare
/// placeholder is replaced in place by the value's text. Keys missing from
/// the replacement map are left untouched.
pub fn replace_json_values(values: &HashMap<String, ReplacementValue>, json: &str) -> String {
    TOKEN_REGEX
        .replace_all(json, |captures: &Captures| {
            expand_token(values, captures)
        })
        .into_owned()
}

fn expand_token(values: &HashMap<String, ReplacementValue>, captures: &Captures) -> String {
    let key = &captures["key"];
    let value = match values.get(key) {
        Some(value) => value,
        None => return captures[0].to_string(),
    };

    let datatype = captures.name("datatype").map(|m| m.as_str());
    let coerced = coerce(value, datatype);

    let open = captures.name("open").map_or("", |m| m.as_str());
    let close = captures.name("close").map_or("", |m| m.as_str());
    let quoted = !open.is_empty() && !close.is_empty();

    if quoted {
        return json_literal(&coerced);
    }

    // A stray quote belongs to the surrounding document, not the token.
    format!("{}{}{}", open, raw_text(&coerced), close)
}

fn coerce(value: &ReplacementValue, datatype: Option<&str>) -> Value {
    let base = base_value(value);

    if base.is_null() {
        return Value::Null;
    }

    match datatype {
        Some("string") => Value::String(raw_text(&base)),
        Some("int") => Value::from(as_i64(&base)),
        Some("float") => coerce_float(&base),
        Some("bool") => Value::Bool(as_bool(&base)),
        _ => base,
    }
}

fn base_value(value: &ReplacementValue) -> Value {
    match value {
        ReplacementValue::Str(s) => Value::String(s.clone()),
        ReplacementValue::Int(i) => Value::from(*i),
        ReplacementValue::Float(f) => coerce_float_from(*f),
        ReplacementValue::Bool(b) => Value::Bool(*b),
        ReplacementValue::Null => Value::Null,
        ReplacementValue::Json(v) => v.clone(),
    }
}

fn as_i64(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<i64>().unwrap_or_else(|_| {
            s.trim().parse::<f64>().map(|f| f as i64).unwrap_or(0)
        }),
        Value::Bool(true) => 1,
        _ => 0,
    }
}

fn coerce_float(value: &Value) -> Value {
    let float = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };

    coerce_float_from(float)
}

fn coerce_float_from(float: f64) -> Value {
    match serde_json::Number::from_f64(float) {
        Some(number) => Value::Number(number),
        None => Value::Null,
    }
}

fn as_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0" && s != "false",
        _ => false,
    }
}

fn json_literal(value: &Value) -> String {
    value.to_string()
}

fn raw_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

//! The value tree exchanged with the embedding application.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FormValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Numeric text that failed to parse. Never equal to any number.
    NotANumber,
    Text(String),
    Array(Vec<FormValue>),
    Object(IndexMap<String, FormValue>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    NotANumber,
    Text,
    Array,
    Object,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::NotANumber => write!(f, "NaN"),
            Self::Text => write!(f, "text"),
            Self::Array => write!(f, "array"),
            Self::Object => write!(f, "object"),
        }
    }
}

impl FormValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::NotANumber => ValueKind::NotANumber,
            Self::Text(_) => ValueKind::Text,
            Self::Array(_) => ValueKind::Array,
            Self::Object(_) => ValueKind::Object,
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Wraps a float, folding NaN into [`FormValue::NotANumber`].
    pub fn float(f: f64) -> Self {
        if f.is_nan() {
            Self::NotANumber
        } else {
            Self::Float(f)
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[FormValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, FormValue>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` if this is an object.
    pub fn get(&self, key: &str) -> Option<&FormValue> {
        self.as_object()?.get(key)
    }

    /// Whether a toggle written with this value ends up checked.
    pub fn truthy(&self) -> bool {
        match self {
            Self::Null | Self::NotANumber => false,
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Text(s) => !s.is_empty(),
            Self::Array(_) | Self::Object(_) => true,
        }
    }

    /// Text written into a text control for this value.
    ///
    /// `Null` becomes empty, integral floats print without a fraction and
    /// containers print as compact JSON.
    pub fn display_string(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => format_float(*f),
            Self::NotANumber => "NaN".to_string(),
            Self::Text(s) => s.clone(),
            Self::Array(_) | Self::Object(_) => self.to_json().to_string(),
        }
    }

    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => n.as_f64().map_or(Self::NotANumber, Self::float),
            },
            JsonValue::String(s) => Self::Text(s.clone()),
            JsonValue::Array(items) => Self::Array(items.iter().map(Self::from_json).collect()),
            JsonValue::Object(map) => Self::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Converts to JSON. JSON has no NaN or infinities, so those become `null`.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null | Self::NotANumber => JsonValue::Null,
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Int(i) => JsonValue::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Self::Text(s) => JsonValue::String(s.clone()),
            Self::Array(items) => JsonValue::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(map) => JsonValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if f == 0.0 {
        "0".to_string()
    } else if f.fract() == 0.0 && f.abs() < 1e21 {
        format!("{f:.0}")
    } else {
        format!("{f}")
    }
}

impl From<&str> for FormValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FormValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for FormValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for FormValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for FormValue {
    fn from(f: f64) -> Self {
        Self::float(f)
    }
}

impl From<&JsonValue> for FormValue {
    fn from(value: &JsonValue) -> Self {
        Self::from_json(value)
    }
}

impl From<JsonValue> for FormValue {
    fn from(value: JsonValue) -> Self {
        Self::from_json(&value)
    }
}

impl From<Vec<FormValue>> for FormValue {
    fn from(items: Vec<FormValue>) -> Self {
        Self::Array(items)
    }
}

/// Parses the integer at the start of `text`, ignoring leading whitespace and
/// any trailing garbage. Yields [`FormValue::NotANumber`] when no digit leads.
pub fn parse_int_prefix(text: &str) -> FormValue {
    let s = text.trim_start();
    let sign_len = usize::from(s.starts_with(['+', '-']));
    let digits = s[sign_len..]
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return FormValue::NotANumber;
    }
    let number = &s[..sign_len + digits];
    match number.parse::<i64>() {
        Ok(i) => FormValue::Int(i),
        // Out of i64 range; keep the magnitude as a float.
        Err(_) => number.parse::<f64>().map_or(FormValue::NotANumber, FormValue::float),
    }
}

/// Parses the decimal number at the start of `text`, ignoring leading
/// whitespace and any trailing garbage. Accepts an optional sign, a fraction
/// and an exponent, and `Infinity`.
pub fn parse_float_prefix(text: &str) -> FormValue {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = usize::from(s.starts_with(['+', '-']));
    let negative = s.starts_with('-');

    if s[end..].starts_with("Infinity") {
        return FormValue::Float(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return FormValue::NotANumber;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }
    s[..end]
        .parse::<f64>()
        .map_or(FormValue::NotANumber, FormValue::float)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int_prefix("42"), FormValue::Int(42));
        assert_eq!(parse_int_prefix("  -7"), FormValue::Int(-7));
        assert_eq!(parse_int_prefix("12abc"), FormValue::Int(12));
        assert_eq!(parse_int_prefix("1.9"), FormValue::Int(1));
        assert_eq!(parse_int_prefix(""), FormValue::NotANumber);
        assert_eq!(parse_int_prefix("abc"), FormValue::NotANumber);
        assert_eq!(parse_int_prefix("-"), FormValue::NotANumber);
    }

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("1.5"), FormValue::Float(1.5));
        assert_eq!(parse_float_prefix("1.5x"), FormValue::Float(1.5));
        assert_eq!(parse_float_prefix(".5"), FormValue::Float(0.5));
        assert_eq!(parse_float_prefix("3."), FormValue::Float(3.0));
        assert_eq!(parse_float_prefix("-2e3"), FormValue::Float(-2000.0));
        assert_eq!(parse_float_prefix("2e"), FormValue::Float(2.0));
        assert_eq!(parse_float_prefix("."), FormValue::NotANumber);
        assert_eq!(parse_float_prefix("x1"), FormValue::NotANumber);
        assert_eq!(parse_float_prefix("Infinity"), FormValue::Float(f64::INFINITY));
    }

    #[test]
    fn test_display_string() {
        assert_eq!(FormValue::Null.display_string(), "");
        assert_eq!(FormValue::Float(3.0).display_string(), "3");
        assert_eq!(FormValue::Float(-0.0).display_string(), "0");
        assert_eq!(FormValue::Float(0.25).display_string(), "0.25");
        assert_eq!(FormValue::Int(-3).display_string(), "-3");
        assert_eq!(
            FormValue::from_json(&json!([1, "a"])).display_string(),
            r#"[1,"a"]"#
        );
    }

    #[test]
    fn test_truthy() {
        assert!(!FormValue::Null.truthy());
        assert!(!FormValue::text("").truthy());
        assert!(FormValue::text("no").truthy());
        assert!(!FormValue::Int(0).truthy());
        assert!(FormValue::Array(vec![]).truthy());
    }

    #[test]
    fn test_json_conversion() {
        let json = json!({"name": "gw", "port": 8080, "ratio": 0.5, "on": true, "tags": ["a"]});
        let value = FormValue::from_json(&json);
        assert_eq!(value.get("port"), Some(&FormValue::Int(8080)));
        assert_eq!(value.get("ratio"), Some(&FormValue::Float(0.5)));
        assert_eq!(value.to_json(), json);
    }

    #[test]
    fn test_not_a_number_to_json_is_null() {
        assert_eq!(FormValue::NotANumber.to_json(), JsonValue::Null);
        assert_eq!(FormValue::Float(f64::INFINITY).to_json(), JsonValue::Null);
    }

    #[test]
    fn test_float_constructor_folds_nan() {
        assert_eq!(FormValue::float(f64::NAN), FormValue::NotANumber);
    }
}

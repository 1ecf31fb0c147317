// Validation utilities module
// Loose JSON and query-string values are checked here before they reach the domain types

use serde_json::Value;
use validator::ValidationErrors;

/// Returns true for values that count as "not provided":
/// null, false, zero, and the empty string
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64().map_or(false, |f| f == 0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => false,
    }
}

/// Reads a JSON number as an integer, accepting integral floats such as `1.0`
pub fn json_integer(value: &Value) -> Option<i64> {
    let number = match value {
        Value::Number(n) => n,
        _ => return None,
    };
    number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Coerces a query-string value to an integer
///
/// Absent, empty, non-numeric, zero and non-integral inputs yield `None`;
/// surrounding whitespace is ignored.
pub fn coerce_query_integer(raw: Option<&str>) -> Option<i64> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }

    let number = trimmed.parse::<f64>().ok()?;
    if !number.is_finite() || number == 0.0 || number.fract() != 0.0 {
        return None;
    }
    if number < i64::MIN as f64 || number > i64::MAX as f64 {
        return None;
    }

    Some(number as i64)
}

/// First validation message found among `fields`, checked in the given order
pub fn first_message(errors: &ValidationErrors, fields: &[&str]) -> Option<String> {
    let field_errors = errors.field_errors();
    fields.iter().find_map(|field| {
        field_errors
            .get(*field)
            .and_then(|errs| errs.iter().find_map(|e| e.message.as_ref()))
            .map(|message| message.to_string())
    })
}

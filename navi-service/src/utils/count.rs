//! Lenient integer parsing for passenger and capacity counts.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Interpret a JSON value as a count.
///
/// Integers pass through, floats truncate toward zero, and strings must hold
/// an integer (surrounding whitespace allowed). Everything else is `None`.
pub fn coerce_count(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// `deserialize_with` helper for optional count fields. An explicit `null` is
/// rejected like any other non-numeric value.
pub fn deserialize_optional_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    coerce_count(&value)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("expected an integer count, got {}", value)))
}

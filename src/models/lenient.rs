//! Lenient deserializers for hand-entered numeric fields
//!
//! Persisted line items come from manually edited forms: numbers may arrive
//! as JSON numbers, as strings with grouping separators, as `null`, or not at
//! all. Anything that does not parse becomes zero instead of failing the
//! whole computation.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Best-effort conversion of a raw value to a finite `f64`, zero otherwise
pub fn to_f64(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .trim_end_matches('%')
                .chars()
                .filter(|c| !matches!(c, ',' | '_' | ' '))
                .collect();
            cleaned.parse::<f64>().unwrap_or(0.0)
        }
        _ => 0.0,
    };
    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}

/// Deserialize a plain number leniently (use with `#[serde(default)]`)
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(to_f64).unwrap_or(0.0))
}

/// Money fields on raw records, expressed in major units
pub mod money {
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    use crate::models::Money;

    pub fn serialize<S>(amount: &Money, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(amount.as_major_f64())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Money, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(Money::from_major_f64(
            value.as_ref().map(super::to_f64).unwrap_or(0.0),
        ))
    }
}

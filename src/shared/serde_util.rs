//! Custom serde helpers for the API's wire formats.

/// Unix-millis timestamps as sent by the chart endpoint.
///
/// Timestamps arrive as JSON numbers which may carry a fractional part, so the
/// raw value is read as `f64` and converted here.
pub mod timestamp_ms {
    use chrono::{DateTime, Utc};

    pub fn from_millis(millis: f64) -> Option<DateTime<Utc>> {
        if !millis.is_finite() {
            return None;
        }
        DateTime::<Utc>::from_timestamp_millis(millis as i64)
    }
}

/// A number that may be `null`, missing, or a numeric string.
///
/// Anything that is not a usable number becomes `None` instead of failing the
/// whole payload. Serializes back as a plain number or `null`.
pub mod lenient_f64 {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::Value;

    pub fn serialize<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.filter(|v| v.is_finite()).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        })
    }
}

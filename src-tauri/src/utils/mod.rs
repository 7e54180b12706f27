pub mod config;

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "clinic_desk=info";

/// Installs the global tracing subscriber. `RUST_LOG` wins over the default filter.
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn parse_decimal(value: &str) -> Result<f64> {
    value
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|e| anyhow!("Parse decimal: {}", e))
}

pub fn parse_integer(value: &str) -> Result<i64> {
    let trimmed = value.trim();
    if let Ok(parsed) = trimmed.parse::<i64>() {
        return Ok(parsed);
    }
    let decimal = parse_decimal(trimmed)?;
    if decimal.fract() == 0.0 && decimal.is_finite() {
        Ok(decimal as i64)
    } else {
        Err(anyhow!("Parse integer: {} has a fractional part", trimmed))
    }
}

/// Deserializers for spreadsheet-backed payloads, where a cell can come back as a
/// number, a numeric string, an empty string or null regardless of the column's meaning.
pub mod lenient {
    use serde::de::{DeserializeOwned, Error};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use tracing::warn;

    pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(opt_string(deserializer)?.unwrap_or_default())
    }

    pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
            Some(Value::String(text)) => Ok(Some(text)),
            Some(Value::Number(number)) => Ok(Some(number.to_string())),
            Some(Value::Bool(flag)) => Ok(Some(flag.to_string())),
            Some(other) => Err(D::Error::custom(format!("expected text, found {}", other))),
        }
    }

    pub fn integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        opt_integer(deserializer)?.ok_or_else(|| D::Error::custom("expected an integer, found nothing"))
    }

    pub fn opt_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
            Some(Value::String(text)) => super::parse_integer(&text).map(Some).map_err(D::Error::custom),
            Some(Value::Number(number)) => match number.as_i64() {
                Some(value) => Ok(Some(value)),
                None => super::parse_integer(&number.to_string()).map(Some).map_err(D::Error::custom),
            },
            Some(other) => Err(D::Error::custom(format!("expected an integer, found {}", other))),
        }
    }

    pub fn opt_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match opt_integer(deserializer)? {
            None => Ok(None),
            Some(value) => u32::try_from(value).map(Some).map_err(D::Error::custom),
        }
    }

    /// Aggregate counter. Anything that is not a non-negative whole number reads as zero,
    /// so one bad cell only blanks its own widget.
    pub fn total<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        let parsed = match value {
            Some(Value::Number(number)) => number.as_u64().or_else(|| {
                super::parse_integer(&number.to_string())
                    .ok()
                    .and_then(|n| u64::try_from(n).ok())
            }),
            Some(Value::String(text)) => super::parse_integer(&text).ok().and_then(|n| u64::try_from(n).ok()),
            _ => None,
        };
        Ok(parsed.unwrap_or_default())
    }

    /// A list where each element decodes on its own; elements that do not fit `T`
    /// are dropped with a warning instead of failing the whole list.
    pub fn rows<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let raw = match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Array(items)) => items,
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(other) => return Err(D::Error::custom(format!("expected a list, found {}", other))),
        };
        Ok(raw
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value(item) {
                Ok(row) => Some(row),
                Err(err) => {
                    warn!(index, error = %err, "Skipping malformed row");
                    None
                }
            })
            .collect())
    }

    pub fn decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(0.0),
            Some(Value::String(text)) if text.trim().is_empty() => Ok(0.0),
            Some(Value::String(text)) => super::parse_decimal(&text).map_err(D::Error::custom),
            Some(Value::Number(number)) => number
                .as_f64()
                .ok_or_else(|| D::Error::custom(format!("{} is not representable as f64", number))),
            Some(other) => Err(D::Error::custom(format!("expected a decimal, found {}", other))),
        }
    }
}

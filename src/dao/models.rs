use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Representation of a team stored in the `teams` slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamEntity {
    /// Display name; blank values are replaced by the positional default when decoded.
    #[serde(default, deserialize_with = "lenient_name")]
    pub name: String,
    /// Current score; non-numeric values decode as 0.
    #[serde(default, deserialize_with = "lenient_score")]
    pub score: i64,
}

/// Representation of the `start` slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StartStateEntity {
    /// Whether the host dismissed the setup overlay.
    #[serde(default, deserialize_with = "lenient_flag")]
    pub started: bool,
    /// Requested team count. `None` when the field is absent or null.
    #[serde(default, deserialize_with = "lenient_count")]
    pub team_count: Option<i64>,
}

/// Entries of the `used` slot. Items are kept raw and validated by the tracker.
pub type UsedCellsEntity = Vec<Value>;

fn lenient_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(name) => name,
        Value::Number(number) if number.as_f64() != Some(0.0) => number.to_string(),
        Value::Bool(true) => "true".into(),
        _ => String::new(),
    })
}

fn lenient_score<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(numeric(&value).unwrap_or(0))
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    // Present but unusable counts clamp to the minimum, so they map to 0 rather than `None`.
    Ok(match value {
        Value::Null => None,
        other => Some(numeric(&other).unwrap_or(0)),
    })
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(flag) => flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
        Value::Null => false,
    })
}

/// Interpret a JSON value as an integer the way a host form field would: numbers are truncated,
/// numeric strings are parsed, booleans count as 0/1.
fn numeric(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|n| n.is_finite()).map(|n| n.trunc() as i64)),
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Some(0);
            }
            text.parse::<i64>().ok().or_else(|| {
                text.parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .map(|n| n.trunc() as i64)
            })
        }
        Value::Bool(flag) => Some(i64::from(*flag)),
        Value::Null => Some(0),
        Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_fields_are_lenient() {
        let teams: Vec<TeamEntity> = serde_json::from_str(
            r#"[{"name":"Alpha","score":"300"},{"score":12.9},{"name":null,"score":"abc"}]"#,
        )
        .unwrap();

        assert_eq!(teams[0].name, "Alpha");
        assert_eq!(teams[0].score, 300);
        assert_eq!(teams[1].name, "");
        assert_eq!(teams[1].score, 12);
        assert_eq!(teams[2].name, "");
        assert_eq!(teams[2].score, 0);
    }

    #[test]
    fn start_state_uses_camel_case_and_lenient_values() {
        let state: StartStateEntity =
            serde_json::from_str(r#"{"started":1,"teamCount":"4"}"#).unwrap();
        assert!(state.started);
        assert_eq!(state.team_count, Some(4));

        let state: StartStateEntity = serde_json::from_str(r#"{"teamCount":"many"}"#).unwrap();
        assert!(!state.started);
        assert_eq!(state.team_count, Some(0));

        let state: StartStateEntity = serde_json::from_str("{}").unwrap();
        assert_eq!(state.team_count, None);

        let encoded = serde_json::to_string(&StartStateEntity {
            started: true,
            team_count: Some(3),
        })
        .unwrap();
        assert_eq!(encoded, r#"{"started":true,"teamCount":3}"#);
    }

    #[test]
    fn scalars_do_not_decode_as_entities() {
        assert!(serde_json::from_str::<StartStateEntity>("42").is_err());
        assert!(serde_json::from_str::<StartStateEntity>("null").is_err());
        assert!(serde_json::from_str::<Vec<TeamEntity>>("[1,2]").is_err());
    }
}

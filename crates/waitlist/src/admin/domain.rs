use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// One waitlist row as the dashboard displays it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WaitlistEntry {
    pub id: Option<String>,
    pub email: String,
    pub confirmed: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// Counts plus the entry list, built fresh from every successful fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub total: u64,
    pub confirmed: u64,
    pub unconfirmed: u64,
    pub updated_at: DateTime<Utc>,
    pub entries: Vec<WaitlistEntry>,
}

/// `stats` object of `GET /api/waitlist/stats`. Counts may arrive as numbers
/// or numeric strings.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct StatsPayload {
    #[serde(default)]
    total: Value,
    #[serde(default)]
    confirmed: Value,
    #[serde(default)]
    unconfirmed: Value,
    #[serde(default)]
    users: Option<Value>,
}

impl StatsPayload {
    pub(crate) fn into_snapshot(self, updated_at: DateTime<Utc>) -> StatsSnapshot {
        let users = match self.users {
            Some(Value::Array(users)) => users,
            _ => Vec::new(),
        };
        let entries = users
            .into_iter()
            .filter_map(|raw| match UserPayload::deserialize(&raw) {
                Ok(user) => Some(user.into_entry()),
                Err(err) => {
                    warn!(%err, "skipping malformed waitlist user");
                    None
                }
            })
            .collect();

        StatsSnapshot {
            total: count(&self.total),
            confirmed: count(&self.confirmed),
            unconfirmed: count(&self.unconfirmed),
            updated_at,
            entries,
        }
    }
}

/// Deployments disagree on id and timestamp keys, so every spelling is read.
#[derive(Debug, Deserialize)]
struct UserPayload {
    #[serde(default, rename = "_id")]
    mongo_id: Option<Value>,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    email: Value,
    #[serde(default)]
    confirmed: Value,
    #[serde(default, rename = "joinedAt")]
    joined_at: Value,
    #[serde(default, rename = "createdAt")]
    created_at_camel: Value,
    #[serde(default)]
    created_at: Value,
}

impl UserPayload {
    fn into_entry(self) -> WaitlistEntry {
        let id = self
            .mongo_id
            .as_ref()
            .and_then(scalar_text)
            .or_else(|| self.id.as_ref().and_then(scalar_text));
        // First truthy key wins; a value that does not parse leaves the date blank.
        let created_at = [&self.joined_at, &self.created_at_camel, &self.created_at]
            .into_iter()
            .find(|value| truthy(value))
            .and_then(timestamp_value);

        WaitlistEntry {
            id,
            email: scalar_text(&self.email).unwrap_or_default(),
            confirmed: truthy(&self.confirmed),
            created_at,
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn count(value: &Value) -> u64 {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|n| *n > 0.0).map(|n| n as u64))
            .unwrap_or(0),
        Value::String(text) => text.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Strings are parsed as dates, numbers as epoch milliseconds.
fn timestamp_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => parse_timestamp(text),
        Value::Number(number) => number.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// RFC 3339 first, then a zone-less ISO timestamp read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .map(|naive| naive.and_utc())
        .ok()
}

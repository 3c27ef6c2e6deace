//! 日期时间反序列化工具
//!
//! Providers disagree on timestamp formats:
//! - EC2: RFC3339 with zone (`2024-01-01T12:00:00.000Z`)
//! - OpenStack: ISO-8601 often without zone (`2012-04-23T08:55:44.000000`), read as UTC

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a provider timestamp; zone-less timestamps are taken as UTC.
pub fn parse(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// 反序列化 Option<字符串> 为 Option<`DateTime`<Utc>>
///
/// Missing, empty and unparseable values all become `None`; a bad timestamp
/// must not fail the whole resource lookup.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(|s| {
        let parsed = parse(s);
        if parsed.is_none() && !s.trim().is_empty() {
            log::warn!("Ignoring unparseable timestamp: {s}");
        }
        parsed
    }))
}

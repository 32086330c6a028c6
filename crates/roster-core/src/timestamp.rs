//! Timestamps as the backend actually sends them.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Naive date-time layouts tried after RFC 3339. `%.f` also accepts a
/// missing fractional part.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// A timestamp that may arrive as text or as epoch milliseconds.
///
/// The raw value is kept as-is so records round-trip unchanged; callers ask
/// for a parsed instant with [`LooseDate::parse`], which is `None` for
/// anything unparseable. Any other JSON shape lands in `Unknown` instead of
/// failing the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseDate {
  Millis(i64),
  Text(String),
  Unknown(serde_json::Value),
}

impl LooseDate {
  pub fn parse(&self) -> Option<DateTime<Utc>> {
    match self {
      Self::Millis(ms) => DateTime::from_timestamp_millis(*ms),
      Self::Text(text) => parse_text(text.trim()),
      Self::Unknown(_) => None,
    }
  }

  /// The calendar day (UTC) of this timestamp.
  pub fn date(&self) -> Option<NaiveDate> {
    self.parse().map(|dt| dt.date_naive())
  }
}

impl From<DateTime<Utc>> for LooseDate {
  fn from(dt: DateTime<Utc>) -> Self { Self::Text(dt.to_rfc3339()) }
}

impl From<&str> for LooseDate {
  fn from(text: &str) -> Self { Self::Text(text.to_owned()) }
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
  if text.is_empty() {
    return None;
  }
  if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
    return Some(dt.with_timezone(&Utc));
  }
  for format in NAIVE_FORMATS {
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
      return Some(naive.and_utc());
    }
  }
  NaiveDate::parse_from_str(text, "%Y-%m-%d")
    .ok()
    .and_then(|date| date.and_hms_opt(0, 0, 0))
    .map(|naive| naive.and_utc())
}

/// Parse an optional loose timestamp, logging values that fail to parse.
pub(crate) fn parse_opt(value: Option<&LooseDate>) -> Option<DateTime<Utc>> {
  let value = value?;
  let parsed = value.parse();
  if parsed.is_none() {
    tracing::debug!(?value, "ignoring unparseable timestamp");
  }
  parsed
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn parses_rfc3339_with_offset() {
    let parsed = LooseDate::from("2024-03-01T12:00:00+02:00").parse();
    assert_eq!(parsed, Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()));
  }

  #[test]
  fn parses_javascript_iso_strings() {
    let parsed = LooseDate::from("2024-03-01T12:00:00.000Z").parse();
    assert_eq!(parsed, Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()));
  }

  #[test]
  fn parses_naive_and_date_only_strings_as_utc() {
    assert_eq!(
      LooseDate::from("2024-03-01 08:30:00").parse(),
      Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap())
    );
    assert_eq!(
      LooseDate::from("2024-03-01").parse(),
      Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
    );
  }

  #[test]
  fn parses_epoch_millis() {
    let parsed: LooseDate = serde_json::from_str("1709294400000").unwrap();
    assert_eq!(
      parsed.parse(),
      Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
    );
  }

  #[test]
  fn garbage_is_none() {
    assert_eq!(LooseDate::from("not a date").parse(), None);
    assert_eq!(LooseDate::from("").parse(), None);
    assert_eq!(LooseDate::from("2024-13-45").parse(), None);
  }

  #[test]
  fn other_json_shapes_deserialize_but_do_not_parse() {
    for raw in [
      serde_json::json!(1709294400000.0),
      serde_json::json!({ "$date": "2024-03-01T12:00:00Z" }),
      serde_json::json!(true),
    ] {
      let date: LooseDate = serde_json::from_value(raw.clone()).unwrap();
      assert_eq!(date, LooseDate::Unknown(raw));
      assert_eq!(date.parse(), None);
      assert_eq!(date.date(), None);
    }
  }
}

/*!
 * Serde helpers for ISO-8601 offset date-times.
 *
 * Timestamps exchanged with the VNFM adapter are written with an explicit
 * offset (`Z` for UTC). On input the compact `+0000` zone suffix some peers
 * emit is accepted as UTC, alongside everything RFC 3339 allows.
 */

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Deserializer, Serializer};

/// Parse an ISO-8601 offset date-time, accepting a trailing `+0000`
pub fn parse_offset_date_time(value: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    match value.strip_suffix("+0000") {
        Some(stripped) => DateTime::parse_from_rfc3339(&format!("{stripped}Z")),
        None => DateTime::parse_from_rfc3339(value),
    }
}

/// Format with the offset kept and UTC written as `Z`
pub fn format_offset_date_time(value: &DateTime<FixedOffset>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// `#[serde(with = "offset_date_time")]` for `DateTime<FixedOffset>` fields
pub mod offset_date_time {
    use super::*;

    pub fn serialize<S>(value: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_offset_date_time(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;
        let raw = String::deserialize(deserializer)?;
        parse_offset_date_time(&raw)
            .map_err(|e| D::Error::custom(format!("Invalid offset date-time '{raw}': {e}")))
    }
}

/// Same as [`offset_date_time`] for optional fields; `null` maps to `None`
pub mod option_offset_date_time {
    use super::*;

    pub fn serialize<S>(
        value: &Option<DateTime<FixedOffset>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => serializer.serialize_str(&format_offset_date_time(value)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|raw| {
            parse_offset_date_time(&raw)
                .map_err(|e| D::Error::custom(format!("Invalid offset date-time '{raw}': {e}")))
        })
        .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Stamped {
        #[serde(with = "offset_date_time")]
        at: DateTime<FixedOffset>,
        #[serde(default, with = "option_offset_date_time")]
        until: Option<DateTime<FixedOffset>>,
    }

    #[test]
    fn test_compact_utc_suffix_is_accepted() {
        let parsed = parse_offset_date_time("2020-10-15T10:30:00+0000").unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), 0);
        assert_eq!(format_offset_date_time(&parsed), "2020-10-15T10:30:00Z");
    }

    #[test]
    fn test_non_utc_offset_is_preserved() {
        let parsed = parse_offset_date_time("2020-10-15T10:30:00.250+02:00").unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), 2 * 3600);
        assert_eq!(format_offset_date_time(&parsed), "2020-10-15T10:30:00.250+02:00");
    }

    #[test]
    fn test_null_and_missing_optional_fields() {
        let stamped: Stamped =
            serde_json::from_str(r#"{"at": "2020-10-15T10:30:00+0000", "until": null}"#).unwrap();
        assert!(stamped.until.is_none());

        let stamped: Stamped = serde_json::from_str(r#"{"at": "2020-10-15T10:30:00Z"}"#).unwrap();
        assert!(stamped.until.is_none());

        let json = serde_json::to_value(&stamped).unwrap();
        assert_eq!(json["at"], "2020-10-15T10:30:00Z");
        assert!(json["until"].is_null());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(parse_offset_date_time("yesterday").is_err());
        assert!(serde_json::from_str::<Stamped>(r#"{"at": "yesterday"}"#).is_err());
    }
}

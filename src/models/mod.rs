use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};

pub const MAX_MESSAGE_CHARS: usize = 180;
pub const FALLBACK_NAME: &str = "A friend";

/// One gratitude note. Created once on submission and never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created: DateTime<Utc>,
}

/// Layouts accepted for timestamps stored without an offset.
const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("unrecognized timestamp '{raw}'")))
}

/// Parses an RFC 3339 timestamp, reading one without an offset as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

impl Note {
    /// Normalizes raw form input into a note ready for storage.
    ///
    /// Returns `None` when the message is blank after trimming.
    pub fn from_submission(name: &str, message: &str, now: DateTime<Utc>) -> Option<Self> {
        let message = message.trim();
        if message.is_empty() {
            return None;
        }

        let name = match name.trim() {
            "" => FALLBACK_NAME,
            trimmed => trimmed,
        };

        Some(Self {
            name: name.to_string(),
            message: message.chars().take(MAX_MESSAGE_CHARS).collect(),
            created: now,
        })
    }
}

/// Example notes shown on a device that has never saved anything.
pub fn default_notes(now: DateTime<Utc>) -> Vec<Note> {
    vec![
        Note {
            name: "Grandma Ruth".to_string(),
            message: "Save me a corner piece of pumpkin pie, I'm bringing extra whipped cream."
                .to_string(),
            created: now - TimeDelta::hours(36),
        },
        Note {
            name: "Sam & Lee".to_string(),
            message: "We're thankful for this crew and the loudest laugh track. Can't wait to squeeze everyone."
                .to_string(),
            created: now - TimeDelta::hours(70),
        },
        Note {
            name: "Ari".to_string(),
            message: "Calling dibs on hosting the midnight tea round. Here's to cozy playlists and long talks."
                .to_string(),
            created: now - TimeDelta::hours(5),
        },
    ]
}

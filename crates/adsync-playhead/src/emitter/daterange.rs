//! `EXT-X-DATERANGE` tag parsing.

use crate::error::{Error, Result};
use adsync_common::MediaId;
use chrono::{DateTime, Duration, Utc};
use std::fmt;

const TAG_PREFIX: &str = "#EXT-X-DATERANGE:";
const MEDIA_ID_ATTRIBUTE: &str = "X-COM-YOSPACE-YMID";

/// An ad-marker date range.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct DateRangeTag {
    /// Identifier used for deduplication.
    pub media_id: MediaId,
    /// Wall-clock start.
    pub start_date: DateTime<Utc>,
    /// Wall-clock end, if the tag carries one.
    #[cfg_attr(feature = "serialize", serde(default))]
    pub end_date: Option<DateTime<Utc>>,
    /// `CLASS` attribute.
    #[cfg_attr(feature = "serialize", serde(default))]
    pub class: Option<String>,
}

impl DateRangeTag {
    /// Create a tag with an explicit end.
    pub fn new(
        media_id: impl Into<MediaId>,
        start_date: DateTime<Utc>,
        end_date: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            media_id: media_id.into(),
            start_date,
            end_date,
            class: None,
        }
    }

    /// Parse a `#EXT-X-DATERANGE:` playlist line.
    ///
    /// The media id comes from the last `X-COM-YOSPACE-YMID` attribute and
    /// falls back to `ID`. The end is `END-DATE` if present, otherwise
    /// `START-DATE + DURATION`.
    pub fn parse(line: &str) -> Result<Self> {
        let body = line
            .trim()
            .strip_prefix(TAG_PREFIX)
            .ok_or_else(|| Error::invalid_date_range(format!("not a date range tag: {}", line)))?;

        let attributes = parse_attribute_list(body)?;
        let find = |name: &str| {
            attributes
                .iter()
                .rev()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        };

        let media_id = find(MEDIA_ID_ATTRIBUTE)
            .or_else(|| find("ID"))
            .ok_or(Error::MissingAttribute("ID"))?;
        let start_date = parse_date(find("START-DATE").ok_or(Error::MissingAttribute("START-DATE"))?)?;

        let end_date = match (find("END-DATE"), find("DURATION")) {
            (Some(end), _) => Some(parse_date(end)?),
            (None, Some(duration)) => {
                let invalid =
                    || Error::invalid_date_range(format!("invalid DURATION '{}'", duration));
                let secs: f64 = duration.parse().map_err(|_| invalid())?;
                if !secs.is_finite() || secs < 0.0 {
                    return Err(invalid());
                }
                let end = checked_secs_to_duration(secs)
                    .and_then(|offset| start_date.checked_add_signed(offset))
                    .ok_or_else(invalid)?;
                Some(end)
            }
            (None, None) => None,
        };

        Ok(Self {
            media_id: MediaId::new(media_id),
            start_date,
            end_date,
            class: find("CLASS").map(str::to_string),
        })
    }

    /// Length of the range in seconds, if the end is known.
    pub fn duration_secs(&self) -> Option<f64> {
        self.end_date
            .map(|end| (end - self.start_date).num_microseconds().unwrap_or(i64::MAX) as f64 / 1e6)
    }
}

impl fmt::Display for DateRangeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}ID=\"{}\",START-DATE=\"{}\"",
            TAG_PREFIX,
            self.media_id,
            self.start_date.to_rfc3339()
        )?;
        if let Some(end) = self.end_date {
            write!(f, ",END-DATE=\"{}\"", end.to_rfc3339())?;
        }
        if let Some(class) = &self.class {
            write!(f, ",CLASS=\"{}\"", class)?;
        }
        write!(f, ",{}=\"{}\"", MEDIA_ID_ATTRIBUTE, self.media_id)
    }
}

/// Convert fractional seconds to a chrono duration at microsecond precision.
pub(crate) fn secs_to_duration(secs: f64) -> Duration {
    Duration::microseconds((secs * 1e6).round() as i64)
}

/// Like [`secs_to_duration`], but `None` when the value does not fit.
fn checked_secs_to_duration(secs: f64) -> Option<Duration> {
    let micros = (secs * 1e6).round();
    if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
        return None;
    }
    Some(Duration::microseconds(micros as i64))
}

fn parse_date(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|source| Error::InvalidTimestamp {
            value: value.to_string(),
            source,
        })
}

/// Split an HLS attribute list into key/value pairs.
///
/// Quoted values may contain commas; quotes are stripped.
fn parse_attribute_list(input: &str) -> Result<Vec<(String, String)>> {
    let mut attributes = Vec::new();
    let mut rest = input.trim();

    while !rest.is_empty() {
        let eq = rest
            .find('=')
            .ok_or_else(|| Error::invalid_date_range(format!("attribute without value: {}", rest)))?;
        let key = rest[..eq].trim();
        if key.is_empty() {
            return Err(Error::invalid_date_range("empty attribute name"));
        }
        rest = &rest[eq + 1..];

        let value;
        if let Some(quoted) = rest.strip_prefix('"') {
            let close = quoted
                .find('"')
                .ok_or_else(|| Error::invalid_date_range(format!("unterminated value for {}", key)))?;
            value = &quoted[..close];
            rest = &quoted[close + 1..];
        } else {
            let end = rest.find(',').unwrap_or(rest.len());
            value = rest[..end].trim();
            rest = &rest[end..];
        }

        attributes.push((key.to_string(), value.to_string()));

        rest = rest.trim_start();
        if let Some(next) = rest.strip_prefix(',') {
            rest = next.trim_start();
        } else if !rest.is_empty() {
            return Err(Error::invalid_date_range(format!(
                "expected ',' after {}, found '{}'",
                key, rest
            )));
        }
    }

    Ok(attributes)
}

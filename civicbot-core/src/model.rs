//! Domain data structures for intents, pickup schedules, permits, and replies.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::ports::PortError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Intents the webhook knows how to fulfill, each with its own parameters.
///
/// Slots the agent left empty are `None`; the handler decides how to answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Conversation opener.
    Welcome,
    /// The agent could not match the user's utterance.
    Fallback,
    /// Next pickup day for a waste type at an address.
    Trash {
        /// Free-text street address as spoken by the user.
        address: Option<String>,
        /// Waste stream the user asked about.
        trash_type: Option<TrashType>,
    },
    /// Building permits recorded for a single property.
    PermitsSingle {
        /// Free-text street address as spoken by the user.
        address: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Waste streams served by the city's pickup schedule.
pub enum TrashType {
    /// Household trash.
    Trash,
    /// Bulk items.
    Bulk,
    /// Yard waste.
    YardWaste,
    /// Recycling.
    Recycling,
    /// Any other value the agent extracted; looked up verbatim.
    Other(String),
}

impl TrashType {
    /// Key of this waste stream in the waste notifier's `next_pickups` map.
    #[must_use]
    pub fn as_key(&self) -> &str {
        match self {
            TrashType::Trash => "trash",
            TrashType::Bulk => "bulk",
            TrashType::YardWaste => "yard waste",
            TrashType::Recycling => "recycling",
            TrashType::Other(raw) => raw,
        }
    }
}

impl From<&str> for TrashType {
    fn from(raw: &str) -> Self {
        match raw {
            "trash" => TrashType::Trash,
            "bulk" => TrashType::Bulk,
            "yard waste" => TrashType::YardWaste,
            "recycling" => TrashType::Recycling,
            other => TrashType::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for TrashType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_key())
    }
}

#[derive(Debug, Clone, Default)]
/// Next pickup dates reported by the waste notifier, as written in the payload.
///
/// Dates stay unparsed until a stream is asked for, so a malformed entry only
/// affects lookups of that stream.
pub struct TrashSchedule {
    /// Raw pickup dates keyed by the notifier's waste stream name.
    pub next_pickups: HashMap<String, String>,
}

impl TrashSchedule {
    /// Next pickup for the given waste stream.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::UnknownTrashType`] when the notifier reported no
    /// date for the stream, or [`PortError::Parse`] when the date is malformed.
    pub fn next_pickup(&self, trash_type: &TrashType) -> Result<NaiveDate, PortError> {
        let raw = self
            .next_pickups
            .get(trash_type.as_key())
            .ok_or_else(|| PortError::UnknownTrashType(trash_type.to_string()))?;

        parse_pickup_date(raw)
    }
}

/// Parse the notifier's date strings, keeping the calendar date as written.
///
/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS[.fff]` timestamps,
/// and bare `YYYY-MM-DD` dates.
///
/// # Errors
///
/// Returns [`PortError::Parse`] when none of the formats match.
pub fn parse_pickup_date(raw: &str) -> Result<NaiveDate, PortError> {
    let raw = raw.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.date_naive());
    }

    if let Some(timestamp) = DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    {
        return Ok(timestamp.date());
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(PortError::from)
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A single building permit.
pub struct Permit {
    /// Permit number as issued by the city.
    pub permit_no: String,
    /// Building permit type, e.g. "Building" or "Electrical".
    pub permit_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Permits attached to one parcel returned by the geocoder.
pub struct AddressMatch {
    /// Total number of permits the API reports for the parcel.
    pub total_count: u64,
    /// Permit nodes returned with the parcel.
    pub permits: Vec<Permit>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Permit lookup result for an address.
pub struct PermitQueryResponse {
    /// Permit count of the first geocoder match, zero when nothing matched.
    pub total_count: u64,
    /// Permits across every match, in the order the API returned them.
    pub permits: Vec<Permit>,
}

impl PermitQueryResponse {
    /// Collapse geocoder matches into a single response.
    ///
    /// Only the first match contributes to `total_count`, while `permits`
    /// holds the permits of every match.
    #[must_use]
    pub fn from_matches(matches: Vec<AddressMatch>) -> Self {
        let total_count = matches.first().map_or(0, |first| first.total_count);
        let permits = matches
            .into_iter()
            .flat_map(|address_match| address_match.permits)
            .collect();

        Self {
            total_count,
            permits,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Follow-up question that expects a yes/no answer.
pub struct Prompt {
    /// Question read back to the user.
    pub question: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Text a handler wants sent back to the conversational platform.
pub struct OutboundReply {
    /// Plain text fragments, in order.
    pub fragments: Vec<String>,
    /// Optional yes/no follow-up.
    pub prompt: Option<Prompt>,
}

impl OutboundReply {
    /// Empty reply.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text fragment.
    #[must_use]
    pub fn add<S: Into<String>>(mut self, text: S) -> Self {
        self.fragments.push(text.into());
        self
    }

    /// Attach a yes/no follow-up question.
    #[must_use]
    pub fn ask<S: Into<String>>(mut self, question: S) -> Self {
        self.prompt = Some(Prompt {
            question: question.into(),
        });
        self
    }

    /// Check whether the reply carries nothing to say.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty() && self.prompt.is_none()
    }
}

//! Reply texts sent back to the user for each intent.

use chrono::{Datelike, NaiveDate};

use crate::model::{OutboundReply, PermitQueryResponse, TrashType};

/// Greeting for the welcome intent.
pub const WELCOME: &str = "Welcome to my agent!";
/// First fallback fragment.
pub const FALLBACK_NOT_UNDERSTOOD: &str = "I didn't understand";
/// Second fallback fragment.
pub const FALLBACK_RETRY: &str = "I'm sorry, can you try again?";
/// Sent when the pickup schedule could not be retrieved.
pub const TRASH_UNAVAILABLE: &str =
    "Sorry we're taking a little longer on our side than expected. Please try again soon.";
/// Sent when a property has no permits on record.
pub const NO_PERMITS: &str = "This property does not currently have any building permits.";
/// Largest permit count that is still read out in full.
pub const MAX_LISTED_PERMITS: u64 = 4;

/// Reply to the welcome intent.
#[must_use]
pub fn welcome() -> OutboundReply {
    OutboundReply::new().add(WELCOME)
}

/// Reply to the fallback intent.
#[must_use]
pub fn fallback() -> OutboundReply {
    OutboundReply::new()
        .add(FALLBACK_NOT_UNDERSTOOD)
        .add(FALLBACK_RETRY)
}

/// Announce the next pickup of `trash_type`.
///
/// "Today" is decided by day-of-month alone, so a pickup on the same day of
/// next month is also reported as today.
#[must_use]
pub fn trash_pickup(trash_type: &TrashType, pickup: NaiveDate, today: NaiveDate) -> OutboundReply {
    let day = if pickup.day() == today.day() {
        String::from("today")
    } else {
        pickup.format("%A").to_string()
    };

    OutboundReply::new().add(format!("Your next {trash_type} pickup is {day}."))
}

/// Apology sent when the pickup lookup failed.
#[must_use]
pub fn trash_unavailable() -> OutboundReply {
    OutboundReply::new().add(TRASH_UNAVAILABLE)
}

/// Describe the permits on record for a property.
#[must_use]
pub fn permits(response: &PermitQueryResponse) -> OutboundReply {
    let total = response.total_count;

    if total == 0 {
        return OutboundReply::new().add(NO_PERMITS);
    }

    if total > MAX_LISTED_PERMITS {
        return OutboundReply::new().ask(format!(
            "This property has {total} permits. There are too many to list, \
             would you like this information texted or emailed to you?"
        ));
    }

    let listing = response
        .permits
        .iter()
        .map(|permit| {
            format!(
                "Number: {}, Type: {}.",
                permit.permit_no, permit.permit_type
            )
        })
        .collect::<Vec<_>>()
        .join(" ");

    OutboundReply::new()
        .add(format!(
            "This property has {total} permits. They are as follows:"
        ))
        .add(listing)
}

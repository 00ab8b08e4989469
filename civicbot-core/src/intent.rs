//! Inbound intent-recognition results and their resolution into [`Intent`]s.

use std::collections::HashMap;

use tracing::warn;

use crate::model::{Intent, TrashType};

/// Display name of the agent's welcome intent.
pub const WELCOME_INTENT: &str = "Default Welcome Intent";
/// Display name of the agent's fallback intent.
pub const FALLBACK_INTENT: &str = "Default Fallback Intent";
/// Display name of the trash pickup intent.
pub const TRASH_INTENT: &str = "trash";
/// Display name of the single-property permits intent.
pub const PERMITS_INTENT: &str = "permits.single";

/// Parameter carrying the user's street address.
pub const ADDRESS_PARAM: &str = "short_address";
/// Parameter carrying the requested waste stream.
pub const TRASH_TYPE_PARAM: &str = "trash_type";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
/// Errors raised by handlers about the request itself.
pub enum RequestError {
    /// A parameter the handler needs was absent or blank.
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),
}

#[derive(Debug, Clone, Default)]
/// Intent name and slot values extracted by the conversational platform.
pub struct InboundRequest {
    /// Display name of the matched intent.
    pub intent_name: String,
    /// Slot values keyed by parameter name.
    pub parameters: HashMap<String, String>,
}

impl InboundRequest {
    /// Construct a request from an intent name and its parameters.
    #[must_use]
    pub fn new<S: Into<String>>(intent_name: S, parameters: HashMap<String, String>) -> Self {
        Self {
            intent_name: intent_name.into(),
            parameters,
        }
    }

    /// Value of a parameter, ignoring blank values.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    fn owned_parameter(&self, name: &str) -> Option<String> {
        self.parameter(name).map(str::to_owned)
    }

    /// Resolve the request into the intent whose handler should run.
    ///
    /// Intent names match exactly and case-sensitively. Names without a
    /// registered handler resolve to [`Intent::Fallback`]. Absent or blank
    /// parameters resolve to `None` and are left for the handler to answer.
    #[must_use]
    pub fn resolve(&self) -> Intent {
        match self.intent_name.as_str() {
            WELCOME_INTENT => Intent::Welcome,
            FALLBACK_INTENT => Intent::Fallback,
            TRASH_INTENT => Intent::Trash {
                address: self.owned_parameter(ADDRESS_PARAM),
                trash_type: self.parameter(TRASH_TYPE_PARAM).map(TrashType::from),
            },
            PERMITS_INTENT => Intent::PermitsSingle {
                address: self.owned_parameter(ADDRESS_PARAM),
            },
            unknown => {
                warn!(intent = unknown, "No handler registered for intent, using fallback");
                Intent::Fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(intent: &str, params: &[(&str, &str)]) -> InboundRequest {
        let parameters = params
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        InboundRequest::new(intent, parameters)
    }

    #[test]
    fn resolves_registered_intents() {
        assert_eq!(request(WELCOME_INTENT, &[]).resolve(), Intent::Welcome, "welcome");
        assert_eq!(request(FALLBACK_INTENT, &[]).resolve(), Intent::Fallback, "fallback");
        assert_eq!(
            request(
                TRASH_INTENT,
                &[(ADDRESS_PARAM, "1301 Third St"), (TRASH_TYPE_PARAM, "bulk")]
            )
            .resolve(),
            Intent::Trash {
                address: Some("1301 Third St".to_owned()),
                trash_type: Some(TrashType::Bulk),
            },
            "trash"
        );
        assert_eq!(
            request(PERMITS_INTENT, &[(ADDRESS_PARAM, "1301 Third St")]).resolve(),
            Intent::PermitsSingle {
                address: Some("1301 Third St".to_owned()),
            },
            "permits"
        );
    }

    #[test]
    fn intent_names_are_case_sensitive() {
        assert_eq!(
            request("Trash", &[(ADDRESS_PARAM, "1301 Third St")]).resolve(),
            Intent::Fallback,
            "no case folding"
        );
        assert_eq!(
            request("permits.single.extra", &[]).resolve(),
            Intent::Fallback,
            "no prefix matching"
        );
    }

    #[test]
    fn missing_or_blank_parameters_still_reach_the_handler() {
        assert_eq!(
            request(
                TRASH_INTENT,
                &[(ADDRESS_PARAM, "1301 Third St"), (TRASH_TYPE_PARAM, "")]
            )
            .resolve(),
            Intent::Trash {
                address: Some("1301 Third St".to_owned()),
                trash_type: None,
            },
            "blank trash type"
        );
        assert_eq!(
            request(PERMITS_INTENT, &[(ADDRESS_PARAM, "  ")]).resolve(),
            Intent::PermitsSingle { address: None },
            "blank address"
        );
    }
}

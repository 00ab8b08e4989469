//! Dialogflow ES v2 webhook request and response bodies.

use std::collections::HashMap;

use civicbot_core::{InboundRequest, OutboundReply};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

const YES: &str = "Yes";
const NO: &str = "No";

/// Body Dialogflow posts to the fulfillment webhook
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WebhookRequest {
    #[serde(default)]
    pub session: Option<String>,
    #[serde(default)]
    pub response_id: Option<String>,
    pub query_result: QueryResult,
    // originalDetectIntentRequest is not used
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueryResult {
    #[serde(default)]
    pub query_text: Option<String>,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    pub intent: IntentRef,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IntentRef {
    pub display_name: String,
}

impl WebhookRequest {
    /// Intent name and textual slot values.
    ///
    /// Scalar parameters are stringified; lists and objects are dropped.
    pub(crate) fn into_inbound(self) -> InboundRequest {
        let parameters = self
            .query_result
            .parameters
            .into_iter()
            .filter_map(|(name, value)| parameter_text(value).map(|text| (name, text)))
            .collect::<HashMap<_, _>>();

        InboundRequest::new(self.query_result.intent.display_name, parameters)
    }
}

fn parameter_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Body returned to Dialogflow
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WebhookResponse {
    pub fulfillment_text: String,
    pub fulfillment_messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

/// One rich message; exactly one field is set
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Text>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_replies: Option<QuickReplies>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Text {
    pub text: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuickReplies {
    pub title: String,
    pub quick_replies: Vec<String>,
}

impl Message {
    fn text<S: Into<String>>(text: S) -> Self {
        Self {
            text: Some(Text {
                text: vec![text.into()],
            }),
            ..Self::default()
        }
    }

    fn yes_no<S: Into<String>>(title: S) -> Self {
        Self {
            quick_replies: Some(QuickReplies {
                title: title.into(),
                quick_replies: vec![YES.to_owned(), NO.to_owned()],
            }),
            ..Self::default()
        }
    }
}

impl From<OutboundReply> for WebhookResponse {
    fn from(reply: OutboundReply) -> Self {
        let mut spoken = reply.fragments.clone();
        let mut messages = reply
            .fragments
            .into_iter()
            .map(Message::text)
            .collect::<Vec<_>>();
        let mut payload = None;

        if let Some(prompt) = reply.prompt {
            spoken.push(prompt.question.clone());
            messages.push(Message::text(prompt.question.clone()));
            messages.push(Message::yes_no(prompt.question.clone()));
            // Actions on Google keeps the microphone open only when asked to
            payload = Some(json!({
                "google": {
                    "expectUserResponse": true,
                    "richResponse": {
                        "items": [{ "simpleResponse": { "textToSpeech": prompt.question } }],
                        "suggestions": [{ "title": YES }, { "title": NO }]
                    }
                }
            }));
        }

        Self {
            fulfillment_text: spoken.join(" "),
            fulfillment_messages: messages,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_parameters_become_text() {
        let body = json!({
            "responseId": "b3a6c1f2",
            "session": "projects/civicbot/agent/sessions/42",
            "queryResult": {
                "queryText": "when is bulk pickup at 1301 third",
                "parameters": {
                    "short_address": "1301 Third St",
                    "trash_type": "bulk",
                    "house_number": 1301,
                    "tags": ["a", "b"]
                },
                "intent": { "name": "projects/civicbot/agent/intents/7", "displayName": "trash" }
            }
        });

        let request = serde_json::from_value::<WebhookRequest>(body)
            .expect("valid body")
            .into_inbound();

        assert_eq!(request.intent_name, "trash", "display name");
        assert_eq!(request.parameter("short_address"), Some("1301 Third St"), "address");
        assert_eq!(request.parameter("trash_type"), Some("bulk"), "type");
        assert_eq!(request.parameter("house_number"), Some("1301"), "number");
        assert_eq!(request.parameter("tags"), None, "lists are dropped");
    }

    #[test]
    fn plain_reply_serializes_one_text_message_per_fragment() {
        let reply = OutboundReply::new().add("I didn't understand").add("Try again?");
        let body = serde_json::to_value(WebhookResponse::from(reply)).expect("serialize");

        assert_eq!(
            body,
            json!({
                "fulfillmentText": "I didn't understand Try again?",
                "fulfillmentMessages": [
                    { "text": { "text": ["I didn't understand"] } },
                    { "text": { "text": ["Try again?"] } }
                ]
            }),
            "wire format"
        );
    }

    #[test]
    fn prompt_adds_quick_replies_and_keeps_conversation_open() {
        let reply = OutboundReply::new().ask("Text it to you?");
        let body = serde_json::to_value(WebhookResponse::from(reply)).expect("serialize");

        assert_eq!(body["fulfillmentText"], "Text it to you?", "spoken text");
        assert_eq!(
            body["fulfillmentMessages"][1],
            json!({ "quickReplies": { "title": "Text it to you?", "quickReplies": ["Yes", "No"] } }),
            "yes/no chips"
        );
        assert_eq!(
            body["payload"]["google"]["expectUserResponse"],
            true,
            "expects an answer"
        );
    }

    #[test]
    fn empty_reply_has_no_messages() {
        let body = serde_json::to_value(WebhookResponse::from(OutboundReply::new())).expect("serialize");
        assert_eq!(
            body,
            json!({ "fulfillmentText": "", "fulfillmentMessages": [] }),
            "nothing to say"
        );
    }
}

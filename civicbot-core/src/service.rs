//! Intent dispatcher tying the data-source ports to the reply formatter.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{debug, error};

use crate::backend::Backends;
use crate::intent::{ADDRESS_PARAM, RequestError, TRASH_TYPE_PARAM};
use crate::model::{Intent, OutboundReply, TrashType};
use crate::ports::PortError;
use crate::reply;

#[derive(thiserror::Error, Debug)]
/// Failures a handler recovered from while building its reply.
pub enum FulfillmentError {
    /// The request lacked a parameter the handler needs.
    #[error(transparent)]
    Request(#[from] RequestError),
    /// A data source failed or returned something unusable.
    #[error(transparent)]
    Port(#[from] PortError),
}

/// Outcome of running one intent handler.
#[derive(Debug)]
pub struct Fulfillment {
    /// Reply to send back to the platform.
    pub reply: OutboundReply,
    /// Failure the handler swallowed, kept for diagnostics.
    pub failure: Option<FulfillmentError>,
}

impl Fulfillment {
    fn replied(reply: OutboundReply) -> Self {
        Self {
            reply,
            failure: None,
        }
    }

    fn failed(reply: OutboundReply, failure: FulfillmentError) -> Self {
        Self {
            reply,
            failure: Some(failure),
        }
    }
}

/// Public entry point for fulfilling resolved intents.
pub struct FulfillmentService {
    backends: Arc<Backends>,
}

impl FulfillmentService {
    /// Create a new service bound to the provided data sources.
    #[must_use]
    pub fn new(backends: Arc<Backends>) -> Self {
        Self { backends }
    }

    /// Run the handler for `intent` against the local calendar date.
    pub async fn fulfill(&self, intent: Intent) -> Fulfillment {
        self.fulfill_on(intent, Local::now().date_naive()).await
    }

    /// Run the handler for `intent`, treating `today` as the current date.
    ///
    /// Failures never escape: the trash handler answers with an apology, the
    /// permits handler answers with nothing. Both report the failure in
    /// [`Fulfillment::failure`].
    pub async fn fulfill_on(&self, intent: Intent, today: NaiveDate) -> Fulfillment {
        match intent {
            Intent::Welcome => Fulfillment::replied(reply::welcome()),
            Intent::Fallback => Fulfillment::replied(reply::fallback()),
            Intent::Trash {
                address,
                trash_type,
            } => match self.trash(address, trash_type, today).await {
                Ok(reply) => Fulfillment::replied(reply),
                Err(err) => {
                    error!(error = %err, "Trash schedule lookup failed");
                    Fulfillment::failed(reply::trash_unavailable(), err)
                }
            },
            Intent::PermitsSingle { address } => match self.permits(address).await {
                Ok(reply) => Fulfillment::replied(reply),
                Err(err) => {
                    error!(error = %err, "Permit lookup failed");
                    Fulfillment::failed(OutboundReply::new(), err)
                }
            },
        }
    }

    async fn trash(
        &self,
        address: Option<String>,
        trash_type: Option<TrashType>,
        today: NaiveDate,
    ) -> Result<OutboundReply, FulfillmentError> {
        let address = required(address, ADDRESS_PARAM)?;
        let trash_type = required(trash_type, TRASH_TYPE_PARAM)?;

        let schedule = self.backends.waste.schedule(&address).await?;
        debug!(?schedule, address = %address, "Waste notifier schedule");

        let pickup = schedule.next_pickup(&trash_type)?;
        Ok(reply::trash_pickup(&trash_type, pickup, today))
    }

    async fn permits(&self, address: Option<String>) -> Result<OutboundReply, FulfillmentError> {
        let address = required(address, ADDRESS_PARAM)?;

        let response = self.backends.permits.permits(&address).await?;
        debug!(total = response.total_count, address = %address, "Permit lookup succeeded");

        Ok(reply::permits(&response))
    }
}

fn required<T>(value: Option<T>, name: &'static str) -> Result<T, RequestError> {
    value.ok_or(RequestError::MissingParameter(name))
}

//! Provider implementation for Detroit's waste notifier API.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use civicbot_core::{
    model::TrashSchedule,
    ports::{PortError, WastePort},
};

/// Address lookup root of the public waste notifier API.
pub const DEFAULT_BASE_URL: &str = "https://apis.detroitmi.gov/waste_notifier/address";

/// Response from /address/{address}/
#[derive(Debug, Deserialize)]
struct AddressResponse {
    // { "<stream>": { "date": "2026-10-19T00:00:00", ... }, ... }
    // entries are kept loose so one odd stream can't sink the others
    next_pickups: HashMap<String, Value>,
    // address, city_id, routes etc. exist but we don't need them
}

/// Pickup schedule lookup against the waste notifier.
pub struct WasteNotifierPort {
    client: Client,
    base_url: String,
}

impl WasteNotifierPort {
    /// Create a new port bound to the given HTTP client and API root.
    #[must_use]
    pub fn new<S: Into<String>>(client: Client, base_url: S) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { client, base_url }
    }

    /// URL of the lookup for `address`, with the address percent-encoded
    /// into a single path segment.
    #[must_use]
    pub fn address_url(&self, address: &str) -> String {
        format!("{}/{}/", self.base_url, urlencoding::encode(address))
    }
}

#[async_trait]
impl WastePort for WasteNotifierPort {
    fn endpoint(&self) -> &str {
        &self.base_url
    }

    async fn schedule(&self, address: &str) -> Result<TrashSchedule, PortError> {
        let url = self.address_url(address);
        debug!(%url, "Requesting waste notifier schedule");

        let req = self.client.get(url).query(&[("format", "json")]);
        let resp = fetch_json::<AddressResponse>(req).await?;

        let next_pickups = resp
            .next_pickups
            .into_iter()
            .filter_map(|(key, entry)| match entry.get("date") {
                Some(Value::String(date)) => Some((key, date.clone())),
                _ => {
                    debug!(stream = %key, ?entry, "Skipping pickup entry without a date");
                    None
                }
            })
            .collect();

        Ok(TrashSchedule { next_pickups })
    }
}

/// Build the waste port for the given API root.
#[must_use]
pub fn port<S: Into<String>>(client: Client, base_url: S) -> Arc<dyn WastePort> {
    Arc::new(WasteNotifierPort::new(client, base_url))
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PortError> {
    req.send()
        .await
        .map_err(PortError::from)?
        .error_for_status()
        .map_err(PortError::from)?
        .json()
        .await
        .map_err(PortError::from)
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, extract::Path, http::StatusCode, routing::get};
    use chrono::NaiveDate;
    use civicbot_core::model::TrashType;
    use tokio::net::TcpListener;

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test server");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("test server");
        });
        format!("http://{addr}/waste_notifier/address")
    }

    fn notifier() -> Router {
        Router::new().route(
            "/waste_notifier/address/{address}/",
            get(|Path(address): Path<String>| async move {
                if address != "1301 Third St" {
                    return Err(StatusCode::NOT_FOUND);
                }
                Ok(Json(serde_json::json!({
                    "address": "1301 Third St",
                    "next_pickups": {
                        "trash": { "date": "2026-10-19T00:00:00", "type": "trash" },
                        "recycling": { "date": "2026-10-26T00:00:00", "type": "recycling" },
                        "yard waste": { "date": "2026-10-22", "type": "yard waste" },
                        "bulk": { "date": "2026-11-02T00:00:00-04:00", "type": "bulk" }
                    }
                })))
            }),
        )
    }

    #[test]
    fn address_is_percent_encoded_into_the_path() {
        let port = WasteNotifierPort::new(Client::new(), format!("{DEFAULT_BASE_URL}/"));
        assert_eq!(
            port.address_url("1301 Third St #2/A"),
            "https://apis.detroitmi.gov/waste_notifier/address/1301%20Third%20St%20%232%2FA/",
            "encoded address"
        );
    }

    #[tokio::test]
    async fn fetches_schedule_for_address() {
        let base_url = serve(notifier()).await;
        let port = WasteNotifierPort::new(Client::new(), base_url);

        let schedule = port.schedule("1301 Third St").await.expect("schedule");

        assert_eq!(
            schedule.next_pickup(&TrashType::Trash).ok(),
            Some(date(2026, 10, 19)),
            "trash"
        );
        assert_eq!(
            schedule.next_pickup(&TrashType::YardWaste).ok(),
            Some(date(2026, 10, 22)),
            "yard waste key with a space"
        );
        assert_eq!(
            schedule.next_pickup(&TrashType::Bulk).ok(),
            Some(date(2026, 11, 2)),
            "bulk"
        );
        assert!(
            matches!(
                schedule.next_pickup(&TrashType::from("compost")),
                Err(PortError::UnknownTrashType(_))
            ),
            "unknown key"
        );
    }

    #[tokio::test]
    async fn null_date_of_another_stream_does_not_break_lookup() {
        let base_url = serve(Router::new().route(
            "/waste_notifier/address/{address}/",
            get(|| async {
                Json(serde_json::json!({
                    "next_pickups": {
                        "trash": { "date": "2026-10-19T00:00:00" },
                        "bulk": { "date": null },
                        "recycling": null
                    }
                }))
            }),
        ))
        .await;
        let port = WasteNotifierPort::new(Client::new(), base_url);

        let schedule = port.schedule("1301 Third St").await.expect("schedule");

        assert_eq!(
            schedule.next_pickup(&TrashType::Trash).ok(),
            Some(date(2026, 10, 19)),
            "trash date still readable"
        );
        assert!(
            matches!(
                schedule.next_pickup(&TrashType::Bulk),
                Err(PortError::UnknownTrashType(ref key)) if key == "bulk"
            ),
            "null date reads as no pickup"
        );
        assert!(
            matches!(
                schedule.next_pickup(&TrashType::Recycling),
                Err(PortError::UnknownTrashType(_))
            ),
            "null entry reads as no pickup"
        );
    }

    #[tokio::test]
    async fn non_success_status_is_a_network_error() {
        let base_url = serve(notifier()).await;
        let port = WasteNotifierPort::new(Client::new(), base_url);

        let result = port.schedule("nowhere").await;
        assert!(matches!(result, Err(PortError::Network(_))), "404 surfaces as error");
    }

    #[tokio::test]
    async fn unexpected_payload_is_an_error() {
        let base_url = serve(Router::new().route(
            "/waste_notifier/address/{address}/",
            get(|| async { Json(serde_json::json!({ "error": "address not found" })) }),
        ))
        .await;
        let port = WasteNotifierPort::new(Client::new(), base_url);

        assert!(port.schedule("1301 Third St").await.is_err(), "missing next_pickups");
    }
}

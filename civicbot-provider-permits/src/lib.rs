//! Provider implementation for building permits using the open data GraphQL API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use civicbot_core::{
    model::{AddressMatch, Permit, PermitQueryResponse},
    ports::{PermitPort, PortError},
};

/// GraphQL endpoint of the open data service.
pub const DEFAULT_ENDPOINT: &str = "https://detroit-opendata.ngrok.io/graphql";

const GRAPHQL_CONTENT_TYPE: &str = "application/graphql";
const UNKNOWN_FIELD: &str = "unknown";

/// Top-level GraphQL envelope
#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<QueryData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryData {
    geocode_address: Connection<Parcel>,
}

/// Relay-style connection, `{ edges: [{ node }] }`
#[derive(Debug, Deserialize)]
struct Connection<T> {
    edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
struct Edge<T> {
    node: T,
}

/// Parcel matched by the geocoder
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Parcel {
    permits_by_parcelno: PermitConnection,
    // parcelno, address and wkbGeometry are selected but unused
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PermitConnection {
    total_count: u64,
    edges: Vec<Edge<PermitNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PermitNode {
    permit_no: Option<String>,
    bld_permit_type: Option<String>,
}

/// Permit lookup against the GraphQL API.
pub struct GraphqlPermitPort {
    client: Client,
    endpoint: String,
}

impl GraphqlPermitPort {
    /// Create a new port bound to the given HTTP client and endpoint.
    #[must_use]
    pub fn new<S: Into<String>>(client: Client, endpoint: S) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl PermitPort for GraphqlPermitPort {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn permits(&self, address: &str) -> Result<PermitQueryResponse, PortError> {
        let query = permits_query(address);
        debug!(endpoint = %self.endpoint, "Querying permits");

        let req = self
            .client
            .post(self.endpoint.as_str())
            .header(CONTENT_TYPE, GRAPHQL_CONTENT_TYPE)
            .body(query);

        let resp = fetch_json::<GraphqlResponse>(req).await?;

        let Some(data) = resp.data else {
            let messages = resp
                .errors
                .into_iter()
                .map(|err| err.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(PortError::Internal(format!(
                "GraphQL response carried no data: {messages}"
            )));
        };

        let matches = data
            .geocode_address
            .edges
            .into_iter()
            .map(|edge| address_match(edge.node))
            .collect();

        Ok(PermitQueryResponse::from_matches(matches))
    }
}

/// Build the permits port for the given endpoint.
#[must_use]
pub fn port<S: Into<String>>(client: Client, endpoint: S) -> Arc<dyn PermitPort> {
    Arc::new(GraphqlPermitPort::new(client, endpoint))
}

/// GraphQL query for the permits of every parcel matching `address`.
///
/// The address is interpolated as-is. Quotes or braces in it end up in the
/// query text unescaped.
#[must_use]
pub fn permits_query(address: &str) -> String {
    format!(
        r#"{{
  geocodeAddress(address: "{address}") {{
    edges {{
      node {{
        parcelno
        address
        wkbGeometry
        permitsByParcelno {{
          totalCount
          edges {{
            node {{
              permitNo
              bldPermitType
            }}
          }}
        }}
      }}
    }}
  }}
}}"#
    )
}

fn address_match(parcel: Parcel) -> AddressMatch {
    let permits = parcel
        .permits_by_parcelno
        .edges
        .into_iter()
        .map(|edge| Permit {
            permit_no: edge.node.permit_no.unwrap_or_else(|| UNKNOWN_FIELD.to_owned()),
            permit_type: edge
                .node
                .bld_permit_type
                .unwrap_or_else(|| UNKNOWN_FIELD.to_owned()),
        })
        .collect();

    AddressMatch {
        total_count: parcel.permits_by_parcelno.total_count,
        permits,
    }
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

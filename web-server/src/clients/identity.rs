// web-server/src/clients/identity.rs
use common::models::vehicle::Vehicle;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::error::Result;

const SERVICE: &str = "identity API";

/// Fixed page size; later pages are never requested
pub const VEHICLE_PAGE_SIZE: u32 = 10;

const VEHICLES_QUERY: &str = r#"
query VehiclesByOwner($owner: Address!, $first: Int!) {
    vehicles(first: $first, filterBy: { owner: $owner }) {
        nodes {
            tokenId
            earnings {
                totalTokens
            }
            definition {
                make
                model
                year
            }
            aftermarketDevice {
                address
                serial
                manufacturer {
                    name
                }
            }
        }
    }
}"#;

#[derive(Deserialize)]
struct VehiclesData {
    vehicles: VehicleConnection,
}

#[derive(Deserialize)]
struct VehicleConnection {
    #[serde(default)]
    nodes: Vec<Vehicle>,
}

/// Vehicle ownership lookups
#[derive(Clone)]
pub struct IdentityClient {
    http: Client,
    url: String,
}

impl IdentityClient {
    pub fn new(http: Client, url: &str) -> Self {
        Self {
            http,
            url: url.to_string(),
        }
    }

    /// Vehicles owned by `owner`, at most one page
    pub async fn vehicles_owned_by(&self, owner: &str, id_token: &str) -> Result<Vec<Vehicle>> {
        let data: VehiclesData = super::post_graphql(
            &self.http,
            SERVICE,
            &self.url,
            id_token,
            VEHICLES_QUERY,
            json!({ "owner": owner, "first": VEHICLE_PAGE_SIZE }),
        )
        .await?;

        tracing::debug!(owner, count = data.vehicles.nodes.len(), "Fetched vehicles");
        Ok(data.vehicles.nodes)
    }
}

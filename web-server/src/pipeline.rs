// web-server/src/pipeline.rs
//! Composite lookups behind the `/api` handlers.
//!
//! Every call runs on behalf of one authenticated session and fails as a
//! whole. The one exception is the trip listing on the vehicles page, where a
//! vehicle whose trips cannot be listed is shown without them.

use async_trait::async_trait;
use common::models::session::AuthenticatedSession;
use common::models::trip::Trip;
use common::models::vehicle::Vehicle;
use common::TripMapResponse;

use crate::error::{ApiError, Result};
use crate::geo::build_trace;
use crate::resolution::{resolve_trip, TripCatalog, NO_VEHICLES_FOUND};
use crate::state::AppState;
use crate::status::flatten;

impl AppState {
    /// Cached privilege token for the vehicle, exchanging one if allowed
    pub async fn privilege_token(&self, session: &AuthenticatedSession, token_id: i64) -> Result<String> {
        if let Some(token) = self.privileges.get(&session.privilege_key(token_id)) {
            tracing::debug!(token_id, "Privilege token cache hit");
            return Ok(token);
        }

        if !self.config.exchange.on_demand {
            return Err(ApiError::MissingToken(format!(
                "No privilege token for vehicle {}, exchange one first",
                token_id
            )));
        }

        tracing::debug!(token_id, "Privilege token cache miss, exchanging");
        self.exchange_privilege(session, token_id).await
    }

    /// Exchange the identity token for a vehicle-scoped privilege token and cache it
    pub async fn exchange_privilege(&self, session: &AuthenticatedSession, token_id: i64) -> Result<String> {
        let token = self.upstream.exchange.exchange(&session.id_token, token_id).await?;
        self.privileges.put_default(session.privilege_key(token_id), token.clone());

        tracing::info!(token_id, wallet = %session.wallet_address, "Privilege token exchanged");
        Ok(token)
    }

    /// Exchange for the first vehicle the wallet owns
    pub async fn exchange_for_first_vehicle(&self, session: &AuthenticatedSession) -> Result<String> {
        let vehicles = self.vehicles_for(session).await?;
        let first = vehicles
            .first()
            .ok_or_else(|| ApiError::NotFound(NO_VEHICLES_FOUND.to_string()))?;

        self.exchange_privilege(session, first.token_id).await
    }

    pub async fn vehicles_for(&self, session: &AuthenticatedSession) -> Result<Vec<Vehicle>> {
        self.upstream
            .identity
            .vehicles_owned_by(&session.wallet_address, &session.id_token)
            .await
    }

    /// Vehicles with their latest trips and, when a device data API is configured,
    /// their flattened device status
    pub async fn vehicles_with_details(&self, session: &AuthenticatedSession) -> Result<Vec<Vehicle>> {
        let mut vehicles = self.vehicles_for(session).await?;

        for vehicle in &mut vehicles {
            match self.trips_for(session, vehicle.token_id).await {
                Ok(trips) => vehicle.trips = trips,
                Err(e) => tracing::warn!(token_id = vehicle.token_id, "Failed to list trips for vehicle: {}", e),
            }
        }

        if let Some(device_data) = &self.upstream.device_data {
            for vehicle in &mut vehicles {
                let token = self.privilege_token(session, vehicle.token_id).await?;
                let status = device_data.raw_status(vehicle.token_id, &token).await?;
                vehicle.device_status_entries = flatten(&status);
            }
        }

        Ok(vehicles)
    }

    /// Latest trips of a vehicle. Every listed trip is recorded in the reverse index.
    pub async fn trips_for(&self, session: &AuthenticatedSession, token_id: i64) -> Result<Vec<Trip>> {
        let token = self.privilege_token(session, token_id).await?;
        let trips = self.upstream.trips.list_trips(token_id, &token).await?;

        for trip in &trips {
            self.trip_index.record(&trip.id, token_id);
        }

        Ok(trips)
    }

    /// Resolve a trip and turn its telemetry into a colored GeoJSON trace
    pub async fn trip_trace(
        &self,
        session: &AuthenticatedSession,
        trip_id: &str,
        window: Option<(String, String)>,
    ) -> Result<TripMapResponse> {
        let catalog = SessionCatalog { state: self, session };
        let trip = resolve_trip(
            self.trip_index.as_ref(),
            &catalog,
            trip_id,
            window,
            self.config.trips.lookup_fallback,
        )
        .await?;

        let token = self.privilege_token(session, trip.token_id).await?;
        let samples = self
            .upstream
            .telemetry
            .location_samples(trip.token_id, &trip.start, &trip.end, &token)
            .await?;

        tracing::debug!(trip_id, points = samples.len(), "Built trip trace");
        Ok(build_trace(&samples, &trip))
    }
}

/// Vehicles and trips as seen by one session
struct SessionCatalog<'a> {
    state: &'a AppState,
    session: &'a AuthenticatedSession,
}

#[async_trait]
impl TripCatalog for SessionCatalog<'_> {
    async fn vehicles(&self) -> Result<Vec<Vehicle>> {
        self.state.vehicles_for(self.session).await
    }

    async fn trips(&self, token_id: i64) -> Result<Vec<Trip>> {
        self.state.trips_for(self.session, token_id).await
    }
}

pub mod geojson;
pub mod session;
pub mod telemetry;
pub mod trip;
pub mod vehicle;

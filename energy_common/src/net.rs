//! Shared networking constants and helpers used by server and client.

/// Default HTTP port for the dashboard server.
pub const DEFAULT_PORT: u16 = 3000;
/// Path of the dashboard snapshot endpoint.
pub const ENERGY_DATA_PATH: &str = "/api/energy-data";
/// Path of the liveness endpoint.
pub const HEALTH_PATH: &str = "/health";

/// Join a server base URL and an endpoint path without doubling slashes.
pub fn endpoint_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

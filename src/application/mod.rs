// Application layer - Use cases and the risk/alert engine
pub mod alert_generator;
pub mod alert_store;
pub mod environment_gateway;
pub mod fallback;
pub mod refresh_scheduler;
pub mod risk_scoring;
pub mod session;
pub mod snapshot_service;

#[cfg(test)]
pub mod test_support;

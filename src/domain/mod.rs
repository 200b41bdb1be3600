// Domain layer - Value types and pure models
pub mod alert;
pub mod environment;
pub mod error;
pub mod geo;
pub mod risk;
pub mod snapshot;
pub mod terrain;

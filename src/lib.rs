mod api;
mod config;
mod errors;
mod middleware;
mod models;
mod records;
mod security;
mod startup;
mod store;
mod telemetry;

pub use api::*;
pub use config::*;
pub use errors::*;
pub use middleware::*;
pub use models::*;
pub use records::*;
pub use security::*;
pub use startup::*;
pub use store::*;
pub use telemetry::*;

//! HTTP API handlers for sentir-fusion
//!
//! Thin JSON surface over `FusionEngine`; every handler shares `AppState`.

pub mod analyze;
pub mod health;
pub mod info;

pub use analyze::analyze_routes;
pub use health::health_routes;
pub use info::info_routes;

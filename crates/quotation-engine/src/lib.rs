pub mod config;
pub mod error;
pub mod pricing;
pub mod quotations;
pub mod telemetry;

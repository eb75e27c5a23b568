pub mod api;
pub mod config;
pub mod connectors;
pub mod core;
pub mod error;
pub mod events;
pub mod funding;
pub mod interfaces;
pub mod observability;
pub mod report;
pub mod risk;
pub mod settlement;
pub mod types;
pub mod utils;

pub mod client;
pub mod config;
pub mod events;
pub mod health;
pub mod jobs;
pub mod render;
pub mod reporting;
pub mod session;
pub mod telemetry;

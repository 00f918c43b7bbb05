pub mod admin;
pub mod config;
pub mod error;
pub mod http;
pub mod outcome;
pub mod submission;
pub mod telemetry;

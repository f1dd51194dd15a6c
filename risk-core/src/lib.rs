//! Core library for the `risk` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - The HTTP client for the risk assessment service
//! - The view contract and the request handler that drives it
//! - Shared domain models (coordinates, replies, weather rows)
//!
//! It is used by `risk-cli`, but can also be reused by other front ends.

pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod model;
pub mod view;

pub use client::{HttpRiskClient, RiskAssessor};
pub use config::Config;
pub use error::TransportError;
pub use handler::{RequestOutcome, RiskRequestHandler, render_weather_table};
pub use model::{AssessmentResponse, Coordinates, WeatherData, WeatherRow};
pub use view::{MemoryView, RiskView};

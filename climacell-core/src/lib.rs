//! Client library for the ClimaCell v3 hourly forecast API.
//!
//! This crate defines:
//! - Query construction for the hourly forecast endpoint
//! - The HTTP client and its typed error taxonomy
//! - Response models with explicit handling of missing and `null` measurements
//! - On-disk configuration (API key, base URL, timeout)
//!
//! It is used by `climacell-cli`, but can also be reused by other binaries or services.
//!
//! ```no_run
//! use climacell_core::{Client, ForecastQuery, Reading};
//!
//! # async fn run() -> Result<(), climacell_core::ForecastError> {
//! let client = Client::new("my-api-key")?;
//! let query = ForecastQuery::new()
//!     .with_coordinate(42.3826, -71.146)
//!     .with_field("temp");
//!
//! for sample in client.hourly_forecast(&query).await? {
//!     if let Reading::Present(temp) = sample.temperature() {
//!         println!("{}: {temp}", sample.observed_at());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod query;

pub use client::{Client, ForecastProvider};
pub use config::{ClientConfig, Config};
pub use error::{ApiErrorResponse, ForecastError};
pub use model::{FloatValue, Reading, TimeValue, WeatherSample};
pub use query::{Coordinate, ForecastQuery, UnitSystem};

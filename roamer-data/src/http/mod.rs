//! HTTP clients for the geocoding, path-routing and optimisation services.
//!
//! Each adapter implements one of the `roamer-core` service traits on top of
//! a shared `reqwest` client configured through [`HttpServiceConfig`].
//! Transport failures map onto [`roamer_core::ServiceCallError`]: timeouts to
//! `Timeout`, HTTP error statuses to `Http` and everything else to `Network`.
//! Error payloads from the services become `Rejected`.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use roamer_data::http::{HttpOrderOptimizer, HttpPathRouter, HttpServiceConfig};
//!
//! let config = HttpServiceConfig::default()
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("my-app/1.0");
//! let router = HttpPathRouter::with_config("http://localhost:5000/route", config.clone())?;
//! let optimizer = HttpOrderOptimizer::with_config("http://localhost:5001/optimize", config)?;
//! # Ok::<(), roamer_data::http::ClientBuildError>(())
//! ```

mod config;
mod geocoder;
mod optimizer;
mod router;
mod transport;
pub mod wire;

pub use config::{ClientBuildError, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, HttpServiceConfig};
pub use geocoder::HttpGeocoder;
pub use optimizer::HttpOrderOptimizer;
pub use router::HttpPathRouter;

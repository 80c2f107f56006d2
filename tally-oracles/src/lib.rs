//! tally-oracles: HTTP-backed oracle implementations for tally
//!
//! `tally-core` defines four oracle capabilities (answer classification,
//! follow-up relevance, importance scoring, narrative generation) as
//! traits and stays free of network I/O. This crate provides the real
//! implementations:
//!
//! - **Ollama** - [`OllamaOracle`] runs all four capabilities against a
//!   local Ollama instance
//!
//! Construct one oracle and hand it to the scheduler for every seam:
//!
//! ```no_run
//! use std::sync::Arc;
//! use tally_core::AdaptiveScheduler;
//! use tally_oracles::OllamaOracle;
//!
//! let oracle = Arc::new(OllamaOracle::from_env("llama3.1"));
//! let scheduler = AdaptiveScheduler::new(
//!     oracle.clone(),
//!     oracle.clone(),
//!     oracle.clone(),
//!     oracle,
//! );
//! ```

pub mod ollama;

pub use ollama::{HealthStatus, OllamaOracle};

//! LeadGen Pro Library
//!
//! Lead scoring, throttled company enrichment and the in-memory lead
//! dashboard behind the LeadGen Pro HTTP API.
//!
//! # Modules
//!
//! - `circuit_breaker`: Circuit breakers guarding external lookups.
//! - `config`: Configuration management.
//! - `enrichment`: Company enrichment cascade.
//! - `errors`: Error handling types.
//! - `generator`: Prospect list generation from the built-in catalog.
//! - `handlers`: HTTP request handlers.
//! - `models`: Core data models.
//! - `rate_limiter`: Minimum-interval gate for enrichment calls.
//! - `scoring`: Lead scoring.
//! - `services`: External company-data clients (Clearbit, OpenCorporates).
//! - `store`: In-memory lead store and dashboard metrics.

pub mod circuit_breaker;
pub mod config;
pub mod enrichment;
pub mod errors;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod rate_limiter;
pub mod scoring;
pub mod services;
pub mod store;

//! Library root for the `churnwatch` crate
//!
//! A customer churn predictor: a fixed encode -> scale -> reorder ->
//! predict sequence over four pre-fitted, read-only artifacts.

// Core error handling
pub mod api_errors;
pub mod errors;

// Input record and feature encoding
pub mod artifacts;
pub mod encoder;
pub mod feature_frame;
pub mod profile;

// Prediction runtime
pub mod predictor_core;
pub mod risk;

// Configuration & CLI
pub mod cli;
pub mod config_loader;

// Web server interface
pub mod churnweb;

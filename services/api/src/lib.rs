//! services/api/src/lib.rs
//!
//! HTTP service for the voice journal: adapters for the core ports, configuration,
//! and the Axum web layer.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;

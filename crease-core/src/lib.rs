//! # Crease Core Library
//!
//! Data core of the Crease coaching application:
//! - Entity store (players, assessments, metrics, problem areas, videos)
//!   with interchangeable in-memory and SQLite backends
//! - Current-assessment invariant enforcement
//! - Video gallery filtering
//! - Weekly performance aggregation for trend charts
//! - Media storage interface and configuration loading
//!
//! Routing, request validation and UI rendering live in the service
//! crates that consume this library.

pub mod config;
pub mod db;
pub mod error;
pub mod media;
pub mod series;
pub mod videos;

pub use error::{Error, Result};

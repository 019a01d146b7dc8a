//! Checkin History - Visit Store and Preference Inference
//!
//! A Rust library for recording immutable check-in events and deriving
//! recency-weighted place-category preferences from a user's history.
//!
//! # Features
//!
//! - Append-only visit store backed by SQLite
//! - Recency-weighted preference aggregation (exponential half-life decay)
//! - Per-user category history and store statistics
//! - Export to multiple formats (TXT, CSV, JSON)

/// Configuration management
pub mod config;
/// Database operations and connection pooling
pub mod db;
/// Error types
pub mod error;
/// Visit history export
pub mod export;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Preference aggregation
pub mod preferences;
/// Repository pattern for data access
pub mod repository;
/// Database schema definitions
pub mod schema;
/// High-level check-in service
pub mod service;
/// Input validation and sanitization
pub mod validation;

// Re-export key components for easier access
pub use db::Database;
pub use error::{CheckinError, Result};
pub use models::{Coordinates, DateRange, NewVisit, OutputFormat, PreferenceScore, Visit, VisitStats};
pub use preferences::{score_visits, DecayConfig};
pub use repository::{SqliteVisitRepository, VisitRepository};
pub use service::CheckinService;

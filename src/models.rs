//! Data models for check-in handling and storage
//!
//! This module contains all data structures used throughout the application,
//! including visits, derived preference scores, and store statistics.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees (-90.0 to 90.0)
    pub lat: f64,
    /// Longitude in decimal degrees (-180.0 to 180.0)
    pub long: f64,
}

/// A recorded check-in event for a user at a place
///
/// Visits are immutable facts: once recorded they are never updated or
/// deleted. Insertion order is not guaranteed to match chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visit {
    /// Database primary key (also the insertion-order tiebreaker)
    pub id: i64,
    /// Identifier of the visitor; not unique per record
    pub user_id: i64,
    /// Location of the place, when known
    pub coordinates: Option<Coordinates>,
    /// Free-text place label
    pub place_name: String,
    /// Category tag used as the aggregation key (e.g. "coffee_shop")
    pub place_type: String,
    /// Free-text address
    pub address: Option<String>,
    /// Visit time (UTC)
    pub created_at: NaiveDateTime,
}

/// Data for recording a new visit
#[derive(Debug, Clone)]
pub struct NewVisit {
    /// Identifier of the visitor
    pub user_id: i64,
    /// Location of the place, when known
    pub coordinates: Option<Coordinates>,
    /// Free-text place label
    pub place_name: String,
    /// Category tag used as the aggregation key
    pub place_type: String,
    /// Free-text address
    pub address: Option<String>,
    /// Visit time (UTC)
    pub created_at: NaiveDateTime,
}

/// Date range for filtering visit history
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRange {
    /// Start timestamp (inclusive, optional)
    pub start: Option<NaiveDateTime>,
    /// End timestamp (inclusive, optional)
    pub end: Option<NaiveDateTime>,
}

/// A derived place-category affinity for one user
///
/// Scores are normalized so that a user's scores sum to 1.0. They are
/// computed on demand from the full visit set and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceScore {
    /// Identifier of the visitor
    pub user_id: i64,
    /// Place category (`place_type` of the contributing visits)
    pub category: String,
    /// Normalized recency-weighted affinity in (0.0, 1.0]
    pub score: f64,
}

/// Operational summary of the visit store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitStats {
    /// Total number of recorded visits
    pub total_visits: usize,
    /// Number of distinct users with at least one visit
    pub distinct_users: usize,
    /// Number of distinct place categories seen
    pub distinct_categories: usize,
}

/// Output format for exported visit history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Comma-separated values format
    Csv,
    /// Plain text format
    Txt,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Txt => "txt",
            Self::Json => "json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = crate::error::CheckinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "txt" => Ok(Self::Txt),
            "json" => Ok(Self::Json),
            other => Err(crate::error::CheckinError::InvalidConfig(format!(
                "Unknown output format: {other}"
            ))),
        }
    }
}

impl NewVisit {
    /// Build the stored `Visit` this payload becomes once assigned a row id
    #[must_use]
    pub fn into_visit(self, id: i64) -> Visit {
        Visit {
            id,
            user_id: self.user_id,
            coordinates: self.coordinates,
            place_name: self.place_name,
            place_type: self.place_type,
            address: self.address,
            created_at: self.created_at,
        }
    }
}

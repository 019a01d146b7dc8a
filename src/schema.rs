//! Database schema definitions
//!
//! This module provides constants for table and column names used with rusqlite.

/// Visits table schema
pub mod visits {
    /// Table name
    pub const TABLE: &str = "visits";
    /// Primary key column
    pub const ID: &str = "id";
    /// Visitor identifier column
    pub const USER_ID: &str = "user_id";
    /// Latitude column
    pub const LAT: &str = "lat";
    /// Longitude column
    pub const LONG: &str = "long";
    /// Place name column
    pub const NAME: &str = "name";
    /// Place category column (aggregation key)
    pub const PLACE_TYPE: &str = "place_type";
    /// Free-text address column
    pub const ADDRESS: &str = "address";
    /// Visit timestamp column
    pub const CREATED_AT: &str = "created_at";
}

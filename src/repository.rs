//! Repository pattern for visit data access
//!
//! The `VisitRepository` trait is the seam between the preference logic
//! and the datastore; `SqliteVisitRepository` is the production
//! implementation backed by the pooled SQLite handle in `db`.

use async_trait::async_trait;
use tracing::debug;

use crate::db::Database;
use crate::error::Result;
use crate::models::{DateRange, NewVisit, Visit, VisitStats};
use crate::validation::InputValidator;

/// Durable append-only record of check-ins
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitRepository: Send + Sync {
    /// Append one visit; fails with a validation error if required
    /// fields are missing or malformed
    async fn record_visit(&self, visit: NewVisit) -> Result<Visit>;

    /// Fetch a user's visits, optionally bounded by a timestamp range,
    /// ascending by visit time then insertion order
    async fn list_visits(&self, user_id: i64, range: DateRange) -> Result<Vec<Visit>>;

    /// Distinct place categories a user has visited, most frequent first
    async fn visited_categories(&self, user_id: i64) -> Result<Vec<String>>;

    /// Store-wide statistics
    async fn stats(&self) -> Result<VisitStats>;
}

/// SQLite-backed visit repository
pub struct SqliteVisitRepository {
    database: Database,
}

impl SqliteVisitRepository {
    /// Wrap an existing database handle
    #[must_use]
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Open (or create) the store at the given path or sqlite:// URL
    pub fn open(database_url: &str) -> Result<Self> {
        InputValidator::validate_database_url(database_url)?;
        Ok(Self::new(Database::new(database_url)?))
    }
}

#[async_trait]
impl VisitRepository for SqliteVisitRepository {
    async fn record_visit(&self, visit: NewVisit) -> Result<Visit> {
        InputValidator::validate_new_visit(&visit)?;

        let recorded = self.database.insert_visit(visit)?;
        debug!(
            user_id = recorded.user_id,
            place_type = %recorded.place_type,
            visit_id = recorded.id,
            "Recorded visit"
        );

        Ok(recorded)
    }

    async fn list_visits(&self, user_id: i64, range: DateRange) -> Result<Vec<Visit>> {
        InputValidator::validate_date_range(range.start, range.end)?;
        self.database.get_visits(user_id, range.start, range.end)
    }

    async fn visited_categories(&self, user_id: i64) -> Result<Vec<String>> {
        self.database.get_visited_categories(user_id)
    }

    async fn stats(&self) -> Result<VisitStats> {
        self.database.get_stats()
    }
}

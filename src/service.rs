use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, Utc};
use tracing::info;

use crate::error::Result;
use crate::export;
use crate::metrics::{MetricsCollector, MetricsTimer};
use crate::models::{DateRange, NewVisit, OutputFormat, PreferenceScore, Visit, VisitStats};
use crate::preferences::{score_visits, DecayConfig};
use crate::repository::VisitRepository;

/// High-level check-in service: validated writes into the visit store
/// and on-demand preference inference over its history.
pub struct CheckinService {
    repository: Box<dyn VisitRepository>,
    decay: DecayConfig,
    metrics: MetricsCollector,
}

impl CheckinService {
    #[must_use]
    pub fn new(repository: Box<dyn VisitRepository>, decay: DecayConfig) -> Self {
        Self {
            repository,
            decay,
            metrics: MetricsCollector::default(),
        }
    }

    /// Record one check-in event
    pub async fn record_visit(&self, visit: NewVisit) -> Result<Visit> {
        let timer = MetricsTimer::new(self.metrics, "record_visit");
        let result = self.repository.record_visit(visit).await;
        timer.finish(result.is_ok());

        if result.is_ok() {
            self.metrics.record_visit_recorded();
        }

        result
    }

    /// Fetch a user's visit history, optionally bounded by a date range
    pub async fn visit_history(&self, user_id: i64, range: DateRange) -> Result<Vec<Visit>> {
        let timer = MetricsTimer::new(self.metrics, "list_visits");
        let result = self.repository.list_visits(user_id, range).await;
        timer.finish(result.is_ok());

        if let Ok(visits) = &result {
            self.metrics.record_history_size(visits.len());
        }

        result
    }

    /// Compute the current preference ranking for a user
    ///
    /// Recomputed from the full visit set on every call; a user with no
    /// history gets an empty ranking.
    pub async fn preferences(&self, user_id: i64) -> Result<Vec<PreferenceScore>> {
        self.preferences_at(user_id, Utc::now().naive_utc()).await
    }

    /// Compute the preference ranking as of a given reference instant
    pub async fn preferences_at(
        &self,
        user_id: i64,
        now: NaiveDateTime,
    ) -> Result<Vec<PreferenceScore>> {
        let visits = self
            .repository
            .list_visits(user_id, DateRange::default())
            .await
            .map_err(|e| {
                self.metrics.record_error("store", "preferences");
                e
            })?;

        let start = std::time::Instant::now();
        let scores = score_visits(user_id, &visits, now, &self.decay);
        self.metrics
            .record_preference_computation(scores.len(), start.elapsed());

        info!(
            user_id,
            visits = visits.len(),
            categories = scores.len(),
            "Computed preference ranking"
        );

        Ok(scores)
    }

    /// Distinct place categories a user has visited, most frequent first
    pub async fn visited_categories(&self, user_id: i64) -> Result<Vec<String>> {
        self.repository.visited_categories(user_id).await
    }

    /// Store-wide statistics
    pub async fn stats(&self) -> Result<VisitStats> {
        self.repository.stats().await
    }

    /// Export a user's visit history to a file
    pub async fn export_history(
        &self,
        user_id: i64,
        range: DateRange,
        format: OutputFormat,
        path: &Path,
    ) -> Result<PathBuf> {
        let visits = self.visit_history(user_id, range).await?;

        let start = std::time::Instant::now();
        let written = export::write_visits_to_file(&visits, format, path).map_err(|e| {
            self.metrics.record_error("export", "export_history");
            e
        })?;
        self.metrics.record_export(format.extension(), start.elapsed());

        info!(
            user_id,
            visits = visits.len(),
            path = %written.display(),
            "Exported visit history"
        );

        Ok(written)
    }

    /// Export a user's current preference ranking to a JSON file
    pub async fn export_preferences(&self, user_id: i64, path: &Path) -> Result<PathBuf> {
        let scores = self.preferences(user_id).await?;

        let start = std::time::Instant::now();
        let written = export::write_preferences_to_file(&scores, path).map_err(|e| {
            self.metrics.record_error("export", "export_preferences");
            e
        })?;
        self.metrics.record_export("json", start.elapsed());

        info!(
            user_id,
            categories = scores.len(),
            path = %written.display(),
            "Exported preference ranking"
        );

        Ok(written)
    }
}

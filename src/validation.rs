use chrono::{Duration, NaiveDateTime, Utc};

use crate::error::{CheckinError, Result};
use crate::models::{Coordinates, NewVisit};

/// Validation utilities for input sanitization and edge case handling
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate a user identifier
    pub fn validate_user_id(user_id: i64) -> Result<()> {
        if user_id <= 0 {
            return Err(CheckinError::Validation(format!(
                "user_id must be positive, got {user_id}"
            )));
        }

        Ok(())
    }

    /// Validate a place category tag
    ///
    /// The category is the aggregation key, so a blank value would make
    /// the visit invisible to preference inference.
    pub fn validate_place_type(place_type: &str) -> Result<()> {
        if place_type.trim().is_empty() {
            return Err(CheckinError::Validation(
                "place_type cannot be empty".to_string(),
            ));
        }

        if place_type.len() > 100 {
            return Err(CheckinError::Validation(
                "place_type too long (max 100 characters)".to_string(),
            ));
        }

        if place_type.contains('\0') || place_type.contains('\r') || place_type.contains('\n') {
            return Err(CheckinError::Validation(
                "place_type contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate a place name
    pub fn validate_place_name(name: &str) -> Result<()> {
        if name.len() > 255 {
            return Err(CheckinError::Validation(
                "place name too long (max 255 characters)".to_string(),
            ));
        }

        if name.contains('\0') {
            return Err(CheckinError::Validation(
                "place name contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate coordinates, when present
    pub fn validate_coordinates(coordinates: &Coordinates) -> Result<()> {
        if !coordinates.lat.is_finite() || !coordinates.long.is_finite() {
            return Err(CheckinError::Validation(
                "coordinates must be finite numbers".to_string(),
            ));
        }

        if !(-90.0..=90.0).contains(&coordinates.lat) {
            return Err(CheckinError::Validation(format!(
                "latitude out of range: {}",
                coordinates.lat
            )));
        }

        if !(-180.0..=180.0).contains(&coordinates.long) {
            return Err(CheckinError::Validation(format!(
                "longitude out of range: {}",
                coordinates.long
            )));
        }

        Ok(())
    }

    /// Validate a visit timestamp
    ///
    /// Caller-supplied timestamps are accepted as facts, but anything
    /// more than a day ahead of the wall clock is treated as clock skew
    /// and rejected. Timestamps within that allowance may still be
    /// slightly ahead of a later scoring instant; the aggregator clamps
    /// their age to zero instead of erroring, so the guard here is the
    /// only place future-dated input can fail.
    pub fn validate_created_at(created_at: NaiveDateTime) -> Result<()> {
        let now = Utc::now().naive_utc();
        if created_at > now + Duration::days(1) {
            return Err(CheckinError::Validation(format!(
                "created_at is in the future: {created_at}"
            )));
        }

        Ok(())
    }

    /// Validate a complete visit payload before insertion
    pub fn validate_new_visit(visit: &NewVisit) -> Result<()> {
        Self::validate_user_id(visit.user_id)?;
        Self::validate_place_type(&visit.place_type)?;
        Self::validate_place_name(&visit.place_name)?;

        if let Some(coordinates) = &visit.coordinates {
            Self::validate_coordinates(coordinates)?;
        }

        Self::validate_created_at(visit.created_at)?;

        Ok(())
    }

    /// Validate a history date range
    pub fn validate_date_range(
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<()> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(CheckinError::InvalidDate(
                    "start date cannot be after end date".to_string(),
                ));
            }

            // Warn about very large ranges that may impact query time
            let days = (end - start).num_days();
            if days > 365 * 5 {
                tracing::warn!(
                    days,
                    "Large date range may impact performance and memory usage"
                );
            }
        }

        Ok(())
    }

    /// Validate the decay half-life used by the aggregator
    pub fn validate_half_life_days(days: f64) -> Result<()> {
        if !days.is_finite() || days <= 0.0 {
            return Err(CheckinError::InvalidConfig(
                "half_life_days must be a positive number".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate database path or URL
    pub fn validate_database_url(url: &str) -> Result<()> {
        if url.trim().is_empty() {
            return Err(CheckinError::InvalidConfig(
                "Database URL cannot be empty".to_string(),
            ));
        }

        if url.len() > 1000 {
            return Err(CheckinError::InvalidConfig(
                "Database URL too long".to_string(),
            ));
        }

        Ok(())
    }

    /// Sanitize free-text input
    #[must_use]
    pub fn sanitize_text(text: &str) -> String {
        text.chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
            .collect::<String>()
            .trim()
            .to_string()
    }
}

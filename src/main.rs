use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::info;

use checkin_history::config::AppConfig;
use checkin_history::logging::{init_logging, OperationTimer};
use checkin_history::metrics::MetricsCollector;
use checkin_history::models::{Coordinates, DateRange, NewVisit, OutputFormat};
use checkin_history::preferences::DecayConfig;
use checkin_history::repository::SqliteVisitRepository;
use checkin_history::service::CheckinService;
use checkin_history::validation::InputValidator;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a check-in event
    Record {
        /// Visitor identifier
        #[arg(short, long)]
        user_id: i64,

        /// Latitude in decimal degrees
        #[arg(long)]
        lat: Option<f64>,

        /// Longitude in decimal degrees
        #[arg(long)]
        long: Option<f64>,

        /// Place name
        #[arg(short, long, default_value = "")]
        name: String,

        /// Place category tag (e.g. coffee_shop)
        #[arg(short, long)]
        place_type: String,

        /// Place address
        #[arg(short, long)]
        address: Option<String>,

        /// Visit time (YYYY-MM-DD HH:MM:SS, defaults to now)
        #[arg(short, long)]
        created_at: Option<String>,
    },
    /// Show or export a user's visit history
    History {
        /// Visitor identifier
        #[arg(short, long)]
        user_id: i64,

        /// Start date for visit range (YYYY-MM-DD)
        #[arg(short, long)]
        start_date: Option<String>,

        /// End date for visit range (YYYY-MM-DD)
        #[arg(short, long)]
        end_date: Option<String>,

        /// Output format (txt, csv or json; defaults to the configured
        /// export format)
        #[arg(short, long)]
        format: Option<String>,

        /// Write history to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compute the preference ranking for a user
    Preferences {
        /// Visitor identifier
        #[arg(short, long)]
        user_id: i64,

        /// Decay half-life in days (overrides configuration)
        #[arg(long)]
        half_life_days: Option<f64>,

        /// Show only the top N categories
        #[arg(short, long)]
        limit: Option<usize>,

        /// Write the ranking to this JSON file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the distinct place categories a user has visited
    Categories {
        /// Visitor identifier
        #[arg(short, long)]
        user_id: i64,
    },
    /// Show store-wide statistics
    Stats,
}

fn parse_date(value: &str) -> Result<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid date (expected YYYY-MM-DD): {value}"))?;
    date.and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow::anyhow!("Invalid date: {value}"))
}

fn parse_datetime(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .with_context(|| format!("Invalid timestamp (expected YYYY-MM-DD HH:MM:SS): {value}"))
}

/// Relative output paths land in the configured export directory
fn resolve_output_path(path: PathBuf, output_directory: &str) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        Path::new(output_directory).join(path)
    }
}

fn parse_range(start: Option<&str>, end: Option<&str>) -> Result<DateRange> {
    Ok(DateRange {
        start: start.map(parse_date).transpose()?,
        end: end
            .map(parse_date)
            .transpose()?
            // End dates are inclusive of the whole day
            .map(|d| d + chrono::Duration::days(1) - chrono::Duration::seconds(1)),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load()?;
    let _log_guard = init_logging(
        Some(&config.get_log_level()),
        config.logging.file_path.as_deref().map(std::path::Path::new),
    )?;
    MetricsCollector::init().ok();

    let repository = SqliteVisitRepository::open(&config.get_database_url())?;
    let decay = DecayConfig {
        half_life_days: config.aggregator.half_life_days,
    };
    let service = CheckinService::new(Box::new(repository), decay);

    match cli.command {
        Commands::Record {
            user_id,
            lat,
            long,
            name,
            place_type,
            address,
            created_at,
        } => {
            let timer = OperationTimer::new("record");

            let coordinates = match (lat, long) {
                (Some(lat), Some(long)) => Some(Coordinates { lat, long }),
                (None, None) => None,
                _ => anyhow::bail!("Provide both --lat and --long, or neither"),
            };

            let created_at = match created_at {
                Some(value) => parse_datetime(&value)?,
                None => Utc::now().naive_utc(),
            };

            let visit = service
                .record_visit(NewVisit {
                    user_id,
                    coordinates,
                    place_name: name,
                    place_type,
                    address,
                    created_at,
                })
                .await?;

            info!(visit_id = visit.id, "Visit recorded");
            println!("Recorded visit {} for user {}", visit.id, visit.user_id);
            timer.finish();
        }
        Commands::History {
            user_id,
            start_date,
            end_date,
            format,
            output,
        } => {
            let range = parse_range(start_date.as_deref(), end_date.as_deref())?;
            let format: OutputFormat = format
                .as_deref()
                .unwrap_or(config.export.default_format.as_str())
                .parse()?;

            if let Some(path) = output {
                let path = resolve_output_path(path, &config.export.output_directory);
                let written = service.export_history(user_id, range, format, &path).await?;
                println!("Wrote history to {}", written.display());
            } else {
                let visits = service.visit_history(user_id, range).await?;
                if visits.is_empty() {
                    println!("No visits recorded for user {user_id}");
                }
                for visit in visits {
                    println!(
                        "{}  {}  {}  {}",
                        visit.created_at.format("%Y-%m-%d %H:%M:%S"),
                        visit.place_type,
                        visit.place_name,
                        visit.address.unwrap_or_default()
                    );
                }
            }
        }
        Commands::Preferences {
            user_id,
            half_life_days,
            limit,
            output,
        } => {
            let service = match half_life_days {
                Some(days) => {
                    InputValidator::validate_half_life_days(days)?;
                    let repository = SqliteVisitRepository::open(&config.get_database_url())?;
                    CheckinService::new(Box::new(repository), DecayConfig { half_life_days: days })
                }
                None => service,
            };

            if let Some(path) = output {
                let path = resolve_output_path(path, &config.export.output_directory);
                let written = service.export_preferences(user_id, &path).await?;
                println!("Wrote preferences to {}", written.display());
            } else {
                let scores = service.preferences(user_id).await?;
                if scores.is_empty() {
                    println!("No visit history for user {user_id}");
                }
                for score in scores.iter().take(limit.unwrap_or(usize::MAX)) {
                    println!("{:<30} {:.4}", score.category, score.score);
                }
            }
        }
        Commands::Categories { user_id } => {
            let categories = service.visited_categories(user_id).await?;
            if categories.is_empty() {
                println!("No visit history for user {user_id}");
            }
            for category in categories {
                println!("{category}");
            }
        }
        Commands::Stats => {
            let stats = service.stats().await?;
            println!("Total visits:        {}", stats.total_visits);
            println!("Distinct users:      {}", stats.distinct_users);
            println!("Distinct categories: {}", stats.distinct_categories);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_output_lands_in_export_directory() {
        let resolved = resolve_output_path(PathBuf::from("history.csv"), "./output");
        assert_eq!(resolved, Path::new("./output").join("history.csv"));
    }

    #[test]
    fn test_absolute_output_is_untouched() {
        let resolved = resolve_output_path(PathBuf::from("/tmp/history.csv"), "./output");
        assert_eq!(resolved, PathBuf::from("/tmp/history.csv"));
    }
}

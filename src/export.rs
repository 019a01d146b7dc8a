//! File export for visit histories and preference rankings.
//!
//! Writes visit snapshots to TXT, CSV, or JSON files for offline
//! analysis. Exports are a read-only view of the store; nothing here
//! mutates history.

use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::Writer;

use crate::error::Result;
use crate::models::{OutputFormat, PreferenceScore, Visit};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Write a visit history to a file in the given format.
///
/// Returns the path written to. Creates parent directories as needed.
pub fn write_visits_to_file(visits: &[Visit], format: OutputFormat, file_path: &Path) -> Result<PathBuf> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }

    match format {
        OutputFormat::Txt => write_txt_file(visits, file_path)?,
        OutputFormat::Csv => write_csv_file(visits, file_path)?,
        OutputFormat::Json => write_json_file(visits, file_path)?,
    }

    Ok(file_path.to_path_buf())
}

/// Write a preference ranking to a JSON file.
pub fn write_preferences_to_file(scores: &[PreferenceScore], file_path: &Path) -> Result<PathBuf> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }

    let file = File::create(file_path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, scores)?;

    Ok(file_path.to_path_buf())
}

/// Format: `user_id, place_type, place_name, timestamp` per line
fn write_txt_file(visits: &[Visit], file_path: &Path) -> Result<()> {
    let file = File::create(file_path)?;
    let mut writer = BufWriter::new(file);

    for visit in visits {
        writeln!(
            writer,
            "{}, {}, {}, {}",
            visit.user_id,
            visit.place_type,
            visit.place_name,
            visit.created_at.format(TIMESTAMP_FORMAT)
        )?;
    }

    writer.flush()?;
    Ok(())
}

/// Includes header row: `ID, UserID, PlaceName, PlaceType, Lat, Long, Address, CreatedAt`
fn write_csv_file(visits: &[Visit], file_path: &Path) -> Result<()> {
    let file = File::create(file_path)?;
    let mut writer = Writer::from_writer(file);

    writer.write_record([
        "ID", "UserID", "PlaceName", "PlaceType", "Lat", "Long", "Address", "CreatedAt",
    ])?;

    for visit in visits {
        writer.write_record([
            visit.id.to_string(),
            visit.user_id.to_string(),
            visit.place_name.clone(),
            visit.place_type.clone(),
            visit
                .coordinates
                .map(|c| c.lat.to_string())
                .unwrap_or_default(),
            visit
                .coordinates
                .map(|c| c.long.to_string())
                .unwrap_or_default(),
            visit.address.clone().unwrap_or_default(),
            visit.created_at.format(TIMESTAMP_FORMAT).to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Outputs a JSON array of visit objects.
fn write_json_file(visits: &[Visit], file_path: &Path) -> Result<()> {
    let file = File::create(file_path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, visits)?;
    Ok(())
}

use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, Row};

use crate::error::{CheckinError, Result};
use crate::models::{Coordinates, NewVisit, Visit, VisitStats};
use crate::schema::visits;

// Type aliases for the database connection pool
pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = r2d2::PooledConnection<SqliteConnectionManager>;

const CREATE_TABLES_SQL: &str = "
CREATE TABLE IF NOT EXISTS visits (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    lat REAL,
    long REAL,
    name TEXT NOT NULL DEFAULT '',
    place_type TEXT NOT NULL,
    address TEXT,
    created_at TIMESTAMP NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_visits_user_created ON visits(user_id, created_at);
CREATE INDEX IF NOT EXISTS idx_visits_user_place_type ON visits(user_id, place_type);
";

/// Database manager for handling connections and operations
///
/// The visits table is an append-only log; this module has no update or
/// delete statements.
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Create a new database connection pool and run migrations
    pub fn new(database_path: &str) -> Result<Self> {
        // Accept both a bare path and a sqlite:// URL
        let path = database_path
            .strip_prefix("sqlite://")
            .or_else(|| database_path.strip_prefix("sqlite:"))
            .unwrap_or(database_path);

        // Create parent directory if it doesn't exist
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().build(manager)?;

        let conn = pool.get()?;
        Self::run_migrations(&conn)?;

        Ok(Self { pool })
    }

    /// Create an in-memory database, mostly useful for tests
    pub fn in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager)?;

        let conn = pool.get()?;
        Self::run_migrations(&conn)?;

        Ok(Self { pool })
    }

    /// Run database migrations
    fn run_migrations(conn: &Connection) -> Result<()> {
        conn.execute_batch(CREATE_TABLES_SQL)?;
        Ok(())
    }

    /// Get a connection from the pool
    pub fn get_connection(&self) -> Result<DbConnection> {
        self.pool
            .get()
            .map_err(|e| CheckinError::StorageUnavailable(e.to_string()))
    }

    /// Append one visit to the store
    ///
    /// A visit is a single atomic row insert; no partial-write state is
    /// possible. Input validation happens in the repository layer before
    /// this is called.
    pub fn insert_visit(&self, new_visit: NewVisit) -> Result<Visit> {
        let conn = self.get_connection()?;

        conn.execute(
            &format!(
                "INSERT INTO {} ({}, {}, {}, {}, {}, {}, {}) VALUES (?, ?, ?, ?, ?, ?, ?)",
                visits::TABLE,
                visits::USER_ID,
                visits::LAT,
                visits::LONG,
                visits::NAME,
                visits::PLACE_TYPE,
                visits::ADDRESS,
                visits::CREATED_AT
            ),
            params![
                new_visit.user_id,
                new_visit.coordinates.map(|c| c.lat),
                new_visit.coordinates.map(|c| c.long),
                new_visit.place_name,
                new_visit.place_type,
                new_visit.address,
                new_visit.created_at
            ],
        )?;

        let id = conn.last_insert_rowid();
        Ok(new_visit.into_visit(id))
    }

    /// Get visits for a user within an optional timestamp range
    ///
    /// Ordering is ascending by `created_at`, then by insertion id for
    /// ties. A user with no history yields an empty vec.
    pub fn get_visits(
        &self,
        user_id: i64,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<Visit>> {
        let conn = self.get_connection()?;

        let mut query = format!(
            "SELECT * FROM {} WHERE {} = ?",
            visits::TABLE,
            visits::USER_ID
        );
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id)];

        if let Some(start) = start {
            query.push_str(&format!(" AND {} >= ?", visits::CREATED_AT));
            params.push(Box::new(start));
        }

        if let Some(end) = end {
            query.push_str(&format!(" AND {} <= ?", visits::CREATED_AT));
            params.push(Box::new(end));
        }

        query.push_str(&format!(
            " ORDER BY {} ASC, {} ASC",
            visits::CREATED_AT,
            visits::ID
        ));

        let mut stmt = conn.prepare(&query)?;
        let visit_iter = stmt.query_map(rusqlite::params_from_iter(params.iter()), map_visit)?;

        let mut results = Vec::new();
        for visit in visit_iter {
            results.push(visit?);
        }

        Ok(results)
    }

    /// Get the distinct place categories a user has visited
    ///
    /// Ordered by descending visit count, ties by category name.
    pub fn get_visited_categories(&self, user_id: i64) -> Result<Vec<String>> {
        let conn = self.get_connection()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {col} FROM {table} WHERE {user} = ? GROUP BY {col} ORDER BY COUNT(*) DESC, {col} ASC",
            col = visits::PLACE_TYPE,
            table = visits::TABLE,
            user = visits::USER_ID
        ))?;

        let category_iter = stmt.query_map(params![user_id], |row| row.get::<_, String>(0))?;

        let mut results = Vec::new();
        for category in category_iter {
            results.push(category?);
        }

        Ok(results)
    }

    /// Get statistics about the visit store
    pub fn get_stats(&self) -> Result<VisitStats> {
        let conn = self.get_connection()?;

        let (total, users, categories): (i64, i64, i64) = conn.query_row(
            &format!(
                "SELECT COUNT(*), COUNT(DISTINCT {}), COUNT(DISTINCT {}) FROM {}",
                visits::USER_ID,
                visits::PLACE_TYPE,
                visits::TABLE
            ),
            params![],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        Ok(VisitStats {
            total_visits: total as usize,
            distinct_users: users as usize,
            distinct_categories: categories as usize,
        })
    }
}

/// Map a database row to a Visit
fn map_visit(row: &Row) -> rusqlite::Result<Visit> {
    let lat: Option<f64> = row.get(visits::LAT)?;
    let long: Option<f64> = row.get(visits::LONG)?;

    Ok(Visit {
        id: row.get(visits::ID)?,
        user_id: row.get(visits::USER_ID)?,
        coordinates: match (lat, long) {
            (Some(lat), Some(long)) => Some(Coordinates { lat, long }),
            _ => None,
        },
        place_name: row.get(visits::NAME)?,
        place_type: row.get(visits::PLACE_TYPE)?,
        address: row.get(visits::ADDRESS)?,
        created_at: row.get(visits::CREATED_AT)?,
    })
}

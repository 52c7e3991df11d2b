use chrono::Utc;

use super::{Database, ReportStore};
use crate::errors::VulnexError;
use crate::models::Report;

impl Database {
    pub fn insert_report(&self, title: &str, markdown: &str) -> Result<i64, VulnexError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO reports (title, markdown, created_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![title, markdown, Utc::now().to_rfc3339()],
        )
        .map_err(|e| VulnexError::Database(format!("Failed to insert report: {}", e)))?;
        Ok(conn.last_insert_rowid())
    }

    pub fn get_report(&self, id: i64) -> Result<Option<Report>, VulnexError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT id, title, markdown, created_at FROM reports WHERE id = ?1")
            .map_err(|e| VulnexError::Database(format!("Query failed: {}", e)))?;

        let mut rows = stmt
            .query_map(rusqlite::params![id], |row| {
                Ok(Report {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    markdown: row.get(2)?,
                    created_at: row.get(3)?,
                })
            })
            .map_err(|e| VulnexError::Database(format!("Query error: {}", e)))?;

        match rows.next() {
            Some(row) => Ok(Some(
                row.map_err(|e| VulnexError::Database(format!("Row error: {}", e)))?,
            )),
            None => Ok(None),
        }
    }
}

impl ReportStore for Database {
    fn get_report_by_id(&self, id: i64) -> Result<Option<Report>, VulnexError> {
        self.get_report(id)
    }
}

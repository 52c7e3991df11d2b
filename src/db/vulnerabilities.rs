use chrono::Utc;

use super::{Database, VulnerabilityStore};
use crate::errors::VulnexError;
use crate::models::{
    CandidateVulnerability, ExistingVulnerability, Severity, StoredVulnerability, VulnCategory,
};

impl Database {
    pub fn get_vulnerabilities(&self, report_id: i64) -> Result<Vec<StoredVulnerability>, VulnexError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT id, report_id, title, description, severity, category, confidence, created_at \
                 FROM vulnerabilities WHERE report_id = ?1 \
                 ORDER BY CASE severity \
                    WHEN 'critical' THEN 0 WHEN 'high' THEN 1 WHEN 'medium' THEN 2 \
                    WHEN 'low' THEN 3 WHEN 'note' THEN 4 ELSE 5 END, id",
            )
            .map_err(|e| VulnexError::Database(format!("Query failed: {}", e)))?;

        let rows = stmt
            .query_map(rusqlite::params![report_id], |row| {
                let severity_str: String = row.get(4)?;
                let category_str: String = row.get(5)?;
                Ok(StoredVulnerability {
                    id: row.get(0)?,
                    report_id: row.get(1)?,
                    title: row.get(2)?,
                    description: row.get(3)?,
                    severity: Severity::parse(&severity_str).unwrap_or(Severity::Note),
                    category: VulnCategory::parse(&category_str)
                        .unwrap_or(VulnCategory::NotApplicable),
                    confidence: row.get(6)?,
                    created_at: row.get(7)?,
                })
            })
            .map_err(|e| VulnexError::Database(format!("Query error: {}", e)))?;

        let mut vulnerabilities = Vec::new();
        for row in rows {
            vulnerabilities
                .push(row.map_err(|e| VulnexError::Database(format!("Row error: {}", e)))?);
        }
        Ok(vulnerabilities)
    }
}

impl VulnerabilityStore for Database {
    fn list_for_report(&self, report_id: i64) -> Result<Vec<ExistingVulnerability>, VulnexError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT id, title, description FROM vulnerabilities WHERE report_id = ?1 ORDER BY id")
            .map_err(|e| VulnexError::Database(format!("Query failed: {}", e)))?;

        let rows = stmt
            .query_map(rusqlite::params![report_id], |row| {
                Ok(ExistingVulnerability {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    description: row.get(2)?,
                })
            })
            .map_err(|e| VulnexError::Database(format!("Query error: {}", e)))?;

        let mut existing = Vec::new();
        for row in rows {
            existing.push(row.map_err(|e| VulnexError::Database(format!("Row error: {}", e)))?);
        }
        Ok(existing)
    }

    fn create(
        &self,
        report_id: i64,
        candidate: &CandidateVulnerability,
    ) -> Result<i64, VulnexError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO vulnerabilities (report_id, title, description, severity, category, confidence, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                report_id,
                candidate.title,
                candidate.description,
                candidate.severity.as_str(),
                candidate.category.as_str(),
                candidate.raw_confidence,
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| VulnexError::Database(format!("Failed to insert vulnerability: {}", e)))?;
        Ok(conn.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_candidate(title: &str, severity: Severity) -> CandidateVulnerability {
        CandidateVulnerability {
            title: title.to_string(),
            description: "Test description".to_string(),
            severity,
            category: VulnCategory::NotFixed,
            raw_confidence: Some(0.8),
        }
    }

    #[test]
    fn test_create_and_list_for_report() {
        let db = Database::in_memory().unwrap();
        let report_id = db.insert_report("Audit", "content").unwrap();

        let id = db
            .create(report_id, &make_candidate("SQLi in /api/users", Severity::Critical))
            .unwrap();
        assert!(id > 0);

        let existing = db.list_for_report(report_id).unwrap();
        assert_eq!(existing.len(), 1);
        assert_eq!(existing[0].title, "SQLi in /api/users");
    }

    #[test]
    fn test_unique_title_constraint_per_report() {
        let db = Database::in_memory().unwrap();
        let report_id = db.insert_report("Audit", "content").unwrap();

        db.create(report_id, &make_candidate("Duplicate", Severity::High))
            .unwrap();
        let err = db
            .create(report_id, &make_candidate("Duplicate", Severity::High))
            .unwrap_err();
        assert!(matches!(err, VulnexError::Database(_)));

        // Same title on another report is fine
        let other_report = db.insert_report("Other", "content").unwrap();
        db.create(other_report, &make_candidate("Duplicate", Severity::High))
            .unwrap();
    }

    #[test]
    fn test_get_vulnerabilities_ordered_by_severity() {
        let db = Database::in_memory().unwrap();
        let report_id = db.insert_report("Audit", "content").unwrap();

        db.create(report_id, &make_candidate("Low issue", Severity::Low))
            .unwrap();
        db.create(report_id, &make_candidate("Critical issue", Severity::Critical))
            .unwrap();
        db.create(report_id, &make_candidate("Note issue", Severity::Note))
            .unwrap();

        let rows = db.get_vulnerabilities(report_id).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].severity, Severity::Critical);
        assert_eq!(rows[1].severity, Severity::Low);
        assert_eq!(rows[2].severity, Severity::Note);
    }

    #[test]
    fn test_vulnerabilities_cascade_on_report_delete() {
        let db = Database::in_memory().unwrap();
        let report_id = db.insert_report("Audit", "content").unwrap();
        db.create(report_id, &make_candidate("Finding", Severity::High))
            .unwrap();

        {
            let conn = db.conn.lock().unwrap();
            conn.execute("DELETE FROM reports WHERE id = ?1", rusqlite::params![report_id])
                .unwrap();
        }
        assert!(db.get_vulnerabilities(report_id).unwrap().is_empty());
    }
}

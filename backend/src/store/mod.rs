//! # Template Document Store
//!
//! Templates are kept as JSON documents in a single SQLite table:
//!
//! ```sql
//! templates(id TEXT PRIMARY KEY, name TEXT NOT NULL, points TEXT NOT NULL)
//! ```
//!
//! `points` holds the serialized point tree. A connection is opened per
//! operation from the configured file path; there are no transactions
//! spanning calls and concurrent saves of the same template are
//! last-write-wins.

use common::audit::template_save::{template_not_found, TemplateGateway};
use common::error::{AuditError, AuditResult};
use common::ids::{IdGenerator, UuidIds};
use common::model::template::{Template, TemplateDraft, TemplatePoint, TemplateUpdate};
use log::{debug, info};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct SqliteTemplateStore {
    path: PathBuf,
}

impl SqliteTemplateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the `templates` table if it does not exist yet.
    pub fn init(&self) -> AuditResult<()> {
        let conn = self.open()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS templates (
                id     TEXT PRIMARY KEY,
                name   TEXT NOT NULL,
                points TEXT NOT NULL
            )",
            [],
        )
        .map_err(unavailable)?;
        info!("Template store ready at {}", self.path.display());
        Ok(())
    }

    fn open(&self) -> AuditResult<Connection> {
        Connection::open(&self.path).map_err(unavailable)
    }

    fn find(conn: &Connection, id: &str) -> AuditResult<Option<Template>> {
        conn.query_row(
            "SELECT id, name, points FROM templates WHERE id = ?1",
            params![id],
            read_row,
        )
        .optional()
        .map_err(unavailable)?
        .map(|(id, name, points)| from_row(id, name, &points))
        .transpose()
    }
}

impl TemplateGateway for SqliteTemplateStore {
    fn list_templates(&self) -> AuditResult<Vec<Template>> {
        let conn = self.open()?;
        let mut stmt = conn
            .prepare("SELECT id, name, points FROM templates ORDER BY name, id")
            .map_err(unavailable)?;
        let rows = stmt
            .query_map([], read_row)
            .map_err(unavailable)?;

        let mut templates = Vec::new();
        for row in rows {
            let (id, name, points) = row.map_err(unavailable)?;
            templates.push(from_row(id, name, &points)?);
        }
        Ok(templates)
    }

    fn create_template(&self, draft: TemplateDraft) -> AuditResult<Template> {
        let template = Template {
            id: draft
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| UuidIds.next_id()),
            name: draft.name,
            points: draft.points,
        };
        let points = to_document(&template.points)?;

        let conn = self.open()?;
        match conn.execute(
            "INSERT INTO templates (id, name, points) VALUES (?1, ?2, ?3)",
            params![&template.id, &template.name, &points],
        ) {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                return Err(AuditError::validation(format!(
                    "template `{}` already exists",
                    template.id
                )));
            }
            Err(e) => return Err(unavailable(e)),
        }
        debug!("Created template {}", template.id);
        Ok(template)
    }

    fn get_template(&self, id: &str) -> AuditResult<Template> {
        let conn = self.open()?;
        Self::find(&conn, id)?.ok_or_else(|| template_not_found(id))
    }

    fn update_template(&self, id: &str, update: TemplateUpdate) -> AuditResult<Template> {
        let conn = self.open()?;
        let mut template = Self::find(&conn, id)?.ok_or_else(|| template_not_found(id))?;
        template.apply_update(update);

        let points = to_document(&template.points)?;
        let changed = conn
            .execute(
                "UPDATE templates SET name = ?1, points = ?2 WHERE id = ?3",
                params![&template.name, &points, id],
            )
            .map_err(unavailable)?;
        if changed == 0 {
            // deleted between the read and the write
            return Err(template_not_found(id));
        }
        debug!("Updated template {}", id);
        Ok(template)
    }

    fn delete_template(&self, id: &str) -> AuditResult<()> {
        let conn = self.open()?;
        conn.execute("DELETE FROM templates WHERE id = ?1", params![id])
            .map_err(unavailable)?;
        Ok(())
    }
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, String, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn unavailable(e: rusqlite::Error) -> AuditError {
    AuditError::PersistenceUnavailable(e.to_string())
}

fn to_document(points: &[TemplatePoint]) -> AuditResult<String> {
    serde_json::to_string(points).map_err(|e| AuditError::PersistenceUnavailable(e.to_string()))
}

fn from_row(id: String, name: String, points: &str) -> AuditResult<Template> {
    let points = serde_json::from_str(points).map_err(|e| {
        AuditError::PersistenceUnavailable(format!("stored template `{id}` is unreadable: {e}"))
    })?;
    Ok(Template { id, name, points })
}

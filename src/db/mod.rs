mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Utc;
use hermes_core::models::{today, Approach, PhaseStatus, Project, ProjectSize};
use hermes_core::GovernanceError;
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use crate::models::*;

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> Result<Self> {
        Self::open(default_path()?)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Project operations
    // ============================================================

    pub fn list_projects(&self) -> Result<Vec<ProjectSummary>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, name, approach, size, current_phase, created_at, updated_at
             FROM projects ORDER BY name",
        )?;

        let projects = stmt
            .query_map([], |row| {
                Ok(ProjectSummary {
                    id: parse_uuid(row.get::<_, String>(0)?),
                    name: row.get(1)?,
                    approach: Approach::from_str(&row.get::<_, String>(2)?)
                        .unwrap_or(Approach::Classical),
                    size: ProjectSize::from_str(&row.get::<_, String>(3)?)
                        .unwrap_or(ProjectSize::Medium),
                    current_phase: row.get::<_, String>(4)?.into(),
                    created_at: parse_datetime(row.get::<_, String>(5)?),
                    updated_at: parse_datetime(row.get::<_, String>(6)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(projects)
    }

    pub fn get_project(&self, id: Uuid) -> Result<Option<StoredProject>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        read_project(&conn, id)
    }

    /// Store a freshly initialized project.
    ///
    /// The first phase becomes active and gets today's start date; the engine
    /// leaves that to the caller.
    pub fn create_project(&self, mut project: Project) -> Result<StoredProject> {
        if let Some(first) = project.phases.first_mut() {
            if first.status == PhaseStatus::NotStarted {
                first.status = PhaseStatus::Active;
                first.start_date = Some(today());
            }
        }

        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();
        let data = serde_json::to_string(&project).context("Failed to serialize project")?;

        conn.execute(
            "INSERT INTO projects (id, name, approach, size, current_phase, data, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            (
                id.to_string(),
                &project.master_data.project_name,
                project.master_data.approach.as_str(),
                project.master_data.project_size.as_str(),
                project.master_data.current_phase.as_str(),
                &data,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ),
        )?;

        tracing::info!(%id, name = %project.master_data.project_name, "Project created");

        Ok(StoredProject {
            id,
            project,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a command to a stored project and persist the result.
    ///
    /// The connection stays locked for the whole read-modify-write. Nothing is
    /// written when `f` fails; its [`GovernanceError`] is returned inside the
    /// `anyhow::Error`. Returns `None` for an unknown id.
    pub fn update_project<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Project) -> Result<T, GovernanceError>,
    ) -> Result<Option<(StoredProject, T)>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let Some(mut stored) = read_project(&conn, id)? else {
            return Ok(None);
        };

        let value = f(&mut stored.project)?;
        stored.updated_at = Utc::now();
        write_project(&conn, &stored)?;

        Ok(Some((stored, value)))
    }

    pub fn delete_project(&self, id: Uuid) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM projects WHERE id = ?", [id.to_string()])?;
        Ok(rows > 0)
    }

    pub fn count_projects(&self) -> Result<usize> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn statistics(&self) -> Result<Statistics> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare("SELECT approach, size FROM projects")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stats = Statistics {
            projects_by_size: [ProjectSize::Small, ProjectSize::Medium, ProjectSize::Large]
                .into_iter()
                .map(|size| (size, 0))
                .collect(),
            ..Default::default()
        };
        for (approach, size) in rows {
            stats.total_projects += 1;
            match Approach::from_str(&approach) {
                Some(Approach::Agile) => stats.agile_projects += 1,
                _ => stats.classical_projects += 1,
            }
            if let Some(size) = ProjectSize::from_str(&size) {
                *stats.projects_by_size.entry(size).or_default() += 1;
            }
        }

        Ok(stats)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

/// `<data dir>/hermes.db` in the platform's application data directory.
pub fn default_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "hermes")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(dirs.data_dir().join("hermes.db"))
}

fn read_project(conn: &Connection, id: Uuid) -> Result<Option<StoredProject>> {
    let row = conn
        .query_row(
            "SELECT data, created_at, updated_at FROM projects WHERE id = ?",
            [id.to_string()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            },
        )
        .optional()?;

    let Some((data, created_at, updated_at)) = row else {
        return Ok(None);
    };
    let project: Project = serde_json::from_str(&data)
        .with_context(|| format!("Failed to decode project {id}"))?;

    Ok(Some(StoredProject {
        id,
        project,
        created_at: parse_datetime(created_at),
        updated_at: parse_datetime(updated_at),
    }))
}

fn write_project(conn: &Connection, stored: &StoredProject) -> Result<()> {
    let master = &stored.project.master_data;
    let data = serde_json::to_string(&stored.project).context("Failed to serialize project")?;
    conn.execute(
        "UPDATE projects SET name = ?, approach = ?, size = ?, current_phase = ?, data = ?, updated_at = ?
         WHERE id = ?",
        (
            &master.project_name,
            master.approach.as_str(),
            master.project_size.as_str(),
            master.current_phase.as_str(),
            &data,
            stored.updated_at.to_rfc3339(),
            stored.id.to_string(),
        ),
    )?;
    Ok(())
}

fn parse_uuid(s: String) -> Uuid {
    Uuid::parse_str(&s).unwrap_or_else(|_| Uuid::nil())
}

fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

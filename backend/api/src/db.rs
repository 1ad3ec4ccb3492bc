//! Database layer — migrations, snapshot queries, and membership writes.
//!
//! Reads build fresh [`Project`] snapshots (rows plus joined worker
//! names) on every call; nothing is cached, so the engine always
//! computes splits from the live tier/amount state. Stored enum strings
//! and amounts are parsed here, at the boundary, and a corrupt value is
//! a loud error rather than a silently mis-weighted payment.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;

use payout_engine::{ContributionTier, Department, Membership, Project, Worker};

use crate::errors::{ApiError, Result};

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    // Make sure the file is created if it doesn't exist yet.
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied successfully");
    Ok(pool)
}

// ─────────────────────────────────────────────────────────
// Row types
// ─────────────────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
struct ProjectRow {
    id: i64,
    title: String,
    category: String,
    work_type: String,
    start_date: String,
    status: String,
    amount: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    id: i64,
    project_id: i64,
    worker_id: i64,
    worker_name: String,
    tier: String,
}

fn parse_amount(raw: Option<&str>) -> Result<Option<Decimal>> {
    raw.map(|a| {
        Decimal::from_str(a).map_err(|_| ApiError::Data(format!("unparseable amount: {a}")))
    })
    .transpose()
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::Data(format!("unparseable start_date: {raw}")))
}

impl MemberRow {
    fn into_membership(self) -> Result<Membership> {
        Ok(Membership {
            id: self.id,
            project_id: self.project_id,
            worker_id: self.worker_id,
            worker_name: self.worker_name,
            tier: ContributionTier::from_str(&self.tier)?,
        })
    }
}

impl ProjectRow {
    fn into_project(self, members: Vec<Membership>) -> Result<Project> {
        Ok(Project {
            id: self.id,
            title: self.title,
            category: self.category.parse()?,
            work_type: self.work_type.parse()?,
            start_date: parse_date(&self.start_date)?,
            status: self.status.parse()?,
            amount: parse_amount(self.amount.as_deref())?,
            members,
        })
    }
}

// ─────────────────────────────────────────────────────────
// Reads
// ─────────────────────────────────────────────────────────

pub async fn get_department(pool: &SqlitePool, id: i64) -> Result<Option<Department>> {
    let row: Option<(i64, String, String)> =
        sqlx::query_as("SELECT id, name, email FROM departments WHERE id = ?1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|(id, name, email)| Department { id, name, email }))
}

pub async fn get_worker(pool: &SqlitePool, department_id: i64, id: i64) -> Result<Option<Worker>> {
    let row: Option<(i64, i64, String)> = sqlx::query_as(
        "SELECT id, department_id, name FROM workers WHERE id = ?1 AND department_id = ?2",
    )
    .bind(id)
    .bind(department_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|(id, department_id, name)| Worker {
        id,
        department_id,
        name,
    }))
}

pub async fn worker_count(pool: &SqlitePool, department_id: i64) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM workers WHERE department_id = ?1")
        .bind(department_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn project_count(pool: &SqlitePool, department_id: i64) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects WHERE department_id = ?1")
        .bind(department_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Load every project of a department as a full snapshot with joined
/// member names, newest start date first.
pub async fn load_projects(pool: &SqlitePool, department_id: i64) -> Result<Vec<Project>> {
    let project_rows = sqlx::query_as::<_, ProjectRow>(
        r#"
        SELECT id, title, category, work_type, start_date, status, amount
        FROM   projects
        WHERE  department_id = ?1
        ORDER  BY start_date DESC, id DESC
        "#,
    )
    .bind(department_id)
    .fetch_all(pool)
    .await?;

    let member_rows = sqlx::query_as::<_, MemberRow>(
        r#"
        SELECT pm.id, pm.project_id, pm.worker_id, w.name AS worker_name, pm.tier
        FROM   project_members pm
        JOIN   workers w  ON w.id = pm.worker_id
        JOIN   projects p ON p.id = pm.project_id
        WHERE  p.department_id = ?1
        ORDER  BY pm.project_id ASC, pm.id ASC
        "#,
    )
    .bind(department_id)
    .fetch_all(pool)
    .await?;

    let mut members_by_project: BTreeMap<i64, Vec<Membership>> = BTreeMap::new();
    for row in member_rows {
        let membership = row.into_membership()?;
        members_by_project
            .entry(membership.project_id)
            .or_default()
            .push(membership);
    }

    project_rows
        .into_iter()
        .map(|row| {
            let members = members_by_project.remove(&row.id).unwrap_or_default();
            row.into_project(members)
        })
        .collect()
}

/// Load one project with its membership snapshot.
pub async fn load_project(pool: &SqlitePool, project_id: i64) -> Result<Option<Project>> {
    let project_row = sqlx::query_as::<_, ProjectRow>(
        r#"
        SELECT id, title, category, work_type, start_date, status, amount
        FROM   projects
        WHERE  id = ?1
        "#,
    )
    .bind(project_id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = project_row else {
        return Ok(None);
    };

    let member_rows = sqlx::query_as::<_, MemberRow>(
        r#"
        SELECT pm.id, pm.project_id, pm.worker_id, w.name AS worker_name, pm.tier
        FROM   project_members pm
        JOIN   workers w ON w.id = pm.worker_id
        WHERE  pm.project_id = ?1
        ORDER  BY pm.id ASC
        "#,
    )
    .bind(project_id)
    .fetch_all(pool)
    .await?;

    let members: Result<Vec<Membership>> =
        member_rows.into_iter().map(MemberRow::into_membership).collect();
    Ok(Some(row.into_project(members?)?))
}

// ─────────────────────────────────────────────────────────
// Membership writes
// ─────────────────────────────────────────────────────────

/// Assign a worker to a project.
///
/// Rejected with [`ApiError::Conflict`] when the pair already exists or
/// when the project is solo-type and already staffed. The UNIQUE
/// constraint on `(project_id, worker_id)` backs the pair check at the
/// schema level.
pub async fn assign_worker(
    pool: &SqlitePool,
    project_id: i64,
    worker_id: i64,
    tier: ContributionTier,
) -> Result<i64> {
    let work_type: Option<(String,)> =
        sqlx::query_as("SELECT work_type FROM projects WHERE id = ?1")
            .bind(project_id)
            .fetch_optional(pool)
            .await?;
    let Some((work_type,)) = work_type else {
        return Err(ApiError::NotFound("project"));
    };

    let (existing,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM project_members WHERE project_id = ?1")
            .bind(project_id)
            .fetch_one(pool)
            .await?;
    if work_type == "solo" && existing > 0 {
        return Err(ApiError::Conflict(
            "solo projects accept a single member".to_string(),
        ));
    }

    let (duplicate,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM project_members WHERE project_id = ?1 AND worker_id = ?2",
    )
    .bind(project_id)
    .bind(worker_id)
    .fetch_one(pool)
    .await?;
    if duplicate > 0 {
        return Err(ApiError::Conflict(
            "worker is already assigned to this project".to_string(),
        ));
    }

    let result = sqlx::query(
        "INSERT INTO project_members (project_id, worker_id, tier) VALUES (?1, ?2, ?3)",
    )
    .bind(project_id)
    .bind(worker_id)
    .bind(tier.as_str())
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Reassign the tier of an existing membership.
pub async fn reassign_tier(
    pool: &SqlitePool,
    project_id: i64,
    worker_id: i64,
    tier: ContributionTier,
) -> Result<()> {
    let result =
        sqlx::query("UPDATE project_members SET tier = ?1 WHERE project_id = ?2 AND worker_id = ?3")
            .bind(tier.as_str())
            .bind(project_id)
            .bind(worker_id)
            .execute(pool)
            .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("membership"));
    }
    Ok(())
}

/// Remove a worker from a project.
pub async fn unassign_worker(pool: &SqlitePool, project_id: i64, worker_id: i64) -> Result<()> {
    let result =
        sqlx::query("DELETE FROM project_members WHERE project_id = ?1 AND worker_id = ?2")
            .bind(project_id)
            .bind(worker_id)
            .execute(pool)
            .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("membership"));
    }
    Ok(())
}

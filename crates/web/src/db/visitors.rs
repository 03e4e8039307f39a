//! `PostgreSQL` visitor store.
//!
//! Queries are built at runtime with `sqlx::query_as` so the crate compiles
//! without a live database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use greeter_core::{Page, PageRequest, SortDirection, SortKey, Visitor, VisitorId};

use super::{RepositoryError, VisitorStore, VisitorTransaction};

const VISITOR_COLUMNS: &str = "id, name, visit_count, created_at, updated_at";

/// Database row for `greeter.visitor`.
#[derive(Debug, sqlx::FromRow)]
struct VisitorRow {
    id: VisitorId,
    name: String,
    visit_count: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<VisitorRow> for Visitor {
    type Error = RepositoryError;

    fn try_from(row: VisitorRow) -> Result<Self, Self::Error> {
        let visit_count = u32::try_from(row.visit_count).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "negative visit count {} for visitor {}",
                row.visit_count, row.id
            ))
        })?;

        Ok(Self {
            id: Some(row.id),
            name: row.name,
            visit_count,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        })
    }
}

/// Visitor store backed by `PostgreSQL`.
#[derive(Clone)]
pub struct PgVisitorStore {
    pool: PgPool,
}

impl PgVisitorStore {
    /// Create a new store over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VisitorStore for PgVisitorStore {
    async fn begin(&self) -> Result<Box<dyn VisitorTransaction>, RepositoryError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgVisitorTransaction { tx }))
    }

    async fn find_all(&self, page: PageRequest) -> Result<Page<Visitor>, RepositoryError> {
        // Count and rows come from one snapshot so the totals match the content
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM greeter.visitor")
            .fetch_one(&mut *tx)
            .await?;

        let sql = format!(
            "SELECT {VISITOR_COLUMNS} FROM greeter.visitor ORDER BY {} LIMIT $1 OFFSET $2",
            order_by(page)
        );
        let rows: Vec<VisitorRow> = sqlx::query_as(&sql)
            .bind(i64::from(page.size()))
            .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        let content = rows
            .into_iter()
            .map(Visitor::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let total = u64::try_from(total).map_err(|_| {
            RepositoryError::DataCorruption(format!("negative visitor count {total}"))
        })?;

        Ok(Page::new(content, &page, total))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// One `PostgreSQL` transaction. Rolled back by sqlx when dropped uncommitted.
struct PgVisitorTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl VisitorTransaction for PgVisitorTransaction {
    async fn find_by_name(&mut self, name: &str) -> Result<Option<Visitor>, RepositoryError> {
        // Serializes first registrations of a name that has no row to lock yet
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(name)
            .execute(&mut *self.tx)
            .await?;

        let sql = format!("SELECT {VISITOR_COLUMNS} FROM greeter.visitor WHERE name = $1 FOR UPDATE");
        let row: Option<VisitorRow> = sqlx::query_as(&sql)
            .bind(name)
            .fetch_optional(&mut *self.tx)
            .await?;

        row.map(Visitor::try_from).transpose()
    }

    async fn save(&mut self, visitor: Visitor) -> Result<Visitor, RepositoryError> {
        let visit_count = i32::try_from(visitor.visit_count).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "visit count {} for '{}' does not fit the store",
                visitor.visit_count, visitor.name
            ))
        })?;

        let row: VisitorRow = match visitor.id {
            None => {
                let sql = format!(
                    "INSERT INTO greeter.visitor (name, visit_count) VALUES ($1, $2) \
                     RETURNING {VISITOR_COLUMNS}"
                );
                sqlx::query_as(&sql)
                    .bind(&visitor.name)
                    .bind(visit_count)
                    .fetch_one(&mut *self.tx)
                    .await
                    .map_err(|e| map_unique_violation(e, &visitor.name))?
            }
            Some(id) => {
                let sql = format!(
                    "UPDATE greeter.visitor SET name = $2, visit_count = $3, updated_at = NOW() \
                     WHERE id = $1 RETURNING {VISITOR_COLUMNS}"
                );
                sqlx::query_as(&sql)
                    .bind(id)
                    .bind(&visitor.name)
                    .bind(visit_count)
                    .fetch_optional(&mut *self.tx)
                    .await
                    .map_err(|e| map_unique_violation(e, &visitor.name))?
                    .ok_or(RepositoryError::NotFound)?
            }
        };

        Visitor::try_from(row)
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        self.tx.commit().await?;
        Ok(())
    }
}

/// `ORDER BY` clause for a page request. Columns come from a fixed whitelist.
fn order_by(page: PageRequest) -> String {
    let sort = page.sort();
    let direction = match sort.direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };

    match sort.key {
        SortKey::Id => format!("id {direction}"),
        SortKey::Name => format!("name {direction}, id ASC"),
        SortKey::VisitCount => format!("visit_count {direction}, id ASC"),
    }
}

fn map_unique_violation(e: sqlx::Error, name: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("visitor name '{name}' already exists"));
    }
    RepositoryError::Database(e)
}

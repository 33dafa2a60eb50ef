//! PostgreSQL repositories, one per table
//!
//! Each repository borrows the pool and follows these patterns:
//! - Lists run the page and the `COUNT(*)` concurrently
//! - Partial updates use `COALESCE` and refresh `updated_at`
//! - Guarded deletes are one conditional statement

pub mod crops;
pub mod dashboard;
pub mod farms;
pub mod harvests;
pub mod producers;

pub use crops::CropRepo;
pub use dashboard::DashboardRepo;
pub use farms::FarmRepo;
pub use harvests::HarvestRepo;
pub use producers::ProducerRepo;

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use super::criteria::push_where;
use crate::models::{Criteria, Paginated, Pagination};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Insert or update pointed a foreign key at a missing row
    #[error("referenced {field} does not exist")]
    MissingReference { field: &'static str },

    /// Write rejected by the `farms_area_sum` check
    #[error("arable plus vegetation area exceeds total area")]
    AreaExceeded,
}

impl DbError {
    /// Classify an insert/update failure, surfacing foreign key and area
    /// check violations.
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_check_violation() && db_err.constraint() == Some("farms_area_sum") {
                return Self::AreaExceeded;
            }
            if db_err.is_foreign_key_violation() {
                let field = match db_err.constraint() {
                    Some("farms_producer_id_fkey") => "producerId",
                    Some("crops_farm_id_fkey") => "farmId",
                    Some("crops_harvest_id_fkey") => "harvestId",
                    _ => "reference",
                };
                return Self::MissingReference { field };
            }
        }
        Self::Sqlx(err)
    }
}

/// Whether a delete was refused by a `RESTRICT` foreign key.
pub(crate) fn is_restricted(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

/// Fetch one filtered page and the unpaginated match count concurrently.
///
/// Separate queries keep `total` correct when `offset` is past the last row.
pub(crate) async fn fetch_page<R>(
    pool: &PgPool,
    table: &str,
    columns: &str,
    order_by: &str,
    criteria: &Criteria,
    page: Pagination,
) -> Result<Paginated<R>, sqlx::Error>
where
    R: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut rows = QueryBuilder::<Postgres>::new(format!("SELECT {columns} FROM {table}"));
    push_where(&mut rows, criteria);
    rows.push(format!(" ORDER BY {order_by} LIMIT "));
    rows.push_bind(page.sql_limit());
    rows.push(" OFFSET ");
    rows.push_bind(page.sql_offset());

    let mut count = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {table}"));
    push_where(&mut count, criteria);

    let (data, total) = tokio::try_join!(
        rows.build_query_as::<R>().fetch_all(pool),
        count.build_query_scalar::<i64>().fetch_one(pool),
    )?;

    Ok(Paginated { data, total })
}

/// Result of a delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    /// Dependent rows exist; nothing was deleted
    Referenced,
}

impl DeleteOutcome {
    /// Interpret the `(found, blocked, deleted)` flags of a guarded delete.
    pub(crate) fn from_flags(found: bool, blocked: bool, deleted: bool) -> Self {
        match (found, blocked, deleted) {
            (_, _, true) => Self::Deleted,
            (true, true, false) => Self::Referenced,
            // Row vanished between the snapshot and the delete
            _ => Self::NotFound,
        }
    }
}

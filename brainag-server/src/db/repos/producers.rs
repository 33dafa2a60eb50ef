//! Producer repository

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{fetch_page, is_restricted, DbError, DeleteOutcome};
use crate::models::{
    Criteria, DocType, NewProducer, Paginated, Pagination, Producer, ProducerChanges,
};

const COLUMNS: &str = "id, name, document, doc_type, created_at, updated_at";

/// Producer row as stored; `doc_type` is checked on the way out
#[derive(Debug, FromRow)]
struct ProducerRow {
    id: Uuid,
    name: String,
    document: String,
    doc_type: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProducerRow> for Producer {
    type Error = sqlx::Error;

    fn try_from(row: ProducerRow) -> Result<Self, Self::Error> {
        let doc_type = row
            .doc_type
            .parse::<DocType>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(Producer {
            id: row.id,
            name: row.name,
            document: row.document,
            doc_type,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Producer repository
pub struct ProducerRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ProducerRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &NewProducer) -> Result<Producer, DbError> {
        let row: ProducerRow = sqlx::query_as(
            r#"
            INSERT INTO producers (name, document, doc_type)
            VALUES ($1, $2, $3)
            RETURNING id, name, document, doc_type, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(input.document.as_str())
        .bind(input.document.doc_type().as_str())
        .fetch_one(self.pool)
        .await
        .map_err(DbError::from_write)?;

        Ok(row.try_into()?)
    }

    /// Filtered page, newest first.
    pub async fn list(
        &self,
        criteria: &Criteria,
        page: Pagination,
    ) -> Result<Paginated<Producer>, DbError> {
        let rows = fetch_page::<ProducerRow>(
            self.pool,
            "producers",
            COLUMNS,
            "created_at DESC, id DESC",
            criteria,
            page,
        )
        .await?;

        Ok(Paginated {
            data: rows
                .data
                .into_iter()
                .map(Producer::try_from)
                .collect::<Result<_, _>>()?,
            total: rows.total,
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Producer>, DbError> {
        let row: Option<ProducerRow> = sqlx::query_as(
            "SELECT id, name, document, doc_type, created_at, updated_at FROM producers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Producer::try_from).transpose()?)
    }

    /// Apply supplied fields only. `None` when the id is unknown.
    pub async fn update(
        &self,
        id: Uuid,
        changes: &ProducerChanges,
    ) -> Result<Option<Producer>, DbError> {
        let row: Option<ProducerRow> = sqlx::query_as(
            r#"
            UPDATE producers SET
                name = COALESCE($2, name),
                document = COALESCE($3, document),
                doc_type = COALESCE($4, doc_type),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, document, doc_type, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.document.as_ref().map(|d| d.as_str()))
        .bind(changes.document.as_ref().map(|d| d.doc_type().as_str()))
        .fetch_optional(self.pool)
        .await
        .map_err(DbError::from_write)?;

        Ok(row.map(Producer::try_from).transpose()?)
    }

    /// Hard delete; farms still owned by the producer block it.
    pub async fn delete(&self, id: Uuid) -> Result<DeleteOutcome, DbError> {
        let result = sqlx::query("DELETE FROM producers WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await;

        match result {
            Ok(done) if done.rows_affected() > 0 => Ok(DeleteOutcome::Deleted),
            Ok(_) => Ok(DeleteOutcome::NotFound),
            Err(err) if is_restricted(&err) => Ok(DeleteOutcome::Referenced),
            Err(err) => Err(err.into()),
        }
    }
}

//! Harvest repository

use sqlx::PgPool;
use uuid::Uuid;

use super::{fetch_page, is_restricted, DbError, DeleteOutcome};
use crate::models::{Criteria, Harvest, HarvestChanges, NewHarvest, Paginated, Pagination};

/// Harvest repository
pub struct HarvestRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> HarvestRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &NewHarvest) -> Result<Harvest, DbError> {
        sqlx::query_as(
            "INSERT INTO harvests (year) VALUES ($1) RETURNING id, year, created_at, updated_at",
        )
        .bind(input.year)
        .fetch_one(self.pool)
        .await
        .map_err(DbError::from_write)
    }

    /// Filtered page, most recent year first.
    pub async fn list(
        &self,
        criteria: &Criteria,
        page: Pagination,
    ) -> Result<Paginated<Harvest>, DbError> {
        Ok(fetch_page(
            self.pool,
            "harvests",
            "id, year, created_at, updated_at",
            "year DESC, created_at DESC, id DESC",
            criteria,
            page,
        )
        .await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Harvest>, DbError> {
        Ok(
            sqlx::query_as("SELECT id, year, created_at, updated_at FROM harvests WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool)
                .await?,
        )
    }

    pub async fn update(
        &self,
        id: Uuid,
        changes: &HarvestChanges,
    ) -> Result<Option<Harvest>, DbError> {
        sqlx::query_as(
            r#"
            UPDATE harvests SET
                year = COALESCE($2, year),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, year, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.year)
        .fetch_optional(self.pool)
        .await
        .map_err(DbError::from_write)
    }

    /// Delete unless crops still reference the harvest, in one statement.
    pub async fn delete(&self, id: Uuid) -> Result<DeleteOutcome, DbError> {
        let result: Result<(bool, bool, bool), sqlx::Error> = sqlx::query_as(
            r#"
            WITH target AS (
                SELECT id FROM harvests WHERE id = $1
            ),
            blocked AS (
                SELECT EXISTS(SELECT 1 FROM crops WHERE harvest_id = $1) AS has_crops
            ),
            deleted AS (
                DELETE FROM harvests
                WHERE id = $1 AND NOT (SELECT has_crops FROM blocked)
                RETURNING id
            )
            SELECT
                EXISTS(SELECT 1 FROM target) AS found,
                (SELECT has_crops FROM blocked) AS has_crops,
                EXISTS(SELECT 1 FROM deleted) AS deleted
            "#,
        )
        .bind(id)
        .fetch_one(self.pool)
        .await;

        match result {
            Ok((found, blocked, deleted)) => {
                Ok(DeleteOutcome::from_flags(found, blocked, deleted))
            }
            Err(err) if is_restricted(&err) => Ok(DeleteOutcome::Referenced),
            Err(err) => Err(err.into()),
        }
    }
}

//! Farm repository

use sqlx::PgPool;
use uuid::Uuid;

use super::{fetch_page, is_restricted, DbError, DeleteOutcome};
use crate::models::{Criteria, Farm, FarmChanges, NewFarm, Paginated, Pagination};

const COLUMNS: &str = "id, name, city, state, total_area, arable_area, vegetation_area, \
                       producer_id, created_at, updated_at";

/// Farm repository
pub struct FarmRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> FarmRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a farm. A missing producer surfaces as [`DbError::MissingReference`].
    pub async fn create(&self, input: &NewFarm) -> Result<Farm, DbError> {
        sqlx::query_as(
            r#"
            INSERT INTO farms (name, city, state, total_area, arable_area, vegetation_area, producer_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, city, state, total_area, arable_area, vegetation_area,
                      producer_id, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.city)
        .bind(&input.state)
        .bind(input.areas.total)
        .bind(input.areas.arable)
        .bind(input.areas.vegetation)
        .bind(input.producer_id)
        .fetch_one(self.pool)
        .await
        .map_err(DbError::from_write)
    }

    /// Filtered page, newest first.
    pub async fn list(
        &self,
        criteria: &Criteria,
        page: Pagination,
    ) -> Result<Paginated<Farm>, DbError> {
        Ok(fetch_page(
            self.pool,
            "farms",
            COLUMNS,
            "created_at DESC, id DESC",
            criteria,
            page,
        )
        .await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Farm>, DbError> {
        Ok(sqlx::query_as(
            r#"
            SELECT id, name, city, state, total_area, arable_area, vegetation_area,
                   producer_id, created_at, updated_at
            FROM farms WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?)
    }

    /// Apply supplied fields only. `None` when the id is unknown.
    ///
    /// The area invariant is also enforced by a table constraint.
    pub async fn update(&self, id: Uuid, changes: &FarmChanges) -> Result<Option<Farm>, DbError> {
        sqlx::query_as(
            r#"
            UPDATE farms SET
                name = COALESCE($2, name),
                city = COALESCE($3, city),
                state = COALESCE($4, state),
                total_area = COALESCE($5, total_area),
                arable_area = COALESCE($6, arable_area),
                vegetation_area = COALESCE($7, vegetation_area),
                producer_id = COALESCE($8, producer_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, city, state, total_area, arable_area, vegetation_area,
                      producer_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.city.as_deref())
        .bind(changes.state.as_deref())
        .bind(changes.total_area)
        .bind(changes.arable_area)
        .bind(changes.vegetation_area)
        .bind(changes.producer_id)
        .fetch_optional(self.pool)
        .await
        .map_err(DbError::from_write)
    }

    /// Delete unless crops still reference the farm, in one statement.
    pub async fn delete(&self, id: Uuid) -> Result<DeleteOutcome, DbError> {
        let result: Result<(bool, bool, bool), sqlx::Error> = sqlx::query_as(
            r#"
            WITH target AS (
                SELECT id FROM farms WHERE id = $1
            ),
            blocked AS (
                SELECT EXISTS(SELECT 1 FROM crops WHERE farm_id = $1) AS has_crops
            ),
            deleted AS (
                DELETE FROM farms
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
            // A crop inserted concurrently still trips the foreign key
            Err(err) if is_restricted(&err) => Ok(DeleteOutcome::Referenced),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::{CropRepo, HarvestRepo, ProducerRepo};
    use crate::db::MIGRATOR;
    use crate::models::{DocType, FarmFilter, LandAreas, NewCrop, NewHarvest, NewProducer};

    async fn producer(pool: &PgPool) -> Uuid {
        ProducerRepo::new(pool)
            .create(&NewProducer::new("João", DocType::Cpf, "52998224725").unwrap())
            .await
            .unwrap()
            .id
    }

    fn farm(producer_id: Uuid, state: &str) -> NewFarm {
        NewFarm::new(
            "Fazenda Boa Vista",
            "Uberlândia",
            state,
            LandAreas::new(100.0, 70.0, 30.0),
            producer_id,
        )
        .unwrap()
    }

    #[sqlx::test(migrator = "MIGRATOR")]
    #[ignore = "requires database"]
    async fn missing_producer_is_reported(pool: PgPool) -> Result<(), DbError> {
        let err = FarmRepo::new(&pool)
            .create(&farm(Uuid::new_v4(), "MG"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::MissingReference { field: "producerId" }));
        Ok(())
    }

    #[sqlx::test(migrator = "MIGRATOR")]
    #[ignore = "requires database"]
    async fn area_check_violation_is_classified(pool: PgPool) -> Result<(), DbError> {
        let owner = producer(&pool).await;
        let repo = FarmRepo::new(&pool);
        let created = repo.create(&farm(owner, "MG")).await?;

        let changes = FarmChanges {
            arable_area: Some(80.0),
            ..Default::default()
        };
        let err = repo.update(created.id, &changes).await.unwrap_err();
        assert!(matches!(err, DbError::AreaExceeded));

        let stored = repo.get(created.id).await?.expect("farm exists");
        assert_eq!(stored.areas(), created.areas());
        Ok(())
    }

    #[sqlx::test(migrator = "MIGRATOR")]
    #[ignore = "requires database"]
    async fn update_merges_and_filters_match(pool: PgPool) -> Result<(), DbError> {
        let owner = producer(&pool).await;
        let repo = FarmRepo::new(&pool);
        let created = repo.create(&farm(owner, "MG")).await?;
        repo.create(&farm(owner, "SP")).await?;

        let changes = FarmChanges {
            vegetation_area: Some(20.0),
            ..Default::default()
        };
        let updated = repo.update(created.id, &changes).await?.expect("farm exists");
        assert_eq!(updated.areas(), LandAreas::new(100.0, 70.0, 20.0));
        assert_eq!(updated.name, created.name);

        let filter = FarmFilter::new(Some(owner), None, Some("MG"));
        let page = repo.list(&filter.criteria(), Pagination::default()).await?;
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].id, created.id);
        Ok(())
    }

    #[sqlx::test(migrator = "MIGRATOR")]
    #[ignore = "requires database"]
    async fn delete_is_guarded_by_crops(pool: PgPool) -> Result<(), DbError> {
        let owner = producer(&pool).await;
        let repo = FarmRepo::new(&pool);
        let guarded = repo.create(&farm(owner, "MG")).await?;
        let free = repo.create(&farm(owner, "SP")).await?;

        let harvest = HarvestRepo::new(&pool)
            .create(&NewHarvest::new(2025).unwrap())
            .await?;
        CropRepo::new(&pool)
            .create(&NewCrop::new("Soja", guarded.id, harvest.id).unwrap())
            .await?;

        assert_eq!(repo.delete(guarded.id).await?, DeleteOutcome::Referenced);
        assert!(repo.get(guarded.id).await?.is_some());

        assert_eq!(repo.delete(free.id).await?, DeleteOutcome::Deleted);
        assert!(repo.get(free.id).await?.is_none());
        assert_eq!(repo.delete(free.id).await?, DeleteOutcome::NotFound);

        // Producer still owns a farm
        assert_eq!(
            ProducerRepo::new(&pool).delete(owner).await?,
            DeleteOutcome::Referenced
        );
        Ok(())
    }
}

//! Crop repository

use sqlx::PgPool;
use uuid::Uuid;

use super::{fetch_page, DbError, DeleteOutcome};
use crate::models::{Criteria, Crop, CropChanges, NewCrop, Paginated, Pagination};

const COLUMNS: &str = "id, name, farm_id, harvest_id, created_at, updated_at";

/// Crop repository
pub struct CropRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CropRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a crop. Unknown farm or harvest ids surface as
    /// [`DbError::MissingReference`].
    pub async fn create(&self, input: &NewCrop) -> Result<Crop, DbError> {
        sqlx::query_as(
            r#"
            INSERT INTO crops (name, farm_id, harvest_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, farm_id, harvest_id, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(input.farm_id)
        .bind(input.harvest_id)
        .fetch_one(self.pool)
        .await
        .map_err(DbError::from_write)
    }

    pub async fn list(
        &self,
        criteria: &Criteria,
        page: Pagination,
    ) -> Result<Paginated<Crop>, DbError> {
        Ok(fetch_page(
            self.pool,
            "crops",
            COLUMNS,
            "created_at DESC, id DESC",
            criteria,
            page,
        )
        .await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Crop>, DbError> {
        Ok(sqlx::query_as(
            "SELECT id, name, farm_id, harvest_id, created_at, updated_at FROM crops WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?)
    }

    pub async fn update(&self, id: Uuid, changes: &CropChanges) -> Result<Option<Crop>, DbError> {
        sqlx::query_as(
            r#"
            UPDATE crops SET
                name = COALESCE($2, name),
                farm_id = COALESCE($3, farm_id),
                harvest_id = COALESCE($4, harvest_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, farm_id, harvest_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.farm_id)
        .bind(changes.harvest_id)
        .fetch_optional(self.pool)
        .await
        .map_err(DbError::from_write)
    }

    /// Nothing references a crop, so deletion is unconditional.
    pub async fn delete(&self, id: Uuid) -> Result<DeleteOutcome, DbError> {
        let done = sqlx::query("DELETE FROM crops WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(if done.rows_affected() > 0 {
            DeleteOutcome::Deleted
        } else {
            DeleteOutcome::NotFound
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::{FarmRepo, HarvestRepo, ProducerRepo};
    use crate::db::MIGRATOR;
    use crate::models::{CropFilter, DocType, LandAreas, NewFarm, NewHarvest, NewProducer};

    #[sqlx::test(migrator = "MIGRATOR")]
    #[ignore = "requires database"]
    async fn references_are_checked(pool: PgPool) -> Result<(), DbError> {
        let harvest = HarvestRepo::new(&pool)
            .create(&NewHarvest::new(2024).unwrap())
            .await?;

        let err = CropRepo::new(&pool)
            .create(&NewCrop::new("Soja", Uuid::new_v4(), harvest.id).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::MissingReference { field: "farmId" }));
        Ok(())
    }

    #[sqlx::test(migrator = "MIGRATOR")]
    #[ignore = "requires database"]
    async fn crud_and_name_filter(pool: PgPool) -> Result<(), DbError> {
        let producer = ProducerRepo::new(&pool)
            .create(&NewProducer::new("Maria", DocType::Cpf, "11144477735").unwrap())
            .await?;
        let farm = FarmRepo::new(&pool)
            .create(
                &NewFarm::new(
                    "Fazenda Sol",
                    "Sorriso",
                    "MT",
                    LandAreas::new(500.0, 300.0, 150.0),
                    producer.id,
                )
                .unwrap(),
            )
            .await?;
        let harvest = HarvestRepo::new(&pool)
            .create(&NewHarvest::new(2024).unwrap())
            .await?;

        let repo = CropRepo::new(&pool);
        let soja = repo
            .create(&NewCrop::new("Soja", farm.id, harvest.id).unwrap())
            .await?;
        repo.create(&NewCrop::new("Milho", farm.id, harvest.id).unwrap())
            .await?;

        let filter = CropFilter::new(Some("SOJ"), Some(farm.id), None);
        let page = repo.list(&filter.criteria(), Pagination::default()).await?;
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].id, soja.id);

        let renamed = repo
            .update(soja.id, &CropChanges::new(Some("Soja Safrinha"), None, None).unwrap())
            .await?
            .expect("crop exists");
        assert_eq!(renamed.farm_id, farm.id);

        assert_eq!(repo.delete(soja.id).await?, DeleteOutcome::Deleted);
        assert_eq!(repo.delete(soja.id).await?, DeleteOutcome::NotFound);
        Ok(())
    }
}

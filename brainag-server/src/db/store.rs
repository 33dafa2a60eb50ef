//! Store traits and the PostgreSQL implementation
//!
//! Services are generic over these traits, so the same business rules run
//! against PostgreSQL in production and [`MemoryStore`](super::MemoryStore)
//! in tests.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repos::{CropRepo, DashboardRepo, FarmRepo, HarvestRepo, ProducerRepo};
use super::{DbError, DeleteOutcome};
use crate::models::{
    AreaTotals, Criteria, Crop, CropChanges, CropCount, Farm, FarmChanges, Harvest,
    HarvestChanges, NewCrop, NewFarm, NewHarvest, NewProducer, Paginated, Pagination, Producer,
    ProducerChanges, StateCount,
};

#[async_trait]
pub trait ProducerStore: Send + Sync {
    async fn insert_producer(&self, input: &NewProducer) -> Result<Producer, DbError>;
    async fn list_producers(
        &self,
        criteria: &Criteria,
        page: Pagination,
    ) -> Result<Paginated<Producer>, DbError>;
    async fn find_producer(&self, id: Uuid) -> Result<Option<Producer>, DbError>;
    async fn update_producer(
        &self,
        id: Uuid,
        changes: &ProducerChanges,
    ) -> Result<Option<Producer>, DbError>;
    async fn delete_producer(&self, id: Uuid) -> Result<DeleteOutcome, DbError>;
}

#[async_trait]
pub trait FarmStore: Send + Sync {
    async fn insert_farm(&self, input: &NewFarm) -> Result<Farm, DbError>;
    async fn list_farms(
        &self,
        criteria: &Criteria,
        page: Pagination,
    ) -> Result<Paginated<Farm>, DbError>;
    async fn find_farm(&self, id: Uuid) -> Result<Option<Farm>, DbError>;
    async fn update_farm(&self, id: Uuid, changes: &FarmChanges) -> Result<Option<Farm>, DbError>;
    /// Refused with [`DeleteOutcome::Referenced`] while crops point at the farm.
    async fn delete_farm(&self, id: Uuid) -> Result<DeleteOutcome, DbError>;
}

#[async_trait]
pub trait HarvestStore: Send + Sync {
    async fn insert_harvest(&self, input: &NewHarvest) -> Result<Harvest, DbError>;
    async fn list_harvests(
        &self,
        criteria: &Criteria,
        page: Pagination,
    ) -> Result<Paginated<Harvest>, DbError>;
    async fn find_harvest(&self, id: Uuid) -> Result<Option<Harvest>, DbError>;
    async fn update_harvest(
        &self,
        id: Uuid,
        changes: &HarvestChanges,
    ) -> Result<Option<Harvest>, DbError>;
    /// Refused with [`DeleteOutcome::Referenced`] while crops point at the harvest.
    async fn delete_harvest(&self, id: Uuid) -> Result<DeleteOutcome, DbError>;
}

#[async_trait]
pub trait CropStore: Send + Sync {
    async fn insert_crop(&self, input: &NewCrop) -> Result<Crop, DbError>;
    async fn list_crops(
        &self,
        criteria: &Criteria,
        page: Pagination,
    ) -> Result<Paginated<Crop>, DbError>;
    async fn find_crop(&self, id: Uuid) -> Result<Option<Crop>, DbError>;
    async fn update_crop(&self, id: Uuid, changes: &CropChanges) -> Result<Option<Crop>, DbError>;
    async fn delete_crop(&self, id: Uuid) -> Result<DeleteOutcome, DbError>;
}

#[async_trait]
pub trait DashboardStore: Send + Sync {
    async fn count_farms(&self, scope: &Criteria) -> Result<i64, DbError>;
    async fn sum_farm_areas(&self, scope: &Criteria) -> Result<AreaTotals, DbError>;
    async fn count_farms_by_state(&self, scope: &Criteria) -> Result<Vec<StateCount>, DbError>;
    async fn farm_ids_for_producer(&self, producer_id: Uuid) -> Result<Vec<Uuid>, DbError>;
    async fn count_crops_by_name(&self, scope: &Criteria) -> Result<Vec<CropCount>, DbError>;
}

/// Everything the HTTP layer needs from storage
pub trait Store: ProducerStore + FarmStore + HarvestStore + CropStore + DashboardStore {}

impl<T> Store for T where T: ProducerStore + FarmStore + HarvestStore + CropStore + DashboardStore {}

/// PostgreSQL-backed store
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ProducerStore for PgStore {
    async fn insert_producer(&self, input: &NewProducer) -> Result<Producer, DbError> {
        ProducerRepo::new(&self.pool).create(input).await
    }

    async fn list_producers(
        &self,
        criteria: &Criteria,
        page: Pagination,
    ) -> Result<Paginated<Producer>, DbError> {
        ProducerRepo::new(&self.pool).list(criteria, page).await
    }

    async fn find_producer(&self, id: Uuid) -> Result<Option<Producer>, DbError> {
        ProducerRepo::new(&self.pool).get(id).await
    }

    async fn update_producer(
        &self,
        id: Uuid,
        changes: &ProducerChanges,
    ) -> Result<Option<Producer>, DbError> {
        ProducerRepo::new(&self.pool).update(id, changes).await
    }

    async fn delete_producer(&self, id: Uuid) -> Result<DeleteOutcome, DbError> {
        ProducerRepo::new(&self.pool).delete(id).await
    }
}

#[async_trait]
impl FarmStore for PgStore {
    async fn insert_farm(&self, input: &NewFarm) -> Result<Farm, DbError> {
        FarmRepo::new(&self.pool).create(input).await
    }

    async fn list_farms(
        &self,
        criteria: &Criteria,
        page: Pagination,
    ) -> Result<Paginated<Farm>, DbError> {
        FarmRepo::new(&self.pool).list(criteria, page).await
    }

    async fn find_farm(&self, id: Uuid) -> Result<Option<Farm>, DbError> {
        FarmRepo::new(&self.pool).get(id).await
    }

    async fn update_farm(&self, id: Uuid, changes: &FarmChanges) -> Result<Option<Farm>, DbError> {
        FarmRepo::new(&self.pool).update(id, changes).await
    }

    async fn delete_farm(&self, id: Uuid) -> Result<DeleteOutcome, DbError> {
        FarmRepo::new(&self.pool).delete(id).await
    }
}

#[async_trait]
impl HarvestStore for PgStore {
    async fn insert_harvest(&self, input: &NewHarvest) -> Result<Harvest, DbError> {
        HarvestRepo::new(&self.pool).create(input).await
    }

    async fn list_harvests(
        &self,
        criteria: &Criteria,
        page: Pagination,
    ) -> Result<Paginated<Harvest>, DbError> {
        HarvestRepo::new(&self.pool).list(criteria, page).await
    }

    async fn find_harvest(&self, id: Uuid) -> Result<Option<Harvest>, DbError> {
        HarvestRepo::new(&self.pool).get(id).await
    }

    async fn update_harvest(
        &self,
        id: Uuid,
        changes: &HarvestChanges,
    ) -> Result<Option<Harvest>, DbError> {
        HarvestRepo::new(&self.pool).update(id, changes).await
    }

    async fn delete_harvest(&self, id: Uuid) -> Result<DeleteOutcome, DbError> {
        HarvestRepo::new(&self.pool).delete(id).await
    }
}

#[async_trait]
impl CropStore for PgStore {
    async fn insert_crop(&self, input: &NewCrop) -> Result<Crop, DbError> {
        CropRepo::new(&self.pool).create(input).await
    }

    async fn list_crops(
        &self,
        criteria: &Criteria,
        page: Pagination,
    ) -> Result<Paginated<Crop>, DbError> {
        CropRepo::new(&self.pool).list(criteria, page).await
    }

    async fn find_crop(&self, id: Uuid) -> Result<Option<Crop>, DbError> {
        CropRepo::new(&self.pool).get(id).await
    }

    async fn update_crop(&self, id: Uuid, changes: &CropChanges) -> Result<Option<Crop>, DbError> {
        CropRepo::new(&self.pool).update(id, changes).await
    }

    async fn delete_crop(&self, id: Uuid) -> Result<DeleteOutcome, DbError> {
        CropRepo::new(&self.pool).delete(id).await
    }
}

#[async_trait]
impl DashboardStore for PgStore {
    async fn count_farms(&self, scope: &Criteria) -> Result<i64, DbError> {
        DashboardRepo::new(&self.pool).count_farms(scope).await
    }

    async fn sum_farm_areas(&self, scope: &Criteria) -> Result<AreaTotals, DbError> {
        DashboardRepo::new(&self.pool).sum_farm_areas(scope).await
    }

    async fn count_farms_by_state(&self, scope: &Criteria) -> Result<Vec<StateCount>, DbError> {
        DashboardRepo::new(&self.pool).count_farms_by_state(scope).await
    }

    async fn farm_ids_for_producer(&self, producer_id: Uuid) -> Result<Vec<Uuid>, DbError> {
        DashboardRepo::new(&self.pool)
            .farm_ids_for_producer(producer_id)
            .await
    }

    async fn count_crops_by_name(&self, scope: &Criteria) -> Result<Vec<CropCount>, DbError> {
        DashboardRepo::new(&self.pool).count_crops_by_name(scope).await
    }
}

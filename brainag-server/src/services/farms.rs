//! Farm service

use tracing::{info, warn};
use uuid::Uuid;

use super::ServiceError;
use crate::db::{DbError, DeleteOutcome, FarmStore};
use crate::models::{
    Farm, FarmChanges, FarmFilter, NewFarm, Paginated, Pagination, ValidationError,
};

const RESOURCE: &str = "Farm";

pub struct FarmService<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: FarmStore + ?Sized> FarmService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Insert after checking `arable + vegetation <= total`.
    pub async fn create(&self, input: NewFarm) -> Result<Farm, ServiceError> {
        info!(producer_id = %input.producer_id, "creating farm");
        if let Err(e) = input.areas.validate() {
            warn!(error = %e, "rejected farm areas");
            return Err(e.into());
        }

        let farm = self.store.insert_farm(&input).await?;
        info!(id = %farm.id, "farm created");
        Ok(farm)
    }

    pub async fn find_all(
        &self,
        filter: &FarmFilter,
        page: Pagination,
    ) -> Result<Paginated<Farm>, ServiceError> {
        let result = self.store.list_farms(&filter.criteria(), page).await?;
        info!(total = result.total, "farm(s) found");
        Ok(result)
    }

    pub async fn find_one(&self, id: Uuid) -> Result<Farm, ServiceError> {
        match self.store.find_farm(id).await? {
            Some(farm) => Ok(farm),
            None => {
                warn!(%id, "farm not found");
                Err(ServiceError::not_found(RESOURCE, id))
            }
        }
    }

    /// Merge proposed areas over the stored ones and re-check before writing.
    pub async fn update(&self, id: Uuid, changes: FarmChanges) -> Result<Farm, ServiceError> {
        info!(%id, "updating farm");
        let current = self.find_one(id).await?;

        if let Err(e) = changes.areas_over(current.areas()).validate() {
            warn!(%id, error = %e, "rejected farm areas");
            return Err(e.into());
        }

        match self.store.update_farm(id, &changes).await {
            Ok(Some(farm)) => Ok(farm),
            Ok(None) => {
                warn!(%id, "farm disappeared during update");
                Err(ServiceError::not_found(RESOURCE, id))
            }
            // Another write changed the stored areas after the check above
            Err(DbError::AreaExceeded) => {
                let latest = self.find_one(id).await?;
                let areas = changes.areas_over(latest.areas());
                warn!(%id, "farm areas changed concurrently");
                Err(ValidationError::AreaExceeded {
                    total: areas.total,
                    arable: areas.arable,
                    vegetation: areas.vegetation,
                }
                .into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete unless crops still reference the farm.
    pub async fn remove(&self, id: Uuid) -> Result<(), ServiceError> {
        info!(%id, "deleting farm");
        match self.store.delete_farm(id).await? {
            DeleteOutcome::Deleted => Ok(()),
            DeleteOutcome::NotFound => {
                warn!(%id, "farm not found");
                Err(ServiceError::not_found(RESOURCE, id))
            }
            DeleteOutcome::Referenced => {
                warn!(%id, "farm still has crops");
                Err(ServiceError::has_dependents(RESOURCE, id, "crops"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{CropStore, HarvestStore, MemoryStore, ProducerStore};
    use crate::models::{DocType, LandAreas, NewCrop, NewHarvest, NewProducer};

    async fn owner(store: &MemoryStore) -> Uuid {
        store
            .insert_producer(&NewProducer::new("João", DocType::Cpf, "52998224725").unwrap())
            .await
            .unwrap()
            .id
    }

    fn farm(producer_id: Uuid, total: f64, arable: f64, vegetation: f64) -> NewFarm {
        NewFarm::new(
            "Fazenda Esperança",
            "Rio Verde",
            "GO",
            LandAreas::new(total, arable, vegetation),
            producer_id,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn create_enforces_area_invariant() {
        let store = MemoryStore::new();
        let service = FarmService::new(&store);
        let producer = owner(&store).await;

        assert!(service.create(farm(producer, 100.0, 70.0, 30.0)).await.is_ok());

        let err = service.create(farm(producer, 50.0, 40.0, 20.0)).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::AreaExceeded { .. })
        ));
        let page = service
            .find_all(&FarmFilter::default(), Pagination::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn create_with_unknown_producer_is_validation_error() {
        let store = MemoryStore::new();
        let service = FarmService::new(&store);

        let err = service
            .create(farm(Uuid::new_v4(), 10.0, 5.0, 5.0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::UnknownReference { field: "producerId" })
        ));
    }

    #[tokio::test]
    async fn update_merges_areas_before_checking() {
        let store = MemoryStore::new();
        let service = FarmService::new(&store);
        let producer = owner(&store).await;
        let created = service.create(farm(producer, 100.0, 70.0, 30.0)).await.unwrap();

        // 80 + 30 > 100 once merged with the stored values
        let changes = FarmChanges {
            arable_area: Some(80.0),
            ..Default::default()
        };
        assert!(matches!(
            service.update(created.id, changes).await,
            Err(ServiceError::Validation(ValidationError::AreaExceeded { .. }))
        ));

        let changes = FarmChanges {
            total_area: Some(200.0),
            arable_area: Some(80.0),
            ..Default::default()
        };
        let updated = service.update(created.id, changes).await.unwrap();
        assert_eq!(updated.areas(), LandAreas::new(200.0, 80.0, 30.0));
        assert_eq!(updated.name, created.name);

        assert!(matches!(
            service.update(Uuid::new_v4(), FarmChanges::default()).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    /// Serves one stale read of a farm, as a concurrent writer would leave it.
    struct StaleRead {
        inner: MemoryStore,
        snapshot: std::sync::Mutex<Option<Farm>>,
    }

    #[async_trait::async_trait]
    impl FarmStore for StaleRead {
        async fn insert_farm(&self, input: &NewFarm) -> Result<Farm, DbError> {
            self.inner.insert_farm(input).await
        }

        async fn list_farms(
            &self,
            criteria: &crate::models::Criteria,
            page: Pagination,
        ) -> Result<Paginated<Farm>, DbError> {
            self.inner.list_farms(criteria, page).await
        }

        async fn find_farm(&self, id: Uuid) -> Result<Option<Farm>, DbError> {
            let stale = self.snapshot.lock().unwrap().take();
            match stale {
                Some(farm) => Ok(Some(farm)),
                None => self.inner.find_farm(id).await,
            }
        }

        async fn update_farm(
            &self,
            id: Uuid,
            changes: &FarmChanges,
        ) -> Result<Option<Farm>, DbError> {
            self.inner.update_farm(id, changes).await
        }

        async fn delete_farm(&self, id: Uuid) -> Result<DeleteOutcome, DbError> {
            self.inner.delete_farm(id).await
        }
    }

    #[tokio::test]
    async fn concurrent_area_change_is_validation_error() {
        let store = MemoryStore::new();
        let producer = owner(&store).await;
        let created = FarmService::new(&store)
            .create(farm(producer, 100.0, 50.0, 30.0))
            .await
            .unwrap();

        // Another request raises vegetation to 50 after our read
        let racing = StaleRead {
            inner: store.clone(),
            snapshot: std::sync::Mutex::new(Some(created.clone())),
        };
        FarmService::new(&store)
            .update(
                created.id,
                FarmChanges {
                    vegetation_area: Some(50.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // 60 + 30 fits the stale row; 60 + 50 does not fit the stored one
        let err = FarmService::new(&racing)
            .update(
                created.id,
                FarmChanges {
                    arable_area: Some(60.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        match err {
            ServiceError::Validation(ValidationError::AreaExceeded {
                total,
                arable,
                vegetation,
            }) => assert_eq!((total, arable, vegetation), (100.0, 60.0, 50.0)),
            other => panic!("unexpected error: {other:?}"),
        }

        let stored = store.find_farm(created.id).await.unwrap().unwrap();
        assert_eq!(stored.areas(), LandAreas::new(100.0, 50.0, 50.0));
    }

    #[tokio::test]
    async fn remove_is_blocked_by_crops() {
        let store = MemoryStore::new();
        let service = FarmService::new(&store);
        let producer = owner(&store).await;
        let guarded = service.create(farm(producer, 10.0, 5.0, 5.0)).await.unwrap();
        let free = service.create(farm(producer, 10.0, 5.0, 5.0)).await.unwrap();

        let harvest = store.insert_harvest(&NewHarvest::new(2025).unwrap()).await.unwrap();
        store
            .insert_crop(&NewCrop::new("Café", guarded.id, harvest.id).unwrap())
            .await
            .unwrap();

        let err = service.remove(guarded.id).await.unwrap_err();
        assert!(err.to_string().contains("associated crops"));
        assert!(service.find_one(guarded.id).await.is_ok());

        service.remove(free.id).await.unwrap();
        assert!(matches!(
            service.find_one(free.id).await,
            Err(ServiceError::NotFound { .. })
        ));
    }
}

//! Crop service

use tracing::{info, warn};
use uuid::Uuid;

use super::ServiceError;
use crate::db::{CropStore, DeleteOutcome};
use crate::models::{Crop, CropChanges, CropFilter, NewCrop, Paginated, Pagination};

const RESOURCE: &str = "Crop";

pub struct CropService<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: CropStore + ?Sized> CropService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: NewCrop) -> Result<Crop, ServiceError> {
        info!(farm_id = %input.farm_id, harvest_id = %input.harvest_id, "creating crop");
        let crop = self.store.insert_crop(&input).await?;
        info!(id = %crop.id, "crop created");
        Ok(crop)
    }

    pub async fn find_all(
        &self,
        filter: &CropFilter,
        page: Pagination,
    ) -> Result<Paginated<Crop>, ServiceError> {
        let result = self.store.list_crops(&filter.criteria(), page).await?;
        info!(total = result.total, "crop(s) found");
        Ok(result)
    }

    pub async fn find_one(&self, id: Uuid) -> Result<Crop, ServiceError> {
        match self.store.find_crop(id).await? {
            Some(crop) => Ok(crop),
            None => {
                warn!(%id, "crop not found");
                Err(ServiceError::not_found(RESOURCE, id))
            }
        }
    }

    pub async fn update(&self, id: Uuid, changes: CropChanges) -> Result<Crop, ServiceError> {
        info!(%id, "updating crop");
        match self.store.update_crop(id, &changes).await? {
            Some(crop) => Ok(crop),
            None => {
                warn!(%id, "crop not found");
                Err(ServiceError::not_found(RESOURCE, id))
            }
        }
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), ServiceError> {
        info!(%id, "deleting crop");
        match self.store.delete_crop(id).await? {
            DeleteOutcome::Deleted => Ok(()),
            // Nothing references crops; treat both refusals as absence
            DeleteOutcome::NotFound | DeleteOutcome::Referenced => {
                warn!(%id, "crop not found");
                Err(ServiceError::not_found(RESOURCE, id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{FarmStore, HarvestStore, MemoryStore, ProducerStore};
    use crate::models::{DocType, LandAreas, NewFarm, NewHarvest, NewProducer, ValidationError};

    async fn farm_and_harvest(store: &MemoryStore) -> (Uuid, Uuid) {
        let producer = store
            .insert_producer(&NewProducer::new("Ana", DocType::Cpf, "52998224725").unwrap())
            .await
            .unwrap();
        let farm = store
            .insert_farm(
                &NewFarm::new("F", "Barreiras", "BA", LandAreas::new(10.0, 5.0, 5.0), producer.id)
                    .unwrap(),
            )
            .await
            .unwrap();
        let harvest = store
            .insert_harvest(&NewHarvest::new(2024).unwrap())
            .await
            .unwrap();
        (farm.id, harvest.id)
    }

    #[tokio::test]
    async fn crud_cycle() {
        let store = MemoryStore::new();
        let service = CropService::new(&store);
        let (farm_id, harvest_id) = farm_and_harvest(&store).await;

        let crop = service
            .create(NewCrop::new("Soja", farm_id, harvest_id).unwrap())
            .await
            .unwrap();
        let renamed = service
            .update(crop.id, CropChanges::new(Some("Milho"), None, None).unwrap())
            .await
            .unwrap();
        assert_eq!(renamed.name, "Milho");

        let page = service
            .find_all(&CropFilter::new(Some("mil"), None, None), Pagination::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);

        service.remove(crop.id).await.unwrap();
        assert!(matches!(
            service.remove(crop.id).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_farm_is_rejected() {
        let store = MemoryStore::new();
        let service = CropService::new(&store);
        let (_, harvest_id) = farm_and_harvest(&store).await;

        let err = service
            .create(NewCrop::new("Soja", Uuid::new_v4(), harvest_id).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::UnknownReference { field: "farmId" })
        ));
    }
}

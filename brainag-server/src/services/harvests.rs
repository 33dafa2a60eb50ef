//! Harvest service

use tracing::{info, warn};
use uuid::Uuid;

use super::ServiceError;
use crate::db::{DeleteOutcome, HarvestStore};
use crate::models::{Harvest, HarvestChanges, HarvestFilter, NewHarvest, Paginated, Pagination};

const RESOURCE: &str = "Harvest";

pub struct HarvestService<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: HarvestStore + ?Sized> HarvestService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: NewHarvest) -> Result<Harvest, ServiceError> {
        info!(year = input.year, "creating harvest");
        let harvest = self.store.insert_harvest(&input).await?;
        info!(id = %harvest.id, "harvest created");
        Ok(harvest)
    }

    pub async fn find_all(
        &self,
        filter: &HarvestFilter,
        page: Pagination,
    ) -> Result<Paginated<Harvest>, ServiceError> {
        let result = self.store.list_harvests(&filter.criteria(), page).await?;
        info!(total = result.total, "harvest(s) found");
        Ok(result)
    }

    pub async fn find_one(&self, id: Uuid) -> Result<Harvest, ServiceError> {
        match self.store.find_harvest(id).await? {
            Some(harvest) => Ok(harvest),
            None => {
                warn!(%id, "harvest not found");
                Err(ServiceError::not_found(RESOURCE, id))
            }
        }
    }

    pub async fn update(&self, id: Uuid, changes: HarvestChanges) -> Result<Harvest, ServiceError> {
        info!(%id, "updating harvest");
        match self.store.update_harvest(id, &changes).await? {
            Some(harvest) => Ok(harvest),
            None => {
                warn!(%id, "harvest not found");
                Err(ServiceError::not_found(RESOURCE, id))
            }
        }
    }

    /// Delete unless crops still reference the harvest.
    pub async fn remove(&self, id: Uuid) -> Result<(), ServiceError> {
        info!(%id, "deleting harvest");
        match self.store.delete_harvest(id).await? {
            DeleteOutcome::Deleted => Ok(()),
            DeleteOutcome::NotFound => {
                warn!(%id, "harvest not found");
                Err(ServiceError::not_found(RESOURCE, id))
            }
            DeleteOutcome::Referenced => {
                warn!(%id, "harvest still has crops");
                Err(ServiceError::has_dependents(RESOURCE, id, "crops"))
            }
        }
    }
}

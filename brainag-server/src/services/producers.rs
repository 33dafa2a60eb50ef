//! Producer service

use tracing::{info, warn};
use uuid::Uuid;

use super::ServiceError;
use crate::db::{DeleteOutcome, ProducerStore};
use crate::models::{NewProducer, Paginated, Pagination, Producer, ProducerChanges, ProducerFilter};

const RESOURCE: &str = "Producer";

pub struct ProducerService<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: ProducerStore + ?Sized> ProducerService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: NewProducer) -> Result<Producer, ServiceError> {
        info!(doc_type = %input.document.doc_type(), "creating producer");
        let producer = self.store.insert_producer(&input).await?;
        info!(id = %producer.id, "producer created");
        Ok(producer)
    }

    pub async fn find_all(
        &self,
        filter: &ProducerFilter,
        page: Pagination,
    ) -> Result<Paginated<Producer>, ServiceError> {
        let result = self.store.list_producers(&filter.criteria(), page).await?;
        info!(total = result.total, "producer(s) found");
        Ok(result)
    }

    pub async fn find_one(&self, id: Uuid) -> Result<Producer, ServiceError> {
        match self.store.find_producer(id).await? {
            Some(producer) => Ok(producer),
            None => {
                warn!(%id, "producer not found");
                Err(ServiceError::not_found(RESOURCE, id))
            }
        }
    }

    pub async fn update(
        &self,
        id: Uuid,
        changes: ProducerChanges,
    ) -> Result<Producer, ServiceError> {
        info!(%id, "updating producer");
        match self.store.update_producer(id, &changes).await? {
            Some(producer) => Ok(producer),
            None => {
                warn!(%id, "producer not found");
                Err(ServiceError::not_found(RESOURCE, id))
            }
        }
    }

    /// Hard delete. Refused while the producer still owns farms.
    pub async fn remove(&self, id: Uuid) -> Result<(), ServiceError> {
        info!(%id, "deleting producer");
        match self.store.delete_producer(id).await? {
            DeleteOutcome::Deleted => Ok(()),
            DeleteOutcome::NotFound => {
                warn!(%id, "producer not found");
                Err(ServiceError::not_found(RESOURCE, id))
            }
            DeleteOutcome::Referenced => {
                warn!(%id, "producer still owns farms");
                Err(ServiceError::has_dependents(RESOURCE, id, "farms"))
            }
        }
    }
}

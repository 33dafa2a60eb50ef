//! Dashboard service

use tracing::info;

use super::ServiceError;
use crate::db::DashboardStore;
use crate::models::{DashboardFilter, DashboardSummary};

pub struct DashboardService<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: DashboardStore + ?Sized> DashboardService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Aggregate farms and crops in scope.
    ///
    /// The three farm aggregates run concurrently. Crop counts follow,
    /// restricted to the producer's farms when a producer is given.
    pub async fn summary(&self, filter: &DashboardFilter) -> Result<DashboardSummary, ServiceError> {
        let farm_scope = filter.farm_scope();
        let (total_farms, areas, farms_by_state) = tokio::try_join!(
            self.store.count_farms(&farm_scope),
            self.store.sum_farm_areas(&farm_scope),
            self.store.count_farms_by_state(&farm_scope),
        )?;

        let producer_farms = match filter.producer_id {
            Some(producer_id) => Some(self.store.farm_ids_for_producer(producer_id).await?),
            None => None,
        };
        let crops = self
            .store
            .count_crops_by_name(&filter.crop_scope(producer_farms))
            .await?;

        info!(total_farms, total_hectares = areas.total, "dashboard computed");
        Ok(DashboardSummary::new(total_farms, areas, farms_by_state, crops))
    }
}

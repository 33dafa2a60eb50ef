//! In-process store
//!
//! Mirrors the PostgreSQL schema closely enough for service and HTTP tests:
//! foreign keys are checked on write, dependent rows block deletes, lists
//! are ordered newest first (harvests by year).

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::store::{CropStore, DashboardStore, FarmStore, HarvestStore, ProducerStore};
use super::{DbError, DeleteOutcome};
use crate::models::{
    AreaTotals, Columns, Criteria, Crop, CropChanges, CropCount, Farm, FarmChanges, Harvest,
    HarvestChanges, NewCrop, NewFarm, NewHarvest, NewProducer, Paginated, Pagination, Producer,
    ProducerChanges, StateCount,
};

#[derive(Debug, Default)]
struct Tables {
    producers: Vec<Producer>,
    farms: Vec<Farm>,
    harvests: Vec<Harvest>,
    crops: Vec<Crop>,
}

impl Tables {
    fn has_producer(&self, id: Uuid) -> bool {
        self.producers.iter().any(|p| p.id == id)
    }

    fn has_farm(&self, id: Uuid) -> bool {
        self.farms.iter().any(|f| f.id == id)
    }

    fn has_harvest(&self, id: Uuid) -> bool {
        self.harvests.iter().any(|h| h.id == id)
    }

    fn scoped_farms<'a>(&'a self, scope: &'a Criteria) -> impl Iterator<Item = &'a Farm> + 'a {
        self.farms.iter().filter(move |f| scope.matches(*f))
    }
}

/// Filter, then cut the page; `rows` must already be in display order.
fn page_of<'a, T>(
    rows: impl IntoIterator<Item = &'a T>,
    criteria: &Criteria,
    page: Pagination,
) -> Paginated<T>
where
    T: Columns + Clone + 'a,
{
    let matched: Vec<T> = rows
        .into_iter()
        .filter(|row| criteria.matches(*row))
        .cloned()
        .collect();
    let total = matched.len() as i64;

    Paginated {
        data: page.apply(matched),
        total,
    }
}

fn remove_by_id<T>(rows: &mut Vec<T>, id: Uuid, id_of: impl Fn(&T) -> Uuid) -> DeleteOutcome {
    match rows.iter().position(|row| id_of(row) == id) {
        Some(index) => {
            rows.remove(index);
            DeleteOutcome::Deleted
        }
        None => DeleteOutcome::NotFound,
    }
}

/// Store backed by shared in-memory tables; clones share state
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ProducerStore for MemoryStore {
    async fn insert_producer(&self, input: &NewProducer) -> Result<Producer, DbError> {
        let now = Utc::now();
        let producer = Producer {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            document: input.document.as_str().to_owned(),
            doc_type: input.document.doc_type(),
            created_at: now,
            updated_at: now,
        };
        self.tables().producers.push(producer.clone());
        Ok(producer)
    }

    async fn list_producers(
        &self,
        criteria: &Criteria,
        page: Pagination,
    ) -> Result<Paginated<Producer>, DbError> {
        Ok(page_of(self.tables().producers.iter().rev(), criteria, page))
    }

    async fn find_producer(&self, id: Uuid) -> Result<Option<Producer>, DbError> {
        Ok(self.tables().producers.iter().find(|p| p.id == id).cloned())
    }

    async fn update_producer(
        &self,
        id: Uuid,
        changes: &ProducerChanges,
    ) -> Result<Option<Producer>, DbError> {
        let mut tables = self.tables();
        let Some(producer) = tables.producers.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        if let Some(name) = &changes.name {
            producer.name = name.clone();
        }
        if let Some(document) = &changes.document {
            producer.document = document.as_str().to_owned();
            producer.doc_type = document.doc_type();
        }
        producer.updated_at = Utc::now();
        Ok(Some(producer.clone()))
    }

    async fn delete_producer(&self, id: Uuid) -> Result<DeleteOutcome, DbError> {
        let mut tables = self.tables();
        if tables.farms.iter().any(|f| f.producer_id == id) {
            return Ok(DeleteOutcome::Referenced);
        }
        Ok(remove_by_id(&mut tables.producers, id, |p| p.id))
    }
}

#[async_trait]
impl FarmStore for MemoryStore {
    async fn insert_farm(&self, input: &NewFarm) -> Result<Farm, DbError> {
        let mut tables = self.tables();
        if !tables.has_producer(input.producer_id) {
            return Err(DbError::MissingReference { field: "producerId" });
        }

        if input.areas.validate().is_err() {
            return Err(DbError::AreaExceeded);
        }

        let now = Utc::now();
        let farm = Farm {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            city: input.city.clone(),
            state: input.state.clone(),
            total_area: input.areas.total,
            arable_area: input.areas.arable,
            vegetation_area: input.areas.vegetation,
            producer_id: input.producer_id,
            created_at: now,
            updated_at: now,
        };
        tables.farms.push(farm.clone());
        Ok(farm)
    }

    async fn list_farms(
        &self,
        criteria: &Criteria,
        page: Pagination,
    ) -> Result<Paginated<Farm>, DbError> {
        Ok(page_of(self.tables().farms.iter().rev(), criteria, page))
    }

    async fn find_farm(&self, id: Uuid) -> Result<Option<Farm>, DbError> {
        Ok(self.tables().farms.iter().find(|f| f.id == id).cloned())
    }

    async fn update_farm(&self, id: Uuid, changes: &FarmChanges) -> Result<Option<Farm>, DbError> {
        let mut tables = self.tables();
        if let Some(producer_id) = changes.producer_id {
            if !tables.has_producer(producer_id) {
                return Err(DbError::MissingReference { field: "producerId" });
            }
        }

        let Some(farm) = tables.farms.iter_mut().find(|f| f.id == id) else {
            return Ok(None);
        };

        // Same rule as the `farms_area_sum` check constraint
        let areas = changes.areas_over(farm.areas());
        if areas.validate().is_err() {
            return Err(DbError::AreaExceeded);
        }

        if let Some(name) = &changes.name {
            farm.name = name.clone();
        }
        if let Some(city) = &changes.city {
            farm.city = city.clone();
        }
        if let Some(state) = &changes.state {
            farm.state = state.clone();
        }
        farm.total_area = areas.total;
        farm.arable_area = areas.arable;
        farm.vegetation_area = areas.vegetation;
        if let Some(producer_id) = changes.producer_id {
            farm.producer_id = producer_id;
        }
        farm.updated_at = Utc::now();
        Ok(Some(farm.clone()))
    }

    async fn delete_farm(&self, id: Uuid) -> Result<DeleteOutcome, DbError> {
        let mut tables = self.tables();
        if !tables.has_farm(id) {
            return Ok(DeleteOutcome::NotFound);
        }
        if tables.crops.iter().any(|c| c.farm_id == id) {
            return Ok(DeleteOutcome::Referenced);
        }
        Ok(remove_by_id(&mut tables.farms, id, |f| f.id))
    }
}

#[async_trait]
impl HarvestStore for MemoryStore {
    async fn insert_harvest(&self, input: &NewHarvest) -> Result<Harvest, DbError> {
        let now = Utc::now();
        let harvest = Harvest {
            id: Uuid::new_v4(),
            year: input.year,
            created_at: now,
            updated_at: now,
        };
        self.tables().harvests.push(harvest.clone());
        Ok(harvest)
    }

    async fn list_harvests(
        &self,
        criteria: &Criteria,
        page: Pagination,
    ) -> Result<Paginated<Harvest>, DbError> {
        let tables = self.tables();
        let mut ordered: Vec<&Harvest> = tables.harvests.iter().rev().collect();
        // Stable: equal years keep newest-first
        ordered.sort_by(|a, b| b.year.cmp(&a.year));
        Ok(page_of(ordered, criteria, page))
    }

    async fn find_harvest(&self, id: Uuid) -> Result<Option<Harvest>, DbError> {
        Ok(self.tables().harvests.iter().find(|h| h.id == id).cloned())
    }

    async fn update_harvest(
        &self,
        id: Uuid,
        changes: &HarvestChanges,
    ) -> Result<Option<Harvest>, DbError> {
        let mut tables = self.tables();
        let Some(harvest) = tables.harvests.iter_mut().find(|h| h.id == id) else {
            return Ok(None);
        };

        if let Some(year) = changes.year {
            harvest.year = year;
        }
        harvest.updated_at = Utc::now();
        Ok(Some(harvest.clone()))
    }

    async fn delete_harvest(&self, id: Uuid) -> Result<DeleteOutcome, DbError> {
        let mut tables = self.tables();
        if !tables.has_harvest(id) {
            return Ok(DeleteOutcome::NotFound);
        }
        if tables.crops.iter().any(|c| c.harvest_id == id) {
            return Ok(DeleteOutcome::Referenced);
        }
        Ok(remove_by_id(&mut tables.harvests, id, |h| h.id))
    }
}

#[async_trait]
impl CropStore for MemoryStore {
    async fn insert_crop(&self, input: &NewCrop) -> Result<Crop, DbError> {
        let mut tables = self.tables();
        if !tables.has_farm(input.farm_id) {
            return Err(DbError::MissingReference { field: "farmId" });
        }
        if !tables.has_harvest(input.harvest_id) {
            return Err(DbError::MissingReference { field: "harvestId" });
        }

        let now = Utc::now();
        let crop = Crop {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            farm_id: input.farm_id,
            harvest_id: input.harvest_id,
            created_at: now,
            updated_at: now,
        };
        tables.crops.push(crop.clone());
        Ok(crop)
    }

    async fn list_crops(
        &self,
        criteria: &Criteria,
        page: Pagination,
    ) -> Result<Paginated<Crop>, DbError> {
        Ok(page_of(self.tables().crops.iter().rev(), criteria, page))
    }

    async fn find_crop(&self, id: Uuid) -> Result<Option<Crop>, DbError> {
        Ok(self.tables().crops.iter().find(|c| c.id == id).cloned())
    }

    async fn update_crop(&self, id: Uuid, changes: &CropChanges) -> Result<Option<Crop>, DbError> {
        let mut tables = self.tables();
        if let Some(farm_id) = changes.farm_id {
            if !tables.has_farm(farm_id) {
                return Err(DbError::MissingReference { field: "farmId" });
            }
        }
        if let Some(harvest_id) = changes.harvest_id {
            if !tables.has_harvest(harvest_id) {
                return Err(DbError::MissingReference { field: "harvestId" });
            }
        }

        let Some(crop) = tables.crops.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };

        if let Some(name) = &changes.name {
            crop.name = name.clone();
        }
        if let Some(farm_id) = changes.farm_id {
            crop.farm_id = farm_id;
        }
        if let Some(harvest_id) = changes.harvest_id {
            crop.harvest_id = harvest_id;
        }
        crop.updated_at = Utc::now();
        Ok(Some(crop.clone()))
    }

    async fn delete_crop(&self, id: Uuid) -> Result<DeleteOutcome, DbError> {
        Ok(remove_by_id(&mut self.tables().crops, id, |c| c.id))
    }
}

#[async_trait]
impl DashboardStore for MemoryStore {
    async fn count_farms(&self, scope: &Criteria) -> Result<i64, DbError> {
        Ok(self.tables().scoped_farms(scope).count() as i64)
    }

    async fn sum_farm_areas(&self, scope: &Criteria) -> Result<AreaTotals, DbError> {
        let tables = self.tables();
        Ok(tables
            .scoped_farms(scope)
            .fold(AreaTotals::default(), |acc, farm| AreaTotals {
                total: acc.total + farm.total_area,
                arable: acc.arable + farm.arable_area,
                vegetation: acc.vegetation + farm.vegetation_area,
            }))
    }

    async fn count_farms_by_state(&self, scope: &Criteria) -> Result<Vec<StateCount>, DbError> {
        let tables = self.tables();
        let mut groups: BTreeMap<&str, i64> = BTreeMap::new();
        for farm in tables.scoped_farms(scope) {
            *groups.entry(farm.state.as_str()).or_default() += 1;
        }
        Ok(groups
            .into_iter()
            .map(|(state, count)| StateCount {
                state: state.to_owned(),
                count,
            })
            .collect())
    }

    async fn farm_ids_for_producer(&self, producer_id: Uuid) -> Result<Vec<Uuid>, DbError> {
        Ok(self
            .tables()
            .farms
            .iter()
            .filter(|f| f.producer_id == producer_id)
            .map(|f| f.id)
            .collect())
    }

    async fn count_crops_by_name(&self, scope: &Criteria) -> Result<Vec<CropCount>, DbError> {
        let tables = self.tables();
        let mut groups: BTreeMap<&str, i64> = BTreeMap::new();
        for crop in tables.crops.iter().filter(|c| scope.matches(*c)) {
            *groups.entry(crop.name.as_str()).or_default() += 1;
        }
        Ok(groups
            .into_iter()
            .map(|(name, count)| CropCount {
                name: name.to_owned(),
                count,
            })
            .collect())
    }
}

//! Domain models and validation

pub mod area;
pub mod crop;
pub mod criteria;
pub mod dashboard;
pub mod document;
pub mod farm;
pub mod harvest;
pub mod pagination;
pub mod producer;
pub mod validation;

pub use area::LandAreas;
pub use crop::{Crop, CropChanges, CropFilter, NewCrop};
pub use criteria::{Columns, Criteria, Predicate, Value};
pub use dashboard::{
    AreaTotals, CropCount, DashboardFilter, DashboardSummary, LandUse, LandUseSlice, StateCount,
};
pub use document::{DocType, Document};
pub use farm::{Farm, FarmChanges, FarmFilter, NewFarm};
pub use harvest::{Harvest, HarvestChanges, HarvestFilter, NewHarvest};
pub use pagination::{Paginated, Pagination};
pub use producer::{NewProducer, Producer, ProducerChanges, ProducerFilter};
pub use validation::ValidationError;

//! Farms

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::area::hectares;
use super::validation::{non_blank, optional_text, required_text};
use super::{Columns, Criteria, LandAreas, ValidationError, Value};

/// Farm record
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Farm {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub state: String,
    pub total_area: f64,
    pub arable_area: f64,
    pub vegetation_area: f64,
    pub producer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Farm {
    pub fn areas(&self) -> LandAreas {
        LandAreas::new(self.total_area, self.arable_area, self.vegetation_area)
    }
}

impl Columns for Farm {
    fn column(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.as_str().into()),
            "city" => Some(self.city.as_str().into()),
            "state" => Some(self.state.as_str().into()),
            "producer_id" => Some(self.producer_id.into()),
            "created_at" => Some(self.created_at.into()),
            "updated_at" => Some(self.updated_at.into()),
            _ => None,
        }
    }
}

/// Input for a new farm.
///
/// Fields are individually validated here; the area-sum invariant is checked
/// by the farm service.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFarm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub areas: LandAreas,
    pub producer_id: Uuid,
}

impl NewFarm {
    pub fn new(
        name: &str,
        city: &str,
        state: &str,
        areas: LandAreas,
        producer_id: Uuid,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: required_text("name", name)?,
            city: required_text("city", city)?,
            state: required_text("state", state)?,
            areas: LandAreas::new(
                hectares("totalArea", areas.total)?,
                hectares("arableArea", areas.arable)?,
                hectares("vegetationArea", areas.vegetation)?,
            ),
            producer_id,
        })
    }
}

/// Partial update; `None` leaves the column untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FarmChanges {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub total_area: Option<f64>,
    pub arable_area: Option<f64>,
    pub vegetation_area: Option<f64>,
    pub producer_id: Option<Uuid>,
}

impl FarmChanges {
    /// Validate each supplied field.
    pub fn validated(self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: optional_text("name", self.name.as_deref())?,
            city: optional_text("city", self.city.as_deref())?,
            state: optional_text("state", self.state.as_deref())?,
            total_area: self
                .total_area
                .map(|v| hectares("totalArea", v))
                .transpose()?,
            arable_area: self
                .arable_area
                .map(|v| hectares("arableArea", v))
                .transpose()?,
            vegetation_area: self
                .vegetation_area
                .map(|v| hectares("vegetationArea", v))
                .transpose()?,
            producer_id: self.producer_id,
        })
    }

    /// Areas after applying these changes to `current`.
    pub fn areas_over(&self, current: LandAreas) -> LandAreas {
        current.merged(self.total_area, self.arable_area, self.vegetation_area)
    }
}

/// List filter (all exact matches)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FarmFilter {
    pub producer_id: Option<Uuid>,
    pub city: Option<String>,
    pub state: Option<String>,
}

impl FarmFilter {
    pub fn new(producer_id: Option<Uuid>, city: Option<&str>, state: Option<&str>) -> Self {
        Self {
            producer_id,
            city: non_blank(city),
            state: non_blank(state),
        }
    }

    pub fn criteria(&self) -> Criteria {
        Criteria::new()
            .equals_opt("producer_id", self.producer_id)
            .equals_opt("city", self.city.as_deref())
            .equals_opt("state", self.state.as_deref())
    }
}

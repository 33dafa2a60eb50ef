//! Crops planted on a farm during a harvest

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::validation::{non_blank, optional_text, required_text};
use super::{Columns, Criteria, ValidationError, Value};

/// Crop record
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Crop {
    pub id: Uuid,
    pub name: String,
    pub farm_id: Uuid,
    pub harvest_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Columns for Crop {
    fn column(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.as_str().into()),
            "farm_id" => Some(self.farm_id.into()),
            "harvest_id" => Some(self.harvest_id.into()),
            "created_at" => Some(self.created_at.into()),
            "updated_at" => Some(self.updated_at.into()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCrop {
    pub name: String,
    pub farm_id: Uuid,
    pub harvest_id: Uuid,
}

impl NewCrop {
    pub fn new(name: &str, farm_id: Uuid, harvest_id: Uuid) -> Result<Self, ValidationError> {
        Ok(Self {
            name: required_text("name", name)?,
            farm_id,
            harvest_id,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CropChanges {
    pub name: Option<String>,
    pub farm_id: Option<Uuid>,
    pub harvest_id: Option<Uuid>,
}

impl CropChanges {
    pub fn new(
        name: Option<&str>,
        farm_id: Option<Uuid>,
        harvest_id: Option<Uuid>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: optional_text("name", name)?,
            farm_id,
            harvest_id,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CropFilter {
    /// Case-insensitive substring
    pub name: Option<String>,
    pub farm_id: Option<Uuid>,
    pub harvest_id: Option<Uuid>,
}

impl CropFilter {
    pub fn new(name: Option<&str>, farm_id: Option<Uuid>, harvest_id: Option<Uuid>) -> Self {
        Self {
            name: non_blank(name),
            farm_id,
            harvest_id,
        }
    }

    pub fn criteria(&self) -> Criteria {
        Criteria::new()
            .contains_ignore_case_opt("name", self.name.as_deref())
            .equals_opt("farm_id", self.farm_id)
            .equals_opt("harvest_id", self.harvest_id)
    }
}

//! Harvests (crop seasons), identified by year

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::{Columns, Criteria, ValidationError, Value};

/// Earliest accepted harvest year
pub const MIN_YEAR: i32 = 1900;

/// Harvest record
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Harvest {
    pub id: Uuid,
    pub year: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Columns for Harvest {
    fn column(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(self.id.into()),
            "year" => Some(self.year.into()),
            "created_at" => Some(self.created_at.into()),
            "updated_at" => Some(self.updated_at.into()),
            _ => None,
        }
    }
}

fn harvest_year(year: i32) -> Result<i32, ValidationError> {
    if year < MIN_YEAR {
        return Err(ValidationError::BelowMinimum {
            field: "year",
            min: i64::from(MIN_YEAR),
        });
    }
    Ok(year)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewHarvest {
    pub year: i32,
}

impl NewHarvest {
    pub fn new(year: i32) -> Result<Self, ValidationError> {
        Ok(Self {
            year: harvest_year(year)?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestChanges {
    pub year: Option<i32>,
}

impl HarvestChanges {
    pub fn new(year: Option<i32>) -> Result<Self, ValidationError> {
        Ok(Self {
            year: year.map(harvest_year).transpose()?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestFilter {
    pub year: Option<i32>,
}

impl HarvestFilter {
    pub fn criteria(&self) -> Criteria {
        Criteria::new().equals_opt("year", self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_floor() {
        assert!(NewHarvest::new(1900).is_ok());
        assert!(matches!(
            NewHarvest::new(1899),
            Err(ValidationError::BelowMinimum { min: 1900, .. })
        ));
        assert!(HarvestChanges::new(Some(1800)).is_err());
        assert_eq!(HarvestChanges::new(None).unwrap(), HarvestChanges::default());
    }
}

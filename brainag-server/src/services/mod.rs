//! Resource services
//!
//! Each service borrows a store and enforces the rules that span more than
//! one field: farm areas, existence checks and delete conflicts. Inputs
//! arrive already field-validated.

pub mod crops;
pub mod dashboard;
pub mod farms;
pub mod harvests;
pub mod producers;

pub use crops::CropService;
pub use dashboard::DashboardService;
pub use farms::FarmService;
pub use harvests::HarvestService;
pub use producers::ProducerService;

use uuid::Uuid;

use crate::db::DbError;
use crate::models::ValidationError;

/// Service-level error
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: &'static str, id: Uuid },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Delete refused because other rows depend on the target
    #[error("{message}")]
    Conflict { message: String },

    #[error(transparent)]
    Database(DbError),
}

impl ServiceError {
    pub(crate) fn not_found(resource: &'static str, id: Uuid) -> Self {
        Self::NotFound { resource, id }
    }

    pub(crate) fn has_dependents(resource: &'static str, id: Uuid, dependents: &str) -> Self {
        Self::Conflict {
            message: format!(
                "Cannot delete {} with ID {} because it has associated {}",
                resource.to_lowercase(),
                id,
                dependents
            ),
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::MissingReference { field } => {
                Self::Validation(ValidationError::UnknownReference { field })
            }
            other => Self::Database(other),
        }
    }
}

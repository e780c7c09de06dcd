//! Catalog admin models and DTOs.

use edugate_core::serde::deserialize_optional_id;
use edugate_models::MaterialId;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

pub use edugate_models::catalog::*;

/// Narrows a list to one material.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MaterialFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub material_id: Option<MaterialId>,
}

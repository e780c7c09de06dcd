//! Effective access models.
//!
//! The access shape is computed by the entitlement engine and never stored.

pub use edugate_entitlements::{ContentType, EffectiveAccess, MaterialAccess, SectionAccess};
pub use edugate_models::content::{AccessibleMaterialsCount, AccessibleMaterialsResponse};

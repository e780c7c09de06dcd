//! # Edugate Entitlements
//!
//! Decides what a student may see at full fidelity and what they get as a
//! free preview instead.
//!
//! The crate is pure: callers load codes groups and candidate content from
//! the store and hand them in. Nothing here performs I/O or caches results.
//!
//! - [`grant`]: Normalizes a stored codes group into one canonical [`Grant`],
//!   whatever mix of legacy and per-type fields issued it
//! - [`access`]: [`EffectiveAccess`], the union of every valid grant, and the
//!   [`has_access`] gate
//! - [`sampler`]: The [`Sampler`] seam for uniform random selection
//! - [`fallback`]: Bounded previews served when access is absent
//! - [`provisioning`]: Maps a code provisioning request onto a grant surface
//! - [`codegen`]: Redemption code generation
//!
//! # Example
//!
//! ```ignore
//! use edugate_entitlements::{ContentType, ResolutionPolicy, resolve};
//!
//! let access = resolve(&valid_groups, Utc::now(), ResolutionPolicy::default());
//! if access.has_access(ContentType::Questions, material_id, Some(section_id)) {
//!     // full catalog read
//! } else {
//!     // fallback::select_free_questions(...)
//! }
//! ```

pub mod access;
pub mod codegen;
pub mod fallback;
pub mod grant;
pub mod provisioning;
pub mod sampler;

#[cfg(test)]
mod testing;

pub use access::{ContentType, EffectiveAccess, MaterialAccess, SectionAccess, has_access, resolve};
pub use fallback::FallbackSource;
pub use grant::{Grant, ResolutionPolicy};
pub use provisioning::{GrantPlan, GrantPlanError, plan_grant};
pub use sampler::{RandomSampler, Sampler, SeededSampler};

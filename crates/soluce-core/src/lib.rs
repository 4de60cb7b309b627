//! # soluce-core
//!
//! Foundation crate for the VendorSoluce gating engine.
//! Defines tiers, the capability table, assessment templates, vendor and
//! assessment records, config, errors and tracing setup.
//! Every other crate in the workspace depends on this.

pub mod capabilities;
pub mod config;
pub mod errors;
pub mod models;
pub mod templates;
pub mod tier;
pub mod tracing_setup;

// Re-export the most commonly used types at the crate root.
pub use capabilities::{capabilities_for, Limit, ResourceKind, TierCapabilities};
pub use config::SoluceConfig;
pub use errors::{GateError, GateResult, SoluceErrorCode, StorageError};
pub use templates::TemplateId;
pub use tier::Tier;

//! # soluce-gating
//!
//! License tier resolution and usage gating for VendorSoluce.
//!
//! - `resolver`: license record, then purchase token, then Free
//! - `activation`: key syntax check, online validation with offline fallback
//! - `usage`: monthly analysis metering with lazy month rollover
//! - `gate`: limit and feature checks around every gated action
//! - `signal`: upgrade prompt state machine
//! - `service`: `GatingService`, the context object that wires it together

pub mod activation;
pub mod authority;
pub mod clock;
pub mod gate;
pub mod license_key;
pub mod resolver;
pub mod service;
pub mod signal;
pub mod usage;

pub use activation::{ActivationOutcome, DeactivationOutcome};
pub use authority::{AuthorityError, AuthorityVerdict, HttpLicenseAuthority, LicenseAuthority, NoAuthority};
pub use clock::{Clock, FixedClock, SystemClock};
pub use gate::{
    AnalysisGrant, Denial, ExportContext, ExportFormat, GateDecision, GatedFeature, SampleBatch,
};
pub use license_key::{mask_license_key, LicenseKey};
pub use resolver::{LicenseSource, LicenseStatus, TierResolution};
pub use service::GatingService;
pub use signal::{UpgradePrompt, UpgradePromptState};
pub use usage::UsageStatistics;

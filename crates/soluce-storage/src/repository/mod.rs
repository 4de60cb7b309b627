//! Typed repositories over the guarded store, one per persisted record kind.

pub mod license;
pub mod preferences;
pub mod purchase;
pub mod vendors;

pub use license::LicenseRecordRepository;
pub use preferences::{PreferenceStore, Theme};
pub use purchase::PurchaseTokenRepository;
pub use vendors::VendorRepository;

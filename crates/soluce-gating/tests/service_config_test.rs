//! `GatingService::from_config` wiring: SQLite on disk, HTTP authority.

use soluce_core::config::{LicenseConfig, StorageConfig};
use soluce_core::{SoluceConfig, Tier};
use soluce_gating::{GatingService, LicenseSource};

fn config_at(path: &std::path::Path, api_url: Option<&str>) -> SoluceConfig {
    SoluceConfig {
        storage: StorageConfig {
            db_path: Some(path.to_string_lossy().into_owned()),
        },
        license: LicenseConfig {
            license_api_url: api_url.map(str::to_string),
            online_timeout_ms: Some(500),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[tokio::test]
async fn test_unreachable_authority_falls_back_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("soluce.db");

    {
        let svc = GatingService::from_config(config_at(&path, Some("http://127.0.0.1:9"))).unwrap();
        let outcome = svc
            .activate_license("ENTERPRISE-AAAA-BBBB-CCCC-DDDD", true)
            .await
            .unwrap();
        assert_eq!(outcome.tier, Tier::Enterprise);
        assert!(!outcome.validated_online);
    }

    // A new session over the same database sees the license.
    let svc = GatingService::from_config(config_at(&path, None)).unwrap();
    let resolution = svc.resolve_tier();
    assert_eq!(resolution.tier, Tier::Enterprise);
    assert_eq!(resolution.source, LicenseSource::License);
    assert!(!svc.license_record().unwrap().data.online);
}

#[test]
fn test_in_memory_default_config() {
    let svc = GatingService::from_config(SoluceConfig::default()).unwrap();
    assert!(svc.is_storage_available());
    assert_eq!(svc.current_tier(), Tier::Free);
    assert_eq!(svc.config().license.effective_product_id(), "vendorsoluce");
}

#[tokio::test]
async fn test_env_overrides_reach_production_wiring() {
    let lookup = |name: &str| match name {
        "SOLUCE_LICENSE_API_URL" => Some("http://127.0.0.1:9".to_string()),
        "SOLUCE_PRO_PAYMENT_LINK" => Some("https://pay.vendorsoluce.test/pro".to_string()),
        _ => None,
    };
    let config = SoluceConfig {
        license: LicenseConfig {
            online_timeout_ms: Some(500),
            ..Default::default()
        },
        ..Default::default()
    };
    let svc = GatingService::from_config_with_overrides(config, lookup).unwrap();

    assert_eq!(
        svc.config().license.license_api_url.as_deref(),
        Some("http://127.0.0.1:9")
    );
    assert_eq!(
        svc.config().upgrade.payment_link(Tier::Pro),
        Some("https://pay.vendorsoluce.test/pro")
    );

    // The overridden URL wires an authority; it is unreachable, so
    // activation falls back to offline.
    let outcome = svc
        .activate_license("PRO-AAAA-BBBB-CCCC-DDDD", true)
        .await
        .unwrap();
    assert!(!outcome.validated_online);
    assert_eq!(outcome.tier, Tier::Pro);
}

#[test]
fn test_empty_override_values_are_ignored() {
    let svc = GatingService::from_config_with_overrides(SoluceConfig::default(), |_| {
        Some("  ".to_string())
    })
    .unwrap();
    assert!(svc.config().license.license_api_url.is_none());
}

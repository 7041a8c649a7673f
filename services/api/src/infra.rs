use fincoach::config::{DatabaseConfig, IdentityConfig};
use fincoach::error::AppError;
use fincoach::identity::StaticTokenVerifier;
use fincoach::storage::SqliteStore;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn open_store(config: &DatabaseConfig) -> Result<Arc<SqliteStore>, AppError> {
    let store = if config.is_in_memory() {
        warn!("using an in-memory database; data is lost on shutdown");
        SqliteStore::open_in_memory()?
    } else {
        info!(path = %config.path.display(), "opening sqlite database");
        SqliteStore::open(&config.path)?
    };
    Ok(Arc::new(store))
}

pub(crate) fn identity_verifier(
    config: &IdentityConfig,
) -> Result<Arc<StaticTokenVerifier>, AppError> {
    let verifier = StaticTokenVerifier::from_config(config)?;
    if verifier.is_empty() {
        warn!("no identity tokens configured; every request will be rejected as unauthorized");
    } else {
        info!(tokens = verifier.len(), "identity verifier loaded");
    }
    Ok(Arc::new(verifier))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn memory_path_opens_throwaway_store() {
        let config = DatabaseConfig {
            path: PathBuf::from(":memory:"),
        };
        assert!(open_store(&config).is_ok());
    }

    #[test]
    fn verifier_rejects_malformed_entries() {
        let config = IdentityConfig {
            tokens: "no-separator".to_string(),
        };
        assert!(matches!(
            identity_verifier(&config),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn verifier_counts_configured_tokens() {
        let config = IdentityConfig {
            tokens: "t1=alice:alice@example.com; t2=bob".to_string(),
        };
        let verifier = identity_verifier(&config).expect("valid entries");
        assert_eq!(verifier.len(), 2);
    }
}

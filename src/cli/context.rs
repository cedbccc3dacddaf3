use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::config::{parse_config, NablonConfig};
use crate::errors::NablonError;
use crate::fixtures::{load_catalog, Catalog};

/// Configuration and catalog every subcommand runs against.
#[derive(Debug)]
pub struct AppContext {
    pub config: NablonConfig,
    pub catalog: Arc<Catalog>,
    /// Where the catalog came from; None for the built-in one.
    pub catalog_path: Option<PathBuf>,
}

/// Load the config file, if any, then the catalog: the --fixtures flag
/// wins over `fixtures.path` in the config, which wins over the built-in.
pub async fn load_context(config: Option<&str>, fixtures: Option<&str>) -> Result<AppContext, NablonError> {
    let config = match config {
        Some(path) => parse_config(Path::new(path)).await?,
        None => NablonConfig::default(),
    };

    let catalog_path = fixtures
        .map(PathBuf::from)
        .or_else(|| config.fixtures_path().cloned());

    let catalog = match &catalog_path {
        Some(path) => load_catalog(path).await?,
        None => {
            debug!("Using built-in fixture catalog");
            Catalog::builtin()?
        }
    };

    Ok(AppContext {
        config,
        catalog: Arc::new(catalog),
        catalog_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_defaults_to_builtin_catalog() {
        let ctx = load_context(None, None).await.unwrap();
        assert!(ctx.catalog_path.is_none());
        assert!(!ctx.catalog.workflows.is_empty());
    }

    #[tokio::test]
    async fn test_config_fixtures_path_used() {
        let mut catalog = tempfile::NamedTempFile::new().unwrap();
        write!(catalog, r#"{{"workflows":[{{"question":"only one","answer":"yes"}}]}}"#).unwrap();

        let mut config = tempfile::NamedTempFile::new().unwrap();
        writeln!(config, "fixtures:\n  path: {}", catalog.path().display()).unwrap();

        let ctx = load_context(config.path().to_str(), None).await.unwrap();
        assert_eq!(ctx.catalog.workflows.len(), 1);
        assert_eq!(ctx.catalog_path.as_deref(), Some(catalog.path()));
    }

    #[tokio::test]
    async fn test_missing_fixtures_is_fixture_error() {
        let err = load_context(None, Some("/nonexistent/catalog.json")).await.unwrap_err();
        assert!(matches!(err, NablonError::Fixture(_)));
    }
}

//! # Core Configuration Module
//!
//! Provides configuration management for the search core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds all dependencies and settings the core needs. It
//! enforces fail-fast validation so a misconfigured core fails at build time
//! rather than on the first search.
//!
//! ## Required Dependencies
//!
//! - `SearchProvider` - The remote search backend (e.g. the GitHub provider)
//! - Database location - Where the local cache lives
//!
//! ## Optional Settings (with defaults)
//!
//! - `PagingConfig` - Page size and starting page (default: 50 items, page 1)
//!
//! ## Usage
//!
//! ### Basic Configuration
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use provider_github::{GithubSearchProvider, ReqwestHttpClient};
//! use std::sync::Arc;
//!
//! let http = Arc::new(ReqwestHttpClient::new());
//! let config = CoreConfig::builder()
//!     .database_path("/path/to/search.db")
//!     .provider(Arc::new(GithubSearchProvider::new(http)))
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! ### Configuration with Custom Paging
//!
//! ```ignore
//! use core_paging::PagingConfig;
//! use core_runtime::config::CoreConfig;
//! use core_store::DatabaseConfig;
//! use provider_github::{GithubSearchProvider, ReqwestHttpClient};
//! use std::sync::Arc;
//!
//! let http = Arc::new(ReqwestHttpClient::new());
//! let config = CoreConfig::builder()
//!     .database(DatabaseConfig::new("/path/to/search.db").max_connections(2))
//!     .paging(PagingConfig::default().page_size(30))
//!     .provider(Arc::new(GithubSearchProvider::new(http).with_token("ghp_...")))
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! ## Error Handling
//!
//! The builder validates all required dependencies and reports what is
//! missing:
//!
//! ```
//! use core_runtime::config::CoreConfig;
//!
//! // No provider injected: the build fails with an actionable message.
//! let result = CoreConfig::builder()
//!     .database_path("/path/to/search.db")
//!     .build();
//! assert!(result.is_err());
//! ```

use crate::error::{Error, Result};
use core_paging::PagingConfig;
use core_store::DatabaseConfig;
use search_traits::SearchProvider;
use std::path::PathBuf;
use std::sync::Arc;

/// Core configuration for the search core.
///
/// This struct holds all dependencies and settings required to initialize
/// the core. Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Connection pool settings for the local cache database
    pub database: DatabaseConfig,

    /// Page sizing shared by the paging source and the sync coordinator
    pub paging: PagingConfig,

    /// Remote search backend
    pub provider: Arc<dyn SearchProvider>,
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// use core_runtime::config::CoreConfig;
    ///
    /// let config = CoreConfig::builder()
    ///     .database_path("/path/to/search.db")
    ///     .provider(provider)
    ///     .build()?;
    /// ```
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Database URL is not empty
    /// - Page size is greater than zero
    pub fn validate(&self) -> Result<()> {
        if self.database.database_url.is_empty() {
            return Err(Error::Config("Database URL cannot be empty".to_string()));
        }

        if self.paging.page_size == 0 {
            return Err(Error::Config(
                "Page size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for [`CoreConfig`].
#[derive(Default)]
pub struct CoreConfigBuilder {
    database: Option<DatabaseConfig>,
    paging: Option<PagingConfig>,
    provider: Option<Arc<dyn SearchProvider>>,
}

impl CoreConfigBuilder {
    /// Sets the database path.
    ///
    /// Pool sizing falls back to [`DatabaseConfig::new`] defaults. Use
    /// [`database`](Self::database) for full control.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Examples
    ///
    /// ```
    /// use core_runtime::config::CoreConfig;
    ///
    /// let builder = CoreConfig::builder()
    ///     .database_path("/path/to/search.db");
    /// ```
    pub fn database_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.database = Some(DatabaseConfig::new(path));
        self
    }

    /// Sets the full database configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_runtime::config::CoreConfig;
    /// use core_store::DatabaseConfig;
    ///
    /// let builder = CoreConfig::builder()
    ///     .database(DatabaseConfig::in_memory().max_connections(1));
    /// ```
    pub fn database(mut self, config: DatabaseConfig) -> Self {
        self.database = Some(config);
        self
    }

    /// Sets the paging configuration.
    ///
    /// Default: 50 items per page, starting at page 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_paging::PagingConfig;
    /// use core_runtime::config::CoreConfig;
    ///
    /// let builder = CoreConfig::builder()
    ///     .paging(PagingConfig::default().page_size(30));
    /// ```
    pub fn paging(mut self, config: PagingConfig) -> Self {
        self.paging = Some(config);
        self
    }

    /// Sets the remote search provider.
    ///
    /// Required. The core never talks to the network directly; every fetch
    /// goes through this provider.
    pub fn provider(mut self, provider: Arc<dyn SearchProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Builds the configuration, validating all required fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a required dependency is missing or a
    /// setting is out of range.
    pub fn build(self) -> Result<CoreConfig> {
        // Validate required fields
        let provider = self.provider.ok_or_else(|| {
            Error::Config("Search provider is required. Use .provider() to set it.".to_string())
        })?;

        let database = self.database.ok_or_else(|| {
            Error::Config(
                "Database configuration is required. Use .database_path() or .database() to set it."
                    .to_string(),
            )
        })?;

        let config = CoreConfig {
            database,
            paging: self.paging.unwrap_or_default(),
            provider,
        };

        config.validate()?;

        Ok(config)
    }
}

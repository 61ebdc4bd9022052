//! The top-level client handed to applications.

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::clients::{RestClient, RestError};
use crate::config::MoySkladConfig;
use crate::error::ConfigError;
use crate::model::TimeZones;
use crate::rest::{Entity, EntityRepository, Paginator};

/// Entry point to the MoySklad API.
///
/// Owns the configuration and a [`RestClient`]. Repositories and paginators
/// borrow from it and are cheap to create per call.
///
/// # Example
///
/// ```rust,ignore
/// use moysklad_api::{AccessToken, MoySkladClient, MoySkladConfig};
/// use tokio_util::sync::CancellationToken;
///
/// let config = MoySkladConfig::builder()
///     .token(AccessToken::new("my-token")?)
///     .user_time_zone(chrono_tz::Europe::Berlin)
///     .build()?;
/// let client = MoySkladClient::new(config)?;
///
/// let cancel = CancellationToken::new();
/// let products = client
///     .repository::<Product>()
///     .fetch_all(None, &cancel)
///     .await?;
/// let hits = client.search("bolt", &cancel).await?;
/// ```
#[derive(Debug)]
pub struct MoySkladClient {
    config: MoySkladConfig,
    rest: RestClient,
}

// Verify MoySkladClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MoySkladClient>();
};

impl MoySkladClient {
    /// Creates a client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the HTTP client cannot be built.
    pub fn new(config: MoySkladConfig) -> Result<Self, ConfigError> {
        let rest = RestClient::new(&config)?;
        if config.debug() {
            debug!(
                user_time_zone = %config.user_time_zone(),
                page_size = config.page_size(),
                "MoySklad client created"
            );
        }
        Ok(Self { config, rest })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &MoySkladConfig {
        &self.config
    }

    /// Returns the REST client for raw calls.
    #[must_use]
    pub const fn rest(&self) -> &RestClient {
        &self.rest
    }

    /// Returns the zones used to convert server timestamps.
    #[must_use]
    pub const fn time_zones(&self) -> TimeZones {
        self.config.time_zones()
    }

    /// Returns a repository for entity type `T`.
    #[must_use]
    pub const fn repository<T: Entity>(&self) -> EntityRepository<'_, T> {
        EntityRepository::new(&self.rest, self.config.page_size())
    }

    /// Returns a paginator using the configured page size.
    #[must_use]
    pub const fn paginator(&self) -> Paginator<'_> {
        Paginator::new(&self.rest, self.config.page_size())
    }

    /// Searches all entity types for `text`.
    ///
    /// The result is returned as sent by the server.
    ///
    /// # Errors
    ///
    /// Returns [`RestError`] if the request fails.
    pub async fn search(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<Value, RestError> {
        self.rest
            .get(
                "entity/search",
                &[("search".to_string(), text.to_string())],
                cancel,
            )
            .await
    }
}

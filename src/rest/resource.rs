//! Generic entity repository for CRUD, bulk and list operations.
//!
//! This module defines the [`Entity`] trait, which ties a serde type to its
//! endpoint, and the [`EntityRepository`] that performs operations on it.
//! Documents with a positions sub-collection also implement
//! [`TradeDocument`], which unlocks the positions helpers.
//!
//! # Implementing an Entity
//!
//! ```rust,ignore
//! use moysklad_api::rest::{Entity, ListEntity, Meta, TradeDocument};
//! use moysklad_api::model::Position;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! #[serde(rename_all = "camelCase")]
//! pub struct CustomerOrder {
//!     pub meta: Option<Meta>,
//!     pub id: Option<String>,
//!     pub name: Option<String>,
//!     pub positions: Option<ListEntity<Position>>,
//! }
//!
//! impl Entity for CustomerOrder {
//!     const NAME: &'static str = "CustomerOrder";
//!     const PATH: &'static str = "entity/customerorder";
//!
//!     fn id(&self) -> Option<&str> {
//!         self.id.as_deref()
//!     }
//! }
//!
//! impl TradeDocument for CustomerOrder {
//!     type Position = Position;
//!
//!     fn positions(&self) -> Option<&ListEntity<Position>> {
//!         self.positions.as_ref()
//!     }
//! }
//!
//! // Usage:
//! let orders = client.repository::<CustomerOrder>();
//! let order = orders.find_by_id("5f1c...", None, &cancel).await?;
//! let positions = orders.load_positions(&order, &cancel).await?;
//! ```

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::clients::RestClient;
use crate::rest::{ListEntity, Paginator, QueryBuilder, ResourceError};

/// An addressable API entity.
///
/// # Associated Constants
///
/// - `NAME`: The entity name used in error messages (e.g., "Product")
/// - `PATH`: The collection path relative to the base URL (e.g., "entity/product")
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    /// The entity name used in error messages.
    const NAME: &'static str;

    /// The collection path relative to the base URL.
    const PATH: &'static str;

    /// Returns the server-assigned ID, or `None` for unsaved entities.
    fn id(&self) -> Option<&str>;
}

/// A document with an embedded positions (line items) sub-collection.
pub trait TradeDocument: Entity {
    /// The row type of the positions sub-collection.
    type Position: Serialize + DeserializeOwned + Clone + Send + Sync;

    /// Returns the embedded positions envelope, if the document carries one.
    fn positions(&self) -> Option<&ListEntity<Self::Position>>;
}

/// Bulk endpoints answer with a plain array; some deployments wrap it in a
/// list envelope. Both are accepted.
#[derive(Deserialize)]
#[serde(untagged)]
enum BulkRows<T> {
    Rows(Vec<T>),
    List(ListEntity<T>),
}

impl<T> BulkRows<T> {
    fn into_rows(self) -> Vec<T> {
        match self {
            Self::Rows(rows) => rows,
            Self::List(list) => list.into_rows(),
        }
    }
}

/// Operations on one entity type.
///
/// A repository borrows the [`RestClient`] and holds no other state, so it is
/// cheap to create per call site.
#[derive(Debug)]
pub struct EntityRepository<'a, T> {
    client: &'a RestClient,
    page_size: u32,
    entity: PhantomData<fn() -> T>,
}

impl<T> Clone for EntityRepository<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for EntityRepository<'_, T> {}

impl<'a, T: Entity> EntityRepository<'a, T> {
    /// Creates a repository that paginates with `page_size` rows per request.
    #[must_use]
    pub const fn new(client: &'a RestClient, page_size: u32) -> Self {
        Self {
            client,
            page_size,
            entity: PhantomData,
        }
    }

    /// Returns the collection path.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        T::PATH
    }

    /// Returns an empty [`QueryBuilder`].
    #[must_use]
    pub fn query(&self) -> QueryBuilder {
        QueryBuilder::new()
    }

    fn paginator(&self) -> Paginator<'a> {
        Paginator::new(self.client, self.page_size)
    }

    /// Fetches one page of the collection.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Rest`] if the request fails.
    pub async fn find_all(
        &self,
        query: Option<&QueryBuilder>,
        cancel: &CancellationToken,
    ) -> Result<ListEntity<T>, ResourceError> {
        let params = query.map(QueryBuilder::to_params).unwrap_or_default();
        let page: Option<ListEntity<T>> = self.client.get(T::PATH, &params, cancel).await?;
        Ok(page.unwrap_or_default())
    }

    /// Fetches every row of the collection.
    ///
    /// Filters, ordering, expansions and search from `query` are kept on
    /// every page; `limit` and `offset` are owned by the pagination engine.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Rest`] if any page request fails.
    pub async fn fetch_all(
        &self,
        query: Option<&QueryBuilder>,
        cancel: &CancellationToken,
    ) -> Result<Vec<T>, ResourceError> {
        let params = query
            .map(QueryBuilder::to_unpaged_params)
            .unwrap_or_default();
        Ok(self
            .paginator()
            .fetch_all_by_path(T::PATH, params, cancel)
            .await?)
    }

    /// Fetches one entity by ID.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::EmptyId`] for a blank ID and
    /// [`ResourceError::Rest`] if the request fails (404 included).
    pub async fn find_by_id(
        &self,
        id: &str,
        query: Option<&QueryBuilder>,
        cancel: &CancellationToken,
    ) -> Result<T, ResourceError> {
        let id = require_id(id, T::NAME)?;
        let params = query.map(QueryBuilder::to_params).unwrap_or_default();
        Ok(self
            .client
            .get(format!("{}/{id}", T::PATH), &params, cancel)
            .await?)
    }

    /// Creates an entity and returns the server's copy.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Rest`] if the request fails.
    pub async fn create(&self, entity: &T, cancel: &CancellationToken) -> Result<T, ResourceError> {
        Ok(self.client.post(T::PATH, entity, cancel).await?)
    }

    /// Updates an existing entity and returns the server's copy.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] if the entity has no ID and
    /// [`ResourceError::Rest`] if the request fails.
    pub async fn update(&self, entity: &T, cancel: &CancellationToken) -> Result<T, ResourceError> {
        let id = entity
            .id()
            .filter(|id| !id.trim().is_empty())
            .ok_or(ResourceError::MissingId {
                resource: T::NAME,
                operation: "update",
            })?;
        Ok(self
            .client
            .put(format!("{}/{id}", T::PATH), entity, cancel)
            .await?)
    }

    /// Deletes an entity by ID.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::EmptyId`] for a blank ID and
    /// [`ResourceError::Rest`] if the request fails.
    pub async fn delete(&self, id: &str, cancel: &CancellationToken) -> Result<(), ResourceError> {
        let id = require_id(id, T::NAME)?;
        self.client
            .delete(format!("{}/{id}", T::PATH), cancel)
            .await?;
        Ok(())
    }

    /// Creates several entities in one request.
    ///
    /// The API applies each item independently; a partial failure is not
    /// rolled back.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::EmptyBatch`] for an empty slice and
    /// [`ResourceError::Rest`] if the request fails.
    pub async fn create_bulk(
        &self,
        entities: &[T],
        cancel: &CancellationToken,
    ) -> Result<Vec<T>, ResourceError> {
        if entities.is_empty() {
            return Err(ResourceError::EmptyBatch { resource: T::NAME });
        }
        self.post_bulk(entities, cancel).await
    }

    /// Updates several entities in one request. Every entity needs an ID.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::EmptyBatch`] for an empty slice,
    /// [`ResourceError::MissingId`] if any entity has no ID and
    /// [`ResourceError::Rest`] if the request fails.
    pub async fn update_bulk(
        &self,
        entities: &[T],
        cancel: &CancellationToken,
    ) -> Result<Vec<T>, ResourceError> {
        if entities.is_empty() {
            return Err(ResourceError::EmptyBatch { resource: T::NAME });
        }
        if entities
            .iter()
            .any(|e| e.id().map_or(true, |id| id.trim().is_empty()))
        {
            return Err(ResourceError::MissingId {
                resource: T::NAME,
                operation: "bulk update",
            });
        }
        self.post_bulk(entities, cancel).await
    }

    async fn post_bulk(
        &self,
        entities: &[T],
        cancel: &CancellationToken,
    ) -> Result<Vec<T>, ResourceError> {
        let rows: Option<BulkRows<T>> = self.client.post(T::PATH, entities, cancel).await?;
        Ok(rows.map(BulkRows::into_rows).unwrap_or_default())
    }

    /// Deletes several entities by ID in one request.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::EmptyBatch`] for an empty slice,
    /// [`ResourceError::EmptyId`] if any ID is blank and
    /// [`ResourceError::Rest`] if the request fails.
    pub async fn delete_bulk<S: AsRef<str>>(
        &self,
        ids: &[S],
        cancel: &CancellationToken,
    ) -> Result<(), ResourceError> {
        if ids.is_empty() {
            return Err(ResourceError::EmptyBatch { resource: T::NAME });
        }
        let ids = ids
            .iter()
            .map(|id| require_id(id.as_ref(), T::NAME))
            .collect::<Result<Vec<_>, _>>()?;
        let _: Value = self
            .client
            .post(format!("{}/delete", T::PATH), &ids, cancel)
            .await?;
        Ok(())
    }

    /// Fetches the entity type's metadata (custom attributes, states, ...).
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Rest`] if the request fails.
    pub async fn metadata(&self, cancel: &CancellationToken) -> Result<Value, ResourceError> {
        Ok(self
            .client
            .get(format!("{}/metadata", T::PATH), &[], cancel)
            .await?)
    }
}

impl<'a, T: TradeDocument> EntityRepository<'a, T> {
    fn positions_path(document_id: &str) -> Result<String, ResourceError> {
        let id = require_id(document_id, T::NAME)?;
        Ok(format!("{}/{id}/positions", T::PATH))
    }

    /// Fetches the first page of a document's positions.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::EmptyId`] for a blank ID and
    /// [`ResourceError::Rest`] if the request fails.
    pub async fn positions(
        &self,
        document_id: &str,
        cancel: &CancellationToken,
    ) -> Result<ListEntity<T::Position>, ResourceError> {
        let path = Self::positions_path(document_id)?;
        let page: Option<ListEntity<T::Position>> = self.client.get(path, &[], cancel).await?;
        Ok(page.unwrap_or_default())
    }

    /// Fetches every position of a document by ID.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::EmptyId`] for a blank ID and
    /// [`ResourceError::Rest`] if any page request fails.
    pub async fn fetch_all_positions(
        &self,
        document_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<T::Position>, ResourceError> {
        let path = Self::positions_path(document_id)?;
        Ok(self
            .paginator()
            .fetch_all_by_path(&path, Vec::new(), cancel)
            .await?)
    }

    /// Returns every position of `document`.
    ///
    /// Materialized rows are returned without a request. Otherwise the
    /// positions link from the document is paginated, falling back to the
    /// document ID.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::PositionsUnavailable`] if the document has
    /// neither rows, a link nor an ID, and [`ResourceError::Rest`] if a page
    /// request fails.
    pub async fn load_positions(
        &self,
        document: &T,
        cancel: &CancellationToken,
    ) -> Result<Vec<T::Position>, ResourceError> {
        let embedded = document.positions();

        if let Some(rows) = embedded.and_then(|p| p.rows.as_ref()) {
            return Ok(rows.clone());
        }

        if let Some(href) = embedded.and_then(ListEntity::href) {
            return Ok(self.paginator().fetch_all_by_link(href, cancel).await?);
        }

        match document.id().filter(|id| !id.trim().is_empty()) {
            Some(id) => self.fetch_all_positions(id, cancel).await,
            None => Err(ResourceError::PositionsUnavailable { resource: T::NAME }),
        }
    }

    /// Adds a position to a document and returns the created row.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::EmptyId`] for a blank ID and
    /// [`ResourceError::Rest`] if the request fails.
    pub async fn create_position(
        &self,
        document_id: &str,
        position: &T::Position,
        cancel: &CancellationToken,
    ) -> Result<Option<T::Position>, ResourceError> {
        let path = Self::positions_path(document_id)?;
        let rows: Option<BulkRows<T::Position>> =
            self.client.post(path, position, cancel).await?;
        Ok(rows.and_then(|rows| rows.into_rows().into_iter().next()))
    }

    /// Updates one position of a document.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::EmptyId`] for a blank ID and
    /// [`ResourceError::Rest`] if the request fails.
    pub async fn update_position(
        &self,
        document_id: &str,
        position_id: &str,
        position: &T::Position,
        cancel: &CancellationToken,
    ) -> Result<T::Position, ResourceError> {
        let path = Self::positions_path(document_id)?;
        let position_id = require_id(position_id, "Position")?;
        Ok(self
            .client
            .put(format!("{path}/{position_id}"), position, cancel)
            .await?)
    }

    /// Deletes one position of a document.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::EmptyId`] for a blank ID and
    /// [`ResourceError::Rest`] if the request fails.
    pub async fn delete_position(
        &self,
        document_id: &str,
        position_id: &str,
        cancel: &CancellationToken,
    ) -> Result<(), ResourceError> {
        let path = Self::positions_path(document_id)?;
        let position_id = require_id(position_id, "Position")?;
        self.client
            .delete(format!("{path}/{position_id}"), cancel)
            .await?;
        Ok(())
    }
}

fn require_id<'s>(id: &'s str, resource: &'static str) -> Result<&'s str, ResourceError> {
    let id = id.trim();
    if id.is_empty() {
        Err(ResourceError::EmptyId { resource })
    } else {
        Ok(id)
    }
}

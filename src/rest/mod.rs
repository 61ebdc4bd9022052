//! Entity-level operations on top of the REST client.
//!
//! This module provides the building blocks used by collaborators that model
//! concrete entities:
//!
//! - [`ListEntity`] and [`Meta`]: list envelopes and entity metadata
//! - [`QueryBuilder`]: filters, ordering, expansions and search
//! - [`Paginator`] and [`PageCursor`]: exhaustive offset/limit pagination,
//!   by path or by follow-link
//! - [`Entity`], [`TradeDocument`] and [`EntityRepository`]: CRUD, bulk and
//!   positions operations for any serde type bound to an endpoint
//! - [`ResourceError`]: errors raised by repository operations

mod errors;
mod list;
mod pagination;
mod query;
mod resource;

// Public exports
pub use errors::ResourceError;
pub use list::{ListEntity, Meta};
pub use pagination::{PageCursor, Paginator};
pub use query::{Direction, FilterOp, QueryBuilder};
pub use resource::{Entity, EntityRepository, TradeDocument};

//! Query parameters for list endpoints.
//!
//! [`QueryBuilder`] collects filters, ordering, expansions, paging and a
//! full-text search term, and renders them as ordered query parameters.

use std::fmt;

/// A filter comparison operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterOp {
    /// `=`
    Eq,
    /// `!=`
    Neq,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `~` (substring match)
    Like,
}

impl FilterOp {
    /// Returns the operator as it appears in a filter expression.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Neq => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Like => "~",
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction for [`QueryBuilder::order_by`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

/// Builder for list query parameters.
///
/// Parameters are emitted in a fixed order: `filter` (`;`-joined), `order`
/// (`;`-joined `field,direction`), `expand` (`,`-joined), `limit`, `offset`,
/// `search`. Empty parts are omitted.
///
/// # Example
///
/// ```rust
/// use moysklad_api::rest::{Direction, QueryBuilder};
///
/// let params = QueryBuilder::new()
///     .eq("archived", false)
///     .like("name", "box")
///     .order_by("updated", Direction::Desc)
///     .expand(["agent", "owner"])
///     .limit(100)
///     .to_params();
///
/// assert_eq!(params[0], ("filter".to_string(), "archived=false;name~box".to_string()));
/// assert_eq!(params[1], ("order".to_string(), "updated,desc".to_string()));
/// assert_eq!(params[2], ("expand".to_string(), "agent,owner".to_string()));
/// assert_eq!(params[3], ("limit".to_string(), "100".to_string()));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryBuilder {
    filters: Vec<String>,
    order: Vec<String>,
    expand: Vec<String>,
    limit: Option<u32>,
    offset: Option<u64>,
    search: Option<String>,
}

impl QueryBuilder {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter expression `{field}{op}{value}`.
    #[must_use]
    pub fn filter(mut self, field: &str, op: FilterOp, value: impl fmt::Display) -> Self {
        self.filters.push(format!("{field}{op}{value}"));
        self
    }

    /// Adds `field=value`.
    #[must_use]
    pub fn eq(self, field: &str, value: impl fmt::Display) -> Self {
        self.filter(field, FilterOp::Eq, value)
    }

    /// Adds `field!=value`.
    #[must_use]
    pub fn neq(self, field: &str, value: impl fmt::Display) -> Self {
        self.filter(field, FilterOp::Neq, value)
    }

    /// Adds `field>value`.
    #[must_use]
    pub fn gt(self, field: &str, value: impl fmt::Display) -> Self {
        self.filter(field, FilterOp::Gt, value)
    }

    /// Adds `field>=value`.
    #[must_use]
    pub fn gte(self, field: &str, value: impl fmt::Display) -> Self {
        self.filter(field, FilterOp::Gte, value)
    }

    /// Adds `field<value`.
    #[must_use]
    pub fn lt(self, field: &str, value: impl fmt::Display) -> Self {
        self.filter(field, FilterOp::Lt, value)
    }

    /// Adds `field<=value`.
    #[must_use]
    pub fn lte(self, field: &str, value: impl fmt::Display) -> Self {
        self.filter(field, FilterOp::Lte, value)
    }

    /// Adds `field~value`.
    #[must_use]
    pub fn like(self, field: &str, value: impl fmt::Display) -> Self {
        self.filter(field, FilterOp::Like, value)
    }

    /// Adds a sort key.
    #[must_use]
    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order.push(format!("{field},{direction}"));
        self
    }

    /// Asks the server to expand the given reference fields.
    #[must_use]
    pub fn expand<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expand.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Sets the page size.
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the page offset.
    #[must_use]
    pub const fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets a full-text search term.
    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    /// Renders all parameters in their fixed order.
    #[must_use]
    pub fn to_params(&self) -> Vec<(String, String)> {
        self.render(true)
    }

    /// Renders every parameter except `limit` and `offset`.
    ///
    /// Used when the pagination engine owns paging.
    #[must_use]
    pub fn to_unpaged_params(&self) -> Vec<(String, String)> {
        self.render(false)
    }

    fn render(&self, paging: bool) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if !self.filters.is_empty() {
            params.push(("filter".to_string(), self.filters.join(";")));
        }
        if !self.order.is_empty() {
            params.push(("order".to_string(), self.order.join(";")));
        }
        if !self.expand.is_empty() {
            params.push(("expand".to_string(), self.expand.join(",")));
        }
        if paging {
            if let Some(limit) = self.limit {
                params.push(("limit".to_string(), limit.to_string()));
            }
            if let Some(offset) = self.offset {
                params.push(("offset".to_string(), offset.to_string()));
            }
        }
        if let Some(search) = self.search.as_ref().filter(|s| !s.is_empty()) {
            params.push(("search".to_string(), search.clone()));
        }
        params
    }
}

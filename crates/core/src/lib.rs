//! Entity mapping engine for hubsync
//!
//! This crate holds everything that does not touch the network:
//! - Coercion: best-effort conversion of loose JSON values into field types
//! - Model: per-entity property schema built from field registrations
//! - Codec: entity to property bag and back
//! - Page: offset paging and `find_in_pages`
//! - Query: filter/sort builder for the v3 search endpoints
//! - Quota: minimum spacing between rate-limited calls
//! - Transport: the REST verbs the rest of the workspace is written against

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod coerce;
pub mod error;
pub mod model;
pub mod page;
pub mod query;
pub mod quota;
pub mod transport;

pub use codec::{
    associations_request, deserialize, properties_array, properties_request, serialize,
    PropertyValue, ResponseLayout,
};
pub use coerce::{coerce, Coerced, WireKind, WireType};
pub use error::{Error, Result};
pub use model::{AssociationKind, FieldTag, Model, ModelBuilder, PropertyDescriptor, PropertyRole};
pub use page::{find_in_pages, Page, PageResponse};
pub use query::{Filter, FilterGroup, Operator, Query, QueryData, Sort, SortDirection};
pub use quota::{QuotaGate, QuotaGuard, DEFAULT_QUOTA_INTERVAL};
pub use transport::{JsonObject, Parameter, Transport};

pub use serde_json::Value as JsonValue;

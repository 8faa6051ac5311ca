//! hubsync - typed entity mapping for the HubSpot CRM API
//!
//! HubSpot stores every CRM object as a schemaless bag of string-keyed
//! properties. hubsync maps those bags onto plain Rust structs through a
//! [`Model`] built once per entity type.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use hubsync::{ClientConfig, Filter, HubSpot, Model};
//!
//! #[derive(Debug, Default)]
//! struct Deal {
//!     id: i64,
//!     name: String,
//!     contacts: Vec<i64>,
//! }
//!
//! let model = Model::<Deal>::builder()
//!     .field("ID", "id", |d| &d.id, |d| &mut d.id)
//!     .field("Name", "name=dealname", |d| &d.name, |d| &mut d.name)
//!     .contacts("Contacts", |d| &d.contacts, |d| &mut d.contacts)
//!     .build()?;
//!
//! let hubspot = HubSpot::from_config(&ClientConfig::from_file("hubsync.toml".as_ref())?)?;
//! let deals = hubspot.deals(Arc::new(model));
//!
//! let won = deals
//!     .query()
//!     .filter([Filter::equals("dealstage", "closedwon")])
//!     .execute(None)?;
//! ```
//!
//! # Architecture
//!
//! The mapping engine (coercion, schema, codec, paging, queries, quota gate)
//! lives in `hubsync-core`. Resource endpoints and the HTTP transport live
//! in `hubsync-client`, which is re-exported here.

pub use hubsync_client::*;

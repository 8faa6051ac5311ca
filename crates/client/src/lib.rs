//! HubSpot resource APIs for hubsync
//!
//! Thin call sites over the mapping engine in `hubsync-core`:
//! - [`Contacts`], [`Companies`], [`Deals`], [`Tickets`]: typed CRUD, lists and search
//! - [`Associations`]: links between objects by [`AssociationType`]
//! - [`HubSpot`]: shared transport and quota gate
//! - [`ClientConfig`]: `hubsync.toml` settings
//! - `HttpTransport` (feature `http`): blocking `ureq` transport

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod associations;
pub mod companies;
pub mod config;
pub mod contacts;
pub mod deals;
#[cfg(feature = "http")]
pub mod http;
pub mod hubspot;
mod response;
pub mod tickets;

pub use associations::{Association, AssociationType, Associations};
pub use companies::Companies;
pub use config::{ClientConfig, CONFIG_FILE_NAME, DEFAULT_ADDRESS};
pub use contacts::Contacts;
pub use deals::Deals;
#[cfg(feature = "http")]
pub use http::HttpTransport;
pub use hubspot::HubSpot;
pub use tickets::Tickets;

pub use hubsync_core::*;

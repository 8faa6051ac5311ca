//! Mapping Integration Tests
//!
//! End-to-end checks of the mapping engine through the public `hubsync` API:
//! codec round trips, paging, search queries and the quota gate.

#[path = "../common/mod.rs"]
mod common;

mod codec_roundtrip;
mod paging;
mod quota;
mod schema;
mod search;

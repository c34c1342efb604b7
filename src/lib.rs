//! Permasearch: search and collection UI for a content-addressable
//! permanode store.
//!
//! The store backend indexes signed attribute claims on permanodes; this
//! crate provides the web UI for searching those attributes and grouping
//! selected results into collection permanodes.

pub mod blobref;
pub mod client;
pub mod collection;
pub mod config;
pub mod search;
pub mod server;

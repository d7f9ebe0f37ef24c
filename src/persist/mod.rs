//! Snapshot codec and slot storage.

pub(crate) mod data_url;
pub(crate) mod snapshot;
pub(crate) mod store;

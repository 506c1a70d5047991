//! Item Handlers

pub(crate) mod get;
pub(crate) mod index;

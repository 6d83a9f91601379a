//! Cart Handlers

pub(crate) mod clear;
pub(crate) mod delete;
pub(crate) mod extend;
pub(crate) mod get;
pub(crate) mod merge;
pub(crate) mod summary;
pub(crate) mod validate;

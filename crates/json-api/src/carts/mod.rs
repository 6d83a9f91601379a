//! Cart endpoints

pub(crate) mod errors;
pub(crate) mod handlers;
pub(crate) mod items;
pub(crate) mod owner;
pub(crate) mod responses;

pub(crate) use handlers::*;

//! Cart item endpoints

pub(crate) mod handlers;

pub(crate) use handlers::*;

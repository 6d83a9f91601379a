//! Operator endpoints

pub(crate) mod cleanup;

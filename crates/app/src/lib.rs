//! Cart session store: domain, persistence and background maintenance.

pub mod context;
pub mod domain;
pub mod store;
pub mod uuids;

#[cfg(test)]
mod test;

//! Test support shared by service and repository tests.

mod helpers;
mod store;

pub(crate) use context::TestContext;
pub(crate) use helpers::*;
pub(crate) use store::MemoryStore;

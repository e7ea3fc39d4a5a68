//! Fact access: collaborator traits, caching, and an in-memory store.

pub mod accessor;
pub mod cache;
pub mod error;
pub mod memory;
pub mod types;

pub use accessor::{FactAccessor, ReferenceData};
pub use cache::CachedFactAccessor;
pub use error::FactAccessError;
pub use memory::{FactRow, Fixture, FixtureError, InMemoryFactStore};
pub use types::{Cluster, Company, FactSheet, FactValue};

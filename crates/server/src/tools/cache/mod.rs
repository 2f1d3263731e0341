//! Search cache maintenance tools.

pub mod invalidate;
pub mod purge;

pub use invalidate::{CacheInvalidateParams, invalidate_impl};
pub use purge::{CachePurgeParams, purge_impl};

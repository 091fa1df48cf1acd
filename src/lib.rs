//! Fieldrank - multi-field BM25F relevance ranking.
//!
//! Fieldrank combines per-field term statistics into combined-field BM25F
//! scores and compiles raw query strings into structured clause trees over
//! a weighted field set. Indexing, storage and result collection stay with
//! the caller; this crate owns the ranking math and the query plan.

pub mod analysis;
pub mod error;
pub mod params;
pub mod query;
pub mod scoring;

pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::analysis::*;
    pub use crate::error::*;
    pub use crate::params::*;
    pub use crate::query::*;
    pub use crate::scoring::*;
}

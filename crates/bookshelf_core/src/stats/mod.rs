//! Collection statistics, recomputed on demand.

pub mod summary;

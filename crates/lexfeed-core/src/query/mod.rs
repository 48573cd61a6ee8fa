//! Query-side state: debounced search input, filter/pagination state, and
//! the fingerprint-keyed cache.

pub mod browse;
pub mod cache;
pub mod debounce;

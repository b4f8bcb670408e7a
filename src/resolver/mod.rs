pub mod async_resolver;
pub mod blocking_resolver;

pub use async_resolver::{raw_query, resolve, resolve_with_cancel};
pub use blocking_resolver::{blocking_raw_query, blocking_resolve};

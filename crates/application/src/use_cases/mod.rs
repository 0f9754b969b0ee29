//! Application use cases (business logic orchestration).

mod probe_proxies;

pub use probe_proxies::*;

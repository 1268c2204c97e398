//! Hit/miss simulation of a single cache under fully associative, direct
//! mapped or set associative organization with FIFO or LRU replacement.
//!
//! [`CacheEngine`] is the whole model. The remaining modules feed it
//! addresses and report on it.

pub mod address;
pub mod cache;
pub mod config;
pub mod error;
pub mod replace;
pub mod report;
pub mod snapshot;
pub mod trace;

pub use address::{format_address, parse_address, Radix};
pub use cache::{CacheEngine, Organization, Policy, Stats};
pub use config::{CacheConfig, Config, NamedEngine};
pub use error::{AddressError, ConfigError, Error, TraceError};
pub use replace::AccessResult;
pub use report::CacheReport;
pub use snapshot::{SetView, Snapshot};
pub use trace::Trace;

//! The loldrivers.io dataset: records, loading, and the checksum index.

pub mod index;
pub mod loader;
pub mod record;

pub use index::HashIndex;
pub use loader::{load, DatasetSource};
pub use record::{DriverRecord, KnownSample};

pub mod source;
pub mod store;

pub use source::{Collection, DataSource, SourceError};
pub use store::{SnapshotStore, StoreError};

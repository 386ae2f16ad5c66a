/// Repository layer - flat JSON record files
///
/// - `store`: the `RecordStore` seam and its JSON-file implementation
/// - `locked`: a store paired with a `FileLock` for read-modify-write cycles
/// - `users`: the user registry consulted before likes
pub mod locked;
pub mod store;
pub mod users;

pub use locked::{Commit, LockedStore};
pub use store::{JsonFileStore, RecordStore, StoreError};
pub use users::{UserDirectory, UserRegistry};

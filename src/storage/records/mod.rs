pub mod json_file;
pub mod memory;
pub mod store;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use store::{RecordStore, StorageError};

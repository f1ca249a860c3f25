// Adapters layer: concrete LocalStore / RemoteStore implementations.

pub mod http;
pub mod json_file;
pub mod memory;

pub use http::HttpRemoteStore;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

// Guild configuration stores.

pub mod in_memory;
pub mod json_store;

pub use in_memory::InMemoryGuildConfigStore;
pub use json_store::JsonGuildConfigStore;

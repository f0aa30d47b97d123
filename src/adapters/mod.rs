// Adapters layer: concrete implementations of the domain ports.

pub mod in_memory;

pub use in_memory::InMemoryDirectory;

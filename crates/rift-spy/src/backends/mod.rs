mod inmemory;

pub use inmemory::InMemoryMatchStore;

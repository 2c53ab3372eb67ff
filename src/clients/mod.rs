//! Tenant-owned client credential records and the store over them.

pub mod repository;
pub mod types;

pub use repository::{
    ClientRepository, CreateOptions, DeleteOptions, GetOptions, ListOptions, UpdateOptions,
};
pub use types::Client;

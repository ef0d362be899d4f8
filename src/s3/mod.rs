pub mod client;
pub mod mapping;
pub mod sync;

pub use client::{ListPage, ObjectStoreClient, S3StoreClient, TransferOptions};
pub use sync::SyncContext;

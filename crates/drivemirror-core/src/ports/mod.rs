//! Port definitions (hexagonal architecture)
//!
//! Ports are the interfaces through which the core communicates with the
//! outside world. They come in two kinds:
//!
//! - **Driving ports (primary)**: interfaces the outside uses to drive the
//!   core. In this crate the use cases themselves play that role.
//! - **Driven ports (secondary)**: interfaces the core uses to reach
//!   infrastructure. Defined here, implemented by adapter crates.
//!
//! All driven ports are async traits bounded by `Send + Sync` so adapters
//! can be shared across tasks behind `Arc<dyn ...>`.

pub mod blob_store;
pub mod content_fetcher;
pub mod record_repository;
pub mod remote_store;

pub use blob_store::IBlobStore;
pub use content_fetcher::{FetchedContent, IContentFetcher};
pub use record_repository::{IRecordRepository, RecordFilter};
pub use remote_store::{IRemoteStore, RemoteFileMeta};

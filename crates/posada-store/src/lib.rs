//! In-memory storage for Posada
//!
//! The portal this engine serves runs against a mock in-memory store; the
//! core itself is storage-agnostic and only sees the repository and
//! collaborator traits from `posada-core`. Every implementation in this
//! crate keeps its entities in a `tokio::sync::RwLock<HashMap<..>>` and can
//! be swapped for a database-backed crate without touching the services.

pub mod catalog;
pub mod clients;
pub mod orders;
pub mod reservations;
pub mod settings;

pub use catalog::MemoryLocationCatalog;
pub use clients::MemoryClientStore;
pub use orders::MemoryOrderRepository;
pub use reservations::MemoryReservationRepository;
pub use settings::MemoryHostSettings;

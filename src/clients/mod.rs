//! Clients — committed client records and their persisted collection.

pub mod collection;
pub mod model;

pub use collection::{CLIENTS_KEY, ClientCollection, ClientFilter};
pub use model::{Address, ClientDetails, ClientRecord, ClientStatus, Location, Tier};

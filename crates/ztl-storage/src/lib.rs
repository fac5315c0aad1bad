//! ZTL Storage - JSON file persistence for city data.
//!
//! Each city is stored as one pretty-printed JSON document named after the
//! lower-cased city name (`milano.json`) inside a data directory.
//!
//! # Example
//!
//! ```no_run
//! use ztl_core::find_source;
//! use ztl_storage::CityStore;
//!
//! let store = CityStore::open_default().unwrap();
//! let milano = find_source("milano").unwrap().build();
//! store.save_city(&milano).unwrap();
//!
//! let reloaded = store.load_city("Milano").unwrap();
//! assert_eq!(reloaded.zones().len(), milano.zones().len());
//! ```

pub mod error;
mod store;

pub use error::{Result, StorageError};
pub use store::CityStore;

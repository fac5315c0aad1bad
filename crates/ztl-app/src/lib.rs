//! ZTL - command-line access to Limited Traffic Zone restrictions.
//!
//! This crate provides the command handlers behind the `ztl` binary:
//!
//! - Importing the built-in cities into the data directory
//! - Listing stored cities
//! - Zone status at an instant, all zones or only the active ones
//! - GeoJSON export for map rendering
//! - Attaching boundary polygons from coordinate files
//!
//! # Usage
//!
//! ```no_run
//! use ztl_app::commands;
//! use ztl_storage::CityStore;
//!
//! let store = CityStore::open_default().unwrap();
//! commands::import(&store, &[]).unwrap();
//!
//! let now = chrono::Local::now().naive_local();
//! commands::status(&store, "milano", &now, false, &mut std::io::stdout()).unwrap();
//! ```

pub mod commands;

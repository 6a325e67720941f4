//! Gamedge command line front-end
//!
//! Wires the catalog core to a JSON catalog file, local storage and the
//! configured throttle store.

pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod output;
pub mod paths;
pub mod throttle;

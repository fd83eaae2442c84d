// src/lib.rs

//! Timetable ingestion library.
//!
//! Discovers room identifiers, downloads room and group calendar feeds into
//! a local content store, and flattens them into a lesson dataset.

pub mod error;
pub mod models;
pub mod parse;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;

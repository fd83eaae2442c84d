//! Pipeline entry points.
//!
//! - `run_discover`: probe room identifiers and build the identifier list
//! - `run_fetch`: download feeds into the content store
//! - `run_extract`: turn stored feeds into the dataset file
//! - `run_pipeline`: all of the above in order

pub mod discover;
pub mod extract;
pub mod fetch;
pub mod info;
pub mod pipeline;
pub mod validate;

pub use discover::run_discover;
pub use extract::run_extract;
pub use fetch::{IdentifierInput, run_fetch};
pub use info::run_info;
pub use pipeline::run_pipeline;
pub use validate::run_validate;

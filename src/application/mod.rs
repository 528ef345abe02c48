mod error;
mod service;
mod stats;

pub use error::*;
pub use service::*;
pub use stats::*;

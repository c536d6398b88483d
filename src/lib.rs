pub mod error;
pub mod host;
pub mod lattice;
pub mod math;
pub mod operations;
pub mod topology;

pub use error::{NoodlerError, Result};

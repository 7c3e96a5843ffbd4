//! Common system operations

mod error;
pub use error::*;
mod fs;
pub use fs::*;
mod term;
pub use term::*;

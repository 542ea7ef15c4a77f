pub mod command;
pub mod error;
pub mod output_macros;
pub mod workspace;

pub use error::{InframanError, Result};
pub use workspace::Workspace;

//! Wrappers around the external infrastructure tools (terraform, terranix,
//! colmena) plus the state-output parser and instance resolver that sit
//! between them.

pub mod colmena;
pub mod instance;
pub mod state;
pub mod terraform;
pub mod terranix;

pub use colmena::ColmenaExecutor;
pub use state::Instance;
pub use terraform::TerraformExecutor;
pub use terranix::TerranixExecutor;

pub mod result;

pub mod cli;
pub mod compiler;
pub mod diagnostics;
pub mod io;
pub mod manifest;

pub use cli::*;
pub use compiler::{compile, compile_with_tracing};
pub use io::read_manifest;
pub use manifest::Manifest;

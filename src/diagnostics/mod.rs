/**
Configuration of the diagnostic output the compiler can produce while it runs.
 */
pub mod config;

pub use self::config::{Tracing, TracingConfig};

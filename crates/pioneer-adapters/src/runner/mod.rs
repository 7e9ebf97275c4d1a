//! Build tool runners.

mod process;

pub use process::ProcessRunner;

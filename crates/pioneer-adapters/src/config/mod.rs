//! Project configuration adapters.

mod ini;
mod parser;

pub use ini::{IniConfig, IniConfigLoader};
pub use parser::IniError;

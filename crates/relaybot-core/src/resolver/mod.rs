//! Environment resolution for configuration values
//!
//! Configuration may embed `${VAR}` placeholders anywhere in its strings.
//! Resolution is a pure function of the value and an `EnvLookup`.

mod placeholder;

pub use placeholder::{substitute, substitute_str, EnvLookup, ProcessEnv};

//! CLI command implementations.

mod process;

pub(crate) use process::ProcessArgs;

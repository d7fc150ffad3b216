//! Built-in processors.
//!
//! Small, self-contained processors shipped with the pipeline. They are
//! registered by [`ProcessorRegistry::with_builtins`](crate::ProcessorRegistry::with_builtins);
//! embedding applications add their own alongside.

mod basic;
mod explain;
mod header;

pub use basic::BasicProcessor;
pub use explain::ExplainProcessor;
pub use header::HeaderInjectProcessor;

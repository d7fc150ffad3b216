//! The simplest processor, kept as a readable example of the API.
//!
//! Adds a comment to the top of any code cell carrying the `#| process`
//! directive:
//!
//! ```python
//! #| process
//! def my_function():
//!     return "Hello world!"
//! ```

use nbstage_notebook::{Cell, CellType};

use crate::context::CellContext;
use crate::error::ProcessorError;
use crate::processor::Processor;
use crate::registry::ProcessorArgs;

const DEFAULT_COMMENT: &str = "# This code has been processed!";

/// Prepends a marker comment to cells marked `#| process`.
#[derive(Debug, Clone)]
pub struct BasicProcessor {
    comment: String,
}

impl Default for BasicProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_COMMENT)
    }
}

impl BasicProcessor {
    /// Create the processor with a custom comment line.
    #[must_use]
    pub fn new(comment: impl Into<String>) -> Self {
        Self {
            comment: comment.into(),
        }
    }

    /// Construct from configured arguments.
    ///
    /// Accepts an optional `comment` string argument.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessorError::InvalidArgs`] when `comment` is present
    /// but not a string.
    pub fn from_args(args: &ProcessorArgs) -> Result<Self, ProcessorError> {
        match args.get("comment") {
            None => Ok(Self::default()),
            Some(value) => value.as_str().map(Self::new).ok_or_else(|| {
                ProcessorError::InvalidArgs("`comment` must be a string".to_owned())
            }),
        }
    }
}

impl Processor for BasicProcessor {
    fn name(&self) -> &str {
        "basic"
    }

    fn directives(&self) -> &[&str] {
        &["process"]
    }

    fn cell_types(&self) -> &[CellType] {
        &[CellType::Code]
    }

    fn process(&mut self, cell: &mut Cell, _ctx: &CellContext) -> Result<(), ProcessorError> {
        cell.source = format!("{}\n{}", self.comment, cell.source);
        Ok(())
    }
}

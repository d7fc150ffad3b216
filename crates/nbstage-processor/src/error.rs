//! Pipeline error types.

use nbstage_notebook::NotebookError;

/// Error raised by a processor or post-processor implementation.
#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    /// The configured arguments for the processor are invalid.
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    /// The mutation logic itself failed.
    #[error("{0}")]
    Failed(String),
}

/// Error running a pipeline.
///
/// Processor and post-processor faults are not swallowed: they abort the
/// run carrying the identity of the failing stage, since silent partial
/// application would leave the notebook in an inconsistent state. There
/// is no automatic retry; mutations are not guaranteed idempotent.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Both a notebook path and an in-memory notebook were supplied.
    #[error("a notebook path and an in-memory notebook are mutually exclusive")]
    ConflictingInput,
    /// Neither a notebook path nor an in-memory notebook was supplied.
    #[error("either a notebook path or an in-memory notebook is required")]
    MissingInput,
    /// Loading or writing the notebook failed.
    #[error(transparent)]
    Notebook(#[from] NotebookError),
    /// A processor failed while processing a specific cell.
    #[error("processor `{processor}` failed on cell {cell}: {source}")]
    Processor {
        /// Name of the failing processor.
        processor: String,
        /// Index of the cell being processed.
        cell: usize,
        /// Underlying fault.
        #[source]
        source: ProcessorError,
    },
    /// A post-processor failed on a serialized document.
    #[error("post-processor `{post_processor}` failed for {file}: {source}")]
    PostProcessor {
        /// Name of the failing post-processor.
        post_processor: String,
        /// File (or document label) being post-processed.
        file: String,
        /// Underlying fault.
        #[source]
        source: ProcessorError,
    },
}

/// Error resolving processor names through a registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// One or more configured names have no registered factory.
    #[error("unknown processors: {}", .0.join(", "))]
    Unknown(Vec<String>),
    /// A factory rejected its arguments.
    #[error("failed to construct `{name}`: {source}")]
    Construct {
        /// Registered name of the processor.
        name: String,
        /// Underlying fault.
        #[source]
        source: ProcessorError,
    },
}

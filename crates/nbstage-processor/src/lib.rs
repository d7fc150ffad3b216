//! Processor contracts and pipeline runner for notebook transformation.
//!
//! A [`Pipeline`] loads a notebook, runs an ordered chain of per-cell
//! [`Processor`]s over it, serializes the result through a [`Serializer`],
//! and threads the text through an ordered chain of whole-document
//! [`PostProcessor`]s.
//!
//! Processors are gated: each declares the directive names and cell types
//! it acts on, and the dispatch wrapper [`Processor::process_cell`] is the
//! single enforcement point, so a `process` implementation may assume the
//! cell is eligible. Post-processors are unconditional.
//!
//! Dispatch is a purely sequential fold: cells in document order are the
//! outer loop and configured processors the inner loop, so for cell 0 all
//! processors run before cell 1 is touched. Later processors in the chain
//! observe the mutations of earlier ones.
//!
//! # Example
//!
//! ```
//! use nbstage_notebook::{Cell, CellType, Notebook, make_cell};
//! use nbstage_processor::{CellContext, Pipeline, Processor, ProcessorError};
//!
//! /// Adds a comment to the top of any cell marked `#| process`.
//! struct BannerProcessor;
//!
//! impl Processor for BannerProcessor {
//!     fn name(&self) -> &str {
//!         "banner"
//!     }
//!
//!     fn directives(&self) -> &[&str] {
//!         &["process"]
//!     }
//!
//!     fn process(&mut self, cell: &mut Cell, _ctx: &CellContext) -> Result<(), ProcessorError> {
//!         cell.source = format!("# processed\n{}", cell.source);
//!         Ok(())
//!     }
//! }
//!
//! let notebook = Notebook::new(vec![make_cell("#| process\nx = 1\n", CellType::Code)]);
//! let mut pipeline = Pipeline::builder()
//!     .notebook(notebook)
//!     .processor(Box::new(BannerProcessor))
//!     .build()
//!     .unwrap();
//!
//! pipeline.process_notebook().unwrap();
//! assert_eq!(pipeline.notebook().cells[0].source, "# processed\nx = 1\n");
//! ```

mod context;
mod error;
mod pipeline;
mod post;
mod processor;
pub mod processors;
mod registry;
mod serialize;

pub use context::CellContext;
pub use error::{PipelineError, ProcessorError, RegistryError};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use post::{PostProcessor, apply_post_processors};
pub use processor::Processor;
pub use registry::{ProcessorArgs, ProcessorRegistry};
pub use serialize::{QuartoSerializer, Serializer};

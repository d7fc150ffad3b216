//! The pipeline runner.
//!
//! Orchestrates one run: load notebook, extract directives, dispatch the
//! configured processors over every cell, then serialize. Post-processing
//! of the serialized text is a separate per-file step (see
//! [`apply_post_processors`](crate::apply_post_processors)).

use std::path::PathBuf;

use nbstage_notebook::{Notebook, extract_directives};

use crate::context::CellContext;
use crate::error::PipelineError;
use crate::processor::Processor;
use crate::serialize::Serializer;

/// A single notebook transformation run.
///
/// Dispatch ordering: cell order is the outer loop and processor order
/// the inner loop: for cell 0, every processor runs in configured order
/// before cell 1 is touched. Later processors therefore observe the
/// mutations of earlier ones, and lookahead through
/// [`CellContext::next`] sees a not-yet-processed successor.
///
/// Calling [`process_notebook`](Self::process_notebook) twice re-runs
/// dispatch over the already-mutated cells; processors are not guaranteed
/// idempotent, so double invocation is a caller error this type does not
/// prevent.
#[derive(Debug)]
pub struct Pipeline {
    notebook: Notebook,
    processors: Vec<Box<dyn Processor>>,
    language: String,
}

impl Pipeline {
    /// Start building a pipeline.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Borrow the notebook.
    #[must_use]
    pub fn notebook(&self) -> &Notebook {
        &self.notebook
    }

    /// Consume the pipeline, returning the (possibly mutated) notebook.
    #[must_use]
    pub fn into_notebook(self) -> Notebook {
        self.notebook
    }

    /// Run the configured processors over every cell.
    ///
    /// # Errors
    ///
    /// A processor fault aborts the run as [`PipelineError::Processor`],
    /// identifying the cell index and processor; no partial output is
    /// produced.
    pub fn process_notebook(&mut self) -> Result<(), PipelineError> {
        let Self {
            notebook,
            processors,
            language,
        } = self;

        for processor in processors.iter_mut() {
            processor.begin(notebook);
        }

        for index in 0..notebook.cells.len() {
            let (head, tail) = notebook.cells.split_at_mut(index + 1);
            let cell = &mut head[index];
            let ctx = CellContext {
                index,
                language,
                next: tail.first(),
            };

            for processor in processors.iter_mut() {
                tracing::debug!(processor = processor.name(), cell = index, "dispatching");
                if let Err(source) = processor.process_cell(cell, &ctx) {
                    return Err(PipelineError::Processor {
                        processor: processor.name().to_owned(),
                        cell: index,
                        source,
                    });
                }
            }
        }

        for processor in processors.iter_mut() {
            processor.end(notebook);
        }

        Ok(())
    }

    /// Serialize the notebook through `serializer`.
    ///
    /// Cells are passed in original order with all mutations applied.
    #[must_use]
    pub fn serialize(&self, serializer: &dyn Serializer) -> String {
        serializer.serialize(&self.notebook)
    }
}

/// Builder for [`Pipeline`].
///
/// Exactly one of [`path`](Self::path) and [`notebook`](Self::notebook)
/// must be supplied.
#[derive(Default)]
pub struct PipelineBuilder {
    path: Option<PathBuf>,
    notebook: Option<Notebook>,
    processors: Vec<Box<dyn Processor>>,
    remove_directives: bool,
    process_immediately: bool,
}

impl PipelineBuilder {
    /// Create a builder with defaults (`remove_directives = true`).
    #[must_use]
    pub fn new() -> Self {
        Self {
            path: None,
            notebook: None,
            processors: Vec::new(),
            remove_directives: true,
            process_immediately: false,
        }
    }

    /// Load the notebook from a file.
    #[must_use]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Use an in-memory notebook.
    #[must_use]
    pub fn notebook(mut self, notebook: Notebook) -> Self {
        self.notebook = Some(notebook);
        self
    }

    /// Append a processor to the chain (configured order is preserved).
    #[must_use]
    pub fn processor(mut self, processor: Box<dyn Processor>) -> Self {
        self.processors.push(processor);
        self
    }

    /// Append several processors to the chain.
    #[must_use]
    pub fn processors(mut self, processors: Vec<Box<dyn Processor>>) -> Self {
        self.processors.extend(processors);
        self
    }

    /// Whether directive lines are stripped from cell sources at load
    /// (default: true). The parsed directive list is populated either way.
    #[must_use]
    pub fn remove_directives(mut self, remove: bool) -> Self {
        self.remove_directives = remove;
        self
    }

    /// Run dispatch during [`build`](Self::build) instead of waiting for
    /// an explicit [`Pipeline::process_notebook`] call (default: false).
    #[must_use]
    pub fn process_immediately(mut self, immediately: bool) -> Self {
        self.process_immediately = immediately;
        self
    }

    /// Build the pipeline: load the notebook and extract each cell's
    /// directives.
    ///
    /// # Errors
    ///
    /// Fails fast with a configuration error if both or neither of the
    /// notebook inputs were supplied, and propagates notebook load
    /// failures. With `process_immediately`, dispatch faults surface here.
    pub fn build(self) -> Result<Pipeline, PipelineError> {
        let notebook = match (self.path, self.notebook) {
            (Some(_), Some(_)) => return Err(PipelineError::ConflictingInput),
            (None, None) => return Err(PipelineError::MissingInput),
            (Some(path), None) => Notebook::read(path)?,
            (None, Some(notebook)) => notebook,
        };

        let mut pipeline = Pipeline {
            language: notebook.language().to_owned(),
            notebook,
            processors: self.processors,
        };
        pipeline.notebook.reindex();
        for cell in &mut pipeline.notebook.cells {
            extract_directives(cell, &pipeline.language, self.remove_directives);
        }

        if self.process_immediately {
            pipeline.process_notebook()?;
        }
        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::ProcessorError;
    use crate::serialize::QuartoSerializer;
    use nbstage_notebook::{Cell, CellType, make_cell};

    /// Prepends a marker to the source of eligible cells.
    struct Prepend {
        name: &'static str,
        marker: &'static str,
    }

    impl Processor for Prepend {
        fn name(&self) -> &str {
            self.name
        }

        fn directives(&self) -> &[&str] {
            &["mark"]
        }

        fn process(&mut self, cell: &mut Cell, _ctx: &CellContext) -> Result<(), ProcessorError> {
            cell.source = format!("{}{}", self.marker, cell.source);
            Ok(())
        }
    }

    /// Fails on every eligible cell.
    struct Exploding;

    impl Processor for Exploding {
        fn name(&self) -> &str {
            "exploding"
        }

        fn directives(&self) -> &[&str] {
            &["boom"]
        }

        fn process(&mut self, _cell: &mut Cell, _ctx: &CellContext) -> Result<(), ProcessorError> {
            Err(ProcessorError::Failed("kaput".to_owned()))
        }
    }

    fn marked_notebook() -> Notebook {
        Notebook::new(vec![make_cell("#| mark\nx", CellType::Code)])
    }

    #[test]
    fn test_requires_exactly_one_input() {
        let err = Pipeline::builder().build().unwrap_err();
        assert!(matches!(err, PipelineError::MissingInput));

        let err = Pipeline::builder()
            .notebook(marked_notebook())
            .path("some.ipynb")
            .build()
            .unwrap_err();
        assert!(matches!(err, PipelineError::ConflictingInput));
    }

    #[test]
    fn test_round_trip_with_no_processors() {
        let notebook = Notebook::new(vec![
            make_cell("x = 1\n", CellType::Code),
            make_cell("# Title\n", CellType::Markdown),
        ]);
        let original = notebook.clone();

        let mut pipeline = Pipeline::builder().notebook(notebook).build().unwrap();
        pipeline.process_notebook().unwrap();

        let result = pipeline.into_notebook();
        let sources: Vec<&str> = result.cells.iter().map(|c| c.source.as_str()).collect();
        let expected: Vec<&str> = original.cells.iter().map(|c| c.source.as_str()).collect();
        assert_eq!(sources, expected);
    }

    #[test]
    fn test_processor_order_is_inner_loop() {
        // [P1, P2] on "x" must yield "B:A:x"; P2 sees P1's mutation.
        let mut pipeline = Pipeline::builder()
            .notebook(marked_notebook())
            .processor(Box::new(Prepend {
                name: "p1",
                marker: "A:",
            }))
            .processor(Box::new(Prepend {
                name: "p2",
                marker: "B:",
            }))
            .build()
            .unwrap();
        pipeline.process_notebook().unwrap();
        assert_eq!(pipeline.notebook().cells[0].source, "B:A:x");

        // Reversed configuration reverses the composition.
        let mut pipeline = Pipeline::builder()
            .notebook(marked_notebook())
            .processor(Box::new(Prepend {
                name: "p2",
                marker: "B:",
            }))
            .processor(Box::new(Prepend {
                name: "p1",
                marker: "A:",
            }))
            .build()
            .unwrap();
        pipeline.process_notebook().unwrap();
        assert_eq!(pipeline.notebook().cells[0].source, "A:B:x");
    }

    #[test]
    fn test_directive_stripping_policy() {
        let pipeline = Pipeline::builder()
            .notebook(marked_notebook())
            .build()
            .unwrap();
        assert_eq!(pipeline.notebook().cells[0].source, "x");
        assert!(pipeline.notebook().cells[0].has_directive(&["mark"]));

        let pipeline = Pipeline::builder()
            .notebook(marked_notebook())
            .remove_directives(false)
            .build()
            .unwrap();
        assert_eq!(pipeline.notebook().cells[0].source, "#| mark\nx");
        assert!(pipeline.notebook().cells[0].has_directive(&["mark"]));
    }

    #[test]
    fn test_fault_identifies_cell_and_processor() {
        let notebook = Notebook::new(vec![
            make_cell("a\n", CellType::Code),
            make_cell("b\n", CellType::Code),
            make_cell("c\n", CellType::Code),
            make_cell("#| boom\nd\n", CellType::Code),
        ]);

        let mut pipeline = Pipeline::builder()
            .notebook(notebook)
            .processor(Box::new(Exploding))
            .build()
            .unwrap();

        let err = pipeline.process_notebook().unwrap_err();
        match err {
            PipelineError::Processor {
                processor, cell, ..
            } => {
                assert_eq!(processor, "exploding");
                assert_eq!(cell, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_process_immediately_runs_dispatch_in_build() {
        let pipeline = Pipeline::builder()
            .notebook(marked_notebook())
            .processor(Box::new(Prepend {
                name: "p1",
                marker: "A:",
            }))
            .process_immediately(true)
            .build()
            .unwrap();
        assert_eq!(pipeline.notebook().cells[0].source, "A:x");
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nb.ipynb");
        marked_notebook().write(&path).unwrap();

        let pipeline = Pipeline::builder().path(&path).build().unwrap();
        assert!(pipeline.notebook().cells[0].has_directive(&["mark"]));
    }

    #[test]
    fn test_serialize_applies_mutations_in_order() {
        let notebook = Notebook::new(vec![
            make_cell("# Title\n", CellType::Markdown),
            make_cell("#| mark\nx = 1\n", CellType::Code),
        ]);

        let mut pipeline = Pipeline::builder()
            .notebook(notebook)
            .processor(Box::new(Prepend {
                name: "p1",
                marker: "# done\n",
            }))
            .build()
            .unwrap();
        pipeline.process_notebook().unwrap();

        let output = pipeline.serialize(&QuartoSerializer);
        assert_eq!(output, "# Title\n\n```{python}\n# done\nx = 1\n```\n");
    }
}

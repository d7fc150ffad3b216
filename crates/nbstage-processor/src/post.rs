//! The whole-document post-processor contract.

use crate::error::{PipelineError, ProcessorError};

/// A whole-document text mutation unit applied after serialization.
///
/// Unconditional: no directive or cell-type gating; it always runs when
/// included in the chain for a file. Instances are constructed once per
/// output file and must not be shared across files.
pub trait PostProcessor {
    /// Name used in configuration and error reporting.
    fn name(&self) -> &str;

    /// Mutate the serialized document text in place.
    fn process(&mut self, content: &mut String) -> Result<(), ProcessorError>;
}

impl std::fmt::Debug for dyn PostProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostProcessor")
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}

/// Thread `content` through the configured post-processors in order.
///
/// `file` labels the document in error reports.
///
/// # Errors
///
/// A failing post-processor aborts the chain with
/// [`PipelineError::PostProcessor`] naming the stage and the file.
pub fn apply_post_processors(
    content: &mut String,
    post_processors: &mut [Box<dyn PostProcessor>],
    file: &str,
) -> Result<(), PipelineError> {
    for post in post_processors.iter_mut() {
        tracing::debug!(post_processor = post.name(), file, "post-processing");
        if let Err(source) = post.process(content) {
            return Err(PipelineError::PostProcessor {
                post_processor: post.name().to_owned(),
                file: file.to_owned(),
                source,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    struct Append(&'static str);

    impl PostProcessor for Append {
        fn name(&self) -> &str {
            "append"
        }

        fn process(&mut self, content: &mut String) -> Result<(), ProcessorError> {
            content.push_str(self.0);
            Ok(())
        }
    }

    struct Fail;

    impl PostProcessor for Fail {
        fn name(&self) -> &str {
            "fail"
        }

        fn process(&mut self, _content: &mut String) -> Result<(), ProcessorError> {
            Err(ProcessorError::Failed("boom".to_owned()))
        }
    }

    #[test]
    fn test_chaining_threads_output_to_input() {
        let mut content = "doc".to_owned();
        let mut posts: Vec<Box<dyn PostProcessor>> = vec![Box::new(Append("!1")), Box::new(Append("!2"))];

        apply_post_processors(&mut content, &mut posts, "doc.qmd").unwrap();
        assert_eq!(content, "doc!1!2");
    }

    #[test]
    fn test_fault_identifies_stage_and_file() {
        let mut content = "doc".to_owned();
        let mut posts: Vec<Box<dyn PostProcessor>> = vec![Box::new(Fail)];

        let err = apply_post_processors(&mut content, &mut posts, "doc.qmd").unwrap_err();
        match err {
            PipelineError::PostProcessor {
                post_processor,
                file,
                ..
            } => {
                assert_eq!(post_processor, "fail");
                assert_eq!(file, "doc.qmd");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

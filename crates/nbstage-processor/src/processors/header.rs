//! Header injection post-processor.
//!
//! Prepends a configured snippet (a script tag, a banner comment, ...) to
//! the serialized document unless it is already present, so repeated runs
//! do not stack copies.

use crate::error::ProcessorError;
use crate::post::PostProcessor;
use crate::registry::ProcessorArgs;

/// Injects a configured snippet at the top of the document.
#[derive(Debug, Clone)]
pub struct HeaderInjectProcessor {
    header: String,
}

impl HeaderInjectProcessor {
    /// Create the post-processor with the snippet to inject.
    #[must_use]
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
        }
    }

    /// Construct from configured arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessorError::InvalidArgs`] unless a `header` string
    /// argument is supplied.
    pub fn from_args(args: &ProcessorArgs) -> Result<Self, ProcessorError> {
        args.get("header")
            .and_then(|value| value.as_str())
            .map(Self::new)
            .ok_or_else(|| ProcessorError::InvalidArgs("`header` must be a string".to_owned()))
    }
}

impl PostProcessor for HeaderInjectProcessor {
    fn name(&self) -> &str {
        "header-inject"
    }

    fn process(&mut self, content: &mut String) -> Result<(), ProcessorError> {
        if !content.contains(&self.header) {
            *content = format!("{}\n{content}", self.header);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_injects_header_once() {
        let mut processor = HeaderInjectProcessor::new("<!-- banner -->");

        let mut content = "# Title\nbody\n".to_owned();
        processor.process(&mut content).unwrap();
        assert_eq!(content, "<!-- banner -->\n# Title\nbody\n");

        // Idempotent on a second pass.
        processor.process(&mut content).unwrap();
        assert_eq!(content, "<!-- banner -->\n# Title\nbody\n");
    }

    #[test]
    fn test_header_argument_required() {
        assert!(HeaderInjectProcessor::from_args(&ProcessorArgs::new()).is_err());
    }
}

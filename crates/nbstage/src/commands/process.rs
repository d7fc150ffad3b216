//! The `process` command.
//!
//! Applies the processors named in the project configuration to one
//! notebook or to every `.ipynb` under a directory, serializes each to
//! Quarto markdown, threads the text through the configured
//! post-processors, and writes the result under the output directory
//! mirroring the source layout.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgGroup, Args};

use nbstage_config::{Config, DEFAULT_OUTPUT};
use nbstage_processor::{Pipeline, ProcessorRegistry, QuartoSerializer, apply_post_processors};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the `process` command.
#[derive(Args)]
#[command(group = ArgGroup::new("input").required(true))]
pub(crate) struct ProcessArgs {
    /// Path to the YAML configuration file naming the processors.
    #[arg(long, value_name = "FILE")]
    config: PathBuf,

    /// Notebook to process.
    #[arg(long, group = "input", value_name = "FILE")]
    notebook: Option<PathBuf>,

    /// Directory of notebooks to process recursively.
    #[arg(long, group = "input", value_name = "DIR")]
    notebook_dir: Option<PathBuf>,

    /// Output directory (overrides `output_folder` from the config).
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(long, short)]
    pub(crate) verbose: bool,
}

impl ProcessArgs {
    /// Execute the command.
    pub(crate) fn execute(&self, output: &Output) -> Result<(), CliError> {
        let config = Config::load(&self.config)?;
        let registry = ProcessorRegistry::with_builtins();

        let output_dir = match self.output_dir.clone().or_else(|| config.output_folder.clone()) {
            Some(dir) => dir,
            None => {
                output.warning(&format!(
                    "No output location configured; writing to `{DEFAULT_OUTPUT}`"
                ));
                PathBuf::from(DEFAULT_OUTPUT)
            }
        };

        let notebooks = match (&self.notebook, &self.notebook_dir) {
            (Some(file), None) => vec![file.clone()],
            (None, Some(dir)) => discover_notebooks(dir)?,
            _ => {
                return Err(CliError::Validation(
                    "exactly one of --notebook and --notebook-dir is required".to_owned(),
                ));
            }
        };
        if notebooks.is_empty() {
            output.warning("No notebooks found");
            return Ok(());
        }

        for path in &notebooks {
            let written = process_notebook(path, &config, &registry, &output_dir)?;
            output.success(&format!(
                "Processed {} -> {}",
                path.display(),
                written.display()
            ));
        }
        output.info(&format!("{} notebook(s) processed", notebooks.len()));
        Ok(())
    }
}

/// Run the full pipeline for one notebook and write the result.
///
/// Processor and post-processor instances are resolved fresh per
/// notebook; instances are never shared across files.
fn process_notebook(
    path: &Path,
    config: &Config,
    registry: &ProcessorRegistry,
    output_dir: &Path,
) -> Result<PathBuf, CliError> {
    tracing::info!(notebook = %path.display(), "processing");

    let processors = registry.resolve(&config.processors, &config.processor_args)?;
    let mut pipeline = Pipeline::builder()
        .path(path)
        .processors(processors)
        .remove_directives(config.remove_directives)
        .process_immediately(config.process_immediately)
        .build()?;
    if !config.process_immediately {
        pipeline.process_notebook()?;
    }

    let mut content = pipeline.serialize(&QuartoSerializer);

    let out_path = output_path(path, &config.documentation_source, output_dir);
    let mut post_processors = registry.resolve_post(&config.post_processors, &config.processor_args)?;
    apply_post_processors(
        &mut content,
        &mut post_processors,
        &out_path.display().to_string(),
    )?;

    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&out_path, content)?;
    Ok(out_path)
}

/// Map a notebook path into the output directory, swapping the extension
/// for `.qmd`.
///
/// The path is taken relative to `documentation_source` when it lives
/// under it, so the source tree layout is mirrored; otherwise only the
/// file name is used.
fn output_path(notebook: &Path, documentation_source: &Path, output_dir: &Path) -> PathBuf {
    let relative = match notebook.strip_prefix(documentation_source) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => notebook.file_name().map_or_else(PathBuf::new, PathBuf::from),
    };
    output_dir.join(relative).with_extension("qmd")
}

/// Find every `.ipynb` under `dir`, sorted for deterministic runs.
fn discover_notebooks(dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    let pattern = dir.join("**/*.ipynb");
    let mut paths: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())?
        .filter_map(Result::ok)
        .collect();
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use nbstage_notebook::{CellType, Notebook, make_cell};

    const CONFIG: &str = r#"
processors:
  - basic
post_processors:
  - header-inject
processor_args:
  header-inject:
    header: "<!-- built by nbstage -->"
"#;

    #[test]
    fn test_output_path_mirrors_source_layout() {
        assert_eq!(
            output_path(
                Path::new("nbs/guide/intro.ipynb"),
                Path::new("nbs"),
                Path::new("docs"),
            ),
            PathBuf::from("docs/guide/intro.qmd")
        );

        // Outside the documentation source only the file name survives.
        assert_eq!(
            output_path(
                Path::new("elsewhere/intro.ipynb"),
                Path::new("nbs"),
                Path::new("docs"),
            ),
            PathBuf::from("docs/intro.qmd")
        );
    }

    #[test]
    fn test_process_notebook_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let source_dir = dir.path().join("nbs");
        fs::create_dir_all(&source_dir).unwrap();

        let notebook_path = source_dir.join("example.ipynb");
        Notebook::new(vec![make_cell(
            "#| process\ndef addition(a, b):\n  return a + b\n",
            CellType::Code,
        )])
        .write(&notebook_path)
        .unwrap();

        let mut config = Config::from_yaml(CONFIG).unwrap();
        config.documentation_source = source_dir;

        let registry = ProcessorRegistry::with_builtins();
        let out_dir = dir.path().join("docs");
        let written = process_notebook(&notebook_path, &config, &registry, &out_dir).unwrap();

        assert_eq!(written, out_dir.join("example.qmd"));
        let content = fs::read_to_string(&written).unwrap();
        assert!(content.starts_with("<!-- built by nbstage -->\n"));
        assert!(content.contains("# This code has been processed!"));
        assert!(!content.contains("#| process"));
    }

    #[test]
    fn test_discover_notebooks_recursive_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        for name in ["b.ipynb", "a.ipynb", "sub/c.ipynb"] {
            Notebook::new(Vec::new()).write(dir.path().join(name)).unwrap();
        }
        fs::write(dir.path().join("notes.txt"), "not a notebook").unwrap();

        let found = discover_notebooks(dir.path()).unwrap();
        let names: Vec<PathBuf> = found
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.ipynb"),
                PathBuf::from("b.ipynb"),
                PathBuf::from("sub/c.ipynb"),
            ]
        );
    }
}

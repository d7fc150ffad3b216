//! Jupyter notebook data model with directive extraction.
//!
//! This crate owns the on-disk notebook representation and the directive
//! syntax parsed out of cell comments:
//!
//! - [`Notebook`] / [`Cell`]: typed records for the ipynb JSON schema.
//!   Fields the pipeline does not interpret are carried in opaque maps so
//!   a load/write cycle preserves them verbatim.
//! - [`Directive`]: a `#| name arg...` marker in the leading comment lines
//!   of a cell, used by processors to decide whether a cell is eligible.
//!
//! Directives are extracted once, when a pipeline takes ownership of a
//! notebook; mutating a cell's source afterwards never re-derives them.
//!
//! # Example
//!
//! ```
//! use nbstage_notebook::{Cell, CellType, extract_directives};
//!
//! let mut cell = Cell::new(CellType::Code, "#| process\nprint('hi')\n");
//! extract_directives(&mut cell, "python", true);
//!
//! assert!(cell.has_directive(&["process"]));
//! assert_eq!(cell.source, "print('hi')\n");
//! ```

mod cell;
mod directive;
mod error;
mod language;
mod notebook;

pub use cell::{Cell, CellType};
pub use directive::{Directive, extract_directives, parse_directive_line};
pub use error::NotebookError;
pub use language::comment_marker;
pub use notebook::{Notebook, make_cell};

//! Comment markers for supported kernel languages.

/// Line comment marker for a kernel language.
///
/// The marker is what a directive line must start with (after leading
/// whitespace) to be recognized, e.g. `#| process` for Python or
/// `//| process` for Go. Unknown languages fall back to `#`.
#[must_use]
pub fn comment_marker(language: &str) -> &'static str {
    match language {
        "scala" | "csharp" | "fsharp" | "cpp" | "cc" | "java" | "groovy" | "js" | "d3" | "node"
        | "sass" | "go" | "asy" | "dot" => "//",
        "sql" | "mysql" | "psql" | "lua" | "haskell" => "--",
        "matlab" | "tikz" => "%",
        "fortran" | "fortran95" => "!",
        "stata" => "*",
        // python, r, julia, bash, and everything else
        _ => "#",
    }
}

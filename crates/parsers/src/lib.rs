//! Converters of PHP source files to the syntax tree used by the engine.

use anyhow::{Context, Result};
use ir::FileAst;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fs, path::Path};
use tracing::debug;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ParserMetrics {
    pub files_parsed: usize,
    pub parse_errors: usize,
}

pub mod languages;
pub use languages::*;

/// Determines the supported file type from the name/extension.
///
/// # Example
/// ```
/// use parsers::detect_type;
/// assert_eq!(detect_type(std::path::Path::new("src/Kernel.php")), Some("php"));
/// assert_eq!(detect_type(std::path::Path::new("README.md")), None);
/// ```
pub fn detect_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension().map(|e| e.to_string_lossy().to_lowercase());
    let detected = match ext.as_deref() {
        Some("php") | Some("phtml") | Some("php5") | Some("php7") | Some("php8") | Some("inc") => {
            Some("php")
        }
        _ => None,
    };
    if let Some(t) = detected {
        debug!(file = %path.display(), file_type = t, "File type detected");
    } else {
        debug!(file = %path.display(), "Unsupported file type");
    }
    detected
}

/// Parses PHP source held in memory.
///
/// # Example
/// ```
/// use parsers::parse_str;
/// let ast = parse_str("<?php echo 1;").unwrap();
/// assert_eq!(ast.file_path, "<memory>");
/// ```
pub fn parse_str(content: &str) -> Result<FileAst> {
    parse_php(content, "<memory>")
}

/// Lines containing the suppression marker `comment`.
pub fn suppressed_lines(content: &str, comment: &str) -> HashSet<usize> {
    content
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| line.contains(comment).then_some(idx + 1))
        .collect()
}

/// Reads a file and produces its syntax tree.
///
/// Returns `Ok(None)` for files that are not PHP. Unreadable files and
/// sources with syntax errors are errors.
///
/// # Example
/// ```
/// use parsers::parse_file;
/// use std::fs;
/// let path = std::env::temp_dir().join("ex_parse_file.php");
/// fs::write(&path, "<?php\n$a = 1; // rootcause-ignore\n").unwrap();
/// let ast = parse_file(&path, Some("rootcause-ignore")).unwrap().unwrap();
/// assert!(ast.suppressed.contains(&2));
/// ```
pub fn parse_file(path: &Path, suppress_comment: Option<&str>) -> Result<Option<FileAst>> {
    debug!(file = %path.display(), "Detecting file type");
    let Some(ftype) = detect_type(path) else {
        return Ok(None);
    };
    debug!(file = %path.display(), file_type = ftype, "Parsing file");
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let file_path = path.to_string_lossy().into_owned();
    let mut ast = parse_php(&content, &file_path)?;
    if let Some(comment) = suppress_comment {
        ast.suppressed = suppressed_lines(&content, comment);
    }
    Ok(Some(ast))
}

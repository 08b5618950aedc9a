//! Common utilities for the command line interface.
use regex::Regex;
use std::fs;
use std::path::Path;

pub mod args;
pub mod config;
pub mod output;
pub mod rules;
pub mod scan;
pub mod ui;
pub mod walk;

/// Default maximum size: 5 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Marker that suppresses findings on its line unless overridden.
pub const DEFAULT_SUPPRESS_COMMENT: &str = "rootcause-ignore";

/// Directories never worth scanning in a PHP project.
const DEFAULT_EXCLUDES: &[&str] = &["**/vendor/**", "**/node_modules/**", "**/.git/**"];

/// Converts a basic glob pattern to a regular expression.
///
/// Character classes are not supported and yield an error.
///
/// # Example
///
/// ```
/// use rootcause_php::glob_to_regex;
/// let re = glob_to_regex("app/*.php").unwrap();
/// assert!(re.is_match("app/Kernel.php"));
/// assert!(!re.is_match("app/Http/Kernel.php"));
/// ```
pub fn glob_to_regex(pat: &str) -> Result<Regex, regex::Error> {
    if pat.contains('[') || pat.contains(']') {
        return Regex::new("[");
    }
    let mut regex = String::from("^");
    let mut chars = pat.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    regex.push_str(".*");
                } else {
                    regex.push_str("[^/]*");
                }
            }
            '?' => regex.push('.'),
            '.' => regex.push_str("\\."),
            '/' => regex.push('/'),
            '(' | ')' | '+' | '|' | '^' | '$' | '{' | '}' | '\\' => {
                regex.push('\\');
                regex.push(c);
            }
            _ => regex.push(c),
        }
    }
    regex.push('$');
    Regex::new(&regex)
}

/// Transforms a glob-style exclusion string into [`Regex`].
/// Accepts trailing slashes and expands to `**` automatically.
///
/// # Example
///
/// ```
/// use rootcause_php::parse_exclude;
/// let re = parse_exclude("storage/").unwrap();
/// assert!(re.is_match("storage/framework/views/a.php"));
/// ```
pub fn parse_exclude(s: &str) -> Result<Regex, String> {
    let glob_str = if s.ends_with('/') {
        format!("{s}**")
    } else {
        s.to_string()
    };
    glob_to_regex(&glob_str).map_err(|e| e.to_string())
}

/// Default exclusion patterns: `vendor/`, `node_modules/` and `.git/`.
pub fn default_excludes() -> Vec<Regex> {
    DEFAULT_EXCLUDES
        .iter()
        .filter_map(|p| parse_exclude(p).ok())
        .collect()
}

/// Reads `.gitignore` and `.sastignore` from `root` and converts their
/// valid entries to regular expressions.
pub fn load_ignore_patterns(root: &Path) -> Vec<Regex> {
    let mut patterns = Vec::new();
    for name in [".gitignore", ".sastignore"] {
        let path = root.join(name);
        let Ok(content) = fs::read_to_string(path) else {
            continue;
        };
        for line in content.lines() {
            let line = line.trim();
            // negations are not supported
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let mut pat = line.trim_start_matches('/').to_string();
            if !pat.starts_with("**/") {
                pat = format!("**/{pat}");
            }
            if let Ok(re) = parse_exclude(&pat) {
                patterns.push(re);
            }
        }
    }
    patterns
}

/// Indicates whether a path should be omitted according to patterns or size.
/// Separators are normalised to support Windows and Unix.
///
/// # Example
///
/// ```
/// use rootcause_php::{is_excluded, parse_exclude};
/// use std::path::Path;
/// let patterns = vec![parse_exclude("**/vendor/**").unwrap()];
/// assert!(is_excluded(Path::new("/srv/app/vendor/laravel/x.php"), &patterns, 0));
/// ```
pub fn is_excluded(path: &Path, patterns: &[Regex], max_file_size: u64) -> bool {
    let path_str = path.to_string_lossy().replace('\\', "/");
    if patterns.iter().any(|re| re.is_match(&path_str)) {
        return true;
    }
    if max_file_size > 0 {
        if let Ok(meta) = fs::metadata(path) {
            if meta.is_file() && meta.len() > max_file_size {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_excludes_cover_dependency_dirs() {
        let patterns = default_excludes();
        assert_eq!(patterns.len(), 3);
        for path in [
            "/p/vendor/spatie/laravel-query-builder/src/QueryBuilder.php",
            "/p/node_modules/x/index.php",
            "/p/.git/hooks/pre-commit",
        ] {
            assert!(is_excluded(Path::new(path), &patterns, 0), "{path}");
        }
        assert!(!is_excluded(Path::new("/p/app/Vendor.php"), &patterns, 0));
    }

    #[test]
    fn glob_rejects_character_classes() {
        assert!(glob_to_regex("app/[a-z].php").is_err());
        assert!(parse_exclude("app/[a-z].php").is_err());
    }

    #[test]
    fn double_star_crosses_directories() {
        let re = glob_to_regex("**/tests/**").unwrap();
        assert!(re.is_match("/repo/tests/Unit/AuthTest.php"));
        assert!(!re.is_match("/repo/app/Tests.php"));
    }
}

//! File-name helpers shared by every batch tool.
//!
//! Natural ordering treats digit runs as numbers, so `page_2` sorts before
//! `page_10`. Unique-path generation appends ` (1)`, ` (2)`, … before the
//! extension until the candidate is free.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// One segment of a natural sort key. Numbers order before text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum KeyPart {
    Number(u128),
    Text(String),
}

fn natural_key(s: &str) -> Vec<KeyPart> {
    let mut parts = Vec::new();
    let mut buf = String::new();
    let mut digits = false;

    for ch in s.chars() {
        if ch.is_ascii_digit() == digits {
            buf.push(ch);
            continue;
        }
        if !buf.is_empty() {
            parts.push(flush(&buf, digits));
        }
        buf = ch.to_string();
        digits = ch.is_ascii_digit();
    }
    if !buf.is_empty() {
        parts.push(flush(&buf, digits));
    }
    parts
}

fn flush(run: &str, digits: bool) -> KeyPart {
    if digits {
        match run.parse::<u128>() {
            Ok(n) => KeyPart::Number(n),
            // Absurdly long digit runs fall back to text ordering.
            Err(_) => KeyPart::Text(run.to_string()),
        }
    } else {
        KeyPart::Text(run.to_string())
    }
}

/// Numeric-aware ordering for file names.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b))
}

/// Strips characters that are not allowed in file names on any supported
/// platform. Returns `fallback` if nothing printable survives.
pub fn sanitize_file_name(name: &str, fallback: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Group key for a PDF file name: the text before the first dot or
/// whitespace, after dropping a trailing `.pdf` extension.
pub fn extract_prefix(file_name: &str) -> &str {
    let lower = file_name.to_ascii_lowercase();
    let stem = if lower.ends_with(".pdf") {
        &file_name[..file_name.len() - 4]
    } else {
        file_name
    };
    match stem.find(|c: char| c == '.' || c.is_whitespace()) {
        Some(idx) => &stem[..idx],
        None => stem,
    }
}

/// Returns `path` if free, otherwise the first ` (n)`-suffixed variant that
/// does not exist on disk.
pub fn unique_path(path: &Path) -> PathBuf {
    unique_path_where(path, |p| p.exists())
}

/// Like [`unique_path`] but with a caller-supplied occupancy check, so the
/// caller can also reserve paths it is about to create.
pub fn unique_path_where(path: &Path, occupied: impl Fn(&Path) -> bool) -> PathBuf {
    if !occupied(path) {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let parent = path.parent().unwrap_or_else(|| Path::new(""));

    let mut counter = 1u32;
    loop {
        let candidate = parent.join(format!("{stem} ({counter}){ext}"));
        if !occupied(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_natural_cmp_orders_numbers_numerically() {
        assert_eq!(natural_cmp("page_2", "page_10"), Ordering::Less);
        assert_eq!(natural_cmp("page_10", "page_2"), Ordering::Greater);
        assert_eq!(natural_cmp("page_2", "page_2"), Ordering::Equal);
    }

    #[test]
    fn test_natural_cmp_sorts_file_list() {
        let mut names = vec!["A 10.pdf", "A 2.pdf", "A 1.pdf", "B.pdf"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(names, vec!["A 1.pdf", "A 2.pdf", "A 10.pdf", "B.pdf"]);
    }

    #[test]
    fn test_sanitize_removes_reserved_characters() {
        assert_eq!(sanitize_file_name("a/b:c*d?.pdf", "x"), "abcd.pdf");
        assert_eq!(sanitize_file_name("  <>|  ", "fallback"), "fallback");
    }

    #[test]
    fn test_extract_prefix() {
        assert_eq!(extract_prefix("A.pdf"), "A");
        assert_eq!(extract_prefix("A 2.pdf"), "A");
        assert_eq!(extract_prefix("INV-100 copy.pdf"), "INV-100");
        assert_eq!(extract_prefix("INV.100.pdf"), "INV");
        assert_eq!(extract_prefix("noext"), "noext");
    }

    #[test]
    fn test_extract_prefix_is_case_sensitive() {
        assert_ne!(extract_prefix("Abc.pdf"), extract_prefix("abc.pdf"));
    }

    #[test]
    fn test_unique_path_where_appends_counter() {
        let taken: HashSet<PathBuf> = [
            PathBuf::from("/out/doc.pdf"),
            PathBuf::from("/out/doc (1).pdf"),
        ]
        .into_iter()
        .collect();

        let result = unique_path_where(Path::new("/out/doc.pdf"), |p| taken.contains(p));
        assert_eq!(result, PathBuf::from("/out/doc (2).pdf"));
    }

    #[test]
    fn test_unique_path_where_returns_free_path_unchanged() {
        let result = unique_path_where(Path::new("/out/doc.pdf"), |_| false);
        assert_eq!(result, PathBuf::from("/out/doc.pdf"));
    }

    #[test]
    fn test_unique_path_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, b"x").unwrap();
        std::fs::write(dir.path().join("report (1).pdf"), b"x").unwrap();

        let result = unique_path(&path);
        assert_eq!(result, dir.path().join("report (2).pdf"));
        assert!(!result.exists());
    }
}

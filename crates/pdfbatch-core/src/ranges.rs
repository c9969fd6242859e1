//! Page-range expression parsing.

use std::collections::BTreeSet;

use crate::error::PdfBatchError;

/// Parse a range expression like `"1-3, 5, 8-10"` into sorted, deduplicated
/// zero-based page indices.
///
/// An empty expression selects every page. Malformed tokens, descending
/// ranges, page zero, or pages beyond `page_count` are errors — there is
/// never a partial selection.
pub fn parse_page_ranges(input: &str, page_count: usize) -> Result<Vec<usize>, PdfBatchError> {
    if input.trim().is_empty() {
        return Ok((0..page_count).collect());
    }

    let mut pages = BTreeSet::new();

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let (start, end) = match part.split_once('-') {
            Some((start, end)) => (parse_page(start)?, parse_page(end)?),
            None => {
                let page = parse_page(part)?;
                (page, page)
            }
        };

        if start == 0 {
            return Err(PdfBatchError::InvalidRange(
                "Page numbers start at 1".into(),
            ));
        }
        if start > end {
            return Err(PdfBatchError::InvalidRange(format!(
                "Start {start} > end {end}"
            )));
        }
        if end > page_count {
            return Err(PdfBatchError::InvalidRange(format!(
                "Page {end} does not exist (document has {page_count} pages)"
            )));
        }

        for page in start..=end {
            pages.insert(page - 1);
        }
    }

    Ok(pages.into_iter().collect())
}

fn parse_page(token: &str) -> Result<usize, PdfBatchError> {
    token
        .trim()
        .parse()
        .map_err(|_| PdfBatchError::InvalidRange(format!("Invalid page: {token}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_page() {
        assert_eq!(parse_page_ranges("5", 10).unwrap(), vec![4]);
    }

    #[test]
    fn test_mixed_expression_is_zero_based() {
        assert_eq!(parse_page_ranges("1-3,5", 10).unwrap(), vec![0, 1, 2, 4]);
    }

    #[test]
    fn test_overlapping_ranges_deduplicate() {
        assert_eq!(parse_page_ranges("1-3, 2-4", 10).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_empty_selects_all_pages() {
        assert_eq!(parse_page_ranges("  ", 3).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_out_of_range_is_an_error() {
        assert!(parse_page_ranges("8-12", 10).is_err());
        assert!(parse_page_ranges("11", 10).is_err());
    }

    #[test]
    fn test_malformed_tokens_are_errors() {
        assert!(parse_page_ranges("abc", 10).is_err());
        assert!(parse_page_ranges("3-1", 10).is_err());
        assert!(parse_page_ranges("0-2", 10).is_err());
        assert!(parse_page_ranges("1-", 10).is_err());
    }
}

//! Local text-layer extraction

use crate::error::ParserError;
use compbench_domain::ParsedElement;
use std::path::Path;

/// Element type assigned to locally extracted paragraphs
pub const PARAGRAPH_ELEMENT: &str = "NarrativeText";

/// Extract paragraph elements from a PDF on the current thread.
///
/// `pdf_extract` can panic on malformed input, so the call is isolated.
#[cfg(feature = "local-pdf")]
pub(crate) fn extract_elements(path: &Path) -> Result<Vec<ParsedElement>, ParserError> {
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text(path)
    }));

    match result {
        Ok(Ok(text)) => {
            tracing::debug!("PDF extracted locally: {} chars", text.len());
            Ok(split_paragraphs(&text))
        }
        Ok(Err(e)) => Err(ParserError::Local(format!("PDF extraction failed: {}", e))),
        Err(_) => Err(ParserError::Local(
            "PDF extraction panicked (malformed PDF)".to_string(),
        )),
    }
}

#[cfg(not(feature = "local-pdf"))]
pub(crate) fn extract_elements(_path: &Path) -> Result<Vec<ParsedElement>, ParserError> {
    Err(ParserError::LocalUnavailable)
}

/// Split plain text into paragraph elements on blank lines
#[cfg_attr(not(feature = "local-pdf"), allow(dead_code))]
pub(crate) fn split_paragraphs(text: &str) -> Vec<ParsedElement> {
    let mut elements = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                elements.push(ParsedElement::new(PARAGRAPH_ELEMENT, current.join("\n")));
                current.clear();
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        elements.push(ParsedElement::new(PARAGRAPH_ELEMENT, current.join("\n")));
    }

    elements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_paragraphs() {
        let text = "Summary Compensation Table\n\n\nJane Doe\nChief Executive Officer  \n \nSalary $950,000\n";
        let elements = split_paragraphs(text);

        let texts: Vec<_> = elements.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Summary Compensation Table",
                "Jane Doe\nChief Executive Officer",
                "Salary $950,000"
            ]
        );
        assert!(elements
            .iter()
            .all(|e| e.element_type.as_deref() == Some(PARAGRAPH_ELEMENT)));
    }

    #[test]
    fn test_split_blank_text() {
        assert!(split_paragraphs("").is_empty());
        assert!(split_paragraphs("\n \n\t\n").is_empty());
    }

    #[cfg(not(feature = "local-pdf"))]
    #[test]
    fn test_unavailable_without_feature() {
        let result = extract_elements(Path::new("report.pdf"));
        assert!(matches!(result, Err(ParserError::LocalUnavailable)));
    }
}

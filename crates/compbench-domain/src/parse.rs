//! Parsed document module

use crate::estimate_tokens;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Layout strategy requested from the document parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsingStrategy {
    /// Layout-aware, model-based partitioning
    HiRes,

    /// Text-layer extraction only
    Fast,

    /// Force OCR on every page
    OcrOnly,

    /// Let the service choose per page
    Auto,
}

impl Default for ParsingStrategy {
    fn default() -> Self {
        ParsingStrategy::HiRes
    }
}

impl ParsingStrategy {
    /// Wire name of the strategy
    pub fn as_str(&self) -> &'static str {
        match self {
            ParsingStrategy::HiRes => "hi_res",
            ParsingStrategy::Fast => "fast",
            ParsingStrategy::OcrOnly => "ocr_only",
            ParsingStrategy::Auto => "auto",
        }
    }
}

impl std::fmt::Display for ParsingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ParsingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hi_res" => Ok(ParsingStrategy::HiRes),
            "fast" => Ok(ParsingStrategy::Fast),
            "ocr_only" => Ok(ParsingStrategy::OcrOnly),
            "auto" => Ok(ParsingStrategy::Auto),
            _ => Err(format!(
                "Invalid strategy: {}. Use: hi_res, fast, ocr_only, or auto",
                s
            )),
        }
    }
}

/// A single element returned by the parser (title, paragraph, table, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedElement {
    /// Element category, e.g. `NarrativeText` or `Table`
    #[serde(rename = "type", default)]
    pub element_type: Option<String>,

    /// Text content (may be empty for images)
    #[serde(default)]
    pub text: String,

    /// Free-form element metadata (page number, coordinates, ...)
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl ParsedElement {
    /// Create an element with no metadata
    pub fn new(element_type: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            element_type: Some(element_type.into()),
            text: text.into(),
            metadata: Map::new(),
        }
    }
}

/// Document-level metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseMetadata {
    /// Number of elements the parser returned
    pub num_elements: usize,

    /// Size of the source file in bytes, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

/// Result of parsing one document
///
/// Exactly one of two shapes:
/// - success: `error` is `None`, `elements` and `token_count` are present
/// - failure: `error` is `Some`, `text` is empty, `elements` and `token_count` are `None`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    /// Source document
    pub file_path: PathBuf,

    /// Strategy that was requested
    pub strategy: ParsingStrategy,

    /// Full plain text, elements joined by blank lines
    pub text: String,

    /// Elements in document order
    pub elements: Option<Vec<ParsedElement>>,

    /// Document-level metadata
    pub metadata: Option<ParseMetadata>,

    /// Wall-clock parse time in seconds
    pub parse_time: f64,

    /// Estimated token count of `text`
    pub token_count: Option<usize>,

    /// Error description when parsing failed
    pub error: Option<String>,
}

impl ParseResult {
    /// Build a result from parsed elements
    ///
    /// Text-bearing elements are joined in document order with a blank line.
    /// When no element carries text the result is a failure with
    /// `"No text extracted"`, so `error` stays set exactly when `text` is empty.
    pub fn success(
        file_path: impl Into<PathBuf>,
        strategy: ParsingStrategy,
        elements: Vec<ParsedElement>,
        file_size: Option<u64>,
        parse_time: f64,
    ) -> Self {
        let text = elements
            .iter()
            .map(|e| e.text.as_str())
            .filter(|t| !t.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");
        if text.is_empty() {
            return Self::failure(file_path, strategy, "No text extracted", parse_time);
        }
        let token_count = estimate_tokens(&text);

        Self {
            file_path: file_path.into(),
            strategy,
            text,
            metadata: Some(ParseMetadata {
                num_elements: elements.len(),
                file_size,
            }),
            elements: Some(elements),
            parse_time,
            token_count: Some(token_count),
            error: None,
        }
    }

    /// Build a failed result carrying an error description
    pub fn failure(
        file_path: impl Into<PathBuf>,
        strategy: ParsingStrategy,
        error: impl Into<String>,
        parse_time: f64,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            strategy,
            text: String::new(),
            elements: None,
            metadata: None,
            parse_time,
            token_count: None,
            error: Some(error.into()),
        }
    }

    /// Whether parsing succeeded
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("hi_res".parse::<ParsingStrategy>(), Ok(ParsingStrategy::HiRes));
        assert_eq!("FAST".parse::<ParsingStrategy>(), Ok(ParsingStrategy::Fast));
        assert_eq!("ocr_only".parse::<ParsingStrategy>(), Ok(ParsingStrategy::OcrOnly));
        assert_eq!("auto".parse::<ParsingStrategy>(), Ok(ParsingStrategy::Auto));
        assert!("accurate".parse::<ParsingStrategy>().is_err());
    }

    #[test]
    fn test_success_joins_text_bearing_elements() {
        let elements = vec![
            ParsedElement::new("Title", "Executive Compensation"),
            ParsedElement::new("Image", ""),
            ParsedElement::new("NarrativeText", "CEO base salary was $1,000,000."),
        ];

        let result = ParseResult::success("proxy.pdf", ParsingStrategy::Fast, elements, Some(2048), 1.5);

        assert!(result.is_success());
        assert_eq!(
            result.text,
            "Executive Compensation\n\nCEO base salary was $1,000,000."
        );
        assert_eq!(result.token_count, Some(result.text.len() / 4));
        assert_eq!(result.elements.as_ref().map(Vec::len), Some(3));
        let metadata = result.metadata.unwrap();
        assert_eq!(metadata.num_elements, 3);
        assert_eq!(metadata.file_size, Some(2048));
    }

    #[test]
    fn test_blank_elements_are_a_failure() {
        let elements = vec![
            ParsedElement::new("Image", ""),
            ParsedElement::new("PageBreak", "  \n "),
        ];

        for elements in [elements, Vec::new()] {
            let result = ParseResult::success("scan.pdf", ParsingStrategy::Fast, elements, Some(512), 0.4);

            assert!(!result.is_success());
            assert_eq!(result.error.as_deref(), Some("No text extracted"));
            assert!(result.text.is_empty());
            assert!(result.elements.is_none());
            assert!(result.token_count.is_none());
            assert_eq!(result.parse_time, 0.4);
        }
    }

    #[test]
    fn test_failure_shape() {
        let result = ParseResult::failure("missing.pdf", ParsingStrategy::HiRes, "File not found", 0.0);

        assert!(!result.is_success());
        assert!(result.text.is_empty());
        assert!(result.elements.is_none());
        assert!(result.token_count.is_none());
        assert_eq!(result.error.as_deref(), Some("File not found"));
    }

    #[test]
    fn test_element_deserializes_service_shape() {
        let json = r#"{"type": "Table", "text": "Name | Salary", "metadata": {"page_number": 4}}"#;
        let element: ParsedElement = serde_json::from_str(json).unwrap();
        assert_eq!(element.element_type.as_deref(), Some("Table"));
        assert_eq!(element.metadata["page_number"], 4);

        let bare: ParsedElement = serde_json::from_str(r#"{"type": "PageBreak"}"#).unwrap();
        assert!(bare.text.is_empty());
    }
}

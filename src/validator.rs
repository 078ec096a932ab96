//! Well-formedness validation
//!
//! The validator asks a host XML parser whether it accepts a document and turns
//! the parser's free-text diagnostic into an [`ErrorDescriptor`]. Acceptance
//! only means the parser built a tree; it is not a full conformance check.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

use crate::error::{Result, StudioError};
use crate::libxml2::{LibXml2Wrapper, UNKNOWN_PARSE_ERROR};

/// Boilerplate some parsers prepend to their diagnostics
pub const DIAGNOSTIC_BOILERPLATE: &str = "This page contains the following errors:";

static LINE_NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();

fn line_number_regex() -> &'static Regex {
    LINE_NUMBER_REGEX
        .get_or_init(|| Regex::new(r"(?i)line\s+(\d+)").expect("Failed to compile line regex"))
}

/// Port to a generic, non-lenient XML parser.
pub trait WellFormednessChecker {
    /// Returns `None` when the document is accepted, otherwise the parser's
    /// human-readable diagnostic.
    fn check(&self, xml: &str) -> Option<String>;
}

/// Where and why a document was rejected.
///
/// `line` is best effort: 0 means the diagnostic did not mention one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDescriptor {
    pub line: u32,
    pub message: String,
}

impl ErrorDescriptor {
    /// Build a descriptor from raw diagnostic text.
    ///
    /// The line number is the first `line <N>` found in the text (any case).
    /// The boilerplate header is stripped and the remainder trimmed.
    pub fn from_diagnostic(diagnostic: &str) -> Self {
        let text = if diagnostic.is_empty() {
            UNKNOWN_PARSE_ERROR
        } else {
            diagnostic
        };

        let line = line_number_regex()
            .captures(text)
            .and_then(|caps| caps[1].parse().ok())
            .unwrap_or(0);

        Self {
            line,
            message: text.replacen(DIAGNOSTIC_BOILERPLATE, "", 1).trim().to_string(),
        }
    }

    pub fn has_line(&self) -> bool {
        self.line > 0
    }
}

impl fmt::Display for ErrorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validator over any [`WellFormednessChecker`]
#[derive(Debug, Clone)]
pub struct Validator<C = LibXml2Wrapper> {
    checker: C,
}

impl<C: WellFormednessChecker> Validator<C> {
    pub fn new(checker: C) -> Self {
        Self { checker }
    }

    /// `None` when the document is accepted.
    pub fn validate(&self, xml: &str) -> Option<ErrorDescriptor> {
        let diagnostic = self.checker.check(xml)?;
        let descriptor = ErrorDescriptor::from_diagnostic(&diagnostic);
        debug!(
            line = descriptor.line,
            message = %descriptor.message,
            "document rejected"
        );
        Some(descriptor)
    }

    /// Like [`Validator::validate`], for callers that propagate with `?`.
    pub fn ensure_well_formed(&self, xml: &str) -> Result<()> {
        match self.validate(xml) {
            Some(descriptor) => Err(StudioError::InvalidXml(descriptor)),
            None => Ok(()),
        }
    }
}

impl Default for Validator<LibXml2Wrapper> {
    fn default() -> Self {
        Self::new(LibXml2Wrapper::new())
    }
}

/// Validate with the libxml2-backed checker.
pub fn validate_xml(xml: &str) -> Option<ErrorDescriptor> {
    Validator::default().validate(xml)
}

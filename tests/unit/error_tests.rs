use std::path::PathBuf;

use xml_studio::error::{ConfigError, StudioError};
use xml_studio::{AiError, ErrorDescriptor};

#[test]
fn test_invalid_xml_error_carries_descriptor() {
    let descriptor = ErrorDescriptor {
        line: 1,
        message: "error on line 1 at column 9: Opening and ending tag mismatch".to_string(),
    };
    let error: StudioError = descriptor.clone().into();

    assert_eq!(
        error.to_string(),
        format!("Invalid XML: {}", descriptor.message)
    );
    match error {
        StudioError::InvalidXml(inner) => assert_eq!(inner, descriptor),
        other => panic!("Expected InvalidXml, got {:?}", other),
    }
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let error: StudioError = io_error.into();
    assert!(matches!(error, StudioError::Io(_)));
}

#[test]
fn test_unsupported_file_names_path() {
    let error = StudioError::UnsupportedFile {
        path: PathBuf::from("report.pdf"),
    };
    assert!(error.to_string().contains("report.pdf"));
}

#[test]
fn test_config_error_becomes_studio_error() {
    let error: StudioError = ConfigError::Environment("Invalid XML_STUDIO_TIMEOUT value: x".into()).into();
    assert!(error.to_string().contains("XML_STUDIO_TIMEOUT"));
}

#[test]
fn test_ai_error_is_wrapped() {
    let error: StudioError = AiError::Timeout { timeout_seconds: 3 }.into();
    assert!(error.to_string().contains("3 seconds"));
}

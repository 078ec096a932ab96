//! Workspace orchestration with mocked host ports

use mockall::predicate::eq;
use tempfile::TempDir;

use xml_studio::error::StudioError;
use xml_studio::session::DirectoryTarget;
use xml_studio::{AiError, Status, ViewMode, Workspace};

use crate::common::mocks::{InMemoryClipboard, MockCollaborator, RecordingTarget};
use crate::common::test_helpers::{
    CATALOG_XML, MISMATCHED_XML, SIMPLE_XML, SIMPLE_XML_FORMATTED, read_file, write_temp_file,
};

fn workspace_with(input: &str) -> Workspace {
    let mut workspace = Workspace::new();
    workspace.set_input(input);
    workspace
}

#[test]
fn test_format_then_download() {
    let mut workspace = workspace_with(SIMPLE_XML);
    assert_eq!(workspace.format(), Status::Success);

    let mut target = RecordingTarget::new();
    let download = workspace.save_download(&mut target).unwrap();
    assert_eq!(download.filename, "formatted.xml");
    assert_eq!(target.saved.len(), 1);
    assert_eq!(target.saved[0].content, SIMPLE_XML_FORMATTED);
}

#[test]
fn test_download_target_failure_propagates() {
    let mut workspace = workspace_with(SIMPLE_XML);
    workspace.minify();

    let mut target = RecordingTarget::failing();
    let result = workspace.save_download(&mut target);
    assert!(matches!(result, Err(StudioError::Io(_))));
}

#[test]
fn test_directory_target_writes_file() {
    let temp_dir = TempDir::new().unwrap();
    let mut workspace = workspace_with(CATALOG_XML);
    workspace.format();

    let mut target = DirectoryTarget::new(temp_dir.path());
    let download = workspace.save_download(&mut target).unwrap();
    let path = target.path_for(&download);
    assert_eq!(path, temp_dir.path().join("formatted.xml"));
    assert_eq!(read_file(&path), workspace.output());
}

#[test]
fn test_clipboard_receives_panes() {
    let mut workspace = workspace_with("<a>\n  <b/>\n</a>");
    workspace.minify();

    let mut clipboard = InMemoryClipboard::new();
    workspace.copy_input(&mut clipboard).unwrap();
    workspace.copy_output(&mut clipboard).unwrap();

    assert_eq!(clipboard.writes[0], "<a>\n  <b/>\n</a>");
    assert_eq!(clipboard.last(), Some("<a><b/></a>"));
}

#[test]
fn test_clear_input_enables_repair_gate() {
    let mut workspace = workspace_with(SIMPLE_XML);
    workspace.format();
    assert!(!workspace.can_repair());

    workspace.clear_input();
    assert!(workspace.input().is_empty());
    assert!(workspace.can_repair());
}

#[tokio::test]
async fn test_repair_flow_after_validation_failure() {
    let mut ai = MockCollaborator::new();
    ai.expect_repair()
        .with(eq(MISMATCHED_XML))
        .times(1)
        .returning(|_| Ok("<a><b></b></a>".to_string()));

    let mut workspace = workspace_with(MISMATCHED_XML);
    assert_eq!(workspace.format(), Status::Error);
    assert!(workspace.can_repair());

    assert_eq!(workspace.repair(&ai).await, Status::Success);
    assert_eq!(workspace.input(), "<a><b></b></a>");
    assert_eq!(workspace.output(), "<a>\r\n  <b>\r\n  </b>\r\n</a>");
    assert!(!workspace.can_repair());

    // The repaired text is accepted by the validator.
    assert_eq!(workspace.format(), Status::Success);
}

#[tokio::test]
async fn test_failed_repair_keeps_previous_state() {
    let mut ai = MockCollaborator::new();
    ai.expect_repair()
        .returning(|_| Err(AiError::Timeout { timeout_seconds: 60 }));

    let mut workspace = workspace_with(MISMATCHED_XML);
    workspace.format();
    assert_eq!(workspace.repair(&ai).await, Status::Error);
    assert_eq!(workspace.input(), MISMATCHED_XML);
    assert!(workspace.validation_error().is_some());
    assert!(!workspace.is_busy());
}

#[tokio::test]
async fn test_convert_then_download_json() {
    let mut ai = MockCollaborator::new();
    ai.expect_convert_to_json()
        .with(eq(SIMPLE_XML))
        .returning(|_| Ok("{\"root\": {\"item\": 1}}".to_string()));

    let mut workspace = workspace_with(SIMPLE_XML);
    assert_eq!(workspace.convert_to_json(&ai).await, Status::Success);
    assert_eq!(workspace.view_mode(), ViewMode::Json);

    let download = workspace.download().unwrap();
    assert_eq!(download.filename, "formatted.json");
    assert_eq!(download.mime_type, "application/json");
    assert_eq!(download.content, "{\"root\": {\"item\": 1}}");
}

#[tokio::test]
async fn test_generate_then_format() {
    let mut ai = MockCollaborator::new();
    ai.expect_generate_sample()
        .times(1)
        .returning(|| Ok(CATALOG_XML.to_string()));

    let mut workspace = Workspace::new();
    assert_eq!(workspace.generate_sample(&ai).await, Status::Idle);
    assert_eq!(workspace.message(), "Sample loaded");
    assert!(workspace.output().is_empty());

    assert_eq!(workspace.format(), Status::Success);
    assert!(workspace.output().starts_with("<?xml"));
}

#[tokio::test]
async fn test_load_upload_from_disk() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_temp_file(&temp_dir, "catalog.xml", CATALOG_XML);

    let mut workspace = Workspace::new();
    workspace.load_upload(&path).await.unwrap();
    assert_eq!(workspace.input(), CATALOG_XML);
    assert!(workspace.output().contains("\r\n  <book id=\"1\" genre=\"fiction\">"));
    assert_eq!(workspace.status(), Status::Idle);
    assert!(workspace.message().is_empty());
}

#[tokio::test]
async fn test_load_upload_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let mut workspace = Workspace::new();
    let result = workspace
        .load_upload(&temp_dir.path().join("missing.xml"))
        .await;
    assert!(matches!(result, Err(StudioError::Io(_))));
}

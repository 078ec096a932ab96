use std::path::{Path, PathBuf};
use tempfile::TempDir;

use xml_studio::AiConfig;

/// Small well-formed document used across tests
pub const SIMPLE_XML: &str = "<root><item>1</item></root>";

/// The same document after formatting
pub const SIMPLE_XML_FORMATTED: &str = "<root>\r\n  <item>1</item>\r\n</root>";

/// Mismatched closing tag
pub const MISMATCHED_XML: &str = "<a><b></a>";

pub const CATALOG_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<library>
  <!-- catalog -->
  <book id="1" genre="fiction">
    <title>Dune</title>
    <author>Frank Herbert</author>
  </book>
  <book id="2" genre="science"><title>Cosmos</title><author>Carl Sagan</author></book>
  <shelf empty="true"/>
</library>"#;

/// Write `content` to `name` inside `dir` and return the full path
pub fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Collaborator settings pointing at a local stub server
pub fn stub_ai_config(base_url: &str) -> AiConfig {
    AiConfig {
        api_key: Some("test-key".to_string()),
        base_url: base_url.to_string(),
        timeout_seconds: 5,
        ..Default::default()
    }
}

/// Read a file written by a download target
pub fn read_file(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

/// Leading-space count of each line of formatted output
pub fn indents(formatted: &str) -> Vec<usize> {
    formatted
        .split("\r\n")
        .map(|line| line.len() - line.trim_start_matches(' ').len())
        .collect()
}

//! Orchestration layer
//!
//! [`Workspace`] owns the only mutable state in the crate: the current input,
//! the current output, the status line and the retained validation error.
//! Local operations run to completion synchronously. Remote operations go
//! through the [`AiCollaborator`] port and pass through [`Status::Loading`].
//!
//! Every remote operation takes `&mut self`, so a second request cannot be
//! started on the same workspace while one is still awaiting its reply.
//!
//! Host capabilities (clipboard, file downloads) are injected as ports instead
//! of being reached through globals.

use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::ai::AiCollaborator;
use crate::error::{Result, StudioError};
use crate::formatter::format_xml;
use crate::libxml2::LibXml2Wrapper;
use crate::minifier::minify_xml;
use crate::validator::{ErrorDescriptor, Validator, WellFormednessChecker};

/// File extensions accepted by [`Workspace::load_upload`]
pub const UPLOAD_EXTENSIONS: &[&str] = &["xml", "txt"];

/// Outcome of the most recent operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    #[default]
    Idle,
    Success,
    Error,
    Loading,
}

/// How the current output is labelled and exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ViewMode {
    #[default]
    Xml,
    Json,
}

impl ViewMode {
    pub fn extension(self) -> &'static str {
        match self {
            ViewMode::Xml => "xml",
            ViewMode::Json => "json",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ViewMode::Xml => "application/xml",
            ViewMode::Json => "application/json",
        }
    }

    pub fn download_filename(self) -> String {
        format!("formatted.{}", self.extension())
    }

    /// Title of the output pane
    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Xml => "XML Output",
            ViewMode::Json => "JSON Output",
        }
    }
}

/// A file offered for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub mime_type: &'static str,
    pub content: String,
}

/// System clipboard port
#[cfg_attr(test, mockall::automock)]
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> io::Result<()>;
}

/// Destination for downloads
#[cfg_attr(test, mockall::automock)]
pub trait DownloadTarget {
    fn save(&mut self, download: &Download) -> io::Result<()>;
}

/// Saves downloads as files inside a directory
#[derive(Debug, Clone)]
pub struct DirectoryTarget {
    directory: PathBuf,
}

impl DirectoryTarget {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn path_for(&self, download: &Download) -> PathBuf {
        self.directory.join(&download.filename)
    }
}

impl DownloadTarget for DirectoryTarget {
    fn save(&mut self, download: &Download) -> io::Result<()> {
        let path = self.path_for(download);
        // The handle lives only for this call.
        let mut file = File::create(&path)?;
        file.write_all(download.content.as_bytes())?;
        file.flush()?;
        debug!("Saved {} ({})", path.display(), download.mime_type);
        Ok(())
    }
}

/// Editor state and the operations that drive it
#[derive(Debug)]
pub struct Workspace<C = LibXml2Wrapper> {
    validator: Validator<C>,
    input: String,
    output: String,
    status: Status,
    message: String,
    view_mode: ViewMode,
    validation_error: Option<ErrorDescriptor>,
}

impl Workspace<LibXml2Wrapper> {
    pub fn new() -> Self {
        Self::with_validator(Validator::default())
    }
}

impl Default for Workspace<LibXml2Wrapper> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: WellFormednessChecker> Workspace<C> {
    pub fn with_validator(validator: Validator<C>) -> Self {
        Self {
            validator,
            input: String::new(),
            output: String::new(),
            status: Status::Idle,
            message: String::new(),
            view_mode: ViewMode::Xml,
            validation_error: None,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Status line text; empty until the first operation
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn validation_error(&self) -> Option<&ErrorDescriptor> {
        self.validation_error.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.status == Status::Loading
    }

    /// Whether AI repair is offered: there is a known error, or nothing to check yet.
    pub fn can_repair(&self) -> bool {
        self.validation_error.is_some() || self.input.is_empty()
    }

    /// Replace the input text. A retained validation error is kept until the
    /// next validate cycle.
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    fn has_input(&self) -> bool {
        !self.input.trim().is_empty()
    }

    fn succeed(&mut self, message: &str) -> Status {
        self.settle(Status::Success, message.to_string())
    }

    fn fail(&mut self, message: String) -> Status {
        self.settle(Status::Error, message)
    }

    fn settle(&mut self, status: Status, message: String) -> Status {
        debug!(?status, %message, "status changed");
        self.status = status;
        self.message = message;
        status
    }

    /// Check the input without producing output.
    pub fn validate(&mut self) -> Status {
        if !self.has_input() {
            return self.status;
        }

        self.validation_error = self.validator.validate(&self.input);
        match &self.validation_error {
            Some(error) => {
                let message = format!("Invalid XML: {}", error.message);
                self.fail(message)
            }
            None => self.succeed("XML is well-formed"),
        }
    }

    /// Validate, then pretty-print the input into the output pane.
    pub fn format(&mut self) -> Status {
        if !self.has_input() {
            return self.status;
        }

        self.validation_error = self.validator.validate(&self.input);
        if let Some(error) = &self.validation_error {
            let message = format!("Invalid XML: {}", error.message);
            return self.fail(message);
        }

        self.output = format_xml(&self.input);
        self.view_mode = ViewMode::Xml;
        self.succeed("XML formatted successfully")
    }

    /// Validate, then minify the input into the output pane.
    pub fn minify(&mut self) -> Status {
        if !self.has_input() {
            return self.status;
        }

        if let Some(error) = self.validator.validate(&self.input) {
            self.validation_error = Some(error);
            return self.fail("Cannot minify invalid XML".to_string());
        }

        self.validation_error = None;
        self.output = minify_xml(&self.input);
        self.view_mode = ViewMode::Xml;
        self.succeed("XML minified")
    }

    /// Ask the collaborator to fix the input; the fixed text replaces the
    /// input and its formatted form becomes the output.
    pub async fn repair<A>(&mut self, ai: &A) -> Status
    where
        A: AiCollaborator + ?Sized,
    {
        if !self.has_input() {
            return self.status;
        }

        self.settle(
            Status::Loading,
            "AI is analyzing and repairing your XML...".to_string(),
        );
        match ai.repair(&self.input).await {
            Ok(fixed) => {
                self.output = format_xml(&fixed);
                self.input = fixed;
                self.validation_error = None;
                self.succeed("XML repaired by Gemini AI")
            }
            Err(err) => {
                warn!("AI repair failed: {}", err);
                self.fail("AI Repair failed. Please check your API Key.".to_string())
            }
        }
    }

    /// Ask the collaborator for a JSON rendition of the input.
    pub async fn convert_to_json<A>(&mut self, ai: &A) -> Status
    where
        A: AiCollaborator + ?Sized,
    {
        if !self.has_input() {
            return self.status;
        }

        self.settle(Status::Loading, "AI is converting XML to JSON...".to_string());
        match ai.convert_to_json(&self.input).await {
            Ok(json) => {
                self.output = json;
                self.view_mode = ViewMode::Json;
                self.succeed("Converted to JSON successfully")
            }
            Err(err) => {
                warn!("AI conversion failed: {}", err);
                self.fail("Conversion failed".to_string())
            }
        }
    }

    /// Replace the input with a generated sample document.
    pub async fn generate_sample<A>(&mut self, ai: &A) -> Status
    where
        A: AiCollaborator + ?Sized,
    {
        self.settle(Status::Loading, "Generating sample data...".to_string());
        match ai.generate_sample().await {
            Ok(sample) => {
                self.input = sample;
                self.output.clear();
                self.validation_error = None;
                self.settle(Status::Idle, "Sample loaded".to_string())
            }
            Err(err) => {
                warn!("AI sample generation failed: {}", err);
                self.fail("Failed to generate sample".to_string())
            }
        }
    }

    /// Load an uploaded `.xml`/`.txt` file as the input, formatting it into
    /// the output when it validates. The status line is left untouched.
    pub async fn load_upload(&mut self, path: &Path) -> Result<()> {
        if !is_supported_upload(path) {
            return Err(StudioError::UnsupportedFile {
                path: path.to_path_buf(),
            });
        }

        let content = tokio::fs::read_to_string(path).await?;
        info!("Loaded {} ({} bytes)", path.display(), content.len());

        if self.validator.validate(&content).is_none() {
            self.output = format_xml(&content);
        }
        self.input = content;
        Ok(())
    }

    /// The current output as a download, or `None` when there is no output.
    pub fn download(&self) -> Option<Download> {
        if self.output.is_empty() {
            return None;
        }

        Some(Download {
            filename: self.view_mode.download_filename(),
            mime_type: self.view_mode.mime_type(),
            content: self.output.clone(),
        })
    }

    /// Hand the current output to a download target.
    pub fn save_download<T>(&self, target: &mut T) -> Result<Download>
    where
        T: DownloadTarget + ?Sized,
    {
        let download = self.download().ok_or(StudioError::EmptyOutput)?;
        target.save(&download)?;
        Ok(download)
    }

    pub fn copy_output<K>(&self, clipboard: &mut K) -> io::Result<()>
    where
        K: Clipboard + ?Sized,
    {
        clipboard.write_text(&self.output)
    }

    pub fn copy_input<K>(&self, clipboard: &mut K) -> io::Result<()>
    where
        K: Clipboard + ?Sized,
    {
        clipboard.write_text(&self.input)
    }
}

/// `.xml` or `.txt`, in any case
pub fn is_supported_upload(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            UPLOAD_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

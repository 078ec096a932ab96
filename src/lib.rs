//! # xml-studio Library
//!
//! Format, minify and validate XML documents, with repair, XML-to-JSON
//! conversion and sample generation delegated to a remote AI collaborator.
//!
//! The text transformations are pure functions over `&str`; validation goes
//! through libxml2; [`session::Workspace`] ties them together the way an
//! editor would.

pub mod ai;
pub mod cli;
pub mod config;
pub mod error;
pub mod fence;
pub mod formatter;
pub mod http_client;
pub mod libxml2;
pub mod minifier;
pub mod output;
pub mod session;
pub mod tokenizer;
pub mod validator;

pub use ai::{AiCollaborator, AiConfig, AiOperation, GeminiClient};
pub use cli::{Cli, VerbosityLevel};
pub use config::{Config, ConfigManager};
pub use error::{AiError, StudioError};
pub use fence::strip_code_fence;
pub use formatter::format_xml;
pub use http_client::{AsyncHttpClient, HttpClientConfig};
pub use libxml2::{LibXml2Wrapper, ParseOutcome};
pub use minifier::minify_xml;
pub use output::Output;
pub use session::{Clipboard, DirectoryTarget, Download, DownloadTarget, Status, ViewMode, Workspace};
pub use tokenizer::{TagKind, TagToken, tokenize};
pub use validator::{ErrorDescriptor, Validator, WellFormednessChecker, validate_xml};

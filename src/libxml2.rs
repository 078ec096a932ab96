//! LibXML2 FFI Wrapper Module
//!
//! This module provides a safe wrapper around the libxml2 document parser, used
//! as the well-formedness checker behind [`crate::validator::Validator`].
//!
//! ## Why libxml2
//!
//! The validator needs a conformant, generic XML parser that reports *why* a
//! document was rejected, with a line and column. libxml2 is the same engine
//! several browsers and `xmllint` rely on, so its diagnostics read the way users
//! expect ("Opening and ending tag mismatch: b line 1 and a").
//!
//! ## Parsing mode
//!
//! - Documents are parsed from memory with `xmlReadMemory`, which allocates a
//!   fresh parser context per call. No parser state is shared between calls.
//! - Network access is disabled (`XML_PARSE_NONET`); no DTD is loaded.
//! - Only fatal errors make a document malformed. Namespace problems such as an
//!   unbound prefix are reported by libxml2 but do not stop it from building
//!   the tree, so they are accepted here.
//!
//! ## Thread Safety
//!
//! Parser initialization is not thread-safe and is guarded by
//! [`std::sync::Once`]. The structured error handler that collects diagnostics
//! is thread-local in libxml2, so concurrent checks on different threads each
//! see only their own messages.

use std::ffi::CStr;
use std::marker::PhantomData;
use std::ptr;
use std::sync::Once;

use libc::{c_char, c_int, c_void};
use tracing::{debug, warn};

use crate::error::{LibXml2Error, LibXml2Result};
use crate::validator::WellFormednessChecker;

/// Global initialization flag for libxml2
static LIBXML2_INIT: Once = Once::new();

/// `xmlParserOption::XML_PARSE_NONET`
const XML_PARSE_NONET: c_int = 1 << 11;

/// `xmlErrorLevel::XML_ERR_ERROR`
const XML_ERR_ERROR: c_int = 2;

/// Fallback text when libxml2 rejects a document without saying why
pub const UNKNOWN_PARSE_ERROR: &str = "Unknown parsing error";

/// Opaque libxml2 document
#[repr(C)]
pub struct XmlDoc {
    _private: [u8; 0],
}

#[repr(C)]
pub struct xmlError {
    pub domain: c_int,
    pub code: c_int,
    pub message: *const c_char,
    pub level: c_int,
    pub file: *const c_char,
    pub line: c_int,
    pub str1: *const c_char,
    pub str2: *const c_char,
    pub str3: *const c_char,
    pub int1: c_int,
    pub int2: c_int,
    pub ctxt: *mut c_void,
    pub node: *mut c_void,
}

pub type XmlStructuredErrorFunc =
    Option<unsafe extern "C" fn(user_data: *mut c_void, error: *const xmlError)>;

// External libxml2 FFI declarations
#[cfg_attr(target_os = "windows", link(name = "libxml2"))]
#[cfg_attr(not(target_os = "windows"), link(name = "xml2"))]
unsafe extern "C" {
    pub fn xmlInitParser();

    pub fn xmlReadMemory(
        buffer: *const c_char,
        size: c_int,
        url: *const c_char,
        encoding: *const c_char,
        options: c_int,
    ) -> *mut XmlDoc;
    pub fn xmlFreeDoc(doc: *mut XmlDoc);

    pub fn xmlSetStructuredErrorFunc(ctx: *mut c_void, handler: XmlStructuredErrorFunc);
    pub fn xmlResetLastError();
    pub fn xmlGetLastError() -> *const xmlError;
}

/// One diagnostic reported by the parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserMessage {
    pub level: i32,
    pub line: i32,
    pub column: i32,
    pub message: String,
}

impl ParserMessage {
    /// # Safety
    ///
    /// `error` must point to a live `xmlError` owned by libxml2.
    unsafe fn from_raw(error: &xmlError) -> Self {
        let message = if error.message.is_null() {
            String::new()
        } else {
            unsafe { CStr::from_ptr(error.message) }
                .to_string_lossy()
                .trim()
                .to_string()
        };

        Self {
            level: error.level,
            line: error.line,
            column: error.int2,
            message,
        }
    }

    /// Render the message the way browser parsers print theirs.
    pub fn diagnostic(&self) -> String {
        format!(
            "error on line {} at column {}: {}",
            self.line, self.column, self.message
        )
    }
}

/// Outcome of a single well-formedness check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// libxml2 built a document tree
    WellFormed,
    /// libxml2 gave up; messages are in report order
    Malformed { messages: Vec<ParserMessage> },
}

impl ParseOutcome {
    pub fn is_well_formed(&self) -> bool {
        matches!(self, ParseOutcome::WellFormed)
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, ParseOutcome::Malformed { .. })
    }

    /// The first error-level message, or the first message of any level.
    pub fn first_error(&self) -> Option<&ParserMessage> {
        match self {
            ParseOutcome::WellFormed => None,
            ParseOutcome::Malformed { messages } => messages
                .iter()
                .find(|m| m.level >= XML_ERR_ERROR)
                .or_else(|| messages.first()),
        }
    }
}

/// Callback for libxml2 to report parser errors (structured)
unsafe extern "C" fn structured_error_callback(user_data: *mut c_void, error: *const xmlError) {
    if user_data.is_null() || error.is_null() {
        return;
    }
    let messages = unsafe { &mut *(user_data as *mut Vec<ParserMessage>) };
    messages.push(unsafe { ParserMessage::from_raw(&*error) });
}

/// Installs the collecting handler for the current thread and removes it on drop
struct ErrorCapture {
    _not_send: PhantomData<*mut ()>,
}

impl ErrorCapture {
    /// # Safety
    ///
    /// `sink` must point to a `Vec<ParserMessage>` that outlives the guard and
    /// is not accessed while the guard is alive.
    unsafe fn install(sink: *mut Vec<ParserMessage>) -> Self {
        unsafe {
            xmlSetStructuredErrorFunc(sink as *mut c_void, Some(structured_error_callback));
        }
        Self {
            _not_send: PhantomData,
        }
    }
}

impl Drop for ErrorCapture {
    fn drop(&mut self) {
        unsafe {
            xmlSetStructuredErrorFunc(ptr::null_mut(), None);
        }
    }
}

/// Safe access to the libxml2 document parser
#[derive(Debug, Clone, Copy)]
pub struct LibXml2Wrapper {
    _phantom: PhantomData<()>,
}

impl LibXml2Wrapper {
    /// Create a new wrapper, initializing libxml2 on first use.
    pub fn new() -> Self {
        LIBXML2_INIT.call_once(|| unsafe {
            xmlInitParser();
        });

        LibXml2Wrapper {
            _phantom: PhantomData,
        }
    }

    /// Parse a document from memory and report whether it is well-formed.
    ///
    /// # Errors
    ///
    /// Returns `LibXml2Error::InputTooLarge` if the buffer does not fit in a C `int`.
    pub fn parse_memory(&self, xml: &[u8]) -> LibXml2Result<ParseOutcome> {
        let size = c_int::try_from(xml.len())
            .map_err(|_| LibXml2Error::InputTooLarge { size: xml.len() })?;

        // libxml2 refuses zero-length buffers without raising an error.
        if size == 0 {
            return Ok(ParseOutcome::Malformed {
                messages: vec![ParserMessage {
                    level: XML_ERR_ERROR + 1,
                    line: 1,
                    column: 1,
                    message: "Document is empty".to_string(),
                }],
            });
        }

        let mut messages: Vec<ParserMessage> = Vec::new();
        let sink = &mut messages as *mut Vec<ParserMessage>;

        let doc = unsafe {
            let _capture = ErrorCapture::install(sink);
            xmlResetLastError();
            xmlReadMemory(
                xml.as_ptr() as *const c_char,
                size,
                ptr::null(),
                ptr::null(),
                XML_PARSE_NONET,
            )
        };

        if !doc.is_null() {
            unsafe { xmlFreeDoc(doc) };
            return Ok(ParseOutcome::WellFormed);
        }

        if messages.is_empty()
            && let Some(last) = last_error()
        {
            messages.push(last);
        }

        debug!(count = messages.len(), "libxml2 rejected document");
        Ok(ParseOutcome::Malformed { messages })
    }
}

/// Thread-local last error, used when the structured handler saw nothing.
fn last_error() -> Option<ParserMessage> {
    unsafe {
        let error = xmlGetLastError();
        if error.is_null() || (*error).code == 0 {
            None
        } else {
            Some(ParserMessage::from_raw(&*error))
        }
    }
}

impl Default for LibXml2Wrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl WellFormednessChecker for LibXml2Wrapper {
    fn check(&self, xml: &str) -> Option<String> {
        match self.parse_memory(xml.as_bytes()) {
            Ok(ParseOutcome::WellFormed) => None,
            Ok(outcome) => Some(
                outcome
                    .first_error()
                    .map(ParserMessage::diagnostic)
                    .unwrap_or_else(|| UNKNOWN_PARSE_ERROR.to_string()),
            ),
            Err(err) => {
                warn!("libxml2 could not check document: {}", err);
                Some(err.to_string())
            }
        }
    }
}

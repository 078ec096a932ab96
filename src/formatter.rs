//! Line-oriented XML pretty-printer
//!
//! Formatting walks the token sequence produced by [`crate::tokenizer`] and
//! re-emits every token on its own line. There is no tree and no validation:
//! callers are expected to run the validator first and refuse to format
//! documents it rejects.

use crate::tokenizer::{TagKind, tokenize};

/// One level of indentation
pub const INDENT_UNIT: &str = "  ";

/// Terminator written after every emitted line
pub const LINE_ENDING: &str = "\r\n";

/// Re-indent a document, one tag per line.
///
/// Each token is written as `<indent><token><CRLF>`. Closing tags dedent before
/// they are written and opening tags indent after, so self-closing tags,
/// declarations and comments leave the depth untouched.
///
/// The first token still carries the document's leading `<` and the last token
/// its trailing `>`, so the emission loop produces one phantom `<` at the start
/// and one phantom `>` before the final CRLF. Both are cut afterwards, together
/// with the final CRLF: the last line therefore has no terminator.
///
/// Depth saturates at zero. A stray closing tag at depth zero (input that never
/// went through validation) is written flush left instead of failing, and the
/// following lines are indented relative to that clamped depth.
pub fn format_xml(xml: &str) -> String {
    let mut formatted = String::with_capacity(xml.len() * 2);
    let mut depth: usize = 0;

    for token in tokenize(xml) {
        let kind = token.kind();
        if kind == TagKind::Closing {
            depth = depth.saturating_sub(1);
        }

        formatted.push_str(&INDENT_UNIT.repeat(depth));
        formatted.push('<');
        formatted.push_str(token.raw());
        formatted.push('>');
        formatted.push_str(LINE_ENDING);

        if kind == TagKind::Opening {
            depth += 1;
        }
    }

    trim_emission_artifacts(formatted)
}

/// Drop the leading phantom character and the trailing `>` + CRLF.
fn trim_emission_artifacts(mut formatted: String) -> String {
    // Every emitted line ends in ">\r\n" and the first one starts with '<',
    // so both cuts land on ASCII boundaries.
    let trailing = '>'.len_utf8() + LINE_ENDING.len();
    if formatted.len() < trailing + 1 {
        return String::new();
    }
    formatted.truncate(formatted.len() - trailing);
    formatted.remove(0);
    formatted
}

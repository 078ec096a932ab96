use crate::tokenizer::inter_tag_whitespace_regex;

/// Remove all whitespace strictly between `>` and `<`, then trim the document.
///
/// Whitespace inside text nodes and attribute values is left alone. Minifying
/// already minified text returns it unchanged.
pub fn minify_xml(xml: &str) -> String {
    inter_tag_whitespace_regex()
        .replace_all(xml, "><")
        .trim()
        .to_string()
}

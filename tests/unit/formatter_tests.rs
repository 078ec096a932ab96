//! Formatter behaviour on realistic documents

use xml_studio::{format_xml, minify_xml};

use crate::common::test_helpers::{
    CATALOG_XML, SIMPLE_XML, SIMPLE_XML_FORMATTED, indents,
};

#[test]
fn test_simple_document_layout() {
    assert_eq!(format_xml(SIMPLE_XML), SIMPLE_XML_FORMATTED);
}

#[test]
fn test_indent_equals_nesting_depth() {
    let formatted = format_xml("<a><b><c><d>x</d></c></b></a>");
    assert_eq!(indents(&formatted), vec![0, 2, 4, 6, 4, 2, 0]);
}

#[test]
fn test_single_character_names_indent_like_longer_ones() {
    let short = format_xml("<a><b><c>t</c></b></a>");
    let long = format_xml("<aa><bb><cc>t</cc></bb></aa>");
    assert_eq!(short, "<a>\r\n  <b>\r\n    <c>t</c>\r\n  </b>\r\n</a>");
    assert_eq!(indents(&short), indents(&long));
}

#[test]
fn test_self_closing_siblings_share_depth() {
    let formatted = format_xml("<a><b/><c/></a>");
    let lines: Vec<&str> = formatted.split("\r\n").collect();
    assert_eq!(lines, vec!["<a>", "  <b/>", "  <c/>", "</a>"]);
}

#[test]
fn test_every_line_but_last_is_crlf_terminated() {
    let formatted = format_xml(CATALOG_XML);
    assert!(!formatted.ends_with('\n'));
    assert!(!formatted.contains("\r\n\r\n"));
    assert_eq!(formatted.matches('\n').count(), formatted.matches("\r\n").count());
}

#[test]
fn test_catalog_layout() {
    let formatted = format_xml(CATALOG_XML);
    let lines: Vec<&str> = formatted.split("\r\n").collect();
    assert_eq!(lines[0], "<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
    assert_eq!(lines[1], "<library>");
    assert_eq!(lines[2], "  <!-- catalog -->");
    assert_eq!(lines[3], "  <book id=\"1\" genre=\"fiction\">");
    assert_eq!(lines[4], "    <title>Dune</title>");
    assert_eq!(lines.last(), Some(&"</library>"));
}

#[test]
fn test_minify_undoes_format() {
    for document in [SIMPLE_XML, "<a><b/><c x=\"1\">t</c></a>", "<x><y><z/></y></x>"] {
        assert_eq!(minify_xml(&format_xml(document)), document);
    }
}

#[test]
fn test_format_is_stable() {
    let once = format_xml(CATALOG_XML);
    assert_eq!(format_xml(&once), once);
}

#[test]
fn test_unvalidated_input_does_not_panic() {
    assert_eq!(format_xml("</a></b><c>"), "</a>\r\n</b>\r\n<c>");
    assert_eq!(format_xml(""), "");
}

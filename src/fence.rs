//! Fenced code block stripping
//!
//! Text-generation replies often wrap their payload in a markdown fence even
//! when asked not to: three backticks with an optional language tag on the
//! first line, three backticks on the last. Only those exact shapes are
//! removed; anything else is passed through trimmed.

const FENCE: &str = "```";

/// Strip a surrounding fence, preferring one tagged with `lang`, then trim.
///
/// The opening fence is only removed when it is followed by a newline, and the
/// closing fence only when it is preceded by one and ends the text.
pub fn strip_code_fence(text: &str, lang: &str) -> String {
    let tagged = format!("{FENCE}{lang}");

    let stripped = if text.starts_with(&tagged) {
        strip_fence_lines(text, &tagged)
    } else if text.starts_with(FENCE) {
        strip_fence_lines(text, FENCE)
    } else {
        text
    };

    stripped.trim().to_string()
}

fn strip_fence_lines<'a>(text: &'a str, opening: &str) -> &'a str {
    let text = text
        .strip_prefix(opening)
        .and_then(|rest| rest.strip_prefix('\n'))
        .unwrap_or(text);
    text.strip_suffix(FENCE)
        .and_then(|rest| rest.strip_suffix('\n'))
        .unwrap_or(text)
}

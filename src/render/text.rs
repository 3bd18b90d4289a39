//! Visible text extraction from rendered HTML.

use crate::normalize::collapse_blank_lines;

/// Elements that start and end a paragraph of visible text.
const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "dd",
    "details",
    "div",
    "dl",
    "dt",
    "figcaption",
    "figure",
    "footer",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "ol",
    "p",
    "pre",
    "section",
    "summary",
    "table",
    "ul",
];

/// Elements that end a line without ending the paragraph.
const LINE_TAGS: &[&str] = &["br", "li", "tr"];

/// Elements whose content is never visible.
const HIDDEN_TAGS: &[&str] = &["script", "style", "template"];

/// Strip tags from an HTML snapshot and return its visible text.
///
/// Block elements become paragraphs separated by one blank line, list items
/// and table rows become lines, table cells are separated by spaces, and
/// character references are decoded. Comments and script/style content are
/// dropped.
///
/// ```
/// use mdsync::render::extract_plain_text;
///
/// let text = extract_plain_text("<h1>Title</h1>\n<p>a &amp; b</p>");
/// assert_eq!(text, "Title\n\na & b");
/// ```
pub fn extract_plain_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    let mut pre_depth = 0_usize;

    while let Some(pos) = rest.find(['<', '&']) {
        let (text, tail) = rest.split_at(pos);
        push_text(&mut out, text, pre_depth > 0);

        if tail.starts_with("<!--") {
            rest = tail.find("-->").map_or("", |end| &tail[end + 3..]);
            continue;
        }

        if tail.starts_with('<') {
            let Some(end) = tag_end(tail) else {
                out.push_str(tail);
                rest = "";
                break;
            };
            let tag = Tag::parse(&tail[1..end]);
            rest = &tail[end + 1..];

            if !tag.closing && HIDDEN_TAGS.contains(&tag.name.as_str()) {
                rest = skip_past_closing(rest, &tag.name);
                continue;
            }
            if tag.name == "pre" {
                pre_depth = if tag.closing {
                    pre_depth.saturating_sub(1)
                } else {
                    pre_depth + 1
                };
            }
            apply_tag(&mut out, &tag);
            continue;
        }

        // '&' character reference
        let (decoded, consumed) = decode_entity(tail);
        out.push_str(&decoded);
        rest = &tail[consumed..];
    }
    push_text(&mut out, rest, pre_depth > 0);

    let trimmed_lines = out.lines().map(str::trim_end).collect::<Vec<_>>().join("\n");
    collapse_blank_lines(trimmed_lines.trim_matches('\n'))
}

/// Whitespace-only runs that span lines are formatting between tags; outside
/// `<pre>` they collapse to at most one space.
fn push_text(out: &mut String, text: &str, preformatted: bool) {
    if preformatted || !text.contains('\n') || !text.trim().is_empty() {
        out.push_str(text);
    } else if !out.is_empty() && !out.ends_with(char::is_whitespace) {
        out.push(' ');
    }
}

/// Byte index of the `>` closing the tag at the start of `tail`, skipping
/// quoted attribute values.
fn tag_end(tail: &str) -> Option<usize> {
    let mut quote = None;
    for (i, c) in tail.char_indices().skip(1) {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), _) if c == q => quote = None,
            (None, '>') => return Some(i),
            _ => {}
        }
    }
    None
}

fn skip_past_closing<'a>(rest: &'a str, name: &str) -> &'a str {
    let closing = format!("</{name}");
    rest.find(&closing)
        .map(|start| &rest[start..])
        .and_then(|tail| tail.find('>').map(|end| &tail[end + 1..]))
        .unwrap_or_default()
}

struct Tag {
    name: String,
    closing: bool,
}

impl Tag {
    fn parse(inner: &str) -> Self {
        let inner = inner.trim();
        let (closing, inner) = inner
            .strip_prefix('/')
            .map_or((false, inner), |rest| (true, rest));
        let name = inner
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        Self { name, closing }
    }
}

fn apply_tag(out: &mut String, tag: &Tag) {
    let name = tag.name.as_str();
    if BLOCK_TAGS.contains(&name) {
        end_paragraph(out);
    } else if LINE_TAGS.contains(&name) {
        if !(tag.closing && name == "br") {
            end_line(out);
        }
    } else if tag.closing && matches!(name, "td" | "th") {
        out.push(' ');
    } else if !tag.closing && name == "img" {
        // alt text is not in the tag body; leave a gap so words don't fuse
        out.push(' ');
    }
}

fn trim_trailing_inline_space(out: &mut String) {
    let keep = out.trim_end_matches([' ', '\t']).len();
    out.truncate(keep);
}

fn end_line(out: &mut String) {
    trim_trailing_inline_space(out);
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

fn end_paragraph(out: &mut String) {
    let keep = out.trim_end().len();
    out.truncate(keep);
    if !out.is_empty() {
        out.push_str("\n\n");
    }
}

/// Decode the character reference at the start of `input` (which begins
/// with `&`). Returns the replacement and the number of bytes consumed;
/// unknown references are kept literally.
fn decode_entity(input: &str) -> (String, usize) {
    let Some(semi) = input[1..].find(';').filter(|&i| i > 0 && i <= 10) else {
        return ("&".to_string(), 1);
    };
    let body = &input[1..=semi];
    let consumed = semi + 2;
    let named = match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        "ndash" => Some('\u{2013}'),
        "mdash" => Some('\u{2014}'),
        "hellip" => Some('\u{2026}'),
        "lsquo" => Some('\u{2018}'),
        "rsquo" => Some('\u{2019}'),
        "ldquo" => Some('\u{201C}'),
        "rdquo" => Some('\u{201D}'),
        _ => None,
    };
    let decoded = named.or_else(|| {
        let number = body.strip_prefix('#')?;
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse().ok()?,
        };
        char::from_u32(code)
    });
    decoded.map_or_else(|| ("&".to_string(), 1), |c| (c.to_string(), consumed))
}

//! Markdown rendering for the preview pane and export.
//!
//! The renderer itself is a collaborator behind the [`Renderer`] trait;
//! [`ComrakRenderer`] is the one the application uses. The preview pane
//! shows the visible text of the rendered HTML, which is also what the
//! scroll matcher compares against the source.

mod text;

pub use text::extract_plain_text;

use comrak::{Options, markdown_to_html};
use tracing::trace;

use crate::normalize::normalize;

/// Turns markdown into an HTML fragment.
pub trait Renderer {
    fn render(&self, markdown: &str) -> String;
}

/// CommonMark + GFM renderer with `$`/`$$` math.
///
/// Math is emitted as `<span data-math-style="inline|display">` elements
/// with the TeX source as text, leaving typesetting to whoever displays
/// the HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComrakRenderer {
    /// Pass raw HTML in the markdown through.
    pub raw_html: bool,
    /// Smart quotes and dashes.
    pub typographer: bool,
    /// Turn bare URLs into links.
    pub linkify: bool,
}

impl Default for ComrakRenderer {
    fn default() -> Self {
        Self {
            raw_html: true,
            typographer: true,
            linkify: true,
        }
    }
}

impl Renderer for ComrakRenderer {
    fn render(&self, markdown: &str) -> String {
        let mut options = Options::default();
        options.extension.math_dollars = true;
        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.tasklist = true;
        options.extension.footnotes = true;
        options.extension.autolink = self.linkify;
        options.parse.smart = self.typographer;
        options.render.unsafe_ = self.raw_html;
        options.render.hardbreaks = false;
        markdown_to_html(markdown, &options)
    }
}

/// Everything derived from the editor text for one render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    /// Source after delimiter normalization (what gets copied).
    pub normalized: String,
    /// Renderer output (what gets exported).
    pub html: String,
    /// Visible text of `html` (what the preview shows and sync matches).
    pub text: String,
}

impl Rendered {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Normalize, render and extract the visible text of `source`.
pub fn render_document(renderer: &impl Renderer, source: &str) -> Rendered {
    let normalized = normalize(source);
    let html = renderer.render(&normalized);
    let text = extract_plain_text(&html);
    trace!(
        source_len = source.len(),
        html_len = html.len(),
        text_len = text.len(),
        "rendered preview"
    );
    Rendered {
        normalized,
        html,
        text,
    }
}

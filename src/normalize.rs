//! Math delimiter normalization.
//!
//! The preview renderer only understands dollar-delimited math, so the
//! bracket forms (`\[ .. \]` for display math, `\( .. \)` for inline math)
//! are rewritten before rendering. Runs of blank lines are collapsed at the
//! same time so paragraph boundaries stay uniform.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};

static DISPLAY_OPEN: LazyLock<Regex> = LazyLock::new(|| compile(r"\\\["));
static DISPLAY_CLOSE: LazyLock<Regex> = LazyLock::new(|| compile(r"\\\]"));
static INLINE_OPEN: LazyLock<Regex> = LazyLock::new(|| compile(r"\\\(\s*"));
static INLINE_CLOSE: LazyLock<Regex> = LazyLock::new(|| compile(r"\s*\\\)"));
static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| compile(r"\n{3,}"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static delimiter pattern is valid")
}

/// Rewrite `\[`/`\]` and `\(`/`\)` into `$$`/`$` markers and collapse
/// three or more consecutive newlines into exactly two.
///
/// Total over any input; unbalanced delimiters are rewritten one by one.
///
/// ```
/// use mdsync::normalize::normalize;
///
/// assert_eq!(normalize(r"\[x\]"), "$$x$$\n");
/// assert_eq!(normalize(r"\( x \)"), "$x$");
/// assert_eq!(normalize("a\n\n\n\nb"), "a\n\nb");
/// ```
pub fn normalize(text: &str) -> String {
    let text = DISPLAY_OPEN.replace_all(text, NoExpand("$$"));
    let text = DISPLAY_CLOSE.replace_all(&text, NoExpand("$$\n"));
    let text = INLINE_OPEN.replace_all(&text, NoExpand("$"));
    let text = INLINE_CLOSE.replace_all(&text, NoExpand("$"));
    collapse_blank_lines(&text)
}

/// Collapse runs of three or more newlines into a single blank line.
pub fn collapse_blank_lines(text: &str) -> String {
    EXCESS_NEWLINES
        .replace_all(text, NoExpand("\n\n"))
        .into_owned()
}

/// Canonicalize line endings (`\r\n` and lone `\r` become `\n`) and collapse
/// blank-line runs. Applied to normalized text before it goes to the clipboard.
pub fn canonical_newlines(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    collapse_blank_lines(&unified)
}

//! Fuzzy position matching between the source and preview panes.
//!
//! Rendered layout height and text length are not linearly related, so the
//! matcher works on text: it takes the last few paragraphs above the origin
//! pane's scroll position (the anchor window), slides a window of the same
//! size over the target pane's paragraphs, and scrolls the target to the
//! most similar window. Weak matches fall back to proportional mapping.

use tracing::trace;

/// Number of paragraphs in the anchor window and in each candidate window.
pub const WINDOW_PARAGRAPHS: usize = 3;

/// Minimum similarity for a text match to be trusted over proportional mapping.
pub const MIN_CONFIDENCE: f64 = 0.3;

/// Text and total scrollable height of one pane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneContent<'a> {
    pub text: &'a str,
    pub scroll_height: f64,
}

impl<'a> PaneContent<'a> {
    pub const fn new(text: &'a str, scroll_height: f64) -> Self {
        Self {
            text,
            scroll_height,
        }
    }

    fn height(&self) -> f64 {
        if self.scroll_height.is_finite() {
            self.scroll_height.max(0.0)
        } else {
            0.0
        }
    }

    /// Fraction of the content above `offset`, clamped to `0.0..=1.0`.
    fn fraction_at(&self, offset: f64) -> f64 {
        let height = self.height();
        if height <= 0.0 || !offset.is_finite() {
            return 0.0;
        }
        (offset / height).clamp(0.0, 1.0)
    }
}

/// A blank-line separated paragraph, trimmed, with its byte position in the
/// text it was split from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paragraph<'a> {
    pub byte_start: usize,
    pub text: &'a str,
}

/// How a target offset was obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Alignment {
    /// Either pane had no text.
    Empty,
    /// No confident text match; offset is proportional to the origin's.
    Proportional,
    /// The candidate window starting at paragraph `window` scored `score`.
    Matched { window: usize, score: f64 },
}

/// Target offset plus how it was derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult {
    pub offset: f64,
    pub alignment: Alignment,
}

/// Split text into paragraphs on blank (whitespace-only) lines.
///
/// Paragraphs are trimmed and runs of blank lines never yield empty entries.
pub fn split_paragraphs(text: &str) -> Vec<Paragraph<'_>> {
    let mut paragraphs = Vec::new();
    let mut start: Option<usize> = None;
    let mut end = 0;
    let mut line_start = 0;

    for line in text.split_inclusive('\n') {
        let offset = line_start;
        line_start += line.len();
        if line.trim().is_empty() {
            if let Some(s) = start.take() {
                paragraphs.push(Paragraph {
                    byte_start: s,
                    text: &text[s..end],
                });
            }
            continue;
        }
        if start.is_none() {
            start = Some(offset + line.len() - line.trim_start().len());
        }
        end = offset + line.trim_end().len();
    }
    if let Some(s) = start {
        paragraphs.push(Paragraph {
            byte_start: s,
            text: &text[s..end],
        });
    }
    paragraphs
}

/// The last [`WINDOW_PARAGRAPHS`] paragraphs of `text` above `fraction` of
/// its characters, joined by blank lines. Empty when nothing precedes the cut.
pub fn anchor_window(text: &str, fraction: f64) -> String {
    let char_count = text.chars().count();
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let cut = ((fraction.clamp(0.0, 1.0) * char_count as f64).floor() as usize).min(char_count);
    let byte_cut = text.char_indices().nth(cut).map_or(text.len(), |(i, _)| i);

    let paragraphs = split_paragraphs(&text[..byte_cut]);
    let from = paragraphs.len().saturating_sub(WINDOW_PARAGRAPHS);
    join_paragraphs(&paragraphs[from..])
}

fn join_paragraphs(paragraphs: &[Paragraph<'_>]) -> String {
    paragraphs
        .iter()
        .map(|p| p.text)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Unit-cost edit distance over characters.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            let deletion = prev[j + 1] + 1;
            let insertion = curr[j] + 1;
            curr[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// `1 - distance / max(len)`, in `0.0..=1.0`. Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let ratio = levenshtein(a, b) as f64 / longest as f64;
    1.0 - ratio
}

/// Best-scoring window over `paragraphs`, scanning from the top.
///
/// Ties keep the earliest window. A target with fewer paragraphs than the
/// window size is compared as a single window.
pub fn best_window(anchor: &str, paragraphs: &[Paragraph<'_>]) -> Option<(usize, f64)> {
    if paragraphs.is_empty() {
        return None;
    }
    let size = WINDOW_PARAGRAPHS.min(paragraphs.len());
    let mut best: Option<(usize, f64)> = None;
    for (index, window) in paragraphs.windows(size).enumerate() {
        let score = similarity(anchor, &join_paragraphs(window));
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((index, score));
        }
    }
    best
}

/// Scroll offset in `target` that shows the text `source` shows at
/// `source_offset`. Always within `0.0..=target.scroll_height`.
pub fn find_matching_position(
    source: &PaneContent<'_>,
    target: &PaneContent<'_>,
    source_offset: f64,
) -> f64 {
    match_position(source, target, source_offset).offset
}

/// Like [`find_matching_position`], also reporting how the offset was found.
pub fn match_position(
    source: &PaneContent<'_>,
    target: &PaneContent<'_>,
    source_offset: f64,
) -> MatchResult {
    if source.text.trim().is_empty() || target.text.trim().is_empty() {
        return MatchResult {
            offset: 0.0,
            alignment: Alignment::Empty,
        };
    }

    let target_height = target.height();
    let fraction = source.fraction_at(source_offset);
    let proportional = MatchResult {
        offset: (fraction * target_height).clamp(0.0, target_height),
        alignment: Alignment::Proportional,
    };

    let anchor = anchor_window(source.text, fraction);
    if anchor.is_empty() {
        return proportional;
    }

    let paragraphs = split_paragraphs(target.text);
    let Some((window, score)) = best_window(&anchor, &paragraphs) else {
        return proportional;
    };
    trace!(window, score, fraction, "best anchor window");
    if score < MIN_CONFIDENCE {
        return proportional;
    }

    let chars_before = target.text[..paragraphs[window].byte_start].chars().count();
    let total_chars = target.text.chars().count();
    #[allow(clippy::cast_precision_loss)]
    let offset = chars_before as f64 / total_chars as f64 * target_height;
    MatchResult {
        offset: offset.clamp(0.0, target_height),
        alignment: Alignment::Matched { window, score },
    }
}

//! Normalizes the loosely formatted text returned by the model into a typed
//! render tree.
//!
//! Each input line becomes exactly one [`RenderNode`]. Within a line, paired
//! `**` markers become [`Span::Emphasis`]; any `*` or `•` left over after
//! pairing and list-marker detection is dropped, so no span ever carries a raw
//! marker. List markers are also recognised inside leading emphasis, which
//! keeps formatting stable over its own [`render_plain`] output.
//!
//! ```
//! use finchat::core::formatter::{format_response, RenderNode, Span};
//!
//! let nodes = format_response("**Risk:** High\n* Diversify\n1. Review allocations");
//! assert_eq!(
//!     nodes,
//!     vec![
//!         RenderNode::Paragraph {
//!             spans: vec![Span::emphasis("Risk:"), Span::plain(" High")],
//!         },
//!         RenderNode::BulletItem {
//!             spans: vec![Span::plain("Diversify")],
//!         },
//!         RenderNode::NumberedItem {
//!             ordinal: 1,
//!             spans: vec![Span::plain("Review allocations")],
//!         },
//!     ]
//! );
//! ```

use serde::Serialize;

const EMPHASIS_MARKER: &str = "**";
const STRAY_MARKER: char = '*';
const BULLET_GLYPH: char = '•';

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Span {
    PlainText { text: String },
    Emphasis { text: String },
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Span::PlainText { text: text.into() }
    }

    pub fn emphasis(text: impl Into<String>) -> Self {
        Span::Emphasis { text: text.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            Span::PlainText { text } | Span::Emphasis { text } => text,
        }
    }

    pub fn is_emphasis(&self) -> bool {
        matches!(self, Span::Emphasis { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderNode {
    Paragraph { spans: Vec<Span> },
    BulletItem { spans: Vec<Span> },
    NumberedItem { ordinal: u32, spans: Vec<Span> },
}

impl RenderNode {
    pub fn spans(&self) -> &[Span] {
        match self {
            RenderNode::Paragraph { spans }
            | RenderNode::BulletItem { spans }
            | RenderNode::NumberedItem { spans, .. } => spans,
        }
    }

    /// A paragraph with no spans marks a blank line in the original reply.
    pub fn is_blank(&self) -> bool {
        matches!(self, RenderNode::Paragraph { spans } if spans.is_empty())
    }

    /// Concatenated span text without any markup.
    pub fn plain_text(&self) -> String {
        self.spans().iter().map(Span::text).collect()
    }
}

/// Converts a raw model reply into render nodes, one per line.
///
/// Leading and trailing blank lines are dropped; blank lines between content
/// lines are kept as empty paragraphs.
pub fn format_response(raw: &str) -> Vec<RenderNode> {
    let lines: Vec<&str> = raw.lines().collect();
    let Some(first) = lines.iter().position(|line| !is_blank_line(line)) else {
        return Vec::new();
    };
    let last = lines
        .iter()
        .rposition(|line| !is_blank_line(line))
        .unwrap_or(first);

    lines[first..=last]
        .iter()
        .map(|line| format_line(line))
        .collect()
}

/// Renders nodes back into plain text, one line per node. Bullets use `- `,
/// numbered items keep their ordinal and emphasis markers are not emitted.
pub fn render_plain(nodes: &[RenderNode]) -> String {
    nodes
        .iter()
        .map(|node| match node {
            RenderNode::Paragraph { .. } => node.plain_text(),
            RenderNode::BulletItem { .. } => format!("- {}", node.plain_text()),
            RenderNode::NumberedItem { ordinal, .. } => {
                format!("{ordinal}. {}", node.plain_text())
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_blank_line(line: &str) -> bool {
    line.trim().is_empty()
}

fn format_line(line: &str) -> RenderNode {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return RenderNode::Paragraph { spans: Vec::new() };
    }

    if let Some(rest) = strip_bullet_marker(trimmed) {
        return RenderNode::BulletItem {
            spans: inline_spans(rest),
        };
    }

    if let Some((ordinal, rest)) = split_ordinal(trimmed) {
        return RenderNode::NumberedItem {
            ordinal,
            spans: inline_spans(rest),
        };
    }

    if let Some(title) = strip_heading_marker(trimmed) {
        let text = strip_stray_markers(&title.replace(EMPHASIS_MARKER, ""));
        let spans = if text.trim().is_empty() {
            Vec::new()
        } else {
            vec![Span::emphasis(text.trim())]
        };
        return classify_spans(spans);
    }

    classify_spans(inline_spans(trimmed))
}

/// Classifies a line from its paired spans, so a list marker wrapped in
/// emphasis (`**1. Ethereum**`) still yields a list item and keeps the
/// emphasis on the remaining text.
fn classify_spans(mut spans: Vec<Span>) -> RenderNode {
    let text: String = spans.iter().map(Span::text).collect();
    let body = text.trim_start();

    if let Some(rest) = strip_bullet_marker(body) {
        drop_leading(&mut spans, text.len() - rest.len());
        return RenderNode::BulletItem { spans };
    }
    if let Some((ordinal, rest)) = split_ordinal(body) {
        drop_leading(&mut spans, text.len() - rest.len());
        return RenderNode::NumberedItem { ordinal, spans };
    }
    drop_leading(&mut spans, text.len() - body.len());
    RenderNode::Paragraph { spans }
}

/// Removes the first `count` bytes of text across `spans`. `count` always
/// falls on a char boundary of the concatenated text.
fn drop_leading(spans: &mut Vec<Span>, mut count: usize) {
    while count > 0 && !spans.is_empty() {
        let text = text_mut(&mut spans[0]);
        if text.len() <= count {
            count -= text.len();
            spans.remove(0);
        } else {
            text.drain(..count);
            count = 0;
        }
    }
}

fn text_mut(span: &mut Span) -> &mut String {
    match span {
        Span::PlainText { text } | Span::Emphasis { text } => text,
    }
}

/// Strips a leading list bullet. `**` never starts a bullet, so emphasised
/// openers such as `**Note:**` stay paragraphs.
fn strip_bullet_marker(line: &str) -> Option<&str> {
    if line.starts_with(EMPHASIS_MARKER) {
        return None;
    }

    for marker in ["- ", "+ ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return Some(rest.trim_start());
        }
    }

    // Marker glued to the text, e.g. `*Diversify` or `•Rebalance`.
    for marker in ['*', '•'] {
        if let Some(rest) = line.strip_prefix(marker) {
            if !rest.is_empty() {
                return Some(rest.trim_start());
            }
        }
    }

    None
}

/// Splits `12. text` into `(12, "text")`. The dot must be followed by
/// whitespace or end the line so that `1.5% yield` stays a paragraph.
fn split_ordinal(line: &str) -> Option<(u32, &str)> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let ordinal = line[..digits].parse().ok()?;
    Some((ordinal, rest.trim_start()))
}

fn strip_heading_marker(line: &str) -> Option<&str> {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim())
}

/// Splits a line into plain and emphasis spans. Pairing runs left to right and
/// is non-greedy: each opener closes at the nearest following `**`.
fn inline_spans(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find(EMPHASIS_MARKER) {
        let after_open = &rest[open + EMPHASIS_MARKER.len()..];
        let Some(close) = after_open.find(EMPHASIS_MARKER) else {
            break;
        };
        push_span(&mut spans, Span::plain(&rest[..open]));
        push_span(&mut spans, Span::emphasis(&after_open[..close]));
        rest = &after_open[close + EMPHASIS_MARKER.len()..];
    }
    push_span(&mut spans, Span::plain(rest));

    spans
}

/// Appends a span after stripping stray markers, dropping spans that end up
/// empty and merging neighbouring plain text.
fn push_span(spans: &mut Vec<Span>, span: Span) {
    let cleaned = strip_stray_markers(span.text());
    if cleaned.is_empty() {
        return;
    }
    // Emphasis made of whitespace only carries no emphasis worth showing.
    let span = match span {
        Span::Emphasis { .. } if cleaned.trim().is_empty() => Span::plain(cleaned),
        Span::Emphasis { .. } => Span::emphasis(cleaned),
        Span::PlainText { .. } => Span::plain(cleaned),
    };

    if let (Some(Span::PlainText { text: last }), Span::PlainText { text }) =
        (spans.last_mut(), &span)
    {
        last.push_str(text);
        return;
    }
    spans.push(span);
}

fn strip_stray_markers(text: &str) -> String {
    text.chars()
        .filter(|c| *c != STRAY_MARKER && *c != BULLET_GLYPH)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(spans: Vec<Span>) -> RenderNode {
        RenderNode::Paragraph { spans }
    }

    fn bullet(text: &str) -> RenderNode {
        RenderNode::BulletItem {
            spans: vec![Span::plain(text)],
        }
    }

    fn assert_no_markers(nodes: &[RenderNode]) {
        for node in nodes {
            for span in node.spans() {
                assert!(
                    !span.text().contains(['*', '•']),
                    "marker leaked into span {span:?}"
                );
            }
        }
    }

    #[test]
    fn formats_mixed_reply() {
        let nodes =
            format_response("**Risk:** High\n* Diversify\n* Rebalance\n1. Review allocations");
        assert_eq!(
            nodes,
            vec![
                paragraph(vec![Span::emphasis("Risk:"), Span::plain(" High")]),
                bullet("Diversify"),
                bullet("Rebalance"),
                RenderNode::NumberedItem {
                    ordinal: 1,
                    spans: vec![Span::plain("Review allocations")],
                },
            ]
        );
    }

    #[test]
    fn blank_lines_between_content_are_kept() {
        let nodes = format_response("\n\nFirst\n\n\nSecond\n\n");
        assert_eq!(nodes.len(), 5);
        assert_eq!(nodes[0].plain_text(), "First");
        assert!(nodes[1].is_blank());
        assert!(nodes[2].is_blank());
        assert_eq!(nodes[4].plain_text(), "Second");
    }

    #[test]
    fn degenerate_input_yields_empty_or_stripped_output() {
        assert!(format_response("").is_empty());
        assert!(format_response("   \n\t\n").is_empty());

        let nodes = format_response("****");
        assert_eq!(nodes, vec![paragraph(Vec::new())]);

        let nodes = format_response("***");
        assert_no_markers(&nodes);
        assert!(nodes.iter().all(|node| node.plain_text().is_empty()));
    }

    #[test]
    fn unpaired_markers_are_stripped() {
        let nodes = format_response("Returns were **strong this quarter");
        assert_eq!(
            nodes,
            vec![paragraph(vec![Span::plain("Returns were strong this quarter")])]
        );
    }

    #[test]
    fn pairing_is_non_greedy_left_to_right() {
        let nodes = format_response("**a** and **b** then **c");
        assert_eq!(
            nodes,
            vec![paragraph(vec![
                Span::emphasis("a"),
                Span::plain(" and "),
                Span::emphasis("b"),
                Span::plain(" then c"),
            ])]
        );
    }

    #[test]
    fn triple_markers_do_not_leak() {
        let nodes = format_response("***Important*** note");
        assert_no_markers(&nodes);
        assert_eq!(nodes[0].plain_text(), "Important note");
        assert!(nodes[0].spans().iter().any(Span::is_emphasis));
    }

    #[test]
    fn bullet_variants_are_recognised() {
        for line in ["- Hold", "* Hold", "+ Hold", "• Hold", "*Hold", "•Hold", "   -   Hold"] {
            assert_eq!(format_response(line), vec![bullet("Hold")], "line {line:?}");
        }
    }

    #[test]
    fn dash_without_space_is_not_a_bullet() {
        let nodes = format_response("-5% this week");
        assert_eq!(nodes, vec![paragraph(vec![Span::plain("-5% this week")])]);
    }

    #[test]
    fn bullets_keep_inline_emphasis() {
        let nodes = format_response("* **Ethereum (ETH)** - $2,650");
        assert_eq!(
            nodes,
            vec![RenderNode::BulletItem {
                spans: vec![Span::emphasis("Ethereum (ETH)"), Span::plain(" - $2,650")],
            }]
        );
    }

    #[test]
    fn numbered_items_require_separator() {
        assert_eq!(
            format_response("12. Rebalance"),
            vec![RenderNode::NumberedItem {
                ordinal: 12,
                spans: vec![Span::plain("Rebalance")],
            }]
        );
        assert_eq!(
            format_response("1.5% yield"),
            vec![paragraph(vec![Span::plain("1.5% yield")])]
        );
        assert_eq!(
            format_response("99999999999. Too large"),
            vec![paragraph(vec![Span::plain("99999999999. Too large")])]
        );
    }

    #[test]
    fn headings_become_emphasised_paragraphs() {
        assert_eq!(
            format_response("## **Market Outlook**"),
            vec![paragraph(vec![Span::emphasis("Market Outlook")])]
        );
        assert_eq!(
            format_response("#hashtag"),
            vec![paragraph(vec![Span::plain("#hashtag")])]
        );
    }

    #[test]
    fn whitespace_only_emphasis_is_plain() {
        let nodes = format_response("a** **b");
        assert_eq!(nodes, vec![paragraph(vec![Span::plain("a b")])]);
    }

    #[test]
    fn plain_rendering_round_trips_structure() {
        let raw = "📊 **Portfolio Performance:**\n- Total Value: $45,280\n\n💡 **Recommendations:**\n1. Consider rebalancing\n2. Add *more* traditional assets\n*Take profits\n**1. Ethereum (ETH)** - $2,650\n## 1. Overview\n**- Hold** cash\n**2**. Split ordinal\nStocks • Bonds";
        let first = format_response(raw);
        let second = format_response(&render_plain(&first));

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(std::mem::discriminant(a), std::mem::discriminant(b));
            assert_eq!(a.plain_text(), b.plain_text());
        }
        assert_no_markers(&first);
        assert_no_markers(&second);
    }

    #[test]
    fn emphasised_ordinal_becomes_numbered_item() {
        assert_eq!(
            format_response("**1. Ethereum (ETH)** - $2,650"),
            vec![RenderNode::NumberedItem {
                ordinal: 1,
                spans: vec![Span::emphasis("Ethereum (ETH)"), Span::plain(" - $2,650")],
            }]
        );
        assert_eq!(
            format_response("**1.** Bitcoin"),
            vec![RenderNode::NumberedItem {
                ordinal: 1,
                spans: vec![Span::plain("Bitcoin")],
            }]
        );
    }

    #[test]
    fn emphasised_bullet_marker_becomes_bullet_item() {
        assert_eq!(
            format_response("**- Hold** cash"),
            vec![RenderNode::BulletItem {
                spans: vec![Span::emphasis("Hold"), Span::plain(" cash")],
            }]
        );
    }

    #[test]
    fn heading_with_ordinal_becomes_numbered_item() {
        assert_eq!(
            format_response("## 1. Overview"),
            vec![RenderNode::NumberedItem {
                ordinal: 1,
                spans: vec![Span::emphasis("Overview")],
            }]
        );
    }

    #[test]
    fn stray_bullet_glyphs_are_stripped() {
        let nodes = format_response("Stocks • Bonds");
        assert_eq!(nodes, vec![paragraph(vec![Span::plain("Stocks  Bonds")])]);
        assert_no_markers(&nodes);
    }
}

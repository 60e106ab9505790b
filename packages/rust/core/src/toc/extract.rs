//! Heading extraction.
//!
//! A restricted pattern matcher for `<h2>`–`<h5>` tags only; full HTML parsing
//! is deliberately out of scope here. Everything downstream consumes
//! [`RawHeading`], so this module can be replaced by a real parser without
//! touching anchor assignment, outline rendering, or rewriting.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Lowest heading level that takes part in the outline.
pub const MIN_LEVEL: u8 = 2;
/// Highest heading level that takes part in the outline.
pub const MAX_LEVEL: u8 = 5;

/// A heading tag matched in the source content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHeading<'a> {
    /// Tag level in `MIN_LEVEL..=MAX_LEVEL`.
    pub level: u8,
    /// Byte range of the whole element, opening tag through closing tag.
    pub span: Range<usize>,
    /// Byte range of the opening tag alone.
    pub open_tag: Range<usize>,
    /// Markup between the opening and closing tags.
    pub inner: &'a str,
    /// Non-blank `id` attribute already present on the opening tag, with
    /// character references decoded.
    pub existing_id: Option<String>,
    /// Byte range of the opening tag's first `id` attribute, including the
    /// whitespace before it. Set even when the value is blank.
    pub id_attr: Option<Range<usize>>,
    /// Plain-text label (tags stripped, entities decoded).
    pub text: String,
}

static OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Attribute values may be quoted and contain `>`.
    Regex::new(r#"(?i)<h([2-5])(\s(?:"[^"]*"|'[^']*'|[^'">])*)?>"#).expect("valid regex")
});

static CLOSE_RES: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [2, 3, 4, 5].map(|level| Regex::new(&format!(r"(?i)</h{level}\s*>")).expect("valid regex"))
});

static ANY_HEADING_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<h[1-6][\s>/]").expect("valid regex"));

/// One attribute token: a name with an optional value, or a stray quoted
/// string or separator. Matches tile the attribute text, so a later match
/// never starts inside an earlier quoted value.
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\s*(?:([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?|"[^"]*"|'[^']*'|[/=])"#,
    )
    .expect("valid regex")
});

/// Extract every well-formed `<h2>`–`<h5>` element in document order.
///
/// The first closing tag of the same level ends a heading. Unterminated
/// headings and headings whose body contains another heading tag are skipped
/// (the scan resumes just after the rejected opening tag, so an inner heading
/// can still match). Never fails. Runs in a single forward pass.
pub fn extract_headings(content: &str) -> Vec<RawHeading<'_>> {
    let mut headings = Vec::new();
    let mut closes = CLOSE_RES.each_ref().map(ForwardFind::new);
    let mut nested = ForwardFind::new(&ANY_HEADING_OPEN_RE);
    let mut pos = 0;

    while let Some(caps) = OPEN_RE.captures_at(content, pos) {
        let Some(open) = caps.get(0) else {
            break;
        };
        pos = open.end();

        let level = caps
            .get(1)
            .and_then(|m| m.as_str().parse::<u8>().ok())
            .unwrap_or(MIN_LEVEL);

        let Some(close) = closes[level_index(level)].next(content, open.end()) else {
            continue;
        };
        if nested
            .next(content, open.end())
            .is_some_and(|m| m.start < close.start)
        {
            continue;
        }

        let (existing_id, id_attr) = match caps.get(2) {
            Some(attrs) => match find_id_attr(attrs.as_str()) {
                Some((range, value)) => {
                    let shifted = attrs.start() + range.start..attrs.start() + range.end;
                    let id = (!value.trim().is_empty()).then(|| ctdocs_markup::decode_attr(value));
                    (id, Some(shifted))
                }
                None => (None, None),
            },
            None => (None, None),
        };

        let inner = &content[open.end()..close.start];
        headings.push(RawHeading {
            level,
            span: open.start()..close.end,
            open_tag: open.range(),
            inner,
            existing_id,
            id_attr,
            text: ctdocs_markup::strip_tags(inner),
        });
        pos = close.end;
    }

    headings
}

/// Memoized search for the first match at or after a cursor that only moves
/// forward. Each byte of the haystack is scanned at most once per pattern.
struct ForwardFind<'r> {
    re: &'r Regex,
    hit: Option<Range<usize>>,
    exhausted: bool,
}

impl<'r> ForwardFind<'r> {
    fn new(re: &'r Regex) -> Self {
        Self {
            re,
            hit: None,
            exhausted: false,
        }
    }

    fn next(&mut self, haystack: &str, from: usize) -> Option<Range<usize>> {
        if self.exhausted {
            return None;
        }
        if let Some(hit) = self.hit.as_ref().filter(|hit| hit.start >= from) {
            return Some(hit.clone());
        }
        match self.re.find_at(haystack, from) {
            Some(m) => {
                self.hit = Some(m.range());
                self.hit.clone()
            }
            None => {
                self.exhausted = true;
                None
            }
        }
    }
}

fn level_index(level: u8) -> usize {
    usize::from(level.clamp(MIN_LEVEL, MAX_LEVEL) - MIN_LEVEL)
}

/// The first `id` attribute in an opening tag's attribute text: its byte range
/// (leading whitespace included) and its raw value. A bare `id` has an empty
/// value.
fn find_id_attr(attrs: &str) -> Option<(Range<usize>, &str)> {
    ATTR_RE.captures_iter(attrs).find_map(|caps| {
        let name = caps.get(1)?;
        if !name.as_str().eq_ignore_ascii_case("id") {
            return None;
        }
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map_or("", |m| m.as_str());
        caps.get(0).map(|whole| (whole.range(), value))
    })
}

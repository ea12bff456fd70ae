//! Markup stripping: raw markup in, visible text lines out.
//!
//! Parsing is delegated to an ordered list of [`ParserStrategy`] values. The
//! first strategy whose tree is not empty wins; later strategies are more
//! lenient fallbacks. `script` and `style` subtrees are detached from the
//! chosen tree before any text is read.
//!
//! Text nodes are concatenated in document order with nothing inserted
//! between them; lines come only from line breaks already in the text.

use ego_tree::NodeId;
use engine_logging::{engine_debug, engine_trace};
use scraper::node::Node;
use scraper::Html;
use serde::{Deserialize, Serialize};

/// Elements whose content is never visible text.
const REMOVED_ELEMENTS: [&str; 2] = ["script", "style"];

/// Elements the parser synthesizes around any input.
const SKELETON_ELEMENTS: [&str; 3] = ["html", "head", "body"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StripError {
    #[error("no markup parser configured")]
    NoParsers,
    /// A strategy could not build a tree at all, as opposed to building an
    /// empty one.
    #[error("{parser} parser failed: {reason}")]
    Failed {
        parser: &'static str,
        reason: String,
    },
}

/// One way of turning markup into a tree.
pub trait ParserStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn parse(&self, markup: &str) -> Result<Html, StripError>;
}

/// Full-document HTML5 parse.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentParser;

impl ParserStrategy for DocumentParser {
    fn name(&self) -> &'static str {
        "document"
    }

    fn parse(&self, markup: &str) -> Result<Html, StripError> {
        Ok(Html::parse_document(markup))
    }
}

/// Body-context fragment parse; accepts stray content a document parse
/// would drop, such as a page made only of table rows.
#[derive(Debug, Default, Clone, Copy)]
pub struct FragmentParser;

impl ParserStrategy for FragmentParser {
    fn name(&self) -> &'static str {
        "fragment"
    }

    fn parse(&self, markup: &str) -> Result<Html, StripError> {
        Ok(Html::parse_fragment(markup))
    }
}

/// Serializable name of a shipped strategy, for configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParserKind {
    Document,
    Fragment,
}

impl ParserKind {
    pub fn strategy(self) -> Box<dyn ParserStrategy> {
        match self {
            ParserKind::Document => Box::new(DocumentParser),
            ParserKind::Fragment => Box::new(FragmentParser),
        }
    }
}

pub struct MarkupStripper {
    strategies: Vec<Box<dyn ParserStrategy>>,
}

impl Default for MarkupStripper {
    fn default() -> Self {
        Self::from_kinds(&[ParserKind::Document, ParserKind::Fragment])
    }
}

impl std::fmt::Debug for MarkupStripper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.strategies.iter().map(|s| s.name()))
            .finish()
    }
}

impl MarkupStripper {
    pub fn new(strategies: Vec<Box<dyn ParserStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn from_kinds(kinds: &[ParserKind]) -> Self {
        Self::new(kinds.iter().map(|kind| kind.strategy()).collect())
    }

    /// Appends a fallback tried after every existing strategy.
    pub fn with_fallback(mut self, strategy: Box<dyn ParserStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Visible text of `markup`, one entry per line.
    pub fn strip(&self, markup: &str) -> Result<Vec<String>, StripError> {
        let mut html = self.parse(markup)?;
        remove_invisible(&mut html);
        Ok(split_lines(&collect_text(&html)))
    }

    fn parse(&self, markup: &str) -> Result<Html, StripError> {
        let mut parsed = None;
        for strategy in &self.strategies {
            let html = strategy.parse(markup)?;
            let empty = is_empty_tree(&html);
            parsed = Some(html);
            if !empty {
                engine_trace!("{} parser produced a usable tree", strategy.name());
                break;
            }
            engine_debug!("{} parser produced an empty tree", strategy.name());
        }
        parsed.ok_or(StripError::NoParsers)
    }
}

fn is_empty_tree(html: &Html) -> bool {
    !html.tree.root().descendants().any(|node| match node.value() {
        Node::Text(text) => !text.trim().is_empty(),
        Node::Element(element) => !SKELETON_ELEMENTS.contains(&element.name()),
        _ => false,
    })
}

fn remove_invisible(html: &mut Html) {
    let doomed: Vec<NodeId> = html
        .tree
        .root()
        .descendants()
        .filter(|node| {
            matches!(node.value(), Node::Element(element)
                if REMOVED_ELEMENTS.contains(&element.name()))
        })
        .map(|node| node.id())
        .collect();

    for id in doomed {
        if let Some(mut node) = html.tree.get_mut(id) {
            node.detach();
        }
    }
}

fn collect_text(html: &Html) -> String {
    html.tree
        .root()
        .descendants()
        .filter_map(|node| match node.value() {
            Node::Text(text) => Some(&**text),
            _ => None,
        })
        .collect()
}

/// Splits on every line boundary character, not only `\n` and `\r\n`.
///
/// A `\r\n` pair yields an extra empty line; callers discard empty lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split(|c: char| {
        matches!(
            c,
            '\n' | '\r' | '\x0b' | '\x0c' | '\x1c'..='\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
        )
    })
    .map(str::to_string)
    .collect()
}

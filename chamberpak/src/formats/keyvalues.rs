//! KeyValues property-tree format
//!
//! Package manifests and config files use Valve's textual KeyValues format:
//! a sequence of `"key" "value"` pairs and `"key" { ... }` blocks, with
//! `//` line comments and C-style escapes inside quoted strings. Keys are
//! matched case-insensitively everywhere.

use crate::error::{Error, Result};
use crate::utils::conv_bool;

/// An ordered sequence of KeyValues nodes.
///
/// The root of a parsed file is a `Tree`; every block value is one too.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tree {
    nodes: Vec<Node>,
}

/// A single `"key" "value"` pair or `"key" { ... }` block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    key: String,
    value: Value,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Value {
    Text(String),
    Block(Tree),
}

static EMPTY: Tree = Tree { nodes: Vec::new() };

impl Node {
    /// Create a `"key" "value"` pair.
    #[must_use]
    pub fn pair(key: impl Into<String>, value: impl Into<String>) -> Self {
        Node {
            key: key.into(),
            value: Value::Text(value.into()),
        }
    }

    /// Create a `"key" { ... }` block.
    #[must_use]
    pub fn block(key: impl Into<String>, children: Tree) -> Self {
        Node {
            key: key.into(),
            value: Value::Block(children),
        }
    }

    /// The node's key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The text value, if this is a pair.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.value {
            Value::Text(t) => Some(t),
            Value::Block(_) => None,
        }
    }

    /// The child tree, if this is a block.
    #[must_use]
    pub fn children(&self) -> Option<&Tree> {
        match &self.value {
            Value::Text(_) => None,
            Value::Block(tree) => Some(tree),
        }
    }

    /// Whether this node is a block.
    #[must_use]
    pub fn has_children(&self) -> bool {
        matches!(self.value, Value::Block(_))
    }

    fn matches(&self, key: &str) -> bool {
        self.key.eq_ignore_ascii_case(key)
    }
}

impl Tree {
    /// An empty tree.
    #[must_use]
    pub fn new() -> Self {
        Tree::default()
    }

    /// A reference to the shared empty tree.
    #[must_use]
    pub fn empty() -> &'static Tree {
        &EMPTY
    }

    /// The nodes in document order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Whether the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a node.
    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Look up a required text value (first match wins).
    pub fn get(&self, key: &str) -> Result<&str> {
        self.nodes
            .iter()
            .find_map(|n| if n.matches(key) { n.text() } else { None })
            .ok_or_else(|| Error::MissingKey {
                key: key.to_string(),
            })
    }

    /// Look up a text value, falling back to a default.
    #[must_use]
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Look up an optional text value.
    #[must_use]
    pub fn get_opt(&self, key: &str) -> Option<&str> {
        self.get(key).ok()
    }

    /// Look up a boolean value, falling back to a default.
    #[must_use]
    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Ok(value) => conv_bool(value, default),
            Err(_) => default,
        }
    }

    /// The first node with the given key, pair or block.
    #[must_use]
    pub fn find_key(&self, key: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.matches(key))
    }

    /// The children of the first block with the given key, or the empty
    /// tree when no such block exists.
    #[must_use]
    pub fn find_block(&self, key: &str) -> &Tree {
        self.nodes
            .iter()
            .find_map(|n| if n.matches(key) { n.children() } else { None })
            .unwrap_or(&EMPTY)
    }

    /// Every node with the given key, in document order.
    pub fn find_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Node> {
        self.nodes.iter().filter(move |n| n.matches(key))
    }

    /// Every `inner` block found inside every `outer` block.
    pub fn find_all_nested<'a>(
        &'a self,
        outer: &'a str,
        inner: &'a str,
    ) -> impl Iterator<Item = &'a Node> {
        self.find_all(outer)
            .filter_map(Node::children)
            .flat_map(move |tree| tree.find_all(inner))
    }

    /// Append every node of `other` after our own.
    pub fn extend(&mut self, other: Tree) {
        self.nodes.extend(other.nodes);
    }

    /// Fold duplicate blocks with any of the given names into a single
    /// block each, concatenating their children. The merged block keeps the
    /// position of the first occurrence; pairs with those keys are left
    /// alone.
    pub fn merge_children(&mut self, names: &[&str]) {
        let mut merged: Vec<Node> = Vec::with_capacity(self.nodes.len());
        // Index into `merged` of the first block seen per name.
        let mut first_seen: Vec<(usize, usize)> = Vec::new();

        for node in self.nodes.drain(..) {
            let name_idx = names
                .iter()
                .position(|n| node.matches(n))
                .filter(|_| node.has_children());
            let Some(name_idx) = name_idx else {
                merged.push(node);
                continue;
            };
            match first_seen.iter().find(|(n, _)| *n == name_idx) {
                Some(&(_, at)) => {
                    if let (Value::Block(dest), Value::Block(src)) =
                        (&mut merged[at].value, node.value)
                    {
                        dest.nodes.extend(src.nodes);
                    }
                }
                None => {
                    first_seen.push((name_idx, merged.len()));
                    merged.push(node);
                }
            }
        }
        self.nodes = merged;
    }

    /// Parse KeyValues text. `source_label` names the file or archive entry
    /// for error messages.
    pub fn parse(text: &str, source_label: &str) -> Result<Tree> {
        let mut parser = Parser {
            tokens: tokenize(text, source_label)?.into_iter().peekable(),
            source_label,
        };
        let tree = parser.parse_block(0)?;
        match parser.tokens.next() {
            // A stray close brace survives block parsing only at depth 0.
            Some(token) => Err(syntax(source_label, token.line, "unexpected \"}\"")),
            None => Ok(tree),
        }
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

// ==================== Parser internals ====================

struct Token {
    line: usize,
    kind: TokenKind,
}

enum TokenKind {
    Text(String),
    Open,
    Close,
}

fn syntax(source_label: &str, line: usize, message: impl Into<String>) -> Error {
    Error::KeyValuesSyntax {
        source_label: source_label.to_string(),
        line,
        message: message.into(),
    }
}

fn tokenize(text: &str, source_label: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    let mut line = 1;

    while let Some(c) = chars.next() {
        match c {
            '\n' => line += 1,
            c if c.is_whitespace() => {}
            '/' if chars.peek() == Some(&'/') => {
                // Line comment
                for c in chars.by_ref() {
                    if c == '\n' {
                        line += 1;
                        break;
                    }
                }
            }
            '{' => tokens.push(Token {
                line,
                kind: TokenKind::Open,
            }),
            '}' => tokens.push(Token {
                line,
                kind: TokenKind::Close,
            }),
            '"' => {
                let start = line;
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some('n') => value.push('\n'),
                            Some('t') => value.push('\t'),
                            Some(esc) => value.push(esc),
                            None => {
                                return Err(syntax(source_label, start, "unterminated string"))
                            }
                        },
                        Some('\n') => {
                            line += 1;
                            value.push('\n');
                        }
                        Some(c) => value.push(c),
                        None => return Err(syntax(source_label, start, "unterminated string")),
                    }
                }
                tokens.push(Token {
                    line: start,
                    kind: TokenKind::Text(value),
                });
            }
            c => {
                // Bare token, terminated by whitespace, braces or a quote.
                let mut value = String::from(c);
                while let Some(&next) = chars.peek() {
                    if next.is_whitespace() || matches!(next, '{' | '}' | '"') {
                        break;
                    }
                    value.push(next);
                    chars.next();
                }
                tokens.push(Token {
                    line,
                    kind: TokenKind::Text(value),
                });
            }
        }
    }
    Ok(tokens)
}

struct Parser<'a, I: Iterator<Item = Token>> {
    tokens: std::iter::Peekable<I>,
    source_label: &'a str,
}

impl<I: Iterator<Item = Token>> Parser<'_, I> {
    fn parse_block(&mut self, depth: usize) -> Result<Tree> {
        let mut tree = Tree::new();
        loop {
            let Some(token) = self.tokens.peek() else {
                if depth > 0 {
                    return Err(syntax(self.source_label, 0, "unclosed block at end of file"));
                }
                return Ok(tree);
            };
            match &token.kind {
                TokenKind::Close => {
                    if depth > 0 {
                        self.tokens.next();
                    }
                    // At depth 0 the stray brace is left for the caller.
                    return Ok(tree);
                }
                TokenKind::Open => {
                    let line = token.line;
                    return Err(syntax(self.source_label, line, "block without a key"));
                }
                TokenKind::Text(_) => {
                    let Some(Token {
                        line,
                        kind: TokenKind::Text(key),
                    }) = self.tokens.next()
                    else {
                        unreachable!("peeked text token");
                    };
                    match self.tokens.peek() {
                        Some(Token {
                            kind: TokenKind::Open,
                            ..
                        }) => {
                            self.tokens.next();
                            let children = self.parse_block(depth + 1)?;
                            tree.push(Node::block(key, children));
                        }
                        Some(Token {
                            kind: TokenKind::Text(_),
                            ..
                        }) => {
                            let Some(Token {
                                kind: TokenKind::Text(value),
                                ..
                            }) = self.tokens.next()
                            else {
                                unreachable!("peeked text token");
                            };
                            tree.push(Node::pair(key, value));
                        }
                        _ => {
                            return Err(syntax(
                                self.source_label,
                                line,
                                format!("key \"{key}\" has no value"),
                            ))
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_pairs_and_blocks() {
        let tree = Tree::parse(
            r#"
            "ID" "CLEAN_PACK"
            "Name" "Clean Style" // trailing comment
            "Style"
            {
                "id" "CLEAN"
                "base" ""
            }
            "#,
            "test:info.txt",
        )
        .unwrap();

        assert_eq!(tree.get("id").unwrap(), "CLEAN_PACK");
        assert_eq!(tree.get_or("name", "?"), "Clean Style");
        let style = tree.find_block("style");
        assert_eq!(style.get("ID").unwrap(), "CLEAN");
        assert_eq!(style.get("base").unwrap(), "");
    }

    #[test]
    fn test_parse_bare_tokens_and_escapes() {
        let tree = Tree::parse(
            "key value\n\"quoted\" \"a \\\"b\\\"\\nc\"",
            "test",
        )
        .unwrap();
        assert_eq!(tree.get("key").unwrap(), "value");
        assert_eq!(tree.get("quoted").unwrap(), "a \"b\"\nc");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Tree::parse("\"key\"", "t"),
            Err(Error::KeyValuesSyntax { .. })
        ));
        assert!(matches!(
            Tree::parse("\"a\" { \"b\" \"c\"", "t"),
            Err(Error::KeyValuesSyntax { .. })
        ));
        assert!(matches!(
            Tree::parse("{ \"b\" \"c\" }", "t"),
            Err(Error::KeyValuesSyntax { .. })
        ));
        assert!(matches!(
            Tree::parse("\"a\" \"b\" }", "t"),
            Err(Error::KeyValuesSyntax { .. })
        ));
    }

    #[test]
    fn test_missing_key() {
        let tree = Tree::parse("\"a\" \"1\"", "t").unwrap();
        assert!(matches!(
            tree.get("missing"),
            Err(Error::MissingKey { key }) if key == "missing"
        ));
    }

    #[test]
    fn test_find_all_nested() {
        let tree = Tree::parse(
            r#"
            "Overrides"
            {
                "Style" { "id" "A" }
                "Item"  { "id" "B" }
            }
            "Overrides"
            {
                "Style" { "id" "C" }
            }
            "#,
            "t",
        )
        .unwrap();
        let ids: Vec<_> = tree
            .find_all_nested("overrides", "style")
            .map(|n| n.children().unwrap().get("id").unwrap())
            .collect();
        assert_eq!(ids, vec!["A", "C"]);
    }

    #[test]
    fn test_extend() {
        let mut a = Tree::parse("\"x\" \"1\"", "t").unwrap();
        let b = Tree::parse("\"y\" \"2\"", "t").unwrap();
        a.extend(b);
        assert_eq!(a.get("x").unwrap(), "1");
        assert_eq!(a.get("y").unwrap(), "2");
        assert_eq!(a.nodes().len(), 2);
    }

    #[test]
    fn test_merge_children() {
        let mut tree = Tree::parse(
            r#"
            "quotes_sp"   { "line" "one" }
            "other"       { "keep" "me" }
            "quotes_sp"   { "line" "two" }
            "quotes_coop" { "line" "three" }
            "#,
            "t",
        )
        .unwrap();
        tree.merge_children(&["quotes_sp", "quotes_coop"]);

        let sp_blocks: Vec<_> = tree.find_all("quotes_sp").collect();
        assert_eq!(sp_blocks.len(), 1);
        let lines: Vec<_> = sp_blocks[0]
            .children()
            .unwrap()
            .find_all("line")
            .map(|n| n.text().unwrap())
            .collect();
        assert_eq!(lines, vec!["one", "two"]);
        assert_eq!(tree.find_all("quotes_coop").count(), 1);
        assert_eq!(tree.find_block("other").get("keep").unwrap(), "me");
    }
}

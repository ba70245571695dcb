//! ADF tree builder (REST API v3)
//!
//! Nodes are allocated in an arena and linked by index while the event stream
//! is consumed; the owned [`Node`] tree is only assembled at the end. This lets
//! a list item be the "current item" of one list and the parent of a nested
//! list at the same time without aliasing mutable references.

use super::classify::{Classified, LineEvent};
use super::inline::{parse_inline, to_adf_nodes};
use crate::adf::{
    non_empty, CodeBlockAttrs, DocumentNode, HeadingAttrs, MediaAttrs, MediaKind, Node,
};

type NodeId = usize;

#[derive(Debug)]
struct Slot {
    node: Option<Node>,
    children: Vec<NodeId>,
}

/// Index-linked storage for nodes under construction
#[derive(Debug, Default)]
struct Arena {
    slots: Vec<Slot>,
}

impl Arena {
    fn alloc(&mut self, node: Node) -> NodeId {
        self.slots.push(Slot {
            node: Some(node),
            children: Vec::new(),
        });
        self.slots.len() - 1
    }

    fn append(&mut self, parent: NodeId, child: NodeId) {
        self.slots[parent].children.push(child);
    }

    fn has_children(&self, id: NodeId) -> bool {
        !self.slots[id].children.is_empty()
    }

    /// Move a node and its linked descendants out of the arena
    fn build(&mut self, id: NodeId) -> Option<Node> {
        let mut node = self.slots[id].node.take()?;
        let children = std::mem::take(&mut self.slots[id].children);
        let built: Vec<Node> = children
            .into_iter()
            .filter_map(|child| self.build(child))
            .collect();
        if let Some(content) = node.content_mut() {
            content.extend(built);
        }
        Some(node)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullet,
    Ordered,
}

impl ListKind {
    fn node(self) -> Node {
        match self {
            ListKind::Bullet => Node::BulletList {
                content: Vec::new(),
            },
            ListKind::Ordered => Node::OrderedList {
                content: Vec::new(),
            },
        }
    }
}

#[derive(Debug)]
struct OpenList {
    list: NodeId,
    kind: ListKind,
    last_item: Option<NodeId>,
}

#[derive(Debug)]
struct OpenCode {
    language: Option<String>,
    lines: Vec<String>,
}

#[derive(Debug, Default)]
struct TreeBuilder {
    arena: Arena,
    roots: Vec<NodeId>,
    list_stack: Vec<OpenList>,
    table: Option<NodeId>,
    blockquote: Option<NodeId>,
    code: Option<OpenCode>,
}

/// Build an ADF document from a classified event stream
pub fn build(events: &[Classified<'_>]) -> DocumentNode {
    let mut builder = TreeBuilder::default();
    for classified in events {
        builder.apply(&classified.event);
    }
    builder.finish()
}

impl TreeBuilder {
    fn apply(&mut self, event: &LineEvent<'_>) {
        match event {
            LineEvent::Blank => {}
            LineEvent::Paragraph { text } => {
                let node = Node::Paragraph {
                    content: inline(text),
                };
                self.push_root(node);
            }
            LineEvent::Heading { level, text } => {
                let node = Node::Heading {
                    attrs: HeadingAttrs { level: *level },
                    content: inline(text),
                };
                self.push_root(node);
            }
            LineEvent::Rule => self.push_root(Node::Rule),
            LineEvent::ListItem {
                depth,
                ordered,
                text,
                ..
            } => {
                let kind = if *ordered {
                    ListKind::Ordered
                } else {
                    ListKind::Bullet
                };
                self.list_item(*depth, kind, text);
            }
            LineEvent::ListEnd => self.list_stack.clear(),
            LineEvent::Image { alt, src, title } => {
                let media = Node::Media {
                    attrs: MediaAttrs {
                        kind: MediaKind::External,
                        url: src.to_string(),
                        alt: Some(alt.to_string()).filter(|a| !a.is_empty()),
                        title: (*title).map(str::to_string),
                    },
                };
                self.push_root(Node::MediaSingle {
                    content: vec![media],
                });
            }
            LineEvent::CodeStart { language } => {
                self.code = Some(OpenCode {
                    language: language.clone(),
                    lines: Vec::new(),
                });
            }
            LineEvent::CodeLine { text } => {
                if let Some(code) = self.code.as_mut() {
                    code.lines.push(text.to_string());
                }
            }
            LineEvent::CodeEnd => {
                if let Some(code) = self.code.take() {
                    let node = Node::CodeBlock {
                        attrs: code.language.map(|language| CodeBlockAttrs { language }),
                        content: vec![Node::text(code.lines.join("\n"))],
                    };
                    self.push_root(node);
                }
            }
            LineEvent::QuoteStart => {
                let quote = self.arena.alloc(Node::Blockquote {
                    content: Vec::new(),
                });
                self.roots.push(quote);
                self.blockquote = Some(quote);
            }
            LineEvent::QuoteLine { text } => {
                if let Some(quote) = self.blockquote {
                    if !text.trim().is_empty() {
                        let paragraph = self.arena.alloc(Node::Paragraph {
                            content: inline(text),
                        });
                        self.arena.append(quote, paragraph);
                    }
                }
            }
            LineEvent::QuoteEnd => {
                if let Some(quote) = self.blockquote.take() {
                    if !self.arena.has_children(quote) {
                        let empty = self.arena.alloc(Node::paragraph(Vec::new()));
                        self.arena.append(quote, empty);
                    }
                }
            }
            LineEvent::TableStart => {
                let table = self.arena.alloc(Node::Table {
                    content: Vec::new(),
                });
                self.roots.push(table);
                self.table = Some(table);
            }
            LineEvent::TableRow { cells, .. } => {
                if let Some(table) = self.table {
                    let row = Node::TableRow {
                        content: cells
                            .iter()
                            .map(|cell| Node::TableCell {
                                content: vec![Node::Paragraph {
                                    content: inline(cell),
                                }],
                            })
                            .collect(),
                    };
                    let row = self.arena.alloc(row);
                    self.arena.append(table, row);
                }
            }
            LineEvent::TableEnd => self.table = None,
        }
    }

    fn push_root(&mut self, node: Node) {
        let id = self.arena.alloc(node);
        self.roots.push(id);
    }

    /// Append a list item at `depth`, opening or closing lists as needed
    fn list_item(&mut self, depth: usize, kind: ListKind, text: &str) {
        let depth = depth.clamp(1, self.list_stack.len() + 1);

        self.list_stack.truncate(depth);
        if self.list_stack.len() == depth
            && self.list_stack.last().is_some_and(|open| open.kind != kind)
        {
            self.list_stack.pop();
        }

        if self.list_stack.len() < depth {
            let list = self.arena.alloc(kind.node());
            let parent = self
                .list_stack
                .last()
                .map(|open| open.last_item.unwrap_or(open.list));
            match parent {
                Some(parent) => self.arena.append(parent, list),
                None => self.roots.push(list),
            }
            self.list_stack.push(OpenList {
                list,
                kind,
                last_item: None,
            });
        }

        let item = self.arena.alloc(Node::ListItem {
            content: vec![Node::Paragraph {
                content: inline(text),
            }],
        });
        if let Some(open) = self.list_stack.last_mut() {
            self.arena.append(open.list, item);
            open.last_item = Some(item);
        }
    }

    fn finish(mut self) -> DocumentNode {
        // Close whatever an incomplete event stream left open.
        if self.code.is_some() {
            self.apply(&LineEvent::CodeEnd);
        }
        if self.blockquote.is_some() {
            self.apply(&LineEvent::QuoteEnd);
        }

        let roots = std::mem::take(&mut self.roots);
        let content = roots
            .into_iter()
            .filter_map(|id| self.arena.build(id))
            .collect();
        DocumentNode::new(content)
    }
}

/// Inline nodes for a line, never empty
fn inline(text: &str) -> Vec<Node> {
    non_empty(to_adf_nodes(&parse_inline(text)))
}

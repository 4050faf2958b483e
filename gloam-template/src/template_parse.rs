use crate::template_ast::{
    AttrKind, Component, Element, Node, Slot, TagName, Template, TemplateAttr, find_attr,
};
use crate::token::{Token, TokenKind, tokenize};

/// HTML elements that never have content or an end tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

pub const DEFAULT_HOIST: &[&str] = &["Style", "Script"];
pub const DEFAULT_IGNORE: &[&str] = &["InnerBlocks"];

/// Text emitted in place of a `<Children />` tag.
pub const CHILDREN_PLACEHOLDER: &str = "{{ children | safe }}";

/// Per-run settings for the tree builder.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    /// Components rendered as literal markup instead of `render_component` calls.
    pub ignore: Vec<String>,
    /// Components pulled out of the render tree into [`Template::hoisted`].
    pub hoist: Vec<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::with_extras(&[], &[])
    }
}

impl BuildOptions {
    /// Defaults plus the given extra names, without duplicates.
    pub fn with_extras(hoist: &[String], ignore: &[String]) -> Self {
        Self {
            hoist: merge(DEFAULT_HOIST, hoist),
            ignore: merge(DEFAULT_IGNORE, ignore),
        }
    }

    fn ignores(&self, name: &str) -> bool {
        self.ignore.iter().any(|n| n == name)
    }

    fn hoists(&self, name: &str) -> bool {
        self.hoist.iter().any(|n| n == name)
    }
}

fn merge(defaults: &[&str], extra: &[String]) -> Vec<String> {
    let mut out: Vec<String> = defaults.iter().map(|s| s.to_string()).collect();
    for name in extra {
        if !out.contains(name) {
            out.push(name.clone());
        }
    }
    out
}

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Tokenize and build in one step.
pub fn parse_template_to_ast(input: &str, options: &BuildOptions) -> Template {
    build(tokenize(input), options)
}

/// Build the node tree for one file.
///
/// End tags close the innermost open tag whatever their name; a mismatch is
/// only reported as a warning, so malformed markup yields a differently
/// nested tree rather than an error.
pub fn build(tokens: Vec<Token>, options: &BuildOptions) -> Template {
    let arena = Arena::from_tokens(tokens);
    let mut resolver = Resolver {
        arena: &arena,
        options,
        hoisted: Vec::new(),
    };
    let roots = resolver.convert(&arena.records[ROOT].children);
    Template {
        roots,
        hoisted: resolver.hoisted,
    }
}

const ROOT: usize = 0;

struct Record {
    token: Option<Token>,
    children: Vec<usize>,
}

/// Pass 1: token records addressed by index. Index 0 is a virtual root.
struct Arena {
    records: Vec<Record>,
}

impl Arena {
    fn from_tokens(tokens: Vec<Token>) -> Self {
        let mut arena = Arena {
            records: vec![Record {
                token: None,
                children: Vec::new(),
            }],
        };
        let mut stack = vec![ROOT];

        for token in tokens {
            let parent = *stack.last().unwrap_or(&ROOT);
            match token.kind {
                TokenKind::EndTag => {
                    if is_void_element(token.name()) {
                        continue;
                    }
                    if stack.len() > 1 {
                        let open = stack.pop().unwrap_or(ROOT);
                        let open_name = arena.name_of(open);
                        if open_name != token.name() {
                            tracing::warn!(
                                open = open_name,
                                close = token.name(),
                                "end tag does not match the open tag; closing it anyway"
                            );
                        }
                    } else {
                        tracing::warn!(close = token.name(), "end tag without an open tag ignored");
                    }
                }
                kind if kind.is_open()
                    && !(kind == TokenKind::OpenElement && is_void_element(token.name())) =>
                {
                    let id = arena.push(parent, token);
                    stack.push(id);
                }
                _ => {
                    arena.push(parent, token);
                }
            }
        }

        if stack.len() > 1 {
            tracing::warn!(unclosed = stack.len() - 1, "template ends with unclosed tags");
        }
        arena
    }

    fn push(&mut self, parent: usize, token: Token) -> usize {
        let id = self.records.len();
        self.records.push(Record {
            token: Some(token),
            children: Vec::new(),
        });
        self.records[parent].children.push(id);
        id
    }

    fn name_of(&self, id: usize) -> &str {
        self.records[id].token.as_ref().map(Token::name).unwrap_or_default()
    }
}

/// Pass 2: typed nodes with dynamic names, ignore-list downgrade, slot
/// extraction and hoisting applied.
struct Resolver<'a> {
    arena: &'a Arena,
    options: &'a BuildOptions,
    hoisted: Vec<Component>,
}

impl<'a> Resolver<'a> {
    fn convert(&mut self, ids: &[usize]) -> Vec<Node> {
        let arena = self.arena;
        let mut pieces = Vec::with_capacity(ids.len());
        for &id in ids {
            let Some(token) = arena.records[id].token.as_ref() else {
                continue;
            };
            match token.kind {
                TokenKind::Text => pieces.push(Node::Text(token.raw.clone())),
                TokenKind::HtmlComment => pieces.push(Node::HtmlComment(token.raw.clone())),
                TokenKind::EngineComment => pieces.push(Node::EngineComment(token.raw.clone())),
                TokenKind::EndTag => {}
                _ => {
                    if let Some(node) = self.convert_tag(id, token) {
                        pieces.push(node);
                    }
                }
            }
        }
        pieces
    }

    fn convert_tag(&mut self, id: usize, token: &'a Token) -> Option<Node> {
        let arena = self.arena;
        let children = &arena.records[id].children;
        let mut name = token.name().to_string();
        let mut attrs = token.attrs.clone();
        let mut dynamic: Option<String> = None;
        let mut as_element = matches!(
            token.kind,
            TokenKind::OpenElement | TokenKind::SelfClosingElement
        );

        if token.kind.is_component() && name == "Children" {
            return Some(Node::Text(CHILDREN_PLACEHOLDER.to_string()));
        }

        if token.kind.is_component() && (name == "Component" || name == "Element") {
            match take_is(&mut attrs) {
                Some(target) => {
                    as_element = name == "Element";
                    match target.kind {
                        AttrKind::Bind => dynamic = Some(target.value_or("").to_string()),
                        _ => name = target.value_or("").to_string(),
                    }
                }
                None => tracing::warn!(tag = %name, "missing `is` attribute; kept as a component"),
            }
        }

        let mut downgraded_self_closing = false;
        if !as_element
            && token.kind.is_component()
            && dynamic.is_none()
            && self.options.ignores(&name)
        {
            as_element = true;
            downgraded_self_closing = token.kind.is_self_closing();
        }

        let tag_name = match dynamic {
            Some(expr) => TagName::Dynamic(expr),
            None => TagName::Static(name),
        };

        if as_element {
            let self_closing = downgraded_self_closing
                || tag_name.as_static().is_some_and(is_void_element);
            let children = if self_closing {
                if !children.is_empty() {
                    tracing::warn!(tag = ?tag_name, "children of a self-closing element dropped");
                }
                Vec::new()
            } else {
                self.convert(children)
            };
            return Some(Node::Element(Element {
                name: tag_name,
                self_closing,
                attrs,
                children,
            }));
        }

        let (slots, ordinary) = self.split_slots(children);
        let component = Component {
            name: tag_name,
            self_closing: token.kind.is_self_closing(),
            attrs,
            children: self.convert(&ordinary),
            slots,
        };

        match component.name.as_static() {
            Some(static_name) if self.options.hoists(static_name) => {
                tracing::debug!(component = static_name, "hoisted");
                self.hoisted.push(component);
                None
            }
            _ => Some(Node::Component(component)),
        }
    }

    /// Separate direct `Slot` children from ordinary ones.
    fn split_slots(&mut self, children: &[usize]) -> (Vec<Slot>, Vec<usize>) {
        let arena = self.arena;
        let mut slots: Vec<Slot> = Vec::new();
        let mut ordinary = Vec::new();

        for &child in children {
            let Some(token) = arena.records[child].token.as_ref() else {
                continue;
            };
            if !token.kind.is_slot() {
                ordinary.push(child);
                continue;
            }

            let declared = find_attr(&token.attrs, AttrKind::Static, "name").and_then(TemplateAttr::literal);
            let name = match declared {
                Some(name) => name.to_string(),
                None => {
                    tracing::warn!("slot without a `name` attribute treated as `default`");
                    "default".to_string()
                }
            };
            let slot = Slot {
                children: self.convert(&arena.records[child].children),
                name,
            };
            match slots.iter_mut().find(|s| s.name == slot.name) {
                Some(existing) => *existing = slot,
                None => slots.push(slot),
            }
        }
        (slots, ordinary)
    }
}

/// Remove `is` / `:is` and return it, preferring the dynamic form.
fn take_is(attrs: &mut Vec<TemplateAttr>) -> Option<TemplateAttr> {
    let pos = attrs
        .iter()
        .position(|a| a.kind == AttrKind::Bind && a.name == "is")
        .or_else(|| {
            attrs
                .iter()
                .position(|a| a.kind == AttrKind::Static && a.name == "is")
        })?;
    let found = attrs.remove(pos);
    attrs.retain(|a| !(a.name == "is" && a.kind != AttrKind::Directive));
    Some(found)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    Static,    // class="app"
    Bind,      // :value="count"
    Directive, // @if="show"
}

/// Attribute value as written in the source.
///
/// `Empty` marks an attribute written without `=`. It is its own variant, so no
/// literal text can ever be mistaken for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Literal(String),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateAttr {
    /// Name without its `:` / `@` prefix.
    pub name: String,
    pub value: AttrValue,
    pub kind: AttrKind,
}

impl TemplateAttr {
    /// Build an attribute from its source name, deriving the kind from the prefix.
    pub fn parse(raw_name: &str, value: AttrValue) -> Self {
        let (kind, name) = if let Some(rest) = raw_name.strip_prefix(':') {
            (AttrKind::Bind, rest)
        } else if let Some(rest) = raw_name.strip_prefix('@') {
            (AttrKind::Directive, rest)
        } else {
            (AttrKind::Static, raw_name)
        };
        Self {
            name: name.to_string(),
            value,
            kind,
        }
    }

    pub fn bind(name: impl Into<String>, expr: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: AttrValue::Literal(expr.into()),
            kind: AttrKind::Bind,
        }
    }

    pub fn literal(&self) -> Option<&str> {
        match &self.value {
            AttrValue::Literal(v) => Some(v),
            AttrValue::Empty => None,
        }
    }

    /// The written value, or `default` when the attribute is bare.
    pub fn value_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.literal().unwrap_or(default)
    }

    pub fn is_directive(&self) -> bool {
        self.kind == AttrKind::Directive
    }
}

pub fn find_attr<'a>(
    attrs: &'a [TemplateAttr],
    kind: AttrKind,
    name: &str,
) -> Option<&'a TemplateAttr> {
    attrs.iter().find(|a| a.kind == kind && a.name == name)
}

/// Either a literal tag name or an engine expression producing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagName {
    Static(String),
    Dynamic(String),
}

impl TagName {
    pub fn as_static(&self) -> Option<&str> {
        match self {
            TagName::Static(name) => Some(name),
            TagName::Dynamic(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: TagName,
    pub self_closing: bool,
    pub attrs: Vec<TemplateAttr>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub name: String,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub name: TagName,
    /// Written as `<Name />`; never renders children or slots.
    pub self_closing: bool,
    pub attrs: Vec<TemplateAttr>,
    pub children: Vec<Node>,
    /// Slots in the order they were first declared.
    pub slots: Vec<Slot>,
}

impl Component {
    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    HtmlComment(String),
    EngineComment(String), // {# ... #}
    Element(Element),
    Component(Component),
}

/// Result of building one file: the render tree plus the components pulled
/// out of it by hoisting.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Template {
    pub roots: Vec<Node>,
    pub hoisted: Vec<Component>,
}

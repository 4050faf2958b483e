use std::fmt;

use crate::template_ast::{AttrKind, Component, Element, TemplateAttr, find_attr};

/// Priority every built-in directive runs at.
pub const DEFAULT_PRIORITY: i32 = 10;

/// Points in a node's rendering where directives may inject markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Before the node's opening markup.
    Before,
    /// Inside the opening tag, after the plain attributes.
    Tag,
    /// At the start of the node's content.
    Content,
    /// After the node's closing markup. Runs in reverse registry order.
    After,
    /// After `After`, for non-self-closing nodes.
    Cleanup,
}

/// The node a directive is consulted for.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Element(&'a Element),
    Component(&'a Component),
}

impl<'a> Target<'a> {
    pub fn attrs(&self) -> &'a [TemplateAttr] {
        match self {
            Target::Element(el) => &el.attrs,
            Target::Component(c) => &c.attrs,
        }
    }

    pub fn is_component(&self) -> bool {
        matches!(self, Target::Component(_))
    }

    /// The `@name` attribute, if present.
    pub fn directive(&self, name: &str) -> Option<&'a TemplateAttr> {
        let name = name.strip_prefix('@').unwrap_or(name);
        find_attr(self.attrs(), AttrKind::Directive, name)
    }

    pub fn bound(&self, name: &str) -> Option<&'a TemplateAttr> {
        find_attr(self.attrs(), AttrKind::Bind, name)
    }

    pub fn static_attr(&self, name: &str) -> Option<&'a TemplateAttr> {
        find_attr(self.attrs(), AttrKind::Static, name)
    }
}

/// What a directive sees when it is consulted for one node.
#[derive(Debug, Clone, Copy)]
pub struct DirectiveCx<'a> {
    /// Name the directive is registered under.
    pub name: &'a str,
    pub target: Target<'a>,
    /// The node's `@name` attribute.
    pub attr: Option<&'a TemplateAttr>,
}

impl<'a> DirectiveCx<'a> {
    pub fn new(name: &'a str, target: Target<'a>) -> Self {
        Self {
            name,
            target,
            attr: target.directive(name),
        }
    }

    /// The directive's expression; `default` when written bare or absent.
    pub fn expr_or(&self, default: &'a str) -> &'a str {
        self.attr.map_or(default, |a| a.value_or(default)).trim()
    }
}

/// A phase-based code-injection behavior triggered by an `@name` attribute.
///
/// Every hook is optional; `None` means the directive has nothing to add in
/// that phase.
pub trait Directive: Send + Sync {
    fn priority(&self) -> i32 {
        DEFAULT_PRIORITY
    }

    fn should_run(&self, cx: &DirectiveCx<'_>) -> bool {
        cx.attr.is_some()
    }

    fn before(&self, _cx: &DirectiveCx<'_>) -> Option<String> {
        None
    }

    fn tag(&self, _cx: &DirectiveCx<'_>) -> Option<String> {
        None
    }

    fn content(&self, _cx: &DirectiveCx<'_>) -> Option<String> {
        None
    }

    fn after(&self, _cx: &DirectiveCx<'_>) -> Option<String> {
        None
    }

    fn cleanup(&self, _cx: &DirectiveCx<'_>) -> Option<String> {
        None
    }

    /// Dynamic props to pass to a component, which cannot carry markup.
    fn component_props(&self, _cx: &DirectiveCx<'_>) -> Vec<TemplateAttr> {
        Vec::new()
    }

    fn hook(&self, phase: Phase, cx: &DirectiveCx<'_>) -> Option<String> {
        match phase {
            Phase::Before => self.before(cx),
            Phase::Tag => self.tag(cx),
            Phase::Content => self.content(cx),
            Phase::After => self.after(cx),
            Phase::Cleanup => self.cleanup(cx),
        }
    }
}

struct Entry {
    name: String,
    directive: Box<dyn Directive>,
}

/// Named directives in run order: ascending priority, then registration order.
///
/// Built once per compile run and only read afterwards.
#[derive(Default)]
pub struct Directives {
    entries: Vec<Entry>,
}

impl fmt::Debug for Directives {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| &e.name))
            .finish()
    }
}

impl Directives {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in directive.
    pub fn builtin() -> Self {
        let mut directives = Self::new();
        directives
            .register("if", IfDirective)
            .register("unless", UnlessDirective)
            .register("attributes", AttributesDirective)
            .register("for", ForDirective)
            .register("html", HtmlDirective)
            .register("text", TextDirective)
            .register("checked", BooleanAttrDirective::new("checked"))
            .register("disabled", BooleanAttrDirective::new("disabled"))
            .register("selected", SelectedDirective)
            .register("attr", ConditionalAttrDirective);
        directives
    }

    /// Register `directive` under `name`. Re-registering a name replaces the
    /// implementation but keeps its place in the run order.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        directive: impl Directive + 'static,
    ) -> &mut Self {
        let name = name.into();
        let name = name.strip_prefix('@').map(str::to_string).unwrap_or(name);
        let directive: Box<dyn Directive> = Box::new(directive);
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.directive = directive,
            None => self.entries.push(Entry { name, directive }),
        }
        // Stable: equal priorities keep registration order.
        self.entries.sort_by_key(|e| e.directive.priority());
        self
    }

    pub fn is_registered(&self, name: &str) -> bool {
        let name = name.strip_prefix('@').unwrap_or(name);
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn all(&self) -> impl DoubleEndedIterator<Item = (&str, &dyn Directive)> {
        self.entries
            .iter()
            .map(|e| (e.name.as_str(), e.directive.as_ref()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Concatenated output of every applicable directive for `phase`.
    pub fn process(&self, phase: Phase, target: Target<'_>) -> String {
        if self.is_empty() {
            return String::new();
        }
        let run = |(name, directive): (&str, &dyn Directive)| {
            let cx = DirectiveCx::new(name, target);
            if directive.should_run(&cx) {
                directive.hook(phase, &cx)
            } else {
                None
            }
        };
        if phase == Phase::After {
            self.all().rev().filter_map(run).collect()
        } else {
            self.all().filter_map(run).collect()
        }
    }

    /// Props contributed by applicable directives to a component.
    pub fn component_props(&self, component: &Component) -> Vec<TemplateAttr> {
        let target = Target::Component(component);
        self.all()
            .flat_map(|(name, directive)| {
                let cx = DirectiveCx::new(name, target);
                if directive.should_run(&cx) {
                    directive.component_props(&cx)
                } else {
                    Vec::new()
                }
            })
            .collect()
    }
}

/// `@if="cond"`
pub struct IfDirective;

impl Directive for IfDirective {
    fn before(&self, cx: &DirectiveCx<'_>) -> Option<String> {
        Some(format!("{{% if {} %}}", cx.expr_or("true")))
    }

    fn after(&self, _cx: &DirectiveCx<'_>) -> Option<String> {
        Some("{% endif %}".to_string())
    }
}

/// `@unless="cond"`
pub struct UnlessDirective;

impl Directive for UnlessDirective {
    fn before(&self, cx: &DirectiveCx<'_>) -> Option<String> {
        Some(format!("{{% if not ({}) %}}", cx.expr_or("false")))
    }

    fn after(&self, _cx: &DirectiveCx<'_>) -> Option<String> {
        Some("{% endif %}".to_string())
    }
}

/// `@for="item in items"`
pub struct ForDirective;

impl Directive for ForDirective {
    fn before(&self, cx: &DirectiveCx<'_>) -> Option<String> {
        let Some(expr) = cx.attr.and_then(TemplateAttr::literal) else {
            tracing::warn!("`@for` without a loop expression ignored");
            return None;
        };
        Some(format!("{{% for {} %}}", expr.trim()))
    }

    fn after(&self, cx: &DirectiveCx<'_>) -> Option<String> {
        cx.attr
            .and_then(TemplateAttr::literal)
            .map(|_| "{% endfor %}".to_string())
    }
}

/// `@attributes="map"` spreads a mapping of attributes onto the node.
pub struct AttributesDirective;

impl Directive for AttributesDirective {
    fn tag(&self, cx: &DirectiveCx<'_>) -> Option<String> {
        if cx.target.is_component() {
            return None;
        }
        Some(format!(" {{{{ html_attributes({}) }}}}", cx.expr_or("attributes")))
    }

    fn component_props(&self, cx: &DirectiveCx<'_>) -> Vec<TemplateAttr> {
        vec![TemplateAttr::bind("attributes", cx.expr_or("attributes"))]
    }
}

/// `@html="value"` renders the value unescaped as the node's content.
pub struct HtmlDirective;

impl Directive for HtmlDirective {
    fn content(&self, cx: &DirectiveCx<'_>) -> Option<String> {
        let expr = cx.attr.and_then(TemplateAttr::literal)?;
        Some(format!("{{{{ {} | safe }}}}", expr.trim()))
    }
}

/// `@text="value"` renders the value escaped as the node's content.
pub struct TextDirective;

impl Directive for TextDirective {
    fn content(&self, cx: &DirectiveCx<'_>) -> Option<String> {
        let expr = cx.attr.and_then(TemplateAttr::literal)?;
        Some(format!("{{{{ {} }}}}", expr.trim()))
    }
}

/// `@checked` / `@disabled`: a bare HTML attribute present when the condition holds.
pub struct BooleanAttrDirective {
    attribute: &'static str,
}

impl BooleanAttrDirective {
    pub fn new(attribute: &'static str) -> Self {
        Self { attribute }
    }
}

impl Directive for BooleanAttrDirective {
    fn tag(&self, cx: &DirectiveCx<'_>) -> Option<String> {
        if cx.target.is_component() {
            return None;
        }
        Some(conditional_bare_attr(cx.expr_or("true"), self.attribute))
    }

    fn component_props(&self, cx: &DirectiveCx<'_>) -> Vec<TemplateAttr> {
        vec![TemplateAttr::bind(self.attribute, cx.expr_or("true"))]
    }
}

/// `@selected="current"`: selected when `current` equals the node's value.
pub struct SelectedDirective;

impl SelectedDirective {
    fn condition(cx: &DirectiveCx<'_>) -> String {
        let expr = cx.expr_or("true");
        let value = match (cx.target.bound("value"), cx.target.static_attr("value")) {
            (Some(bound), _) => Some(bound.value_or("value").trim().to_string()),
            (None, Some(literal)) => Some(quote_single(literal.value_or(""))),
            (None, None) => None,
        };
        match value {
            Some(value) => format!("{expr} == {value}"),
            None => expr.to_string(),
        }
    }
}

impl Directive for SelectedDirective {
    fn tag(&self, cx: &DirectiveCx<'_>) -> Option<String> {
        if cx.target.is_component() {
            return None;
        }
        Some(conditional_bare_attr(&Self::condition(cx), "selected"))
    }

    fn component_props(&self, cx: &DirectiveCx<'_>) -> Vec<TemplateAttr> {
        vec![TemplateAttr::bind("selected", Self::condition(cx))]
    }
}

/// `@attr="condition, name, value"`: one attribute, present only when the
/// condition holds. Only one per node.
pub struct ConditionalAttrDirective;

impl ConditionalAttrDirective {
    fn parts<'a>(cx: &DirectiveCx<'a>) -> Option<(&'a str, &'a str, &'a str)> {
        let raw = cx.attr.and_then(TemplateAttr::literal)?;
        let mut parts = raw.splitn(3, ',').map(str::trim);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(condition), Some(name), Some(value)) if !name.is_empty() => {
                Some((condition, name, value))
            }
            _ => {
                tracing::warn!(value = raw, "`@attr` expects `condition, name, value`");
                None
            }
        }
    }
}

impl Directive for ConditionalAttrDirective {
    fn tag(&self, cx: &DirectiveCx<'_>) -> Option<String> {
        if cx.target.is_component() {
            return None;
        }
        let (condition, name, value) = Self::parts(cx)?;
        Some(format!(
            " {{% if {condition} %}}{name}=\"{{{{ {value} }}}}\"{{% endif %}}"
        ))
    }

    fn component_props(&self, cx: &DirectiveCx<'_>) -> Vec<TemplateAttr> {
        match Self::parts(cx) {
            Some((condition, name, value)) => vec![TemplateAttr::bind(
                name,
                format!("{value} if {condition} else none"),
            )],
            None => Vec::new(),
        }
    }
}

fn conditional_bare_attr(condition: &str, attribute: &str) -> String {
    format!(" {{% if {condition} %}}{attribute}{{% endif %}}")
}

fn quote_single(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

use std::fmt::Write as _;

use crate::directives::{Directives, Phase, Target};
use crate::template_ast::{AttrKind, AttrValue, Component, Element, Node, TagName, TemplateAttr};
use crate::template_parse::{BuildOptions, parse_template_to_ast};

/// Engine template text for one source file plus the components hoisted out
/// of it.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledTemplate {
    pub output: String,
    pub hoisted: Vec<Component>,
}

/// Public API: compile one template source into engine syntax.
pub fn compile_template(
    source: &str,
    options: &BuildOptions,
    directives: &Directives,
) -> CompiledTemplate {
    let template = parse_template_to_ast(source, options);
    CompiledTemplate {
        output: render(&template.roots, directives),
        hoisted: template.hoisted,
    }
}

/// Render sibling nodes in order.
pub fn render(nodes: &[Node], directives: &Directives) -> String {
    Emitter::new(directives).render(nodes)
}

pub fn emit_node(node: &Node, directives: &Directives) -> String {
    Emitter::new(directives).node(node)
}

/// Tree walk over one template. Numbers component instances so that nested
/// block assignments never share a variable.
struct Emitter<'d> {
    directives: &'d Directives,
    instances: usize,
}

impl<'d> Emitter<'d> {
    fn new(directives: &'d Directives) -> Self {
        Self {
            directives,
            instances: 0,
        }
    }

    fn render(&mut self, nodes: &[Node]) -> String {
        nodes.iter().map(|n| self.node(n)).collect()
    }

    fn node(&mut self, node: &Node) -> String {
        match node {
            Node::Text(t) | Node::HtmlComment(t) | Node::EngineComment(t) => t.clone(),
            Node::Element(el) => self.element(el),
            Node::Component(c) => self.component(c),
        }
    }

    fn element(&mut self, el: &Element) -> String {
        let directives = self.directives;
        let target = Target::Element(el);
        let tag = match &el.name {
            TagName::Static(name) => name.clone(),
            TagName::Dynamic(expr) => format!("{{{{ {} }}}}", expr.trim()),
        };

        let mut out = directives.process(Phase::Before, target);
        out.push('<');
        out.push_str(&tag);
        for attr in &el.attrs {
            if attr.is_directive() {
                check_registered(attr, directives);
                continue;
            }
            out.push(' ');
            out.push_str(&emit_attr(attr));
        }
        out.push_str(&directives.process(Phase::Tag, target));

        if el.self_closing {
            out.push_str(" />");
            out.push_str(&directives.process(Phase::After, target));
            return out;
        }

        out.push('>');
        out.push_str(&directives.process(Phase::Content, target));
        out.push_str(&self.render(&el.children));
        let _ = write!(out, "</{tag}>");
        out.push_str(&directives.process(Phase::After, target));
        out.push_str(&directives.process(Phase::Cleanup, target));
        out
    }

    fn component(&mut self, c: &Component) -> String {
        let directives = self.directives;
        let target = Target::Component(c);
        self.instances += 1;
        let var = format!("{}_{}", render_name(&c.name), self.instances);

        let mut out = directives.process(Phase::Before, target);
        out.push_str(&directives.process(Phase::Tag, target));

        let mut props: Vec<String> = Vec::new();
        let mut extras = directives.component_props(c);
        for attr in &c.attrs {
            if attr.is_directive() {
                check_registered(attr, directives);
                continue;
            }
            // Directive-contributed props win over a written attribute of the same name.
            if extras.iter().any(|p| p.name == attr.name) {
                continue;
            }
            props.push(emit_prop(attr));
        }
        props.extend(extras.drain(..).map(|p| emit_prop(&p)));

        if !c.self_closing {
            if !c.slots.is_empty() {
                let mut refs = Vec::with_capacity(c.slots.len());
                for slot in &c.slots {
                    let slot_var = format!("{var}_slot_{}", sanitize_ident(&slot.name));
                    let body = self.render(&slot.children);
                    let _ = write!(out, "{{% set {slot_var} %}}{body}{{% endset %}}");
                    refs.push(format!("{}: {slot_var}", string_lit(&slot.name)));
                }
                let _ = write!(out, "{{% set {var}_slots = {{ {} }} %}}", refs.join(", "));
                props.push(format!("\"slots\": {var}_slots"));
            }

            let mut children = directives.process(Phase::Content, target);
            children.push_str(&self.render(&c.children));
            if !children.is_empty() {
                let _ = write!(out, "{{% set {var}_children %}}{children}{{% endset %}}");
                props.push(format!("\"children\": {var}_children"));
            }
        }

        let name = match &c.name {
            TagName::Static(name) => string_lit(name),
            TagName::Dynamic(expr) => expr.trim().to_string(),
        };
        if props.is_empty() {
            let _ = write!(out, "{{{{ render_component({name}) }}}}");
        } else {
            let _ = write!(
                out,
                "{{{{ render_component({name}, {{ {} }}) }}}}",
                props.join(", ")
            );
        }

        out.push_str(&directives.process(Phase::After, target));
        out.push_str(&directives.process(Phase::Cleanup, target));
        out
    }
}

/// One element attribute as it appears inside the opening tag.
pub(crate) fn emit_attr(attr: &TemplateAttr) -> String {
    match (&attr.kind, &attr.value) {
        (AttrKind::Bind, _) => {
            let expr = attr.value_or(&attr.name).trim();
            format!(
                "{{% if ({expr}) is defined and ({expr}) is not none %}}{}=\"{{{{ {expr} }}}}\"{{% endif %}}",
                attr.name
            )
        }
        (_, AttrValue::Literal(v)) => format!("{}=\"{}\"", attr.name, v.replace('"', "&quot;")),
        (_, AttrValue::Empty) => attr.name.clone(),
    }
}

/// One `"key": value` entry of a component's props map.
pub(crate) fn emit_prop(attr: &TemplateAttr) -> String {
    let value = match (&attr.kind, &attr.value) {
        (AttrKind::Bind, _) => attr.value_or(&attr.name).trim().to_string(),
        (_, AttrValue::Literal(v)) => string_lit(v),
        (_, AttrValue::Empty) => "true".to_string(),
    };
    format!("{}: {value}", string_lit(&attr.name))
}

fn check_registered(attr: &TemplateAttr, directives: &Directives) {
    if !directives.is_registered(&attr.name) {
        tracing::warn!(directive = %attr.name, "unknown directive skipped");
    }
}

/// Identifier form of a component name. Block variables are this plus the
/// instance number.
pub fn render_name(name: &TagName) -> String {
    match name {
        TagName::Static(n) => sanitize_ident(n),
        TagName::Dynamic(expr) => sanitize_ident(expr.trim()),
    }
}

pub fn sanitize_ident(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Double-quoted engine string literal.
pub(crate) fn string_lit(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

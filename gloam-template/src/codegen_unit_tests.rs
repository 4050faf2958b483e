use crate::directives::Directives;
use crate::template_ast::{AttrValue, Component, Node, Slot, TagName, TemplateAttr};
use crate::template_codegen::{emit_attr, emit_node, emit_prop, render_name, string_lit};

#[test]
fn text_and_comments_are_verbatim() {
    let d = Directives::new();
    assert_eq!(emit_node(&Node::Text("hi {{ x }}".into()), &d), "hi {{ x }}");
    assert_eq!(emit_node(&Node::HtmlComment("<!-- a -->".into()), &d), "<!-- a -->");
    assert_eq!(emit_node(&Node::EngineComment("{# b #}".into()), &d), "{# b #}");
}

#[test]
fn attribute_varieties() {
    let static_attr = TemplateAttr::parse("title", AttrValue::Literal(r#"say "hi""#.into()));
    assert_eq!(emit_attr(&static_attr), r#"title="say &quot;hi&quot;""#);

    let bare = TemplateAttr::parse("hidden", AttrValue::Empty);
    assert_eq!(emit_attr(&bare), "hidden");

    let bound = TemplateAttr::parse(":href", AttrValue::Literal("url".into()));
    assert_eq!(
        emit_attr(&bound),
        r#"{% if (url) is defined and (url) is not none %}href="{{ url }}"{% endif %}"#
    );

    let shorthand = TemplateAttr::parse(":id", AttrValue::Empty);
    assert!(emit_attr(&shorthand).contains(r#"id="{{ id }}""#));
}

#[test]
fn prop_varieties() {
    let lit = TemplateAttr::parse("title", AttrValue::Literal("Hello".into()));
    assert_eq!(emit_prop(&lit), r#""title": "Hello""#);
    let flag = TemplateAttr::parse("open", AttrValue::Empty);
    assert_eq!(emit_prop(&flag), r#""open": true"#);
    let bound = TemplateAttr::parse(":items", AttrValue::Literal("list|first".into()));
    assert_eq!(emit_prop(&bound), r#""items": list|first"#);
}

#[test]
fn render_names_are_identifiers() {
    assert_eq!(render_name(&TagName::Static("Ui.Card".into())), "Ui_Card");
    assert_eq!(render_name(&TagName::Dynamic(" block.type ".into())), "block_type");
}

#[test]
fn string_literals_escape_quotes() {
    assert_eq!(string_lit(r#"a"b\c"#), r#""a\"b\\c""#);
}

#[test]
fn component_without_props_has_no_map() {
    let c = Component {
        name: TagName::Static("Divider".into()),
        self_closing: true,
        attrs: Vec::new(),
        children: Vec::new(),
        slots: Vec::new(),
    };
    let out = emit_node(&Node::Component(c), &Directives::new());
    assert_eq!(out, r#"{{ render_component("Divider") }}"#);
}

#[test]
fn empty_slot_still_declared() {
    let c = Component {
        name: TagName::Static("Card".into()),
        self_closing: false,
        attrs: Vec::new(),
        children: Vec::new(),
        slots: vec![Slot {
            name: "footer".into(),
            children: Vec::new(),
        }],
    };
    let out = emit_node(&Node::Component(c), &Directives::new());
    assert_eq!(
        out,
        concat!(
            r#"{% set Card_1_slot_footer %}{% endset %}"#,
            r#"{% set Card_1_slots = { "footer": Card_1_slot_footer } %}"#,
            r#"{{ render_component("Card", { "slots": Card_1_slots }) }}"#
        )
    );
}

#[test]
fn dynamic_component_name_is_raw_expression() {
    let c = Component {
        name: TagName::Dynamic("block.type".into()),
        self_closing: false,
        attrs: vec![TemplateAttr::parse("id", AttrValue::Literal("x".into()))],
        children: vec![Node::Text("body".into())],
        slots: Vec::new(),
    };
    let out = emit_node(&Node::Component(c), &Directives::builtin());
    assert_eq!(
        out,
        concat!(
            r#"{% set block_type_1_children %}body{% endset %}"#,
            r#"{{ render_component(block.type, { "id": "x", "children": block_type_1_children }) }}"#
        )
    );
}

#[test]
fn self_closing_component_drops_slots_and_children() {
    let c = Component {
        name: TagName::Static("Card".into()),
        self_closing: true,
        attrs: vec![TemplateAttr::parse("@html", AttrValue::Literal("body".into()))],
        children: vec![Node::Text("stray".into())],
        slots: vec![Slot {
            name: "footer".into(),
            children: Vec::new(),
        }],
    };
    let out = emit_node(&Node::Component(c), &Directives::builtin());
    assert_eq!(out, r#"{{ render_component("Card") }}"#);
}

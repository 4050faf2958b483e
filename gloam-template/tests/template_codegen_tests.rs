use gloam_template::{BuildOptions, Directives, compile_template};

fn compile(src: &str) -> String {
    compile_template(src, &BuildOptions::default(), &Directives::builtin()).output
}

#[test]
fn conditional_component_with_children() {
    assert_eq!(
        compile(r#"<Button @if="user.active">Click</Button>"#),
        concat!(
            "{% if user.active %}",
            "{% set Button_1_children %}Click{% endset %}",
            r#"{{ render_component("Button", { "children": Button_1_children }) }}"#,
            "{% endif %}"
        )
    );
}

#[test]
fn self_closing_input_with_bound_value_and_disabled() {
    assert_eq!(
        compile(r#"<input type="text" :value="model.name" @disabled="readonly" />"#),
        concat!(
            r#"<input type="text" "#,
            r#"{% if (model.name) is defined and (model.name) is not none %}value="{{ model.name }}"{% endif %}"#,
            " {% if readonly %}disabled{% endif %} />"
        )
    );
}

#[test]
fn slot_content_becomes_slots_prop() {
    assert_eq!(
        compile(r#"<Card title="Hi"><Slot name="footer">X</Slot>Body</Card>"#),
        concat!(
            "{% set Card_1_slot_footer %}X{% endset %}",
            r#"{% set Card_1_slots = { "footer": Card_1_slot_footer } %}"#,
            "{% set Card_1_children %}Body{% endset %}",
            r#"{{ render_component("Card", { "title": "Hi", "slots": Card_1_slots, "children": Card_1_children }) }}"#
        )
    );
}

#[test]
fn nested_components_render_bottom_up() {
    let out = compile(r#"<Layout><Card :title="page.title" /></Layout>"#);
    assert_eq!(
        out,
        concat!(
            "{% set Layout_1_children %}",
            r#"{{ render_component("Card", { "title": page.title }) }}"#,
            "{% endset %}",
            r#"{{ render_component("Layout", { "children": Layout_1_children }) }}"#
        )
    );
}

#[test]
fn dotted_component_names_are_sanitized_for_variables() {
    let out = compile("<Ui.Card>x</Ui.Card>");
    assert!(out.starts_with("{% set Ui_Card_1_children %}x{% endset %}"));
    assert!(out.contains(r#"render_component("Ui.Card", { "children": Ui_Card_1_children })"#));
}

#[test]
fn ignored_component_renders_as_markup() {
    assert_eq!(
        compile(r#"<div><InnerBlocks allowed="core/paragraph" /></div>"#),
        r#"<div><InnerBlocks allowed="core/paragraph" /></div>"#
    );
}

#[test]
fn dynamic_element_tag() {
    assert_eq!(
        compile(r#"<Element :is="tag" class="t">x</Element>"#),
        r#"<{{ tag }} class="t">x</{{ tag }}>"#
    );
}

#[test]
fn children_placeholder_inside_component_template() {
    assert_eq!(
        compile(r#"<div class="card"><Children /></div>"#),
        r#"<div class="card">{{ children | safe }}</div>"#
    );
}

#[test]
fn hoisted_nodes_are_not_in_output() {
    let compiled = compile_template(
        "<Script>init()</Script><p>x</p><Style>p{}</Style>",
        &BuildOptions::default(),
        &Directives::builtin(),
    );
    assert_eq!(compiled.output, "<p>x</p>");
    assert_eq!(compiled.hoisted.len(), 2);
}

#[test]
fn nested_hoisted_nodes_are_pulled_out_once() {
    let compiled = compile_template(
        concat!(
            "<div><Script>one()</Script></div>",
            "<Card><Style>.card{}</Style>",
            r#"<Slot name="foot"><Script>two()</Script></Slot></Card>"#,
        ),
        &BuildOptions::default(),
        &Directives::builtin(),
    );
    assert_eq!(compiled.hoisted.len(), 3);
    for needle in ["Script", "Style", "one()", "two()", ".card{}"] {
        assert!(
            !compiled.output.contains(needle),
            "{needle} leaked into {}",
            compiled.output
        );
    }
    assert_eq!(
        compiled.output,
        concat!(
            "<div></div>",
            "{% set Card_1_slot_foot %}{% endset %}",
            r#"{% set Card_1_slots = { "foot": Card_1_slot_foot } %}"#,
            r#"{{ render_component("Card", { "slots": Card_1_slots }) }}"#
        )
    );
}

#[test]
fn same_name_components_get_distinct_variables() {
    assert_eq!(
        compile("<Box>a<Box>b</Box></Box>"),
        concat!(
            "{% set Box_1_children %}a",
            "{% set Box_2_children %}b{% endset %}",
            r#"{{ render_component("Box", { "children": Box_2_children }) }}"#,
            "{% endset %}",
            r#"{{ render_component("Box", { "children": Box_1_children }) }}"#
        )
    );
}

#[test]
fn self_closing_component_with_content_directive() {
    assert_eq!(
        compile(r#"<Card @text="title" :id="key" />"#),
        r#"{{ render_component("Card", { "id": key }) }}"#
    );
}

#[test]
fn unknown_directive_is_dropped() {
    assert_eq!(compile(r#"<p @tooltip="x">a</p>"#), "<p>a</p>");
}

#[test]
fn text_and_comments_pass_through() {
    assert_eq!(
        compile("<!DOCTYPE html><p>{{ greeting }} world</p><!-- note -->"),
        "<!DOCTYPE html><p>{{ greeting }} world</p><!-- note -->"
    );
}

#[test]
fn self_closing_element_never_emits_children() {
    let out = compile("<img src=\"a.png\">stray");
    assert_eq!(out, r#"<img src="a.png" />stray"#);
}

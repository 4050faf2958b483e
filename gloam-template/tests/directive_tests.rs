use gloam_template::{
    BuildOptions, Directive, DirectiveCx, Directives, compile_template,
};
use rstest::rstest;

fn compile_with(src: &str, directives: &Directives) -> String {
    compile_template(src, &BuildOptions::default(), directives).output
}

#[rstest]
#[case::if_(r#"<p @if="a">x</p>"#, "{% if a %}<p>x</p>{% endif %}")]
#[case::unless(r#"<p @unless="a">x</p>"#, "{% if not (a) %}<p>x</p>{% endif %}")]
#[case::for_(
    r#"<li @for="item in items">{{ item }}</li>"#,
    "{% for item in items %}<li>{{ item }}</li>{% endfor %}"
)]
#[case::html(r#"<div @html="body"></div>"#, "<div>{{ body | safe }}</div>")]
#[case::text(r#"<span @text="name"></span>"#, "<span>{{ name }}</span>")]
#[case::attributes(
    r#"<div @attributes="extra"></div>"#,
    "<div {{ html_attributes(extra) }}></div>"
)]
#[case::attributes_bare(
    "<div @attributes></div>",
    "<div {{ html_attributes(attributes) }}></div>"
)]
#[case::checked(
    r#"<input type="checkbox" @checked="done">"#,
    r#"<input type="checkbox" {% if done %}checked{% endif %} />"#
)]
#[case::disabled_bare(
    "<button @disabled>x</button>",
    "<button {% if true %}disabled{% endif %}>x</button>"
)]
#[case::selected_literal(
    r#"<option value="a" @selected="current">A</option>"#,
    r#"<option value="a" {% if current == 'a' %}selected{% endif %}>A</option>"#
)]
#[case::selected_bound(
    r#"<option :value="v" @selected="current">A</option>"#,
    r#"<option {% if (v) is defined and (v) is not none %}value="{{ v }}"{% endif %} {% if current == v %}selected{% endif %}>A</option>"#
)]
#[case::selected_without_value(
    r#"<option @selected="picked">A</option>"#,
    "<option {% if picked %}selected{% endif %}>A</option>"
)]
#[case::attr(
    r#"<a @attr="external, target, '_blank'">x</a>"#,
    r#"<a {% if external %}target="{{ '_blank' }}"{% endif %}>x</a>"#
)]
#[case::attr_malformed(r#"<a @attr="external, target">x</a>"#, "<a>x</a>")]
fn builtin_on_elements(#[case] src: &str, #[case] expected: &str) {
    assert_eq!(compile_with(src, &Directives::builtin()), expected);
}

#[rstest]
#[case::checked(
    r#"<Toggle @checked="on" />"#,
    r#"{{ render_component("Toggle", { "checked": on }) }}"#
)]
#[case::replaces_written_prop(
    r#"<Toggle checked @checked="on" />"#,
    r#"{{ render_component("Toggle", { "checked": on }) }}"#
)]
#[case::attributes(
    "<Card @attributes />",
    r#"{{ render_component("Card", { "attributes": attributes }) }}"#
)]
#[case::attr(
    r#"<Card @attr="big, size, 'lg'" />"#,
    r#"{{ render_component("Card", { "size": 'lg' if big else none }) }}"#
)]
#[case::html(
    r#"<Card @html="body"></Card>"#,
    r#"{% set Card_1_children %}{{ body | safe }}{% endset %}{{ render_component("Card", { "children": Card_1_children }) }}"#
)]
#[case::html_on_self_closing(
    r#"<Card @html="body" />"#,
    r#"{{ render_component("Card") }}"#
)]
#[case::for_(
    r#"<Item @for="row in rows" :row="row" />"#,
    r#"{% for row in rows %}{{ render_component("Item", { "row": row }) }}{% endfor %}"#
)]
fn builtin_on_components(#[case] src: &str, #[case] expected: &str) {
    assert_eq!(compile_with(src, &Directives::builtin()), expected);
}

#[test]
fn if_wraps_for_when_registered_first() {
    assert_eq!(
        compile_with(
            r#"<li @for="x in xs" @if="xs">{{ x }}</li>"#,
            &Directives::builtin()
        ),
        "{% if xs %}{% for x in xs %}<li>{{ x }}</li>{% endfor %}{% endif %}"
    );
}

struct Marker(&'static str, i32);

impl Directive for Marker {
    fn priority(&self) -> i32 {
        self.1
    }

    fn before(&self, _cx: &DirectiveCx<'_>) -> Option<String> {
        Some(format!("[{}", self.0))
    }

    fn tag(&self, _cx: &DirectiveCx<'_>) -> Option<String> {
        Some(format!(" data-{}", self.0))
    }

    fn after(&self, _cx: &DirectiveCx<'_>) -> Option<String> {
        Some(format!("{}]", self.0))
    }

    fn cleanup(&self, _cx: &DirectiveCx<'_>) -> Option<String> {
        Some(format!("~{}", self.0))
    }
}

#[test]
fn registration_order_decides_nesting() {
    let mut directives = Directives::new();
    directives.register("a", Marker("a", 10)).register("b", Marker("b", 10));
    assert_eq!(
        compile_with("<p @a @b>x</p>", &directives),
        "[a[b<p data-a data-b>x</p>b]a]~a~b"
    );
}

#[test]
fn lower_priority_runs_first() {
    let mut directives = Directives::new();
    directives.register("a", Marker("a", 20)).register("b", Marker("b", 5));
    assert_eq!(
        compile_with("<p @a @b>x</p>", &directives),
        "[b[a<p data-b data-a>x</p>a]b]~b~a"
    );
}

#[test]
fn self_closing_skips_cleanup() {
    let mut directives = Directives::new();
    directives.register("a", Marker("a", 10));
    assert_eq!(compile_with("<br @a>", &directives), "[a<br data-a />a]");
}

#[test]
fn directives_only_run_when_present() {
    let mut directives = Directives::new();
    directives.register("a", Marker("a", 10));
    assert_eq!(compile_with("<p>x</p>", &directives), "<p>x</p>");
}

#[test]
fn reregistering_replaces_in_place() {
    let mut directives = Directives::new();
    directives
        .register("a", Marker("a", 10))
        .register("b", Marker("b", 10))
        .register("@a", Marker("z", 10));
    assert_eq!(directives.all().count(), 2);
    assert!(directives.is_registered("@a"));
    assert_eq!(
        compile_with("<p @a @b>x</p>", &directives),
        "[z[b<p data-z data-b>x</p>b]z]~z~b"
    );
}

#[test]
fn empty_registry_leaves_markup_alone() {
    let directives = Directives::new();
    assert!(directives.is_empty());
    assert_eq!(compile_with(r#"<p @if="a">x</p>"#, &directives), "<p>x</p>");
}

#[test]
fn builtin_registry_lists_every_directive() {
    let directives = Directives::builtin();
    let names: Vec<_> = directives.all().map(|(name, _)| name).collect();
    assert_eq!(
        names,
        vec![
            "if", "unless", "attributes", "for", "html", "text", "checked", "disabled",
            "selected", "attr"
        ]
    );
}

//! Functions compiled templates call besides `render_component`.

use minijinja::value::ValueKind;
use minijinja::{HtmlEscape, Value};

use crate::props::entries;

/// Spread a mapping into `name="value"` pairs. `false`, none and undefined
/// values are skipped, `true` gives a bare name and a string is passed
/// through untouched.
pub fn html_attributes(value: Value) -> Value {
    match value.kind() {
        ValueKind::String => Value::from_safe_string(value.as_str().unwrap_or_default().to_string()),
        ValueKind::Map => {
            let pairs: Vec<String> = entries(&value)
                .into_iter()
                .filter_map(|(name, v)| match v.kind() {
                    ValueKind::Undefined | ValueKind::None => None,
                    ValueKind::Bool if v.is_true() => Some(HtmlEscape(&name).to_string()),
                    ValueKind::Bool => None,
                    _ => Some(format!("{}=\"{}\"", HtmlEscape(&name), HtmlEscape(&v.to_string()))),
                })
                .collect();
            Value::from_safe_string(pairs.join(" "))
        }
        _ => Value::from_safe_string(String::new()),
    }
}

/// Join class names: map keys whose condition holds, or non-empty strings of
/// a sequence.
pub fn classnames(value: Value) -> String {
    let names: Vec<String> = match value.kind() {
        ValueKind::Map => entries(&value)
            .into_iter()
            .filter(|(_, cond)| match cond.kind() {
                ValueKind::Undefined | ValueKind::None => false,
                ValueKind::Bool => cond.is_true(),
                _ => true,
            })
            .map(|(name, _)| name)
            .collect(),
        ValueKind::Seq => value
            .try_iter()
            .map(|items| {
                items
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
        ValueKind::String => value
            .as_str()
            .filter(|s| !s.is_empty())
            .map(|s| vec![s.to_string()])
            .unwrap_or_default(),
        _ => Vec::new(),
    };
    names.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn attributes_from_map() {
        let attrs = context! { id => "main", hidden => true, open => false, title => Value::from(()) };
        assert_eq!(html_attributes(attrs).to_string(), r#"hidden id="main""#);
    }

    #[test]
    fn attribute_values_are_escaped() {
        let attrs = context! { title => "a \"b\" <c>" };
        assert_eq!(
            html_attributes(attrs).to_string(),
            r#"title="a &quot;b&quot; &lt;c&gt;""#
        );
        let attrs = context! { alt => "x=1&y='2'" };
        assert_eq!(
            html_attributes(attrs).to_string(),
            r#"alt="x=1&amp;y=&#x27;2&#x27;""#
        );
    }

    #[test]
    fn attribute_string_passes_through() {
        let out = html_attributes(Value::from(r#"data-x="1""#));
        assert!(out.is_safe());
        assert_eq!(out.to_string(), r#"data-x="1""#);
    }

    #[test]
    fn classnames_from_map_and_seq() {
        assert_eq!(
            classnames(context! { btn => true, active => false, wide => 1 }),
            "btn wide"
        );
        assert_eq!(
            classnames(Value::from(vec!["a", "", "b"])),
            "a b"
        );
    }
}

use pest::Parser;
use pest::iterators::Pair;

use crate::template_ast::{AttrValue, TemplateAttr};

#[derive(pest_derive::Parser)]
#[grammar = "attrs.pest"]
struct AttrParser;

/// Parse the raw attribute region of a tag (everything between the tag name
/// and the closing `>` / `/>`).
///
/// The grammar skips characters it cannot read as an attribute, so this never
/// fails; an empty list comes back for input without attributes.
pub fn parse_attrs(source: &str) -> Vec<TemplateAttr> {
    if source.trim().is_empty() {
        return Vec::new();
    }

    let Ok(mut pairs) = AttrParser::parse(Rule::attributes, source) else {
        tracing::warn!(source, "unreadable attribute list skipped");
        return Vec::new();
    };
    let Some(list) = pairs.next() else {
        return Vec::new();
    };

    list.into_inner()
        .filter(|p| p.as_rule() == Rule::attribute)
        .map(parse_attr)
        .collect()
}

fn parse_attr(attr: Pair<Rule>) -> TemplateAttr {
    // attribute = ident ( "=" value )?
    let mut name = "";
    let mut value = AttrValue::Empty;

    for part in attr.into_inner() {
        match part.as_rule() {
            Rule::ident => name = part.as_str(),
            Rule::double_quoted | Rule::single_quoted | Rule::braced => {
                value = AttrValue::Literal(strip_delimiters(part.as_str()))
            }
            Rule::bare => value = AttrValue::Literal(part.as_str().to_string()),
            _ => {}
        }
    }
    TemplateAttr::parse(name, value)
}

fn strip_delimiters(s: &str) -> String {
    let b = s.as_bytes();
    if b.len() >= 2
        && ((b[0] == b'"' && b[b.len() - 1] == b'"')
            || (b[0] == b'\'' && b[b.len() - 1] == b'\'')
            || (b[0] == b'{' && b[b.len() - 1] == b'}'))
    {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use minijinja::Value;
use minijinja::value::ValueKind;

/// Keys the compiler fills in itself; never validated and never part of `attributes`.
pub const RESERVED_PROPS: &[&str] = &["children", "slots"];

/// Custom check called with the prop value, its key and all props.
pub type Validator = Arc<dyn Fn(&Value, &str, &Value) -> bool + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub enum PropType {
    String,
    /// Any number, or a string holding one.
    Number,
    Array,
    Object,
    /// A bool, `1`/`0` or `"1"`/`"0"`.
    Bool,
    Int,
    Float,
    Enum(Vec<Value>),
}

impl fmt::Display for PropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropType::String => "string",
            PropType::Number => "number",
            PropType::Array => "array",
            PropType::Object => "object",
            PropType::Bool => "bool",
            PropType::Int => "int",
            PropType::Float => "float",
            PropType::Enum(_) => "enum",
        };
        f.write_str(name)
    }
}

impl PropType {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            PropType::String => value.kind() == ValueKind::String,
            PropType::Number => match value.kind() {
                ValueKind::Number => true,
                ValueKind::String => value
                    .as_str()
                    .is_some_and(|s| s.trim().parse::<f64>().is_ok()),
                _ => false,
            },
            PropType::Array => value.kind() == ValueKind::Seq,
            PropType::Object => value.kind() == ValueKind::Map,
            PropType::Bool => match value.kind() {
                ValueKind::Bool => true,
                ValueKind::Number => value.is_integer() && matches!(value.as_i64(), Some(0 | 1)),
                ValueKind::String => matches!(value.as_str(), Some("0" | "1")),
                _ => false,
            },
            PropType::Int => value.is_integer(),
            PropType::Float => value.kind() == ValueKind::Number && !value.is_integer(),
            PropType::Enum(values) => values.contains(value),
        }
    }
}

/// Constraints on a single prop.
#[derive(Clone, Default)]
pub struct PropRule {
    pub required: bool,
    pub default: Option<Value>,
    pub of_type: Option<PropType>,
    pub validator: Option<Validator>,
}

impl fmt::Debug for PropRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropRule")
            .field("required", &self.required)
            .field("default", &self.default)
            .field("of_type", &self.of_type)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

impl PropRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn of_type(mut self, of_type: PropType) -> Self {
        self.of_type = Some(of_type);
        self
    }

    pub fn validator(
        mut self,
        check: impl Fn(&Value, &str, &Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.validator = Some(Arc::new(check));
        self
    }
}

/// What went wrong with a prop.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Required,
    Validator,
    Type(PropType),
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Required => f.write_str("is required"),
            Constraint::Validator => f.write_str("failed validation"),
            Constraint::Type(PropType::Enum(values)) => {
                let values: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, "must be one of the following values: `{}`", values.join(", "))
            }
            Constraint::Type(of_type) => write!(f, "is not of type `{of_type}`"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Prop `{prop}` {constraint} in **{component}**.")]
pub struct InvalidPropError {
    pub component: String,
    pub prop: String,
    pub constraint: Constraint,
}

/// Declared props of one component, checked in declaration order.
#[derive(Debug, Clone, Default)]
pub struct PropSchema {
    rules: Vec<(String, PropRule)>,
}

impl PropSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prop(mut self, name: impl Into<String>, rule: PropRule) -> Self {
        let name = name.into();
        match self.rules.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = rule,
            None => self.rules.push((name, rule)),
        }
        self
    }

    fn declares(&self, key: &str) -> bool {
        self.rules.iter().any(|(n, _)| n == key)
    }

    /// Check `props` and build the component's render context: the validated
    /// schema props plus `attributes` (every undeclared prop), `children` and
    /// `slots`.
    pub fn validate(&self, component: &str, props: &Value) -> Result<Value, InvalidPropError> {
        let mut declared: BTreeMap<String, Value> = BTreeMap::new();
        let mut rest: BTreeMap<String, Value> = BTreeMap::new();
        for (key, value) in entries(props) {
            if RESERVED_PROPS.contains(&key.as_str()) {
                continue;
            }
            if self.declares(&key) {
                declared.insert(key, value);
            } else {
                rest.insert(key, value);
            }
        }

        let fail = |prop: &str, constraint: Constraint| InvalidPropError {
            component: component.to_string(),
            prop: prop.to_string(),
            constraint,
        };

        for (key, rule) in &self.rules {
            if !declared.contains_key(key) {
                match &rule.default {
                    Some(default) => {
                        declared.insert(key.clone(), default.clone());
                    }
                    None if rule.required => return Err(fail(key, Constraint::Required)),
                    None => continue,
                }
            }
            let Some(value) = declared.get(key) else {
                continue;
            };
            if let Some(check) = &rule.validator {
                if !check(value, key.as_str(), props) {
                    return Err(fail(key, Constraint::Validator));
                }
            }
            if let Some(of_type) = &rule.of_type {
                if !of_type.matches(value) {
                    return Err(fail(key, Constraint::Type(of_type.clone())));
                }
            }
        }

        let mut context = declared;
        context.insert("attributes".into(), Value::from_serialize(&rest));
        context.insert(
            "children".into(),
            reserved(props, "children").unwrap_or_else(|| Value::from("")),
        );
        context.insert(
            "slots".into(),
            reserved(props, "slots")
                .unwrap_or_else(|| Value::from_serialize(BTreeMap::<String, Value>::new())),
        );
        Ok(Value::from_serialize(&context))
    }
}

/// Key/value pairs of a map value; nothing for anything else.
pub(crate) fn entries(value: &Value) -> Vec<(String, Value)> {
    if value.kind() != ValueKind::Map {
        return Vec::new();
    }
    let Ok(keys) = value.try_iter() else {
        return Vec::new();
    };
    keys.filter_map(|key| {
        let item = value.get_item(&key).ok()?;
        Some((key.to_string(), item))
    })
    .collect()
}

fn reserved(props: &Value, key: &str) -> Option<Value> {
    props
        .get_attr(key)
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_none())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_accepts_numeric_flags() {
        assert!(PropType::Bool.matches(&Value::from(true)));
        assert!(PropType::Bool.matches(&Value::from(1)));
        assert!(PropType::Bool.matches(&Value::from("0")));
        assert!(!PropType::Bool.matches(&Value::from(2)));
        assert!(!PropType::Bool.matches(&Value::from("yes")));
    }

    #[test]
    fn number_accepts_numeric_strings() {
        assert!(PropType::Number.matches(&Value::from(1.5)));
        assert!(PropType::Number.matches(&Value::from("42")));
        assert!(!PropType::Number.matches(&Value::from("forty")));
    }

    #[test]
    fn int_and_float_are_distinct() {
        assert!(PropType::Int.matches(&Value::from(3)));
        assert!(!PropType::Int.matches(&Value::from(3.5)));
        assert!(PropType::Float.matches(&Value::from(3.5)));
        assert!(!PropType::Float.matches(&Value::from(3)));
    }

    #[test]
    fn enum_message_lists_values() {
        let err = InvalidPropError {
            component: "Button".into(),
            prop: "size".into(),
            constraint: Constraint::Type(PropType::Enum(vec![
                Value::from("sm"),
                Value::from("lg"),
            ])),
        };
        assert_eq!(
            err.to_string(),
            "Prop `size` must be one of the following values: `sm, lg` in **Button**."
        );
    }
}

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use gloam_template::component_template_name;
use minijinja::value::Value;
use minijinja::{AutoEscape, Environment, Error, ErrorKind, State, path_loader};
use serde::Serialize;

use crate::error::RenderError;
use crate::helpers::{classnames, html_attributes};
use crate::props::PropSchema;

type Schemas = Arc<HashMap<String, PropSchema>>;

/// Renders compiled templates.
///
/// Every template is HTML auto-escaped. Output of `render_component` and
/// `html_attributes` is marked safe.
pub struct Engine {
    root: PathBuf,
    schemas: Schemas,
    env: Environment<'static>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("root", &self.root)
            .field("schemas", &self.schemas.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Engine {
    /// Engine loading templates from the compiled output directory `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let schemas: Schemas = Arc::default();
        let env = environment(&root, schemas.clone());
        Self { root, schemas, env }
    }

    /// Validate props passed to `component` against `schema`.
    pub fn with_schema(mut self, component: impl Into<String>, schema: PropSchema) -> Self {
        let mut schemas = (*self.schemas).clone();
        schemas.insert(component.into(), schema);
        self.schemas = Arc::new(schemas);
        self.env = environment(&self.root, self.schemas.clone());
        self
    }

    pub fn render<S: Serialize>(&self, template: &str, context: S) -> Result<String, RenderError> {
        let tmpl = self.env.get_template(template)?;
        Ok(tmpl.render(context)?)
    }

    /// Render one component directly, as `render_component` would.
    pub fn render_component<S: Serialize>(&self, name: &str, props: S) -> Result<String, RenderError> {
        let props = Value::from_serialize(props);
        let context = match self.schemas.get(name) {
            Some(schema) => schema.validate(name, &props)?,
            None => props,
        };
        self.render(&component_template_name(name), context)
    }
}

fn environment(root: &Path, schemas: Schemas) -> Environment<'static> {
    let mut env = Environment::new();
    env.set_loader(path_loader(root.to_path_buf()));
    env.set_auto_escape_callback(|_name| AutoEscape::Html);

    env.add_function(
        "render_component",
        move |state: &State, name: String, props: Option<Value>| -> Result<Value, Error> {
            let props = props.unwrap_or_else(|| Value::from_serialize(HashMap::<String, Value>::new()));
            let context = match schemas.get(&name) {
                Some(schema) => schema.validate(&name, &props).map_err(|err| {
                    Error::new(ErrorKind::InvalidOperation, err.to_string()).with_source(err)
                })?,
                None => props,
            };
            tracing::debug!(component = %name, "rendering component");
            let tmpl = state.env().get_template(&component_template_name(&name))?;
            Ok(Value::from_safe_string(tmpl.render(context)?))
        },
    );
    env.add_function("html_attributes", html_attributes);
    env.add_function("classnames", classnames);
    env
}

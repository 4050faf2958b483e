use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{CompileError, Result};
use crate::token::{TokenKind, tokenize};

/// Loader name of a component's template: dots in the name become directories.
pub fn component_template_name(name: &str) -> String {
    format!("components/{}/template.twig", name.replace('.', "/"))
}

/// Where a component's template lives, relative to the template root.
pub fn component_template_path(name: &str) -> PathBuf {
    PathBuf::from(component_template_name(name))
}

/// Names of every component `template` uses, directly or through the
/// templates of the components it uses. First-seen order, no duplicates.
pub fn find_components(root: impl AsRef<Path>, template: impl AsRef<Path>) -> Result<Vec<String>> {
    let root = root.as_ref();
    let path = root.join(template);
    let mut found = Vec::new();
    let mut seen = HashSet::new();
    collect(root, &path, &mut found, &mut seen)?;
    Ok(found)
}

fn collect(
    root: &Path,
    path: &Path,
    found: &mut Vec<String>,
    seen: &mut HashSet<String>,
) -> Result<()> {
    let source = std::fs::read_to_string(path).map_err(|e| CompileError::io(path, e))?;
    for token in tokenize(&source) {
        if !matches!(
            token.kind,
            TokenKind::OpenComponent | TokenKind::SelfClosingComponent
        ) {
            continue;
        }
        let name = token.name();
        if !seen.insert(name.to_string()) {
            continue;
        }
        found.push(name.to_string());

        let nested = root.join(component_template_path(name));
        if nested.is_file() {
            tracing::debug!(component = name, "following component template");
            collect(root, &nested, found, seen)?;
        }
    }
    Ok(())
}

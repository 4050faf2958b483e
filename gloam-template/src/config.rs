use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CompileError, Result};
use crate::template_parse::BuildOptions;

pub const DEFAULT_EXTENSION: &str = "twig";

/// Settings for one compile run, usually read from `gloam.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Where hoisted scripts and styles go; the output directory when unset.
    pub assets: Option<PathBuf>,
    /// Extra component names to hoist, on top of `Style` and `Script`.
    pub hoist: Vec<String>,
    /// Extra component names to keep as literal markup, on top of `InnerBlocks`.
    pub ignore: Vec<String>,
    /// Template file extension, without the dot.
    pub extension: String,
    pub enabled: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from("views"),
            output: PathBuf::from("dist"),
            assets: None,
            hoist: Vec::new(),
            ignore: Vec::new(),
            extension: DEFAULT_EXTENSION.to_string(),
            enabled: true,
        }
    }
}

impl CompileOptions {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(source: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Read options from a TOML file. Relative paths stay relative to the
    /// current directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| CompileError::io(path, e))?;
        Self::from_toml_str(&source).map_err(|source| CompileError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions::with_extras(&self.hoist, &self.ignore)
    }

    /// Root for hoisted assets.
    pub fn assets_root(&self) -> &Path {
        self.assets.as_deref().unwrap_or(&self.output)
    }
}

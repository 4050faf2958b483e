use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use walkdir::WalkDir;

use crate::config::CompileOptions;
use crate::directives::Directives;
use crate::error::{CompileError, Result};
use crate::template_ast::{Component, Node};
use crate::template_codegen::compile_template;
use crate::template_parse::BuildOptions;

const CLEAR_ATTEMPTS: u32 = 5;
const CLEAR_RETRY_DELAY: Duration = Duration::from_millis(50);

/// Summary of a finished run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompileReport {
    pub elapsed: Duration,
    pub file_count: usize,
    /// Written templates, relative to the output directory.
    pub files: Vec<PathBuf>,
    /// Written asset files.
    pub assets: Vec<PathBuf>,
}

/// Compiles every template under an input directory into an output directory.
#[derive(Debug)]
pub struct Compiler {
    options: CompileOptions,
    build: BuildOptions,
    directives: Directives,
}

impl Compiler {
    pub fn new(options: CompileOptions) -> Self {
        Self {
            build: options.build_options(),
            options,
            directives: Directives::builtin(),
        }
    }

    /// Replace the built-in directive set.
    pub fn with_directives(mut self, directives: Directives) -> Self {
        self.directives = directives;
        self
    }

    pub fn compile(&self) -> Result<CompileReport> {
        let started = Instant::now();
        let input = &self.options.input;
        if !input.is_dir() {
            return Err(CompileError::InputMissing(input.clone()));
        }
        self.guard_output()?;
        clear_dir(&self.options.output)?;

        let mut report = CompileReport::default();
        let walker = WalkDir::new(input).sort_by_file_name();
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() || !self.is_template(entry.path()) {
                continue;
            }
            let rel = entry
                .path()
                .strip_prefix(input)
                .unwrap_or(entry.path())
                .to_path_buf();
            self.compile_file(entry.path(), &rel, &mut report)?;
        }

        report.file_count = report.files.len();
        report.elapsed = started.elapsed();
        tracing::info!(
            files = report.file_count,
            assets = report.assets.len(),
            elapsed = ?report.elapsed,
            "compiled templates"
        );
        Ok(report)
    }

    fn is_template(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext == self.options.extension.as_str())
    }

    /// Clearing an output directory that holds the input would delete the sources.
    fn guard_output(&self) -> Result<()> {
        let input = fs::canonicalize(&self.options.input)
            .map_err(|e| CompileError::io(&self.options.input, e))?;
        let Ok(output) = fs::canonicalize(&self.options.output) else {
            return Ok(());
        };
        if input.starts_with(&output) {
            return Err(CompileError::OutputContainsInput { output, input });
        }
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self, source_path, report), fields(file = %rel.display()))]
    fn compile_file(&self, source_path: &Path, rel: &Path, report: &mut CompileReport) -> Result<()> {
        let source =
            fs::read_to_string(source_path).map_err(|e| CompileError::io(source_path, e))?;
        let compiled = compile_template(&source, &self.build, &self.directives);

        let target = self.options.output.join(rel);
        write_file(&target, &compiled.output)?;
        tracing::debug!(target = %target.display(), "template written");
        report.files.push(rel.to_path_buf());

        let stem = asset_stem(rel);
        for (file_name, body) in collect_assets(&compiled.hoisted) {
            let path = self.options.assets_root().join(&stem).join(file_name);
            write_file(&path, &body)?;
            tracing::debug!(asset = %path.display(), "asset written");
            report.assets.push(path);
        }
        Ok(())
    }
}

/// Asset file bodies keyed by file name, in first-seen order. Repeated
/// `Script` or `Style` blocks of one template are joined with a newline.
fn collect_assets(hoisted: &[Component]) -> Vec<(&'static str, String)> {
    let mut assets: Vec<(&'static str, String)> = Vec::new();
    for component in hoisted {
        let name = component.name.as_static().unwrap_or_default();
        let file_name = match name {
            "Script" => "script.js",
            "Style" => "style.css",
            _ => {
                tracing::debug!(component = name, "hoisted component has no asset file");
                continue;
            }
        };
        let text = match component.children.as_slice() {
            [Node::Text(text)] => text,
            _ => {
                tracing::warn!(component = name, "hoisted component without a single text child skipped");
                continue;
            }
        };
        match assets.iter_mut().find(|(f, _)| *f == file_name) {
            Some((_, body)) => {
                body.push('\n');
                body.push_str(text);
            }
            None => assets.push((file_name, text.clone())),
        }
    }
    assets
}

/// Run a compile unless `options.enabled` is false.
pub fn compile(options: &CompileOptions) -> Result<Option<CompileReport>> {
    if !options.enabled {
        tracing::info!("compilation disabled");
        return Ok(None);
    }
    Compiler::new(options.clone()).compile().map(Some)
}

/// Relative path without extension, minus a trailing `template` segment.
///
/// `components/Card/template.twig` gives `components/Card`; a top-level
/// `template.twig` keeps `template`.
pub fn asset_stem(rel: &Path) -> PathBuf {
    let stem = rel.with_extension("");
    match stem.parent() {
        Some(parent)
            if stem.file_name().is_some_and(|n| n == "template")
                && !parent.as_os_str().is_empty() =>
        {
            parent.to_path_buf()
        }
        _ => stem,
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| CompileError::io(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| CompileError::io(path, e))
}

/// Empty `dir`, creating it when missing. Retries because removal can lag on
/// some filesystems.
fn clear_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return fs::create_dir_all(dir).map_err(|e| CompileError::io(dir, e));
    }

    for attempt in 1..=CLEAR_ATTEMPTS {
        for entry in fs::read_dir(dir).map_err(|e| CompileError::io(dir, e))? {
            let path = entry.map_err(|e| CompileError::io(dir, e))?.path();
            let removed = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            if let Err(e) = removed {
                tracing::debug!(path = %path.display(), attempt, error = %e, "remove failed");
            }
        }
        let empty = fs::read_dir(dir)
            .map_err(|e| CompileError::io(dir, e))?
            .next()
            .is_none();
        if empty {
            return Ok(());
        }
        std::thread::sleep(CLEAR_RETRY_DELAY);
    }

    Err(CompileError::OutputNotCleared {
        path: dir.to_path_buf(),
        attempts: CLEAR_ATTEMPTS,
    })
}

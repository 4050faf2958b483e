pub mod attrs;
pub mod compiler;
pub mod config;
pub mod directives;
pub mod discover;
pub mod error;
pub mod template_ast;
pub mod template_codegen;
pub mod template_parse;
pub mod token;

#[cfg(test)]
mod codegen_unit_tests;

pub use compiler::{CompileReport, Compiler, asset_stem, compile};
pub use config::CompileOptions;
pub use directives::{Directive, DirectiveCx, Directives, Phase, Target};
pub use discover::{component_template_name, component_template_path, find_components};
pub use error::{CompileError, Result};
pub use template_ast::{AttrKind, AttrValue, Component, Element, Node, Slot, TagName, Template, TemplateAttr};
pub use template_codegen::{CompiledTemplate, compile_template, render};
pub use template_parse::{BuildOptions, parse_template_to_ast};
pub use token::{Token, TokenKind, tokenize};

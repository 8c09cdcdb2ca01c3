//! Asset minification for JS and CSS files.
//!
//! Uses oxc for JavaScript and lightningcss for CSS.

use std::path::Path;

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, CompressOptionsUnused, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use super::AssetKind;

/// Minify JavaScript source code.
///
/// Modules get top-level mangling and unused-code removal. Classic scripts
/// share the page's global scope, so their top-level names are kept as is.
pub fn minify_js(source: &str, source_type: SourceType) -> Result<String, String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if let Some(err) = ret.errors.first() {
        return Err(err.to_string());
    }
    let mut program = ret.program;
    let options = if source_type.is_module() {
        MinifierOptions {
            mangle: Some(MangleOptions::default()),
            compress: Some(CompressOptions::smallest()),
        }
    } else {
        MinifierOptions {
            mangle: Some(MangleOptions {
                top_level: Some(false),
                ..MangleOptions::default()
            }),
            compress: Some(CompressOptions {
                unused: CompressOptionsUnused::Keep,
                ..CompressOptions::smallest()
            }),
        }
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

/// Minify CSS source code.
pub fn minify_css(source: &str) -> Result<String, String> {
    let stylesheet =
        StyleSheet::parse(source, ParserOptions::default()).map_err(|e| e.to_string())?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| e.to_string())?;
    Ok(result.code)
}

/// Minify source bytes based on file extension.
///
/// Already-minified inputs (`*.min.css`, `*.min.js`) pass through untouched.
pub fn minify_by_ext(path: &Path, content: &[u8]) -> Result<Vec<u8>, String> {
    let kind = AssetKind::from_path(path)
        .filter(|kind| kind.is_text())
        .ok_or_else(|| "not a stylesheet or script".to_string())?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    if stem.ends_with(".min") {
        return Ok(content.to_vec());
    }

    let source = std::str::from_utf8(content).map_err(|e| format!("invalid UTF-8: {e}"))?;
    let minified = match kind {
        AssetKind::Stylesheet => minify_css(source)?,
        _ => minify_js(source, script_source_type(path))?,
    };
    Ok(minified.into_bytes())
}

/// `.mjs` is an ES module, anything else a classic `<script>`.
fn script_source_type(path: &Path) -> SourceType {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("mjs") => SourceType::mjs(),
        _ => SourceType::script(),
    }
}

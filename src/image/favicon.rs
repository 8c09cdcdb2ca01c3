//! Favicon set generation.
//!
//! From one square-ish source image, renders the usual browser/OS icon sizes
//! plus `browserconfig.xml` and `site.webmanifest`. Output names are fixed,
//! so files are only rewritten when their bytes change. A JPEG copy of the
//! source is created next to it when none exists yet.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use image::DynamicImage;
use image::imageops::FilterType;
use rayon::prelude::*;
use serde::Serialize;

use super::encode::{decode, encode_jpeg, encode_png};
use crate::asset::{AssetError, publish_atomic, publish_if_changed};
use crate::config::FaviconConfig;
use crate::log;

/// (file name, width, height)
pub const ICONS: [(&str, u32, u32); 10] = [
    ("android-chrome-192x192.png", 192, 192),
    ("android-chrome-512x512.png", 512, 512),
    ("apple-touch-icon.png", 180, 180),
    ("favicon-16x16.png", 16, 16),
    ("favicon-32x32.png", 32, 32),
    ("favicon.png", 48, 48),
    ("mstile-70x70.png", 70, 70),
    ("mstile-150x150.png", 150, 150),
    ("mstile-310x150.png", 310, 150),
    ("mstile-310x310.png", 310, 310),
];

const JPEG_QUALITY: u8 = 95;

#[derive(Debug, Serialize)]
struct Icon {
    src: &'static str,
    sizes: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct WebManifest<'a> {
    name: &'a str,
    short_name: &'a str,
    icons: [Icon; 2],
    theme_color: &'a str,
    background_color: &'a str,
    display: &'a str,
}

/// What a favicon run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaviconReport {
    pub written: usize,
    pub unchanged: usize,
}

/// Generate the favicon set. Returns `None` when the source image is missing.
pub fn generate_favicon(config: &FaviconConfig) -> Result<Option<FaviconReport>> {
    if !config.source.is_file() {
        log!("warning"; "image {} could not be processed into favicon for {}",
            config.source.display(), config.output.display());
        return Ok(None);
    }

    let bytes = fs::read(&config.source)
        .with_context(|| format!("failed to read {}", config.source.display()))?;
    let img = decode(&config.source, &bytes)?;
    let out = config.output.as_path();

    let mut results: Vec<bool> = ICONS
        .par_iter()
        .map(|&(name, width, height)| render_icon(&img, out, name, width, height))
        .collect::<Result<_, AssetError>>()?;

    results.push(ensure_jpeg_copy(&config.source, &img)?);
    results.push(publish_if_changed(
        &out.join("browserconfig.xml"),
        browserconfig_xml(&config.tile_color).as_bytes(),
    )?);
    results.push(publish_if_changed(
        &out.join("site.webmanifest"),
        &web_manifest(config)?,
    )?);

    let written = results.iter().filter(|w| **w).count();
    let report = FaviconReport {
        written,
        unchanged: results.len() - written,
    };
    if report.written > 0 {
        log!("favicon"; "generated {} file(s) in {}", report.written, out.display());
    }
    Ok(Some(report))
}

fn render_icon(
    img: &DynamicImage,
    out: &Path,
    name: &str,
    width: u32,
    height: u32,
) -> Result<bool, AssetError> {
    let dest = out.join(name);
    let resized = img.resize_exact(width, height, FilterType::Lanczos3);
    let png = encode_png(&resized).map_err(|reason| AssetError::transform(&dest, reason))?;
    publish_if_changed(&dest, &png)
}

/// Write `<source>.jpg` beside the source unless it already exists.
fn ensure_jpeg_copy(source: &Path, img: &DynamicImage) -> Result<bool, AssetError> {
    let dest = source.with_extension("jpg");
    if dest.exists() {
        return Ok(false);
    }
    let jpeg =
        encode_jpeg(img, JPEG_QUALITY).map_err(|reason| AssetError::transform(source, reason))?;
    publish_atomic(&dest, &jpeg)?;
    Ok(true)
}

/// `browserconfig.xml` for Windows tiles.
pub fn browserconfig_xml(tile_color: &str) -> String {
    let tile_color = quick_xml::escape::escape(tile_color);
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<browserconfig>
    <msapplication>
        <tile>
            <square70x70logo src="/mstile-70x70.png"/>
            <square150x150logo src="/mstile-150x150.png"/>
            <wide310x150logo src="/mstile-310x150.png"/>
            <square310x310logo src="/mstile-310x310.png"/>
            <TileColor>{tile_color}</TileColor>
        </tile>
    </msapplication>
</browserconfig>"#
    )
}

/// `site.webmanifest` JSON.
pub fn web_manifest(config: &FaviconConfig) -> Result<Vec<u8>> {
    let manifest = WebManifest {
        name: &config.name,
        short_name: &config.name,
        icons: [
            Icon {
                src: "/android-chrome-192x192.png",
                sizes: "192x192",
                kind: "image/png",
            },
            Icon {
                src: "/android-chrome-512x512.png",
                sizes: "512x512",
                kind: "image/png",
            },
        ],
        theme_color: &config.theme_color,
        background_color: &config.theme_color,
        display: &config.display,
    };
    Ok(serde_json::to_vec(&manifest)?)
}

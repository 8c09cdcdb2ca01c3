//! Asset kind definitions.

use std::path::Path;

/// Kind of source asset, inferred from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// `.css`
    Stylesheet,
    /// `.js` / `.mjs`
    Script,
    /// `.png` / `.jpg` / `.jpeg`
    Raster,
}

impl AssetKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::from_ext(ext)
    }

    /// Match an extension with or without the leading dot.
    pub fn from_ext(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "css" => Some(Self::Stylesheet),
            "js" | "mjs" => Some(Self::Script),
            "png" | "jpg" | "jpeg" => Some(Self::Raster),
            _ => None,
        }
    }

    pub const fn is_text(self) -> bool {
        matches!(self, Self::Stylesheet | Self::Script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(
            AssetKind::from_path(Path::new("static/style.css")),
            Some(AssetKind::Stylesheet)
        );
        assert_eq!(
            AssetKind::from_path(Path::new("app.mjs")),
            Some(AssetKind::Script)
        );
        assert_eq!(
            AssetKind::from_path(Path::new("img/Photo.JPG")),
            Some(AssetKind::Raster)
        );
        assert_eq!(AssetKind::from_path(Path::new("README")), None);
        assert_eq!(AssetKind::from_path(Path::new("font.woff2")), None);
    }

    #[test]
    fn test_from_ext_accepts_dot() {
        assert_eq!(AssetKind::from_ext(".css"), Some(AssetKind::Stylesheet));
        assert_eq!(AssetKind::from_ext("jpeg"), Some(AssetKind::Raster));
        assert!(AssetKind::Script.is_text());
        assert!(!AssetKind::Raster.is_text());
    }
}

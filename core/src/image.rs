//! Image reference resolution.
//!
//! Stored image references come in three shapes: absolute URLs pointing
//! anywhere, backend-relative `/uploads/...` paths, and bare filenames.
//! `ImageResolver` turns each into something a renderer can fetch.

use crate::config::SyncConfig;

const ABSOLUTE_SCHEMES: [&str; 2] = ["http://", "https://"];

/// Shown in place of a form preview whose typed URL does not load.
pub const INVALID_PREVIEW_URL: &str =
    "https://via.placeholder.com/300x200/ff6b6b/ffffff?text=Invalid+Image+URL";

#[derive(Debug, Clone)]
pub struct ImageResolver {
    origin: String,
    uploads_path: String,
    no_image_url: String,
    broken_image_url: String,
}

impl ImageResolver {
    pub fn new(config: &SyncConfig) -> Self {
        let mut uploads_path = config.uploads_path.clone();
        if !uploads_path.starts_with('/') {
            uploads_path.insert(0, '/');
        }
        if !uploads_path.ends_with('/') {
            uploads_path.push('/');
        }
        Self {
            origin: config.api_origin.trim_end_matches('/').to_string(),
            uploads_path,
            no_image_url: config.no_image_url.clone(),
            broken_image_url: config.broken_image_url.clone(),
        }
    }

    pub fn resolve(&self, raw: Option<&str>) -> String {
        let raw = raw.map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return self.no_image_url.clone();
        }
        if is_absolute(raw) {
            return raw.to_string();
        }
        if raw.starts_with(&self.uploads_path) {
            return format!("{}{raw}", self.origin);
        }
        format!("{}{}{}", self.origin, self.uploads_path, raw.trim_start_matches('/'))
    }

    /// Resolve and attach the load-failure fallback.
    pub fn display(&self, raw: Option<&str>) -> DisplayImage {
        DisplayImage {
            src: self.resolve(raw),
            fallback: self.broken_image_url.clone(),
            failed: false,
        }
    }
}

impl Default for ImageResolver {
    fn default() -> Self {
        Self::new(&SyncConfig::default())
    }
}

fn is_absolute(raw: &str) -> bool {
    ABSOLUTE_SCHEMES.iter().any(|scheme| {
        raw.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// A rendered image and the placeholder it falls back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayImage {
    src: String,
    fallback: String,
    failed: bool,
}

impl DisplayImage {
    /// Show `src` exactly as given, with no resolution.
    pub fn unresolved(src: &str, fallback: &str) -> Self {
        Self {
            src: src.to_string(),
            fallback: fallback.to_string(),
            failed: false,
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn has_failed(&self) -> bool {
        self.failed
    }

    /// Called by the renderer when `src` cannot be loaded.
    pub fn on_load_error(&mut self) {
        if !self.failed {
            self.failed = true;
            self.src = self.fallback.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NO_IMAGE_URL;

    #[test]
    fn empty_reference_gets_placeholder() {
        let resolver = ImageResolver::default();
        assert_eq!(resolver.resolve(None), NO_IMAGE_URL);
        assert_eq!(resolver.resolve(Some("")), NO_IMAGE_URL);
        assert_eq!(resolver.resolve(Some("  ")), NO_IMAGE_URL);
    }

    #[test]
    fn absolute_urls_pass_through() {
        let resolver = ImageResolver::default();
        let url = "https://cdn.example.com/cat.png";
        assert_eq!(resolver.resolve(Some(url)), url);
        assert_eq!(resolver.resolve(Some("HTTP://x.io/a.png")), "HTTP://x.io/a.png");
    }

    #[test]
    fn upload_paths_get_origin() {
        let resolver = ImageResolver::default();
        assert_eq!(
            resolver.resolve(Some("/uploads/rex.jpg")),
            "http://localhost:8080/uploads/rex.jpg"
        );
    }

    #[test]
    fn bare_filenames_go_under_uploads() {
        let resolver = ImageResolver::default();
        assert_eq!(
            resolver.resolve(Some("rex.jpg")),
            "http://localhost:8080/uploads/rex.jpg"
        );
        assert_eq!(
            resolver.resolve(Some("httpd.png")),
            "http://localhost:8080/uploads/httpd.png"
        );
    }

    #[test]
    fn custom_config_is_normalized() {
        let config = SyncConfig {
            api_origin: "https://pets.example/".into(),
            uploads_path: "media".into(),
            ..SyncConfig::default()
        };
        let resolver = ImageResolver::new(&config);
        assert_eq!(resolver.resolve(Some("/media/a.png")), "https://pets.example/media/a.png");
        assert_eq!(resolver.resolve(Some("b.png")), "https://pets.example/media/b.png");
    }

    #[test]
    fn load_error_swaps_once() {
        let config = SyncConfig {
            broken_image_url: "https://static.example/broken.png".into(),
            ..SyncConfig::default()
        };
        let mut image = ImageResolver::new(&config).display(Some("gone.png"));
        assert_eq!(image.src(), "http://localhost:8080/uploads/gone.png");
        assert!(!image.has_failed());

        image.on_load_error();
        image.on_load_error();
        assert!(image.has_failed());
        assert_eq!(image.src(), "https://static.example/broken.png");
    }

    #[test]
    fn unresolved_image_keeps_raw_src() {
        let mut image = DisplayImage::unresolved("rex.jpg", INVALID_PREVIEW_URL);
        assert_eq!(image.src(), "rex.jpg");
        image.on_load_error();
        assert_eq!(image.src(), INVALID_PREVIEW_URL);
    }
}

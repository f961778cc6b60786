//! Templates embedded from the workspace `templates/` directory.

use rust_embed::RustEmbed;

/// Files under `templates/`, embedded at compile time.
///
/// With `debug-embed` the files are still embedded in debug builds, so the
/// binary never depends on the source tree at runtime.
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../templates"]
pub struct TemplateAssets;

/// Get template file content by path.
///
/// # Example
/// ```
/// use sk_core::init::templates::get_template;
///
/// let config = get_template("config.toml").unwrap_or_default();
/// assert!(config.contains("template_policy"));
/// ```
pub fn get_template(path: &str) -> Option<String> {
    TemplateAssets::get(path).map(|file| String::from_utf8_lossy(file.data.as_ref()).to_string())
}

/// List template paths starting with `prefix`, sorted.
pub fn list_templates(prefix: &str) -> Vec<String> {
    let mut paths: Vec<String> = TemplateAssets::iter()
        .filter(|path| path.starts_with(prefix))
        .map(|path| path.to_string())
        .collect();
    paths.sort();
    paths
}

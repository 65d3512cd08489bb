//! Resource Loaders
//!
//! Resource files live at `<language>/<group>.json`. A group defaults to the
//! language code itself, so every language has a default file named after
//! it next to its per-page files.

use crate::error::{Error, Result};
use crate::i18n::{Language, ResourceBlob};
use futures::FutureExt;
use futures::future::BoxFuture;
use rust_embed::RustEmbed;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Source of resource blobs
pub trait ResourceLoader: Send + Sync + 'static {
    /// Load the blob for a language/group pair
    fn load(&self, language: Language, group: &str) -> BoxFuture<'static, Result<ResourceBlob>>;
}

impl<T: ResourceLoader + ?Sized> ResourceLoader for Arc<T> {
    fn load(&self, language: Language, group: &str) -> BoxFuture<'static, Result<ResourceBlob>> {
        (**self).load(language, group)
    }
}

/// Group to load when none is named
pub fn default_group(language: Language, group: Option<&str>) -> &str {
    group.unwrap_or(language.code())
}

/// Relative path of a resource file
pub fn resource_path(language: Language, group: &str) -> Result<String> {
    if group.is_empty()
        || group.contains(['/', '\\'])
        || group.contains("..")
    {
        return Err(Error::InvalidGroup {
            group: group.to_string(),
        });
    }
    Ok(format!("{}/{group}.json", language.code()))
}

fn parse_resource(path: &str, content: &str) -> Result<ResourceBlob> {
    ResourceBlob::from_json_str(content).map_err(|e| Error::InvalidResource {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Resources bundled into the binary from the `locales` directory
#[derive(RustEmbed)]
#[folder = "locales"]
pub struct EmbeddedResources;

impl EmbeddedResources {
    /// Load a resource synchronously
    pub fn load_sync(language: Language, group: &str) -> Result<ResourceBlob> {
        let path = resource_path(language, group)?;
        let file = Self::get(&path).ok_or_else(|| Error::ResourceNotFound { path: path.clone() })?;
        let content = std::str::from_utf8(&file.data).map_err(|e| Error::InvalidResource {
            path: path.clone(),
            message: e.to_string(),
        })?;
        parse_resource(&path, content)
    }

    /// Groups bundled for a language
    pub fn groups(language: Language) -> Vec<String> {
        let prefix = format!("{}/", language.code());
        let mut groups: Vec<String> = Self::iter()
            .filter_map(|path| {
                path.strip_prefix(&prefix)
                    .and_then(|rest| rest.strip_suffix(".json"))
                    .map(str::to_string)
            })
            .collect();
        groups.sort_unstable();
        groups
    }
}

impl ResourceLoader for EmbeddedResources {
    fn load(&self, language: Language, group: &str) -> BoxFuture<'static, Result<ResourceBlob>> {
        let result = Self::load_sync(language, group);
        async move { result }.boxed()
    }
}

/// Resources read from a directory on disk
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    root: PathBuf,
}

impl DirectoryLoader {
    /// Create a loader rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceLoader for DirectoryLoader {
    fn load(&self, language: Language, group: &str) -> BoxFuture<'static, Result<ResourceBlob>> {
        let path = resource_path(language, group).map(|relative| self.root.join(relative));
        async move {
            let path = path?;
            let display = path.display().to_string();
            let content = match tokio::fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(Error::ResourceNotFound { path: display });
                }
                Err(e) => return Err(e.into()),
            };
            parse_resource(&display, &content)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_path() {
        assert_eq!(
            resource_path(Language::En, "example").expect("path"),
            "en/example.json"
        );
        assert_eq!(default_group(Language::En, None), "en");
        assert_eq!(default_group(Language::En, Some("home")), "home");
    }

    #[test]
    fn test_resource_path_rejects_traversal() {
        for group in ["", "../secrets", "a/b", "a\\b", ".."] {
            assert!(matches!(
                resource_path(Language::En, group),
                Err(Error::InvalidGroup { .. })
            ));
        }
    }

    #[test]
    fn test_embedded_default_and_named_groups() {
        let default = EmbeddedResources::load_sync(Language::En, "en").expect("en.json");
        assert!(default.get_str("metaTitle").is_some());

        let example = EmbeddedResources::load_sync(Language::En, "example").expect("example.json");
        assert!(example.get_str("exampleVariable_plural").is_some());

        let groups = EmbeddedResources::groups(Language::En);
        assert!(groups.contains(&"en".to_string()));
        assert!(groups.contains(&"example".to_string()));
    }

    #[test]
    fn test_embedded_missing_group() {
        assert!(matches!(
            EmbeddedResources::load_sync(Language::En, "missing"),
            Err(Error::ResourceNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_directory_loader() {
        let dir = tempfile::tempdir().expect("tempdir");
        let lang_dir = dir.path().join("en");
        std::fs::create_dir_all(&lang_dir).expect("mkdir");
        std::fs::write(lang_dir.join("home.json"), r#"{ "title": "Home" }"#).expect("write");
        std::fs::write(lang_dir.join("broken.json"), "not json").expect("write");

        let loader = DirectoryLoader::new(dir.path());
        let blob = loader.load(Language::En, "home").await.expect("home");
        assert_eq!(blob.get_str("title"), Some("Home"));

        assert!(matches!(
            loader.load(Language::En, "absent").await,
            Err(Error::ResourceNotFound { .. })
        ));
        assert!(matches!(
            loader.load(Language::En, "broken").await,
            Err(Error::InvalidResource { .. })
        ));
    }
}

use serde::Deserialize;

/// Main configuration structure for sitemirror
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub mirror: MirrorConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// What to mirror and where to put it
#[derive(Debug, Clone, Deserialize)]
pub struct MirrorConfig {
    /// Absolute URL the crawl starts from
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Maximum link depth to follow from the seed (seed is depth 0)
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Directory under which the domain-named mirror tree is written
    #[serde(rename = "save-root")]
    pub save_root: String,

    /// Resource categories to download alongside pages
    #[serde(default = "default_categories")]
    pub categories: Vec<ResourceCategory>,
}

/// Network behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Bound on page navigation, in seconds
    #[serde(rename = "page-timeout", default = "default_page_timeout")]
    pub page_timeout: u64,

    /// Bound on each resource download, in seconds
    #[serde(rename = "resource-timeout", default = "default_resource_timeout")]
    pub resource_timeout: u64,

    /// How many of a page's resources are downloaded at once
    #[serde(
        rename = "max-concurrent-downloads",
        default = "default_max_concurrent_downloads"
    )]
    pub max_concurrent_downloads: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_timeout: default_page_timeout(),
            resource_timeout: default_resource_timeout(),
            max_concurrent_downloads: default_max_concurrent_downloads(),
        }
    }
}

fn default_page_timeout() -> u64 {
    30
}

fn default_resource_timeout() -> u64 {
    20
}

fn default_max_concurrent_downloads() -> usize {
    8
}

fn default_categories() -> Vec<ResourceCategory> {
    vec![
        ResourceCategory::Images,
        ResourceCategory::Stylesheets,
        ResourceCategory::Scripts,
        ResourceCategory::Fonts,
    ]
}

/// A selectable group of asset types, each expanding to a fixed extension list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceCategory {
    Images,
    Stylesheets,
    Scripts,
    Fonts,
}

impl ResourceCategory {
    /// File extensions (lowercase, with leading dot) covered by this category
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Images => &[".png", ".jpg", ".jpeg", ".webp", ".gif", ".svg"],
            Self::Stylesheets => &[".css"],
            Self::Scripts => &[".js"],
            Self::Fonts => &[".woff", ".woff2", ".ttf"],
        }
    }
}

impl Config {
    /// Expands the selected categories into a flat extension allowlist
    pub fn extension_allowlist(&self) -> Vec<&'static str> {
        let mut allowlist = Vec::new();
        for category in &self.mirror.categories {
            for ext in category.extensions() {
                if !allowlist.contains(ext) {
                    allowlist.push(*ext);
                }
            }
        }
        allowlist
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            mirror: MirrorConfig {
                seed_url: "https://example.com/".to_string(),
                max_depth: 2,
                save_root: "./mirror".to_string(),
                categories: vec![ResourceCategory::Images, ResourceCategory::Stylesheets],
            },
            fetch: FetchConfig::default(),
        }
    }

    #[test]
    fn test_extension_allowlist_expands_categories() {
        let config = base_config();
        let allowlist = config.extension_allowlist();
        assert!(allowlist.contains(&".png"));
        assert!(allowlist.contains(&".css"));
        assert!(!allowlist.contains(&".js"));
    }

    #[test]
    fn test_extension_allowlist_deduplicates() {
        let mut config = base_config();
        config.mirror.categories =
            vec![ResourceCategory::Images, ResourceCategory::Images];
        let allowlist = config.extension_allowlist();
        assert_eq!(
            allowlist.iter().filter(|e| **e == ".png").count(),
            1
        );
    }

    #[test]
    fn test_empty_categories_give_empty_allowlist() {
        let mut config = base_config();
        config.mirror.categories = vec![];
        assert!(config.extension_allowlist().is_empty());
    }

    #[test]
    fn test_fetch_defaults() {
        let fetch = FetchConfig::default();
        assert_eq!(fetch.page_timeout, 30);
        assert_eq!(fetch.resource_timeout, 20);
        assert_eq!(fetch.max_concurrent_downloads, 8);
    }
}

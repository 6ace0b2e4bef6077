pub mod config {
    use serde::Deserialize;
    use std::fs;
    use std::path::{Path, PathBuf};

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct RenderConfig {
        /// "dot" | "mermaid" | "cytoscape" | "sigma" | "springy"
        pub default_format: Option<String>,
        pub level: Option<usize>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct DotConfig {
        pub rankdir: Option<String>, // "LR" | "TB"
        pub splines: Option<String>, // "curved" | "ortho" | "polyline"
        pub rounded: Option<bool>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct Config {
        pub render: Option<RenderConfig>,
        pub dot: Option<DotConfig>,
    }

    fn default_config_path(root: &Path) -> PathBuf {
        root.join("relation-mesh.toml")
    }

    #[must_use]
    pub fn load_config_at(path: &Path) -> Option<Config> {
        let data = fs::read_to_string(path).ok()?;
        toml::from_str::<Config>(&data).ok()
    }

    #[must_use]
    pub fn load_config_near(root: &Path) -> Option<Config> {
        let path = default_config_path(root);
        if path.exists() {
            load_config_at(&path)
        } else {
            None
        }
    }
}

use crate::config::PortfolioConfig;
use serde::Serialize;

pub fn write_manifest(config: &PortfolioConfig) -> Vec<u8> {
    let manifest = Manifest {
        name: config.title.clone(),
        short_name: config.owner.clone(),
        description: config.description.clone(),
        display: "browser".to_owned(),
        start_url: "/".to_owned(),
        background_color: "#ffffff".to_owned(),
        theme_color: "#0f172a".to_owned(),
        icons: config
            .favicon_path
            .clone()
            .map(|src| Icon {
                src,
                sizes: "any".to_owned(),
            })
            .into_iter()
            .collect(),
    };

    // Only plain strings, serialization can't fail.
    serde_json::to_vec(&manifest).unwrap_or_default()
}

#[derive(Serialize)]
struct Manifest {
    name: String,
    short_name: String,
    description: String,
    display: String,
    start_url: String,
    background_color: String,
    theme_color: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    icons: Vec<Icon>,
}

#[derive(Serialize)]
struct Icon {
    src: String,
    sizes: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn manifest_names_owner() {
        let config = PortfolioConfig::default();
        let manifest: serde_json::Value = serde_json::from_slice(&write_manifest(&config)).unwrap();
        assert_eq!(manifest["short_name"], "Shifankhan Pathan");
        assert!(manifest.get("icons").is_none());
    }

    #[test]
    fn favicon_becomes_icon() {
        let mut config = PortfolioConfig::default();
        config.favicon_path = Some("/favicon.png".to_owned());
        let manifest: serde_json::Value = serde_json::from_slice(&write_manifest(&config)).unwrap();
        assert_eq!(manifest["icons"][0]["src"], "/favicon.png");
    }
}

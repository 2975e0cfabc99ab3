use crate::{
    content::{default_projects, default_skills, ProjectEntry, SkillLabel},
    document::{PageMetadata, ScrollBehavior},
    error::{Error, Result},
    rich_text::RichText,
};
use serde::Deserialize;
use std::{fs, io, path::Path, time::Duration};

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PortfolioConfig {
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    #[serde(default = "default_output")]
    pub output: String,
    /// Absolute site URL without trailing slash, e.g. `https://example.com`.
    pub root_url: Option<String>,
    #[serde(default = "default_owner")]
    pub owner: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(default = "default_bio")]
    pub bio: RichText,
    #[serde(default = "default_about")]
    pub about: RichText,
    #[serde(default = "default_contact_text")]
    pub contact_text: String,
    #[serde(default = "default_resume_path")]
    pub resume_path: String,
    #[serde(default = "default_headshot_path")]
    pub headshot_path: String,
    pub favicon_path: Option<String>,
    #[serde(default = "default_email")]
    pub email: String,
    #[serde(default = "default_github_url")]
    pub github_url: String,
    #[serde(default = "default_repositories_url")]
    pub repositories_url: String,
    #[serde(default = "default_linkedin_url")]
    pub linkedin_url: String,
    #[serde(default = "default_loading_delay_ms")]
    pub loading_delay_ms: u64,
    #[serde(default = "default_smooth_scroll")]
    pub smooth_scroll: bool,
    #[serde(default)]
    pub show_demo_links: bool,
    #[serde(default = "default_projects")]
    pub projects: Vec<ProjectEntry>,
    #[serde(default = "default_skills")]
    pub skills: Vec<SkillLabel>,
}

fn default_static_dir() -> String {
    String::from("./static")
}

fn default_output() -> String {
    String::from("./output")
}

fn default_owner() -> String {
    "Shifankhan Pathan".to_owned()
}

fn default_role() -> String {
    "Full Stack Developer (MERN)".to_owned()
}

fn default_title() -> String {
    "Shifankhan Pathan — Full Stack Developer (MERN)".to_owned()
}

fn default_description() -> String {
    "MERN Full Stack Developer — FixIt project and production-ready web applications.".to_owned()
}

fn default_bio() -> RichText {
    RichText::plain("I’m a MERN stack developer who builds clean, maintainable, and efficient web applications. I focus on clear architecture, practical UX, and writing code that’s easy to scale.")
}

fn default_about() -> RichText {
    RichText::plain("I’m an IT student (B.Tech 2026) and a passionate MERN Stack Developer who enjoys turning ideas into clean, functional, and user-friendly web applications. I focus on writing maintainable code, improving performance, and continuously learning new technologies to grow as a full stack engineer.")
}

fn default_contact_text() -> String {
    "Interested in collaborating or hiring? Reach out — I typically respond within 24–48 hours."
        .to_owned()
}

fn default_resume_path() -> String {
    String::from("/Shifankhan_Resume.pdf")
}

fn default_headshot_path() -> String {
    String::from("/headshot.jpg")
}

fn default_email() -> String {
    String::from("pathanshifan773@gmail.com")
}

fn default_github_url() -> String {
    String::from("https://github.com/Shifan03")
}

fn default_repositories_url() -> String {
    String::from("https://github.com/Shifan03?tab=repositories")
}

fn default_linkedin_url() -> String {
    String::from("https://www.linkedin.com/in/shifankhan-pathan-b62794202/")
}

fn default_loading_delay_ms() -> u64 {
    350
}

fn default_smooth_scroll() -> bool {
    true
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        // Every field has a serde default.
        toml::from_str("").expect("empty config is valid")
    }
}

impl PortfolioConfig {
    /// Loads `path`. A missing file is only tolerated when `allow_missing`,
    /// in which case the built-in portfolio is used.
    pub fn load(path: &Path, allow_missing: bool) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if allow_missing && e.kind() == io::ErrorKind::NotFound => {
                tracing::info!("{} not found, using built-in content", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(Error::ReadConfig {
                    path: path.to_owned(),
                    source,
                })
            }
        };
        let config = toml::from_str::<Self>(&text).map_err(|source| Error::ParseConfig {
            path: path.to_owned(),
            source,
        })?;
        tracing::debug!(
            projects = config.projects.len(),
            skills = config.skills.len(),
            "loaded {}",
            path.display()
        );
        Ok(config)
    }

    pub fn metadata(&self) -> PageMetadata {
        PageMetadata {
            title: self.title.clone(),
            description: self.description.clone(),
            scroll_behavior: if self.smooth_scroll {
                ScrollBehavior::Smooth
            } else {
                ScrollBehavior::Auto
            },
        }
    }

    pub fn loading_delay(&self) -> Duration {
        Duration::from_millis(self.loading_delay_ms)
    }

    pub fn subdirectory(&self, subdirectory: &str) -> String {
        Path::new(&self.output)
            .join(Path::new(subdirectory))
            .to_string_lossy()
            .into_owned()
    }

    pub fn absolute_url(&self, path: &str) -> Option<String> {
        self.root_url
            .as_ref()
            .map(|root| format!("{}{path}", root.trim_end_matches('/')))
    }

    pub fn mailto(&self) -> String {
        format!("mailto:{}", self.email)
    }

    /// Every static asset the page links to.
    pub fn referenced_assets(&self) -> Vec<&str> {
        [self.resume_path.as_str(), self.headshot_path.as_str()]
            .into_iter()
            .chain(self.favicon_path.as_deref())
            .chain(self.projects.iter().map(|p| p.image_path.as_str()))
            .filter(|path| path.starts_with('/'))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rich_text::RichTextFormat;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn defaults_match_built_in_portfolio() {
        let config = PortfolioConfig::default();
        assert_eq!(config.owner, "Shifankhan Pathan");
        assert_eq!(config.loading_delay(), Duration::from_millis(350));
        assert_eq!(config.projects.len(), 1);
        assert_eq!(config.skills.len(), 9);
        assert!(!config.show_demo_links);
        assert_eq!(config.metadata().scroll_behavior, ScrollBehavior::Smooth);
    }

    #[test]
    fn overrides_content() {
        let config: PortfolioConfig = toml::from_str(
            r#"
            owner = "Ada"
            skills = ["Rust", "Zig"]
            smooth_scroll = false

            [about]
            content = "**hi**"
            format = "markdown"

            [[projects]]
            title = "Engine"
            description = "Analytical."
            technologies = ["Brass", "Steam"]
            source_link = "https://example.com/engine"
            image_path = "/engine.png"
            "#,
        )
        .unwrap();
        assert_eq!(config.owner, "Ada");
        assert_eq!(config.skills, vec!["Rust", "Zig"]);
        assert_eq!(config.about.format, RichTextFormat::Markdown);
        assert_eq!(config.projects[0].technologies, vec!["Brass", "Steam"]);
        assert_eq!(config.projects[0].live_demo_link, None);
        assert_eq!(config.metadata().scroll_behavior, ScrollBehavior::Auto);
        // Untouched fields keep their defaults.
        assert_eq!(config.role, "Full Stack Developer (MERN)");
    }

    #[test]
    fn empty_lists_are_accepted() {
        let config: PortfolioConfig = toml::from_str("projects = []\nskills = []").unwrap();
        assert!(config.projects.is_empty());
        assert!(config.skills.is_empty());
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.toml");
        assert_eq!(
            PortfolioConfig::load(&path, true).unwrap(),
            PortfolioConfig::default()
        );
        assert!(matches!(
            PortfolioConfig::load(&path, false),
            Err(Error::ReadConfig { .. })
        ));
    }

    #[test]
    fn invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "skills = 5").unwrap();
        assert!(matches!(
            PortfolioConfig::load(file.path(), false),
            Err(Error::ParseConfig { .. })
        ));
    }

    #[test]
    fn absolute_urls() {
        let mut config = PortfolioConfig::default();
        assert_eq!(config.absolute_url("/"), None);
        config.root_url = Some("https://example.com/".to_owned());
        assert_eq!(
            config.absolute_url("/sitemap.xml").as_deref(),
            Some("https://example.com/sitemap.xml")
        );
    }
}

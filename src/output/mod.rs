use crate::{
    bootstrap::{ManualClock, PortfolioPage},
    config::PortfolioConfig,
    document::StaticDocument,
    error::{Error, Result},
};
use chrono::Datelike;
use sitemap_rs::{
    url::{ChangeFrequency, Url},
    url_builder::UrlBuilder,
    url_set::UrlSet,
};
use std::{collections::HashMap, fmt::Write, fs, path::Path, sync::LazyLock};
use wax::Glob;

mod app;
mod build;
mod pwa;
mod sections;
mod serve;
mod structured_data;

pub use app::*;
pub use build::*;
pub use pwa::*;
pub use sections::*;
pub use serve::*;
pub use structured_data::*;

pub type DynLazy<'a, T> = LazyLock<T, Box<dyn FnOnce() -> T + Send + Sync + 'a>>;

/// Public path (`/index.html`) to lazily generated contents.
pub type Output<'a> = HashMap<String, DynLazy<'a, Vec<u8>>>;

/// A file copied verbatim from the static directory.
#[derive(Debug)]
pub struct StaticFile {
    /// Public path, starting with `/`.
    pub path: String,
    pub contents: Vec<u8>,
}

#[derive(Debug)]
pub struct Site {
    pub config: PortfolioConfig,
    pub static_files: Vec<StaticFile>,
}

impl Site {
    pub fn load(config: PortfolioConfig) -> Result<Self> {
        let static_files = load_static_files(Path::new(&config.static_dir))?;
        let site = Self {
            config,
            static_files,
        };
        for missing in site.missing_assets() {
            tracing::warn!("{missing} is linked from the page but not in the static directory");
        }
        Ok(site)
    }

    /// Referenced asset paths without a matching static file.
    pub fn missing_assets(&self) -> Vec<&str> {
        self.config
            .referenced_assets()
            .into_iter()
            .filter(|asset| !self.static_files.iter().any(|f| f.path == *asset))
            .collect()
    }

    pub fn output(&self) -> Result<Output<'_>> {
        let config = &self.config;
        let mut ret = Output::new();
        fn ret_insert<'a>(ret: &mut Output<'a>, path: String, file: DynLazy<'a, Vec<u8>>) {
            if ret.insert(path.clone(), file).is_some() {
                tracing::warn!("{path} generated more than once, keeping the last");
            }
        }

        ret_insert(
            &mut ret,
            "/index.html".to_owned(),
            LazyLock::new(Box::new(move || render_index(config))),
        );
        ret_insert(
            &mut ret,
            "/manifest.json".to_owned(),
            LazyLock::new(Box::new(move || write_manifest(config))),
        );
        let robots_txt = write_robots_txt(config);
        ret_insert(
            &mut ret,
            "/robots.txt".to_owned(),
            LazyLock::new(Box::new(move || robots_txt.into_bytes())),
        );
        if let Some(sitemap) = write_sitemap(config)? {
            ret_insert(
                &mut ret,
                "/sitemap.xml".to_owned(),
                LazyLock::new(Box::new(move || sitemap)),
            );
        }

        for file in &self.static_files {
            if ret.contains_key(&file.path) {
                tracing::warn!("static file {} shadows a generated file, skipping", file.path);
                continue;
            }
            ret_insert(
                &mut ret,
                file.path.clone(),
                LazyLock::new(Box::new(move || file.contents.clone())),
            );
        }

        tracing::debug!(files = ret.len(), "generated output manifest");
        Ok(ret)
    }
}

fn load_static_files(dir: &Path) -> Result<Vec<StaticFile>> {
    if !dir.is_dir() {
        tracing::warn!("static directory {} doesn't exist", dir.display());
        return Ok(Vec::new());
    }
    let walk_error = |message: String| Error::Walk {
        path: dir.to_owned(),
        message,
    };
    let glob = Glob::new("**").map_err(|e| walk_error(e.to_string()))?;
    let mut files = Vec::new();
    for entry in glob.walk(dir) {
        let entry = entry.map_err(|e| walk_error(e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let contents = fs::read(entry.path()).map_err(|e| Error::io(entry.path(), e))?;
        files.push(StaticFile {
            path: format!("/{}", entry.matched().complete()),
            contents,
        });
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));
    tracing::debug!(count = files.len(), "loaded static files from {}", dir.display());
    Ok(files)
}

/// Mounts the page against an in-memory document, captures the first frame
/// (overlay shown) and tears the page down again.
pub fn render_index(config: &PortfolioConfig) -> Vec<u8> {
    let clock = ManualClock::new();
    let mut document = StaticDocument::default();
    let mut page = PortfolioPage::new(config);
    page.mount(&mut document, &clock);
    let body = page.render(chrono::Local::now().year());
    page.unmount();

    render_html(AppProps {
        config,
        document: &document,
        body,
    })
}

pub fn write_robots_txt(config: &PortfolioConfig) -> String {
    let mut robots_txt = String::new();
    let _ = writeln!(robots_txt, "User-agent: *");
    let _ = writeln!(robots_txt, "Allow: /");
    if let Some(sitemap) = config.absolute_url("/sitemap.xml") {
        let _ = writeln!(robots_txt, "Sitemap: {sitemap}");
    }
    robots_txt
}

/// `None` without a `root_url`, since sitemap locations must be absolute.
pub fn write_sitemap(config: &PortfolioConfig) -> Result<Option<Vec<u8>>> {
    let Some(location) = config.absolute_url("/") else {
        return Ok(None);
    };
    let url: Url = UrlBuilder::new(location)
        .change_frequency(ChangeFrequency::Monthly)
        .build()
        .map_err(|e| Error::Sitemap(format!("{e:?}")))?;
    let sitemap = UrlSet::new(vec![url]).map_err(|e| Error::Sitemap(format!("{e:?}")))?;
    let mut ret = Vec::<u8>::new();
    sitemap
        .write(&mut ret)
        .map_err(|e| Error::Sitemap(format!("{e:?}")))?;
    Ok(Some(ret))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn site(config: PortfolioConfig) -> Site {
        Site {
            config,
            static_files: vec![StaticFile {
                path: "/headshot.jpg".to_owned(),
                contents: b"jpeg".to_vec(),
            }],
        }
    }

    #[test]
    fn output_lists_generated_and_static_files() {
        let site = site(PortfolioConfig::default());
        let output = site.output().unwrap();
        let mut paths = output.keys().map(String::as_str).collect::<Vec<_>>();
        paths.sort();
        assert_eq!(
            paths,
            vec!["/headshot.jpg", "/index.html", "/manifest.json", "/robots.txt"]
        );
        assert_eq!(&**output["/headshot.jpg"], b"jpeg");
    }

    #[test]
    fn sitemap_requires_root_url() {
        let mut config = PortfolioConfig::default();
        assert!(write_sitemap(&config).unwrap().is_none());
        assert!(!write_robots_txt(&config).contains("Sitemap"));

        config.root_url = Some("https://example.com".to_owned());
        let sitemap = String::from_utf8(write_sitemap(&config).unwrap().unwrap()).unwrap();
        assert!(sitemap.contains("<loc>https://example.com/</loc>"), "{sitemap}");
        assert!(write_robots_txt(&config).contains("Sitemap: https://example.com/sitemap.xml"));
        assert!(site(config).output().unwrap().contains_key("/sitemap.xml"));
    }

    #[test]
    fn missing_assets_are_reported() {
        let site = site(PortfolioConfig::default());
        assert_eq!(
            site.missing_assets(),
            vec!["/Shifankhan_Resume.pdf", "/projects/fixit-screenshot.png"]
        );
    }

    #[test]
    fn static_files_are_loaded_recursively() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("projects")).unwrap();
        fs::write(dir.path().join("headshot.jpg"), b"a").unwrap();
        fs::write(dir.path().join("projects/shot.png"), b"b").unwrap();
        let files = load_static_files(dir.path()).unwrap();
        let paths = files.iter().map(|f| f.path.as_str()).collect::<Vec<_>>();
        assert_eq!(paths, vec!["/headshot.jpg", "/projects/shot.png"]);
    }

    #[test]
    fn missing_static_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_static_files(&dir.path().join("nope")).unwrap().is_empty());
    }

    /// Text content of the element carrying `id`, ignoring formatting whitespace.
    fn element_text<'a>(html: &'a str, id: &str) -> Option<&'a str> {
        let start = html.find(&format!("id=\"{id}\""))?;
        let open = start + html[start..].find('>')? + 1;
        let close = open + html[open..].find('<')?;
        Some(html[open..close].trim())
    }

    #[test]
    fn index_is_first_frame_with_current_year() {
        let html = String::from_utf8(render_index(&PortfolioConfig::default())).unwrap();
        assert!(html.contains("id=\"loading_overlay\""));
        let year = chrono::Local::now().year().to_string();
        assert_eq!(element_text(&html, "copyright_year"), Some(year.as_str()));
    }
}

use crate::{
    config::PortfolioConfig,
    document::StaticDocument,
    output::{escape_script, person_structured_data, write_structured_data},
};
use serde::Serialize;
use yew::{function_component, html, Html, LocalServerRenderer, Properties};

pub struct AppProps<'a> {
    pub config: &'a PortfolioConfig,
    /// Head state after bootstrap.
    pub document: &'a StaticDocument,
    pub body: Html,
}

const STYLE: &str = r#"
    :root {
        --text: #0f172a;
        --muted: #475569;
        --subtle: #64748b;
        --border: #e2e8f0;
        --surface: #f1f5f9;
    }

    * {
        box-sizing: border-box;
    }

    body {
        margin: 0;
        background-color: white;
        color: var(--text);
        font-family: ui-sans-serif, system-ui, -apple-system, "Segoe UI", Roboto, sans-serif;
        -webkit-font-smoothing: antialiased;
        line-height: 1.5;
    }

    a {
        color: inherit;
    }

    #loading_overlay {
        position: fixed;
        inset: 0;
        z-index: 50;
        display: flex;
        align-items: center;
        justify-content: center;
        background-color: white;
    }

    .loading_content {
        display: flex;
        flex-direction: column;
        align-items: center;
        gap: 0.75rem;
    }

    .spinner {
        width: 2.5rem;
        height: 2.5rem;
        border-radius: 50%;
        border: 4px solid var(--muted);
        border-top-color: transparent;
        animation: spin 1s linear infinite;
    }

    .loading_label {
        font-size: 0.875rem;
        color: var(--muted);
    }

    @keyframes spin {
        to {
            transform: rotate(360deg);
        }
    }

    #header, #main, .footer_inner {
        max-width: 64rem;
        margin: 0 auto;
        padding-left: 1.5rem;
        padding-right: 1.5rem;
    }

    #header {
        display: flex;
        align-items: center;
        justify-content: space-between;
        padding-top: 1rem;
        padding-bottom: 1rem;
    }

    #owner_name {
        margin: 0;
        font-size: 1.125rem;
        font-weight: 600;
    }

    #nav {
        display: flex;
        gap: 1rem;
        font-size: 0.875rem;
        color: #334155;
    }

    #nav a, .subtle_link {
        text-decoration: none;
    }

    #nav a:hover, .subtle_link:hover {
        text-decoration: underline;
    }

    @media (max-width: 640px) {
        #nav {
            display: none;
        }
    }

    #hero {
        display: grid;
        grid-template-columns: 2fr 1fr;
        gap: 2rem;
        align-items: center;
        padding: 3rem 0;
    }

    @media (max-width: 768px) {
        #hero {
            grid-template-columns: 1fr;
        }
    }

    .hero_headline {
        margin: 0;
        font-size: 2.25rem;
        font-weight: 800;
        line-height: 1.2;
    }

    .hero_bio {
        margin-top: 1rem;
        max-width: 42rem;
        color: #334155;
    }

    .hero_actions {
        margin-top: 1.5rem;
        display: flex;
        flex-wrap: wrap;
        gap: 0.75rem;
    }

    .hero_headshot_container {
        display: flex;
        justify-content: center;
    }

    .hero_headshot {
        width: 9rem;
        height: 9rem;
        border-radius: 50%;
        overflow: hidden;
        border: 1px solid var(--border);
        background-color: var(--surface);
    }

    .hero_headshot img {
        width: 100%;
        height: 100%;
        object-fit: cover;
    }

    .fade_in_up {
        animation: fade_in_up 0.45s ease-out both;
    }

    .fade_in {
        animation: fade_in 0.3s ease-out 0.12s both;
    }

    .scale_in {
        animation: scale_in 0.3s ease-out 0.15s both;
    }

    @keyframes fade_in_up {
        from {
            opacity: 0;
            transform: translateY(8px);
        }
    }

    @keyframes fade_in {
        from {
            opacity: 0;
        }
    }

    @keyframes scale_in {
        from {
            opacity: 0;
            transform: scale(0.96);
        }
    }

    @media (prefers-reduced-motion: reduce) {
        .fade_in_up, .fade_in, .scale_in {
            animation: none;
        }
    }

    #projects, #skills, #about, #contact {
        padding: 2rem 0;
    }

    .section_heading_row {
        display: flex;
        align-items: baseline;
        justify-content: space-between;
    }

    .section_heading {
        margin: 0;
        font-size: 1.5rem;
        font-weight: 600;
    }

    .subtle_link {
        font-size: 0.875rem;
        color: var(--muted);
    }

    #projects_grid {
        margin-top: 1.5rem;
        display: grid;
        grid-template-columns: repeat(auto-fill, minmax(18rem, 1fr));
        gap: 1.5rem;
    }

    .project_card {
        display: flex;
        flex-direction: column;
        padding: 1rem;
        border: 1px solid var(--border);
        border-radius: 0.75rem;
        box-shadow: 0 1px 2px rgba(0, 0, 0, 0.05);
        transition: transform 0.2s, box-shadow 0.2s;
    }

    .project_card:hover {
        transform: translateY(-0.25rem);
        box-shadow: 0 10px 15px rgba(0, 0, 0, 0.1);
    }

    .placeholder_card {
        text-align: center;
        align-items: center;
        justify-content: center;
    }

    .project_image {
        width: 100%;
        height: 11rem;
        border-radius: 0.375rem;
        overflow: hidden;
        background-color: var(--surface);
    }

    .project_image img {
        width: 100%;
        height: 100%;
        object-fit: cover;
    }

    .placeholder_image {
        display: flex;
        align-items: center;
        justify-content: center;
    }

    .placeholder_label {
        font-size: 0.875rem;
        color: var(--subtle);
    }

    .project_body {
        margin-top: 1rem;
        flex-grow: 1;
    }

    .project_title {
        margin: 0;
        font-size: 1.125rem;
        font-weight: 600;
    }

    .project_description {
        margin-top: 0.5rem;
        font-size: 0.875rem;
        color: #334155;
    }

    .tech_tags {
        margin-top: 1rem;
        display: flex;
        flex-wrap: wrap;
        gap: 0.5rem;
    }

    .tech_tag {
        font-size: 0.75rem;
        padding: 0.25rem 0.5rem;
        border: 1px solid var(--border);
        border-radius: 9999px;
        color: var(--muted);
    }

    .project_links {
        margin-top: 1rem;
        padding-top: 1rem;
        border-top: 1px solid var(--surface);
        display: flex;
        gap: 0.75rem;
    }

    .button {
        display: inline-block;
        padding: 0.5rem 1rem;
        border: 1px solid var(--border);
        border-radius: 0.375rem;
        font-size: 0.875rem;
        text-decoration: none;
    }

    .button.small {
        padding: 0.5rem 0.75rem;
    }

    .button.primary {
        background-color: var(--text);
        border-color: var(--text);
        color: white;
    }

    .underlined {
        font-size: 0.875rem;
        text-decoration: underline;
    }

    #skills_grid {
        margin-top: 1rem;
        display: grid;
        grid-template-columns: repeat(4, 1fr);
        gap: 0.75rem;
    }

    @media (max-width: 640px) {
        #skills_grid {
            grid-template-columns: repeat(2, 1fr);
        }
    }

    .skill_tile {
        padding: 0.75rem;
        border: 1px solid var(--border);
        border-radius: 0.5rem;
        font-size: 0.875rem;
    }

    .about_text, .contact_text {
        margin-top: 1rem;
        max-width: 42rem;
        font-size: 0.875rem;
        color: #334155;
    }

    .contact_links {
        margin-top: 1rem;
        display: flex;
        flex-wrap: wrap;
        gap: 0.75rem;
    }

    #footer {
        margin-top: 3rem;
        padding: 1.5rem 0;
        border-top: 1px solid var(--border);
        font-size: 0.875rem;
        color: var(--muted);
    }
"#;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BootstrapConfig<'a> {
    title: &'a str,
    description: &'a str,
    smooth_scroll: bool,
    loading_delay_ms: u64,
}

/// Performs the page bootstrap in the visitor's browser.
fn bootstrap_script(config: &PortfolioConfig) -> Html {
    let json = serde_json::to_string(&BootstrapConfig {
        title: &config.title,
        description: &config.description,
        smooth_scroll: config.smooth_scroll,
        loading_delay_ms: config.loading_delay_ms,
    })
    .unwrap_or_else(|_| "{}".to_owned());
    let bootstrap_script_template = include_str!("bootstrap.js");

    Html::from_html_unchecked(
        format!(
            r#"
        <script>
            const BOOTSTRAP = {};
            {bootstrap_script_template}
        </script>
    "#,
            escape_script(&json)
        )
        .into(),
    )
}

pub fn app(props: AppProps<'_>) -> Html {
    let config = props.config;
    let style = Html::from_html_unchecked(STYLE.into());
    let title = props.document.title.clone().unwrap_or_else(|| config.title.clone());
    let canonical = config.absolute_url("/");
    let og_image = config.absolute_url(&config.headshot_path);

    html! {
        <html lang="en">
            <head>
                <meta charset="UTF-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                {props.document.head_html()}
                <meta property="og:title" content={title}/>
                <meta property="og:description" content={config.description.clone()}/>
                <meta property="og:type" content="profile"/>
                <meta name="author" content={config.owner.clone()}/>
                <meta name="generator" content="folio"/>
                if let Some(favicon) = config.favicon_path.clone() {
                    <link rel="icon" href={favicon}/>
                }
                <link rel="manifest" href="/manifest.json"/>
                if let Some(canonical) = canonical {
                    <link rel="canonical" href={canonical.clone()}/>
                    <meta property="og:url" content={canonical}/>
                }
                if let Some(og_image) = og_image {
                    <meta property="og:image" content={og_image}/>
                }
                {write_structured_data(person_structured_data(config))}
                <style>{style}</style>
                <noscript>
                    <style>{"#loading_overlay { display: none; }"}</style>
                </noscript>
            </head>
            <body>
                {props.body}
                {bootstrap_script(config)}
            </body>
        </html>
    }
}

/// Renders without formatting or doctype.
pub fn render_fragment(html: Html) -> String {
    #[derive(Properties, PartialEq)]
    struct InnerAppProps {
        html: Html,
    }

    #[function_component(InnerApp)]
    fn inner_app(props: &InnerAppProps) -> Html {
        props.html.clone()
    }

    let renderer =
        LocalServerRenderer::<InnerApp>::with_props(InnerAppProps { html }).hydratable(false);
    futures::executor::block_on(renderer.render())
}

pub fn render_html(props: AppProps<'_>) -> Vec<u8> {
    let raw = render_fragment(app(props));

    let mut options = markup_fmt::config::FormatOptions::default();
    options.layout.use_tabs = true;
    options.layout.indent_width = 1;
    let mut html =
        match markup_fmt::format_text(&raw, markup_fmt::Language::Html, &options, |code, _| {
            Ok::<_, std::convert::Infallible>(code.into())
        }) {
            Ok(formatted) => formatted,
            Err(e) => {
                tracing::warn!("couldn't format html, writing it unformatted: {e:?}");
                raw
            }
        };

    html.insert_str(0, "<!DOCTYPE html>\n");

    html = html
        .lines()
        .filter(|l| !l.chars().all(|c| c.is_whitespace()))
        .map(|l| format!("{l}\n"))
        .collect();

    html.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        document::{apply_page_metadata, DESCRIPTION_META},
        output::render_page,
    };

    fn render(config: &PortfolioConfig) -> String {
        let mut document = StaticDocument::default();
        apply_page_metadata(&mut document, &config.metadata());
        let html = render_html(AppProps {
            config,
            document: &document,
            body: render_page(config, true, 2030),
        });
        String::from_utf8(html).unwrap()
    }

    #[test]
    fn document_has_single_description() {
        let html = render(&PortfolioConfig::default());
        assert!(html.starts_with("<!DOCTYPE html>\n"));
        assert_eq!(
            html.matches(&format!("name=\"{DESCRIPTION_META}\"")).count(),
            1
        );
        assert!(html.contains("scroll-behavior: smooth"));
    }

    #[test]
    fn bootstrap_script_carries_delay() {
        let mut config = PortfolioConfig::default();
        config.loading_delay_ms = 500;
        let html = render(&config);
        assert!(html.contains("\"loadingDelayMs\":500"));
        assert!(html.contains("loading_overlay"));
        assert!(html.contains("<noscript>"));
    }

    #[test]
    fn overlay_is_removed_after_cache_restore() {
        let html = render(&PortfolioConfig::default());
        assert!(html.contains("\"pageshow\""), "{html}");
        assert!(html.contains("event.persisted"), "{html}");
        assert!(!html.contains("clearTimeout"), "{html}");
    }

    #[test]
    fn markup_in_title_stays_inside_script() {
        let mut config = PortfolioConfig::default();
        config.title = "<!--<script>".to_owned();
        config.description = "</script>&".to_owned();
        let html = render(&config);
        let start = html.find("const BOOTSTRAP").unwrap();
        let end = start + html[start..].find("</script>").unwrap();
        let script = &html[start..end];
        assert!(
            script.contains(r#""title":"\u003c!--\u003cscript\u003e""#),
            "{script}"
        );
        assert!(
            script.contains(r#""description":"\u003c/script\u003e\u0026""#),
            "{script}"
        );
        assert!(!script.contains("<!--"), "{script}");
        assert!(script.contains("document.title = BOOTSTRAP.title"), "{script}");
    }

    #[test]
    fn canonical_only_with_root_url() {
        let mut config = PortfolioConfig::default();
        assert!(!render(&config).contains("rel=\"canonical\""));
        config.root_url = Some("https://example.com".to_owned());
        let html = render(&config);
        assert!(html.contains("rel=\"canonical\""));
        assert!(html.contains("https://example.com/headshot.jpg"));
    }
}

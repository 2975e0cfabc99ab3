use crate::{
    config::PortfolioConfig,
    content::{ProjectEntry, SkillLabel},
    rich_text::rich_text_html,
};
use yew::{classes, html, Html};

/// In-page anchors, in navigation order.
pub const SECTIONS: [(&str, &str); 4] = [
    ("projects", "Projects"),
    ("skills", "Skills"),
    ("about", "About"),
    ("contact", "Contact"),
];

/// The whole page body. Depends only on its arguments.
pub fn render_page(config: &PortfolioConfig, is_loading: bool, year: i32) -> Html {
    html! {
        <div id="portfolio">
            if is_loading {
                {loading_overlay()}
            }
            {header(config)}
            <main id="main">
                {hero(config)}
                {projects(config)}
                {skills(&config.skills)}
                {about(config)}
                {contact(config)}
            </main>
            {footer(config, year)}
        </div>
    }
}

pub fn loading_overlay() -> Html {
    html! {
        <div id="loading_overlay" role="status" aria-live="polite">
            <div class="loading_content">
                <div class="spinner" aria-hidden="true"></div>
                <div class="loading_label">{"Loading portfolio..."}</div>
            </div>
        </div>
    }
}

fn header(config: &PortfolioConfig) -> Html {
    html! {
        <header id="header">
            <h4 id="owner_name">{config.owner.clone()}</h4>
            <nav id="nav" aria-label="Sections">
                {SECTIONS.iter().map(|(id, label)| html!{
                    <a href={format!("#{id}")}>{*label}</a>
                }).collect::<Html>()}
            </nav>
        </header>
    }
}

fn hero(config: &PortfolioConfig) -> Html {
    html! {
        <section id="hero">
            <div class="hero_text">
                <h2 class="hero_headline fade_in_up">{config.role.clone()}</h2>
                {rich_text_html(&config.bio, "hero_bio fade_in")}
                <div class="hero_actions">
                    <a
                        class="button"
                        href={config.resume_path.clone()}
                        target="_blank"
                        rel="noopener noreferrer"
                    >{"Download Resume"}</a>
                </div>
            </div>
            <div class="hero_headshot_container">
                <div class="hero_headshot scale_in">
                    <img src={config.headshot_path.clone()} alt={config.owner.clone()}/>
                </div>
            </div>
        </section>
    }
}

fn projects(config: &PortfolioConfig) -> Html {
    html! {
        <section id="projects">
            <div class="section_heading_row">
                <h3 class="section_heading">{"Selected projects"}</h3>
                <a class="subtle_link" href={config.repositories_url.clone()}>{"View all on GitHub"}</a>
            </div>
            <div id="projects_grid">
                {config.projects.iter().map(|project| project_card(project, config.show_demo_links)).collect::<Html>()}
                {placeholder_card(config)}
            </div>
        </section>
    }
}

fn project_card(project: &ProjectEntry, show_demo_link: bool) -> Html {
    let demo = project
        .live_demo_link
        .clone()
        .filter(|_| show_demo_link);
    html! {
        <article class="project_card">
            <div class="project_image">
                <img src={project.image_path.clone()} alt={project.title.clone()}/>
            </div>
            <div class="project_body">
                <h4 class="project_title">{project.title.clone()}</h4>
                <p class="project_description">{project.description.clone()}</p>
                <div class="tech_tags">
                    {project.technologies.iter().map(|tech| html!{
                        <span class="tech_tag">{tech.clone()}</span>
                    }).collect::<Html>()}
                </div>
            </div>
            <div class="project_links">
                <a
                    class="button small"
                    href={project.source_link.clone()}
                    target="_blank"
                    rel="noreferrer"
                >{"Repo"}</a>
                if let Some(href) = demo {
                    <a
                        class="button small"
                        {href}
                        target="_blank"
                        rel="noreferrer"
                    >{"Live demo"}</a>
                }
            </div>
        </article>
    }
}

/// Trailing card that isn't backed by a [`ProjectEntry`].
fn placeholder_card(config: &PortfolioConfig) -> Html {
    html! {
        <article class={classes!("project_card", "placeholder_card")}>
            <div class="project_image placeholder_image">
                <div class="placeholder_label">{"Coming Soon......"}</div>
            </div>
            <div class="project_body">
                <h4 class="project_title">{"More projects coming soon"}</h4>
                <p class="project_description">
                    {"I'm actively building new applications — check back soon or view my GitHub."}
                </p>
            </div>
            <div class="project_links">
                <a class="underlined" href={config.github_url.clone()}>{"View GitHub"}</a>
            </div>
        </article>
    }
}

fn skills(skills: &[SkillLabel]) -> Html {
    html! {
        <section id="skills">
            <h3 class="section_heading">{"Skills"}</h3>
            <div id="skills_grid">
                {skills.iter().map(|skill| html!{
                    <div class="skill_tile">{skill.clone()}</div>
                }).collect::<Html>()}
            </div>
        </section>
    }
}

fn about(config: &PortfolioConfig) -> Html {
    html! {
        <section id="about">
            <h3 class="section_heading">{"About me"}</h3>
            {rich_text_html(&config.about, "about_text")}
        </section>
    }
}

fn contact(config: &PortfolioConfig) -> Html {
    html! {
        <section id="contact">
            <h3 class="section_heading">{"Contact"}</h3>
            <p class="contact_text">{config.contact_text.clone()}</p>
            <div class="contact_links">
                <a class="button primary" href={config.mailto()}>{"Email Me"}</a>
                <a class="button" href={config.github_url.clone()}>{"GitHub"}</a>
                <a class="button" href={config.linkedin_url.clone()}>{"LinkedIn"}</a>
            </div>
        </section>
    }
}

fn footer(config: &PortfolioConfig, year: i32) -> Html {
    // The bootstrap script refreshes the year in the visitor's browser.
    html! {
        <footer id="footer">
            <div class="footer_inner">
                {"© "}
                <span id="copyright_year">{year.to_string()}</span>
                {format!(" {}.", config.owner)}
            </div>
        </footer>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::render_fragment;
    use pretty_assertions::assert_eq;

    fn project(title: &str, technologies: &[&str]) -> ProjectEntry {
        ProjectEntry {
            title: title.to_owned(),
            description: format!("{title} description"),
            technologies: technologies.iter().map(|t| t.to_string()).collect(),
            source_link: format!("https://example.com/{title}"),
            live_demo_link: Some(format!("https://demo.example.com/{title}")),
            image_path: format!("/{title}.png"),
        }
    }

    fn config_with(projects: Vec<ProjectEntry>, skills: &[&str]) -> PortfolioConfig {
        PortfolioConfig {
            projects,
            skills: skills.iter().map(|s| s.to_string()).collect(),
            ..PortfolioConfig::default()
        }
    }

    fn positions(html: &str, needles: &[&str]) -> Vec<usize> {
        needles
            .iter()
            .map(|n| html.find(n).unwrap_or_else(|| panic!("missing {n}")))
            .collect()
    }

    fn is_sorted(v: &[usize]) -> bool {
        v.windows(2).all(|w| w[0] < w[1])
    }

    #[test]
    fn one_card_per_project_in_order_plus_placeholder() {
        let config = config_with(
            vec![
                project("Alpha", &["Rust"]),
                project("Beta", &["Go"]),
                project("Gamma", &["Zig"]),
            ],
            &[],
        );
        let html = render_fragment(render_page(&config, false, 2030));
        assert_eq!(html.matches("class=\"project_card\"").count(), 3);
        assert_eq!(html.matches("placeholder_card").count(), 1);
        assert!(is_sorted(&positions(
            &html,
            &[
                "Alpha description",
                "Beta description",
                "Gamma description",
                "More projects coming soon"
            ]
        )));
    }

    #[test]
    fn tech_tags_keep_stored_order() {
        let config = config_with(vec![project("Alpha", &["Yew", "Axum", "Postgres"])], &[]);
        let html = render_fragment(render_page(&config, false, 2030));
        assert_eq!(html.matches("class=\"tech_tag\"").count(), 3);
        assert!(is_sorted(&positions(
            &html,
            &[">Yew<", ">Axum<", ">Postgres<"]
        )));
    }

    #[test]
    fn one_tile_per_skill_in_order() {
        let config = config_with(vec![], &["Rust", "SQL", "Git"]);
        let html = render_fragment(render_page(&config, false, 2030));
        assert_eq!(html.matches("class=\"skill_tile\"").count(), 3);
        assert!(is_sorted(&positions(&html, &[">Rust<", ">SQL<", ">Git<"])));
    }

    #[test]
    fn empty_content_renders_empty_grids() {
        let config = config_with(vec![], &[]);
        let html = render_fragment(render_page(&config, false, 2030));
        assert_eq!(html.matches("class=\"project_card\"").count(), 0);
        assert_eq!(html.matches("placeholder_card").count(), 1);
        assert_eq!(html.matches("class=\"skill_tile\"").count(), 0);
        assert!(html.contains("id=\"skills_grid\""));
    }

    #[test]
    fn demo_links_are_opt_in() {
        let mut config = config_with(vec![project("Alpha", &[])], &[]);
        let html = render_fragment(render_page(&config, false, 2030));
        assert!(!html.contains("Live demo"));
        assert!(html.contains("href=\"https://example.com/Alpha\""));

        config.show_demo_links = true;
        let html = render_fragment(render_page(&config, false, 2030));
        assert!(html.contains("href=\"https://demo.example.com/Alpha\""));
    }

    #[test]
    fn overlay_only_while_loading() {
        let config = PortfolioConfig::default();
        let loading = render_fragment(render_page(&config, true, 2030));
        let loaded = render_fragment(render_page(&config, false, 2030));
        assert_eq!(loading.matches("id=\"loading_overlay\"").count(), 1);
        assert!(!loaded.contains("loading_overlay"));
        // Content stays rendered beneath the overlay.
        assert!(loading.contains("id=\"projects\""));
    }

    #[test]
    fn navigation_targets_sections() {
        let html = render_fragment(render_page(&PortfolioConfig::default(), false, 2030));
        for (id, _) in SECTIONS {
            assert!(html.contains(&format!("href=\"#{id}\"")));
            assert!(html.contains(&format!("<section id=\"{id}\"")));
        }
    }

    #[test]
    fn footer_shows_given_year() {
        let html = render_fragment(render_page(&PortfolioConfig::default(), false, 2031));
        assert!(html.contains("<span id=\"copyright_year\">2031</span>"), "{html}");
        assert!(html.contains(" Shifankhan Pathan."));
    }

    #[test]
    fn contact_links() {
        let html = render_fragment(render_page(&PortfolioConfig::default(), false, 2030));
        assert!(html.contains("href=\"mailto:pathanshifan773@gmail.com\""));
        assert!(html.contains("href=\"https://github.com/Shifan03\""));
        assert!(html.contains("href=\"https://www.linkedin.com/in/shifankhan-pathan-b62794202/\""));
    }
}

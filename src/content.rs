use serde::Deserialize;

/// One card in the projects grid.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ProjectEntry {
    pub title: String,
    pub description: String,
    /// Display order is preserved.
    #[serde(default)]
    pub technologies: Vec<String>,
    pub source_link: String,
    #[serde(default)]
    pub live_demo_link: Option<String>,
    pub image_path: String,
}

/// One tile in the skills grid.
pub type SkillLabel = String;

pub fn default_projects() -> Vec<ProjectEntry> {
    vec![ProjectEntry {
        title: "FixIt — Local Services Marketplace".to_owned(),
        description: "A platform that connects users with local service providers for repairs, home services, and on-demand assistance. Includes user authentication, provider listings, booking flow, and service management dashboard.".to_owned(),
        technologies: ["React", "Node", "MongoDB", "Express"]
            .map(String::from)
            .to_vec(),
        source_link: "https://github.com/Shifan03/fixit-worker-booking".to_owned(),
        live_demo_link: Some("https://fixit-demo.example.com".to_owned()),
        image_path: "/projects/fixit-screenshot.png".to_owned(),
    }]
}

pub fn default_skills() -> Vec<SkillLabel> {
    [
        "HTML5 & CSS3",
        "JavaScript (ES6+)",
        "React.js",
        "Node.js",
        "Express.js",
        "MongoDB & Mongoose",
        "REST API Development",
        "JWT Authentication",
        "Git & GitHub",
    ]
    .map(String::from)
    .to_vec()
}

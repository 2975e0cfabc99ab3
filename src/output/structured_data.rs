use crate::config::PortfolioConfig;
use serde::Serialize;
use yew::Html;

pub fn write_structured_data<T: Serialize>(data: T) -> Html {
    #[derive(Serialize)]
    struct Context<T> {
        #[serde(rename = "@context")]
        context: &'static str,
        #[serde(flatten)]
        data: T,
    }

    let json = match serde_json::to_string_pretty(&Context {
        context: "https://schema.org",
        data,
    }) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!("couldn't serialize structured data: {e}");
            return Html::default();
        }
    };

    Html::from_html_unchecked(
        format!(
            "<script type=\"application/ld+json\">\n{}\n</script>",
            escape_script(&json)
        )
        .into(),
    )
}

/// Makes JSON safe to inline in a `<script>`. Markup characters become
/// `\uXXXX` escapes, which decode to the same JSON value.
pub fn escape_script(json: &str) -> String {
    json.replace('&', "\\u0026")
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
}

/// https://schema.org/Person
#[derive(Serialize)]
pub struct PersonStructuredData {
    #[serde(rename = "@type")]
    pub _type: &'static str,
    pub name: String,
    #[serde(rename = "jobTitle")]
    pub job_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub email: String,
    #[serde(rename = "sameAs", skip_serializing_if = "Vec::is_empty")]
    pub same_as: Vec<String>,
}

pub fn person_structured_data(config: &PortfolioConfig) -> PersonStructuredData {
    PersonStructuredData {
        _type: "Person",
        name: config.owner.clone(),
        job_title: config.role.clone(),
        url: config.absolute_url("/"),
        image: config.absolute_url(&config.headshot_path),
        email: config.mailto(),
        same_as: [&config.github_url, &config.linkedin_url]
            .into_iter()
            .filter(|url| !url.is_empty())
            .cloned()
            .collect(),
    }
}

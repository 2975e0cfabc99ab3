use crate::util::join;
use serde::Deserialize;
use yew::{html, Html};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "RichTextRepr")]
pub struct RichText {
    pub content: String,
    pub format: RichTextFormat,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RichTextFormat {
    #[default]
    #[serde(alias = "text")]
    Plain,
    #[serde(alias = "md")]
    Markdown,
}

/// Either a bare string or `{ content, format }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RichTextRepr {
    Plain(String),
    Full {
        content: String,
        #[serde(default)]
        format: RichTextFormat,
    },
}

impl From<RichTextRepr> for RichText {
    fn from(repr: RichTextRepr) -> Self {
        match repr {
            RichTextRepr::Plain(content) => Self::plain(content),
            RichTextRepr::Full { content, format } => Self { content, format },
        }
    }
}

impl RichText {
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            format: RichTextFormat::Plain,
        }
    }
}

/// Renders `text` as one or more paragraphs carrying `class`.
pub fn rich_text_html(text: &RichText, class: &'static str) -> Html {
    match text.format {
        RichTextFormat::Plain => {
            let lines = text
                .content
                .lines()
                .map(|line| html! {{line.to_owned()}})
                .collect::<Vec<_>>();
            html! {
                <p {class}>{join(&lines, &html!{<br/>})}</p>
            }
        }
        RichTextFormat::Markdown => {
            let mut options = markdown::Options::gfm();
            options.compile.allow_dangerous_html = true;
            match markdown::to_html_with_options(&text.content, &options) {
                Ok(rendered) => html! {
                    <div {class}>{Html::from_html_unchecked(rendered.into())}</div>
                },
                Err(e) => {
                    tracing::warn!("couldn't render markdown, falling back to plain text: {e:?}");
                    rich_text_html(&RichText::plain(text.content.clone()), class)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::render_fragment;
    use pretty_assertions::assert_eq;

    #[derive(Deserialize)]
    struct Doc {
        bio: RichText,
    }

    #[test]
    fn bare_string_is_plain() {
        let doc: Doc = toml::from_str(r#"bio = "hello""#).unwrap();
        assert_eq!(doc.bio, RichText::plain("hello"));
    }

    #[test]
    fn table_selects_format() {
        let doc: Doc = toml::from_str(
            r#"
            [bio]
            content = "*hi*"
            format = "markdown"
            "#,
        )
        .unwrap();
        assert_eq!(doc.bio.format, RichTextFormat::Markdown);
    }

    #[test]
    fn plain_text_is_escaped_with_line_breaks() {
        let html = render_fragment(rich_text_html(
            &RichText::plain("one <b>\ntwo"),
            "about_text",
        ));
        assert!(html.contains("one &lt;b&gt;"), "{html}");
        assert!(html.contains("<br"), "{html}");
        assert!(html.contains("class=\"about_text\""), "{html}");
    }

    #[test]
    fn markdown_renders_emphasis() {
        let html = render_fragment(rich_text_html(
            &RichText {
                content: "I like *Rust*.".to_owned(),
                format: RichTextFormat::Markdown,
            },
            "about_text",
        ));
        assert!(html.contains("<em>Rust</em>"), "{html}");
    }
}

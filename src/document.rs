//! Document-level side effects of the page: title, head metadata and the
//! global scroll behavior.
//!
//! [`apply_page_metadata`] is written against [`DocumentEnvironment`] so it
//! runs the same way against the in-memory [`StaticDocument`] that feeds the
//! generated `<head>` and against any other host.

use yew::{html, Html};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ScrollBehavior {
    #[default]
    Auto,
    Smooth,
}

impl ScrollBehavior {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Smooth => "smooth",
        }
    }
}

/// Desired document state after bootstrap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub scroll_behavior: ScrollBehavior,
}

pub const DESCRIPTION_META: &str = "description";

/// Host document operations needed by bootstrap.
pub trait DocumentEnvironment {
    fn set_title(&mut self, title: &str);
    /// `None` if no `<meta name={name}>` exists.
    fn meta_content(&self, name: &str) -> Option<Option<&str>>;
    /// Appends an empty `<meta name={name}>` to the head.
    fn append_meta(&mut self, name: &str);
    fn set_meta_content(&mut self, name: &str, content: &str);
    fn set_scroll_behavior(&mut self, behavior: ScrollBehavior);
}

/// Idempotent: applying twice leaves the document as applying once.
pub fn apply_page_metadata<D: DocumentEnvironment + ?Sized>(doc: &mut D, meta: &PageMetadata) {
    doc.set_scroll_behavior(meta.scroll_behavior);
    doc.set_title(&meta.title);
    if doc.meta_content(DESCRIPTION_META).is_none() {
        doc.append_meta(DESCRIPTION_META);
    }
    doc.set_meta_content(DESCRIPTION_META, &meta.description);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetaElement {
    pub name: String,
    pub content: Option<String>,
}

/// In-memory head used for server-side rendering.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticDocument {
    pub title: Option<String>,
    pub metas: Vec<MetaElement>,
    pub scroll_behavior: ScrollBehavior,
}

impl StaticDocument {
    #[cfg(test)]
    pub fn metas_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MetaElement> + 'a {
        self.metas.iter().filter(move |m| m.name == name)
    }

    /// Title, named metas and the scroll rule, in document order.
    pub fn head_html(&self) -> Html {
        let scroll_rule = (self.scroll_behavior != ScrollBehavior::Auto).then(|| {
            format!(
                "html {{ scroll-behavior: {}; }}",
                self.scroll_behavior.as_css()
            )
        });
        html! {<>
            if let Some(title) = self.title.clone() {
                <title>{title}</title>
            }
            {self.metas.iter().map(|meta| html!{
                <meta name={meta.name.clone()} content={meta.content.clone()}/>
            }).collect::<Html>()}
            if let Some(rule) = scroll_rule {
                <style>{rule}</style>
            }
        </>}
    }
}

impl DocumentEnvironment for StaticDocument {
    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_owned());
    }

    fn meta_content(&self, name: &str) -> Option<Option<&str>> {
        self.metas
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.content.as_deref())
    }

    fn append_meta(&mut self, name: &str) {
        self.metas.push(MetaElement {
            name: name.to_owned(),
            content: None,
        });
    }

    fn set_meta_content(&mut self, name: &str, content: &str) {
        if let Some(meta) = self.metas.iter_mut().find(|m| m.name == name) {
            meta.content = Some(content.to_owned());
        }
    }

    fn set_scroll_behavior(&mut self, behavior: ScrollBehavior) {
        self.scroll_behavior = behavior;
    }
}

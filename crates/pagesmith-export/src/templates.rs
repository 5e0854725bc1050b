//! Template engine for rendering the exported page.

use minijinja::{context, Environment, Value};
use serde::Serialize;

use pagesmith_model::{Banner, ContentDocument, ImageRef, Section, SectionBody, SectionKind};

use crate::resolve::ResolvedImages;
use crate::style::SectionStyle;

/// Banner data handed to the template.
#[derive(Debug, Clone, Serialize)]
pub struct BannerView {
    pub title: String,
    pub subtitle: String,
    pub image: Option<String>,
    pub cta_text: String,
    pub cta_link: String,
}

/// One service card.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceView {
    pub name: String,
    pub description: String,
    pub icon: Option<String>,
}

/// One gallery picture.
#[derive(Debug, Clone, Serialize)]
pub struct PictureView {
    pub url: String,
    pub alt: String,
}

/// A section ready for its kind's template.
#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    /// Name of the template that renders this section.
    pub template: &'static str,
    pub title: String,
    pub style: String,
    pub heading_style: String,
    pub content: String,
    pub image: Option<String>,
    pub items: Vec<ServiceView>,
    pub images: Vec<PictureView>,
}

/// Context for rendering the page template.
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    pub title: String,
    pub stylesheet: String,
    pub banner: BannerView,
    pub sections: Vec<SectionView>,
}

impl PageContext {
    /// Build the context for `doc`, taking images from `images`.
    pub fn build(
        doc: &ContentDocument,
        images: &ResolvedImages,
        fallback_title: &str,
        stylesheet: String,
    ) -> Self {
        let title = if doc.banner.title.trim().is_empty() {
            fallback_title.to_string()
        } else {
            doc.banner.title.clone()
        };

        Self {
            title,
            stylesheet,
            banner: banner_view(&doc.banner, images),
            sections: doc.sections.iter().map(|s| section_view(s, images)).collect(),
        }
    }
}

fn src(image: Option<&ImageRef>, images: &ResolvedImages) -> Option<String> {
    image
        .and_then(|image| images.resolve(image))
        .map(|image| image.as_str().to_string())
}

fn banner_view(banner: &Banner, images: &ResolvedImages) -> BannerView {
    let cta_link = if banner.cta_link.trim().is_empty() {
        "#".to_string()
    } else {
        banner.cta_link.clone()
    };

    BannerView {
        title: banner.title.clone(),
        subtitle: banner.subtitle.clone(),
        image: src(banner.background_image.as_ref(), images),
        cta_text: banner.cta_text.clone(),
        cta_link,
    }
}

fn section_view(section: &Section, images: &ResolvedImages) -> SectionView {
    let style = SectionStyle::from_styles(&section.styles);
    let kind = section.kind();

    let title = match (kind, section.title.trim().is_empty()) {
        (_, false) => section.title.clone(),
        (SectionKind::Text, true) => String::new(),
        (SectionKind::About, true) => "About Us".to_string(),
        (SectionKind::Services, true) => "Our Services".to_string(),
        (SectionKind::Gallery, true) => "Gallery".to_string(),
    };

    // Services headings always sit in the middle.
    let heading_align = match kind {
        SectionKind::Services => Some("center"),
        SectionKind::Text | SectionKind::About | SectionKind::Gallery => None,
    };

    let mut view = SectionView {
        template: template_name(kind),
        title,
        style: style.section_css(),
        heading_style: style.heading_css(heading_align),
        content: String::new(),
        image: None,
        items: Vec::new(),
        images: Vec::new(),
    };

    match &section.body {
        SectionBody::Text { content, image } | SectionBody::About { content, image } => {
            view.content = content.clone();
            view.image = src(image.as_ref(), images);
        }
        SectionBody::Services { items } => {
            view.items = items
                .iter()
                .map(|item| ServiceView {
                    name: if item.name.trim().is_empty() {
                        "Service".to_string()
                    } else {
                        item.name.clone()
                    },
                    description: item.description.clone(),
                    icon: src(item.icon.as_ref(), images),
                })
                .collect();
        }
        SectionBody::Gallery { images: pictures } => {
            view.images = pictures
                .iter()
                .filter_map(|picture| {
                    let url = src(Some(&picture.url), images)?;
                    let alt = if picture.alt.trim().is_empty() {
                        "Gallery item".to_string()
                    } else {
                        picture.alt.clone()
                    };
                    Some(PictureView { url, alt })
                })
                .collect();
        }
    }

    view
}

fn template_name(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Text => "text.html",
        SectionKind::About => "about.html",
        SectionKind::Services => "services.html",
        SectionKind::Gallery => "gallery.html",
    }
}

/// Escape a value for a double-quoted attribute.
///
/// Unlike the default HTML escaping this leaves `/` alone, which keeps URLs
/// and base64 payloads readable and compact.
fn attr_escape(value: String) -> Value {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    Value::from_safe_string(out)
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the page templates.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.add_filter("attr_escape", attr_escape);

        for (name, source) in TEMPLATES {
            env.add_template(name, source)
                .expect("Failed to add built-in template");
        }

        Self { env }
    }

    /// Render the whole page.
    pub fn render_page(&self, context: &PageContext) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("page.html")?;

        tmpl.render(context! {
            title => &context.title,
            stylesheet => &context.stylesheet,
            banner => &context.banner,
            sections => &context.sections,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const TEMPLATES: [(&str, &str); 6] = [
    ("page.html", PAGE_TEMPLATE),
    ("banner.html", BANNER_TEMPLATE),
    ("text.html", TEXT_TEMPLATE),
    ("about.html", ABOUT_TEMPLATE),
    ("services.html", SERVICES_TEMPLATE),
    ("gallery.html", GALLERY_TEMPLATE),
];

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{{ title }}</title>
  <style>{{ stylesheet | safe }}</style>
</head>
<body>
{% include "banner.html" %}
<main>
{% for section in sections %}{% include section.template %}
{% endfor %}</main>
</body>
</html>
"##;

const BANNER_TEMPLATE: &str = r##"<header class="banner">
  <div class="banner-frame">
    {% if banner.image %}<img class="banner-image" src="{{ banner.image | attr_escape }}" alt="Website Banner">{% else %}<div class="banner-placeholder"></div>{% endif %}
    <div class="banner-overlay"></div>
    <div class="banner-content">
      <div class="banner-card">
        {% if banner.title %}<h1>{{ banner.title }}</h1>{% endif %}
        {% if banner.subtitle %}<p>{{ banner.subtitle }}</p>{% endif %}
        {% if banner.cta_text %}<div class="banner-cta"><a href="{{ banner.cta_link | attr_escape }}">{{ banner.cta_text }}</a></div>{% endif %}
      </div>
    </div>
  </div>
</header>"##;

const TEXT_TEMPLATE: &str = r##"<section style="{{ section.style }}">
  <div class="section-content">
    {% if section.title %}<h2 style="{{ section.heading_style }}">{{ section.title }}</h2>{% endif %}
    {% if section.image %}<div class="section-image"><img src="{{ section.image | attr_escape }}" alt="{{ section.title }}"></div>{% endif %}
    <p class="justified">{{ section.content }}</p>
  </div>
</section>"##;

const ABOUT_TEMPLATE: &str = r##"<section style="{{ section.style }}">
  <div class="section-content">
    <h2 style="{{ section.heading_style }}">{{ section.title }}</h2>
    {% if section.image %}<div class="section-image"><img src="{{ section.image | attr_escape }}" alt="{{ section.title }}"></div>{% endif %}
    <p class="justified">{{ section.content }}</p>
  </div>
</section>"##;

const SERVICES_TEMPLATE: &str = r##"<section style="{{ section.style }}">
  <h2 style="{{ section.heading_style }}">{{ section.title }}</h2>
  <div class="services-grid">
    {% for item in section.items %}<div class="service-card">
      {% if item.icon %}<div class="service-icon"><img src="{{ item.icon | attr_escape }}" alt="{{ item.name }}"></div>{% endif %}
      <h3>{{ item.name }}</h3>
      {% if item.description %}<p>{{ item.description }}</p>{% endif %}
    </div>
    {% endfor %}
  </div>
</section>"##;

const GALLERY_TEMPLATE: &str = r##"<section style="{{ section.style }}">
  <h2 style="{{ section.heading_style }}">{{ section.title }}</h2>
  <div class="image-gallery">
    {% for image in section.images %}<div class="gallery-item"><img src="{{ image.url | attr_escape }}" alt="{{ image.alt }}"></div>
    {% endfor %}
  </div>
</section>"##;

#[cfg(test)]
mod tests {
    use super::*;
    use pagesmith_model::{GalleryImage, ServiceItem, StyleSet, TextAlign};

    fn render(doc: &ContentDocument) -> String {
        let context = PageContext::build(doc, &ResolvedImages::default(), "My Website", String::new());
        TemplateEngine::new().render_page(&context).unwrap()
    }

    fn with_body(kind: SectionKind, title: &str, body: SectionBody) -> Section {
        Section {
            body,
            ..Section::new(1, kind, title)
        }
    }

    #[test]
    fn title_falls_back_when_banner_title_is_empty() {
        let doc = ContentDocument::new(Banner::default(), vec![]);

        let html = render(&doc);

        assert!(html.contains("<title>My Website</title>"));
        assert!(!html.contains("<h1>"));
        assert!(!html.contains("banner-cta"));
        assert!(html.contains("banner-placeholder"));
    }

    #[test]
    fn renders_banner_fields() {
        let html = render(&ContentDocument::default());

        assert!(html.contains("<title>Welcome to Our Website</title>"));
        assert!(html.contains("<h1>Welcome to Our Website</h1>"));
        assert!(html.contains("<p>Discover amazing content</p>"));
        assert!(html.contains(r##"<a href="#">Learn More</a>"##));
    }

    #[test]
    fn escapes_user_text() {
        let doc = ContentDocument::new(
            Banner {
                title: "<script>alert(1)</script>".into(),
                ..Default::default()
            },
            vec![],
        );

        let html = render(&doc);

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn section_titles_fall_back_per_kind() {
        let doc = ContentDocument::new(
            Banner::default(),
            vec![
                Section::new(1, SectionKind::About, ""),
                Section::new(2, SectionKind::Services, ""),
                Section::new(3, SectionKind::Gallery, ""),
                Section::new(4, SectionKind::Text, ""),
            ],
        );

        let html = render(&doc);

        assert!(html.contains(">About Us</h2>"));
        assert!(html.contains(">Our Services</h2>"));
        assert!(html.contains(">Gallery</h2>"));
        assert_eq!(html.matches("<h2").count(), 3);
    }

    #[test]
    fn services_and_gallery_items_render() {
        let doc = ContentDocument::new(
            Banner::default(),
            vec![
                with_body(
                    SectionKind::Services,
                    "What we do",
                    SectionBody::Services {
                        items: vec![ServiceItem {
                            id: 1,
                            name: String::new(),
                            description: "Fast".into(),
                            icon: Some(ImageRef::parse("https://x.test/i.png")),
                        }],
                    },
                ),
                with_body(
                    SectionKind::Gallery,
                    "Pics",
                    SectionBody::Gallery {
                        images: vec![GalleryImage {
                            id: 2,
                            url: ImageRef::parse("https://x.test/a.png?w=1&h=2"),
                            alt: String::new(),
                        }],
                    },
                ),
            ],
        );

        let html = render(&doc);

        assert!(html.contains("<h3>Service</h3>"));
        assert!(html.contains(r#"src="https://x.test/i.png""#));
        assert!(html.contains(r#"src="https://x.test/a.png?w=1&amp;h=2" alt="Gallery item""#));
        assert!(html.contains("text-align: center;"));
    }

    #[test]
    fn only_services_headings_are_centered() {
        let right = StyleSet {
            text_align: Some(TextAlign::Right),
            ..Default::default()
        };
        let doc = ContentDocument::new(
            Banner::default(),
            vec![
                Section {
                    styles: right.clone(),
                    ..Section::new(1, SectionKind::Gallery, "Pics")
                },
                Section {
                    styles: right,
                    ..Section::new(2, SectionKind::Services, "Offer")
                },
            ],
        );

        let html = render(&doc);

        assert!(html.contains(r#"<h2 style="color: #000000; text-align: right;">Pics</h2>"#));
        assert!(html.contains(r#"<h2 style="color: #000000; text-align: center;">Offer</h2>"#));
    }

    #[test]
    fn attr_escape_keeps_slashes() {
        let value = attr_escape("data:image/png;base64,ab/+\"".to_string());
        assert_eq!(value.to_string(), "data:image/png;base64,ab/+&quot;");
    }
}

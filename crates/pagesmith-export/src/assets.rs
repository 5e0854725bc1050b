//! The stylesheet embedded in every exported page.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// The base stylesheet.
    pub fn stylesheet() -> String {
        BASE_CSS.to_string()
    }

    /// The stylesheet, minified when `minify` is set. A minifier failure
    /// keeps the original text.
    pub fn embedded_stylesheet(minify: bool) -> String {
        let css = Self::stylesheet();
        if !minify {
            return css;
        }
        match Self::minify_css(&css) {
            Ok(minified) => minified,
            Err(e) => {
                tracing::warn!("Keeping unminified stylesheet: {}", e);
                css
            }
        }
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

// Section colours, padding and alignment are inline on each section; this
// sheet only carries layout shared by every page.
const BASE_CSS: &str = r#"body {
  font-family: Arial, sans-serif;
  line-height: 1.6;
  margin: 0;
  padding: 0;
  color: #333;
}

img {
  max-width: 100%;
  height: auto;
}

/* Banner */
.banner {
  padding: 2rem;
  box-sizing: border-box;
}

.banner-frame {
  position: relative;
  width: 100%;
  max-width: 1097px;
  aspect-ratio: 1097 / 520;
  margin: 0 auto;
  overflow: hidden;
}

.banner-image,
.banner-placeholder,
.banner-overlay {
  position: absolute;
  width: 100%;
  height: 100%;
}

.banner-image {
  object-fit: cover;
  object-position: center;
}

.banner-placeholder {
  background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
}

.banner-overlay {
  background-color: rgba(0, 0, 0, 0.3);
}

.banner-content {
  position: absolute;
  top: 0;
  left: 0;
  width: 100%;
  height: 100%;
  display: flex;
  align-items: center;
  justify-content: center;
  z-index: 2;
  padding: 0 2rem;
  box-sizing: border-box;
}

.banner-card {
  text-align: center;
  color: white;
  padding: 2rem;
  background-color: rgba(255, 255, 255, 0.15);
  backdrop-filter: blur(2px);
  border-radius: 12px;
  max-width: 40%;
}

.banner-card h1 {
  margin: 0;
  font-size: clamp(1.5rem, 4vw, 2.5rem);
  font-weight: 700;
  line-height: 1.2;
}

.banner-card p {
  font-size: clamp(0.9rem, 2vw, 1.25rem);
  margin: 1rem auto 0;
  max-width: 700px;
}

.banner-cta {
  margin-top: 2rem;
}

.banner-cta a {
  display: inline-block;
  padding: 0.75rem 1.5rem;
  background-color: #4caf50;
  color: white;
  text-decoration: none;
  border-radius: 30px;
  font-weight: bold;
  font-size: clamp(0.9rem, 2vw, 1rem);
  transition: transform 0.3s ease, box-shadow 0.3s ease;
}

.banner-cta a:hover {
  transform: scale(1.05);
  box-shadow: 0 5px 15px rgba(0, 0, 0, 0.2);
}

/* Sections */
section {
  margin: 20px 0;
}

.section-content {
  max-width: 1200px;
  margin: 0 auto;
  padding: 20px;
}

.section-content .justified {
  text-align: justify;
}

.services-grid {
  display: grid;
  grid-template-columns: repeat(auto-fill, minmax(250px, 1fr));
  gap: 20px;
  padding: 20px;
}

.service-card {
  border: 1px solid #ddd;
  padding: 15px;
  border-radius: 8px;
  text-align: center;
}

.service-icon img {
  width: 50px;
  height: 50px;
}

.image-gallery {
  display: grid;
  grid-template-columns: repeat(auto-fill, minmax(200px, 1fr));
  gap: 15px;
}

.gallery-item img {
  width: 100%;
  border-radius: 4px;
}
"#;

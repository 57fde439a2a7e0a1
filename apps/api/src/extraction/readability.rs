//! Main-content isolation via dom_smoothie's Readability port.
//!
//! Before the readability pass the HTML is rewritten with lol_html:
//! `<xml>` islands are dropped, and, when unlikely candidates are kept, the
//! class/id/role markers that would get an element pruned are removed so the
//! scorer judges it on its text alone. Job boards routinely wrap the posting
//! in containers named like sidebars or modals.

use dom_smoothie::{Config, Readability};
use lol_html::{element, HtmlRewriter, Settings};
use url::Url;

use crate::extraction::config::ReadabilityOptions;
use crate::extraction::error::ExtractionError;

/// Substrings that mark an element as probable boilerplate.
const UNLIKELY_MARKERS: &[&str] = &[
    "-ad-",
    "ai2html",
    "banner",
    "breadcrumbs",
    "combx",
    "comment",
    "community",
    "cover-wrap",
    "disqus",
    "extra",
    "footer",
    "gdpr",
    "header",
    "legends",
    "menu",
    "related",
    "remark",
    "replies",
    "rss",
    "shoutbox",
    "sidebar",
    "skyscraper",
    "social",
    "sponsor",
    "supplemental",
    "ad-break",
    "agegate",
    "pagination",
    "pager",
    "popup",
    "yom-remote",
];

/// Substrings that rescue an element from the unlikely list.
const MAYBE_CANDIDATE_MARKERS: &[&str] = &[
    "and", "article", "body", "column", "content", "main", "mathjax", "shadow",
];

const UNLIKELY_ROLES: &[&str] = &[
    "menu",
    "menubar",
    "complementary",
    "navigation",
    "alert",
    "alertdialog",
    "dialog",
];

/// Runs readability over one document.
#[derive(Debug, Clone)]
pub struct ReadabilityExtractor {
    options: ReadabilityOptions,
}

impl ReadabilityExtractor {
    pub fn new(options: ReadabilityOptions) -> Self {
        Self { options }
    }

    /// Returns the trimmed main-content text of `html`, resolving relative
    /// references against `base_url`.
    pub fn extract(&self, html: &str, base_url: &Url) -> Result<String, ExtractionError> {
        let prepared = self.prepare(html)?;

        let config = Config {
            char_threshold: self.options.char_threshold,
            ..Default::default()
        };

        let mut readability = Readability::new(prepared, Some(base_url.as_str()), Some(config))
            .map_err(|e| ExtractionError::Parse(e.to_string()))?;

        // dom_smoothie reports "nothing found" as an error.
        let article = readability
            .parse()
            .map_err(|_| ExtractionError::NoContent)?;

        let text = article.text_content.trim();
        if text.is_empty() {
            return Err(ExtractionError::NoContent);
        }

        Ok(text.to_string())
    }

    fn prepare(&self, html: &str) -> Result<String, ExtractionError> {
        if !self.options.strip_xml_islands && !self.options.keep_unlikely_candidates {
            return Ok(html.to_string());
        }

        let strip_xml = self.options.strip_xml_islands;
        let keep_unlikely = self.options.keep_unlikely_candidates;
        let mut output = Vec::with_capacity(html.len());

        let mut rewriter = HtmlRewriter::new(
            Settings {
                element_content_handlers: vec![
                    element!("xml", move |el| {
                        if strip_xml {
                            el.remove();
                        }
                        Ok(())
                    }),
                    element!("*", move |el| {
                        if !keep_unlikely {
                            return Ok(());
                        }
                        let class = el.get_attribute("class").unwrap_or_default();
                        let id = el.get_attribute("id").unwrap_or_default();
                        if is_unlikely_candidate(&format!("{class} {id}")) {
                            el.remove_attribute("class");
                            el.remove_attribute("id");
                        }
                        if el
                            .get_attribute("role")
                            .is_some_and(|role| is_unlikely_role(&role))
                        {
                            el.remove_attribute("role");
                        }
                        Ok(())
                    }),
                ],
                ..Settings::default()
            },
            |c: &[u8]| output.extend_from_slice(c),
        );

        rewriter
            .write(html.as_bytes())
            .map_err(|e| ExtractionError::Parse(e.to_string()))?;
        rewriter
            .end()
            .map_err(|e| ExtractionError::Parse(e.to_string()))?;

        String::from_utf8(output).map_err(|e| ExtractionError::Parse(e.to_string()))
    }
}

fn is_unlikely_candidate(match_string: &str) -> bool {
    let lower = match_string.to_lowercase();
    UNLIKELY_MARKERS.iter().any(|m| lower.contains(m))
        && !MAYBE_CANDIDATE_MARKERS.iter().any(|m| lower.contains(m))
}

fn is_unlikely_role(role: &str) -> bool {
    UNLIKELY_ROLES.contains(&role.trim().to_lowercase().as_str())
}

//! Page model parsed from rendered documentation HTML
//!
//! A [`Page`] is everything the widget engine needs to know about one rendered
//! article: declared pickers, picker-gated sections, the minitoc, every link
//! (classified once, here, for hover card eligibility) and code samples that
//! carry a hostname placeholder.

use std::collections::{BTreeMap, HashMap};

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};
use crate::types::{PickerKind, PickerSelection};

/// A picker declared by the page, with the options it offers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerDecl {
    pub kind: PickerKind,
    pub options: Vec<String>,
    pub default: String,
}

impl PickerDecl {
    pub fn offers(&self, value: &str) -> bool {
        self.options.iter().any(|o| o == value)
    }
}

/// A block of content shown only for particular picker selections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSection {
    pub id: String,
    pub requires: Vec<PickerSelection>,
}

impl ContentSection {
    /// Visible when, for every kind it mentions, the current selection is one
    /// of the values listed for that kind.
    pub fn is_visible(&self, current: &BTreeMap<PickerKind, String>) -> bool {
        let mut by_kind: BTreeMap<PickerKind, Vec<&str>> = BTreeMap::new();
        for req in &self.requires {
            by_kind.entry(req.kind).or_default().push(req.value.as_str());
        }
        by_kind.iter().all(|(kind, values)| {
            current
                .get(kind)
                .is_some_and(|selected| values.contains(&selected.as_str()))
        })
    }
}

/// Secondary table of contents entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinitocEntry {
    pub anchor: String,
    pub title: String,
    /// Id of the picker-gated section that contains the anchor target
    pub gating_section: Option<String>,
}

/// Where a link sits on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// Internal content link inside the main article body
    Article,
    /// Sidebar / header navigation
    Navigation,
    /// Minitoc entry
    Minitoc,
    /// Points off-site
    External,
    /// In-page anchors and anything outside the article body
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub id: String,
    pub href: String,
    pub text: String,
    pub kind: LinkKind,
    pub hovercard_eligible: bool,
}

/// A code block whose rendering depends on the resolved version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSample {
    pub id: String,
    pub template: String,
}

impl CodeSample {
    pub fn render(&self, placeholder: &str, hostname: &str) -> String {
        if placeholder.is_empty() {
            return self.template.clone();
        }
        self.template.replace(placeholder, hostname)
    }
}

/// One rendered documentation page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub path: String,
    pub title: String,
    pub intro: Option<String>,
    pub pickers: Vec<PickerDecl>,
    pub sections: Vec<ContentSection>,
    pub minitoc: Vec<MinitocEntry>,
    pub links: Vec<PageLink>,
    pub code_samples: Vec<CodeSample>,
    pub has_survey: bool,
}

impl Page {
    pub fn picker(&self, kind: PickerKind) -> Option<&PickerDecl> {
        self.pickers.iter().find(|p| p.kind == kind)
    }

    pub fn link(&self, id: &str) -> Option<&PageLink> {
        self.links.iter().find(|l| l.id == id)
    }

    /// Parse rendered HTML.
    ///
    /// `site_host` decides which absolute links count as external; `None`
    /// treats every absolute `http(s)` link as external.
    pub fn from_html(path: &str, site_host: Option<&str>, html: &str) -> Result<Page> {
        let doc = Html::parse_document(html);

        let title = first_text(&doc, "h1")?
            .or(first_text(&doc, "title")?)
            .unwrap_or_else(|| path.to_string());
        let intro = first_text(&doc, "[data-intro], .lead")?;

        let pickers = parse_pickers(&doc)?;
        let (sections, section_nodes) = parse_sections(&doc)?;

        // Map element ids to the gated section that contains them so minitoc
        // entries can follow section visibility.
        let mut gating_by_anchor: HashMap<String, String> = HashMap::new();
        for el in doc.select(&selector("[id]")?) {
            let Some(anchor) = el.value().id() else {
                continue;
            };
            let gate = std::iter::once(el)
                .chain(el.ancestors().filter_map(ElementRef::wrap))
                .find_map(|node| {
                    section_nodes
                        .iter()
                        .find(|(section, _)| *section == node)
                        .map(|(_, id)| id.clone())
                });
            if let Some(section_id) = gate {
                gating_by_anchor.insert(anchor.to_string(), section_id);
            }
        }

        let minitoc = doc
            .select(&selector("[data-minitoc] a[href^=\"#\"]")?)
            .filter_map(|a| {
                let anchor = a.value().attr("href")?.trim_start_matches('#').to_string();
                Some(MinitocEntry {
                    gating_section: gating_by_anchor.get(&anchor).cloned(),
                    title: collapse_ws(&a.text().collect::<String>()),
                    anchor,
                })
            })
            .collect();

        let links = doc
            .select(&selector("a[href]")?)
            .enumerate()
            .filter_map(|(index, a)| {
                let href = a.value().attr("href")?.trim().to_string();
                let id = a
                    .value()
                    .attr("data-link-id")
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("link-{index}"));
                let kind = classify_link(a, &href, site_host);
                Some(PageLink {
                    id,
                    text: collapse_ws(&a.text().collect::<String>()),
                    hovercard_eligible: kind == LinkKind::Article,
                    href,
                    kind,
                })
            })
            .collect();

        let code_samples = doc
            .select(&selector("pre[data-code-sample]")?)
            .enumerate()
            .map(|(index, pre)| CodeSample {
                id: pre
                    .value()
                    .attr("data-code-sample")
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("sample-{index}")),
                template: pre.text().collect(),
            })
            .collect();

        let has_survey = doc
            .select(&selector("[data-survey=\"off\"]")?)
            .next()
            .is_none();

        Ok(Page {
            path: path.to_string(),
            title,
            intro,
            pickers,
            sections,
            minitoc,
            links,
            code_samples,
            has_survey,
        })
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::page(format!("bad selector {css}: {e}")))
}

fn collapse_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn first_text(doc: &Html, css: &str) -> Result<Option<String>> {
    Ok(doc
        .select(&selector(css)?)
        .map(|el| collapse_ws(&el.text().collect::<String>()))
        .find(|t| !t.is_empty()))
}

fn parse_pickers(doc: &Html) -> Result<Vec<PickerDecl>> {
    let option_sel = selector("[data-option]")?;
    let mut pickers: Vec<PickerDecl> = Vec::new();

    for el in doc.select(&selector("[data-picker]")?) {
        let Some(kind) = el
            .value()
            .attr("data-picker")
            .and_then(|k| k.parse::<PickerKind>().ok())
        else {
            tracing::debug!("Skipping picker with unknown kind");
            continue;
        };
        if pickers.iter().any(|p| p.kind == kind) {
            continue;
        }

        let mut options: Vec<String> = Vec::new();
        for opt in el.select(&option_sel) {
            if let Some(value) = opt.value().attr("data-option") {
                if !value.is_empty() && !options.iter().any(|o| o == value) {
                    options.push(value.to_string());
                }
            }
        }
        let Some(first) = options.first().cloned() else {
            continue;
        };
        let default = el
            .value()
            .attr("data-default")
            .filter(|d| options.iter().any(|o| o == d))
            .map(str::to_string)
            .unwrap_or(first);

        pickers.push(PickerDecl {
            kind,
            options,
            default,
        });
    }

    Ok(pickers)
}

fn parse_sections(doc: &Html) -> Result<(Vec<ContentSection>, Vec<(ElementRef<'_>, String)>)> {
    let mut sections = Vec::new();
    let mut nodes = Vec::new();

    for (index, el) in doc.select(&selector("[data-requires]")?).enumerate() {
        let requires: Vec<PickerSelection> = el
            .value()
            .attr("data-requires")
            .unwrap_or_default()
            .split_whitespace()
            .filter_map(PickerSelection::parse)
            .collect();
        if requires.is_empty() {
            continue;
        }
        let id = el
            .value()
            .id()
            .map(str::to_string)
            .unwrap_or_else(|| format!("section-{index}"));
        nodes.push((el, id.clone()));
        sections.push(ContentSection { id, requires });
    }

    Ok((sections, nodes))
}

fn classify_link(a: ElementRef<'_>, href: &str, site_host: Option<&str>) -> LinkKind {
    if is_external(href, site_host) {
        return LinkKind::External;
    }

    let mut in_body = false;
    for anc in a.ancestors().filter_map(ElementRef::wrap) {
        let el = anc.value();
        if el.attr("data-minitoc").is_some() {
            return LinkKind::Minitoc;
        }
        if el.name() == "nav" || el.attr("data-sidebar").is_some() {
            return LinkKind::Navigation;
        }
        if matches!(el.name(), "main" | "article") || el.attr("data-article-body").is_some() {
            in_body = true;
            break;
        }
    }

    if in_body && !href.starts_with('#') {
        LinkKind::Article
    } else {
        LinkKind::Other
    }
}

fn is_external(href: &str, site_host: Option<&str>) -> bool {
    let lower = href.to_ascii_lowercase();
    if lower.starts_with("mailto:") || lower.starts_with("tel:") {
        return true;
    }
    let absolute = if lower.starts_with("//") {
        format!("https:{href}")
    } else if lower.starts_with("http://") || lower.starts_with("https://") {
        href.to_string()
    } else {
        return false;
    };
    match (Url::parse(&absolute), site_host) {
        (Ok(url), Some(host)) => url.host_str() != Some(host),
        _ => true,
    }
}

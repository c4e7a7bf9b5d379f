// src/services/extract.rs

//! Record extraction from raw results pages.
//!
//! Turns one result unit into one [`Article`]. Missing sub-fields degrade to
//! sentinel values; only a unit with no title element at all is skipped.

use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::models::{Article, NO_ATTRIBUTION, NO_LINK, UNDATED};
use crate::utils::resolve_url;

/// Everything extracted from one raw results page.
#[derive(Debug, Default)]
pub struct PageExtraction {
    /// Successfully extracted articles, in page order
    pub articles: Vec<Article>,
    /// Number of raw result units on the page, including skipped ones.
    /// Pagination termination is decided on this count, not on `articles`.
    pub raw_count: usize,
    /// Units dropped because they had no title element
    pub skipped: usize,
}

fn selector(cell: &'static OnceLock<Selector>, css: &'static str) -> &'static Selector {
    cell.get_or_init(|| Selector::parse(css).expect("static selector"))
}

fn result_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    selector(&SEL, "div.gs_ri")
}

fn title_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    selector(&SEL, "h3.gs_rt")
}

fn anchor_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    selector(&SEL, "a")
}

fn byline_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    selector(&SEL, "div.gs_a")
}

fn period_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\b((?:19|20)\d{2})\s*-?\s*(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)?",
        )
        .expect("static regex")
    })
}

/// Parse one raw results page into articles.
pub fn parse_page(html: &str, base: &Url) -> PageExtraction {
    let document = Html::parse_document(html);
    let mut extraction = PageExtraction::default();

    for row in document.select(result_selector()) {
        extraction.raw_count += 1;
        match parse_result(row, base) {
            Some(article) => extraction.articles.push(article),
            None => {
                extraction.skipped += 1;
                log::warn!(
                    "Skipping result unit {} without a title element",
                    extraction.raw_count
                );
            }
        }
    }

    extraction
}

/// Parse one result unit. `None` means the unit had no title element.
fn parse_result(row: ElementRef<'_>, base: &Url) -> Option<Article> {
    let title_elem = row.select(title_selector()).next()?;
    let title = normalize_whitespace(&title_elem.text().collect::<String>());

    let link = title_elem
        .select(anchor_selector())
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|href| resolve_url(base, href))
        .unwrap_or_else(|| NO_LINK.to_string());

    let attribution = row
        .select(byline_selector())
        .next()
        .map(|el| normalize_whitespace(&el.text().collect::<String>()))
        .unwrap_or_else(|| NO_ATTRIBUTION.to_string());

    let period = extract_period(&attribution);

    Some(Article {
        title,
        link,
        attribution,
        period,
    })
}

/// Extract a "YEAR [MONTH]" token from a byline.
///
/// Matches a 4-digit year in 1900-2099, optionally followed by a separator
/// and a 3-letter month abbreviation. Falls back to [`UNDATED`].
pub fn extract_period(attribution: &str) -> String {
    match period_regex().captures(attribution) {
        Some(caps) => {
            let year = caps.get(1).map_or("", |m| m.as_str());
            match caps.get(2) {
                Some(month) => format!("{} {}", year, month.as_str()),
                None => year.to_string(),
            }
        }
        None => UNDATED.to_string(),
    }
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://scholar.google.com/scholar").unwrap()
    }

    fn page(units: &str) -> String {
        format!("<html><body><div id=\"gs_res_ccl_mid\">{units}</div></body></html>")
    }

    const FULL_UNIT: &str = r#"
        <div class="gs_ri">
          <h3 class="gs_rt"><a href="https://example.com/paper/1">BioGems:  a toolkit</a></h3>
          <div class="gs_a">A Author, B Author - Bioinformatics, 2024 - academic.oup.com</div>
        </div>"#;

    #[test]
    fn test_parse_full_unit() {
        let extraction = parse_page(&page(FULL_UNIT), &base());
        assert_eq!(extraction.raw_count, 1);
        assert_eq!(extraction.skipped, 0);

        let article = &extraction.articles[0];
        assert_eq!(article.title, "BioGems: a toolkit");
        assert_eq!(article.link, "https://example.com/paper/1");
        assert_eq!(
            article.attribution,
            "A Author, B Author - Bioinformatics, 2024 - academic.oup.com"
        );
        assert_eq!(article.period, "2024");
    }

    #[test]
    fn test_missing_link_degrades_to_sentinel() {
        let unit = r#"
            <div class="gs_ri">
              <h3 class="gs_rt">[CITATION] Uncited work</h3>
              <div class="gs_a">C Author - 2023</div>
            </div>"#;
        let extraction = parse_page(&page(unit), &base());
        assert_eq!(extraction.articles[0].link, NO_LINK);
        assert_eq!(extraction.articles[0].period, "2023");
    }

    #[test]
    fn test_missing_byline_degrades_to_sentinel() {
        let unit = r#"
            <div class="gs_ri">
              <h3 class="gs_rt"><a href="/paper/2">Relative link</a></h3>
            </div>"#;
        let extraction = parse_page(&page(unit), &base());
        assert_eq!(extraction.articles[0].attribution, NO_ATTRIBUTION);
        assert_eq!(extraction.articles[0].period, UNDATED);
        // Relative hrefs resolve against the source base
        assert_eq!(
            extraction.articles[0].link,
            "https://scholar.google.com/paper/2"
        );
    }

    #[test]
    fn test_unit_without_title_is_skipped() {
        let unit = r#"<div class="gs_ri"><div class="gs_a">orphan byline</div></div>"#;
        let html = page(&format!("{unit}{FULL_UNIT}"));
        let extraction = parse_page(&html, &base());

        assert_eq!(extraction.raw_count, 2);
        assert_eq!(extraction.skipped, 1);
        assert_eq!(extraction.articles.len(), 1);
    }

    #[test]
    fn test_extract_period_variants() {
        assert_eq!(extract_period("A Author - Nature, 2024 - nature.com"), "2024");
        assert_eq!(extract_period("B Author - bioRxiv, 2025 Mar"), "2025 Mar");
        assert_eq!(extract_period("C Author - Cell, 2023-Dec - cell.com"), "2023 Dec");
        assert_eq!(extract_period("no year here"), UNDATED);
        assert_eq!(extract_period(""), UNDATED);
    }

    #[test]
    fn test_extract_period_rejects_implausible_years() {
        assert_eq!(extract_period("volume 3137 of LNCS"), UNDATED);
        assert_eq!(extract_period("published 1897"), UNDATED);
    }
}

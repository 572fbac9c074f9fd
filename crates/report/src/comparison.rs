use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use crate::types::{FileCode, PairwiseDetail};

pub const FALLBACK_FILE1: &str = "File 1";
pub const FALLBACK_FILE2: &str = "File 2";

static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("static selector"));
static MATCHES_FOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Matches for (.*) and (.*)").expect("static regex"));

/// Read the two file names from a comparison page title of the form
/// `Matches for X and Y`.
///
/// Pages whose title does not have that shape get the placeholder names
/// [`FALLBACK_FILE1`] and [`FALLBACK_FILE2`].
pub fn parse_comparison_title(html: &str, source_url: &str) -> PairwiseDetail {
    let document = Html::parse_document(html);
    let title: String = document
        .select(&TITLE_SELECTOR)
        .flat_map(|title| title.text())
        .collect();

    let (name1, name2) = match MATCHES_FOR.captures(title.trim()) {
        Some(caps) => (caps[1].trim().to_string(), caps[2].trim().to_string()),
        None => (FALLBACK_FILE1.to_string(), FALLBACK_FILE2.to_string()),
    };

    PairwiseDetail {
        file1: FileCode::named(name1),
        file2: FileCode::named(name2),
        source_url: source_url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://moss.stanford.edu/results/1/2/match0.html";

    #[test]
    fn extracts_names_from_title() {
        let html = "<html><head><title>Matches for alice.py and bob.py</title></head></html>";
        let detail = parse_comparison_title(html, URL);

        assert_eq!(detail.file1.name, "alice.py");
        assert_eq!(detail.file2.name, "bob.py");
        assert!(detail.file1.code.is_empty());
        assert!(detail.file2.code.is_empty());
        assert_eq!(detail.source_url, URL);
    }

    #[test]
    fn trims_whitespace_around_names() {
        let html = "<title>\n  Matches for  /tmp/moss-x/a.c   and  /tmp/moss-x/b.c \n</title>";
        let detail = parse_comparison_title(html, URL);

        assert_eq!(detail.file1.name, "/tmp/moss-x/a.c");
        assert_eq!(detail.file2.name, "/tmp/moss-x/b.c");
    }

    #[test]
    fn unmatched_title_falls_back_to_placeholders() {
        let detail = parse_comparison_title("<title>Something else</title>", URL);
        assert_eq!(detail.file1.name, FALLBACK_FILE1);
        assert_eq!(detail.file2.name, FALLBACK_FILE2);

        let detail = parse_comparison_title("<p>no title at all</p>", URL);
        assert_eq!(detail.file1.name, FALLBACK_FILE1);
        assert_eq!(detail.file2.name, FALLBACK_FILE2);
    }

    #[test]
    fn serializes_source_url_in_camel_case() {
        let detail = parse_comparison_title("<title>Matches for a and b</title>", URL);
        let json = serde_json::to_value(&detail).unwrap();

        assert_eq!(json["sourceUrl"], URL);
        assert_eq!(json["file1"]["code"], serde_json::json!([]));
    }
}

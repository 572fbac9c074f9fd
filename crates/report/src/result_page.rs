use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::types::{ComparisonRecord, FileMatch};

static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table tr").expect("static selector"));
static CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("static selector"));
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("static selector"));

/// `name (NN%)` as printed in the first two columns.
static NAME_PERCENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*)\s+\((\d+)%\)$").expect("static regex"));

/// Parse a MOSS result page into one record per well-formed table row.
///
/// The first row of the document is the header and is always skipped. A row
/// contributes a record only when it has at least three cells and both of the
/// first two match `name (NN%)`. The third cell is read as a line count; a
/// count that does not start with digits becomes zero.
pub fn parse_result_page(html: &str) -> Vec<ComparisonRecord> {
    let document = Html::parse_document(html);
    let mut records = Vec::new();

    for (index, row) in document.select(&ROW_SELECTOR).enumerate().skip(1) {
        let cells: Vec<ElementRef<'_>> = row.select(&CELL_SELECTOR).collect();
        if cells.len() < 3 {
            continue;
        }

        let first = cell_text(&cells[0]);
        let second = cell_text(&cells[1]);
        let (Some(file1), Some(file2)) = (parse_file_match(&first), parse_file_match(&second))
        else {
            tracing::trace!(row = index, "skipping result row without name/percentage pair");
            continue;
        };

        records.push(ComparisonRecord {
            file1,
            file2,
            lines_matched: leading_count(&cell_text(&cells[2])),
            comparison_url: cells[0]
                .select(&LINK_SELECTOR)
                .next()
                .and_then(|link| link.value().attr("href"))
                .map(str::to_string),
        });
    }

    records
}

fn cell_text(cell: &ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn parse_file_match(text: &str) -> Option<FileMatch> {
    let caps = NAME_PERCENT.captures(text)?;
    let percentage = caps.get(2)?.as_str().parse().ok()?;
    Some(FileMatch {
        name: caps.get(1)?.as_str().to_string(),
        percentage,
    })
}

/// Leading run of ASCII digits, so `"12 lines"` reads as 12.
fn leading_count(text: &str) -> u64 {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    text[..end].parse().unwrap_or(0)
}

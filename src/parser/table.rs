use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::ExtractError;

static LINK_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

/// A table row before validation. `position` is 1-based over all rows, header included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub position: usize,
    /// `id` attribute of the first cell; `None` for header rows.
    pub code: Option<String>,
    /// Link text of the second cell, falling back to the cell text.
    pub name: Option<String>,
}

/// First element matching `selector`.
pub fn find_table<'a>(document: &'a Html, selector: &str) -> Result<ElementRef<'a>, ExtractError> {
    let sel = Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })?;
    document
        .select(&sel)
        .next()
        .ok_or_else(|| ExtractError::TableNotFound {
            selector: selector.to_string(),
        })
}

/// Walk the table's rows in document order. Empty rows are dropped.
pub fn rows(table: ElementRef<'_>) -> Vec<RawRow> {
    let mut out = Vec::new();
    for tr in row_elements(table) {
        let cells: Vec<ElementRef> = child_elements(tr)
            .filter(|c| matches!(c.value().name(), "td" | "th"))
            .collect();
        let Some(first) = cells.first() else {
            continue;
        };
        out.push(RawRow {
            position: out.len() + 1,
            code: first.value().attr("id").map(str::to_string),
            name: cells.get(1).map(|cell| cell_name(*cell)),
        });
    }
    out
}

/// `<tr>` elements directly under the table or under its row groups.
fn row_elements(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut trs = Vec::new();
    for child in child_elements(table) {
        match child.value().name() {
            "tr" => trs.push(child),
            "thead" | "tbody" | "tfoot" => {
                trs.extend(child_elements(child).filter(|c| c.value().name() == "tr"));
            }
            _ => {}
        }
    }
    trs
}

fn child_elements(el: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    el.children().filter_map(ElementRef::wrap)
}

fn cell_name(cell: ElementRef<'_>) -> String {
    match cell.select(&LINK_SEL).next() {
        Some(link) => link.text().collect(),
        None => cell.text().collect(),
    }
}

//! DOM helpers shared by the timetable and exam decoders.

use scraper::{ElementRef, Html, Node, Selector};

use crate::error::{TimetableError, TimetableResult};

/// Position of the weekly timetable among the document's tables.
pub const TIMETABLE_INDEX: usize = 1;
/// Position of the exam schedule among the document's tables.
pub const EXAM_TABLE_INDEX: usize = 2;

/// Return the `index`-th `<table>` of the document, in document order.
pub fn nth_table(document: &Html, index: usize) -> TimetableResult<ElementRef<'_>> {
    let selector = Selector::parse("table").map_err(|_| TimetableError::MissingTable(index))?;
    document
        .select(&selector)
        .nth(index)
        .ok_or(TimetableError::MissingTable(index))
}

/// Get direct child rows from a table element (not nested table rows).
///
/// Parsed documents wrap bare `<tr>` in an implicit `<tbody>`, so rows are
/// collected from both the table itself and its row-group children.
pub fn direct_rows<'a>(table: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let mut rows = Vec::new();

    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => {
                rows.extend(
                    child
                        .children()
                        .filter_map(ElementRef::wrap)
                        .filter(|el| el.value().name() == "tr"),
                );
            }
            _ => {}
        }
    }

    rows
}

/// Direct `<td>`/`<th>` children of a row.
pub fn cells<'a>(row: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "td" | "th"))
        .collect()
}

/// Text content of an element with every `<br>` turned into a newline.
pub fn text_with_breaks(element: ElementRef<'_>) -> String {
    let mut text = String::new();

    for node in element.descendants() {
        match node.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(el) if el.name() == "br" => text.push('\n'),
            _ => {}
        }
    }

    text
}

/// Trimmed text of the `column`-th cell of a row, if the cell exists.
pub fn cell_text(row: ElementRef<'_>, column: usize) -> Option<String> {
    cells(row)
        .get(column)
        .map(|cell| text_with_breaks(*cell).trim().to_string())
}

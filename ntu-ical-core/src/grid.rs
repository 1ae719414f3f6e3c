//! Timetable grid decoding.
//!
//! Layout: the first row holds the day labels (after a corner cell), every
//! other row starts with an `HHMM-HHMM` slot cell. A class occupies one cell
//! with a `rowspan` covering its slots. Cells covered by a span from an
//! earlier row are absent from the markup, so a cell's position in its row
//! is shifted left by the spans still active to its left.

use scraper::ElementRef;
use tracing::debug;

use crate::block::RawBlock;
use crate::error::{TimetableError, TimetableResult};
use crate::html::{cells, direct_rows, text_with_breaks};

/// Begin and end halves of a row's `HHMM-HHMM` slot cell.
fn slot_bounds(row: ElementRef<'_>) -> (String, String) {
    let text = cells(row)
        .first()
        .map(|cell| text_with_breaks(*cell))
        .unwrap_or_default();

    let begin = text.split('-').next().unwrap_or_default().trim().to_string();
    let end = text.rsplit('-').next().unwrap_or_default().trim().to_string();
    (begin, end)
}

fn parse_rowspan(value: &str, row: usize) -> TimetableResult<usize> {
    match value.trim().parse::<usize>() {
        Ok(span) if span > 0 => Ok(span),
        _ => Err(TimetableError::InvalidRowspan {
            row,
            value: value.to_string(),
        }),
    }
}

/// Decode the timetable into raw blocks, in document order.
///
/// Cells without a `rowspan` attribute are free slots; spanning cells with no
/// visible text produce nothing.
pub fn decode_grid(table: ElementRef<'_>) -> TimetableResult<Vec<RawBlock>> {
    let rows = direct_rows(table);
    let (header, slots) = rows.split_first().ok_or(TimetableError::MissingDays)?;

    let days: Vec<String> = cells(*header)
        .into_iter()
        .skip(1)
        .map(|cell| text_with_breaks(cell).trim().to_string())
        .collect();
    if days.is_empty() {
        return Err(TimetableError::MissingDays);
    }

    // Rows each day column stays covered by a span started above.
    let mut remaining = vec![0usize; days.len()];
    let mut blocks = Vec::new();

    for (r, row) in slots.iter().enumerate() {
        let row_number = r + 2;
        let mut next_remaining: Vec<usize> =
            remaining.iter().map(|left| left.saturating_sub(1)).collect();

        for (index, cell) in cells(*row).into_iter().enumerate().skip(1) {
            let Some(rowspan) = cell.value().attr("rowspan") else {
                continue;
            };
            let rowspan = parse_rowspan(rowspan, row_number)?;

            let raw_index = index - 1;
            let covered = remaining
                .iter()
                .take(raw_index + 1)
                .filter(|left| **left > 0)
                .count();
            let column = raw_index + covered;

            let day = days.get(column).ok_or(TimetableError::ColumnOutOfRange {
                row: row_number,
                column,
                days: days.len(),
            })?;
            let last_row = r
                .checked_add(rowspan - 1)
                .and_then(|last| slots.get(last))
                .ok_or(TimetableError::MissingTerminalRow {
                    row: row_number,
                    rowspan,
                })?;

            let (begin, _) = slot_bounds(*row);
            let (_, end) = slot_bounds(*last_row);
            let raw = text_with_breaks(cell);

            if !raw.trim().is_empty() {
                blocks.push(RawBlock {
                    day: day.clone(),
                    begin,
                    end,
                    raw,
                });
            }

            next_remaining[column] = rowspan - 1;
        }

        remaining = next_remaining;
    }

    debug!(days = days.len(), rows = slots.len(), blocks = blocks.len(), "decoded timetable grid");

    Ok(blocks)
}

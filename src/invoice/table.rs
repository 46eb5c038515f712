//! Table recovery from invoice text.
//!
//! Contiguous runs of tabular-looking lines form a block; the block's
//! first line is its header and the remaining lines are data rows.
//! Header keywords map cells onto the named line-item fields.
//!
//! Tabular patterns detected per line:
//! - Tab-separated: "Item\tBatch\tQty"
//! - Pipe-separated: "Item | Batch | Qty"
//! - Multi-space aligned: "Paracetamol    B123    20"

use serde::Serialize;

/// Minimum number of cells for a data row to be kept.
const MIN_ROW_CELLS: usize = 2;

/// Minimum number of lines in a block: a header with no data rows is
/// not a table.
const MIN_BLOCK_LINES: usize = 2;

/// One recovered line item. `raw` always carries the original cells;
/// the named fields are filled when a header keyword matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceRow {
    pub raw: Vec<String>,
    pub description: Option<String>,
    pub batch: Option<String>,
    pub expiry: Option<String>,
    pub quantity: Option<String>,
    pub price: Option<String>,
}

/// Recover line items from one page of extracted text.
pub fn extract_rows_from_text(text: &str) -> Vec<InvoiceRow> {
    let mut rows = Vec::new();
    let mut block: Vec<Vec<String>> = Vec::new();

    for line in text.lines() {
        if is_tabular_line(line) {
            block.push(split_cells(line));
        } else if !block.is_empty() {
            flush_block(&mut rows, &block);
            block.clear();
        }
    }
    if !block.is_empty() {
        flush_block(&mut rows, &block);
    }

    rows
}

fn flush_block(out: &mut Vec<InvoiceRow>, block: &[Vec<String>]) {
    if block.len() < MIN_BLOCK_LINES {
        return;
    }
    let headers: Vec<String> = block[0].iter().map(|h| h.to_lowercase()).collect();

    for cells in &block[1..] {
        if cells.len() < MIN_ROW_CELLS {
            continue;
        }
        let mut row = InvoiceRow {
            raw: cells.clone(),
            description: None,
            batch: None,
            expiry: None,
            quantity: None,
            price: None,
        };
        for (i, cell) in cells.iter().enumerate() {
            let header = headers.get(i).map(String::as_str).unwrap_or("");
            assign_cell(&mut row, header, cell);
        }
        if row.description.is_none() {
            // No description column matched: the longest cell is the
            // most likely free-text item name.
            row.description = cells.iter().max_by_key(|c| c.len()).cloned();
        }
        out.push(row);
    }
}

fn assign_cell(row: &mut InvoiceRow, header: &str, cell: &str) {
    let value = Some(cell.to_string());
    if ["description", "item", "product", "medicine"]
        .iter()
        .any(|k| header.contains(k))
    {
        row.description = value;
    } else if header.contains("batch") {
        row.batch = value;
    } else if header.contains("exp") {
        row.expiry = value;
    } else if header.contains("qty") || header.contains("quantity") {
        row.quantity = value;
    } else if header.contains("price") || header.contains("rate") || header.contains("amount") {
        row.price = value;
    }
}

/// A line looks tabular if it has multiple columns separated by tabs,
/// pipes, or runs of 3+ spaces.
pub fn is_tabular_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.len() < 5 {
        return false;
    }
    if trimmed.matches('\t').count() >= 2 {
        return true;
    }
    if trimmed.matches('|').count() >= 2 {
        return true;
    }
    count_multi_space_gaps(trimmed) >= 2
}

/// Split a tabular line into trimmed, non-empty cells using the same
/// separators `is_tabular_line` detects.
pub fn split_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let parts: Vec<&str> = if trimmed.contains('\t') {
        trimmed.split('\t').collect()
    } else if trimmed.contains('|') {
        trimmed.split('|').collect()
    } else {
        split_on_multi_space(trimmed)
    };
    parts
        .into_iter()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

fn split_on_multi_space(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut gap_start = None;
    let mut gap_len = 0;

    for (i, ch) in text.char_indices() {
        if ch == ' ' {
            if gap_len == 0 {
                gap_start = Some(i);
            }
            gap_len += 1;
        } else {
            if gap_len >= 3 {
                if let Some(gs) = gap_start {
                    parts.push(&text[start..gs]);
                    start = i;
                }
            }
            gap_len = 0;
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Count runs of 3+ consecutive spaces separating non-empty segments.
fn count_multi_space_gaps(text: &str) -> usize {
    let mut count = 0;
    let mut in_gap = false;
    let mut gap_len = 0;

    for ch in text.chars() {
        if ch == ' ' {
            gap_len += 1;
            if gap_len >= 3 && !in_gap {
                in_gap = true;
                count += 1;
            }
        } else {
            in_gap = false;
            gap_len = 0;
        }
    }

    count
}

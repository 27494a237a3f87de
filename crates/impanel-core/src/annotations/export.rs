//! Markdown export of the working set

use super::types::Comment;

const HEADER: &str =
    "| Page No. | Page Name | Page Path | UI Component | Comment |\n| --- | --- | --- | --- | --- |\n";

/// Render comments as a pipe-delimited markdown table
///
/// One row per comment, in the given order, after the fixed two-line
/// header. An absent page number renders as an empty cell. Cell text is
/// emitted as-is, without escaping, and there is no newline after the
/// final row; the same comment sequence always produces byte-identical
/// output.
pub fn export_markdown(comments: &[Comment]) -> String {
    let rows: Vec<String> = comments
        .iter()
        .map(|c| {
            let page_number = c.page_number.map(|n| n.to_string()).unwrap_or_default();
            format!(
                "| {} | {} | {} | {} | {} |",
                page_number, c.page_name, c.page_path, c.ui_component, c.body
            )
        })
        .collect();
    format!("{}{}", HEADER, rows.join("\n"))
}

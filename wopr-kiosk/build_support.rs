//! Error formatting shared by the build script
//!
//! Also compiled into the binary's tests so the formatting is covered.

/// Inner width of the boxed error messages
const BOX_WIDTH: usize = 64;

/// Format error message lines with box drawing
pub fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| format!("║  {:<width$} ║", truncate_line(line, BOX_WIDTH), width = BOX_WIDTH))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Shorten a line to `width` characters, ending in `...` when cut
fn truncate_line(line: &str, width: usize) -> String {
    if line.chars().count() <= width {
        return line.to_string();
    }
    let cut = line
        .char_indices()
        .nth(width - 3)
        .map_or(line.len(), |(i, _)| i);
    format!("{}...", &line[..cut])
}

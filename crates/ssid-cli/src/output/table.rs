#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

const MIN_COLUMN: usize = 4;

/// Render an aligned text table. Widths are measured in characters so
/// non-ASCII SSIDs line up.
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(header.chars().count())
                .max(MIN_COLUMN)
        })
        .collect();

    shrink_to_fit(&mut widths, headers, options.max_width);

    // Headers follow their column's alignment.
    let numeric: Vec<bool> = (0..headers.len())
        .map(|index| {
            let mut cells = rows
                .iter()
                .filter_map(|row| row.get(index))
                .filter(|cell| cell.as_str() != "-")
                .peekable();
            cells.peek().is_some() && cells.all(|cell| looks_numeric(cell))
        })
        .collect();

    let header_line = headers
        .iter()
        .zip(&widths)
        .zip(&numeric)
        .map(|((header, width), right)| pad(&truncate(header, *width), *width, *right))
        .collect::<Vec<_>>()
        .join("  ");
    let divider = "-".repeat(header_line.chars().count());

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(header_line.trim_end().to_string());
    lines.push(divider.trim_end().to_string());
    for row in rows {
        let line = widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let cell = row.get(index).map_or("-", String::as_str);
                let text = truncate(cell, *width);
                let padded = pad(&text, *width, looks_numeric(&text));
                if options.color {
                    colorize(&text, padded)
                } else {
                    padded
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

/// Narrow the widest columns one character at a time until the table fits.
fn shrink_to_fit(widths: &mut [usize], headers: &[&str], max_width: Option<usize>) {
    let Some(max_width) = max_width else {
        return;
    };
    let separators = widths.len().saturating_sub(1) * 2;

    while widths.iter().sum::<usize>() + separators > max_width {
        let widest = widths
            .iter()
            .enumerate()
            .filter(|(idx, width)| **width > headers[*idx].chars().count().max(MIN_COLUMN))
            .max_by_key(|(_, width)| **width)
            .map(|(idx, _)| idx);
        let Some(idx) = widest else {
            break;
        };
        widths[idx] -= 1;
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 1 {
        return "…".to_string();
    }
    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}

fn pad(value: &str, width: usize, right_align: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(value.chars().count()));
    if right_align {
        format!("{fill}{value}")
    } else {
        format!("{value}{fill}")
    }
}

fn looks_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.' | '%'))
}

/// Wrap a padded cell in an ANSI color chosen from its plain text.
fn colorize(plain: &str, padded: String) -> String {
    let code = match plain.to_ascii_lowercase().as_str() {
        "resolved" | "true" | "ok" => "32",
        "not_found" | "transient" | "stale" => "33",
        "error" | "false" | "rejected" | "malformed" | "unauthorized" => "31",
        _ => return padded,
    };
    format!("\u{1b}[{code}m{padded}\u{1b}[0m")
}

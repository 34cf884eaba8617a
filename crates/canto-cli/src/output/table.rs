//! Aligned plain-text tables for the status and summary views.

const GAP: &str = "  ";

/// Columns are never shrunk below this or their header.
const MIN_COLUMN: usize = 4;

#[derive(Clone, Copy, Debug, Default)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Color family of a status cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tone {
    Good,
    Warn,
    Bad,
}

impl Tone {
    fn of(cell: &str) -> Option<Self> {
        let label = cell.trim().to_ascii_lowercase();
        let head = label.split_whitespace().next().unwrap_or_default();
        match head {
            "ok" | "complete" | "completed" | "succeeded" => Some(Self::Good),
            "missing" | "failed" | "cancelled" | "completed_with_errors" | "unknown_section" => {
                Some(Self::Bad)
            }
            "no_data" | "empty" | "skipped" | "stale" => Some(Self::Warn),
            _ if label == "no data" => Some(Self::Warn),
            _ => None,
        }
    }

    const fn ansi(self) -> &'static str {
        match self {
            Self::Good => "32",
            Self::Warn => "33",
            Self::Bad => "31",
        }
    }
}

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

/// Render `rows` under `headers`. Missing trailing cells show as `-`; counts
/// are right-aligned.
#[must_use]
pub fn render(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| display_width(cell))
                .fold(display_width(header), usize::max)
        })
        .collect();
    if let Some(limit) = options.max_width {
        shrink_to(&mut widths, headers, limit);
    }

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, &width)| pad(&clip(header, width), width, Align::Left))
        .collect::<Vec<_>>()
        .join(GAP);

    let mut out = String::new();
    out.push_str(&header_line);
    out.push('\n');
    out.push_str(&"-".repeat(display_width(&header_line)));

    for row in rows {
        let line = widths
            .iter()
            .enumerate()
            .map(|(col, &width)| {
                let cell = clip(row.get(col).map_or("-", String::as_str), width);
                let align = if is_count(&cell) { Align::Right } else { Align::Left };
                let padded = pad(&cell, width, align);
                match Tone::of(&cell).filter(|_| options.color) {
                    Some(tone) => format!("\u{1b}[{}m{padded}\u{1b}[0m", tone.ansi()),
                    None => padded,
                }
            })
            .collect::<Vec<_>>()
            .join(GAP);
        out.push('\n');
        out.push_str(&line);
    }
    out
}

/// Narrow the widest shrinkable column one step at a time until the row fits.
fn shrink_to(widths: &mut [usize], headers: &[&str], limit: usize) {
    let gaps = GAP.len() * widths.len().saturating_sub(1);
    let floor = |col: usize| display_width(headers[col]).max(MIN_COLUMN);
    while widths.iter().sum::<usize>() + gaps > limit {
        let Some(col) = (0..widths.len())
            .filter(|&col| widths[col] > floor(col))
            .max_by_key(|&col| widths[col])
        else {
            break;
        };
        widths[col] -= 1;
    }
}

fn display_width(text: &str) -> usize {
    text.chars().count()
}

fn clip(text: &str, width: usize) -> String {
    if display_width(text) <= width {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
    if width > 0 {
        clipped.push('…');
    }
    clipped
}

fn pad(text: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(display_width(text)));
    match align {
        Align::Left => format!("{text}{fill}"),
        Align::Right => format!("{fill}{text}"),
    }
}

fn is_count(cell: &str) -> bool {
    !cell.is_empty() && cell.bytes().all(|byte| byte.is_ascii_digit())
}

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// How a column aligns its cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: &'static str,
    pub max_width: Option<usize>,
    pub alignment: Alignment,
}

impl TableColumn {
    pub const fn left(header: &'static str) -> Self {
        Self {
            header,
            max_width: None,
            alignment: Alignment::Left,
        }
    }

    pub const fn right(header: &'static str) -> Self {
        Self {
            header,
            max_width: None,
            alignment: Alignment::Right,
        }
    }

    pub const fn capped(mut self, max_width: usize) -> Self {
        self.max_width = Some(max_width);
        self
    }
}

/// Column metadata plus rows of already formatted cells.
pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<TableColumn>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Content width of each column, bounded by `max_width`.
    pub fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let widest = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| display_width(cell))
                    .fold(display_width(column.header), usize::max);
                column.max_width.map_or(widest, |max| widest.min(max))
            })
            .collect()
    }

    fn render_row(&self, cells: &[&str], widths: &[usize]) -> String {
        self.columns
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(idx, (column, width))| {
                render_cell(cells.get(idx).copied().unwrap_or(""), *width, column.alignment)
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let header: Vec<&str> = self.columns.iter().map(|column| column.header).collect();
        let mut lines = vec![self.render_row(&header, &widths), rule(&widths)];
        for row in &self.rows {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            lines.push(self.render_row(&cells, &widths));
        }
        lines.join("\n")
    }
}

fn truncate(text: &str, width: usize) -> String {
    if display_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

pub fn render_cell(text: &str, width: usize, alignment: Alignment) -> String {
    let fitted = truncate(text, width);
    let pad = " ".repeat(width.saturating_sub(display_width(&fitted)));
    match alignment {
        Alignment::Left => format!("{fitted}{pad}"),
        Alignment::Right => format!("{pad}{fitted}"),
    }
}

fn rule(widths: &[usize]) -> String {
    let total = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    "-".repeat(total)
}

/// Terminal column width of text. Hangul and emoji take two columns,
/// combining marks and zero-width characters none.
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_aligned_columns_pad_on_the_left() {
        let mut table = Table::new(vec![TableColumn::left("Name"), TableColumn::right("Amount")]);
        table.push(vec!["Bus".into(), "500".into()]);
        table.push(vec!["Bakery".into(), "1,000".into()]);
        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Name    Amount");
        assert_eq!(lines[1], "--------------");
        assert_eq!(lines[2], "Bus        500");
        assert_eq!(lines[3], "Bakery   1,000");
    }

    #[test]
    fn capped_columns_truncate_with_ellipsis() {
        assert_eq!(truncate("Convenience store", 6), "Conve…");
        assert_eq!(render_cell("ab", 4, Alignment::Left), "ab  ");
    }

    #[test]
    fn wide_glyphs_count_double() {
        assert_eq!(display_width("식비"), 4);
        assert_eq!(display_width("food"), 4);
        assert_eq!(display_width("🍕"), 2);
        assert_eq!(display_width("☕"), 2);
    }

    #[test]
    fn combining_and_zero_width_chars_take_no_column() {
        assert_eq!(display_width("e\u{301}"), 1);
        assert_eq!(display_width("a\u{200B}b"), 2);
    }

    #[test]
    fn emoji_titles_keep_columns_aligned() {
        assert_eq!(render_cell("🍕 lunch", 10, Alignment::Left), "🍕 lunch  ");
        assert_eq!(truncate("🍕🍕🍕", 5), "🍕🍕…");
        assert_eq!(display_width(&truncate("식비 식비 식비", 6)), 6);
    }
}

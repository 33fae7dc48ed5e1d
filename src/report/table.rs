//! 固定幅のテキスト表

use unicode_width::UnicodeWidthStr;

const SEPARATOR: &str = "  ";

#[derive(Debug, Clone, Default)]
pub(super) struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub(super) fn new(headers: Vec<&str>) -> Self {
        Self { headers: headers.into_iter().map(str::to_string).collect(), rows: Vec::new() }
    }

    pub(super) fn push_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    /// 各列の表示幅（全角文字は 2 桁）
    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|header| header.width()).collect();
        for row in &self.rows {
            for (column, cell) in row.iter().enumerate() {
                match widths.get_mut(column) {
                    Some(width) => *width = (*width).max(cell.width()),
                    None => widths.push(cell.width()),
                }
            }
        }
        widths
    }

    pub(super) fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();

        push_line(&mut out, &self.headers, &widths);
        let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
        push_line(&mut out, &rule, &widths);
        for row in &self.rows {
            push_line(&mut out, row, &widths);
        }
        out
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (column, cell) in cells.iter().enumerate() {
        if column > 0 {
            line.push_str(SEPARATOR);
        }
        let width = widths.get(column).copied().unwrap_or_default();
        let padding = width.saturating_sub(cell.width());
        line.push_str(cell);
        line.push_str(&" ".repeat(padding));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

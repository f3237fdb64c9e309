// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// Render rows as an ASCII table with a boxed header.
///
/// ```text
/// +----+--------+
/// | Dn | Serial |
/// +----+--------+
/// | a  | RK39   |
/// +----+--------+
/// ```
///
/// A table without rows has no heading separator, just the header box.
/// Lines are joined with `\n`; there is no trailing newline.
pub fn render_ascii_table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            match widths.get_mut(i) {
                Some(width) => *width = (*width).max(len),
                None => widths.push(len),
            }
        }
    }

    let separator = separator_line(&widths);
    let mut lines = Vec::with_capacity(rows.len() + 4);
    lines.push(separator.clone());
    lines.push(row_line(header.iter().copied(), &widths));
    if !rows.is_empty() {
        lines.push(separator.clone());
    }
    for row in rows {
        lines.push(row_line(row.iter().map(String::as_str), &widths));
    }
    lines.push(separator);
    lines.join("\n")
}

fn separator_line(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line
}

fn row_line<'a>(mut cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let mut line = String::from("|");
    for width in widths {
        let cell = cells.next().unwrap_or_default();
        let padding = width - cell.chars().count();
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(padding + 1));
        line.push('|');
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_two_columns() {
        let rows = vec![vec!["sys/rack-unit-1".to_string(), "RK39".to_string()]];
        let table = render_ascii_table(&["Dn", "Serial"], &rows);
        let expected = "\
+-----------------+--------+
| Dn              | Serial |
+-----------------+--------+
| sys/rack-unit-1 | RK39   |
+-----------------+--------+";
        assert_eq!(table, expected);
    }

    #[test]
    fn test_empty_cells_are_padded() {
        let rows = vec![vec!["a".to_string(), String::new()]];
        let table = render_ascii_table(&["Dn", "Assigned to"], &rows);
        assert!(table.contains("| a  |             |"));
    }

    #[test]
    fn test_header_only() {
        let table = render_ascii_table(&["Dn"], &[]);
        assert_eq!(table, "+----+\n| Dn |\n+----+");
        assert_eq!(table.lines().count(), 3);
        assert!(!table.ends_with('\n'));
    }
}

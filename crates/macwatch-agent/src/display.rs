//! Fixed-width table rendering for the `show` command.

use macwatch_core::{KnownDevice, UnknownDevice};

pub fn render_known(rows: &[KnownDevice]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|d| {
            vec![
                d.id.to_string(),
                d.name.clone(),
                d.mac.clone(),
                d.ip.clone().unwrap_or_default(),
                d.created_at.to_rfc3339(),
            ]
        })
        .collect();
    render("known", &["id", "name", "mac", "ip", "created_at"], &cells)
}

pub fn render_unknown(rows: &[UnknownDevice]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|d| {
            vec![
                d.id.to_string(),
                d.ip.clone(),
                d.mac.clone(),
                d.created_at.to_rfc3339(),
            ]
        })
        .collect();
    render("unknown", &["id", "ip", "mac", "created_at"], &cells)
}

fn render(title: &str, headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let mut out = format!("{title} ({} rows)\n", rows.len());
    out.push_str(&fmt_row(headers, &widths));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    out.push('\n');
    for row in rows {
        out.push_str(&fmt_row(row, &widths));
        out.push('\n');
    }
    out
}

fn fmt_row<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths.iter().copied())
        .map(|(c, w)| format!("{:<w$}", c.as_ref()))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

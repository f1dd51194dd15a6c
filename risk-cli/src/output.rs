use risk_core::MemoryView;

/// Status line followed by the weather table, names left-aligned in one column.
pub fn render(view: &MemoryView) -> String {
    let mut out = String::new();

    if !view.status.is_empty() {
        out.push_str(&view.status);
        out.push('\n');
    }

    let width = view.rows.iter().map(|r| r.name.chars().count()).max().unwrap_or(0);
    for row in &view.rows {
        out.push_str(&format!("  {:<width$}  {}\n", row.name, row.value));
    }

    out
}

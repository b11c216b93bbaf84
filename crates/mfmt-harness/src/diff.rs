//! Diff rendering for fixture comparison.

/// Render a text diff between expected and actual output.
///
/// Canonical outputs are single-line, so the diff also marks the first
/// differing byte column.
#[must_use]
pub fn render_diff(expected: &str, actual: &str) -> String {
    if expected == actual {
        return String::from("[identical]");
    }

    let mut out = String::new();
    out.push_str("--- expected\n");
    out.push_str("+++ actual\n");
    let expected_lines: Vec<&str> = expected.lines().collect();
    let actual_lines: Vec<&str> = actual.lines().collect();
    let rows = expected_lines.len().max(actual_lines.len());
    for i in 0..rows {
        let e = expected_lines.get(i).copied().unwrap_or("");
        let a = actual_lines.get(i).copied().unwrap_or("");
        if e != a {
            let column = e
                .bytes()
                .zip(a.bytes())
                .position(|(x, y)| x != y)
                .unwrap_or_else(|| e.len().min(a.len()));
            out.push_str(&format!("@@ line {} col {} @@\n", i + 1, column + 1));
            out.push_str(&format!("-{e}\n"));
            out.push_str(&format!("+{a}\n"));
        }
    }
    out
}

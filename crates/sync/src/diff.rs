//! Line diffs for dry-run previews.

use std::fmt::Write;

/// Generate a unified-style diff between two texts.
///
/// Unchanged lines are shown only within `context` lines of a change;
/// skipped stretches are marked with `...`. Returns an empty string when
/// the texts have the same lines.
pub fn unified_diff(before: &str, after: &str, context: usize) -> String {
    let a: Vec<&str> = before.lines().collect();
    let b: Vec<&str> = after.lines().collect();

    // lcs[i][j]: longest common subsequence of a[i..] and b[j..]
    let mut lcs = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for i in (0..a.len()).rev() {
        for j in (0..b.len()).rev() {
            lcs[i][j] = if a[i] == b[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut ops: Vec<(char, &str)> = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() || j < b.len() {
        if i < a.len() && j < b.len() && a[i] == b[j] {
            ops.push((' ', a[i]));
            i += 1;
            j += 1;
        } else if i < a.len() && (j == b.len() || lcs[i + 1][j] >= lcs[i][j + 1]) {
            ops.push(('-', a[i]));
            i += 1;
        } else {
            ops.push(('+', b[j]));
            j += 1;
        }
    }

    let changes: Vec<usize> = ops
        .iter()
        .enumerate()
        .filter(|(_, (tag, _))| *tag != ' ')
        .map(|(k, _)| k)
        .collect();

    let mut output = String::new();
    let mut last_shown: Option<usize> = None;
    for (k, (tag, line)) in ops.iter().enumerate() {
        if !changes.iter().any(|&c| c.abs_diff(k) <= context) {
            continue;
        }
        if last_shown.is_some_and(|last| last + 1 < k) {
            output.push_str("...\n");
        }
        let _ = writeln!(output, "{}{}", tag, line);
        last_shown = Some(k);
    }
    output
}

pub mod commit;
pub mod lanes;

pub use commit::{Commit, GraphLine, PALETTE_SIZE, RawCommit};
pub use lanes::build_graph;

/// Format a laid-out commit list for terminal display.
///
/// One row per commit: a `*` in the commit's lane, `|` for lanes passing
/// through the row, then the abbreviated id, any refs, and the message
/// summary.
pub fn format_graph(commits: &[Commit]) -> String {
    let mut result = String::new();

    for commit in commits {
        let width = row_width(commit);

        for col in 0..width {
            if col > 0 {
                result.push(' ');
            }
            if col == commit.lane {
                result.push('*');
            } else if commit
                .lines
                .iter()
                .any(|l| l.from == col && l.to == col)
            {
                result.push('|');
            } else {
                result.push(' ');
            }
        }

        result.push_str("  ");
        result.push_str(commit.short_id());

        let refs: Vec<&str> = commit
            .branches
            .iter()
            .chain(commit.tags.iter())
            .map(String::as_str)
            .collect();
        if !refs.is_empty() {
            result.push_str(" (");
            result.push_str(&refs.join(", "));
            result.push(')');
        }

        result.push(' ');
        result.push_str(commit.summary());
        result.push('\n');
    }

    result
}

/// Number of lane columns a row needs to draw.
fn row_width(commit: &Commit) -> usize {
    let mut width = commit.lane + 1;
    for line in &commit.lines {
        width = width.max(line.from + 1).max(line.to + 1);
    }
    width
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::commit::RawCommit;
    use super::*;

    fn raw(id: &str, parents: &[&str]) -> RawCommit {
        RawCommit {
            id: id.to_string(),
            parents: parents.iter().map(|p| p.to_string()).collect(),
            message: format!("commit {id}\n\nbody text"),
            author: "Test User".to_string(),
            email: "test@example.com".to_string(),
            timestamp: 0,
            branches: Vec::new(),
            tags: Vec::new(),
        }
    }

    #[test]
    fn format_linear_history() {
        let commits = build_graph(vec![
            raw("ccccccc1", &["bbbbbbb1"]),
            raw("bbbbbbb1", &["aaaaaaa1"]),
            raw("aaaaaaa1", &[]),
        ]);
        let out = format_graph(&commits);
        insta::assert_snapshot!(out, @r"
        *  ccccccc commit ccccccc1
        *  bbbbbbb commit bbbbbbb1
        *  aaaaaaa commit aaaaaaa1
        ");
    }

    #[test]
    fn format_merge_shows_second_lane() {
        let commits = build_graph(vec![
            raw("merge01", &["side0b1", "side0c1"]),
            raw("side0c1", &["root001"]),
            raw("side0b1", &["root001"]),
            raw("root001", &[]),
        ]);
        let out = format_graph(&commits);
        insta::assert_snapshot!(out, @r"
        *    merge01 commit merge01
        | *  side0c1 commit side0c1
        * |  side0b1 commit side0b1
        *    root001 commit root001
        ");
    }

    #[test]
    fn format_includes_refs() {
        let mut tip = raw("ddddddd1", &[]);
        tip.branches = vec!["main".to_string()];
        tip.tags = vec!["v1.0".to_string()];
        let commits = build_graph(vec![tip]);
        let out = format_graph(&commits);
        assert_eq!(out, "*  ddddddd (main, v1.0) commit ddddddd1\n");
    }
}

use super::hunk::Hunk;
use std::fmt;

/// A complete diff for a single file.
///
/// Contains all hunks (change blocks) for one file from a git diff. The
/// file-level header lines are not retained beyond the extracted path;
/// callers that need them for display keep the raw diff text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    /// File path (extracted from the `+++ b/path` header)
    pub path: String,
    /// All hunks for this file
    pub hunks: Vec<Hunk>,
}

impl FileDiff {
    /// Parse a single-file diff from git diff output.
    ///
    /// Expects input containing a `+++ b/path` header (or `--- a/path` for
    /// deletions where the new side is `/dev/null`) followed by `@@` hunks.
    ///
    /// Returns `None` if the file path cannot be extracted.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let path = text
            .lines()
            .find_map(|line| line.strip_prefix("+++ b/"))
            .or_else(|| text.lines().find_map(|line| line.strip_prefix("--- a/")))
            .filter(|p| !p.is_empty())?
            .to_string();

        // Find first hunk marker
        let first_hunk_pos = text.find("\n@@ ").map(|i| i + 1)?;

        // Find all subsequent hunk markers
        let mut indices = vec![first_hunk_pos];
        let mut search_start = first_hunk_pos + 1;

        while let Some(pos) = text[search_start..].find("\n@@ ") {
            let abs_pos = search_start + pos + 1; // +1 to skip the newline
            indices.push(abs_pos);
            search_start = abs_pos + 1;
        }

        // Parse each hunk section
        let hunks = indices
            .iter()
            .enumerate()
            .filter_map(|(i, &start)| {
                let end = indices.get(i + 1).copied().unwrap_or(text.len());
                Hunk::parse(&text[start..end])
            })
            .collect();

        Some(FileDiff { path, hunks })
    }

    /// Find the hunk exactly matching the given parsed needle, if any.
    ///
    /// Equality covers start positions and the full tagged body, so a hunk
    /// whose surrounding content changed since the needle was captured will
    /// not match.
    pub fn find_hunk(&self, needle: &Hunk) -> Option<&Hunk> {
        self.hunks.iter().find(|h| *h == needle)
    }
}

impl fmt::Display for FileDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "diff --git a/{} b/{}", self.path, self.path)?;
        writeln!(f, "--- a/{}", self.path)?;
        writeln!(f, "+++ b/{}", self.path)?;

        for hunk in &self.hunks {
            write!(f, "{}", hunk)?;
        }

        Ok(())
    }
}

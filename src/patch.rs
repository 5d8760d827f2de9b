use crate::diff::{Diff, FileDiff, Hunk};
use error_set::error_set;

error_set! {
    /// Errors from sub-patch synthesis
    PatchError := {
        /// The supplied hunk no longer matches the current diff; the caller
        /// should refetch the diff and retry or surface "changed since load"
        #[display("Hunk does not match the current diff for {path}")]
        LocatorMismatch { path: String },
        /// The supplied hunk body carries no content lines
        #[display("Selected hunk for {path} is empty")]
        EmptyHunk { path: String },
    }
}

/// Which way the synthesized patch applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Apply the hunk as-is (stage)
    Forward,
    /// Apply the inverse of the hunk (unstage, discard)
    Reverse,
}

/// Build a minimal, independently-applicable patch for exactly one hunk.
///
/// The supplied header and body are a locator: they must match one of the
/// hunks parsed from `full_diff` line for line, which guards against acting
/// on a diff that changed between fetch and action. The result is a complete
/// patch document (file-level header plus the single hunk) with old/new
/// counts recomputed from the body, reversed when `direction` is
/// [`Direction::Reverse`].
///
/// # Errors
///
/// - [`PatchError::EmptyHunk`] if the body has no content lines
/// - [`PatchError::LocatorMismatch`] if the path or the exact hunk is not
///   present in `full_diff`
pub fn extract_hunk(
    full_diff: &str,
    path: &str,
    hunk_header: &str,
    hunk_body: &str,
    direction: Direction,
) -> Result<String, PatchError> {
    let mut needle_text = String::with_capacity(hunk_header.len() + hunk_body.len() + 1);
    needle_text.push_str(hunk_header.trim_end());
    needle_text.push('\n');
    needle_text.push_str(hunk_body);

    let needle = Hunk::parse(&needle_text).ok_or_else(|| PatchError::LocatorMismatch {
        path: path.to_string(),
    })?;

    if needle.is_empty() {
        return Err(PatchError::EmptyHunk {
            path: path.to_string(),
        });
    }

    let diff = Diff::parse(full_diff);
    let hunk = diff
        .file(path)
        .and_then(|file| file.find_hunk(&needle))
        .ok_or_else(|| PatchError::LocatorMismatch {
            path: path.to_string(),
        })?;

    let hunk = match direction {
        Direction::Forward => hunk.clone(),
        Direction::Reverse => hunk.reverse(),
    };

    let patch = FileDiff {
        path: path.to_string(),
        hunks: vec![hunk],
    };

    Ok(patch.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    const TWO_HUNK_DIFF: &str = "diff --git a/config.nix b/config.nix\n\
index fa2da6e..41114ff 100644\n\
--- a/config.nix\n\
+++ b/config.nix\n\
@@ -1,3 +1,3 @@\n \
line 1\n\
-line 2\n\
+line two\n \
line 3\n\
@@ -10,2 +10,2 @@\n \
line 10\n\
-line 11\n\
+line eleven\n";

    #[test]
    fn forward_patch_contains_only_selected_hunk() {
        let patch = extract_hunk(
            TWO_HUNK_DIFF,
            "config.nix",
            "@@ -10,2 +10,2 @@",
            " line 10\n-line 11\n+line eleven\n",
            Direction::Forward,
        )
        .unwrap();

        assert_eq!(
            patch,
            "diff --git a/config.nix b/config.nix\n\
--- a/config.nix\n\
+++ b/config.nix\n\
@@ -10,2 +10,2 @@\n \
line 10\n\
-line 11\n\
+line eleven\n"
        );
        assert!(!patch.contains("line two"));
    }

    #[test]
    fn reverse_patch_swaps_changes_and_recomputes_counts() {
        let patch = extract_hunk(
            TWO_HUNK_DIFF,
            "config.nix",
            "@@ -1,3 +1,3 @@",
            " line 1\n-line 2\n+line two\n line 3\n",
            Direction::Reverse,
        )
        .unwrap();

        assert!(patch.contains("@@ -1,3 +1,3 @@"));
        assert!(patch.contains("+line 2"));
        assert!(patch.contains("-line two"));
    }

    #[test]
    fn reverse_recomputes_asymmetric_counts() {
        let diff = "diff --git a/f.txt b/f.txt\n\
--- a/f.txt\n\
+++ b/f.txt\n\
@@ -5,2 +5,4 @@\n \
ctx\n\
+added one\n\
+added two\n \
ctx2\n";

        let patch = extract_hunk(
            diff,
            "f.txt",
            "@@ -5,2 +5,4 @@",
            " ctx\n+added one\n+added two\n ctx2\n",
            Direction::Reverse,
        )
        .unwrap();

        // Old and new sides swap: the reverse removes the two added lines.
        assert!(patch.contains("@@ -5,4 +5,2 @@"));
        assert!(patch.contains("-added one"));
        assert!(patch.contains("-added two"));
    }

    #[test]
    fn stale_header_is_a_locator_mismatch() {
        let result = extract_hunk(
            TWO_HUNK_DIFF,
            "config.nix",
            "@@ -40,2 +40,2 @@",
            " line 10\n-line 11\n+line eleven\n",
            Direction::Forward,
        );
        assert!(matches!(result, Err(PatchError::LocatorMismatch { .. })));
    }

    #[test]
    fn stale_body_is_a_locator_mismatch() {
        let result = extract_hunk(
            TWO_HUNK_DIFF,
            "config.nix",
            "@@ -10,2 +10,2 @@",
            " line 10\n-line 11\n+line twelve\n",
            Direction::Forward,
        );
        assert!(matches!(result, Err(PatchError::LocatorMismatch { .. })));
    }

    #[test]
    fn unknown_path_is_a_locator_mismatch() {
        let result = extract_hunk(
            TWO_HUNK_DIFF,
            "other.nix",
            "@@ -10,2 +10,2 @@",
            " line 10\n-line 11\n+line eleven\n",
            Direction::Forward,
        );
        assert!(matches!(result, Err(PatchError::LocatorMismatch { .. })));
    }

    #[test]
    fn empty_body_fails_cleanly() {
        let result = extract_hunk(
            TWO_HUNK_DIFF,
            "config.nix",
            "@@ -10,2 +10,2 @@",
            "",
            Direction::Forward,
        );
        assert!(matches!(result, Err(PatchError::EmptyHunk { .. })));
    }

    #[test]
    fn malformed_full_diff_is_a_locator_mismatch() {
        let result = extract_hunk(
            "not a diff at all",
            "config.nix",
            "@@ -10,2 +10,2 @@",
            " line 10\n-line 11\n+line eleven\n",
            Direction::Forward,
        );
        assert!(matches!(result, Err(PatchError::LocatorMismatch { .. })));
    }

    #[test]
    fn forward_then_reverse_cancel_out() {
        let header = "@@ -10,2 +10,2 @@";
        let body = " line 10\n-line 11\n+line eleven\n";

        let forward = extract_hunk(
            TWO_HUNK_DIFF,
            "config.nix",
            header,
            body,
            Direction::Forward,
        )
        .unwrap();
        let reverse = extract_hunk(
            TWO_HUNK_DIFF,
            "config.nix",
            header,
            body,
            Direction::Reverse,
        )
        .unwrap();

        // The reverse of the reverse is the forward patch again.
        let reverse_diff = Diff::parse(&reverse);
        let undone = FileDiff {
            path: "config.nix".to_string(),
            hunks: vec![reverse_diff.files[0].hunks[0].reverse()],
        };
        assert_eq!(undone.to_string(), forward);
    }
}

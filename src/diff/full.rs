use super::file::FileDiff;

/// A complete git diff containing changes for multiple files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff {
    pub files: Vec<FileDiff>,
}

impl Diff {
    /// Parse a complete git diff output into file diffs.
    ///
    /// Text that contains no recognizable structure parses to an empty diff;
    /// malformed input is never an error at this level.
    pub fn parse(text: &str) -> Self {
        let mut files = Vec::new();
        let mut current_file_text = String::new();

        for line in text.lines() {
            if line.starts_with("diff --git ") {
                // Start of new file diff - save previous if exists
                if !current_file_text.is_empty()
                    && let Some(file_diff) = FileDiff::parse(&current_file_text)
                {
                    files.push(file_diff);
                }
                current_file_text = line.to_string();
                current_file_text.push('\n');
            } else if !current_file_text.is_empty() {
                current_file_text.push_str(line);
                current_file_text.push('\n');
            }
        }

        // Don't forget the last file
        if !current_file_text.is_empty()
            && let Some(file_diff) = FileDiff::parse(&current_file_text)
        {
            files.push(file_diff);
        }

        Diff { files }
    }

    /// Find the diff for a single file by path.
    pub fn file(&self, path: &str) -> Option<&FileDiff> {
        self.files.iter().find(|f| f.path == path)
    }
}

impl std::fmt::Display for Diff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for file_diff in &self.files {
            write!(f, "{}", file_diff)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_diff() {
        let diff = Diff::parse("");
        assert_eq!(diff.files.len(), 0);
    }

    #[test]
    fn parse_garbage_is_empty_not_error() {
        let diff = Diff::parse("this is not\na diff at all\n");
        assert_eq!(diff.files.len(), 0);
    }

    #[test]
    fn parse_single_file() {
        let text = r#"diff --git a/flake.nix b/flake.nix
index abc1234..def5678 100644
--- a/flake.nix
+++ b/flake.nix
@@ -136,2 +136,3 @@
 line 136
+      debug = true;
 line 137
"#;
        let diff = Diff::parse(text);
        assert_eq!(diff.files.len(), 1);
        assert_eq!(diff.files[0].path, "flake.nix");
        assert_eq!(diff.files[0].hunks.len(), 1);
    }

    #[test]
    fn parse_multiple_files() {
        let text = r#"diff --git a/flake.nix b/flake.nix
index abc1234..def5678 100644
--- a/flake.nix
+++ b/flake.nix
@@ -136,1 +136,2 @@
 line 136
+      debug = true;
diff --git a/gtk.nix b/gtk.nix
index 111..222 100644
--- a/gtk.nix
+++ b/gtk.nix
@@ -11,1 +11,2 @@
 line 11
+    gtk.cursorTheme.size = 24;
"#;
        let diff = Diff::parse(text);
        assert_eq!(diff.files.len(), 2);
        assert_eq!(diff.files[0].path, "flake.nix");
        assert_eq!(diff.files[1].path, "gtk.nix");
    }

    #[test]
    fn file_lookup_by_path() {
        let text = r#"diff --git a/a.txt b/a.txt
--- a/a.txt
+++ b/a.txt
@@ -1 +1 @@
-x
+y
"#;
        let diff = Diff::parse(text);
        assert!(diff.file("a.txt").is_some());
        assert!(diff.file("b.txt").is_none());
    }

    #[test]
    fn files_without_hunks_are_skipped() {
        // Binary files and mode-only changes carry no hunks.
        let text = r#"diff --git a/logo.png b/logo.png
index 1234567..89abcde 100644
Binary files a/logo.png and b/logo.png differ
diff --git a/a.txt b/a.txt
--- a/a.txt
+++ b/a.txt
@@ -1 +1 @@
-x
+y
"#;
        let diff = Diff::parse(text);
        assert_eq!(diff.files.len(), 1);
        assert_eq!(diff.files[0].path, "a.txt");
    }
}

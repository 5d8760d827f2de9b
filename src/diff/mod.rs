pub mod file;
pub mod full;
pub mod hunk;

pub use file::FileDiff;
pub use full::Diff;
pub use hunk::{Hunk, HunkLine};

/// Format a parsed diff for user display with explicit line numbers.
pub fn format_diff(diff: &Diff) -> String {
    let mut result = String::new();

    for file_diff in &diff.files {
        result.push_str(&file_diff.path);
        result.push_str(":\n");

        for hunk in &file_diff.hunks {
            let mut old_line = hunk.old_start;
            let mut new_line = hunk.new_start;

            for line in &hunk.lines {
                match line {
                    HunkLine::Context(content) => {
                        result.push_str(&format!("   {}:\t{}\n", new_line, content));
                        old_line += 1;
                        new_line += 1;
                    }
                    HunkLine::Add(content) => {
                        result.push_str(&format!("  +{}:\t{}\n", new_line, content));
                        new_line += 1;
                    }
                    HunkLine::Delete(content) => {
                        result.push_str(&format!("  -{}:\t{}\n", old_line, content));
                        old_line += 1;
                    }
                    HunkLine::NoNewline => {}
                }
            }

            result.push('\n');
        }
    }

    // Remove trailing newline if present
    if result.ends_with("\n\n") {
        result.pop();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_numbers_both_sides() {
        let text = r#"diff --git a/gtk.nix b/gtk.nix
index 2ce966d..93d8dbc 100644
--- a/gtk.nix
+++ b/gtk.nix
@@ -9,4 +9,4 @@
 line 9
-    gtk.theme.name = "Adwaita";
+    # Theme managed by Stylix
 line 11
"#;
        let diff = Diff::parse(text);
        let formatted = format_diff(&diff);

        insta::assert_snapshot!(formatted, @r#"
        gtk.nix:
           9:	line 9
          -10:	    gtk.theme.name = "Adwaita";
          +10:	    # Theme managed by Stylix
           11:	line 11
        "#);
    }
}

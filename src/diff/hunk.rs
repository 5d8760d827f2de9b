use std::fmt;

/// A single tagged line of a hunk body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HunkLine {
    /// Unchanged line, present in both versions
    Context(String),
    /// Line present only in the new version
    Add(String),
    /// Line present only in the old version
    Delete(String),
    /// `\ No newline at end of file` marker; qualifies the preceding line
    NoNewline,
}

/// A single hunk from a unified diff.
///
/// The body is kept in diff order with each line tagged. Old/new line counts
/// are never stored: they are recomputed from the body whenever a header is
/// rendered, so a hunk extracted or reversed from a larger diff always
/// carries counts that match its actual content. The counts in a parsed
/// header are display-advisory only and are discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    /// First line number of the hunk in the old version
    pub old_start: u32,
    /// First line number of the hunk in the new version
    pub new_start: u32,
    /// Tagged body lines in diff order
    pub lines: Vec<HunkLine>,
}

impl Hunk {
    /// Parse a hunk from diff text (header line plus body lines).
    ///
    /// Returns `None` if the first line is not a valid `@@` header.
    /// Unrecognized body lines are skipped.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let mut input = text.lines();

        let header = input.next()?;
        let (old_start, new_start) = Self::parse_header(header)?;

        let mut lines = Vec::new();
        for line in input {
            if line.starts_with('\\') {
                lines.push(HunkLine::NoNewline);
            } else if let Some(content) = line.strip_prefix('+') {
                lines.push(HunkLine::Add(content.to_string()));
            } else if let Some(content) = line.strip_prefix('-') {
                lines.push(HunkLine::Delete(content.to_string()));
            } else if let Some(content) = line.strip_prefix(' ') {
                lines.push(HunkLine::Context(content.to_string()));
            } else if line.is_empty() {
                // Some diff producers emit empty context lines without the
                // leading space.
                lines.push(HunkLine::Context(String::new()));
            }
        }

        Some(Hunk {
            old_start,
            new_start,
            lines,
        })
    }

    /// Number of old-version lines covered: context plus deletions.
    pub fn old_len(&self) -> u32 {
        self.lines
            .iter()
            .filter(|l| matches!(l, HunkLine::Context(_) | HunkLine::Delete(_)))
            .count() as u32
    }

    /// Number of new-version lines covered: context plus additions.
    pub fn new_len(&self) -> u32 {
        self.lines
            .iter()
            .filter(|l| matches!(l, HunkLine::Context(_) | HunkLine::Add(_)))
            .count() as u32
    }

    /// True if the body contains no content lines at all.
    pub fn is_empty(&self) -> bool {
        !self
            .lines
            .iter()
            .any(|l| !matches!(l, HunkLine::NoNewline))
    }

    /// The `@@` header line with counts recomputed from the body.
    pub fn header(&self) -> String {
        format!(
            "@@ -{} +{} @@",
            Self::format_range(self.old_start, self.old_len()),
            Self::format_range(self.new_start, self.new_len())
        )
    }

    /// The body lines rendered without the header, newline-terminated.
    pub fn body(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            match line {
                HunkLine::Context(content) => {
                    out.push(' ');
                    out.push_str(content);
                }
                HunkLine::Add(content) => {
                    out.push('+');
                    out.push_str(content);
                }
                HunkLine::Delete(content) => {
                    out.push('-');
                    out.push_str(content);
                }
                HunkLine::NoNewline => out.push_str("\\ No newline at end of file"),
            }
            out.push('\n');
        }
        out
    }

    /// The inverse hunk: additions and deletions swap tags in place, the
    /// start fields swap sides. Applying the reverse undoes exactly what
    /// applying the forward hunk did.
    ///
    /// Body order is preserved, so `\ No newline` markers keep following the
    /// line they qualify and reversing twice restores the original exactly.
    #[must_use]
    pub fn reverse(&self) -> Self {
        let lines = self
            .lines
            .iter()
            .map(|line| match line {
                HunkLine::Context(c) => HunkLine::Context(c.clone()),
                HunkLine::Add(c) => HunkLine::Delete(c.clone()),
                HunkLine::Delete(c) => HunkLine::Add(c.clone()),
                HunkLine::NoNewline => HunkLine::NoNewline,
            })
            .collect();

        Hunk {
            old_start: self.new_start,
            new_start: self.old_start,
            lines,
        }
    }

    /// Parse a header to extract old and new start positions.
    /// Format: `@@ -old_start,old_count +new_start,new_count @@ context`
    fn parse_header(header: &str) -> Option<(u32, u32)> {
        let header = header.strip_prefix("@@ ")?;
        let end_idx = header.find(" @@")?;
        let range_part = &header[..end_idx];

        let (old_part, new_part) = range_part.split_once(' ')?;

        let old_start = Self::parse_range_start(old_part.strip_prefix('-')?)?;
        let new_start = Self::parse_range_start(new_part.strip_prefix('+')?)?;

        Some((old_start, new_start))
    }

    /// Parse the start line number from a range like `136,0` or `137`.
    fn parse_range_start(range: &str) -> Option<u32> {
        let num_str = range.split(',').next()?;
        num_str.parse::<u32>().ok()
    }

    /// Render one side of the header; the count is omitted when it is 1.
    fn format_range(start: u32, len: u32) -> String {
        if len == 1 {
            format!("{start}")
        } else {
            format!("{start},{len}")
        }
    }
}

impl fmt::Display for Hunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header())?;
        write!(f, "{}", self.body())
    }
}

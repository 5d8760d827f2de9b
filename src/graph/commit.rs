/// Number of distinct connector colors; color indices cycle through this
/// palette. Reuse across distant lanes is cosmetic and acceptable.
pub const PALETTE_SIZE: usize = 8;

/// Commit data as delivered by the history walk, before layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommit {
    /// Full hex object id
    pub id: String,
    /// Parent ids in order; empty for a root, two or more for a merge
    pub parents: Vec<String>,
    pub message: String,
    pub author: String,
    pub email: String,
    /// Author time, seconds since the epoch
    pub timestamp: i64,
    /// Branch names pointing at this commit, resolved once per fetch
    pub branches: Vec<String>,
    /// Tag names pointing at this commit, resolved once per fetch
    pub tags: Vec<String>,
}

/// A connector segment drawn in one commit's row.
///
/// `upper` selects the half of the row the segment occupies; `from` and `to`
/// are lane columns at the top and bottom of that half.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphLine {
    pub upper: bool,
    pub from: usize,
    pub to: usize,
    pub color: usize,
}

/// A commit annotated with graph geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub id: String,
    pub parents: Vec<String>,
    pub message: String,
    pub author: String,
    pub email: String,
    pub timestamp: i64,
    pub branches: Vec<String>,
    pub tags: Vec<String>,
    /// Visual column assigned by the layout pass
    pub lane: usize,
    /// Connector segments for this commit's row
    pub lines: Vec<GraphLine>,
}

impl Commit {
    /// First line of the commit message.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }

    /// Abbreviated object id for display.
    pub fn short_id(&self) -> &str {
        let end = self.id.len().min(7);
        &self.id[..end]
    }
}

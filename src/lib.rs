//! Core engine for a git client: commit graph layout and hunk-level staging.
//!
//! [`GitClient`] shells out to the `git` binary for repository access, lays
//! out the commit history as a lane graph via [`graph::build_graph`], and
//! stages, unstages, or discards individual hunks by synthesizing minimal
//! patches with [`patch::extract_hunk`] and piping them to `git apply`.

pub mod diff;
pub mod graph;
pub mod patch;

use std::collections::HashMap;
use std::process::Command;

use error_set::error_set;

pub use diff::{Diff, FileDiff, Hunk, HunkLine};
pub use graph::{Commit, GraphLine, RawCommit, build_graph};
pub use patch::{Direction, PatchError};

error_set! {
    /// Top-level error for git client operations
    GitClientError := {
        PatchError(PatchError),
    } || GitCommandError

    /// Errors from git command execution
    GitCommandError := {
        #[display("Failed to run git {command}: {message}")]
        SpawnFailed { command: String, message: String },
        #[display("git {command} failed: {stderr}")]
        ExitError { command: String, stderr: String },
        #[display("Invalid UTF-8 in git {command} output: {message}")]
        InvalidUtf8 { command: String, message: String },
        #[display("Failed to get stdin handle for git apply")]
        ApplyStdinFailed,
        #[display("Failed to write patch to git apply: {message}")]
        ApplyWriteFailed { message: String },
        #[display("Failed to wait for git apply: {message}")]
        ApplyWaitFailed { message: String },
        #[display("git apply failed: {stderr}")]
        ApplyExitError { stderr: String },
    }
}

/// Which commits to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitFilter {
    /// All local and remote branches
    All,
    /// Local branches only
    LocalOnly,
    /// A single branch by name
    SingleBranch(String),
}

/// How a file changed, from one side of the porcelain status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Renamed,
    Untracked,
}

impl ChangeKind {
    fn from_code(code: char) -> Option<Self> {
        match code {
            'A' => Some(Self::Added),
            'M' | 'T' | 'U' => Some(Self::Modified),
            'D' => Some(Self::Deleted),
            'R' | 'C' => Some(Self::Renamed),
            '?' => Some(Self::Untracked),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
            Self::Renamed => "renamed",
            Self::Untracked => "untracked",
        };
        write!(f, "{label}")
    }
}

/// One changed file, on either the index or the worktree side.
///
/// A file that is both partially staged and modified in the worktree
/// produces two entries, one per side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStatus {
    pub path: String,
    pub kind: ChangeKind,
    /// True when the change sits in the index
    pub staged: bool,
}

// Field and record separators for `git log --format`; they cannot appear in
// commit messages or author fields, unlike newlines.
const LOG_FORMAT: &str = "%H%x1f%P%x1f%an%x1f%ae%x1f%at%x1f%B%x1e";

/// Main interface for repository access.
pub struct GitClient<'a> {
    repo_path: &'a str,
}

impl<'a> GitClient<'a> {
    /// Create a new GitClient for the given repository path
    pub fn new(repo_path: &'a str) -> Self {
        Self { repo_path }
    }

    /// List commits with their graph layout, newest first.
    ///
    /// # Examples
    /// ```no_run
    /// # use gitx_core::{CommitFilter, GitClient};
    /// let client = GitClient::new(".");
    /// let commits = client.commits(&CommitFilter::All, 500).unwrap();
    /// ```
    pub fn commits(
        &self,
        filter: &CommitFilter,
        limit: usize,
    ) -> Result<Vec<Commit>, GitClientError> {
        let limit_arg = limit.to_string();
        let format_arg = format!("--format={LOG_FORMAT}");
        let mut args = vec![
            "log",
            "--date-order",
            "-n",
            limit_arg.as_str(),
            format_arg.as_str(),
        ];
        match filter {
            CommitFilter::All => args.extend(["--branches", "--remotes"]),
            CommitFilter::LocalOnly => args.push("--branches"),
            CommitFilter::SingleBranch(name) => args.push(name.as_str()),
        }

        let log = self.run_git(&args)?;
        let refs = self.run_git(&[
            "for-each-ref",
            "--format=%(refname)%09%(objectname)%09%(*objectname)",
        ])?;

        let (branches, tags) = parse_ref_maps(&refs);
        Ok(build_graph(parse_commits(&log, &branches, &tags)))
    }

    /// List changed files, split into index and worktree sides.
    pub fn status(&self) -> Result<Vec<FileStatus>, GitClientError> {
        let output = self.run_git(&["status", "--porcelain"])?;
        Ok(parse_status(&output))
    }

    /// Get the unified diff for one file, against the index or the worktree.
    ///
    /// Untracked files have no diff in git; their worktree diff is
    /// synthesized as a pure-addition patch so they flow through the same
    /// hunk pipeline as tracked files.
    pub fn diff(&self, path: &str, staged: bool) -> Result<String, GitClientError> {
        if !staged
            && self.is_untracked(path)?
            && let Ok(content) = std::fs::read_to_string(std::path::Path::new(self.repo_path).join(path))
        {
            return Ok(untracked_diff(path, &content));
        }

        let mut args = vec!["diff", "--no-ext-diff", "--no-color"];
        if staged {
            args.push("--cached");
        }
        args.extend(["--", path]);
        Ok(self.run_git(&args)?)
    }

    /// Stage a single hunk from the worktree diff of `path`.
    ///
    /// The header and body must match the current diff exactly; a
    /// [`PatchError::LocatorMismatch`] means the file changed since the diff
    /// was fetched and the caller should refetch.
    pub fn stage_hunk(
        &self,
        path: &str,
        hunk_header: &str,
        hunk_body: &str,
    ) -> Result<(), GitClientError> {
        let full = self.diff(path, false)?;
        let patch = patch::extract_hunk(&full, path, hunk_header, hunk_body, Direction::Forward)?;
        Ok(self.apply_patch(&patch, true)?)
    }

    /// Remove a single hunk from the index, leaving the worktree untouched.
    ///
    /// The hunk is located in the staged diff, reversed, and the reverse
    /// patch applied forward to the index.
    pub fn unstage_hunk(
        &self,
        path: &str,
        hunk_header: &str,
        hunk_body: &str,
    ) -> Result<(), GitClientError> {
        let full = self.diff(path, true)?;
        let patch = patch::extract_hunk(&full, path, hunk_header, hunk_body, Direction::Reverse)?;
        Ok(self.apply_patch(&patch, true)?)
    }

    /// Revert a single hunk in the worktree. Destructive.
    pub fn discard_hunk(
        &self,
        path: &str,
        hunk_header: &str,
        hunk_body: &str,
    ) -> Result<(), GitClientError> {
        let full = self.diff(path, false)?;
        let patch = patch::extract_hunk(&full, path, hunk_header, hunk_body, Direction::Reverse)?;
        Ok(self.apply_patch(&patch, false)?)
    }

    /// Stage all changes in a file (including untracked files).
    pub fn stage_file(&self, path: &str) -> Result<(), GitCommandError> {
        self.run_git(&["add", "--", path]).map(|_| ())
    }

    /// Remove all of a file's changes from the index.
    pub fn unstage_file(&self, path: &str) -> Result<(), GitCommandError> {
        self.run_git(&["reset", "HEAD", "--", path]).map(|_| ())
    }

    /// Revert all worktree changes in a file. Destructive.
    pub fn discard_file(&self, path: &str) -> Result<(), GitCommandError> {
        self.run_git(&["checkout", "--", path]).map(|_| ())
    }

    fn is_untracked(&self, path: &str) -> Result<bool, GitCommandError> {
        let output = self.run_git(&["status", "--porcelain", "--", path])?;
        Ok(output.starts_with("??"))
    }

    /// Run a git subcommand and capture stdout as UTF-8
    fn run_git(&self, args: &[&str]) -> Result<String, GitCommandError> {
        let command = args.first().copied().unwrap_or_default().to_string();

        let output = Command::new("git")
            .arg("-C")
            .arg(self.repo_path)
            .args(args)
            .output()
            .map_err(|e| GitCommandError::SpawnFailed {
                command: command.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitCommandError::ExitError {
                command,
                stderr: stderr.into_owned(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| GitCommandError::InvalidUtf8 {
            command,
            message: e.to_string(),
        })
    }

    /// Apply a patch to the index (`cached`) or the worktree
    fn apply_patch(&self, patch: &str, cached: bool) -> Result<(), GitCommandError> {
        use std::io::Write;

        let mut args = vec![
            "-C",
            self.repo_path,
            "apply",
            "--unidiff-zero",
            "--ignore-whitespace",
        ];
        if cached {
            args.push("--cached");
        }
        args.push("-");

        let mut child = Command::new("git")
            .args(&args)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .map_err(|e| GitCommandError::SpawnFailed {
                command: "apply".to_string(),
                message: e.to_string(),
            })?;

        child
            .stdin
            .take()
            .ok_or(GitCommandError::ApplyStdinFailed)?
            .write_all(patch.as_bytes())
            .map_err(|e| GitCommandError::ApplyWriteFailed {
                message: e.to_string(),
            })?;

        let output = child
            .wait_with_output()
            .map_err(|e| GitCommandError::ApplyWaitFailed {
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitCommandError::ApplyExitError {
                stderr: stderr.into_owned(),
            });
        }

        Ok(())
    }
}

/// Split `git log` output into commits, attaching branch and tag names.
///
/// Records that do not carry all six fields are skipped rather than
/// failing the whole listing.
fn parse_commits(
    log: &str,
    branches: &HashMap<String, Vec<String>>,
    tags: &HashMap<String, Vec<String>>,
) -> Vec<RawCommit> {
    log.split('\x1e')
        .filter_map(|record| {
            let record = record.trim_start_matches(['\n', '\r']);
            let mut fields = record.splitn(6, '\x1f');
            let id = fields.next()?.to_string();
            if id.is_empty() {
                return None;
            }
            let parents = fields
                .next()?
                .split_whitespace()
                .map(str::to_string)
                .collect();
            let author = fields.next()?.to_string();
            let email = fields.next()?.to_string();
            let timestamp = fields.next()?.parse().ok()?;
            let message = fields.next()?.trim_end().to_string();

            let branches = branches.get(&id).cloned().unwrap_or_default();
            let tags = tags.get(&id).cloned().unwrap_or_default();

            Some(RawCommit {
                id,
                parents,
                message,
                author,
                email,
                timestamp,
                branches,
                tags,
            })
        })
        .collect()
}

/// Build commit-id -> names maps from `git for-each-ref` output.
///
/// Branch refs point at commits directly; tag refs may point at tag objects,
/// in which case the peeled object id (third column) names the commit.
fn parse_ref_maps(refs: &str) -> (HashMap<String, Vec<String>>, HashMap<String, Vec<String>>) {
    let mut branches: HashMap<String, Vec<String>> = HashMap::new();
    let mut tags: HashMap<String, Vec<String>> = HashMap::new();

    for line in refs.lines() {
        let mut fields = line.splitn(3, '\t');
        let (Some(refname), Some(object)) = (fields.next(), fields.next()) else {
            continue;
        };
        let peeled = fields.next().unwrap_or_default();

        if let Some(name) = refname.strip_prefix("refs/heads/") {
            branches
                .entry(object.to_string())
                .or_default()
                .push(name.to_string());
        } else if let Some(name) = refname.strip_prefix("refs/remotes/") {
            // Symbolic remote HEADs duplicate their target branch.
            if name.ends_with("/HEAD") {
                continue;
            }
            branches
                .entry(object.to_string())
                .or_default()
                .push(name.to_string());
        } else if let Some(name) = refname.strip_prefix("refs/tags/") {
            let target = if peeled.is_empty() { object } else { peeled };
            tags.entry(target.to_string())
                .or_default()
                .push(name.to_string());
        }
    }

    (branches, tags)
}

/// Parse `git status --porcelain` into per-side entries.
fn parse_status(output: &str) -> Vec<FileStatus> {
    let mut entries = Vec::new();

    for line in output.lines() {
        let mut chars = line.chars();
        let (Some(x), Some(y), Some(' ')) = (chars.next(), chars.next(), chars.next()) else {
            continue;
        };
        let path = chars.as_str();
        // Renames report "old -> new"; the new path is the one to act on.
        let path = path
            .rsplit_once(" -> ")
            .map_or(path, |(_, new)| new)
            .to_string();

        if x == '?' {
            entries.push(FileStatus {
                path,
                kind: ChangeKind::Untracked,
                staged: false,
            });
            continue;
        }

        if let Some(kind) = ChangeKind::from_code(x) {
            entries.push(FileStatus {
                path: path.clone(),
                kind,
                staged: true,
            });
        }
        if let Some(kind) = ChangeKind::from_code(y) {
            entries.push(FileStatus {
                path,
                kind,
                staged: false,
            });
        }
    }

    entries
}

/// Synthesize a pure-addition diff for an untracked file.
fn untracked_diff(path: &str, content: &str) -> String {
    let mut out = format!(
        "diff --git a/{path} b/{path}\nnew file mode 100644\n--- /dev/null\n+++ b/{path}\n"
    );

    let count = content.lines().count();
    if count == 0 {
        return out;
    }

    out.push_str(&Hunk {
        old_start: 0,
        new_start: 1,
        lines: {
            let mut lines: Vec<HunkLine> = content
                .lines()
                .map(|line| HunkLine::Add(line.to_string()))
                .collect();
            if !content.ends_with('\n') {
                lines.push(HunkLine::NoNewline);
            }
            lines
        },
    }
    .to_string());
    out
}

use super::commit::{Commit, GraphLine, PALETTE_SIZE, RawCommit};

/// One active vertical lane, waiting for a specific commit to appear.
struct LaneSlot {
    expected: String,
    color: usize,
}

/// Assign a lane, color, and connector segments to every commit.
///
/// Input must be ordered reverse-topologically (children before parents), as
/// the history walk delivers it. The whole layout is a single forward pass
/// over that order: a list of active lanes keyed by expected-next commit id
/// is scanned per row, lowest index first, so the result is fully
/// deterministic for a given input.
///
/// A parent id that never appears later in the sequence (truncated history)
/// leaves its lane active and unresolved; no connector is drawn for it and
/// no error is raised.
pub fn build_graph(commits: Vec<RawCommit>) -> Vec<Commit> {
    let mut lanes: Vec<Option<LaneSlot>> = Vec::new();
    let mut next_color = 0usize;
    let mut out = Vec::with_capacity(commits.len());

    for raw in commits {
        let mut lines: Vec<GraphLine> = Vec::new();

        // Lanes expecting this commit, ascending index. More than one means
        // several children diverged from it and now converge back.
        let mut waiting: Vec<(usize, usize)> = Vec::new();
        for (idx, slot) in lanes.iter().enumerate() {
            if let Some(slot) = slot
                && slot.expected == raw.id
            {
                waiting.push((idx, slot.color));
            }
        }

        let (lane, color) = if let Some(&(lane, color)) = waiting.first() {
            // The commit inherits the lowest waiting lane; every waiting
            // lane terminates into it with an upper-half connector.
            for &(idx, c) in &waiting {
                lines.push(GraphLine {
                    upper: true,
                    from: idx,
                    to: lane,
                    color: c,
                });
                lanes[idx] = None;
            }
            (lane, color)
        } else {
            // First-seen branch tip: lowest unused lane, fresh color.
            let color = next_color % PALETTE_SIZE;
            next_color += 1;
            let lane = claim_free_lane(&mut lanes);
            (lane, color)
        };

        // Unrelated lanes continue straight through this row.
        for (idx, slot) in lanes.iter().enumerate() {
            if idx == lane {
                continue;
            }
            if let Some(slot) = slot {
                lines.push(GraphLine {
                    upper: true,
                    from: idx,
                    to: idx,
                    color: slot.color,
                });
                lines.push(GraphLine {
                    upper: false,
                    from: idx,
                    to: idx,
                    color: slot.color,
                });
            }
        }

        match raw.parents.first() {
            Some(first_parent) => {
                // Primary lineage continues in the same lane and color.
                lanes[lane] = Some(LaneSlot {
                    expected: first_parent.clone(),
                    color,
                });
                lines.push(GraphLine {
                    upper: false,
                    from: lane,
                    to: lane,
                    color,
                });
            }
            None => {
                // Root commit: the lane is retired.
                lanes[lane] = None;
            }
        }

        // Each additional parent of a merge gets its own column.
        for parent in raw.parents.iter().skip(1) {
            let mut existing = None;
            for (idx, slot) in lanes.iter().enumerate() {
                if let Some(slot) = slot
                    && slot.expected == *parent
                {
                    existing = Some((idx, slot.color));
                    break;
                }
            }

            match existing {
                Some((idx, c)) => {
                    // Another branch already waits on this parent; join it.
                    lines.push(GraphLine {
                        upper: false,
                        from: lane,
                        to: idx,
                        color: c,
                    });
                }
                None => {
                    let c = next_color % PALETTE_SIZE;
                    next_color += 1;
                    let idx = claim_free_lane(&mut lanes);
                    lanes[idx] = Some(LaneSlot {
                        expected: parent.clone(),
                        color: c,
                    });
                    lines.push(GraphLine {
                        upper: false,
                        from: lane,
                        to: idx,
                        color: c,
                    });
                }
            }
        }

        out.push(Commit {
            id: raw.id,
            parents: raw.parents,
            message: raw.message,
            author: raw.author,
            email: raw.email,
            timestamp: raw.timestamp,
            branches: raw.branches,
            tags: raw.tags,
            lane,
            lines,
        });
    }

    out
}

/// Reserve the lowest unused lane index, growing the lane list if needed.
fn claim_free_lane(lanes: &mut Vec<Option<LaneSlot>>) -> usize {
    match lanes.iter().position(Option::is_none) {
        Some(idx) => idx,
        None => {
            lanes.push(None);
            lanes.len() - 1
        }
    }
}

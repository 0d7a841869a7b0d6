//! Local merge vocabulary: strategies, conflict policies, and the helpers
//! that read conflict state out of git's index and output.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// How git should reconcile two divergent branches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    /// Three-way merge (git's default strategy)
    #[default]
    Recursive,
    /// Keep our tree, record the other branch as merged
    Ours,
    /// Three-way merge preferring their side on conflicting hunks
    Theirs,
    /// Classic two-head resolve
    Resolve,
    /// Multi-head merge
    Octopus,
}

impl MergeStrategy {
    /// Arguments passed to `git merge` for this strategy
    ///
    /// git has no `theirs` strategy, so it maps to the recursive strategy
    /// with the `theirs` option.
    pub fn git_args(&self) -> &'static [&'static str] {
        match self {
            MergeStrategy::Recursive => &["-s", "recursive"],
            MergeStrategy::Ours => &["-s", "ours"],
            MergeStrategy::Theirs => &["-s", "recursive", "-X", "theirs"],
            MergeStrategy::Resolve => &["-s", "resolve"],
            MergeStrategy::Octopus => &["-s", "octopus"],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MergeStrategy::Recursive => "recursive",
            MergeStrategy::Ours => "ours",
            MergeStrategy::Theirs => "theirs",
            MergeStrategy::Resolve => "resolve",
            MergeStrategy::Octopus => "octopus",
        }
    }
}

impl std::fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Which side to keep when resolving a conflicted file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictResolution {
    /// Keep the checked-out branch's version
    Ours,
    /// Keep the incoming branch's version
    Theirs,
    /// Keep both sides of every conflicting hunk, ours first
    Both,
}

impl std::fmt::Display for ConflictResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictResolution::Ours => write!(f, "ours"),
            ConflictResolution::Theirs => write!(f, "theirs"),
            ConflictResolution::Both => write!(f, "both"),
        }
    }
}

/// Stage bits of an index entry's flags (`GIT_INDEX_ENTRY_STAGEMASK`)
const INDEX_STAGE_MASK: u16 = 0x3000;
const INDEX_STAGE_SHIFT: u16 = 12;

/// Merge stage encoded in an index entry's flags (0 = merged, 1-3 = conflict sides)
pub fn index_stage(flags: u16) -> u16 {
    (flags & INDEX_STAGE_MASK) >> INDEX_STAGE_SHIFT
}

/// Collect every path that appears with a non-zero merge stage
///
/// A conflicted path shows up once per side, so the result is de-duplicated
/// and sorted.
pub fn unmerged_paths<I, P>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = (P, u16)>,
    P: Into<String>,
{
    entries
        .into_iter()
        .filter(|(_, stage)| *stage != 0)
        .map(|(path, _)| path.into())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

/// Matches git's per-path conflict report, e.g.
/// `CONFLICT (content): Merge conflict in src/lib.rs`
static CONFLICT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^CONFLICT \([^)]*\): (?:Merge conflict in (\S.*?)|(\S+) deleted in .*)\s*$")
        .expect("Invalid regex pattern for merge conflict detection")
});

/// Whether git output carries a merge-conflict marker
pub fn is_conflict_output(output: &str) -> bool {
    output.contains("CONFLICT (") || output.contains("Merge conflict in")
}

/// Paths named in git's `CONFLICT (...)` lines
pub fn conflict_paths_from_output(output: &str) -> Vec<String> {
    CONFLICT_LINE
        .captures_iter(output)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().trim().to_string())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

/// Rewrite conflicted content keeping both sides of every hunk
///
/// Conflict markers are dropped, as is the base section of diff3-style
/// hunks. Text outside hunks is left untouched.
pub fn keep_both_sides(content: &str) -> String {
    #[derive(PartialEq)]
    enum Section {
        Outside,
        Ours,
        Base,
        Theirs,
    }

    let mut section = Section::Outside;
    let mut out = String::with_capacity(content.len());

    for line in content.split_inclusive('\n') {
        let marker = |m: &str| line.starts_with(m);
        match section {
            Section::Outside if marker("<<<<<<<") => section = Section::Ours,
            Section::Ours if marker("|||||||") => section = Section::Base,
            Section::Ours | Section::Base if marker("=======") => section = Section::Theirs,
            Section::Theirs if marker(">>>>>>>") => section = Section::Outside,
            Section::Base => {}
            _ => out.push_str(line),
        }
    }

    out
}

//! Content metrics for transform hooks: line diff counts and byte sizes.

use similar::{Algorithm, ChangeTag, TextDiff};

/// Lines added and removed between two versions of a module's source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffCounts {
    pub added: u64,
    pub removed: u64,
}

/// Count the lines in inserted and deleted hunks of a line diff.
///
/// Missing content on either side, or identical content, yields zero for both.
pub fn diff_counts(from: Option<&str>, to: Option<&str>) -> DiffCounts {
    let (Some(from), Some(to)) = (from, to) else {
        return DiffCounts::default();
    };
    if from.is_empty() || to.is_empty() || from == to {
        return DiffCounts::default();
    }

    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_lines(from, to);

    diff.iter_all_changes()
        .fold(DiffCounts::default(), |mut counts, change| {
            match change.tag() {
                ChangeTag::Insert => counts.added += 1,
                ChangeTag::Delete => counts.removed += 1,
                ChangeTag::Equal => {}
            }
            counts
        })
}

/// UTF-8 encoded length of the content, zero when absent.
pub fn content_byte_size(content: Option<&str>) -> u64 {
    content.map_or(0, |c| c.len() as u64)
}

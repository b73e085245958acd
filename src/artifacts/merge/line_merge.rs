//! Line-level merge of two texts
//!
//! Both sides are scanned in lock-step. Equal lines are emitted once. On
//! divergence the scan looks ahead in the current side, past the diverging
//! line, for the first line that also appears in the rest of the given side,
//! and everything before that resync point goes into a conflict block:
//!
//! ```text
//! <<<<<<< HEAD
//! <current lines>
//! =======
//! <given lines>
//! >>>>>>>
//! ```
//!
//! Without a resync point both sides are consumed to their end inside the block.

const CURRENT_MARKER: &str = "<<<<<<< HEAD";
const SEPARATOR_MARKER: &str = "=======";
const GIVEN_MARKER: &str = ">>>>>>>";

pub type LineSet<'t> = Vec<&'t str>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMerge {
    text: String,
    conflicted: bool,
}

impl LineMerge {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_conflicted(&self) -> bool {
        self.conflicted
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Merge two optional texts; a missing side contributes no lines
pub fn merge_lines(current: Option<&str>, given: Option<&str>) -> LineMerge {
    let current: LineSet = current.map(|text| text.lines().collect()).unwrap_or_default();
    let given: LineSet = given.map(|text| text.lines().collect()).unwrap_or_default();

    let mut text = String::new();
    let mut conflicted = false;
    let (mut i, mut j) = (0, 0);

    while i < current.len() || j < given.len() {
        if i < current.len() && j < given.len() && current[i] == given[j] {
            push_line(&mut text, current[i]);
            i += 1;
            j += 1;
            continue;
        }

        let (k, m) = resync_point(&current, &given, i, j);

        push_line(&mut text, CURRENT_MARKER);
        current[i..k].iter().for_each(|line| push_line(&mut text, line));
        push_line(&mut text, SEPARATOR_MARKER);
        given[j..m].iter().for_each(|line| push_line(&mut text, line));
        push_line(&mut text, GIVEN_MARKER);

        conflicted = true;
        i = k;
        j = m;
    }

    LineMerge { text, conflicted }
}

// The first current line after `i` that also occurs in `given[j..]`, paired
// with its position there. The diverging line itself never resyncs, so every
// block takes at least one current line when any are left.
fn resync_point(current: &[&str], given: &[&str], i: usize, j: usize) -> (usize, usize) {
    current
        .get(i + 1..)
        .unwrap_or_default()
        .iter()
        .enumerate()
        .find_map(|(offset, line)| {
            given[j..]
                .iter()
                .position(|candidate| candidate == line)
                .map(|position| (i + 1 + offset, j + position))
        })
        .unwrap_or((current.len(), given.len()))
}

fn push_line(text: &mut String, line: &str) {
    text.push_str(line);
    text.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn single_line_edited_on_both_sides_conflicts() {
        let merge = merge_lines(Some("z\n"), Some("y\n"));

        assert!(merge.is_conflicted());
        assert_eq!(merge.text(), "<<<<<<< HEAD\nz\n=======\ny\n>>>>>>>\n");
    }

    #[test]
    fn identical_texts_merge_cleanly() {
        let merge = merge_lines(Some("a\nb\nc\n"), Some("a\nb\nc\n"));

        assert!(!merge.is_conflicted());
        assert_eq!(merge.text(), "a\nb\nc\n");
    }

    #[test]
    fn merge_resyncs_after_a_divergent_region() {
        let merge = merge_lines(Some("a\nx\nc\nd\n"), Some("a\ny\nc\nd\n"));

        assert_eq!(
            merge.text(),
            "a\n<<<<<<< HEAD\nx\n=======\ny\n>>>>>>>\nc\nd\n"
        );
    }

    #[test]
    fn diverging_line_is_never_its_own_resync_point() {
        let merge = merge_lines(Some("x\n"), Some("y\nx\n"));

        assert_eq!(merge.text(), "<<<<<<< HEAD\nx\n=======\ny\nx\n>>>>>>>\n");
    }

    #[test]
    fn lines_inserted_on_one_side_end_the_block_at_the_next_shared_line() {
        let merge = merge_lines(Some("a\nc\nd\n"), Some("a\nb\nc\nd\n"));

        assert_eq!(
            merge.text(),
            "a\n<<<<<<< HEAD\nc\n=======\nb\nc\n>>>>>>>\nd\n"
        );
    }

    #[rstest]
    #[case(None, Some("y\n"), "<<<<<<< HEAD\n=======\ny\n>>>>>>>\n")]
    #[case(Some("z\n"), None, "<<<<<<< HEAD\nz\n=======\n>>>>>>>\n")]
    fn missing_side_contributes_no_lines(
        #[case] current: Option<&str>,
        #[case] given: Option<&str>,
        #[case] expected: &str,
    ) {
        let merge = merge_lines(current, given);

        assert!(merge.is_conflicted());
        assert_eq!(merge.text(), expected);
    }

    #[test]
    fn two_empty_sides_merge_to_nothing() {
        let merge = merge_lines(None, Some(""));

        assert!(!merge.is_conflicted());
        assert_eq!(merge.text(), "");
    }

    proptest! {
        #[test]
        fn every_input_line_survives_the_merge(
            current in prop::collection::vec("[a-d]", 0..8),
            given in prop::collection::vec("[a-d]", 0..8),
        ) {
            let current_text = current.iter().map(|line| format!("{line}\n")).collect::<String>();
            let given_text = given.iter().map(|line| format!("{line}\n")).collect::<String>();

            let merge = merge_lines(Some(current_text.as_str()), Some(given_text.as_str()));
            let body = merge
                .text()
                .lines()
                .filter(|line| ![CURRENT_MARKER, SEPARATOR_MARKER, GIVEN_MARKER].contains(line))
                .count();

            prop_assert_eq!(merge.is_conflicted(), current != given);
            prop_assert!(body >= current.len().max(given.len()));
            prop_assert!(body <= current.len() + given.len());
        }
    }
}

/// Literal separator treated as a column/cell boundary inside a line.
const CELL_SEPARATOR: &str = "  ";

/// Trims every line, splits it on double spaces and keeps the non-empty,
/// trimmed fragments in document order.
pub fn split_fragments<S: AsRef<str>>(lines: &[S]) -> Vec<&str> {
    lines
        .iter()
        .map(|line| line.as_ref().trim())
        .flat_map(|line| line.split(CELL_SEPARATOR))
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect()
}

/// Collapses lines into one string.
///
/// Fragments are concatenated with no separator, so a line ending in "end"
/// followed by a line starting with "Start" yields "endStart". Word
/// boundaries survive only where the source text itself carried spacing.
pub fn join_fragments<S: AsRef<str>>(lines: &[S]) -> String {
    split_fragments(lines).concat()
}

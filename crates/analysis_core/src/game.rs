//! Game records as yielded by game sources.

use shakmaty::san::SanPlus;

/// Declared outcome of a recorded game, as encoded in its `Result` tag.
///
/// Only the two decisive encodings are recognized; everything else
/// (`1/2-1/2`, `*`, garbage) is `Other` and lands in the draw bucket of
/// the tally. That includes genuinely unterminated games, a documented
/// caveat of the counting policy, kept on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredResult {
    WhiteWins,
    BlackWins,
    Other,
}

impl DeclaredResult {
    /// Decode a `Result` tag value.
    pub fn from_tag(value: &str) -> DeclaredResult {
        match value.trim() {
            "1-0" => DeclaredResult::WhiteWins,
            "0-1" => DeclaredResult::BlackWins,
            _ => DeclaredResult::Other,
        }
    }
}

/// One game as obtained from a source: header tags, the move list in SAN,
/// and the declared result if the source carries one.
///
/// Immutable once yielded; the batch driver only reads it.
#[derive(Debug, Clone)]
pub struct GameRecord {
    /// Header tag pairs in file order (empty for self-play games).
    pub tags: Vec<(String, String)>,
    /// Moves from the standard starting position.
    pub moves: Vec<SanPlus>,
    /// Declared result; `None` for self-play games, which are
    /// evaluation-only and excluded from the tally.
    pub result: Option<DeclaredResult>,
}

impl GameRecord {
    /// Look up a header tag by name.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Short one-line description for progress logging.
    pub fn summary(&self) -> String {
        let white = self.tag("White").unwrap_or("?");
        let black = self.tag("Black").unwrap_or("?");
        let result = self.tag("Result").unwrap_or("*");
        format!("{} vs {} ({}) [{} plies]", white, black, result, self.moves.len())
    }
}

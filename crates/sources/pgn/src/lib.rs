//! Recorded-game source: a streaming PGN decoder.
//!
//! Games are decoded one at a time from a sequential PGN file until
//! exhausted. A malformed record yields a `DecodeError` item and the
//! stream continues with the next game; one corrupt export never kills
//! a batch.
//!
//! Movetext handling covers what real exports contain: brace comments
//! (possibly spanning lines), `;` line comments, nested `(...)`
//! variations, `$n` NAGs, move numbers, and the four game terminators.
//! Variations and annotations are skipped; only the mainline is kept.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use analysis_core::{DecodeError, DeclaredResult, GameRecord, GameSource};
use shakmaty::san::SanPlus;
use tracing::debug;

/// Streaming decoder over any buffered reader.
pub struct PgnSource<R> {
    reader: R,
    /// Line pushed back when the next game's tag section is detected early.
    pending: Option<String>,
    done: bool,
}

impl PgnSource<BufReader<File>> {
    /// Open a PGN file for streaming.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        Ok(Self::from_reader(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> PgnSource<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            pending: None,
            done: false,
        }
    }

    /// Next line, or `None` at end of input. An I/O error ends the stream.
    fn read_line(&mut self) -> Option<String> {
        if let Some(line) = self.pending.take() {
            return Some(line);
        }
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line),
            Err(err) => {
                debug!("read error, ending stream: {err}");
                self.done = true;
                None
            }
        }
    }

    /// Collect one game's raw block: its tag lines and its movetext.
    fn next_block(&mut self) -> Option<(Vec<String>, String)> {
        // Skip blank lines between games.
        let mut current = loop {
            let line = self.read_line()?;
            if !line.trim().is_empty() {
                break line;
            }
        };

        let mut tag_lines = Vec::new();
        let mut movetext = String::new();
        let mut in_movetext = false;
        let mut blank_after_tags = false;

        loop {
            let trimmed = current.trim();
            if trimmed.is_empty() {
                if in_movetext {
                    break;
                }
                blank_after_tags = !tag_lines.is_empty();
            } else if !in_movetext && trimmed.starts_with('[') {
                if blank_after_tags {
                    // Tag section of the next game; push it back.
                    self.pending = Some(current);
                    break;
                }
                tag_lines.push(trimmed.to_string());
            } else {
                in_movetext = true;
                movetext.push_str(&current);
                if !current.ends_with('\n') {
                    movetext.push('\n');
                }
            }

            current = match self.read_line() {
                Some(line) => line,
                None => break,
            };
        }

        Some((tag_lines, movetext))
    }
}

impl<R: BufRead> GameSource for PgnSource<R> {
    fn next_game(&mut self) -> Option<Result<GameRecord, DecodeError>> {
        if self.done {
            return None;
        }
        let (tag_lines, movetext) = self.next_block()?;
        Some(decode_game(&tag_lines, &movetext))
    }
}

fn decode_game(tag_lines: &[String], movetext: &str) -> Result<GameRecord, DecodeError> {
    let mut tags = Vec::with_capacity(tag_lines.len());
    for line in tag_lines {
        tags.push(parse_tag(line)?);
    }

    let (moves, terminator) = parse_movetext(movetext)?;

    // The Result tag is authoritative; the movetext terminator is the
    // fallback. Anything non-decisive classifies as Other.
    let declared = tags
        .iter()
        .find(|(key, _)| key == "Result")
        .map(|(_, value)| value.as_str())
        .or(terminator);

    debug!(
        "decoded game: {} tags, {} plies, result {:?}",
        tags.len(),
        moves.len(),
        declared
    );

    let result = Some(declared.map_or(DeclaredResult::Other, DeclaredResult::from_tag));

    Ok(GameRecord {
        tags,
        moves,
        result,
    })
}

/// Parse one `[Key "Value"]` tag pair.
fn parse_tag(line: &str) -> Result<(String, String), DecodeError> {
    let inner = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| DecodeError(format!("bad tag line `{line}`")))?;
    let (key, rest) = inner
        .split_once(char::is_whitespace)
        .ok_or_else(|| DecodeError(format!("tag without value `{line}`")))?;
    let value = rest
        .trim()
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| DecodeError(format!("unquoted tag value `{line}`")))?;
    Ok((key.to_string(), value.replace("\\\"", "\"")))
}

/// Tokenize movetext into SAN moves and the game terminator, skipping
/// comments, variations, NAGs and move numbers.
fn parse_movetext(movetext: &str) -> Result<(Vec<SanPlus>, Option<&'static str>), DecodeError> {
    let cleaned = strip_annotations(movetext);
    let mut moves = Vec::new();
    let mut terminator = None;

    for token in cleaned.split_whitespace() {
        match token {
            "1-0" => terminator = Some("1-0"),
            "0-1" => terminator = Some("0-1"),
            "1/2-1/2" => terminator = Some("1/2-1/2"),
            "*" => terminator = Some("*"),
            _ if token.starts_with('$') => continue,
            _ => {
                // Move numbers: "12.", "12..." or glued "12.e4".
                let stripped =
                    token.trim_start_matches(|c: char| c.is_ascii_digit() || c == '.');
                if stripped.is_empty() {
                    continue;
                }
                let san = stripped
                    .parse::<SanPlus>()
                    .map_err(|err| DecodeError(format!("bad SAN `{token}`: {err}")))?;
                moves.push(san);
            }
        }
        if terminator.is_some() {
            break;
        }
    }

    Ok((moves, terminator))
}

/// Remove brace comments, `;` line comments and parenthesized variations,
/// leaving a whitespace-separated token stream.
fn strip_annotations(movetext: &str) -> String {
    let mut cleaned = String::with_capacity(movetext.len());
    let mut in_brace = false;
    let mut in_line_comment = false;
    let mut variation_depth = 0usize;

    for c in movetext.chars() {
        // Comment states take priority everywhere, including inside a
        // variation: parentheses in comment text are plain text and must
        // not disturb the variation depth.
        if in_brace {
            if c == '}' {
                in_brace = false;
                if variation_depth == 0 {
                    cleaned.push(' ');
                }
            }
            continue;
        }
        if in_line_comment {
            if c == '\n' {
                in_line_comment = false;
                if variation_depth == 0 {
                    cleaned.push('\n');
                }
            }
            continue;
        }
        if variation_depth > 0 {
            match c {
                '{' => in_brace = true,
                ';' => in_line_comment = true,
                '(' => variation_depth += 1,
                ')' => {
                    variation_depth -= 1;
                    if variation_depth == 0 {
                        cleaned.push(' ');
                    }
                }
                _ => {}
            }
            continue;
        }
        match c {
            '{' => in_brace = true,
            ';' => in_line_comment = true,
            '(' => variation_depth = 1,
            _ => cleaned.push(c),
        }
    }

    cleaned
}

#[cfg(test)]
mod lib_tests;

use super::*;

fn source_from(text: &str) -> PgnSource<&[u8]> {
    PgnSource::from_reader(text.as_bytes())
}

#[test]
fn decodes_two_games_in_order() {
    let pgn = "\
[Event \"Test\"]
[White \"Alice\"]
[Black \"Bob\"]
[Result \"1-0\"]

1. e4 e5 2. Nf3 Nc6 1-0

[Event \"Test\"]
[White \"Carol\"]
[Black \"Dave\"]
[Result \"0-1\"]

1. d4 d5 0-1
";
    let mut source = source_from(pgn);

    let first = source.next_game().unwrap().unwrap();
    assert_eq!(first.tag("White"), Some("Alice"));
    assert_eq!(first.moves.len(), 4);
    assert_eq!(first.result, Some(DeclaredResult::WhiteWins));

    let second = source.next_game().unwrap().unwrap();
    assert_eq!(second.tag("Black"), Some("Dave"));
    assert_eq!(second.moves.len(), 2);
    assert_eq!(second.result, Some(DeclaredResult::BlackWins));

    assert!(source.next_game().is_none());
}

#[test]
fn skips_comments_variations_and_nags() {
    let pgn = "\
[Result \"1/2-1/2\"]

1. e4 {king's pawn,
spanning two lines} e5 $1 2. Nf3 (2. f4 {king's gambit} exf4) 2... Nc6
; trailing line comment
1/2-1/2
";
    let mut source = source_from(pgn);
    let game = source.next_game().unwrap().unwrap();
    assert_eq!(game.moves.len(), 4);
    assert_eq!(game.result, Some(DeclaredResult::Other));
}

#[test]
fn parens_inside_variation_comments_do_not_leak_moves() {
    // The unmatched `)` inside the brace comment must not close the
    // variation early; fxe5 belongs to the variation, not the mainline.
    let pgn = "\
[Result \"1-0\"]

1. e4 (1. f4 {risky :)} e5 2. fxe5) e5 1-0
";
    let mut source = source_from(pgn);
    let game = source.next_game().unwrap().unwrap();
    assert_eq!(game.moves.len(), 2);
    assert_eq!(game.moves[0].to_string(), "e4");
    assert_eq!(game.moves[1].to_string(), "e5");
}

#[test]
fn malformed_game_is_an_err_item_not_the_end() {
    let pgn = "\
[Result \"1-0\"]

1. e4 Zz9 1-0

[Result \"0-1\"]

1. d4 d5 0-1
";
    let mut source = source_from(pgn);

    assert!(source.next_game().unwrap().is_err());

    let next = source.next_game().unwrap().unwrap();
    assert_eq!(next.moves.len(), 2);
    assert_eq!(next.result, Some(DeclaredResult::BlackWins));
}

#[test]
fn result_tag_wins_over_missing_terminator() {
    let pgn = "\
[Result \"1-0\"]

1. e4 e5
";
    let mut source = source_from(pgn);
    let game = source.next_game().unwrap().unwrap();
    assert_eq!(game.result, Some(DeclaredResult::WhiteWins));
}

#[test]
fn terminator_is_the_fallback_without_a_result_tag() {
    let pgn = "1. e4 e5 0-1\n";
    let mut source = source_from(pgn);
    let game = source.next_game().unwrap().unwrap();
    assert!(game.tags.is_empty());
    assert_eq!(game.result, Some(DeclaredResult::BlackWins));
}

#[test]
fn unterminated_star_games_classify_as_other() {
    let pgn = "\
[Result \"*\"]

1. e4 *
";
    let mut source = source_from(pgn);
    let game = source.next_game().unwrap().unwrap();
    assert_eq!(game.result, Some(DeclaredResult::Other));
}

#[test]
fn consecutive_tag_sections_split_correctly() {
    // Second game detected by its tag section after a blank line, even
    // though the first game has no movetext at all.
    let pgn = "\
[Event \"Empty\"]
[Result \"*\"]

[Event \"Real\"]
[Result \"1-0\"]

1. e4 1-0
";
    let mut source = source_from(pgn);

    let first = source.next_game().unwrap().unwrap();
    assert_eq!(first.tag("Event"), Some("Empty"));
    assert!(first.moves.is_empty());

    let second = source.next_game().unwrap().unwrap();
    assert_eq!(second.tag("Event"), Some("Real"));
    assert_eq!(second.moves.len(), 1);
}

#[test]
fn bad_tag_line_fails_that_game_only() {
    let pgn = "\
[Event no quotes]

1. e4 *

[Result \"1-0\"]

1. d4 1-0
";
    let mut source = source_from(pgn);
    assert!(source.next_game().unwrap().is_err());
    assert!(source.next_game().unwrap().is_ok());
}

#[test]
fn glued_move_numbers_are_stripped() {
    let pgn = "1.e4 e5 2.Nf3 1-0\n";
    let mut source = source_from(pgn);
    let game = source.next_game().unwrap().unwrap();
    assert_eq!(game.moves.len(), 3);
    assert_eq!(game.moves[0].to_string(), "e4");
}

use super::*;

#[test]
fn decisive_results_and_fallback_draws() {
    let mut tally = ResultTally::new();
    for tag in ["1-0", "0-1", "1-0", "*"] {
        tally.record(DeclaredResult::from_tag(tag));
    }
    assert_eq!(tally.white_wins, 2);
    assert_eq!(tally.black_wins, 1);
    assert_eq!(tally.draws, 1);
    assert_eq!(tally.total_games(), 4);
}

#[test]
fn unknown_encodings_fall_into_the_draw_bucket() {
    assert_eq!(DeclaredResult::from_tag("1/2-1/2"), DeclaredResult::Other);
    assert_eq!(DeclaredResult::from_tag("*"), DeclaredResult::Other);
    assert_eq!(DeclaredResult::from_tag("unknown"), DeclaredResult::Other);
    assert_eq!(DeclaredResult::from_tag(""), DeclaredResult::Other);
}

#[test]
fn result_tags_are_trimmed() {
    assert_eq!(DeclaredResult::from_tag(" 1-0 "), DeclaredResult::WhiteWins);
    assert_eq!(DeclaredResult::from_tag("0-1\n"), DeclaredResult::BlackWins);
}

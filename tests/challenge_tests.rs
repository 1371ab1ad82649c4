//! Challenge resolution tests.
//!
//! A challenge against a play with an unknown word takes the play back;
//! against a valid play it costs the challenger according to the game's
//! challenge penalty.

use std::sync::Arc;

use rust_wordgame::core::{
    ChallengePenalty, Game, GameConfig, GameError, GameState, Move, Player, PlayerKey, TurnType,
};
use rust_wordgame::lexicon::{DawgBuilder, Lexicon};
use rust_wordgame::notify::RecordingChannel;
use rust_wordgame::rules::{GameEngine, TurnEngine};
use rust_wordgame::tiles::{LetterBag, Tile};

// ============================================================================
// Helpers
// ============================================================================

fn key(k: &str) -> PlayerKey {
    PlayerKey::new(k)
}

fn tile(letter: char) -> Tile {
    Tile::new(letter, 1)
}

/// A game in play with the given racks (player keys `p1`, `p2`, ...) and
/// bag contents.
fn setup(config: GameConfig, racks: &[&str], bag: &str) -> Game {
    let mut game = Game::new(config.with_seed(11));
    game.letter_bag = LetterBag::new(3);
    for letter in bag.chars() {
        game.letter_bag.return_tile(&tile(letter));
    }
    for (i, rack) in racks.iter().enumerate() {
        let mut player = Player::new(format!("p{}", i + 1), format!("Player {}", i + 1), 7);
        for letter in rack.chars() {
            player.rack.add_tile(&tile(letter));
        }
        game.add_player(player, false).unwrap();
    }
    assert!(game.play_if_ready());
    game
}

fn engine(channel: &RecordingChannel) -> TurnEngine {
    let bytes = DawgBuilder::from_words(["SINK", "SIN", "INK", "DOG"]).build();
    let lexicon = Lexicon::from_bytes("test", &bytes).unwrap();
    TurnEngine::new()
        .with_lexicon(Arc::new(lexicon))
        .with_channel(channel.clone())
}

fn sink() -> Move {
    Move::new(
        &[
            tile('S').at(7, 6),
            tile('I').at(7, 7),
            tile('N').at(7, 8),
            tile('K').at(7, 9),
        ],
        8,
    )
    .with_word("SINK", 8)
}

fn xyzzy() -> Move {
    Move::new(&[tile('X').at(7, 7), tile('Y').at(7, 8), tile('Z').at(7, 9)], 25).with_word("XYZ", 25)
}

// ============================================================================
// Failed challenges
// ============================================================================

#[test]
fn test_miss_turn_penalty_forfeits_challengers_turn() {
    let channel = RecordingChannel::new();
    let engine = engine(&channel);
    let config = GameConfig::default().with_challenge_penalty(ChallengePenalty::MissTurn, 0);
    let mut game = setup(config, &["SINKABC", "DOGEFGH"], "EEEEEEEE");

    engine.play(&mut game, &key("p1"), &sink()).unwrap();
    assert_eq!(game.whos_turn_key, Some(key("p2")));
    engine.challenge(&mut game, &key("p2"), &key("p1")).unwrap();

    let turn = game.last_turn().unwrap();
    assert_eq!(turn.turn_type, TurnType::ChallengeLost);
    assert_eq!(turn.score, 0);
    assert_eq!(turn.player_key, key("p1"));
    assert_eq!(turn.challenger_key, Some(key("p2")));
    assert_eq!(turn.next_to_go_key, Some(key("p1")));
    assert_eq!(turn.penalty, Some(ChallengePenalty::MissTurn));

    assert_eq!(game.whos_turn_key, Some(key("p1")));
    assert!(!game.players[1].miss_next_turn);
    assert_eq!(game.players[0].score, 8);
    assert_eq!(game.players[1].score, 0);
    assert_eq!(channel.tags(), vec!["TURN", "TURN"]);
}

#[test]
fn test_per_turn_penalty_keeps_turn_with_challenger() {
    let channel = RecordingChannel::new();
    let engine = engine(&channel);
    let config = GameConfig::default().with_challenge_penalty(ChallengePenalty::PerTurn, 5);
    let mut game = setup(config, &["SINKABC", "DOGEFGH"], "EEEEEEEE");

    engine.play(&mut game, &key("p1"), &sink()).unwrap();
    engine.challenge(&mut game, &key("p2"), &key("p1")).unwrap();

    let turn = game.last_turn().unwrap();
    assert_eq!(turn.turn_type, TurnType::ChallengeLost);
    assert_eq!(turn.score, -5);
    assert_eq!(turn.next_to_go_key, Some(key("p2")));
    assert_eq!(game.whos_turn_key, Some(key("p2")));
    assert_eq!(game.players[1].score, -5);
}

#[test]
fn test_per_word_penalty_scales_with_words() {
    let engine = engine(&RecordingChannel::new());
    let config = GameConfig::default().with_challenge_penalty(ChallengePenalty::PerWord, 3);
    let mut game = setup(config, &["SINKABC", "DOGEFGH"], "EEEEEEEE");

    let mv = sink().with_word("SIN", 3);
    engine.play(&mut game, &key("p1"), &mv).unwrap();
    engine.challenge(&mut game, &key("p2"), &key("p1")).unwrap();

    assert_eq!(game.last_turn().unwrap().score, -6);
    assert_eq!(game.players[1].score, -6);
}

#[test]
fn test_challenger_not_next_misses_their_next_turn() {
    let engine = engine(&RecordingChannel::new());
    let config = GameConfig::default().with_challenge_penalty(ChallengePenalty::MissTurn, 0);
    let mut game = setup(config, &["SINKABC", "DOGEFGH", "ABCDEFG"], "EEEEEEEE");

    engine.play(&mut game, &key("p1"), &sink()).unwrap();
    engine.challenge(&mut game, &key("p3"), &key("p1")).unwrap();

    let turn = game.last_turn().unwrap();
    assert_eq!(turn.turn_type, TurnType::ChallengeLost);
    assert_eq!(turn.next_to_go_key, Some(key("p2")));
    assert_eq!(turn.penalty, None);
    assert!(game.players[2].miss_next_turn);

    // p3's turn is skipped, once.
    engine.pass(&mut game, &key("p2"), TurnType::Passed).unwrap();
    assert_eq!(game.whos_turn_key, Some(key("p1")));
    assert!(!game.players[2].miss_next_turn);
}

#[test]
fn test_failed_challenge_of_final_play_ends_game() {
    let engine = engine(&RecordingChannel::new());
    let config = GameConfig::default().with_challenge_penalty(ChallengePenalty::MissTurn, 0);
    let mut game = setup(config, &["SINK", "DOG"], "");

    engine.play(&mut game, &key("p1"), &sink()).unwrap();
    assert!(game.players[0].rack.is_empty());
    engine.challenge(&mut game, &key("p2"), &key("p1")).unwrap();

    assert_eq!(game.state, GameState::FailedChallenge);
    let turn = game.last_turn().unwrap();
    assert_eq!(turn.turn_type, TurnType::GameEnded);
    assert_eq!(turn.end_state, Some(GameState::FailedChallenge));
    // p2 loses the tiles left on their rack to p1.
    assert_eq!(game.players[1].score, -3);
    assert_eq!(game.players[0].score, 8 + 3);
}

#[test]
fn test_failed_challenge_of_final_play_by_later_player() {
    let engine = engine(&RecordingChannel::new());
    let config = GameConfig::default().with_challenge_penalty(ChallengePenalty::MissTurn, 0);
    let mut game = setup(config, &["SINK", "DOG", "ART"], "");

    engine.play(&mut game, &key("p1"), &sink()).unwrap();
    assert!(game.players[0].rack.is_empty());
    engine.challenge(&mut game, &key("p3"), &key("p1")).unwrap();

    // p3 is not next, so the game goes on and p3 sits out a turn instead.
    assert_eq!(game.state, GameState::Playing);
    assert_eq!(game.last_turn().unwrap().turn_type, TurnType::ChallengeLost);
    assert!(game.players[2].miss_next_turn);
    assert_eq!(game.whos_turn_key, Some(key("p2")));
}

#[test]
fn test_failed_challenge_of_final_play_with_points_penalty() {
    let engine = engine(&RecordingChannel::new());
    let config = GameConfig::default().with_challenge_penalty(ChallengePenalty::PerTurn, 5);
    let mut game = setup(config, &["SINK", "DOG"], "");

    engine.play(&mut game, &key("p1"), &sink()).unwrap();
    engine.challenge(&mut game, &key("p2"), &key("p1")).unwrap();

    assert_eq!(game.state, GameState::Playing);
    assert_eq!(game.last_turn().unwrap().turn_type, TurnType::ChallengeLost);
    assert_eq!(game.players[1].score, -5);

    engine.confirm_game_over(&mut game, &key("p2"), GameState::GameOver).unwrap();
    assert_eq!(game.state, GameState::GameOver);
    assert_eq!(game.players[1].score, -8);
}

// ============================================================================
// Successful challenges
// ============================================================================

#[test]
fn test_bad_word_is_taken_back() {
    let channel = RecordingChannel::new();
    let engine = engine(&channel);
    let mut game = setup(GameConfig::default(), &["XYZABCD", "DOGEFGH"], "EEE");

    engine.play(&mut game, &key("p1"), &xyzzy()).unwrap();
    assert_eq!(game.players[0].rack.letters().iter().filter(|&&c| c == 'E').count(), 3);
    engine.challenge(&mut game, &key("p2"), &key("p1")).unwrap();

    let turn = game.last_turn().unwrap();
    assert_eq!(turn.turn_type, TurnType::ChallengeWon);
    assert_eq!(turn.player_key, key("p1"));
    assert_eq!(turn.challenger_key, Some(key("p2")));
    assert_eq!(turn.score, -25);
    assert_eq!(turn.next_to_go_key, Some(key("p2")));

    assert_eq!(game.players[0].score, 0);
    assert!(game.board.is_empty());
    let mut rack = game.players[0].rack.letters();
    rack.sort_unstable();
    assert_eq!(rack, vec!['A', 'B', 'C', 'D', 'X', 'Y', 'Z']);
    assert_eq!(game.letter_bag.remaining(), 3);
    assert_eq!(game.whos_turn_key, Some(key("p2")));
}

#[test]
fn test_challenge_without_dictionary_succeeds() {
    let engine = TurnEngine::new();
    let mut game = setup(GameConfig::default(), &["SINKABC", "DOGEFGH"], "EEEE");

    engine.play(&mut game, &key("p1"), &sink()).unwrap();
    engine.challenge(&mut game, &key("p2"), &key("p1")).unwrap();
    assert_eq!(game.last_turn().unwrap().turn_type, TurnType::ChallengeWon);
    assert_eq!(game.players[0].score, 0);
}

// ============================================================================
// Invalid challenges
// ============================================================================

#[test]
fn test_invalid_challenges_are_errors() {
    let engine = engine(&RecordingChannel::new());
    let mut game = setup(GameConfig::default(), &["SINKABC", "DOGEFGH", "ABCDEFG"], "EEEE");

    assert_eq!(
        engine.challenge(&mut game, &key("p2"), &key("p1")),
        Err(GameError::NoPreviousMove)
    );

    engine.play(&mut game, &key("p1"), &sink()).unwrap();
    assert_eq!(
        engine.challenge(&mut game, &key("p1"), &key("p1")),
        Err(GameError::SelfChallenge)
    );
    assert_eq!(
        engine.challenge(&mut game, &key("p2"), &key("p3")),
        Err(GameError::ChallengeMismatch)
    );
    assert_eq!(
        engine.challenge(&mut game, &key("p9"), &key("p1")),
        Err(GameError::UnknownPlayer(key("p9")))
    );

    engine.pass(&mut game, &key("p2"), TurnType::Passed).unwrap();
    assert_eq!(
        engine.challenge(&mut game, &key("p3"), &key("p2")),
        Err(GameError::CannotChallenge(TurnType::Passed))
    );
}

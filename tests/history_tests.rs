//! Undo, redo and replay tests.
//!
//! Undoing a turn must leave the game exactly as it was before the turn;
//! replaying a game's turns from the start must rebuild the same game.

use std::sync::Arc;

use rust_wordgame::core::{
    ChallengePenalty, Game, GameConfig, GameError, GameState, Move, Player, PlayerKey, TurnType,
};
use rust_wordgame::history::{Replay, Undo};
use rust_wordgame::lexicon::{DawgBuilder, Lexicon};
use rust_wordgame::notify::{Notification, RecordingChannel};
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

fn setup(config: GameConfig, racks: &[&str], bag: &str) -> Game {
    let mut game = Game::new(config.with_seed(21));
    game.letter_bag = LetterBag::new(4);
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

fn engine() -> TurnEngine {
    let bytes = DawgBuilder::from_words(["CAT", "AT", "TO", "DOG", "GOD"]).build();
    TurnEngine::new().with_lexicon(Arc::new(Lexicon::from_bytes("test", &bytes).unwrap()))
}

fn cat() -> Move {
    Move::new(&[tile('C').at(7, 7), tile('A').at(7, 8), tile('T').at(7, 9)], 5).with_word("CAT", 5)
}

fn dog() -> Move {
    Move::new(&[tile('D').at(8, 6), tile('O').at(8, 7), tile('G').at(8, 8)], 7).with_word("DOG", 7)
}

fn sorted(mut letters: Vec<char>) -> Vec<char> {
    letters.sort_unstable();
    letters
}

/// The parts of a game a turn can change, in comparable form.
fn snapshot(game: &Game) -> (Vec<(i32, u32, bool, Vec<char>)>, Vec<Tile>, Vec<char>, Option<PlayerKey>, GameState) {
    let players = game
        .players
        .iter()
        .map(|p| (p.score, p.passes, p.miss_next_turn, sorted(p.rack.letters())))
        .collect();
    (
        players,
        game.board.tiles().cloned().collect(),
        sorted(game.letter_bag.letters()),
        game.whos_turn_key.clone(),
        game.state,
    )
}

type Step = Box<dyn Fn(&TurnEngine, &mut Game) -> Result<(), GameError>>;

fn step(f: impl Fn(&TurnEngine, &mut Game) -> Result<(), GameError> + 'static) -> Step {
    Box::new(f)
}

// ============================================================================
// Undo / redo
// ============================================================================

#[test]
fn test_undo_with_no_turns() {
    let mut game = setup(GameConfig::default(), &["CATABCD", "DOGEFGH"], "");
    assert_eq!(engine().undo(&mut game), Err(GameError::NothingToUndo));
}

#[test]
fn test_undo_each_turn_type_restores_state() {
    let engine = engine();
    let config = GameConfig::default()
        .with_take_back(true)
        .with_challenge_penalty(ChallengePenalty::PerTurn, 5);
    let mut game = setup(config, &["CATABCD", "DOGEFGH"], "QRSTUVWXYZ");

    let steps = [
        step(|e, g| e.play(g, &key("p1"), &cat())),
        step(|e, g| e.challenge(g, &key("p2"), &key("p1"))),
        step(|e, g| e.play(g, &key("p2"), &dog())),
        step(|e, g| e.take_back(g, &key("p2"), TurnType::TookBack)),
        step(|e, g| e.swap(g, &key("p2"), &[tile('E'), tile('F')])),
        step(|e, g| e.pass(g, &key("p1"), TurnType::Passed)),
        // Not a word, so the challenge that follows succeeds.
        step(|e, g| e.play(g, &key("p2"), &Move::new(&[tile('H').at(0, 0)], 3).with_word("H", 3))),
        step(|e, g| e.challenge(g, &key("p1"), &key("p2"))),
        step(|e, g| e.confirm_game_over(g, &key("p1"), GameState::GameOver)),
    ];

    for apply in &steps {
        let before = snapshot(&game);
        let turns = game.turns.len();
        apply(&engine, &mut game).unwrap();
        assert_eq!(game.turns.len(), turns + 1);
        let after = snapshot(&game);

        let undone = engine.undo(&mut game).unwrap();
        assert_eq!(snapshot(&game), before, "undo of {}", undone.turn_type);
        assert_eq!(game.turns.len(), turns);

        engine.redo(&mut game, undone).unwrap();
        assert_eq!(snapshot(&game), after);
    }

    let types: Vec<_> = game.turns.iter().map(|t| t.turn_type).collect();
    assert_eq!(
        types,
        vec![
            TurnType::Played,
            TurnType::ChallengeLost,
            TurnType::Played,
            TurnType::TookBack,
            TurnType::Swapped,
            TurnType::Passed,
            TurnType::Played,
            TurnType::ChallengeWon,
            TurnType::GameEnded,
        ]
    );
}

#[test]
fn test_undo_restores_skipped_turn() {
    let engine = engine();
    let config = GameConfig::default().with_challenge_penalty(ChallengePenalty::MissTurn, 0);
    let mut game = setup(config, &["CATABCD", "DOGEFGH", "ABCDEFG"], "QRSTUVWXYZ");

    engine.play(&mut game, &key("p1"), &cat()).unwrap();
    engine.challenge(&mut game, &key("p3"), &key("p1")).unwrap();
    assert!(game.players[2].miss_next_turn);

    engine.pass(&mut game, &key("p2"), TurnType::Passed).unwrap();
    assert!(!game.players[2].miss_next_turn);
    assert_eq!(game.whos_turn_key, Some(key("p1")));

    engine.undo(&mut game).unwrap();
    assert!(game.players[2].miss_next_turn);
    assert_eq!(game.whos_turn_key, Some(key("p2")));

    engine.undo(&mut game).unwrap();
    assert!(!game.players[2].miss_next_turn);
}

#[test]
fn test_undo_is_notified() {
    let channel = RecordingChannel::new();
    let engine = engine().with_channel(channel.clone());
    let mut game = setup(GameConfig::default(), &["CATABCD", "DOGEFGH"], "QRS");

    engine.play(&mut game, &key("p1"), &cat()).unwrap();
    let undone = engine.undo(&mut game).unwrap();

    assert_eq!(channel.tags(), vec!["TURN", "UNDONE"]);
    match channel.sent().pop().map(|e| e.notification) {
        Some(Notification::Undone(turn)) => assert_eq!(turn, undone),
        other => panic!("expected an undo notification, got {other:?}"),
    }
}

// ============================================================================
// Replay
// ============================================================================

#[test]
fn test_replay_rebuilds_game() {
    let engine = engine();
    let config = GameConfig::default().with_challenge_penalty(ChallengePenalty::PerWord, 2);
    let mut game = Game::new(config.with_seed(99));
    game.add_player(Player::new("p1", "Ann", 7), true).unwrap();
    game.add_player(Player::new("p2", "Bob", 7), true).unwrap();
    assert!(game.play_if_ready());

    // Play whatever is on the racks; the engine trusts the client's words.
    let first = game.players[0].rack.tiles()[..2].to_vec();
    let mv = Move::new(&[first[0].clone().at(7, 7), first[1].clone().at(7, 8)], 4).with_word("AT", 4);
    engine.play(&mut game, &key("p1"), &mv).unwrap();
    engine.challenge(&mut game, &key("p2"), &key("p1")).unwrap();

    let discards = game.players[1].rack.tiles()[..3].to_vec();
    engine.swap(&mut game, &key("p2"), &discards).unwrap();
    engine.pass(&mut game, &key("p1"), TurnType::Passed).unwrap();

    let second = game.players[1].rack.tiles()[..3].to_vec();
    let placed: Vec<Tile> = second
        .iter()
        .enumerate()
        .map(|(i, t)| t.clone().as_letter('E').at(6, 5 + i))
        .collect();
    let mv = Move::new(&placed, 9).with_word("GOD", 9);
    engine.play(&mut game, &key("p2"), &mv).unwrap();
    engine.confirm_game_over(&mut game, &key("p1"), GameState::GameOver).unwrap();

    let replayed = Replay::new(&TurnEngine::new(), &game).unwrap().run().unwrap();

    assert_eq!(snapshot(&replayed), snapshot(&game));
    let original: Vec<_> = game.turns.iter().map(|t| (t.turn_type, t.score, t.replacements.clone())).collect();
    let rebuilt: Vec<_> = replayed
        .turns
        .iter()
        .map(|t| (t.turn_type, t.score, t.replacements.clone()))
        .collect();
    assert_eq!(rebuilt, original);
}

#[test]
fn test_replay_steps() {
    let engine = engine();
    let mut game = setup(GameConfig::default(), &["CATABCD", "DOGEFGH"], "QRSTUV");
    engine.play(&mut game, &key("p1"), &cat()).unwrap();
    engine.play(&mut game, &key("p2"), &dog()).unwrap();

    let quiet = TurnEngine::new();
    let mut replay = Replay::new(&quiet, &game).unwrap();
    assert_eq!(replay.remaining(), 2);
    assert!(replay.game().board.is_empty());
    assert_eq!(replay.game().whos_turn_key, Some(key("p1")));

    let turn = replay.step().unwrap().unwrap();
    assert_eq!(turn.turn_type, TurnType::Played);
    assert_eq!(turn.replacements, game.turns[0].replacements);
    assert_eq!(replay.game().board.tiles().count(), 3);

    replay.step().unwrap();
    assert!(replay.is_done());
    assert_eq!(replay.step().unwrap(), None);
    assert_eq!(snapshot(replay.game()), snapshot(&game));
}

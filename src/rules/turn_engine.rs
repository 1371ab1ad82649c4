//! The standard implementation of [`GameEngine`].

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::engine::GameEngine;
use crate::advice::{BestPlayFinder, SearchRequest};
use crate::core::{
    ChallengePenalty, Game, GameConfig, GameError, GameState, Move, PlayerKey, ScoreDelta,
    TimerType, Turn, TurnType, WordCheck,
};
use crate::lexicon::{Lexicon, LexiconLibrary};
use crate::notify::{Audience, Channel, Message, Notification, NullChannel};
use crate::tiles::Tile;

/// Applies commands to games.
///
/// One engine can serve many games that share a dictionary. It holds no
/// game state of its own.
#[derive(Clone)]
pub struct TurnEngine {
    lexicon: Option<Arc<Lexicon>>,
    finder: Option<Arc<dyn BestPlayFinder>>,
    channel: Arc<dyn Channel>,
}

impl Default for TurnEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnEngine {
    /// An engine with no dictionary, no search and a channel that drops
    /// everything.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lexicon: None,
            finder: None,
            channel: Arc::new(NullChannel),
        }
    }

    /// An engine for a game's configuration. A dictionary that fails to
    /// load is logged and left out, so word checks are skipped.
    pub fn for_config(library: &LexiconLibrary, config: &GameConfig) -> Self {
        let mut engine = Self::new();
        if let Some(name) = &config.dictionary {
            match library.load(name) {
                Ok(lexicon) => engine.lexicon = Some(lexicon),
                Err(e) => warn!(dictionary = %name, error = %e, "playing without a dictionary"),
            }
        }
        engine
    }

    #[must_use]
    pub fn with_lexicon(mut self, lexicon: Arc<Lexicon>) -> Self {
        self.lexicon = Some(lexicon);
        self
    }

    #[must_use]
    pub fn with_finder(mut self, finder: impl BestPlayFinder + 'static) -> Self {
        self.finder = Some(Arc::new(finder));
        self
    }

    #[must_use]
    pub fn with_channel(mut self, channel: impl Channel + 'static) -> Self {
        self.channel = Arc::new(channel);
        self
    }

    /// Fail if the game is paused or not in play.
    fn check_active(game: &Game) -> Result<(), GameError> {
        if let Some(name) = &game.paused_by {
            return Err(GameError::Paused(name.clone()));
        }
        if game.state != GameState::Playing {
            return Err(GameError::NotPlaying);
        }
        Ok(())
    }

    /// Record a turn and tell everyone about it.
    fn finish_turn(&self, game: &mut Game, turn: Turn) {
        debug!(
            game = %game.key,
            player = %turn.player_key,
            turn = %turn.turn_type,
            score = turn.score,
            "turn finished"
        );
        game.push_turn(turn.clone());
        self.notify(Audience::All, Notification::Turn(turn));
    }

    fn message(&self, audience: Audience, message: Message) {
        self.notify(audience, Notification::Message(message));
    }

    fn no_dictionary(&self, player: &PlayerKey) {
        self.message(Audience::Player(player.clone()), Message::advisor("No dictionary"));
    }

    /// Ask the search for the best play from `player`'s rack.
    fn best_play(&self, game: &Game, player: usize, lexicon: &Arc<Lexicon>) -> Option<Move> {
        let finder = self.finder.as_ref()?;
        let request = SearchRequest {
            edition: game.config.edition.clone(),
            board: game.board.clone(),
            rack: game.players[player].rack.tiles().to_vec(),
            lexicon: Arc::clone(lexicon),
        };
        finder.find_best_play(&request)
    }

    /// Arguments describing a suggested play: words, 1-based row and
    /// column of the first tile, score.
    fn play_args(play: &Move) -> Vec<String> {
        let words = play.word_list().collect::<Vec<_>>().join(",");
        let (row, col) = play
            .placements
            .first()
            .and_then(|t| t.position)
            .map_or((0, 0), |at| (at.row + 1, at.col + 1));
        vec![words, row.to_string(), col.to_string(), play.score.to_string()]
    }

    /// The previous turn, which must be a play by `by` (if given).
    fn previous_play(game: &Game, by: Option<&PlayerKey>) -> Result<Turn, GameError> {
        let previous = game.last_turn().ok_or(GameError::NoPreviousMove)?;
        if previous.turn_type != TurnType::Played {
            return Err(GameError::CannotChallenge(previous.turn_type));
        }
        if by.is_some_and(|key| key != &previous.player_key) {
            return Err(GameError::ChallengeMismatch);
        }
        Ok(previous.clone())
    }

    fn check_challenge(
        game: &Game,
        challenger: &PlayerKey,
        challenged: &PlayerKey,
    ) -> Result<Turn, GameError> {
        Self::check_active(game)?;
        if challenger == challenged {
            return Err(GameError::SelfChallenge);
        }
        game.player_index(challenger)?;
        game.player_index(challenged)?;
        Self::previous_play(game, Some(challenged))
    }
}

impl GameEngine for TurnEngine {
    fn lexicon(&self) -> Option<&Arc<Lexicon>> {
        self.lexicon.as_ref()
    }

    fn notify(&self, audience: Audience, notification: Notification) {
        self.channel.notify(audience, notification);
    }

    fn play(&self, game: &mut Game, player: &PlayerKey, mv: &Move) -> Result<(), GameError> {
        Self::check_active(game)?;
        game.assert_turn(player)?;
        let index = game.player_index(player)?;
        game.validate_placements(index, &mv.placements)?;
        debug!(game = %game.key, player = %player, score = mv.score, "play");

        if game.config.word_check == WordCheck::Reject && !game.players[index].is_robot {
            let bad = self.unknown_words(&mv.words);
            if !bad.is_empty() {
                debug!(game = %game.key, words = ?bad, "rejecting play");
                self.notify(
                    Audience::Player(player.clone()),
                    Notification::Reject {
                        player_key: player.clone(),
                        words: bad,
                    },
                );
                return Ok(());
            }
        }

        if game.players[index].wants_advice {
            // Before the tiles move, so the search sees the board the
            // player saw.
            self.advise(game, player, mv.score)?;
        }

        game.stop_clock();
        game.rack_to_board(index, &mv.placements);
        let replacements = game.letter_bag.draw_many(mv.placements.len());
        let remaining_time = {
            let p = &mut game.players[index];
            p.score += mv.score;
            for tile in &replacements {
                p.rack.add_tile(tile);
            }
            p.clock
        };
        let prepasses = std::mem::take(&mut game.players[index].passes);

        let next = game.next_player();
        let mut turn = Turn::new(TurnType::Played, game.key.clone(), player.clone())
            .with_next_to_go(next.clone())
            .with_score(mv.score)
            .with_placements(mv.placements.iter().cloned())
            .with_replacements(replacements)
            .with_words(mv.words.clone());
        turn.passes = prepasses;
        turn.remaining_time = remaining_time;
        self.finish_turn(game, turn);
        if let Some(next) = next {
            game.start_turn(next, None);
        }

        if game.config.word_check == WordCheck::After && !game.players[index].is_robot {
            if let Some(lexicon) = &self.lexicon {
                for word in self.unknown_words(&mv.words) {
                    self.message(
                        Audience::Player(player.clone()),
                        Message::advisor("word-not-found").with_args([word, lexicon.name().to_owned()]),
                    );
                }
            }
        }
        Ok(())
    }

    fn pass(&self, game: &mut Game, player: &PlayerKey, turn_type: TurnType) -> Result<(), GameError> {
        Self::check_active(game)?;
        game.assert_turn(player)?;
        let index = game.player_index(player)?;
        let turn_type = match turn_type {
            TurnType::TimedOut => TurnType::TimedOut,
            _ => TurnType::Passed,
        };

        game.stop_clock();
        game.players[index].passes += 1;
        let next = game.next_player();
        let turn = Turn::new(turn_type, game.key.clone(), player.clone()).with_next_to_go(next.clone());
        self.finish_turn(game, turn);
        if let Some(next) = next {
            game.start_turn(next, None);
        }
        Ok(())
    }

    fn swap(&self, game: &mut Game, player: &PlayerKey, tiles: &[Tile]) -> Result<(), GameError> {
        Self::check_active(game)?;
        game.assert_turn(player)?;
        let index = game.player_index(player)?;
        let available = game.letter_bag.remaining();
        if available < tiles.len() {
            return Err(GameError::BagTooSmall {
                requested: tiles.len(),
                available,
            });
        }
        if let Some(missing) = game.players[index].rack.find_missing(tiles) {
            return Err(GameError::TileNotOnRack {
                letter: missing.bag_letter(),
            });
        }

        game.stop_clock();
        game.players[index].passes += 1;
        // Draw first, so the discards cannot come straight back.
        let replacements = game.letter_bag.draw_many(tiles.len());
        game.rack_to_bag(index, tiles);
        for tile in &replacements {
            game.players[index].rack.add_tile(tile);
        }

        let next = game.next_player();
        let turn = Turn::new(TurnType::Swapped, game.key.clone(), player.clone())
            .with_next_to_go(next.clone())
            .with_placements(tiles.iter().map(Tile::lifted))
            .with_replacements(replacements);
        self.finish_turn(game, turn);
        if let Some(next) = next {
            game.start_turn(next, None);
        }
        Ok(())
    }

    fn challenge(
        &self,
        game: &mut Game,
        challenger: &PlayerKey,
        challenged: &PlayerKey,
    ) -> Result<(), GameError> {
        let previous = Self::check_challenge(game, challenger, challenged)?;

        let Some(lexicon) = &self.lexicon else {
            info!(game = %game.key, "no dictionary, so challenge always succeeds");
            return self.take_back(game, challenger, TurnType::ChallengeWon);
        };
        let bad: Vec<&str> = previous
            .words
            .iter()
            .map(|w| w.word.as_str())
            .filter(|w| !lexicon.has_word(w))
            .collect();
        if !bad.is_empty() {
            debug!(game = %game.key, words = ?bad, "challenge succeeded");
            return self.take_back(game, challenger, TurnType::ChallengeWon);
        }

        debug!(game = %game.key, penalty = ?game.config.challenge_penalty, "challenge failed");
        self.penalise_challenge(game, challenger, challenged)
    }

    fn penalise_challenge(
        &self,
        game: &mut Game,
        challenger: &PlayerKey,
        challenged: &PlayerKey,
    ) -> Result<(), GameError> {
        let previous = Self::check_challenge(game, challenger, challenged)?;
        let challenger_index = game.player_index(challenger)?;
        let challenged_index = game.player_index(challenged)?;
        let current = game.whos_turn_key.clone();
        let penalty = game.config.challenge_penalty;

        if current.as_ref() == Some(challenger) && penalty == ChallengePenalty::MissTurn {
            // The challenger was about to move, so the rest of their turn
            // is forfeit. If the challenged play emptied both the bag and
            // the rack, that ends the game.
            if previous.replacements.is_empty() && game.players[challenged_index].rack.is_empty() {
                return self.confirm_game_over(game, challenger, GameState::FailedChallenge);
            }
            game.stop_clock();
            let next = game.next_player();
            let turn = Turn::new(TurnType::ChallengeLost, game.key.clone(), challenged.clone())
                .with_penalty(ChallengePenalty::MissTurn)
                .with_challenger(challenger.clone())
                .with_next_to_go(next.clone());
            self.finish_turn(game, turn);
            if let Some(next) = next {
                game.start_turn(next, None);
            }
            return Ok(());
        }

        // A points penalty, or a challenger who was not next to move.
        // Whoever holds the turn keeps it.
        let points = game.config.penalty_points;
        let lost = match penalty {
            ChallengePenalty::MissTurn => {
                game.players[challenger_index].miss_next_turn = true;
                0
            }
            ChallengePenalty::PerTurn => -points,
            ChallengePenalty::PerWord => -points * previous.words.len() as i32,
            ChallengePenalty::None => 0,
        };
        game.players[challenger_index].score += lost;

        let turn = Turn::new(TurnType::ChallengeLost, game.key.clone(), challenged.clone())
            .with_score(lost)
            .with_challenger(challenger.clone())
            .with_next_to_go(current);
        self.finish_turn(game, turn);
        Ok(())
    }

    fn take_back(&self, game: &mut Game, player: &PlayerKey, turn_type: TurnType) -> Result<(), GameError> {
        Self::check_active(game)?;
        game.player_index(player)?;
        let previous = Self::previous_play(game, None)?;
        let turn_type = match turn_type {
            TurnType::ChallengeWon => TurnType::ChallengeWon,
            _ => {
                if player != &previous.player_key {
                    return Err(GameError::NotYourTurn { player: player.clone() });
                }
                if !game.config.allow_take_back {
                    return Err(GameError::TakeBackNotAllowed);
                }
                TurnType::TookBack
            }
        };
        let index = game.player_index(&previous.player_key)?;
        if let Some(missing) = game.players[index].rack.find_missing(&previous.replacements) {
            return Err(GameError::TileNotOnRack {
                letter: missing.bag_letter(),
            });
        }
        for tile in &previous.placements {
            let at = tile.position.ok_or(GameError::UnplacedTile)?;
            if game.board.at(at).is_none() {
                return Err(GameError::BadSquare { row: at.row, col: at.col });
            }
        }

        game.stop_clock();
        game.rack_to_bag(index, &previous.replacements);
        game.board_to_rack(index, &previous.placements);
        game.players[index].score -= previous.score;

        let next = match turn_type {
            TurnType::ChallengeWon => game.whos_turn_key.clone(),
            _ => Some(player.clone()),
        };
        let mut turn = Turn::new(turn_type, game.key.clone(), previous.player_key.clone())
            .with_next_to_go(next.clone())
            .with_score(-previous.score)
            .with_placements(previous.placements.iter().cloned())
            .with_replacements(previous.replacements.iter().cloned());
        if turn_type == TurnType::ChallengeWon {
            turn = turn.with_challenger(player.clone());
        }
        self.finish_turn(game, turn);

        if let Some(next) = next {
            // The taker resumes with the time they had left; after a
            // successful challenge the current player starts afresh.
            let remaining = match turn_type {
                TurnType::TookBack => previous.remaining_time,
                _ => None,
            };
            game.start_turn(next, remaining);
        }
        Ok(())
    }

    fn confirm_game_over(
        &self,
        game: &mut Game,
        player: &PlayerKey,
        end_state: GameState,
    ) -> Result<(), GameError> {
        if game.state != GameState::Playing {
            return Ok(());
        }
        if let Some(name) = &game.paused_by {
            return Err(GameError::Paused(name.clone()));
        }
        if game.players.iter().filter(|p| p.rack.is_empty()).count() > 1 {
            return Err(GameError::MultipleEmptyRacks);
        }

        game.stop_clock();
        game.state = end_state;
        info!(game = %game.key, state = %end_state, "game over");

        let game_timer = game.config.timer == TimerType::Game;
        let time_penalty = f64::from(game.config.time_penalty);
        let mut on_racks = 0;
        let mut empty_rack = None;
        let mut deltas = Vec::with_capacity(game.players.len());
        for (i, p) in game.players.iter_mut().enumerate() {
            let mut delta = ScoreDelta {
                key: p.key.clone(),
                tiles: 0,
                time: None,
                tiles_remaining: None,
            };
            if p.rack.is_empty() {
                empty_rack = Some(i);
            } else {
                let rack_score = p.rack.score();
                p.score -= rack_score;
                delta.tiles = -rack_score;
                delta.tiles_remaining = Some(
                    p.rack.letters().iter().map(char::to_string).collect::<Vec<_>>().join(","),
                );
                on_racks += rack_score;
            }
            if let (true, Some(clock)) = (game_timer, p.clock) {
                if clock < 0 {
                    // Half rounds up: -2.5 becomes -2.
                    let points = (clock as f64 * time_penalty / 60.0 + 0.5).floor() as i32;
                    if points < 0 {
                        debug!(player = %p.key, over = -clock, points, "over time");
                        p.score += points;
                        delta.time = Some(points);
                    }
                }
            }
            deltas.push(delta);
        }
        if let Some(i) = empty_rack {
            game.players[i].score += on_racks;
            deltas[i].tiles = on_racks;
        }

        let mut turn = Turn::new(TurnType::GameEnded, game.key.clone(), player.clone());
        turn.end_state = Some(end_state);
        turn.deltas = deltas;
        self.finish_turn(game, turn);
        Ok(())
    }

    fn pause(&self, game: &mut Game, player: &PlayerKey) -> Result<(), GameError> {
        if game.is_paused() {
            return Ok(());
        }
        let index = game.player_index(player)?;
        let name = game.players[index].name.clone();
        game.stop_clock();
        game.paused_by = Some(name.clone());
        debug!(game = %game.key, by = %name, "paused");
        self.notify(
            Audience::All,
            Notification::Pause {
                key: game.key.clone(),
                name,
                timestamp: chrono::Utc::now().timestamp_millis(),
            },
        );
        Ok(())
    }

    fn unpause(&self, game: &mut Game, player: &PlayerKey) -> Result<(), GameError> {
        if !game.is_paused() {
            return Ok(());
        }
        let index = game.player_index(player)?;
        let name = game.players[index].name.clone();
        debug!(game = %game.key, by = %name, "unpaused");
        self.notify(
            Audience::All,
            Notification::Unpause {
                key: game.key.clone(),
                name,
                timestamp: chrono::Utc::now().timestamp_millis(),
            },
        );
        game.paused_by = None;
        game.start_clock();
        Ok(())
    }

    fn another_game(&self, game: &mut Game) -> Result<Game, GameError> {
        if game.next_game_key.is_some() {
            return Err(GameError::NextGameExists);
        }
        let config = game.config.clone().with_seed(game.derive_seed());
        let mut next = Game::new(config);
        // Seats move round by one, so each game in a series opens with a
        // different player.
        let seats = game.players.len();
        for player in game.players.iter().cycle().skip(1).take(seats) {
            next.add_player(player.fresh_copy(), true)?;
        }
        next.play_if_ready();
        game.next_game_key = Some(next.key.clone());
        info!(game = %game.key, next = %next.key, "created follow-on game");

        self.notify(
            Audience::All,
            Notification::NextGame {
                game_key: next.key.clone(),
                timestamp: chrono::Utc::now().timestamp_millis(),
            },
        );
        Ok(next)
    }

    fn advise(&self, game: &Game, player: &PlayerKey, their_score: i32) -> Result<(), GameError> {
        let index = game.player_index(player)?;
        let Some(lexicon) = &self.lexicon else {
            self.no_dictionary(player);
            return Ok(());
        };
        match self.best_play(game, index, lexicon) {
            Some(best) if best.score > their_score => {
                debug!(game = %game.key, player = %player, score = best.score, "better play found");
                self.message(
                    Audience::Player(player.clone()),
                    Message::advisor("possible-score").with_args(Self::play_args(&best)),
                );
                self.message(
                    Audience::Others(player.clone()),
                    Message::advisor("was-advised")
                        .with_args([game.players[index].name.clone()])
                        .warning(),
                );
            }
            _ => debug!(game = %game.key, player = %player, "no better play found"),
        }
        Ok(())
    }

    fn hint(&self, game: &Game, player: &PlayerKey) -> Result<(), GameError> {
        let index = game.player_index(player)?;
        let Some(lexicon) = &self.lexicon else {
            self.no_dictionary(player);
            return Ok(());
        };
        debug!(game = %game.key, player = %player, "hint requested");
        let hint = match self.best_play(game, index, lexicon) {
            Some(best) => Message::advisor("_hint_").with_args(Self::play_args(&best)),
            None => Message::advisor("log-no-play"),
        };
        self.message(Audience::Player(player.clone()), hint);
        self.message(
            Audience::Others(player.clone()),
            Message::advisor("hinted")
                .with_args([game.players[index].name.clone()])
                .warning(),
        );
        Ok(())
    }

    fn toggle_advice(&self, game: &mut Game, player: &PlayerKey) -> Result<(), GameError> {
        let index = game.player_index(player)?;
        let p = &mut game.players[index];
        p.toggle_advice();
        let (wants_advice, name) = (p.wants_advice, p.name.clone());

        let text = if wants_advice { "Enabled" } else { "Disabled" };
        self.message(Audience::Player(player.clone()), Message::advisor(text));
        if wants_advice {
            self.message(
                Audience::All,
                Message::advisor("advised").with_args([name]).warning(),
            );
        }
        Ok(())
    }

    fn allow(&self, game: &Game, player: &PlayerKey, word: &str) -> Result<(), GameError> {
        let index = game.player_index(player)?;
        let Some(lexicon) = &self.lexicon else {
            self.no_dictionary(player);
            return Ok(());
        };
        let word = word.to_uppercase();
        if lexicon.add_word(&word) {
            info!(game = %game.key, word = %word, dictionary = lexicon.name(), "word allowed");
            self.message(
                Audience::All,
                Message::advisor("log-word-added").with_args([
                    game.players[index].name.clone(),
                    word,
                    lexicon.name().to_owned(),
                ]),
            );
        } else {
            self.message(
                Audience::Player(player.clone()),
                Message::advisor("word-there").with_args([word, lexicon.name().to_owned()]),
            );
        }
        Ok(())
    }
}

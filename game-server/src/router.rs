use tracing::{debug, info, warn};

use crate::sessions::{Session, SessionTable};
use crate::websocket::ConnectionId;
use game_core::{
    RoomCodeGenerator, RoundOutcome, RoundRules, ScoringEngine, WordValidator, assign_roles,
};
use game_store::{
    NewGuessEvent, NewPlayer, NewRoom, NewRound, Patch, PlayerUpdate, RoomStore, RoomUpdate,
    RoundUpdate, timestamp,
};
use game_types::{
    ClientMessage, FinalWinner, GameError, GameState, GameStateUpdate, GameStatus,
    GuessLetterPayload, JoinRoomPayload, Player, RejoinRoomPayload, Role, Room, RoomId,
    RoundEndCheck, ServerMessage, SetWordPayload, StartGamePayload,
};

/// Room rules that come from configuration.
#[derive(Debug, Clone)]
pub struct RoomSettings {
    pub default_max_guesses: u32,
    pub max_players_per_room: usize,
    pub min_players_to_start: usize,
    pub room_code_attempts: usize,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            default_max_guesses: 6,
            max_players_per_room: 2,
            min_players_to_start: 2,
            room_code_attempts: game_core::DEFAULT_ROOM_CODE_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub connection_id: ConnectionId,
    pub message: ServerMessage,
}

/// Messages produced by one command, in delivery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dispatch {
    pub messages: Vec<Outbound>,
}

impl Dispatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(connection_id: ConnectionId, message: ServerMessage) -> Self {
        let mut dispatch = Self::new();
        dispatch.push(connection_id, message);
        dispatch
    }

    pub fn push(&mut self, connection_id: ConnectionId, message: ServerMessage) {
        self.messages.push(Outbound {
            connection_id,
            message,
        });
    }

    pub fn extend(&mut self, other: Dispatch) {
        self.messages.extend(other.messages);
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages_for(&self, connection_id: ConnectionId) -> Vec<&ServerMessage> {
        self.messages
            .iter()
            .filter(|outbound| outbound.connection_id == connection_id)
            .map(|outbound| &outbound.message)
            .collect()
    }

    pub fn recipients(&self) -> Vec<ConnectionId> {
        let mut recipients = Vec::new();
        for outbound in &self.messages {
            if !recipients.contains(&outbound.connection_id) {
                recipients.push(outbound.connection_id);
            }
        }
        recipients
    }
}

impl IntoIterator for Dispatch {
    type Item = Outbound;
    type IntoIter = std::vec::IntoIter<Outbound>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

/// Applies client commands to room state and decides who hears about it.
///
/// Synchronous by construction: every call runs to completion against the
/// store and session table it owns, and returns the messages to deliver.
/// Rejections are answered only to the originating connection and never
/// change state.
pub struct SessionRouter {
    store: RoomStore,
    sessions: SessionTable,
    settings: RoomSettings,
    room_codes: RoomCodeGenerator,
    words: WordValidator,
}

impl SessionRouter {
    pub fn new(settings: RoomSettings) -> Self {
        Self {
            store: RoomStore::new(),
            sessions: SessionTable::new(),
            room_codes: RoomCodeGenerator::new(settings.room_code_attempts),
            words: WordValidator::default(),
            settings,
        }
    }

    pub fn store(&self) -> &RoomStore {
        &self.store
    }

    pub fn sessions(&self) -> &SessionTable {
        &self.sessions
    }

    pub fn settings(&self) -> &RoomSettings {
        &self.settings
    }

    pub fn room_state(&self, room_code: &str) -> Option<GameState> {
        self.store.get_game_state(room_code)
    }

    pub fn handle(&mut self, connection_id: ConnectionId, message: ClientMessage) -> Dispatch {
        let kind = message.kind();
        let result = match message {
            ClientMessage::JoinRoom(payload) => self.join_room(connection_id, payload),
            ClientMessage::RejoinRoom(payload) => self.rejoin_room(connection_id, payload),
            ClientMessage::StartGame(payload) => self.start_game(connection_id, payload),
            ClientMessage::SetWord(payload) => self.set_word(connection_id, payload),
            ClientMessage::GuessLetter(payload) => self.guess_letter(connection_id, payload),
            ClientMessage::StartRound => self.start_round(connection_id),
            ClientMessage::EndGame => self.end_game(connection_id),
            ClientMessage::LeaveRoom => self.leave_room(connection_id),
        };

        match result {
            Ok(dispatch) => dispatch,
            Err(error) => {
                warn!("Rejected {} from {}: {}", kind, connection_id, error);
                Dispatch::reply(connection_id, error.into())
            }
        }
    }

    /// Connection closed without `leave_room`. Same effect, nothing to reject.
    pub fn disconnect(&mut self, connection_id: ConnectionId) -> Dispatch {
        self.vacate_seat(connection_id)
    }

    fn join_room(
        &mut self,
        connection_id: ConnectionId,
        payload: JoinRoomPayload,
    ) -> Result<Dispatch, GameError> {
        if payload.is_creating {
            return self.create_room(connection_id, payload.player_name);
        }

        let room_code = payload.room_code.ok_or(GameError::InvalidMessageFormat)?;
        let room = self
            .store
            .get_room_by_code(&room_code)
            .cloned()
            .ok_or(GameError::RoomNotFound)?;

        if self.store.count_players_in_room(room.id) >= self.settings.max_players_per_room {
            return Err(GameError::RoomFull);
        }
        if self
            .store
            .get_player_by_name(room.id, &payload.player_name)
            .is_some()
        {
            return Err(GameError::NameTaken);
        }

        let mut dispatch = self.vacate_seat(connection_id);
        let player = self.store.create_player(NewPlayer {
            room_id: room.id,
            name: payload.player_name,
            is_creator: false,
        });
        self.seat_connection(connection_id, &player);
        info!("{} joined room {}", player.name, room.room_code);

        dispatch.extend(self.broadcast(room.id, None, None));
        Ok(dispatch)
    }

    fn create_room(
        &mut self,
        connection_id: ConnectionId,
        player_name: String,
    ) -> Result<Dispatch, GameError> {
        let room_code = self
            .room_codes
            .generate_unique(|code| self.store.room_code_exists(code))
            .ok_or(GameError::RoomCodeUnavailable)?;
        let room = self
            .store
            .create_room(NewRoom {
                room_code,
                max_guesses: self.settings.default_max_guesses,
            })
            .ok_or(GameError::RoomCodeUnavailable)?;

        let mut dispatch = self.vacate_seat(connection_id);
        let player = self.store.create_player(NewPlayer {
            room_id: room.id,
            name: player_name,
            is_creator: true,
        });
        self.seat_connection(connection_id, &player);
        info!("{} created room {}", player.name, room.room_code);

        dispatch.extend(self.broadcast(room.id, None, None));
        Ok(dispatch)
    }

    fn rejoin_room(
        &mut self,
        connection_id: ConnectionId,
        payload: RejoinRoomPayload,
    ) -> Result<Dispatch, GameError> {
        let room = self
            .store
            .get_room_by_code(&payload.room_code)
            .cloned()
            .ok_or(GameError::RoomNotFound)?;
        let player = self
            .store
            .get_player_by_name(room.id, &payload.player_name)
            .cloned()
            .ok_or(GameError::PlayerNotFound)?;

        let already_seated = self
            .sessions
            .get(connection_id)
            .is_some_and(|session| session.player_id == player.id);
        let mut dispatch = if already_seated {
            Dispatch::new()
        } else {
            self.vacate_seat(connection_id)
        };

        self.store.set_player_online(player.id, true);
        self.seat_connection(connection_id, &player);
        info!(
            "{} rejoined room {} with score {}",
            player.name, room.room_code, player.score
        );

        dispatch.extend(self.broadcast(room.id, None, None));
        Ok(dispatch)
    }

    fn start_game(
        &mut self,
        connection_id: ConnectionId,
        payload: StartGamePayload,
    ) -> Result<Dispatch, GameError> {
        let (session, room) = self.seat(connection_id)?;
        require_status(&room, GameStatus::Waiting, "start the game")?;

        let players = self.store.get_players_by_room(room.id);
        let not_enough = GameError::NotEnoughPlayers {
            required: self.settings.min_players_to_start,
        };
        if players.len() < self.settings.min_players_to_start {
            return Err(not_enough);
        }
        let roles = assign_roles(&players, 1).ok_or(not_enough)?;

        let started_by_creator = players
            .iter()
            .any(|player| player.id == session.player_id && player.is_creator);
        let max_guesses = match payload.max_guesses {
            Some(max_guesses) if started_by_creator => max_guesses,
            _ => self.settings.default_max_guesses,
        };

        self.store.update_room(
            room.id,
            RoomUpdate {
                game_status: Patch::Set(GameStatus::WordSetting),
                round_number: Patch::Set(1),
                word_giver_id: Patch::Set(Some(roles.word_giver_id)),
                guesser_id: Patch::Set(Some(roles.guesser_id)),
                current_word: Patch::Set(None),
                hint: Patch::Set(None),
                max_guesses: Patch::Set(max_guesses),
            },
        );
        info!(
            "Room {} started with {} players, max guesses {}",
            room.room_code,
            players.len(),
            max_guesses
        );

        Ok(self.broadcast(room.id, None, None))
    }

    fn set_word(
        &mut self,
        connection_id: ConnectionId,
        payload: SetWordPayload,
    ) -> Result<Dispatch, GameError> {
        let (session, room) = self.seat(connection_id)?;
        require_status(&room, GameStatus::WordSetting, "set the word")?;
        if room.role_of(session.player_id) != Some(Role::WordGiver) {
            return Err(GameError::NotYourTurnToSetWord);
        }
        let guesser_id = room.guesser_id.ok_or(GameError::NoActiveRound)?;
        let word = self.words.validate_word(&payload.word)?;

        self.store.create_round(NewRound {
            room_id: room.id,
            round_number: room.round_number,
            word_giver_id: session.player_id,
            guesser_id,
            word: word.clone(),
            hint: payload.hint.clone(),
            max_guesses: room.max_guesses,
        });
        self.store.clear_history(room.id);
        self.store.update_room(
            room.id,
            RoomUpdate {
                game_status: Patch::Set(GameStatus::Guessing),
                current_word: Patch::Set(Some(word)),
                hint: Patch::Set(payload.hint),
                ..Default::default()
            },
        );
        info!(
            "Word set for round {} in room {}",
            room.round_number, room.room_code
        );

        Ok(self.broadcast(room.id, None, None))
    }

    fn guess_letter(
        &mut self,
        connection_id: ConnectionId,
        payload: GuessLetterPayload,
    ) -> Result<Dispatch, GameError> {
        let (session, room) = self.seat(connection_id)?;
        require_status(&room, GameStatus::Guessing, "guess a letter")?;
        if room.role_of(session.player_id) != Some(Role::Guesser) {
            return Err(GameError::NotYourTurnToGuess);
        }
        let guesser = self
            .store
            .get_player(session.player_id)
            .cloned()
            .ok_or(GameError::PlayerNotFound)?;
        let round = self
            .store
            .get_current_round(room.id)
            .cloned()
            .ok_or(GameError::NoActiveRound)?;

        let (next, guess, outcome) = RoundRules::play(&round, payload.letter)?;

        self.store.update_round(
            round.id,
            RoundUpdate {
                guessed_letters: Patch::Set(next.guessed_letters),
                wrong_guesses: Patch::Set(next.wrong_guesses),
                status: Patch::Set(next.status),
                points_awarded: Patch::Set(next.points_awarded),
                completed_at: if outcome.is_over() {
                    Patch::Set(Some(timestamp()))
                } else {
                    Patch::Unchanged
                },
            },
        );
        self.store.add_history(NewGuessEvent {
            room_id: room.id,
            player_id: guesser.id,
            letter: guess.letter,
            is_correct: guess.is_correct,
        });

        let round_end_check = match outcome {
            RoundOutcome::InProgress => RoundEndCheck::continuing(),
            RoundOutcome::Won => {
                self.store.update_player(
                    guesser.id,
                    PlayerUpdate {
                        score: Patch::Set(guesser.score + outcome.points_awarded()),
                        ..Default::default()
                    },
                );
                RoundEndCheck::won_by(guesser.name.clone())
            }
            RoundOutcome::Lost => RoundEndCheck::lost(),
        };

        if outcome.is_over() {
            self.store.update_room(
                room.id,
                RoomUpdate {
                    game_status: Patch::Set(GameStatus::RoundFinished),
                    ..Default::default()
                },
            );
            info!(
                "Round {} in room {} ended: {:?}",
                room.round_number, room.room_code, outcome
            );
        }

        Ok(self.broadcast(room.id, Some(round_end_check), None))
    }

    fn start_round(&mut self, connection_id: ConnectionId) -> Result<Dispatch, GameError> {
        let (_, room) = self.seat(connection_id)?;
        require_status(&room, GameStatus::RoundFinished, "start a new round")?;

        let players = self.store.get_players_by_room(room.id);
        let round_number = room.round_number + 1;
        let roles = assign_roles(&players, round_number).ok_or(GameError::NotEnoughPlayers {
            required: self.settings.min_players_to_start,
        })?;

        self.store.update_room(
            room.id,
            RoomUpdate {
                game_status: Patch::Set(GameStatus::WordSetting),
                round_number: Patch::Set(round_number),
                word_giver_id: Patch::Set(Some(roles.word_giver_id)),
                guesser_id: Patch::Set(Some(roles.guesser_id)),
                current_word: Patch::Set(None),
                hint: Patch::Set(None),
                ..Default::default()
            },
        );
        info!("Room {} moved to round {}", room.room_code, round_number);

        Ok(self.broadcast(room.id, None, None))
    }

    fn end_game(&mut self, connection_id: ConnectionId) -> Result<Dispatch, GameError> {
        let (_, room) = self.seat(connection_id)?;

        let players = self.store.get_players_by_room(room.id);
        let rounds = self.store.get_rounds(room.id);
        let final_winner = ScoringEngine::final_winner(&players, &rounds);

        self.store.update_room(
            room.id,
            RoomUpdate {
                game_status: Patch::Set(GameStatus::GameFinished),
                ..Default::default()
            },
        );
        match &final_winner.winner {
            Some(winner) => info!("Room {} finished, winner {}", room.room_code, winner.name),
            None => info!("Room {} finished without a single winner", room.room_code),
        }

        Ok(self.broadcast(room.id, None, Some(final_winner)))
    }

    fn leave_room(&mut self, connection_id: ConnectionId) -> Result<Dispatch, GameError> {
        if self.sessions.get(connection_id).is_none() {
            return Err(GameError::NotInRoom);
        }
        Ok(self.vacate_seat(connection_id))
    }

    fn seat(&self, connection_id: ConnectionId) -> Result<(Session, Room), GameError> {
        let session = self
            .sessions
            .get(connection_id)
            .ok_or(GameError::NotInRoom)?;
        let room = self
            .store
            .get_room(session.room_id)
            .cloned()
            .ok_or(GameError::RoomNotFound)?;
        Ok((session, room))
    }

    fn seat_connection(&mut self, connection_id: ConnectionId, player: &Player) {
        let session = Session {
            player_id: player.id,
            room_id: player.room_id,
        };
        if let Some(previous) = self.sessions.bind(connection_id, session) {
            info!(
                "{} moved from connection {} to {}",
                player.name, previous, connection_id
            );
        }
    }

    /// Unseats a connection, marks its player offline and tells the rest of
    /// the room. The leaver is unbound first and gets nothing.
    fn vacate_seat(&mut self, connection_id: ConnectionId) -> Dispatch {
        let Some(session) = self.sessions.unbind(connection_id) else {
            return Dispatch::new();
        };
        if let Some(player) = self.store.set_player_online(session.player_id, false) {
            info!("{} went offline", player.name);
        }
        self.broadcast(session.room_id, None, None)
    }

    fn broadcast(
        &self,
        room_id: RoomId,
        round_end_check: Option<RoundEndCheck>,
        final_winner: Option<FinalWinner>,
    ) -> Dispatch {
        let Some(state) = self.store.get_game_state_by_id(room_id) else {
            debug!("Room {} has no state to report", room_id);
            return Dispatch::new();
        };

        let mut dispatch = Dispatch::new();
        for connection_id in self.sessions.connections_in_room(room_id) {
            let Some(session) = self.sessions.get(connection_id) else {
                continue;
            };
            let message = ServerMessage::state(GameStateUpdate {
                state: state.view_for(session.player_id),
                round_end_check: round_end_check.clone(),
                final_winner: final_winner.clone(),
            });
            dispatch.push(connection_id, message);
        }
        dispatch
    }
}

impl Default for SessionRouter {
    fn default() -> Self {
        Self::new(RoomSettings::default())
    }
}

fn require_status(
    room: &Room,
    expected: GameStatus,
    action: &'static str,
) -> Result<(), GameError> {
    if room.game_status == expected {
        Ok(())
    } else {
        Err(GameError::InvalidGameState {
            action,
            current: room.game_status,
        })
    }
}

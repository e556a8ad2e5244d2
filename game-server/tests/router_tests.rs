
use game_server::router::RoomSettings;
use game_server::websocket::connection::ConnectionId;
use game_types::{ClientMessage, GameStatus, RoundEndReason, RoundStatus};
use test_helpers::*;

#[test]
fn test_join_unknown_room_creates_no_player() {
    let mut table = TestTable::new();
    let (conn, dispatch) = table.join("Bob", "ZZZ999");

    assert_eq!(error_message(&dispatch, conn), "Room not found");
    assert!(table.router.sessions().get(conn).is_none());
    assert_eq!(table.router.store().room_count(), 0);
}

#[test]
fn test_third_player_gets_room_is_full() {
    let mut table = TestTable::new();
    let duel = table.seated_duel();

    let (carol, dispatch) = table.join("Carol", &duel.code);
    assert_eq!(error_message(&dispatch, carol), "Room is full");
    assert_eq!(dispatch.recipients(), vec![carol]);
    assert_eq!(table.state(&duel.code).players.len(), 2);
}

#[test]
fn test_offline_players_still_hold_their_seat() {
    let mut table = TestTable::new();
    let duel = table.seated_duel();
    table.router.disconnect(duel.bob);

    let (carol, dispatch) = table.join("Carol", &duel.code);
    assert_eq!(error_message(&dispatch, carol), "Room is full");
}

#[test]
fn test_larger_rooms_are_configurable() {
    let mut table = TestTable::with_settings(RoomSettings {
        max_players_per_room: 3,
        ..RoomSettings::default()
    });
    let duel = table.seated_duel();

    let (carol, dispatch) = table.join("Carol", &duel.code);
    let update = latest_update(&dispatch, carol);
    assert_eq!(update.state.players.len(), 3);
    assert_eq!(dispatch.recipients().len(), 3);
}

#[test]
fn test_duplicate_name_is_rejected() {
    let mut table = TestTable::new();
    let (_, code) = table.create_room("Alice");

    let (imposter, dispatch) = table.join("Alice", &code);
    assert_eq!(
        error_message(&dispatch, imposter),
        "That name is already taken in this room"
    );
    assert_eq!(table.state(&code).players.len(), 1);
}

#[test]
fn test_rejoin_restores_score_without_duplicate() {
    let mut table = TestTable::new();
    let duel = table.started_duel(6);
    table.play_round(duel.alice, duel.bob, "CAT", &['C', 'A', 'T']);

    let bob_before = table.state(&duel.code).player_named("Bob").cloned().unwrap();
    assert_eq!(bob_before.score, 1);

    table.router.disconnect(duel.bob);
    assert!(!table.state(&duel.code).player_named("Bob").unwrap().is_online);

    let bob_again = ConnectionId::new();
    let dispatch = table.send(bob_again, rejoin_message("Bob", &duel.code));
    let update = latest_update(&dispatch, bob_again);

    let bob_after = update.state.player_named("Bob").unwrap();
    assert_eq!(bob_after.id, bob_before.id);
    assert_eq!(bob_after.score, 1);
    assert!(bob_after.is_online);
    assert_eq!(update.state.players.len(), 2);
    assert_eq!(dispatch.messages_for(duel.alice).len(), 1);
}

#[test]
fn test_rejoin_failures() {
    let mut table = TestTable::new();
    let (_, code) = table.create_room("Alice");
    let conn = ConnectionId::new();

    let dispatch = table.send(conn, rejoin_message("Alice", "ZZZ999"));
    assert_eq!(error_message(&dispatch, conn), "Room not found");

    let dispatch = table.send(conn, rejoin_message("Nobody", &code));
    assert_eq!(error_message(&dispatch, conn), "Player not found in this room");
}

#[test]
fn test_rejoin_from_second_connection_displaces_first() {
    let mut table = TestTable::new();
    let duel = table.seated_duel();

    let new_bob = ConnectionId::new();
    table.send(new_bob, rejoin_message("Bob", &duel.code));
    assert!(table.router.sessions().get(duel.bob).is_none());

    // The stale socket closing must not knock the new one offline.
    let dispatch = table.router.disconnect(duel.bob);
    assert!(dispatch.is_empty());
    assert!(table.state(&duel.code).player_named("Bob").unwrap().is_online);

    let started = table.send(duel.alice, start_game_message(None));
    assert_eq!(started.messages_for(new_bob).len(), 1);
    assert!(started.messages_for(duel.bob).is_empty());
}

#[test]
fn test_start_game_needs_two_players() {
    let mut table = TestTable::new();
    let (alice, code) = table.create_room("Alice");

    let dispatch = table.send(alice, start_game_message(None));
    assert_eq!(error_message(&dispatch, alice), "Need 2 players to start");
    assert_eq!(table.state(&code).room.game_status, GameStatus::Waiting);
}

#[test]
fn test_start_game_assigns_first_roles() {
    let mut table = TestTable::new();
    let duel = table.seated_duel();

    let dispatch = table.send(duel.alice, start_game_message(Some(9)));
    let state = latest_update(&dispatch, duel.bob).state;
    let alice = state.player_named("Alice").unwrap();
    let bob = state.player_named("Bob").unwrap();

    assert_eq!(state.room.game_status, GameStatus::WordSetting);
    assert_eq!(state.room.round_number, 1);
    assert_eq!(state.room.word_giver_id, Some(alice.id));
    assert_eq!(state.room.guesser_id, Some(bob.id));
    assert_eq!(state.room.max_guesses, 9);
}

#[test]
fn test_only_creator_picks_difficulty() {
    let mut table = TestTable::new();
    let duel = table.seated_duel();

    let dispatch = table.send(duel.bob, start_game_message(Some(12)));
    let state = latest_update(&dispatch, duel.alice).state;
    assert_eq!(state.room.game_status, GameStatus::WordSetting);
    assert_eq!(state.room.max_guesses, 6);
}

#[test]
fn test_start_game_twice_is_rejected() {
    let mut table = TestTable::new();
    let duel = table.started_duel(6);

    let dispatch = table.send(duel.alice, start_game_message(None));
    assert_eq!(
        error_message(&dispatch, duel.alice),
        "Cannot start the game while the game is word_setting"
    );
}

#[test]
fn test_set_word_by_guesser_is_rejected() {
    let mut table = TestTable::new();
    let duel = table.started_duel(6);

    let dispatch = table.send(duel.bob, set_word_message("cat", None));
    assert_eq!(
        error_message(&dispatch, duel.bob),
        "Not your turn to set the word"
    );
    assert_eq!(
        table.state(&duel.code).room.game_status,
        GameStatus::WordSetting
    );
}

#[test]
fn test_set_word_opens_round() {
    let mut table = TestTable::new();
    let duel = table.started_duel(5);

    let dispatch = table.send(duel.alice, set_word_message("cat", Some("pet")));
    let state = latest_update(&dispatch, duel.alice).state;

    assert_eq!(state.room.game_status, GameStatus::Guessing);
    assert_eq!(state.room.current_word.as_deref(), Some("CAT"));
    assert_eq!(state.room.hint.as_deref(), Some("pet"));

    let round = state.current_round.expect("round in progress");
    assert_eq!(round.word, "CAT");
    assert_eq!(round.max_guesses, 5);
    assert_eq!(round.round_number, 1);
    assert_eq!(round.status, RoundStatus::InProgress);
    assert!(state.history.is_empty());
}

#[test]
fn test_guesser_only_sees_masked_word() {
    let mut table = TestTable::new();
    let duel = table.started_duel(6);

    let dispatch = table.send(duel.alice, set_word_message("cat", Some("pet")));
    let guesser_view = latest_update(&dispatch, duel.bob).state;
    assert_eq!(guesser_view.room.current_word.as_deref(), Some("___"));
    assert_eq!(guesser_view.room.hint.as_deref(), Some("pet"));
    assert_eq!(guesser_view.current_round.unwrap().word, "___");
    assert_eq!(guesser_view.rounds[0].word, "___");

    let dispatch = table.send(duel.bob, guess_message('a'));
    let guesser_view = latest_update(&dispatch, duel.bob).state;
    assert_eq!(guesser_view.current_round.unwrap().word, "_A_");
    let giver_view = latest_update(&dispatch, duel.alice).state;
    assert_eq!(giver_view.current_round.unwrap().word, "CAT");

    // The stored round keeps the real word.
    assert_eq!(table.state(&duel.code).current_round.unwrap().word, "CAT");

    table.send(duel.bob, guess_message('c'));
    let dispatch = table.send(duel.bob, guess_message('t'));
    let revealed = latest_update(&dispatch, duel.bob).state;
    assert!(revealed.current_round.is_none());
    assert_eq!(revealed.rounds[0].word, "CAT");
}

#[test]
fn test_set_word_rejects_non_letters() {
    let mut table = TestTable::new();
    let duel = table.started_duel(6);

    let dispatch = table.send(duel.alice, set_word_message("C4T", None));
    assert_eq!(
        error_message(&dispatch, duel.alice),
        "Word must be 1-32 letters (A-Z)"
    );
}

#[test]
fn test_guess_by_word_giver_is_rejected() {
    let mut table = TestTable::new();
    let duel = table.started_duel(6);
    table.send(duel.alice, set_word_message("CAT", None));

    let dispatch = table.send(duel.alice, guess_message('C'));
    assert_eq!(error_message(&dispatch, duel.alice), "Not your turn to guess");
}

#[test]
fn test_guess_before_word_is_set_is_rejected() {
    let mut table = TestTable::new();
    let duel = table.started_duel(6);

    let dispatch = table.send(duel.bob, guess_message('C'));
    assert_eq!(
        error_message(&dispatch, duel.bob),
        "Cannot guess a letter while the game is word_setting"
    );
}

#[test]
fn test_repeat_guess_rejected_and_state_untouched() {
    let mut table = TestTable::new();
    let duel = table.started_duel(6);
    table.send(duel.alice, set_word_message("CAT", None));

    for letter in ['C', 'Z'] {
        table.send(duel.bob, guess_message(letter));
        let before = table.state(&duel.code);

        let dispatch = table.send(duel.bob, guess_message(letter));
        assert_eq!(error_message(&dispatch, duel.bob), "Letter already guessed");
        assert_eq!(table.state(&duel.code), before);
    }
}

#[test]
fn test_guess_in_progress_carries_round_end_check() {
    let mut table = TestTable::new();
    let duel = table.started_duel(6);
    table.send(duel.alice, set_word_message("CAT", None));

    let dispatch = table.send(duel.bob, guess_message('Z'));
    let update = latest_update(&dispatch, duel.alice);
    let check = update.round_end_check.expect("guesses are annotated");
    assert!(!check.round_ended);
    assert!(check.winner.is_none());

    let round = update.state.current_round.unwrap();
    assert_eq!(round.wrong_guesses, 1);
    assert_eq!(round.guessed_letters, vec!['Z']);
    assert_eq!(update.state.history.len(), 1);
    assert!(!update.state.history[0].is_correct);
}

#[test]
fn test_completing_word_wins_round() {
    let mut table = TestTable::new();
    let duel = table.started_duel(6);

    let dispatch = table.play_round(duel.alice, duel.bob, "CAT", &['C', 'A', 'T']);
    let update = latest_update(&dispatch, duel.bob);
    let check = update.round_end_check.unwrap();

    assert!(check.round_ended);
    assert_eq!(check.winner.as_deref(), Some("Bob"));
    assert_eq!(check.reason, Some(RoundEndReason::WordGuessed));

    let state = update.state;
    assert_eq!(state.room.game_status, GameStatus::RoundFinished);
    assert_eq!(state.player_named("Bob").unwrap().score, 1);
    assert_eq!(state.player_named("Alice").unwrap().score, 0);
    assert!(state.current_round.is_none());
    assert_eq!(state.rounds[0].status, RoundStatus::Won);
    assert_eq!(state.rounds[0].points_awarded, 1);
    assert!(state.rounds[0].completed_at.is_some());
}

#[test]
fn test_running_out_of_guesses_loses_round() {
    let mut table = TestTable::new();
    let duel = table.started_duel(3);

    let dispatch = table.play_round(duel.alice, duel.bob, "CAT", &['C', 'X', 'Y', 'Z']);
    let update = latest_update(&dispatch, duel.alice);
    let check = update.round_end_check.unwrap();

    assert!(check.round_ended);
    assert!(check.winner.is_none());
    assert_eq!(check.reason, Some(RoundEndReason::MaxGuessesReached));
    assert_eq!(update.state.rounds[0].status, RoundStatus::Lost);
    assert_eq!(update.state.rounds[0].points_awarded, 0);
    assert_eq!(update.state.player_named("Bob").unwrap().score, 0);

    let late = table.send(duel.bob, guess_message('A'));
    assert_eq!(
        error_message(&late, duel.bob),
        "Cannot guess a letter while the game is round_finished"
    );
}

#[test]
fn test_start_round_rotates_roles_and_clears_word() {
    let mut table = TestTable::new();
    let duel = table.started_duel(6);
    table.play_round(duel.alice, duel.bob, "CAT", &['C', 'A', 'T']);
    let round_one = table.state(&duel.code).room;

    let dispatch = table.send(duel.bob, ClientMessage::StartRound);
    let round_two = latest_update(&dispatch, duel.alice).state.room;

    assert_eq!(round_two.game_status, GameStatus::WordSetting);
    assert_eq!(round_two.round_number, 2);
    assert_eq!(round_two.word_giver_id, round_one.guesser_id);
    assert_eq!(round_two.guesser_id, round_one.word_giver_id);
    assert!(round_two.current_word.is_none());
    assert!(round_two.hint.is_none());
}

#[test]
fn test_start_round_only_after_round_finished() {
    let mut table = TestTable::new();
    let duel = table.started_duel(6);

    let dispatch = table.send(duel.alice, ClientMessage::StartRound);
    assert_eq!(
        error_message(&dispatch, duel.alice),
        "Cannot start a new round while the game is word_setting"
    );
}

#[test]
fn test_new_word_clears_previous_history() {
    let mut table = TestTable::new();
    let duel = table.started_duel(6);
    table.play_round(duel.alice, duel.bob, "CAT", &['C', 'A', 'T']);
    assert_eq!(table.state(&duel.code).history.len(), 3);

    table.send(duel.alice, ClientMessage::StartRound);
    let dispatch = table.send(duel.bob, set_word_message("DOG", None));
    let state = latest_update(&dispatch, duel.alice).state;
    assert!(state.history.is_empty());
    assert_eq!(state.rounds.len(), 2);
}

#[test]
fn test_at_most_one_round_in_progress() {
    let mut table = TestTable::new();
    let duel = table.started_duel(6);
    let players = [duel.alice, duel.bob];

    for round in 0..4 {
        let giver = players[round % 2];
        let guesser = players[(round + 1) % 2];
        table.send(giver, set_word_message("HI", None));
        table.send(guesser, guess_message('H'));

        let in_progress = table
            .state(&duel.code)
            .rounds
            .iter()
            .filter(|r| r.status == RoundStatus::InProgress)
            .count();
        assert_eq!(in_progress, 1);

        table.send(guesser, guess_message('I'));
        table.send(giver, ClientMessage::StartRound);
    }

    let state = table.state(&duel.code);
    assert_eq!(state.rounds.len(), 4);
    assert!(state.rounds.iter().all(|r| r.status == RoundStatus::Won));
    assert!(
        state
            .rounds
            .windows(2)
            .all(|pair| pair[0].round_number < pair[1].round_number)
    );
}

#[test]
fn test_end_game_draw() {
    let mut table = TestTable::new();
    let duel = table.started_duel(6);
    table.play_round(duel.alice, duel.bob, "CAT", &['C', 'A', 'T']);
    table.send(duel.alice, ClientMessage::StartRound);
    table.play_round(duel.bob, duel.alice, "DOG", &['D', 'O', 'G']);

    let dispatch = table.send(duel.alice, ClientMessage::EndGame);
    let update = latest_update(&dispatch, duel.bob);
    let final_winner = update.final_winner.expect("end_game is annotated");

    assert!(final_winner.is_draw);
    assert!(final_winner.winner.is_none());
    assert_eq!(final_winner.standings.len(), 2);
    assert_eq!(update.state.room.game_status, GameStatus::GameFinished);
}

#[test]
fn test_end_game_tie_broken_by_win_rate() {
    let mut table = TestTable::new();
    let duel = table.started_duel(1);
    // Bob misses, Alice wins, Bob wins: both on 1 point, Alice 1/1 vs Bob 1/2.
    table.play_round(duel.alice, duel.bob, "CAT", &['Z']);
    table.send(duel.alice, ClientMessage::StartRound);
    table.play_round(duel.bob, duel.alice, "DOG", &['D', 'O', 'G']);
    table.send(duel.alice, ClientMessage::StartRound);
    table.play_round(duel.alice, duel.bob, "HI", &['H', 'I']);

    let dispatch = table.send(duel.bob, ClientMessage::EndGame);
    let final_winner = latest_update(&dispatch, duel.alice).final_winner.unwrap();

    assert!(!final_winner.is_draw);
    assert_eq!(final_winner.winner.map(|p| p.name).as_deref(), Some("Alice"));
    assert_eq!(final_winner.standings[0].name, "Alice");
    assert_eq!(final_winner.standings[1].rounds_as_guesser, 2);
}

#[test]
fn test_end_game_ignores_round_in_progress() {
    let mut table = TestTable::new();
    let duel = table.started_duel(6);
    table.send(duel.alice, set_word_message("CAT", None));
    table.send(duel.bob, guess_message('C'));

    let dispatch = table.send(duel.alice, ClientMessage::EndGame);
    let final_winner = latest_update(&dispatch, duel.alice).final_winner.unwrap();
    assert!(final_winner.is_draw);
    assert!(
        final_winner
            .standings
            .iter()
            .all(|s| s.rounds_as_guesser == 0)
    );
}

#[test]
fn test_end_game_from_waiting() {
    let mut table = TestTable::new();
    let (alice, code) = table.create_room("Alice");

    let dispatch = table.send(alice, ClientMessage::EndGame);
    let update = latest_update(&dispatch, alice);
    assert_eq!(update.state.room.game_status, GameStatus::GameFinished);
    assert_eq!(
        update.final_winner.unwrap().winner.map(|p| p.name).as_deref(),
        Some("Alice")
    );
    assert_eq!(table.state(&code).room.game_status, GameStatus::GameFinished);
}

#[test]
fn test_leave_room_notifies_only_others() {
    let mut table = TestTable::new();
    let duel = table.seated_duel();

    let dispatch = table.send(duel.bob, ClientMessage::LeaveRoom);
    assert_eq!(dispatch.recipients(), vec![duel.alice]);

    let state = latest_update(&dispatch, duel.alice).state;
    let bob = state.player_named("Bob").expect("leaving keeps the record");
    assert!(!bob.is_online);

    let again = table.send(duel.bob, ClientMessage::LeaveRoom);
    assert_eq!(error_message(&again, duel.bob), "You are not in a room");
}

#[test]
fn test_disconnect_matches_leave() {
    let mut left = TestTable::new();
    let duel_left = left.seated_duel();
    let via_leave = left.send(duel_left.bob, ClientMessage::LeaveRoom);

    let mut dropped = TestTable::new();
    let duel_dropped = dropped.seated_duel();
    let via_disconnect = dropped.router.disconnect(duel_dropped.bob);

    assert_eq!(via_leave.recipients(), vec![duel_left.alice]);
    assert_eq!(via_disconnect.recipients(), vec![duel_dropped.alice]);
    assert!(
        !latest_update(&via_disconnect, duel_dropped.alice)
            .state
            .player_named("Bob")
            .unwrap()
            .is_online
    );
}

#[test]
fn test_seated_connection_moving_rooms_leaves_first() {
    let mut table = TestTable::new();
    let duel = table.seated_duel();
    let (_, other_code) = table.create_room("Carol");

    let dispatch = table.send(duel.bob, join_message("Bobby", &other_code));

    let old_room = latest_update(&dispatch, duel.alice).state;
    assert!(!old_room.player_named("Bob").unwrap().is_online);

    let new_room = latest_update(&dispatch, duel.bob).state;
    assert_eq!(new_room.room.room_code, other_code);
    assert_eq!(
        table.router.sessions().get(duel.bob).map(|s| s.room_id),
        Some(new_room.room.id)
    );
}

#[test]
fn test_rejected_move_keeps_current_seat() {
    let mut table = TestTable::new();
    let duel = table.seated_duel();

    let dispatch = table.send(duel.bob, join_message("Bobby", "ZZZ999"));
    assert_eq!(error_message(&dispatch, duel.bob), "Room not found");
    assert!(table.router.sessions().get(duel.bob).is_some());
    assert!(table.state(&duel.code).player_named("Bob").unwrap().is_online);
}

#[test]
fn test_game_survives_rejected_commands() {
    let mut table = TestTable::new();
    let duel = table.started_duel(6);
    table.send(duel.alice, set_word_message("CAT", None));
    let before = table.state(&duel.code);

    table.send(duel.alice, guess_message('C'));
    table.send(duel.bob, set_word_message("DOG", None));
    table.send(duel.bob, ClientMessage::StartRound);
    table.send(duel.bob, start_game_message(None));
    assert_eq!(table.state(&duel.code), before);

    let dispatch = table.send(duel.bob, guess_message('C'));
    let check = latest_update(&dispatch, duel.bob).round_end_check.unwrap();
    assert!(!check.round_ended);
}

//! Tests for the game store lifecycle, move contract and result outbox.

use std::sync::Arc;
use std::thread;

use tictactoe_gateway::{
    ErrorKind, GameId, GameStatus, GameStore, GameStoreError, Mark, PlayerId, Seat, ServiceError,
    Winner,
};

fn started(store: &GameStore) -> GameId {
    let game = store.create(Seat::named("Ana")).expect("Create failed");
    store.join(game.id, Seat::named("Bea")).expect("Join failed");
    game.id
}

fn play(store: &GameStore, id: GameId, moves: &[usize]) {
    let mut mark = Mark::X;
    for &position in moves {
        store.make_move(id, mark, position).expect("Move failed");
        mark = mark.opponent();
    }
}

#[test]
fn test_create_waits_for_opponent() {
    let store = GameStore::new();
    let game = store.create(Seat::named("Ana")).expect("Create failed");
    assert_eq!(game.status, GameStatus::WaitingOpponent);
    assert_eq!(game.current_turn, Mark::X);
    assert_eq!(game.board.to_string(), "---------");
    assert_eq!(game.player_o, None);
    assert_eq!(store.list_waiting().len(), 1);
}

#[test]
fn test_create_requires_name() {
    let store = GameStore::new();
    let err = store.create(Seat::named("  ")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(store.is_empty());
}

#[test]
fn test_join_starts_game() {
    let store = GameStore::new();
    let id = started(&store);
    let game = store.get(id).expect("Get failed");
    assert_eq!(game.status, GameStatus::InProgress);
    assert_eq!(game.player_o.as_deref(), Some("Bea"));
    assert!(store.list_waiting().is_empty());
    assert_eq!(store.list_all().len(), 1);
}

#[test]
fn test_join_full_game_conflicts() {
    let store = GameStore::new();
    let id = started(&store);
    let err = store.join(id, Seat::named("Cid")).unwrap_err();
    assert!(matches!(err, GameStoreError::GameFull(_)));
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn test_unknown_game_not_found() {
    let store = GameStore::new();
    let missing = GameId::generate();
    assert_eq!(store.get(missing).unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(
        store.make_move(missing, Mark::X, 0).unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        store.join(missing, Seat::named("Bea")).unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn test_move_before_join_is_invalid_state() {
    let store = GameStore::new();
    let game = store.create(Seat::named("Ana")).expect("Create failed");
    let err = store.make_move(game.id, Mark::X, 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[test]
fn test_wrong_turn_leaves_state_unchanged() {
    let store = GameStore::new();
    let id = started(&store);
    let before = store.get(id).expect("Get failed");

    let err = store.make_move(id, Mark::O, 4).unwrap_err();
    assert!(matches!(
        err,
        GameStoreError::WrongTurn {
            expected: Mark::X,
            got: Mark::O
        }
    ));
    assert_eq!(store.get(id).expect("Get failed"), before);
}

#[test]
fn test_occupied_square_leaves_state_unchanged() {
    let store = GameStore::new();
    let id = started(&store);
    play(&store, id, &[4]);
    let before = store.get(id).expect("Get failed");

    let err = store.make_move(id, Mark::O, 4).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IllegalMove);
    let after = store.get(id).expect("Get failed");
    assert_eq!(after.board, before.board);
    assert_eq!(after.current_turn, Mark::O);
}

#[test]
fn test_out_of_range_is_illegal_move() {
    let store = GameStore::new();
    let id = started(&store);
    let err = store.make_move(id, Mark::X, 9).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IllegalMove);
}

#[test]
fn test_top_row_win_completes_game() {
    let store = GameStore::new();
    let id = started(&store);
    play(&store, id, &[0, 3, 1, 4, 2]);

    let game = store.get(id).expect("Get failed");
    assert_eq!(game.status, GameStatus::Completed);
    assert_eq!(game.winner, Some(Winner::X));
    assert_eq!(game.moves, vec![0, 3, 1, 4, 2]);
    assert!(game.completed_at.is_some());

    let err = store.make_move(id, Mark::O, 8).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(
        store.join(id, Seat::named("Cid")).unwrap_err().kind(),
        ErrorKind::Conflict
    );
}

#[test]
fn test_draw_completes_game() {
    let store = GameStore::new();
    let id = started(&store);
    play(&store, id, &[0, 1, 2, 4, 3, 5, 7, 6, 8]);
    let game = store.get(id).expect("Get failed");
    assert_eq!(game.status, GameStatus::Completed);
    assert_eq!(game.winner, Some(Winner::Draw));
}

#[test]
fn test_completion_queues_both_sides() {
    let store = GameStore::new();
    let ana = PlayerId::generate();
    let game = store.create(Seat::registered("Ana", ana)).expect("Create failed");
    store.join(game.id, Seat::named("Bea")).expect("Join failed");
    assert!(store.pending_results().is_empty());

    play(&store, game.id, &[0, 3, 1, 4, 2]);
    let pending = store.pending_results();
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].mark, Mark::X);
    assert_eq!(*pending[0].player.player_id(), Some(ana));
    assert_eq!(pending[0].opponent.name(), "Bea");
    assert_eq!(pending[1].mark, Mark::O);
    assert_eq!(pending[1].result, pending[0].result.mirrored());
}

#[test]
fn test_acknowledge_is_per_side_and_idempotent() {
    let store = GameStore::new();
    let id = started(&store);
    play(&store, id, &[0, 3, 1, 4, 2]);

    store.acknowledge_result(id, Mark::X).expect("Ack failed");
    let pending = store.pending_results();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].mark, Mark::O);

    store.acknowledge_result(id, Mark::X).expect("Repeat ack failed");
    store.acknowledge_result(id, Mark::O).expect("Ack failed");
    assert!(store.pending_results().is_empty());
}

#[test]
fn test_acknowledge_unfinished_game_is_invalid_state() {
    let store = GameStore::new();
    let id = started(&store);
    let err = store.acknowledge_result(id, Mark::X).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[test]
fn test_store_error_converts_to_service_error() {
    let store = GameStore::new();
    let err = ServiceError::from(store.get(GameId::generate()).unwrap_err());
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_concurrent_moves_on_one_game_serialise() {
    let store = Arc::new(GameStore::new());
    let id = started(&store);

    let handles: Vec<_> = (0..9)
        .map(|position| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.make_move(id, Mark::X, position).is_ok())
        })
        .collect();
    let accepted = handles
        .into_iter()
        .map(|h| h.join().expect("Thread panicked"))
        .filter(|ok| *ok)
        .count();

    assert_eq!(accepted, 1);
    let game = store.get(id).expect("Get failed");
    assert_eq!(game.moves.len(), 1);
    assert_eq!(game.current_turn, Mark::O);
}

#[test]
fn test_games_are_independent() {
    let store = GameStore::new();
    let first = started(&store);
    let second = started(&store);
    play(&store, first, &[0, 3, 1, 4, 2]);

    let other = store.get(second).expect("Get failed");
    assert_eq!(other.status, GameStatus::InProgress);
    assert_eq!(other.board.to_string(), "---------");
    assert_eq!(store.len(), 2);
}

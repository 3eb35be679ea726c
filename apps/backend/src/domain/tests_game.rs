use uuid::Uuid;

use crate::domain::board::{Outcome, Player};
use crate::domain::game::{Game, Seat, BOT_NAME};
use crate::domain::test_helpers::play_columns;

fn two_player_game() -> Game {
    Game::new(
        Uuid::new_v4(),
        Seat {
            session_id: Uuid::new_v4(),
            name: "alice".to_string(),
        },
        Seat {
            session_id: Uuid::new_v4(),
            name: "bob".to_string(),
        },
        false,
    )
}

#[test]
fn seats_resolve_by_session_and_by_name() {
    let game = two_player_game();
    let p1_session = game.seat(Player::One).session_id;
    let p2_session = game.seat(Player::Two).session_id;

    assert_eq!(game.seat_of_session(p1_session), Some(Player::One));
    assert_eq!(game.seat_of_session(p2_session), Some(Player::Two));
    assert_eq!(game.seat_of_session(Uuid::new_v4()), None);

    assert_eq!(game.seat_of_name("alice"), Some(Player::One));
    assert_eq!(game.seat_of_name("bob"), Some(Player::Two));
    assert_eq!(game.seat_of_name("mallory"), None);
}

#[test]
fn rebind_session_replaces_only_the_given_seat() {
    let mut game = two_player_game();
    let p2_session = game.seat(Player::Two).session_id;
    let fresh = Uuid::new_v4();

    game.rebind_session(Player::One, fresh);

    assert_eq!(game.seat_of_session(fresh), Some(Player::One));
    assert_eq!(game.seat_of_session(p2_session), Some(Player::Two));
    assert_eq!(game.seat_of_name("alice"), Some(Player::One));
}

#[test]
fn winner_name_follows_the_board_outcome() {
    let mut game = two_player_game();
    assert_eq!(game.winner_name(), None);

    play_columns(&mut game.board, &[0, 1, 0, 1, 0, 1, 0]);
    assert_eq!(game.board.outcome(), Some(Outcome::Win(Player::One)));
    assert_eq!(game.winner_name(), Some("alice"));
    assert!(game.is_over());
}

#[test]
fn opponent_name_is_the_other_seat() {
    let game = two_player_game();
    assert_eq!(game.opponent_name(Player::One), "bob");
    assert_eq!(game.opponent_name(Player::Two), "alice");
}

#[test]
fn bot_games_use_the_sentinel_name() {
    let game = Game::new(
        Uuid::new_v4(),
        Seat {
            session_id: Uuid::new_v4(),
            name: "alice".to_string(),
        },
        Seat {
            session_id: Uuid::new_v4(),
            name: BOT_NAME.to_string(),
        },
        true,
    );
    assert!(game.is_bot);
    assert_eq!(game.opponent_name(Player::One), BOT_NAME);
}

#[test]
fn finish_is_idempotent_and_yields_a_duration() {
    let mut game = two_player_game();
    assert_eq!(game.duration(), None);

    game.finish();
    let first = game.ended_at.expect("finish stamps an end time");
    game.finish();
    assert_eq!(game.ended_at, Some(first));
    assert!(game.duration().expect("finished game has a duration") >= time::Duration::ZERO);
}

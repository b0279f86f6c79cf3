use duet_core::{
    CardType, EndReason, GameConfigOverrides, GameOutcome, GuessVerdict, InMemoryRoomStore,
    Phase, Role, RoomCode, RoomService, RoomStatus, WordPool,
};
use std::sync::Arc;

fn seeded_service(seed: u64) -> RoomService {
    RoomService::with_seed(Arc::new(InMemoryRoomStore::new()), WordPool::standard(), seed)
}

fn started(service: &RoomService, overrides: GameConfigOverrides) -> RoomCode {
    let room = service.create_room("p1", &overrides).unwrap();
    let code = room.code().clone();
    service.join_room(&code, "p1", "Ann").unwrap();
    service.join_room(&code, "p2", "Ben").unwrap();
    service.start_game(&code).unwrap();
    code
}

fn positions(service: &RoomService, code: &RoomCode, player: &str, card_type: CardType) -> Vec<usize> {
    service
        .get_room(code)
        .unwrap()
        .key_map(player)
        .unwrap()
        .positions_of(card_type)
}

#[test]
fn test_first_turn_clue_guess_and_handover() {
    let service = seeded_service(2024);
    let code = started(&service, GameConfigOverrides::default());

    let room = service.get_room(&code).unwrap();
    assert_eq!(room.words().len(), 25);
    for player in ["p1", "p2"] {
        let key_map = room.key_map(player).unwrap();
        assert_eq!(key_map.count(CardType::Green), 9);
        assert_eq!(key_map.count(CardType::Assassin), 3);
        assert_eq!(key_map.count(CardType::Neutral), 13);
    }

    let submission = service.submit_clue(&code, "p1", "ANIMAL", 2).unwrap();
    assert_eq!(submission.room.phase(), Phase::Guess);
    assert_eq!(submission.room.guess_count_allowed(), 2);

    let green = positions(&service, &code, "p2", CardType::Green)[0];
    let first = service.process_guess(&code, "p2", green).unwrap().unwrap();
    assert_eq!(first.outcome.outcome, GuessVerdict::Correct);
    assert_eq!(first.room.player("p1").unwrap().correct_guesses(), 1);
    assert_eq!(first.room.guesses_this_turn(), 1);
    assert!(!service.should_end_turn(&code).unwrap());

    let neutral = positions(&service, &code, "p2", CardType::Neutral)[0];
    let second = service.process_guess(&code, "p2", neutral).unwrap().unwrap();
    assert_eq!(second.outcome.outcome, GuessVerdict::Neutral);
    assert_eq!(second.room.errors_remaining(), 2);
    assert_eq!(second.room.guesses_this_turn(), 2);
    assert!(second.outcome.turn_over);
    assert!(service.should_end_turn(&code).unwrap());

    let room = service.next_turn(&code).unwrap();
    assert_eq!(room.current_turn(), 1);
    assert_eq!(room.phase(), Phase::Clue);
    assert_eq!(room.active_player_id(), Some("p2"));
    assert_eq!(room.player("p1").unwrap().role(), Role::Guesser);
    assert_eq!(room.player("p2").unwrap().role(), Role::ClueGiver);
}

#[test]
fn test_errors_exhausted_ends_game_with_turns_left() {
    let service = seeded_service(7);
    let code = started(&service, GameConfigOverrides::default());
    service.submit_clue(&code, "p1", "RIVER", 3).unwrap();

    let neutrals = positions(&service, &code, "p2", CardType::Neutral);
    for (i, &pos) in neutrals.iter().take(3).enumerate() {
        let resolution = service.process_guess(&code, "p2", pos).unwrap().unwrap();
        assert_eq!(resolution.room.errors_remaining(), 2 - i as u32);
    }

    let room = service.get_room(&code).unwrap();
    assert_eq!(room.status(), RoomStatus::Finished);
    assert_eq!(room.turns_remaining(), 9);
    let result = room.result().unwrap();
    assert_eq!(result.outcome, GameOutcome::LossTimeout);
    assert_eq!(result.reason, EndReason::TooManyErrors);
    assert_eq!(result.total_errors, 3);
    assert_eq!(result.total_turns_played, 1);

    assert!(service.process_guess(&code, "p2", neutrals[3]).unwrap().is_none());
}

#[test]
fn test_custom_max_errors() {
    let service = seeded_service(11);
    let overrides = GameConfigOverrides {
        max_errors: Some(1),
        ..Default::default()
    };
    let code = started(&service, overrides);
    service.submit_clue(&code, "p1", "RIVER", 2).unwrap();

    let neutral = positions(&service, &code, "p2", CardType::Neutral)[0];
    let resolution = service.process_guess(&code, "p2", neutral).unwrap().unwrap();
    assert_eq!(resolution.outcome.status, RoomStatus::Finished);
    assert_eq!(
        resolution.room.result().unwrap().reason,
        EndReason::TooManyErrors
    );
}

#[test]
fn test_racing_guesses_on_one_card() {
    let service = Arc::new(seeded_service(3));
    let code = started(&service, GameConfigOverrides::default());
    service.submit_clue(&code, "p1", "RIVER", 9).unwrap();
    let target = positions(&service, &code, "p2", CardType::Green)[0];

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let service = service.clone();
            let code = code.clone();
            std::thread::spawn(move || service.process_guess(&code, "p2", target).unwrap())
        })
        .collect();

    let applied: Vec<_> = handles
        .into_iter()
        .filter_map(|h| h.join().unwrap())
        .collect();
    assert_eq!(applied.len(), 1);

    let room = service.get_room(&code).unwrap();
    assert_eq!(room.revealed_cards(), &[target]);
    assert_eq!(room.guesses_this_turn(), 1);
    assert_eq!(room.player("p1").unwrap().correct_guesses(), 1);
}

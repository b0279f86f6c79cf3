use duet_core::{CardType, GameConfigOverrides, RoomService, RoomStatus};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let service = RoomService::in_memory();

    println!("Creating room...");
    let room = service.create_room("ada", &GameConfigOverrides::default())?;
    let code = room.code().clone();
    println!("Room code: {}", code);

    service.join_room(&code, "ada", "Ada")?;
    service.join_room(&code, "grace", "Grace")?;
    let room = service.start_game(&code)?;

    println!("\nBoard:");
    for row in room.words().chunks(room.config().grid_size) {
        println!("  {}", row.join(" "));
    }

    // Ada gives a clue, Grace guesses straight off her own key map.
    service.submit_clue(&code, "ada", "ORBIT", 2)?;
    let key_map = room.key_map("grace").ok_or("grace has no key map")?;
    for pos in key_map.positions_of(CardType::Green).into_iter().take(2) {
        if let Some(resolution) = service.process_guess(&code, "grace", pos)? {
            println!(
                "Grace guessed {} -> {:?}",
                room.words()[pos],
                resolution.outcome.outcome
            );
        }
    }

    if service.should_end_turn(&code)? {
        let room = service.next_turn(&code)?;
        println!(
            "\nTurn {} begins, {} gives the clue",
            room.current_turn(),
            room.active_player_id().unwrap_or("nobody")
        );
    }

    let room = service.get_room(&code)?;
    let view = room.view_for(Some("grace"));
    println!("\nGrace's view as JSON:");
    println!("{}", serde_json::to_string_pretty(&view)?);

    if room.status() == RoomStatus::Finished {
        println!("Game over: {:?}", room.result());
    }

    Ok(())
}

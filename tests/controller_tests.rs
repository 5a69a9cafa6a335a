use rand::{rngs::SmallRng, SeedableRng};
use subsim_bot::{BotError, BotTuning, ChargeTarget, Command, Coordinate, Event, Phase, TurnController};

fn feed(
    controller: &mut TurnController,
    rng: &mut SmallRng,
    line: &str,
) -> Result<Option<Command>, BotError> {
    controller.handle(Event::parse(line)?, rng)
}

/// A controller that has joined a 10x10 game with an obstacle at (5,5).
fn joined(rng: &mut SmallRng) -> TurnController {
    let mut controller = TurnController::new("Nautilus", BotTuning::default());
    assert_eq!(feed(&mut controller, rng, "C|1.0|Test|10|10|2").unwrap(), None);
    assert_eq!(
        controller.phase(),
        Phase::AwaitSettings { remaining: 2 }
    );
    assert_eq!(feed(&mut controller, rng, "V|SubsPerPlayer|1").unwrap(), None);
    let join = feed(&mut controller, rng, "V|Obstacle|5|5").unwrap();
    match join {
        Some(Command::Join { name, position }) => {
            assert_eq!(name, "Nautilus");
            assert_ne!(position, Coordinate::new(5, 5));
        }
        other => panic!("expected a join command, got {:?}", other),
    }
    assert_eq!(controller.phase(), Phase::AwaitJoin);
    assert_eq!(feed(&mut controller, rng, "J|Nautilus").unwrap(), None);
    assert_eq!(controller.phase(), Phase::AwaitBeginTurn);
    controller
}

#[test]
fn joins_after_the_last_custom_setting() {
    let mut rng = SmallRng::seed_from_u64(1);
    let controller = joined(&mut rng);
    let session = controller.session().unwrap();
    assert!(session.grid().is_blocked(Coordinate::new(5, 5)).unwrap());
    assert_eq!(controller.turn(), 0);
}

#[test]
fn joins_immediately_without_settings() {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut controller = TurnController::new("Nautilus", BotTuning::default());
    let join = feed(&mut controller, &mut rng, "C|1.0|Test|4|4|0").unwrap();
    assert!(matches!(join, Some(Command::Join { .. })));
}

#[test]
fn plays_a_short_game() {
    let mut rng = SmallRng::seed_from_u64(2);
    let mut controller = joined(&mut rng);

    let first = feed(&mut controller, &mut rng, "B|1").unwrap();
    assert!(matches!(
        first,
        Some(Command::Move {
            turn: 1,
            sub_id: 0,
            charge: ChargeTarget::Torpedo,
            ..
        })
    ));
    assert_eq!(controller.phase(), Phase::AwaitTurnEvents);
    assert_eq!(controller.turn(), 1);

    for line in [
        "I|1|7|2|2|1|torpedos=3|torpedo_range=4|sonar_range=2",
        "O|1|2|5|60",
        "S|1|3",
        "H|1|5",
    ] {
        assert_eq!(feed(&mut controller, &mut rng, line).unwrap(), None);
    }
    let session = controller.session().unwrap();
    assert_eq!(session.sonar_min_range(), 3);
    assert_eq!(session.last_score(), Some(5));

    let second = feed(&mut controller, &mut rng, "B|2").unwrap();
    assert_eq!(
        second,
        Some(Command::Fire {
            turn: 2,
            sub_id: 7,
            target: Coordinate::new(2, 5),
        })
    );
    // occupants do not survive the turn, the contact does
    let cell = controller
        .session()
        .unwrap()
        .grid()
        .cell_at(Coordinate::new(2, 5))
        .unwrap();
    assert_eq!(cell.occupant_size, 0);
    assert_eq!((cell.contact_dist, cell.contact_age), (1, 2));

    feed(&mut controller, &mut rng, "I|2|7|2|2|1|max_sonar=1|torpedo_range=1").unwrap();
    let third = feed(&mut controller, &mut rng, "B|3").unwrap();
    assert_eq!(third, Some(Command::Ping { turn: 3, sub_id: 7 }));

    assert_eq!(feed(&mut controller, &mut rng, "F|2|3|Finished").unwrap(), None);
    assert_eq!(controller.phase(), Phase::AwaitResults { remaining: 2 });
    feed(&mut controller, &mut rng, "F|Nautilus|10").unwrap();
    assert!(!controller.is_finished());
    feed(&mut controller, &mut rng, "F|Kraken|4").unwrap();
    assert!(controller.is_finished());

    let summary = controller.summary().unwrap();
    assert_eq!(summary.status, "Finished");
    assert_eq!(summary.turn_count, 3);
    assert_eq!(summary.players.len(), 2);
    assert_eq!(summary.players[1].name, "Kraken");
}

#[test]
fn turn_mismatch_is_fatal_and_changes_nothing() {
    let mut rng = SmallRng::seed_from_u64(3);
    let mut controller = joined(&mut rng);
    feed(&mut controller, &mut rng, "B|1").unwrap();

    for line in ["S|2|3", "I|0|0|1|1|1", "B|3", "B|1"] {
        let err = feed(&mut controller, &mut rng, line).unwrap_err();
        assert!(
            matches!(err, BotError::ProtocolViolation(_)),
            "{:?} gave {:?}",
            line,
            err
        );
        assert_eq!(controller.turn(), 1);
        assert_eq!(controller.phase(), Phase::AwaitTurnEvents);
    }
    assert!(controller.session().unwrap().evidence().is_empty());
}

#[test]
fn first_turn_must_be_one() {
    let mut rng = SmallRng::seed_from_u64(3);
    let mut controller = joined(&mut rng);
    assert!(feed(&mut controller, &mut rng, "B|2").is_err());
    assert_eq!(controller.phase(), Phase::AwaitBeginTurn);
}

#[test]
fn events_out_of_phase_are_rejected() {
    let mut rng = SmallRng::seed_from_u64(4);
    let mut controller = TurnController::new("Nautilus", BotTuning::default());
    assert!(matches!(
        feed(&mut controller, &mut rng, "B|1"),
        Err(BotError::ProtocolViolation(_))
    ));
    assert_eq!(controller.phase(), Phase::AwaitConfig);

    feed(&mut controller, &mut rng, "C|1.0|Test|10|10|0").unwrap();
    assert!(feed(&mut controller, &mut rng, "C|1.0|Test|10|10|0").is_err());
    assert!(feed(&mut controller, &mut rng, "B|1").is_err());
}

#[test]
fn more_than_one_sub_is_a_configuration_error() {
    let mut rng = SmallRng::seed_from_u64(5);
    let mut controller = TurnController::new("Nautilus", BotTuning::default());
    feed(&mut controller, &mut rng, "C|1.0|Test|10|10|1").unwrap();
    let err = feed(&mut controller, &mut rng, "V|SubsPerPlayer|2").unwrap_err();
    assert!(matches!(err, BotError::Configuration(_)));
}

#[test]
fn unknown_settings_are_tolerated() {
    let mut rng = SmallRng::seed_from_u64(5);
    let mut controller = TurnController::new("Nautilus", BotTuning::default());
    feed(&mut controller, &mut rng, "C|1.0|Test|10|10|1").unwrap();
    let join = feed(&mut controller, &mut rng, "V|MaxTurns|300").unwrap();
    assert!(matches!(join, Some(Command::Join { .. })));
}

#[test]
fn obstacle_off_the_map_is_rejected() {
    let mut rng = SmallRng::seed_from_u64(5);
    let mut controller = TurnController::new("Nautilus", BotTuning::default());
    feed(&mut controller, &mut rng, "C|1.0|Test|10|10|1").unwrap();
    let err = feed(&mut controller, &mut rng, "V|Obstacle|11|1").unwrap_err();
    assert!(matches!(err, BotError::OutOfBounds(_)));
}

#[test]
fn join_answer_for_someone_else_fails() {
    let mut rng = SmallRng::seed_from_u64(6);
    let mut controller = TurnController::new("Nautilus", BotTuning::default());
    feed(&mut controller, &mut rng, "C|1.0|Test|10|10|0").unwrap();
    let err = feed(&mut controller, &mut rng, "J|Kraken").unwrap_err();
    assert!(matches!(err, BotError::ProtocolViolation(_)));
    assert_eq!(controller.phase(), Phase::AwaitJoin);
}

#[test]
fn nothing_is_accepted_after_the_results() {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut controller = joined(&mut rng);
    feed(&mut controller, &mut rng, "F|1|0|Aborted").unwrap();
    feed(&mut controller, &mut rng, "F|Nautilus|0").unwrap();
    assert!(controller.is_finished());
    assert!(feed(&mut controller, &mut rng, "B|1").is_err());
    assert!(feed(&mut controller, &mut rng, "F|Nautilus|0").is_err());
}

#[test]
fn invalid_tuning_fails_at_configuration() {
    let mut rng = SmallRng::seed_from_u64(8);
    let tuning = BotTuning {
        tie_accept: 1.5,
        ..BotTuning::default()
    };
    let mut controller = TurnController::new("Nautilus", tuning);
    let err = feed(&mut controller, &mut rng, "C|1.0|Test|10|10|0").unwrap_err();
    assert!(matches!(err, BotError::Configuration(_)));
}

#[test]
fn oversized_map_is_a_configuration_error() {
    let mut rng = SmallRng::seed_from_u64(9);
    for line in [
        "C|1.0|Huge|100000|100000|0",
        "C|1.0|Huge|18446744073709551615|2|0",
        "C|1.0|Huge|1048577|1|0",
    ] {
        let mut controller = TurnController::new("Nautilus", BotTuning::default());
        let err = feed(&mut controller, &mut rng, line).unwrap_err();
        assert!(matches!(err, BotError::Configuration(_)), "{:?} gave {:?}", line, err);
        assert_eq!(controller.phase(), Phase::AwaitConfig);
        assert!(controller.session().is_none());
    }
}

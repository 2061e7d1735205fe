//! Integration tests for session state driven by input messages.

use hexcrawl::{
    Control, CrawlResult, Direction, GameConfig, InputEvent, InputHandler, MoveOutcome,
    SessionMessage, SessionState, Variant,
};

#[test]
fn test_offset_session_walks_to_clicked_cell() -> CrawlResult<()> {
    let mut session = SessionState::new(GameConfig::for_variant(Variant::Offset, 2024))?;
    let handler = InputHandler::for_grid(session.grid());

    // Click a floor cell in the last room, through the screen layout.
    let target = session.dungeon().rooms[session.dungeon().rooms.len() - 1].members[0];
    let (column, row) = session.grid().convention().cell_to_screen(target);
    let message = handler
        .to_message(InputEvent::Click {
            column: column as u16,
            row: row as u16,
        })
        .expect("click on the map");
    assert_eq!(message, SessionMessage::TargetSelected(target));
    assert_eq!(session.apply(message), Control::Continue);

    let mut last = session.player();
    for _ in 0..200 {
        let outcome = session.tick()?;
        match outcome.movement {
            MoveOutcome::Moved(pos) => {
                assert!(session.grid().is_floor(pos));
                last = pos;
            }
            MoveOutcome::Idle | MoveOutcome::Arrived | MoveOutcome::Blocked => {
                assert_eq!(session.player(), last);
            }
        }
        if session.target().is_none() {
            break;
        }
    }

    // Greedy movement may stall; it must never leave floor either way.
    assert!(session.grid().is_floor(session.player()));
    if session.target().is_none() {
        assert_eq!(session.player(), target);
    }
    Ok(())
}

#[test]
fn test_hex_session_has_exit_and_descends() -> CrawlResult<()> {
    let mut session = SessionState::new(GameConfig::for_variant(Variant::Hex, 7))?;
    let exit = session.exit().expect("hex variant places an exit");
    assert_ne!(exit, session.player());

    session.descend()?;
    assert_eq!(session.depth(), 1);
    assert!(session.grid().is_floor(session.player()));
    let new_exit = session.exit().expect("exit after descending");
    assert!(session.grid().is_floor(new_exit));
    assert_ne!(new_exit, session.player());
    Ok(())
}

#[test]
fn test_keyboard_steps_and_quit() -> CrawlResult<()> {
    let mut session = SessionState::new(GameConfig::for_variant(Variant::Hex, 31))?;
    for direction in Direction::all() {
        session.apply(SessionMessage::Step(direction));
        assert!(session.grid().is_valid(session.player()));
        assert!(session.grid().is_floor(session.player()));
    }
    assert_eq!(session.apply(SessionMessage::Quit), Control::Quit);
    Ok(())
}

#[test]
fn test_sessions_with_same_seed_match() -> CrawlResult<()> {
    let a = SessionState::new(GameConfig::for_variant(Variant::Hex, 99))?;
    let b = SessionState::new(GameConfig::for_variant(Variant::Hex, 99))?;
    assert_eq!(a.dungeon(), b.dungeon());
    assert_eq!(a.player(), b.player());
    assert_eq!(a.exit(), b.exit());
    Ok(())
}

//! Integration tests for drawing sessions into a frame buffer.

use hexcrawl::{
    CrawlResult, FrameBuffer, GameConfig, MapView, RenderSurface, SessionMessage,
    SessionState, Tint, Variant, SPINNER,
};

fn frame_for(session: &SessionState) -> FrameBuffer {
    let grid = session.grid();
    let (width, height) = grid.convention().screen_extent(grid.width(), grid.height());
    FrameBuffer::new(width as u16, height as u16 + 1)
}

#[test]
fn test_offset_frame_layout() -> CrawlResult<()> {
    let mut session = SessionState::new(GameConfig::for_variant(Variant::Offset, 5))?;
    let view = MapView::new();
    let mut fb = frame_for(&session);

    view.render(&session, &mut fb)?;

    // One glyph per cell, odd rows shifted right by one column.
    let player = session.player();
    let expected = ((player.x * 2 + player.y % 2) as u16, player.y as u16);
    assert_eq!(fb.find('@'), vec![expected]);
    let style = fb.get(expected.0 as i32, expected.1 as i32).unwrap().style;
    assert_eq!(style.fg, Tint::Green);
    assert!(style.bold);

    let cells = (session.grid().width() * session.grid().height()) as usize;
    let drawn = fb.find('#').len() + fb.find('.').len() + 1;
    assert_eq!(drawn, cells);

    // Spinner below the map.
    assert_eq!(fb.glyph_at(0, 20), SPINNER[0]);

    let target = session
        .grid()
        .floor_positions()
        .into_iter()
        .find(|&pos| pos != player)
        .expect("a second floor cell");
    session.apply(SessionMessage::TargetSelected(target));
    session.tick()?;
    view.render(&session, &mut fb)?;
    assert_eq!(fb.glyph_at(0, 20), SPINNER[1]);
    if session.target().is_some() {
        assert_eq!(fb.find('*').len(), 1);
    }
    Ok(())
}

#[test]
fn test_hex_frame_layout() -> CrawlResult<()> {
    let session = SessionState::new(GameConfig::for_variant(Variant::Hex, 8))?;
    let view = MapView::new();
    let mut fb = frame_for(&session);
    assert_eq!(fb.size(), (300, 83));

    view.render(&session, &mut fb)?;

    // Player and exit hexagons carry their glyph twice.
    assert_eq!(fb.find('&').len(), 2);
    assert_eq!(fb.find('X').len(), 2);

    let exit = session.exit().unwrap();
    let (column, row) = (exit.x * 3, exit.y * 2);
    assert_eq!(fb.glyph_at(column + 1, row + 1), 'X');
    assert_eq!(fb.glyph_at(column, row + 1), '\\');
    assert_eq!(fb.glyph_at(column + 2, row + 2), '\\');
    assert_eq!(fb.get(column + 1, row + 1).unwrap().style.fg, Tint::Red);

    assert!(fb.row_text(82).contains("depth 0"));
    Ok(())
}

#[test]
fn test_drawing_outside_surface_is_dropped() -> CrawlResult<()> {
    let session = SessionState::new(GameConfig::for_variant(Variant::Hex, 8))?;
    let mut small = FrameBuffer::new(10, 5);
    MapView::new().render(&session, &mut small)?;
    assert_eq!(small.size(), (10, 5));
    assert!(small.row_text(0).starts_with("---"));
    Ok(())
}

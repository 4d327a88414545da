//! End-to-end session flows.

use kurbo::{Point, Size, Vec2};
use snipcanvas_core::random::FixedRandom;
use snipcanvas_core::{
    CanvasConfig, ChatRole, FileDescriptor, MouseButton, PointerEvent, ProcessingState, Services,
    Session, ToolKind,
};
use std::time::Duration;

fn session() -> Session {
    let services = Services {
        random: Box::new(FixedRandom(0.5)),
        ..Services::seeded(0)
    };
    let config = CanvasConfig::default().without_latency();
    let mut session = Session::with_services(config, services);
    session.set_viewport(Point::ZERO, Size::new(1000.0, 800.0));
    session
}

fn press(session: &mut Session, at: Point, time_ms: u64) {
    session.handle_pointer(PointerEvent::Down {
        position: at,
        button: MouseButton::Left,
        time_ms,
    });
}

fn click(session: &mut Session, at: Point, time_ms: u64) {
    press(session, at, time_ms);
    session.handle_pointer(PointerEvent::Up {
        position: at,
        button: MouseButton::Left,
    });
}

#[test]
fn test_fit_single_box() {
    let mut session = session();
    let camera = *session.camera().camera();
    assert!(camera.initialized);
    assert!((camera.scale - 1.0).abs() < f64::EPSILON);
    assert!((camera.offset.x - -3500.0).abs() < f64::EPSILON);

    session.place_snippet("only", Some(Point::new(4000.0, 4000.0)));
    session.fit_to_content();

    let camera = *session.camera().camera();
    assert!((camera.scale - 2.5).abs() < f64::EPSILON);
    let center = session.camera().world_to_screen(Point::new(4130.0, 4070.0));
    assert!((center.x - 500.0).abs() < 1e-9);
    assert!((center.y - 400.0).abs() < 1e-9);
}

#[test]
fn test_drop_at_documented_camera() {
    let mut session = session();
    press(&mut session, Point::ZERO, 0);
    // Pan from the initial (-3500, -3600) to (-3500, -3500).
    session.handle_pointer(PointerEvent::Move {
        position: Point::new(0.0, 100.0),
    });
    session.handle_pointer(PointerEvent::Up {
        position: Point::new(0.0, 100.0),
        button: MouseButton::Left,
    });
    assert_eq!(session.camera().camera().offset, Vec2::new(-3500.0, -3500.0));

    let payload = r#"{"type":"snippet","id":"x","text":"t"}"#;
    let id = session.drop_payload(payload, Point::new(500.0, 400.0)).unwrap();
    assert_eq!(session.store().get(id).unwrap().position(), Point::new(4000.0, 3900.0));
}

#[test]
fn test_upload_pin_arrange_export() {
    let mut session = session();
    session.upload(FileDescriptor::new("research.pdf", 40_960));
    assert_eq!(session.processing(), ProcessingState::Processing);
    session.wait_idle(Duration::from_secs(5));
    assert_eq!(session.processing(), ProcessingState::Ready);

    let first = session.pin_snippet(0).unwrap();
    let second = session.pin_snippet(1).unwrap();
    assert_eq!(session.store().ids(), vec![first, second]);

    // Both pins land on (4000, 4000); the header of the bottom one is covered.
    session.set_tool(ToolKind::Select);
    let header = session.camera().world_to_screen(Point::new(4020.0, 4010.0));
    press(&mut session, header, 0);
    assert_eq!(session.store().top(), Some(second));
    session.handle_pointer(PointerEvent::Move {
        position: header + Vec2::new(300.0, 0.0),
    });
    session.handle_pointer(PointerEvent::Up {
        position: header + Vec2::new(300.0, 0.0),
        button: MouseButton::Left,
    });
    assert_eq!(session.store().get(second).unwrap().position(), Point::new(4300.0, 4000.0));

    // Now the first box is uncovered and can be raised. A second later, so
    // this is not read as a double-click.
    click(&mut session, header, 1_000);
    assert!(!session.selection().is_editing(first));
    assert_eq!(session.store().top(), Some(first));
    assert!(session.selection().is_selected(first));

    let export = session.export();
    assert_eq!(export.canvas.items.len(), 2);
    assert_eq!(export.summary(), "2 info box(es) from \"research.pdf\"");
}

#[test]
fn test_chat_and_help() {
    let mut session = session();
    for text in ["Can you help?", "export please", "zoom", "summarize", "tip please"] {
        session.send_chat(text);
    }
    session.wait_idle(Duration::from_secs(5));

    let replies: Vec<_> = session
        .messages()
        .iter()
        .filter(|m| m.role == ChatRole::Assistant)
        .skip(1)
        .map(|m| m.text.as_str())
        .collect();
    assert_eq!(replies.len(), 5);
    let expected = ["Workflow", "To export", "Use the toolbar", "There's nothing", "Tip:"];
    for (reply, prefix) in replies.iter().zip(expected) {
        assert!(reply.starts_with(prefix), "{reply:?} should start with {prefix:?}");
    }
}

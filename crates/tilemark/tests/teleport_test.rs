//! Teleporting the local player through the session and its worker.

use std::sync::Arc;
use std::time::Duration;

use tilemark::{
    player_record, read_position, BlockPos, EntityRef, HeadlessCanvas, LongPressAction, MapConfig,
    MapError, MapSession, MarkerTapAction, MemoryContext, MemoryMarkerBook, MemorySession,
    MemoryWorld, Notice, PlayerPosition, StorageError,
};
use tilemark_markers::Marker;
use tilemark_shared::{CustomIcon, Dimension, DimensionRegistry, IconCatalog};
use tilemark_tags::{Tag, TagError};

const TIMEOUT: Duration = Duration::from_secs(5);

fn session(world: &MemoryWorld) -> MemorySession {
    let mut session = MapSession::new(
        MapConfig::default(),
        DimensionRegistry::builtin(),
        &IconCatalog::builtin(),
        MemoryContext::default(),
        Arc::new(world.clone()),
        MemoryMarkerBook::new(),
        HeadlessCanvas::new(),
    );
    session.open();
    session
}

fn home(dimension: Dimension) -> Marker {
    Marker::new(
        10,
        20,
        30,
        dimension,
        Arc::new(CustomIcon::named("blue_marker", "Home")),
        true,
    )
}

fn stored_record(world: &MemoryWorld) -> Tag {
    world
        .player_tags(&EntityRef::LocalPlayer)
        .and_then(|tags| tags.into_iter().next())
        .expect("local player record")
}

fn stored_position(world: &MemoryWorld) -> PlayerPosition {
    read_position(&stored_record(world)).expect("well-formed record")
}

#[test]
fn test_marker_teleport_moves_to_block_center() {
    let world = MemoryWorld::new()
        .with_local_player(0.5, 64.0, 0.5, 0)
        .with_spawn(BlockPos::new(0, 64, 0));
    let mut session = session(&world);

    session
        .on_marker_tap(&home(Dimension::NETHER), MarkerTapAction::TeleportLocalPlayer)
        .expect("queued");
    assert_eq!(session.outstanding(), 1);
    assert!(session.settle(TIMEOUT));

    let pos = stored_position(&world);
    assert_eq!((pos.x, pos.y, pos.z), (10.5, 20.5, 30.5));
    assert_eq!(pos.dimension_id, Dimension::NETHER.id);
    assert_eq!(world.saves(), 1);

    let player = session.local_player().expect("player marker");
    assert_eq!((player.x, player.y, player.z), (10, 20, 30));
    assert_eq!(player.dimension, Dimension::NETHER);
    assert!(session.store().is_static(player));

    let notices = session.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].to_string(), "Teleported player to 10;20;30 [Nether] (Home)");
}

#[test]
fn test_failed_save_changes_nothing() {
    let world = MemoryWorld::new().with_local_player(0.5, 64.0, 0.5, 0);
    let mut session = session(&world);
    let before = stored_record(&world);
    let player_before = session.local_player().cloned().expect("player marker");

    world.set_fail_saves(true);
    session
        .on_marker_tap(&home(Dimension::OVERWORLD), MarkerTapAction::TeleportLocalPlayer)
        .expect("queued");
    assert!(session.settle(TIMEOUT));

    assert_eq!(stored_record(&world), before);
    assert_eq!(session.local_player(), Some(&player_before));
    assert!(session.store().contains(&player_before));

    let notices = session.take_notices();
    assert_eq!(notices.len(), 1);
    assert!(matches!(
        notices[0],
        Notice::TeleportFailed(MapError::Persistence(StorageError::Io(_)))
    ));
    assert_eq!(notices[0].to_string(), "Failed teleporting player");
}

#[test]
fn test_short_position_list_is_rejected() {
    let record = Tag::compound()
        .with("Pos", Tag::float_list(&[1.0, 2.0]))
        .with("DimensionId", Tag::Int(0));
    let world = MemoryWorld::new().with_player(EntityRef::LocalPlayer, record.clone());
    let mut session = session(&world);
    assert!(session.local_player().is_none());

    let camera = session.camera();
    session
        .on_long_press(
            camera.width / 2.0,
            camera.height / 2.0,
            LongPressAction::TeleportLocalPlayer { y_input: "80".into() },
        )
        .expect("queued");
    assert!(session.settle(TIMEOUT));

    assert_eq!(stored_record(&world), record);
    assert_eq!(world.saves(), 0);

    let notices = session.take_notices();
    assert_eq!(notices.len(), 1);
    assert!(matches!(
        notices[0],
        Notice::PlayerDataUnavailable(MapError::Validation(TagError::WrongLength { expected: 3, found: 2, .. }))
    ));
    assert_eq!(notices[0].to_string(), "Failed to find or edit local player data");
}

#[test]
fn test_long_press_teleport_uses_exact_position() {
    let world = MemoryWorld::new().with_local_player(1.5, 64.0, -2.5, 0);
    let mut session = session(&world);
    let camera = session.camera();
    let pressed = session.pressed_position(camera.width / 2.0, camera.height / 2.0);

    session
        .on_long_press(
            camera.width / 2.0,
            camera.height / 2.0,
            LongPressAction::TeleportLocalPlayer { y_input: " 80.25 ".into() },
        )
        .expect("queued");
    assert!(session.settle(TIMEOUT));

    let pos = stored_position(&world);
    assert!((f64::from(pos.x) - pressed.world.x).abs() < 1e-3);
    assert!((f64::from(pos.z) - pressed.world.z).abs() < 1e-3);
    assert_eq!(pos.y, 80.25);

    let notices = session.take_notices();
    assert!(matches!(notices[..], [Notice::Teleported { label: None, .. }]));
}

#[test]
fn test_unparseable_height_uses_default() {
    let world = MemoryWorld::new().with_local_player(0.0, 100.0, 0.0, 0);
    let mut session = session(&world);
    let camera = session.camera();

    session
        .on_long_press(
            camera.width / 2.0,
            camera.height / 2.0,
            LongPressAction::TeleportLocalPlayer { y_input: "high".into() },
        )
        .expect("queued");
    assert!(session.settle(TIMEOUT));

    let pos = stored_position(&world);
    assert_eq!(pos.y, session.config().default_marker_y as f32);
}

#[test]
fn test_missing_player_reports_failure() {
    let world = MemoryWorld::new()
        .with_player(EntityRef::NetworkPlayer("alex".into()), player_record(0.0, 64.0, 0.0, 0));
    let mut session = session(&world);

    session
        .on_marker_tap(&home(Dimension::OVERWORLD), MarkerTapAction::TeleportLocalPlayer)
        .expect("queued");
    assert!(session.settle(TIMEOUT));

    assert_eq!(
        session.take_notices(),
        vec![Notice::TeleportFailed(MapError::NotFound("local player".into()))]
    );
}

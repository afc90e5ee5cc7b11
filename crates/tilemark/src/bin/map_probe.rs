//! # Map Probe
//!
//! Opens a map over an in-memory world, scatters markers, runs a teleport
//! and logs every step. Useful for watching culling and filter behavior
//! with different configurations.
//!
//! ## Usage
//!
//! ```bash
//! TILEMARK_LOG=debug map_probe --config map.toml --markers 500
//! ```

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use tilemark::{
    BlockPos, ChunkDataKind, HeadlessCanvas, LongPressAction, MapConfig, MapSession,
    MarkerTapAction, MemoryContext, MemoryMarkerBook, MemoryWorld,
};
use tilemark_markers::Marker;
use tilemark_shared::{ChunkCoord, Dimension, DimensionRegistry, IconCatalog};
use tilemark_tags::Tag;
use tracing::{error, info, warn};

const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

fn install_tracing() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_env("TILEMARK_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}

fn main() -> ExitCode {
    install_tracing();

    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut marker_count = 200usize;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--markers" | "-m" => {
                if i + 1 < args.len() {
                    marker_count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Usage: map_probe [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <FILE>     Map configuration (TOML)");
                println!("  -m, --markers <NUM>     Procedural markers to scatter (default: 200)");
                println!("  -h, --help              Show this help");
                return ExitCode::SUCCESS;
            }
            other => warn!(argument = other, "ignoring unknown argument"),
        }
        i += 1;
    }

    let config = match config_path {
        Some(path) => match MapConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                error!(%err, path = path.as_str(), "failed to load configuration");
                return ExitCode::FAILURE;
            }
        },
        None => MapConfig::default(),
    };

    run(config, marker_count);
    ExitCode::SUCCESS
}

fn run(config: MapConfig, marker_count: usize) {
    let chest = Tag::compound()
        .with("id", Tag::String("Chest".into()))
        .with("x", Tag::Int(3))
        .with("y", Tag::Int(64))
        .with("z", Tag::Int(5));
    let world = MemoryWorld::new()
        .with_local_player(12.4, 70.0, -8.6, Dimension::OVERWORLD.id)
        .with_spawn(BlockPos::new(0, 64, 0))
        .with_chunk_tags(
            ChunkCoord::new(0, 0),
            Dimension::OVERWORLD,
            ChunkDataKind::BlockEntity,
            vec![chest],
        );

    let icons = IconCatalog::builtin();
    let mut session = MapSession::new(
        config,
        DimensionRegistry::builtin(),
        &icons,
        MemoryContext::default(),
        Arc::new(world.clone()),
        MemoryMarkerBook::new(),
        HeadlessCanvas::new(),
    );
    session.open();

    // Deterministic scatter over a square much larger than the screen.
    let kinds: Vec<_> = icons.iter().map(|icon| Arc::clone(&icon.provider)).collect();
    for n in 0..marker_count {
        let step = n as i64;
        let x = ((step * 7_919) % 4_001 - 2_000) as i32;
        let z = ((step * 104_729) % 4_001 - 2_000) as i32;
        let icon = Arc::clone(&kinds[n % kinds.len()]);
        session.add_marker(Marker::new(x, 64, z, Dimension::OVERWORLD, icon, false));
    }
    if !session.settle(SETTLE_TIMEOUT) {
        warn!(outstanding = session.outstanding(), "worker did not settle");
    }
    info!(
        procedural = session.store().procedural_len(),
        statics = session.store().static_len(),
        visible = session.canvas().visible_count(),
        "markers placed"
    );

    if let Some(spawn) = session.spawn_marker().cloned() {
        if session.on_marker_tap(&spawn, MarkerTapAction::TeleportLocalPlayer).is_ok() {
            session.settle(SETTLE_TIMEOUT);
        }
    }

    let camera = session.camera();
    let create = LongPressAction::CreateMarker {
        name: "Base".into(),
        icon: "blue_marker".into(),
        x: "100".into(),
        y: "64".into(),
        z: "-40".into(),
    };
    if let Err(err) = session.on_long_press(camera.width / 2.0, camera.height / 2.0, create) {
        warn!(%err, "creating marker failed");
    }
    if let Err(err) = session.on_long_press(
        camera.width / 2.0,
        camera.height / 2.0,
        LongPressAction::OpenChunkBlockEntities,
    ) {
        warn!(%err, "opening chunk data failed");
    }
    session.settle(SETTLE_TIMEOUT);

    for notice in session.take_notices() {
        if notice.is_error() {
            warn!(%notice, "notice");
        } else {
            info!(%notice, "notice");
        }
    }
    for (title, tags) in &session.world().opened_editors {
        info!(title = title.as_str(), tags = tags.len(), "tag editor opened");
    }
    info!(saves = world.saves(), "player record saves");
    session.close();
}

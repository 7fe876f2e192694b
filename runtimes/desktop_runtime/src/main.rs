// Desktop Runtime - headless tour driver for testing and automation
//
// Runs the navigation engine without a renderer: the camera is scripted to
// aim at a chosen target, ticks are stepped at a fixed frame interval, and
// every engine event is logged. Useful for validating tour declarations and
// timing behavior from the command line.

use anyhow::{anyhow, Context};
use cgmath::vec2;
use clap::Parser;
use std::time::Duration;
use tracing::{info, warn};

use galleryvr::{
    CameraPose, FrameInput, LoadStatus, NavEvent, RoomContentLoader, SessionController, Time,
    TourConfig,
};

#[derive(Parser)]
#[command(name = "desktop_runtime")]
#[command(about = "Headless tour runtime for testing and automation")]
struct Args {
    /// Tour declaration to load (JSON); omit for the built-in sample tour
    #[arg(short, long)]
    tour: Option<String>,

    /// Target to aim the scripted camera at (defaults to the first target
    /// of the start room)
    #[arg(short, long)]
    aim: Option<String>,

    /// Confirm with a pointer click on the second tick instead of dwelling
    #[arg(long)]
    click: bool,

    /// Number of ticks to simulate
    #[arg(long, default_value = "400")]
    ticks: u32,

    /// Milliseconds per simulated tick
    #[arg(long, default_value = "16.0")]
    frame_ms: f64,
}

/// Content loader that mounts instantly and logs every call, standing in
/// for a real asset pipeline.
#[derive(Default)]
struct LoggingLoader;

impl RoomContentLoader for LoggingLoader {
    fn begin_mount(&mut self, room: &str) {
        info!("Mounting content for room '{}'", room);
    }

    fn poll_mount(&mut self, _room: &str) -> LoadStatus {
        LoadStatus::Ready
    }

    fn unmount(&mut self, room: &str) {
        info!("Unmounting content for room '{}'", room);
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "desktop_runtime=info,galleryvr=info".into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.tour {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading tour file '{}'", path))?;
            TourConfig::from_json(&text)?
        }
        None => sample_tour(),
    };

    let mut session = SessionController::new(&config, LoggingLoader)?;
    for issue in session.graph().issues() {
        warn!("Tour issue: {}", issue);
    }

    let aim_name = match args.aim {
        Some(name) => name,
        None => first_target_name(&session)?,
    };
    info!(
        "Simulating {} ticks aiming at '{}' ({} confirmation)",
        args.ticks,
        aim_name,
        if args.click { "click" } else { "dwell" }
    );

    for tick in 0..args.ticks {
        let total_ms = tick as f64 * args.frame_ms;
        let time = Time::new(
            Duration::from_secs_f64(total_ms / 1000.0),
            Duration::from_secs_f64(args.frame_ms / 1000.0),
        );

        let frame = match aim_position(&session, &aim_name) {
            Some(position) => {
                let camera = CameraPose::facing(session.viewpoint(), position);
                let frame = FrameInput::with_camera(camera);
                if args.click && tick == 1 {
                    frame.click(vec2(0.0, 0.0))
                } else {
                    frame
                }
            }
            // Target not present in the current room (e.g. after a switch)
            None => FrameInput::idle(),
        };

        for event in session.update(&time, &frame) {
            log_event(total_ms, &event);
        }
    }

    let end = session.viewpoint();
    info!(
        "Finished in room '{}' at ({:.2}, {:.2}, {:.2}), active target: {}",
        session.current_room(),
        end.x,
        end.y,
        end.z,
        session.active_target().unwrap_or("none")
    );
    Ok(())
}

fn first_target_name(session: &SessionController<LoggingLoader>) -> anyhow::Result<String> {
    session
        .graph()
        .room(session.current_room())
        .and_then(|room| room.targets().first())
        .map(|target| target.name().to_string())
        .ok_or_else(|| anyhow!("start room has no targets to aim at"))
}

fn aim_position(
    session: &SessionController<LoggingLoader>,
    name: &str,
) -> Option<cgmath::Vector3<f32>> {
    session.registry().find(name).map(|target| target.position())
}

fn log_event(total_ms: f64, event: &NavEvent) {
    match event {
        NavEvent::DwellProgress { target, progress } => {
            // One line every ~10% keeps the log readable
            if (progress * 10.0).fract() < 0.05 {
                info!("[{:7.0}ms] dwell {:>3.0}% on '{}'", total_ms, progress * 100.0, target);
            }
        }
        other => info!("[{:7.0}ms] {:?}", total_ms, other),
    }
}

fn sample_tour() -> TourConfig {
    TourConfig::from_json(
        r#"{
            "start_room": "Gallery",
            "rooms": [
                {
                    "name": "Gallery",
                    "content": "models/gallery.glb",
                    "entry_position": [0.0, 1.6, 4.0],
                    "targets": [
                        { "name": "Entrance", "label": "Entrance", "position": [-1.34, 1.6, 5.23] },
                        { "name": "CentralHall", "label": "Central Hall", "position": [1.54, 1.6, 10.0] },
                        {
                            "name": "SideWingDoor",
                            "label": "Side Wing",
                            "position": [-6.77, 1.6, 3.64],
                            "changes_room": true,
                            "destination_room": "SideWing"
                        }
                    ]
                },
                {
                    "name": "SideWing",
                    "content": "models/side_wing.glb",
                    "entry_position": [0.0, 1.6, -2.0],
                    "targets": [
                        {
                            "name": "GalleryDoor",
                            "label": "Main Gallery",
                            "position": [3.0, 1.6, 0.0],
                            "changes_room": true,
                            "destination_room": "Gallery"
                        }
                    ]
                }
            ]
        }"#,
    )
    .expect("built-in sample tour is valid")
}

//! Headless run of a scripted climb through the demo level
//!
//! Usage: `summit [game.toml] [level.ron]`

use platform_engine::events::EventHandler;
use platform_engine::foundation::logging;
use summit::cues::Cue;
use summit::input::InputFrame;
use summit::simulation::Simulation;

const DEFAULT_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/game.toml");
const DEFAULT_LEVEL: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/levels/demo.ron");

/// Logs gameplay milestones at info and everything else at trace
struct CueLogger;

impl EventHandler<Cue> for CueLogger {
    fn on_event(&mut self, cue: &Cue) -> bool {
        match cue {
            Cue::Play(event) => log::info!("{:?}", event),
            Cue::Touch(event) => log::debug!("{:?}", event),
            other => log::trace!("{:?}", other),
        }
        false
    }
}

/// Inputs held for a number of ticks
fn script() -> Vec<(InputFrame, u32)> {
    let right = InputFrame::idle().with_axes(1.0, 0.0);
    vec![
        (InputFrame::idle(), 30),
        (right, 20),
        (right.with_jump(), 12),
        (right, 30),
        (InputFrame::idle().with_axes(1.0, 1.0).with_dash(), 1),
        (right, 40),
        (right.with_jump(), 10),
        (right.with_climb(), 30),
        (InputFrame::idle().with_axes(0.0, 1.0).with_climb(), 30),
        (right, 120),
    ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_default("info");

    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let level_path = args.next().unwrap_or_else(|| DEFAULT_LEVEL.to_string());
    log::info!("Loading {} and {}", config_path, level_path);

    let mut sim = Simulation::from_files(&config_path, &level_path)?;
    sim.register_cue_handler(Box::new(CueLogger));

    let step = sim.config().simulation.fixed_timestep;
    let mut ticks = 0u32;
    for (input, count) in script() {
        for _ in 0..count {
            sim.tick(input, step)?;
            sim.dispatch_cues();
            ticks += 1;
        }
    }

    let position = sim.player_position();
    let progress = sim.level().progress();
    log::info!(
        "Finished after {} ticks ({:.2}s simulated): scene {}, player at ({:.2}, {:.2}), {} deaths, {} strawberries",
        ticks,
        sim.clock().total_time(),
        progress.scene,
        position.x,
        position.y,
        progress.deaths,
        progress.strawberry_count()
    );
    Ok(())
}

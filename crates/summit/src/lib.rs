//! # Summit
//!
//! Mountain-climbing platformer gameplay on top of `platform_engine`.
//!
//! - [`player`]: the movement state machine (run, jump, dash, climb)
//! - [`level`]: scenes built from tilemaps, tile behavior and the save slot
//! - [`simulation`]: one fixed tick tying player, level and physics together
//! - [`cues`]: what gameplay reports to animation, audio, haptics and camera
//!
//! ```no_run
//! use summit::input::InputFrame;
//! use summit::simulation::Simulation;
//!
//! # fn main() -> Result<(), summit::simulation::SimulationError> {
//! let mut sim = Simulation::from_files("assets/game.toml", "assets/levels/demo.ron")?;
//! let step = sim.config().simulation.fixed_timestep;
//! sim.tick(InputFrame::idle().with_axes(1.0, 0.0), step)?;
//! for cue in sim.drain_cues() {
//!     println!("{cue:?}");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod cues;
pub mod input;
pub mod level;
pub mod player;
pub mod simulation;

#[cfg(test)]
mod tests;

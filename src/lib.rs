//! Core engine for small 2D tile-based maze games: procedural maze
//! generation, ray-cast visibility/lighting, collision geometry, and
//! headless game sessions for the single-player dark-maze game, the
//! two-player race variant, and the companion level editor.
//!
//! Rendering, input polling, and window setup are the caller's concern;
//! this crate only produces the data those layers consume (wall geometry,
//! visibility polygons, snapshots) and persists authored levels and
//! player progress as flat JSON files.

pub mod constants;
pub mod editor;
pub mod engine;
pub mod geometry;
pub mod level;
pub mod lighting;
pub mod maze;
pub mod progress;
pub mod rng;
pub mod types;

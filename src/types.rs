//! Shared data types and the serializable views handed to frontends.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Tile codes as stored in level files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Wall,
    Start,
    End,
    Flashlight,
}

impl Tile {
    pub fn from_code(code: u8) -> Option<Tile> {
        match code {
            0 => Some(Tile::Empty),
            1 => Some(Tile::Wall),
            2 => Some(Tile::Start),
            3 => Some(Tile::End),
            4 => Some(Tile::Flashlight),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Tile::Empty => 0,
            Tile::Wall => 1,
            Tile::Start => 2,
            Tile::End => 3,
            Tile::Flashlight => 4,
        }
    }

    pub fn is_solid(self) -> bool {
        self == Tile::Wall
    }
}

/// Per-tick input for one player. Axes are -1, 0 or 1.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct MoveIntent {
    pub dx: i8,
    pub dy: i8,
}

impl MoveIntent {
    pub fn new(dx: i8, dy: i8) -> Self {
        Self {
            dx: dx.signum(),
            dy: dy.signum(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    pub fn is_diagonal(&self) -> bool {
        self.dx != 0 && self.dy != 0
    }
}

/// A positioned circle of light, fed to the visibility pass.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct LightSource {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

/// Events emitted by the engines, drained on snapshot.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuntimeEvent {
    RacerFinished {
        racer: usize,
        #[serde(rename = "timeMs")]
        time_ms: u64,
    },
    FlashlightCollected {
        row: usize,
        col: usize,
        #[serde(rename = "totalCollected")]
        total_collected: u32,
    },
    LevelCompleted {
        #[serde(rename = "timeMs")]
        time_ms: u64,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct RacerView {
    pub x: f32,
    pub y: f32,
    pub finished: bool,
    #[serde(rename = "finishTimeMs")]
    pub finish_time_ms: Option<u64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RaceSnapshot {
    #[serde(rename = "elapsedMs")]
    pub elapsed_ms: u64,
    pub racers: Vec<RacerView>,
    pub over: bool,
    pub events: Vec<RuntimeEvent>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RaceSummary {
    pub seed: u32,
    pub rows: usize,
    pub cols: usize,
    pub winner: Option<usize>,
    #[serde(rename = "finishTimesMs")]
    pub finish_times_ms: Vec<Option<u64>>,
    #[serde(rename = "elapsedMs")]
    pub elapsed_ms: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct RunSnapshot {
    #[serde(rename = "elapsedMs")]
    pub elapsed_ms: u64,
    pub x: f32,
    pub y: f32,
    #[serde(rename = "flashlights")]
    pub flashlights_collected: u32,
    #[serde(rename = "lightRadius")]
    pub light_radius: f32,
    pub completed: bool,
    pub events: Vec<RuntimeEvent>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    #[serde(rename = "levelName")]
    pub level_name: String,
    pub completed: bool,
    #[serde(rename = "timeMs")]
    pub time_ms: u64,
    #[serde(rename = "flashlights")]
    pub flashlights_collected: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_codes_round_trip() {
        for code in 0u8..5 {
            let tile = Tile::from_code(code).unwrap();
            assert_eq!(tile.code(), code);
        }
        assert!(Tile::from_code(5).is_none());
    }

    #[test]
    fn move_intent_normalizes_axes() {
        let intent = MoveIntent::new(7, -3);
        assert_eq!(intent.dx, 1);
        assert_eq!(intent.dy, -1);
        assert!(intent.is_diagonal());
        assert!(MoveIntent::default().is_idle());
    }

    #[test]
    fn runtime_event_serializes_tagged() {
        let event = RuntimeEvent::RacerFinished {
            racer: 1,
            time_ms: 4200,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"racer_finished\""));
        assert!(json.contains("\"timeMs\":4200"));
    }
}

use serde::{Deserialize, Serialize};

/// Editing-engine direction vocabulary
///
/// The host only knows the six axis-aligned directions. The ordinal ones exist
/// for selection tools and have no host counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
    Up,
    Down,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    pub const ALL: [Direction; 10] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::Up,
        Direction::Down,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    /// Upper-case constant name, e.g. `NORTH`
    pub fn name(&self) -> &'static str {
        match self {
            Direction::North => "NORTH",
            Direction::East => "EAST",
            Direction::South => "SOUTH",
            Direction::West => "WEST",
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::NorthEast => "NORTHEAST",
            Direction::NorthWest => "NORTHWEST",
            Direction::SouthEast => "SOUTHEAST",
            Direction::SouthWest => "SOUTHWEST",
        }
    }

    /// Exact match on the upper-case constant name
    pub fn from_name(name: &str) -> Option<Direction> {
        Self::ALL.iter().copied().find(|d| d.name() == name)
    }

    /// Unit vector (x, y, z); north is -z
    pub fn to_vector(&self) -> (f64, f64, f64) {
        let diag = std::f64::consts::FRAC_1_SQRT_2;
        match self {
            Direction::North => (0.0, 0.0, -1.0),
            Direction::East => (1.0, 0.0, 0.0),
            Direction::South => (0.0, 0.0, 1.0),
            Direction::West => (-1.0, 0.0, 0.0),
            Direction::Up => (0.0, 1.0, 0.0),
            Direction::Down => (0.0, -1.0, 0.0),
            Direction::NorthEast => (diag, 0.0, -diag),
            Direction::NorthWest => (-diag, 0.0, -diag),
            Direction::SouthEast => (diag, 0.0, diag),
            Direction::SouthWest => (-diag, 0.0, diag),
        }
    }

    /// Yaw in degrees, 0 facing south, growing clockwise, in [0, 360)
    pub fn to_yaw(&self) -> f32 {
        let (x, _, z) = self.to_vector();
        let tau = std::f64::consts::TAU;
        let t = (-x).atan2(z);
        ((t + tau) % tau).to_degrees() as f32
    }

    /// Pitch in degrees, negative looking up
    pub fn to_pitch(&self) -> f32 {
        let (x, y, z) = self.to_vector();
        if x == 0.0 && z == 0.0 {
            return if y > 0.0 { -90.0 } else { 90.0 };
        }
        let xz = (x * x + z * z).sqrt();
        (-y / xz).atan().to_degrees() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_name(dir.name()), Some(dir));
        }
        assert_eq!(Direction::from_name("north"), None);
    }

    #[test]
    fn test_yaw_and_pitch() {
        assert_eq!(Direction::South.to_yaw(), 0.0);
        assert!((Direction::West.to_yaw() - 90.0).abs() < 1e-4);
        assert!((Direction::North.to_yaw() - 180.0).abs() < 1e-4);
        assert_eq!(Direction::Up.to_pitch(), -90.0);
        assert_eq!(Direction::Down.to_pitch(), 90.0);
        assert_eq!(Direction::East.to_pitch(), 0.0);
    }
}

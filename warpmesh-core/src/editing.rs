/// Directional nudges for selected vertices
use nalgebra::Vector3;

use crate::events::Key;

/// Discrete nudge direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Arrow keys map to directions; anything else is not a nudge
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Up => Some(Self::Up),
            Key::Down => Some(Self::Down),
            Key::Left => Some(Self::Left),
            Key::Right => Some(Self::Right),
            _ => None,
        }
    }

    /// Displacement for one nudge of size `step`.
    ///
    /// X is horizontal and Y vertical in the screen plane, Z is depth.
    /// The modifier turns Up/Down into a move into/out of the screen and
    /// has no effect on Left/Right.
    pub fn displacement(self, modifier: bool, step: f32) -> Vector3<f32> {
        match (self, modifier) {
            (Self::Up, false) => Vector3::new(0.0, step, 0.0),
            (Self::Up, true) => Vector3::new(0.0, 0.0, -step),
            (Self::Down, false) => Vector3::new(0.0, -step, 0.0),
            (Self::Down, true) => Vector3::new(0.0, 0.0, step),
            (Self::Left, _) => Vector3::new(-step, 0.0, 0.0),
            (Self::Right, _) => Vector3::new(step, 0.0, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_displacement_table() {
        let s = 0.1;
        assert_eq!(Direction::Up.displacement(false, s), Vector3::new(0.0, s, 0.0));
        assert_eq!(Direction::Up.displacement(true, s), Vector3::new(0.0, 0.0, -s));
        assert_eq!(Direction::Down.displacement(false, s), Vector3::new(0.0, -s, 0.0));
        assert_eq!(Direction::Down.displacement(true, s), Vector3::new(0.0, 0.0, s));
        for modifier in [false, true] {
            assert_eq!(Direction::Left.displacement(modifier, s), Vector3::new(-s, 0.0, 0.0));
            assert_eq!(Direction::Right.displacement(modifier, s), Vector3::new(s, 0.0, 0.0));
        }
    }

    #[test]
    fn test_opposites_cancel() {
        for modifier in [false, true] {
            let sum = Direction::Up.displacement(modifier, 0.3)
                + Direction::Down.displacement(modifier, 0.3);
            assert_eq!(sum, Vector3::zeros());
            let sum = Direction::Left.displacement(modifier, 0.3)
                + Direction::Right.displacement(modifier, 0.3);
            assert_eq!(sum, Vector3::zeros());
        }
    }

    #[test]
    fn test_from_key() {
        assert_eq!(Direction::from_key(Key::Left), Some(Direction::Left));
        assert_eq!(Direction::from_key(Key::Char('x')), None);
        assert_eq!(Direction::from_key(Key::Other), None);
    }
}

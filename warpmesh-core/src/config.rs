/// Tunables for picking and nudging
use crate::error::{SelectError, SelectResult};

/// Default distance moved by one directional nudge
pub const DEFAULT_INCREMENT: f32 = 0.1;

/// Selector configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectorConfig {
    /// Magnitude of each directional nudge, in model units
    pub increment: f32,
    /// Select every vertex tied for nearest instead of only the first
    pub select_equidistant: bool,
}

impl SelectorConfig {
    pub fn new(increment: f32, select_equidistant: bool) -> SelectResult<Self> {
        let config = Self {
            increment,
            select_equidistant,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SelectResult<()> {
        validate_increment(self.increment)
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            increment: DEFAULT_INCREMENT,
            select_equidistant: true,
        }
    }
}

pub(crate) fn validate_increment(increment: f32) -> SelectResult<()> {
    if increment.is_finite() && increment > 0.0 {
        Ok(())
    } else {
        Err(SelectError::InvalidIncrement(increment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SelectorConfig::default();
        assert!((config.increment - 0.1).abs() < 1e-6);
        assert!(config.select_equidistant);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_increments() {
        for bad in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(SelectorConfig::new(bad, true).is_err());
        }
        assert!(SelectorConfig::new(0.25, false).is_ok());
    }
}

//! Fill color for redaction marks.

use crate::error::{RedactorError, RedactorResult};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// RGB fill color with each component in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FillColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl FillColor {
    pub const BLACK: FillColor = FillColor {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub const WHITE: FillColor = FillColor {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Creates a color, rejecting components outside `[0, 1]`.
    pub fn new(r: f32, g: f32, b: f32) -> RedactorResult<Self> {
        for (name, value) in [("red", r), ("green", g), ("blue", b)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(RedactorError::InvalidColor {
                    value: format!("{},{},{}", r, g, b),
                    reason: format!("{} component {} is outside 0-1", name, value),
                });
            }
        }
        Ok(Self { r, g, b })
    }

    pub fn is_black(&self) -> bool {
        *self == Self::BLACK
    }

    pub fn components(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for FillColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for FillColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_black() {
            f.write_str("black")
        } else if *self == Self::WHITE {
            f.write_str("white")
        } else {
            write!(f, "{},{},{}", self.r, self.g, self.b)
        }
    }
}

/// Parses `black`, `white` or an `R,G,B` triple.
impl FromStr for FillColor {
    type Err = RedactorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        match value.to_ascii_lowercase().as_str() {
            "black" => return Ok(Self::BLACK),
            "white" => return Ok(Self::WHITE),
            _ => {}
        }

        let invalid = |reason: &str| RedactorError::InvalidColor {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = value.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(invalid("expected 'black', 'white' or R,G,B"));
        }

        let mut rgb = [0.0f32; 3];
        for (slot, part) in rgb.iter_mut().zip(&parts) {
            *slot = part
                .parse::<f32>()
                .map_err(|_| invalid("components must be numbers between 0 and 1"))?;
        }

        Self::new(rgb[0], rgb[1], rgb[2]).map_err(|e| match e {
            RedactorError::InvalidColor { reason, .. } => invalid(&reason),
            other => other,
        })
    }
}

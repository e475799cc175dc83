use serde::{Deserialize, Serialize};

use super::containment::{ContainmentMode, PlanarFrame};
use super::error::{ConfigWarning, Result, SwarmError, require_non_negative};

/// Global simulation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Hard upper bound on every agent's speed, applied each step.
    pub max_speed: f32,
    /// Rate (per second) at which headings turn toward the velocity.
    /// Zero disables heading smoothing.
    pub heading_smoothing: f32,
    /// Containment policy.
    pub containment: ContainmentMode,
    /// Plane used by [`ContainmentMode::Planar`].
    pub planar_frame: Option<PlanarFrame>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_speed: 10.0,
            heading_smoothing: 5.0,
            containment: ContainmentMode::Volumetric,
            planar_frame: None,
        }
    }
}

impl Params {
    /// Parameters for planar containment on `frame`.
    pub fn planar(frame: PlanarFrame) -> Self {
        Self {
            containment: ContainmentMode::Planar,
            planar_frame: Some(frame),
            ..Self::default()
        }
    }

    /// The plane agents are confined to, if planar containment is in effect.
    ///
    /// Planar mode without a frame behaves as volumetric.
    pub fn active_plane(&self) -> Option<&PlanarFrame> {
        match self.containment {
            ContainmentMode::Planar => self.planar_frame.as_ref(),
            ContainmentMode::Volumetric => None,
        }
    }

    /// Rejects values that would break the step's numeric guarantees.
    pub fn validate(&self) -> Result<()> {
        require_non_negative("max_speed", self.max_speed)?;
        require_non_negative("heading_smoothing", self.heading_smoothing)?;
        if let Some(frame) = &self.planar_frame {
            if !frame.size.is_finite() || frame.size.min_element() < 0.0 {
                return Err(SwarmError::InvalidParams {
                    name: "planar_frame.size",
                    reason: format!("must be finite and non-negative, got {}", frame.size),
                });
            }
        }
        Ok(())
    }

    /// Non-fatal problems with these parameters.
    pub fn warnings(&self) -> Vec<ConfigWarning> {
        if self.containment == ContainmentMode::Planar && self.planar_frame.is_none() {
            vec![ConfigWarning::PlanarFrameMissing]
        } else {
            Vec::new()
        }
    }
}

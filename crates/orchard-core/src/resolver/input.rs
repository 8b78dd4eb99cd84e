//! Touch input rules.
//!
//! - Two `Began` taps less than `double_tap_delay` apart jump, if grounded
//! - A `Stationary` hold runs towards the touched half of the screen

use glam::Vec2;
use tracing::debug;

use crate::event::{TapEvent, TapPhase};
use crate::output::{Facing, MovementCommand};

use super::PlayerStateResolver;

/// Detects double taps from a stream of `Began` timestamps.
///
/// Every registered tap becomes the reference for the next one, so three quick
/// taps count as two double taps.
///
/// # Example
///
/// ```
/// use orchard_core::resolver::DoubleTapDetector;
///
/// let mut taps = DoubleTapDetector::new(0.3);
/// assert!(!taps.register(0.0));
/// assert!(taps.register(0.2));
/// assert!(!taps.register(0.6));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DoubleTapDetector {
    delay: f32,
    last_tap: Option<f32>,
}

impl DoubleTapDetector {
    /// Creates a detector with the given window, in seconds.
    #[must_use]
    pub const fn new(delay: f32) -> Self {
        Self {
            delay,
            last_tap: None,
        }
    }

    /// Records a tap and returns `true` if it completes a double tap.
    pub fn register(&mut self, timestamp: f32) -> bool {
        let is_double = self
            .last_tap
            .is_some_and(|last| (0.0..self.delay).contains(&(timestamp - last)));
        self.last_tap = Some(timestamp);
        is_double
    }

    /// Forgets the previous tap.
    pub fn reset(&mut self) {
        self.last_tap = None;
    }
}

/// Side of the screen a touch at `screen_x` points to.
pub(crate) fn run_direction(screen_x: f32, screen_width: f32) -> Facing {
    if screen_x > screen_width / 2.0 {
        Facing::Right
    } else {
        Facing::Left
    }
}

impl PlayerStateResolver {
    pub(super) fn resolve_tap(&mut self, event: TapEvent) -> Option<MovementCommand> {
        match event.phase {
            TapPhase::Began => {
                if !self.taps.register(event.timestamp) {
                    return None;
                }
                if !self.state.is_grounded {
                    debug!(at = event.timestamp, "double tap while airborne");
                    return None;
                }
                debug!(at = event.timestamp, "jump");
                Some(MovementCommand::Jump {
                    velocity: Vec2::new(self.state.velocity.x, self.tuning.jump_force),
                })
            }
            TapPhase::Stationary => {
                let facing = run_direction(event.screen_x, self.tuning.screen_width);
                Some(MovementCommand::Run {
                    velocity: Vec2::new(facing.sign() * self.tuning.speed, self.state.velocity.y),
                    facing,
                })
            }
        }
    }
}

//! Per-tick advancement along a waypoint route.
//!
//! Motion is purely index-and-fraction based: every segment takes the same
//! number of ticks regardless of its length, and positions are interpolated
//! linearly in degree space.  Displayed vehicle speed plays no part.

use bt_core::config::ARRIVAL_EPSILON;
use bt_core::{EndPolicy, GeoPoint};

use crate::{Direction, MotionState};

/// Position and heading produced by one tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pose {
    pub location: GeoPoint,
    pub heading:  f64,
}

impl MotionState {
    /// Advance one tick by `step` of a segment.
    ///
    /// Returns `None` without touching the state when it cannot move (fewer
    /// than two waypoints, or an index left out of bounds by corrupt input).
    pub fn advance(&mut self, step: f64, policy: EndPolicy) -> Option<Pose> {
        if !self.is_movable() {
            return None;
        }
        let len = self.route.len();

        let next_index = match self.direction.step_from(self.route_index, len) {
            Some(n) => n,
            None => match policy {
                EndPolicy::PingPong => {
                    self.direction = self.direction.flipped();
                    self.direction.step_from(self.route_index, len)?
                }
                EndPolicy::LoopToStart => return Some(self.restart()),
            },
        };

        let current = self.route[self.route_index];
        let next = self.route[next_index];
        let heading = current.bearing_deg(next);

        self.progress += step;
        if self.progress >= 1.0 - ARRIVAL_EPSILON {
            self.progress = 0.0;
            self.route_index = next_index;
            // Flip on arrival so the reversal is visible in the same tick.
            if policy == EndPolicy::PingPong
                && self.direction.step_from(next_index, len).is_none()
            {
                self.direction = self.direction.flipped();
            }
            return Some(Pose { location: next, heading });
        }

        Some(Pose {
            location: current.lerp(next, self.progress),
            heading,
        })
    }

    /// Snap back to the first waypoint, facing the second.
    fn restart(&mut self) -> Pose {
        self.route_index = 0;
        self.direction = Direction::Forward;
        self.progress = 0.0;
        Pose {
            location: self.route[0],
            heading:  self.route[0].bearing_deg(self.route[1]),
        }
    }
}

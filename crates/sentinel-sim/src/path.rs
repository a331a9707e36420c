//! Ordered waypoint route shared by every unit of a level.

use glam::Vec2;

/// Immutable list of waypoints. Always holds at least one point.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    waypoints: Vec<Vec2>,
}

impl Path {
    /// Returns `None` for an empty list.
    pub fn new(waypoints: Vec<Vec2>) -> Option<Self> {
        if waypoints.is_empty() {
            None
        } else {
            Some(Self { waypoints })
        }
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Vec2> {
        self.waypoints.get(index).copied()
    }

    /// Where units enter.
    pub fn start(&self) -> Vec2 {
        self.waypoints[0]
    }

    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    /// Sum of segment lengths.
    pub fn total_length(&self) -> f32 {
        self.waypoints
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum()
    }
}

use serde::{Deserialize, Serialize};

/// A position on the walkable surface, in world units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
}

impl WorldPoint {
    pub const ZERO: WorldPoint = WorldPoint { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        WorldPoint { x, y }
    }

    /// Calculate Euclidean distance squared (avoid sqrt for performance)
    pub fn distance_squared(&self, other: &WorldPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &WorldPoint) -> f32 {
        self.distance_squared(other).sqrt()
    }
}

/// Total polyline length of a waypoint sequence starting at `from`
pub fn path_length(from: WorldPoint, waypoints: &[WorldPoint]) -> f32 {
    let mut total = 0.0;
    let mut previous = from;
    for point in waypoints {
        total += previous.distance(point);
        previous = *point;
    }
    total
}

/// Format waypoints for display
pub fn format_waypoints(waypoints: &[WorldPoint]) -> String {
    if waypoints.is_empty() {
        return "No path".to_string();
    }

    let mut result = String::new();
    for (i, point) in waypoints.iter().enumerate() {
        if i > 0 {
            result.push_str(" -> ");
        }
        result.push_str(&format!("({:.2},{:.2})", point.x, point.y));
    }
    result
}

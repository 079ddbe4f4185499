//! Route progress and partial polylines

use crate::core::types::{Date, LatLng, Year};
use crate::data::MigrationRoute;

/// Fractional remainders at or below this are treated as a segment boundary
const SEGMENT_EPSILON: f64 = 1e-9;

/// Completion of a `[start, end]` window at `date`, clamped to [0, 1].
///
/// Zero-length and reversed windows jump straight from 0 to 1 at `start`.
pub fn window_progress(start: Year, end: Year, date: Date) -> f64 {
    let start = start as f64;
    let end = end as f64;
    if date < start {
        return 0.0;
    }
    if end <= start {
        return 1.0;
    }
    ((date - start) / (end - start)).clamp(0.0, 1.0)
}

/// Completion of a migration at `date`
pub fn route_progress(route: &MigrationRoute, date: Date) -> f64 {
    window_progress(route.start, route.end, date)
}

/// Drawing state of a route at a given date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutePhase {
    /// Not started; nothing is drawn
    Pending,
    /// Growing along its path with a leading arrowhead
    Active,
    /// Fully drawn with an end arrowhead and branch label
    Complete,
}

impl RoutePhase {
    pub fn at(route: &MigrationRoute, date: Date) -> Self {
        if date < route.start as f64 {
            RoutePhase::Pending
        } else if route.is_degenerate() || date >= route.end as f64 {
            RoutePhase::Complete
        } else {
            RoutePhase::Active
        }
    }
}

/// Prefix of `path` covering `progress` of its segments.
///
/// Waypoints up to `floor(progress * segments)` are kept; when the index
/// falls inside a segment the interpolated point is appended. Exactly on a
/// waypoint nothing extra is appended. `progress <= 0` yields the first
/// waypoint alone, which is not drawable.
pub fn partial_path(path: &[LatLng], progress: f64) -> Vec<LatLng> {
    if path.len() < 2 || progress <= 0.0 {
        return path.first().copied().into_iter().collect();
    }
    if progress >= 1.0 {
        return path.to_vec();
    }

    let segments = path.len() - 1;
    let exact = progress * segments as f64;
    let index = (exact.floor() as usize).min(segments);
    let remainder = exact - index as f64;

    let mut result = path[..=index].to_vec();
    if index < segments && remainder > SEGMENT_EPSILON {
        result.push(path[index].lerp(path[index + 1], remainder));
    }
    result
}

/// Compass bearing of the last segment of a polyline, 0 if too short
pub fn tip_bearing(path: &[LatLng]) -> f64 {
    match path {
        [.., prev, tip] => prev.bearing_to(*tip),
        _ => 0.0,
    }
}

/// Visible portion of a route at `date`, `None` when nothing should be drawn
pub fn visible_path(route: &MigrationRoute, date: Date) -> Option<Vec<LatLng>> {
    let path = match RoutePhase::at(route, date) {
        RoutePhase::Pending => return None,
        RoutePhase::Complete => route.path.clone(),
        RoutePhase::Active => partial_path(&route.path, route_progress(route, date)),
    };
    (path.len() >= 2).then_some(path)
}

//! Temporal migration map engine
//!
//! Given a scalar date, decides which cultures and routes are on the map and
//! how far each route has travelled, and drives the play/seek transport.

pub mod progress;
pub mod projection;
pub mod scene;
pub mod selection;
pub mod transport;
pub mod view;
pub mod visibility;

pub use progress::{partial_path, route_progress, tip_bearing, visible_path, RoutePhase};
pub use projection::MapViewport;
pub use scene::{Legend, MapScene, RouteState};
pub use selection::{CultureDetails, MapSelection, MapTarget, Popup, RouteDetails};
pub use transport::{FrameOutcome, PlaybackSpeed, Transport, TransportState};
pub use view::MigrationMapView;
pub use visibility::{is_culture_visible, territory_opacity, visible_cultures};

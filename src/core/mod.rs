pub mod config;
pub mod error;
pub mod types;

pub use config::{config, set_config, AtlasConfig};
pub use error::{AtlasError, Result};
pub use types::{bce_label, bce_range, Date, LatLng, Year};

pub mod entry;
pub mod error;
pub mod mgrs;
pub mod parser;
pub mod policy;
pub mod position;
pub mod repository;
pub mod waypoint;

pub use entry::entry_string;
pub use error::{NavError, Result};
pub use mgrs::MgrsGrid;
pub use parser::{CoordinateFormat, ParsedCoordinate, parse};
pub use policy::{OutputFormat, ZoneBugPolicy, ZonePolicy};
pub use position::GeoPosition;
pub use repository::{WaypointRepository, default_database_path};
pub use waypoint::Waypoint;

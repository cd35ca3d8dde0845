pub mod flight;
pub mod geopoint;
pub mod proximity;
pub mod route;
pub mod store;
pub mod swim;

pub use flight::{Flight, FlightSource};
pub use geopoint::{Category, Coord, Geopoint};
pub use route::{ResolvedWaypoint, RouteError, RouteResolver};
pub use store::{GeopointCache, GeopointSource, GeopointStore, LoadReport};
pub use swim::SwimClient;

pub mod polyline;
pub mod stroke_geometry;

pub use polyline::{angle_of, farthest_from, path_length, to_screen};
pub use stroke_geometry::StrokeGeometry;

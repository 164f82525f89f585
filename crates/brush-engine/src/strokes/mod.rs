pub mod extract;
pub mod library;
pub mod model;
pub mod source;

pub use extract::{extract, parse_svg_path, Extracted, PointSource};
pub use library::StrokeLibrary;
pub use model::{CharacterStrokeModel, Stroke};
pub use source::{CachedStroke, RawCharData, RawCharacter, RawPoint, RawStroke};

//! Raw stroke data as it arrives from the loader, before normalization.
//!
//! Upstream caches disagree on shape: a stroke may be a record carrying
//! `medians`, `path` and/or `points`, or a bare SVG path string, and points
//! may be `[x, y]` pairs or `{ "x": .., "y": .. }` objects. Everything here
//! deserializes leniently; [`super::extract`] resolves the shapes into one
//! canonical point list.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// One point in any of the accepted encodings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPoint {
    Pair([f32; 2]),
    Object { x: f32, y: f32 },
}

impl RawPoint {
    pub fn to_vec2(self) -> Vec2 {
        match self {
            Self::Pair([x, y]) => Vec2::new(x, y),
            Self::Object { x, y } => Vec2::new(x, y),
        }
    }
}

impl From<Vec2> for RawPoint {
    fn from(v: Vec2) -> Self {
        Self::Object { x: v.x, y: v.y }
    }
}

/// A single reference stroke in its raw form. At least one field is
/// expected to be populated; a stroke with none is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawStrokeRepr")]
pub struct RawStroke {
    /// Dense median line through the stroke.
    pub medians: Option<Vec<RawPoint>>,
    /// SVG-like path using `M`/`L` commands.
    pub path: Option<String>,
    /// Generic point list.
    pub points: Option<Vec<RawPoint>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStrokeRepr {
    Path(String),
    Record {
        #[serde(default)]
        medians: Option<Vec<RawPoint>>,
        #[serde(default)]
        path: Option<String>,
        #[serde(default)]
        points: Option<Vec<RawPoint>>,
    },
}

impl From<RawStrokeRepr> for RawStroke {
    fn from(repr: RawStrokeRepr) -> Self {
        match repr {
            RawStrokeRepr::Path(path) => Self {
                path: Some(path),
                ..Self::default()
            },
            RawStrokeRepr::Record { medians, path, points } => Self { medians, path, points },
        }
    }
}

impl RawStroke {
    pub fn is_empty(&self) -> bool {
        self.medians.as_ref().map_or(true, Vec::is_empty)
            && self.path.as_ref().map_or(true, |p| p.trim().is_empty())
            && self.points.as_ref().map_or(true, Vec::is_empty)
    }
}

/// Raw per-character source data. Stroke records and a parallel
/// `medians` table may both be present (hanzi-writer style); they are
/// zipped by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCharData {
    #[serde(default)]
    pub strokes: Vec<RawStroke>,
    #[serde(default)]
    pub medians: Vec<Vec<RawPoint>>,
}

impl RawCharData {
    /// One raw stroke per index, with the parallel median table filled into
    /// any record that has no medians of its own.
    pub fn stroke_sources(&self) -> Vec<RawStroke> {
        let n = self.strokes.len().max(self.medians.len());
        (0..n)
            .map(|i| {
                let mut stroke = self.strokes.get(i).cloned().unwrap_or_default();
                if stroke.medians.as_ref().map_or(true, Vec::is_empty) {
                    if let Some(m) = self.medians.get(i).filter(|m| !m.is_empty()) {
                        stroke.medians = Some(m.clone());
                    }
                }
                stroke
            })
            .collect()
    }
}

/// A stroke record from a precomputed cache. Any field may be missing;
/// missing geometry is backfilled from `raw_data` (or the character's raw
/// data) when the model is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedStroke {
    #[serde(default)]
    pub index: Option<usize>,
    #[serde(default)]
    pub points: Option<Vec<RawPoint>>,
    #[serde(default)]
    pub start_point: Option<RawPoint>,
    #[serde(default)]
    pub end_point: Option<RawPoint>,
    /// Radians.
    #[serde(default)]
    pub angle: Option<f32>,
    #[serde(default)]
    pub angle_degrees: Option<f32>,
    #[serde(default)]
    pub length: Option<f32>,
    #[serde(default)]
    pub distance_to_next: Option<f32>,
    #[serde(default)]
    pub raw_data: Option<RawStroke>,
}

/// Everything known about one character before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCharacter {
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub total_strokes: Option<usize>,
    /// Precomputed stroke records, possibly partial or empty.
    #[serde(default)]
    pub strokes: Vec<CachedStroke>,
    #[serde(default)]
    pub raw_char_data: Option<RawCharData>,
}

impl RawCharacter {
    /// Build from plain raw strokes (no precomputed cache).
    pub fn from_strokes(character: impl Into<String>, strokes: Vec<RawStroke>) -> Self {
        Self {
            character: character.into(),
            total_strokes: None,
            strokes: Vec::new(),
            raw_char_data: Some(RawCharData { strokes, medians: Vec::new() }),
        }
    }

    /// Stroke count: explicit total, else cached records, else raw strokes.
    pub fn stroke_count(&self) -> usize {
        if let Some(n) = self.total_strokes.filter(|&n| n > 0) {
            return n;
        }
        if !self.strokes.is_empty() {
            return self.strokes.len();
        }
        self.raw_char_data
            .as_ref()
            .map_or(0, |raw| raw.strokes.len().max(raw.medians.len()))
    }

    /// Raw source per stroke index, `stroke_count()` entries long. A cache
    /// record's own raw data wins over the character-level raw data.
    pub fn stroke_sources(&self) -> Vec<Option<RawStroke>> {
        let shared = self
            .raw_char_data
            .as_ref()
            .map(RawCharData::stroke_sources)
            .unwrap_or_default();
        (0..self.stroke_count())
            .map(|i| {
                self.strokes
                    .get(i)
                    .and_then(|c| c.raw_data.clone())
                    .or_else(|| shared.get(i).cloned())
                    .filter(|s| !s.is_empty())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_accept_pairs_and_objects() {
        let pts: Vec<RawPoint> = serde_json::from_str(r#"[[1, 2], {"x": 3, "y": 4}]"#).unwrap();
        assert_eq!(pts[0].to_vec2(), Vec2::new(1.0, 2.0));
        assert_eq!(pts[1].to_vec2(), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn stroke_accepts_bare_path_string() {
        let s: RawStroke = serde_json::from_str(r#""M 10 20 L 30 40""#).unwrap();
        assert_eq!(s.path.as_deref(), Some("M 10 20 L 30 40"));
        assert!(s.medians.is_none());
    }

    #[test]
    fn empty_record_is_empty() {
        let s: RawStroke = serde_json::from_str(r#"{ "path": "  ", "points": [] }"#).unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn parallel_medians_fill_records() {
        let raw: RawCharData = serde_json::from_str(
            r#"{ "strokes": ["M 0 0 L 1 1", "M 2 2 L 3 3"], "medians": [[[0, 0], [5, 5]]] }"#,
        )
        .unwrap();
        let sources = raw.stroke_sources();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].medians.as_ref().map(Vec::len), Some(2));
        assert!(sources[1].medians.is_none());
    }

    #[test]
    fn stroke_count_resolution_order() {
        let mut c = RawCharacter::from_strokes("一", vec![RawStroke::default(); 3]);
        assert_eq!(c.stroke_count(), 3);
        c.strokes = vec![CachedStroke::default(); 2];
        assert_eq!(c.stroke_count(), 2);
        c.total_strokes = Some(4);
        assert_eq!(c.stroke_count(), 4);
        c.total_strokes = Some(0);
        assert_eq!(c.stroke_count(), 2);
    }

    #[test]
    fn cache_raw_data_wins_over_shared_sources() {
        let mut c = RawCharacter::from_strokes(
            "二",
            vec![RawStroke { path: Some("M 0 0 L 9 9".into()), ..RawStroke::default() }],
        );
        c.total_strokes = Some(2);
        c.strokes = vec![CachedStroke {
            raw_data: Some(RawStroke { path: Some("M 1 1 L 2 2".into()), ..RawStroke::default() }),
            ..CachedStroke::default()
        }];
        let sources = c.stroke_sources();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].as_ref().and_then(|s| s.path.as_deref()), Some("M 1 1 L 2 2"));
        assert!(sources[1].is_none());
    }

    #[test]
    fn cached_record_parses_camel_case() {
        let json = r#"{
            "index": 0,
            "startPoint": {"x": 1, "y": 2},
            "angleDegrees": 45.0,
            "length": 12.5,
            "distanceToNext": 3.0,
            "rawData": { "medians": [[0, 0], [1, 1]] }
        }"#;
        let c: CachedStroke = serde_json::from_str(json).unwrap();
        assert_eq!(c.start_point.map(RawPoint::to_vec2), Some(Vec2::new(1.0, 2.0)));
        assert_eq!(c.angle_degrees, Some(45.0));
        assert_eq!(c.distance_to_next, Some(3.0));
        assert!(c.raw_data.is_some());
    }
}

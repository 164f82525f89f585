use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::{to_screen, StrokeGeometry};
use super::extract::{extract, PointSource};
use super::source::{CachedStroke, RawCharacter, RawPoint, RawStroke};

/// One reference stroke of a character.
///
/// Geometry fields are optional because upstream caches may carry any
/// subset of them; [`CharacterStrokeModel::backfill`] fills what it can.
/// A stroke without an angle or length is unscoreable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Position in the character's stroke order.
    pub index: usize,
    pub source: Option<PointSource>,
    /// Canonical points (data space).
    pub points: Vec<Vec2>,
    /// `points[0]` (data space).
    pub start_point: Option<Vec2>,
    /// Point farthest from the start (data space).
    pub end_point: Option<Vec2>,
    /// `end - start` in screen space.
    pub direction: Option<Vec2>,
    /// Radians, screen space.
    pub angle: Option<f32>,
    /// Polyline length (data units).
    pub length: Option<f32>,
    /// Gap from this stroke's end to the next stroke's start (data units).
    pub distance_to_next: Option<f32>,
}

impl Stroke {
    /// A stroke with nothing known about it.
    pub fn absent(index: usize) -> Self {
        Self {
            index,
            source: None,
            points: Vec::new(),
            start_point: None,
            end_point: None,
            direction: None,
            angle: None,
            length: None,
            distance_to_next: None,
        }
    }

    /// Derive a stroke from its raw source. Pure: the same input always
    /// produces the same record.
    pub fn derive(index: usize, raw: &RawStroke, reference_height: f32) -> Self {
        match extract(raw) {
            Some(e) => Self::from_points(index, e.points, Some(e.source), reference_height),
            None => {
                log::warn!("stroke {}: no points could be extracted", index);
                Self::absent(index)
            }
        }
    }

    /// Derive a stroke from an already canonical point list.
    pub fn from_points(
        index: usize,
        points: Vec<Vec2>,
        source: Option<PointSource>,
        reference_height: f32,
    ) -> Self {
        let geometry = StrokeGeometry::compute(&points, reference_height);
        Self {
            index,
            source,
            start_point: points.first().copied(),
            end_point: geometry.map(|g| g.end),
            direction: geometry.map(|g| g.direction),
            angle: geometry.map(|g| g.angle),
            length: geometry.map(|g| g.length),
            distance_to_next: None,
            points,
        }
    }

    fn from_cache(index: usize, cached: &CachedStroke, reference_height: f32) -> Self {
        let start_point = cached.start_point.map(RawPoint::to_vec2);
        let end_point = cached.end_point.map(RawPoint::to_vec2);
        let direction = match (start_point, end_point) {
            (Some(s), Some(e)) => Some(to_screen(e, reference_height) - to_screen(s, reference_height)),
            _ => None,
        };
        Self {
            index,
            source: None,
            points: cached
                .points
                .iter()
                .flatten()
                .map(|p| p.to_vec2())
                .collect(),
            start_point,
            end_point,
            direction,
            angle: cached.angle.or(cached.angle_degrees.map(f32::to_radians)),
            length: cached.length,
            distance_to_next: cached.distance_to_next,
        }
    }

    /// Keep every field already present, take the rest from `derived`.
    fn fill_missing(self, derived: Self) -> Self {
        Self {
            index: self.index,
            source: self.source.or(derived.source),
            points: if self.points.is_empty() { derived.points } else { self.points },
            start_point: self.start_point.or(derived.start_point),
            end_point: self.end_point.or(derived.end_point),
            direction: self.direction.or(derived.direction),
            angle: self.angle.or(derived.angle),
            length: self.length.or(derived.length),
            distance_to_next: self.distance_to_next.or(derived.distance_to_next),
        }
    }

    /// All geometry needed for segmentation and scoring is present.
    pub fn is_complete(&self) -> bool {
        self.start_point.is_some()
            && self.end_point.is_some()
            && self.direction.is_some()
            && self.angle.is_some()
            && self.length.is_some()
    }

    pub fn angle_degrees(&self) -> Option<f32> {
        self.angle.map(f32::to_degrees)
    }

    /// Length converted to screen pixels.
    pub fn screen_length(&self, scale: f32) -> Option<f32> {
        self.length.map(|l| l * scale)
    }
}

/// The ordered, index-stable strokes of one character plus the raw data
/// they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterStrokeModel {
    character: String,
    strokes: Vec<Stroke>,
    raw: RawCharacter,
    reference_height: f32,
}

impl CharacterStrokeModel {
    /// Take whatever the precomputed cache offers without deriving anything.
    /// Strokes the cache does not cover are placeholders until backfilled.
    pub fn from_raw(raw: RawCharacter, reference_height: f32) -> Self {
        let strokes = (0..raw.stroke_count())
            .map(|i| match raw.strokes.get(i) {
                Some(cached) => Stroke::from_cache(i, cached, reference_height),
                None => Stroke::absent(i),
            })
            .collect();
        Self {
            character: raw.character.clone(),
            strokes,
            raw,
            reference_height,
        }
    }

    /// Normalize every stroke and link neighbours.
    pub fn build(raw: RawCharacter, reference_height: f32) -> Self {
        let mut model = Self::from_raw(raw, reference_height);
        model.backfill();
        model
    }

    pub fn needs_backfill(&self) -> bool {
        self.strokes.iter().any(|s| !s.is_complete())
    }

    /// Recompute missing geometry from the raw source, leaving complete
    /// strokes untouched, then re-run the gap pass over the whole list.
    /// Running it again on the result changes nothing.
    pub fn backfill(&mut self) {
        let sources = self.raw.stroke_sources();
        let h = self.reference_height;
        for stroke in &mut self.strokes {
            if stroke.is_complete() {
                continue;
            }
            let i = stroke.index;
            let derived = match sources.get(i).and_then(Option::as_ref) {
                Some(raw) => Stroke::derive(i, raw, h),
                None if !stroke.points.is_empty() => {
                    Stroke::from_points(i, stroke.points.clone(), stroke.source.or(Some(PointSource::Points)), h)
                }
                None => continue,
            };
            *stroke = std::mem::replace(stroke, Stroke::absent(i)).fill_missing(derived);
        }
        self.link_neighbours();
    }

    /// Gap from each stroke's end to the next stroke's start. The last stroke
    /// has none. Pairs lacking an endpoint keep any cached value.
    fn link_neighbours(&mut self) {
        let n = self.strokes.len();
        for i in 0..n {
            let next_start = self.strokes.get(i + 1).and_then(|s| s.start_point);
            let stroke = &mut self.strokes[i];
            stroke.distance_to_next = match (stroke.end_point, next_start) {
                _ if i + 1 == n => None,
                (Some(end), Some(start)) => Some(end.distance(start)),
                _ => stroke.distance_to_next,
            };
        }
    }

    pub fn character(&self) -> &str {
        &self.character
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn stroke(&self, index: usize) -> Option<&Stroke> {
        self.strokes.get(index)
    }

    pub fn total_strokes(&self) -> usize {
        self.strokes.len()
    }

    pub fn raw(&self) -> &RawCharacter {
        &self.raw
    }

    pub fn reference_height(&self) -> f32 {
        self.reference_height
    }

    /// Summed screen length of strokes `from..`, skipping strokes with no length.
    pub fn remaining_screen_length(&self, from: usize, scale: f32) -> f32 {
        self.strokes
            .iter()
            .skip(from)
            .filter_map(|s| s.screen_length(scale))
            .sum()
    }

    /// Fully computed records for an offline stroke table. Directions are
    /// canonicalized (see [`StrokeGeometry::canonicalized`]), so these can
    /// disagree with runtime geometry about which end is the start.
    pub fn bake(&self) -> Vec<CachedStroke> {
        let h = self.reference_height;
        let geometries: Vec<Option<StrokeGeometry>> = self
            .strokes
            .iter()
            .map(|s| StrokeGeometry::compute(&s.points, h).map(|g| g.canonicalized(h)))
            .collect();
        geometries
            .iter()
            .enumerate()
            .map(|(i, &g)| {
                let next_start = geometries.get(i + 1).copied().flatten().map(|n| n.start);
                CachedStroke {
                    index: Some(i),
                    points: Some(self.strokes[i].points.iter().map(|&p| RawPoint::from(p)).collect()),
                    start_point: g.map(|g| g.start.into()),
                    end_point: g.map(|g| g.end.into()),
                    angle: g.map(|g| g.angle),
                    angle_degrees: g.map(|g| g.angle_degrees()),
                    length: g.map(|g| g.length),
                    distance_to_next: match (g, next_start) {
                        (Some(g), Some(s)) => Some(g.end.distance(s)),
                        _ => None,
                    },
                    raw_data: None,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::REFERENCE_HEIGHT as H;

    fn line(from: [f32; 2], to: [f32; 2]) -> RawStroke {
        RawStroke {
            medians: Some(vec![RawPoint::Pair(from), RawPoint::Pair(to)]),
            ..RawStroke::default()
        }
    }

    /// 三-like: three horizontal strokes stacked downward on screen.
    fn three_strokes() -> RawCharacter {
        RawCharacter::from_strokes(
            "三",
            vec![
                line([100.0, 700.0], [500.0, 700.0]),
                line([150.0, 450.0], [450.0, 450.0]),
                line([50.0, 200.0], [650.0, 200.0]),
            ],
        )
    }

    #[test]
    fn build_computes_geometry_and_gaps() {
        let m = CharacterStrokeModel::build(three_strokes(), H);
        assert_eq!(m.character(), "三");
        assert_eq!(m.total_strokes(), 3);
        let s0 = m.stroke(0).unwrap();
        assert_eq!(s0.source, Some(PointSource::Medians));
        assert_eq!(s0.length, Some(400.0));
        assert_eq!(s0.angle_degrees(), Some(0.0));
        // (500,700) -> (150,450)
        let gap = Vec2::new(500.0, 700.0).distance(Vec2::new(150.0, 450.0));
        assert_eq!(s0.distance_to_next, Some(gap));
        assert!(m.stroke(2).unwrap().distance_to_next.is_none());
        assert!(!m.needs_backfill());
    }

    #[test]
    fn unextractable_stroke_is_absent_not_fatal() {
        let mut raw = three_strokes();
        if let Some(data) = raw.raw_char_data.as_mut() {
            data.strokes[1] = RawStroke { path: Some("Z".into()), ..RawStroke::default() };
        }
        let m = CharacterStrokeModel::build(raw, H);
        assert_eq!(m.total_strokes(), 3);
        assert!(m.stroke(1).unwrap().length.is_none());
        assert!(m.stroke(0).unwrap().distance_to_next.is_none());
        assert!(m.stroke(2).unwrap().length.is_some());
    }

    #[test]
    fn complete_cached_strokes_are_not_disturbed() {
        let mut raw = three_strokes();
        // A cache entry that disagrees with the raw data must be kept as is.
        raw.strokes = vec![CachedStroke {
            index: Some(0),
            start_point: Some(RawPoint::Pair([0.0, 0.0])),
            end_point: Some(RawPoint::Pair([0.0, 10.0])),
            angle_degrees: Some(-90.0),
            length: Some(10.0),
            ..CachedStroke::default()
        }];
        raw.total_strokes = Some(3);
        let m = CharacterStrokeModel::build(raw, H);
        let s0 = m.stroke(0).unwrap();
        assert_eq!(s0.length, Some(10.0));
        assert!((s0.angle_degrees().unwrap() + 90.0).abs() < 1e-4);
        assert!(s0.points.is_empty());
        // Partially cached neighbours were backfilled from raw data.
        assert_eq!(m.stroke(1).unwrap().length, Some(300.0));
    }

    #[test]
    fn partial_cache_backfills_only_missing_fields() {
        let mut raw = three_strokes();
        raw.strokes = vec![CachedStroke { length: Some(123.0), ..CachedStroke::default() }];
        let m = CharacterStrokeModel::from_raw(raw, H);
        assert!(m.needs_backfill());
        assert_eq!(m.total_strokes(), 1);

        let mut m = m;
        m.backfill();
        let s0 = m.stroke(0).unwrap();
        assert_eq!(s0.length, Some(123.0));
        assert_eq!(s0.angle_degrees(), Some(0.0));
        assert_eq!(s0.start_point, Some(Vec2::new(100.0, 700.0)));
    }

    #[test]
    fn backfill_is_idempotent() {
        let mut raw = three_strokes();
        raw.strokes = vec![CachedStroke { angle: Some(0.5), ..CachedStroke::default() }];
        raw.total_strokes = Some(3);

        let a = CharacterStrokeModel::build(raw.clone(), H);
        let b = CharacterStrokeModel::build(raw, H);
        let mut c = a.clone();
        c.backfill();

        assert_eq!(a, b);
        assert_eq!(a, c);
        let json_a = serde_json::to_string(a.strokes()).unwrap();
        let json_c = serde_json::to_string(c.strokes()).unwrap();
        assert_eq!(json_a, json_c);
    }

    #[test]
    fn remaining_length_skips_absent_strokes() {
        let mut raw = three_strokes();
        raw.total_strokes = Some(4);
        let m = CharacterStrokeModel::build(raw, H);
        assert_eq!(m.remaining_screen_length(0, 0.5), (400.0 + 300.0 + 600.0) * 0.5);
        assert_eq!(m.remaining_screen_length(2, 1.0), 600.0);
        assert_eq!(m.remaining_screen_length(9, 1.0), 0.0);
    }

    #[test]
    fn bake_canonicalizes_but_runtime_does_not() {
        // Drawn right-to-left: ends closer to the screen origin than it starts.
        let raw = RawCharacter::from_strokes("丿", vec![line([500.0, 500.0], [100.0, 500.0])]);
        let m = CharacterStrokeModel::build(raw, H);
        let runtime = m.stroke(0).unwrap();
        assert!((runtime.angle_degrees().unwrap().abs() - 180.0).abs() < 1e-4);

        let baked = m.bake();
        assert_eq!(baked.len(), 1);
        assert_eq!(baked[0].angle_degrees, Some(0.0));
        assert_eq!(baked[0].start_point, Some(RawPoint::Object { x: 100.0, y: 500.0 }));
        assert_eq!(baked[0].length, runtime.length);
        assert!(baked[0].distance_to_next.is_none());

        // A baked table loads back as complete strokes.
        let reloaded = CharacterStrokeModel::from_raw(
            RawCharacter { character: "丿".into(), strokes: baked, ..RawCharacter::default() },
            H,
        );
        assert!(!reloaded.needs_backfill());
    }
}

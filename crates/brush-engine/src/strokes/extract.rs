use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::source::{RawPoint, RawStroke};

/// Which raw field a stroke's points were taken from. Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointSource {
    Medians,
    Path,
    Points,
}

/// Canonical point list for one stroke, tagged with its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    pub points: Vec<Vec2>,
    pub source: PointSource,
}

/// Resolve a raw stroke into points. Tries medians, then the SVG path, then
/// the generic point list; the first branch yielding any point wins.
/// `None` means the stroke is absent.
pub fn extract(raw: &RawStroke) -> Option<Extracted> {
    let from_list = |list: &Option<Vec<RawPoint>>| -> Vec<Vec2> {
        list.iter().flatten().map(|p| p.to_vec2()).collect()
    };

    let medians = from_list(&raw.medians);
    if !medians.is_empty() {
        return Some(Extracted { points: medians, source: PointSource::Medians });
    }

    if let Some(path) = &raw.path {
        let points = parse_svg_path(path);
        if !points.is_empty() {
            return Some(Extracted { points, source: PointSource::Path });
        }
    }

    let points = from_list(&raw.points);
    if !points.is_empty() {
        return Some(Extracted { points, source: PointSource::Points });
    }

    None
}

/// Pull one point out of every `M`/`L` command (either case) in `path`.
///
/// Each command needs two numeric arguments separated by whitespace or a
/// comma; whitespace after the command letter is optional. Commands with a
/// missing or malformed argument are dropped. Other commands are skipped.
/// Relative commands are read as absolute coordinates.
pub fn parse_svg_path(path: &str) -> Vec<Vec2> {
    let bytes = path.as_bytes();
    let mut points = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if matches!(bytes[i], b'M' | b'L' | b'm' | b'l') {
            if let Some((p, next)) = command_point(bytes, i + 1) {
                points.push(p);
                i = next;
                continue;
            }
        }
        i += 1;
    }
    points
}

fn command_point(bytes: &[u8], start: usize) -> Option<(Vec2, usize)> {
    let x_start = skip_whitespace(bytes, start);
    let (x, x_end) = number(bytes, x_start)?;
    let y_start = skip_separator(bytes, x_end);
    if y_start == x_end {
        return None;
    }
    let (y, y_end) = number(bytes, y_start)?;
    Some((Vec2::new(x, y), y_end))
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn skip_separator(bytes: &[u8], i: usize) -> usize {
    let i = skip_whitespace(bytes, i);
    if i < bytes.len() && bytes[i] == b',' {
        return skip_whitespace(bytes, i + 1);
    }
    i
}

/// Read a token of digits, `.` and `-` and parse its longest numeric
/// prefix, so `1.2.3` reads as 1.2. The whole token is consumed.
fn number(bytes: &[u8], start: usize) -> Option<(f32, usize)> {
    let mut end = start;
    while end < bytes.len() && (bytes[end].is_ascii_digit() || matches!(bytes[end], b'.' | b'-')) {
        end += 1;
    }
    let token = std::str::from_utf8(&bytes[start..end]).ok()?;
    let value = (1..=token.len())
        .rev()
        .find_map(|len| token[..len].parse::<f32>().ok())?;
    value.is_finite().then_some((value, end))
}

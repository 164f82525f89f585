use std::collections::HashMap;
use std::rc::Rc;

use serde::Deserialize;

use super::model::CharacterStrokeModel;
use super::source::RawCharacter;

/// Accepted top-level shapes of a stroke table.
#[derive(Deserialize)]
#[serde(untagged)]
enum LibraryFile {
    /// `{ "characters": [ { "character": "一", ... }, ... ] }`
    List { characters: Vec<RawCharacter> },
    /// `{ "一": { ... }, "二": { ... } }`
    Map(HashMap<String, RawCharacter>),
}

/// Raw stroke data for many characters with lazily built, cached models.
///
/// A character's model is built the first time it is requested and reused
/// afterwards; lookups are keyed by the character string.
pub struct StrokeLibrary {
    raw: HashMap<String, RawCharacter>,
    models: HashMap<String, Rc<CharacterStrokeModel>>,
    reference_height: f32,
}

impl StrokeLibrary {
    pub fn new(reference_height: f32) -> Self {
        Self {
            raw: HashMap::new(),
            models: HashMap::new(),
            reference_height,
        }
    }

    /// Parse a stroke table in either the list or the keyed-map form.
    pub fn from_json(json: &str, reference_height: f32) -> Result<Self, serde_json::Error> {
        let file: LibraryFile = serde_json::from_str(json)?;
        let mut library = Self::new(reference_height);
        match file {
            LibraryFile::List { characters } => {
                for raw in characters {
                    library.insert(raw);
                }
            }
            LibraryFile::Map(map) => {
                for (key, mut raw) in map {
                    if raw.character.is_empty() {
                        raw.character = key;
                    }
                    library.insert(raw);
                }
            }
        }
        log::info!("stroke library: {} characters loaded", library.len());
        Ok(library)
    }

    /// Add or replace a character. Any cached model for it is dropped.
    pub fn insert(&mut self, raw: RawCharacter) {
        if raw.character.is_empty() {
            log::warn!("stroke library: skipping entry with no character");
            return;
        }
        if raw.stroke_count() == 0 {
            log::warn!("stroke library: {} has no strokes", raw.character);
        }
        self.models.remove(&raw.character);
        self.raw.insert(raw.character.clone(), raw);
    }

    pub fn contains(&self, character: &str) -> bool {
        self.raw.contains_key(character)
    }

    /// Characters of `text` (whitespace ignored) the library cannot serve.
    pub fn missing(&self, text: &str) -> Vec<String> {
        let mut missing: Vec<String> = Vec::new();
        for ch in text.chars().filter(|c| !c.is_whitespace()) {
            let key = ch.to_string();
            if !self.contains(&key) && !missing.contains(&key) {
                missing.push(key);
            }
        }
        missing
    }

    /// The model for `character`, building and caching it on first use.
    pub fn model(&mut self, character: &str) -> Option<Rc<CharacterStrokeModel>> {
        if let Some(model) = self.models.get(character) {
            return Some(Rc::clone(model));
        }
        let raw = self.raw.get(character)?.clone();
        let model = Rc::new(CharacterStrokeModel::build(raw, self.reference_height));
        log::debug!(
            "stroke library: built {} ({} strokes)",
            character,
            model.total_strokes()
        );
        self.models.insert(character.to_string(), Rc::clone(&model));
        Some(model)
    }

    /// A copy of `character` with every stroke fully precomputed, in the
    /// shape of a stroke-table entry. Directions are canonicalized the way
    /// offline tables expect.
    pub fn bake_character(&mut self, character: &str) -> Option<RawCharacter> {
        let model = self.model(character)?;
        let strokes = model.bake();
        Some(RawCharacter {
            character: character.to_string(),
            total_strokes: Some(strokes.len()),
            strokes,
            raw_char_data: model.raw().raw_char_data.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::REFERENCE_HEIGHT as H;

    const LIST_JSON: &str = r#"{
        "timestamp": "2025-01-01T00:00:00Z",
        "totalCharacters": 2,
        "characters": [
            {
                "character": "一",
                "totalStrokes": 1,
                "strokes": [],
                "rawCharData": { "strokes": [ { "medians": [[100, 450], [800, 450]] } ] }
            },
            {
                "character": "十",
                "rawCharData": {
                    "strokes": ["M 100 500 L 800 500", "M 450 850 L 450 50"]
                }
            }
        ]
    }"#;

    #[test]
    fn parse_list_form() {
        let mut lib = StrokeLibrary::from_json(LIST_JSON, H).unwrap();
        assert_eq!(lib.len(), 2);
        let shi = lib.model("十").unwrap();
        assert_eq!(shi.total_strokes(), 2);
        // Second stroke is drawn top to bottom: +90° on screen.
        let angle = shi.stroke(1).unwrap().angle_degrees().unwrap();
        assert!((angle - 90.0).abs() < 1e-4, "angle was {}", angle);
    }

    #[test]
    fn parse_map_form_uses_keys() {
        let json = r#"{ "人": { "rawCharData": { "medians": [[[0, 0], [1, 1]], [[2, 2], [3, 3]]] } } }"#;
        let mut lib = StrokeLibrary::from_json(json, H).unwrap();
        let ren = lib.model("人").unwrap();
        assert_eq!(ren.character(), "人");
        assert_eq!(ren.total_strokes(), 2);
    }

    #[test]
    fn models_are_cached() {
        let mut lib = StrokeLibrary::from_json(LIST_JSON, H).unwrap();
        let a = lib.model("一").unwrap();
        let b = lib.model("一").unwrap();
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn insert_replaces_cached_model() {
        let mut lib = StrokeLibrary::from_json(LIST_JSON, H).unwrap();
        let before = lib.model("一").unwrap();
        lib.insert(RawCharacter::from_strokes("一", Vec::new()));
        let after = lib.model("一").unwrap();
        assert!(!Rc::ptr_eq(&before, &after));
        assert_eq!(after.total_strokes(), 0);
    }

    #[test]
    fn unknown_characters() {
        let mut lib = StrokeLibrary::from_json(LIST_JSON, H).unwrap();
        assert!(lib.model("二").is_none());
        assert_eq!(lib.missing("一 二十三二"), vec!["二".to_string(), "三".to_string()]);
    }

    #[test]
    fn baked_entry_loads_without_backfill() {
        let mut lib = StrokeLibrary::from_json(LIST_JSON, H).unwrap();
        let baked = lib.bake_character("十").unwrap();
        assert_eq!(baked.total_strokes, Some(2));
        // Already top to bottom on screen, so not swapped.
        let angle = baked.strokes[1].angle_degrees.unwrap();
        assert!((angle - 90.0).abs() < 1e-4);
        assert!(baked.strokes[0].distance_to_next.is_some());

        let json = serde_json::to_string(&baked).unwrap();
        let reloaded: RawCharacter = serde_json::from_str(&json).unwrap();
        let model = CharacterStrokeModel::from_raw(reloaded, H);
        assert!(!model.needs_backfill());
        assert!(lib.bake_character("二").is_none());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(StrokeLibrary::from_json("[1, 2", H).is_err());
    }
}

pub mod runner;

pub use runner::SessionRunner;

use std::cell::RefCell;

use brush_engine::InputEvent;
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<SessionRunner>> = RefCell::new(None);
}

/// Run `f` against the live runner. `None` before `brush_init` succeeds.
fn with_runner<R>(f: impl FnOnce(&mut SessionRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("brush: not initialized, call brush_init() first");
                None
            }
        }
    })
}

fn to_js(err: serde_json::Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Load the stroke table and start a level of `characters`.
#[wasm_bindgen]
pub fn brush_init(strokes_json: &str, characters: &str, difficulty: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let runner = SessionRunner::from_json(strokes_json, characters, difficulty).map_err(to_js)?;
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("brush: initialized");
    Ok(())
}

#[wasm_bindgen]
pub fn brush_start_level(characters: &str) {
    with_runner(|r| r.start_level(characters));
}

#[wasm_bindgen]
pub fn brush_set_canvas_size(size: f32) {
    with_runner(|r| r.set_canvas_size(size));
}

#[wasm_bindgen]
pub fn brush_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

/// The renderer finished animating one stroke.
#[wasm_bindgen]
pub fn brush_animation_done() {
    with_runner(|r| r.animation_done());
}

// ---- Pointer input ----

#[wasm_bindgen]
pub fn brush_pointer_down(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
}

#[wasm_bindgen]
pub fn brush_pointer_move(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
}

#[wasm_bindgen]
pub fn brush_pointer_up(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
}

/// Mouse left the canvas or the touch was cancelled.
#[wasm_bindgen]
pub fn brush_pointer_cancel(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerCancel { x, y }));
}

// ---- Save state ----

#[wasm_bindgen]
pub fn brush_snapshot() -> Result<String, JsValue> {
    with_runner(|r| r.snapshot_json().map_err(to_js))
        .unwrap_or_else(|| Err(JsValue::from_str("not initialized")))
}

#[wasm_bindgen]
pub fn brush_restore(json: &str) -> Result<(), JsValue> {
    with_runner(|r| r.restore_json(json).map_err(to_js))
        .unwrap_or_else(|| Err(JsValue::from_str("not initialized")))
}

// ---- Stroke data tooling ----

/// A precomputed stroke-table entry for `character` as JSON.
#[wasm_bindgen]
pub fn brush_bake_character(character: &str) -> Result<String, JsValue> {
    let baked = with_runner(|r| r.bake_character(character)).flatten();
    match baked {
        Some(raw) => serde_json::to_string(&raw).map_err(to_js),
        None => Err(JsValue::from_str(&format!("no stroke data for {}", character))),
    }
}

/// Characters of `text` the loaded stroke table cannot serve.
#[wasm_bindgen]
pub fn brush_missing_characters(text: &str) -> js_sys::Array {
    let out = js_sys::Array::new();
    for ch in with_runner(|r| r.missing_characters(text)).unwrap_or_default() {
        out.push(&JsValue::from_str(&ch));
    }
    out
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_buffer_ptr() -> *const f32 {
    with_runner(|r| r.buffer_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_buffer_total_floats() -> u32 {
    with_runner(|r| r.buffer_total_floats()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_event_data_offset() -> u32 {
    with_runner(|r| r.event_data_offset()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_max_events() -> u32 {
    with_runner(|r| r.max_events()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_event_count() -> u32 {
    with_runner(|r| r.event_count()).unwrap_or(0)
}

/// Copy of the shared buffer, for hosts without direct memory access.
#[wasm_bindgen]
pub fn get_buffer() -> js_sys::Float32Array {
    with_runner(|r| js_sys::Float32Array::from(r.buffer()))
        .unwrap_or_else(|| js_sys::Float32Array::new_with_length(0))
}

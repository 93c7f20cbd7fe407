//! Browser session controller
//!
//! Thin wasm-bindgen wrapper around [`Session`]. The page owns the animation
//! frame loop and calls `tick` once per frame; rendering reads `snapshot`.

use wasm_bindgen::prelude::*;

use crate::config::{ArenaShape, SimConfig, SpeedPreset};
use crate::sim::{Session, tick};

#[wasm_bindgen(start)]
pub fn wasm_init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier module instance
        return;
    }
    log::info!("Last Ball starting...");
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct WebSession {
    session: Session,
}

#[wasm_bindgen]
impl WebSession {
    /// Build a session from a JSON config (empty string for defaults),
    /// seeded from the clock
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WebSession, JsValue> {
        let seed = js_sys::Date::now() as u64;
        Self::with_seed(config_json, seed)
    }

    pub fn with_seed(config_json: &str, seed: u64) -> Result<WebSession, JsValue> {
        let config = if config_json.trim().is_empty() {
            SimConfig::default()
        } else {
            SimConfig::from_json(config_json).map_err(js_error)?
        };
        let session = Session::new(config, seed).map_err(js_error)?;
        log::info!("session created with seed {}", seed);
        Ok(WebSession { session })
    }

    /// Default config sized to the canvas, at the given speed preset
    pub fn for_viewport(width: f32, height: f32, speed: &str) -> Result<WebSession, JsValue> {
        let preset = SpeedPreset::from_str(speed).unwrap_or_default();
        let config = SimConfig {
            arena: ArenaShape::fit_viewport(width, height),
            ..Default::default()
        }
        .with_speed(preset);
        let session = Session::new(config, js_sys::Date::now() as u64).map_err(js_error)?;
        Ok(WebSession { session })
    }

    pub fn start(&mut self) -> bool {
        self.session.start()
    }

    pub fn pause(&mut self) -> bool {
        self.session.pause()
    }

    pub fn resume(&mut self) -> bool {
        self.session.resume()
    }

    pub fn restart(&mut self) -> bool {
        self.session.restart()
    }

    /// Advance one tick; false when the session was not running
    pub fn tick(&mut self) -> bool {
        tick(&mut self.session).ran
    }

    pub fn ball_count(&self) -> usize {
        self.session.active_ball_count()
    }

    pub fn state(&self) -> String {
        self.session.state().as_str().to_string()
    }

    pub fn winner(&self) -> Option<u32> {
        self.session.winner().map(|id| id.0)
    }

    /// Snapshot of balls, lines, dust and events as JSON
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.snapshot()).map_err(js_error)
    }
}

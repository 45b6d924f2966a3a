//! Browser bindings
//!
//! The page owns the canvas and the `requestAnimationFrame` loop; it feeds
//! timestamps and key names in and draws from `snapshot()`. Every frame
//! callback carries the session token it was scheduled with, so callbacks
//! queued before `restart()`/`stop()` are dropped.

use wasm_bindgen::prelude::*;

use crate::Settings;
use crate::sim::{Direction, FrameToken, GamePhase, GameState, TickInput, tick};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
    log::info!("Maze Chase starting...");
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Game instance driven from JS
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    input: TickInput,
    last_time: f64,
}

#[wasm_bindgen]
impl WebGame {
    /// `settings_json` overrides the stored settings when given
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<f64>, settings_json: Option<String>) -> Result<WebGame, JsValue> {
        let settings = match settings_json {
            Some(json) => Settings::from_json(&json).map_err(to_js)?,
            None => Settings::load(),
        };
        let seed = seed.unwrap_or_else(js_sys::Date::now) as u64;
        log::info!("Game initialized with seed: {}", seed);
        Ok(Self {
            state: GameState::new(seed, &settings),
            input: TickInput::default(),
            last_time: 0.0,
        })
    }

    /// Token to pass back with every frame of this session
    pub fn token(&self) -> f64 {
        self.state.frame_token().generation as f64
    }

    /// Keyboard input. Returns true if the key was used.
    pub fn handle_key(&mut self, key: &str) -> bool {
        if let Some(dir) = Direction::from_key(key) {
            self.input.direction = Some(dir);
            return true;
        }
        match key {
            "Escape" | "p" | "P" => {
                self.input.pause = true;
                true
            }
            _ => false,
        }
    }

    /// Pause when the tab is hidden or the window loses focus
    pub fn auto_pause(&mut self) {
        if self.state.phase == GamePhase::Playing {
            self.input.pause = true;
            log::info!("Auto-paused");
        }
    }

    /// Advance one animation frame. `time` is the rAF timestamp in ms.
    /// Returns the frame's events as JSON (empty for stale tokens).
    pub fn frame(&mut self, token: f64, time: f64) -> Result<String, JsValue> {
        let token = FrameToken {
            generation: token as u64,
        };
        if !self.state.is_current(token) {
            log::debug!("Dropping stale frame for session {}", token.generation);
            return Ok("[]".to_string());
        }

        let dt = if self.last_time > 0.0 {
            ((time - self.last_time) / 1000.0) as f32
        } else {
            0.0
        };
        self.last_time = time;

        let input = std::mem::take(&mut self.input);
        let events = tick(&mut self.state, &input, dt);
        serde_json::to_string(&events).map_err(to_js)
    }

    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.snapshot()).map_err(to_js)
    }

    /// Cell code at (row, col) for drawing the maze
    pub fn cell_at(&self, row: i32, col: i32) -> u8 {
        self.state.grid.cell_at(row, col) as u8
    }

    pub fn width(&self) -> usize {
        self.state.grid.width()
    }

    pub fn height(&self) -> usize {
        self.state.grid.height()
    }

    pub fn restart(&mut self) {
        self.state.restart();
        self.input = TickInput::default();
        self.last_time = 0.0;
    }

    pub fn stop(&mut self) {
        self.state.stop();
    }

    pub fn settings_json(&self) -> Result<String, JsValue> {
        self.state.settings.to_json().map_err(to_js)
    }

    /// Persist settings and start a fresh round with them
    pub fn apply_settings(&mut self, settings_json: &str) -> Result<(), JsValue> {
        let settings = Settings::from_json(settings_json).map_err(to_js)?;
        settings.save();
        self.state.apply_settings(&settings);
        self.input = TickInput::default();
        self.last_time = 0.0;
        Ok(())
    }
}

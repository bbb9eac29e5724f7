//! Browser entry point
//!
//! JS owns the canvas and the requestAnimationFrame loop. It forwards key
//! names, calls `frame(now)` once per animation frame and draws from the
//! returned JSON snapshot.

use glam::{Vec2, Vec3};
use wasm_bindgen::prelude::*;

use crate::audio::WebAudio;
use crate::camera::Projector;
use crate::game::Game;
use crate::persistence::LocalStorageStore;
use crate::settings::Settings;
use crate::sim::FrameInput;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier instance
        return;
    }
    log::info!("Light Cycle starting...");
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game<WebAudio, LocalStorageStore>,
    projector: Projector,
    pending: FrameInput,
    autopilot: bool,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> WebGame {
        let settings = Settings::load();
        let audio = WebAudio::new(&settings);
        WebGame {
            game: Game::for_viewport(width, height, settings, audio, LocalStorageStore),
            projector: Projector::new(Vec2::new(width, height)),
            pending: FrameInput::default(),
            autopilot: false,
        }
    }

    /// Queue a key press for the next frame
    pub fn key_down(&mut self, key: &str) {
        let input = FrameInput::from_key(key);
        if input.start {
            // First user gesture unlocks audio
            self.game.audio().resume();
        }
        self.pending.merge(input);
    }

    pub fn set_autopilot(&mut self, on: bool) {
        self.autopilot = on;
    }

    /// Viewport resize only affects projection; the world stays fixed
    pub fn resize(&mut self, width: f32, height: f32) {
        self.projector.viewport = Vec2::new(width, height);
    }

    /// Advance one frame and return the snapshot as JSON
    pub fn frame(&mut self, now: f64) -> Result<String, JsValue> {
        let mut input = std::mem::take(&mut self.pending);
        input.autopilot = self.autopilot;
        self.game.frame(&input, now);
        serde_json::to_string(&self.game.snapshot(now))
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// `[x, y, scale]` on screen, or `undefined` when not drawable
    pub fn project(&self, x: f32, y: f32, z: f32) -> Option<Vec<f32>> {
        let camera = &self.game.state().camera;
        self.projector
            .project(camera, Vec3::new(x, y, z))
            .map(|p| vec![p.x, p.y, p.scale])
    }
}

//! wasm32 entry points for a JavaScript frame driver

use wasm_bindgen::prelude::*;

use crate::Side;
use crate::bot::Bot;
use crate::games::GameKind;
use crate::input::InputState;
use crate::session::Arcade;
use crate::settings::Settings;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }
    log::info!("Duel Arcade loaded");
}

/// One running duel, driven by `requestAnimationFrame` on the page
#[wasm_bindgen]
pub struct WebArcade {
    arcade: Arcade,
    input: InputState,
    bot: Option<Bot>,
}

#[wasm_bindgen]
impl WebArcade {
    /// `game` is "boxing", "soccer" or "pong"; without a seed one is drawn.
    /// `tuning` is an optional JSON object overriding gameplay numbers.
    #[wasm_bindgen(constructor)]
    pub fn new(game: &str, seed: Option<u32>, tuning: Option<String>) -> Result<WebArcade, JsValue> {
        let kind = GameKind::from_str(game)
            .ok_or_else(|| JsValue::from_str(&format!("unknown game {game:?}")))?;
        let seed = seed.unwrap_or_else(|| (js_sys::Math::random() * f64::from(u32::MAX)) as u32);
        log::info!("{} ready (seed {})", kind.as_str(), seed);
        let settings = Settings::load();
        let arcade = match tuning {
            Some(json) => Arcade::with_tuning(kind, &json, u64::from(seed), settings)
                .map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => Arcade::new(kind, u64::from(seed), settings),
        };
        Ok(WebArcade {
            arcade,
            input: InputState::new(),
            bot: None,
        })
    }

    pub fn game(&self) -> String {
        self.arcade.kind().as_str().to_string()
    }

    pub fn key_down(&mut self, key: &str) {
        self.input.press(key);
    }

    pub fn key_up(&mut self, key: &str) {
        self.input.release(key);
    }

    /// Release every key, e.g. when the tab loses focus
    pub fn release_keys(&mut self) {
        self.input.clear();
    }

    /// Returns whether the message turned into an action
    pub fn voice_message(&mut self, json: &str) -> bool {
        self.arcade.voice_message(json).is_ok()
    }

    /// Advance one frame; returns the frame's events as JSON
    pub fn update(&mut self, dt_ms: f32) -> String {
        if let Some(bot) = self.bot.as_mut() {
            self.arcade.drive(bot, &mut self.input);
        }
        let events = self.arcade.update(&self.input, dt_ms);
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::warn!("Failed to encode events: {}", e);
            "[]".to_string()
        })
    }

    pub fn start_match(&mut self) -> bool {
        self.arcade.start_match()
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.arcade.toggle_pause()
    }

    pub fn cancel(&mut self) -> bool {
        self.arcade.cancel()
    }

    /// Hand `player` (1 or 2) to the computer, or take it back
    pub fn set_autopilot(&mut self, player: u8, enabled: bool) {
        let Some(side) = Side::from_player(player) else {
            log::warn!("No player {}", player);
            return;
        };
        let mut sides: Vec<Side> = self
            .bot
            .as_ref()
            .map(|b| b.sides().to_vec())
            .unwrap_or_default();
        sides.retain(|s| *s != side);
        if enabled {
            sides.push(side);
        }
        // Keys the bot was holding would otherwise stay down
        self.input.clear();
        self.bot = (!sides.is_empty()).then(|| Bot::new(&sides));
    }

    /// Replace the control settings from JSON and persist them
    pub fn set_settings(&mut self, json: &str) -> Result<(), JsValue> {
        let settings = Settings::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        settings.save();
        self.arcade.set_settings(settings);
        Ok(())
    }

    /// Full state for the renderer as JSON
    pub fn snapshot(&self) -> Result<String, JsValue> {
        self.arcade
            .snapshot_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

//! Platform bindings
//!
//! The browser page owns the frame loop, the DOM and the WebSocket to the
//! speech backend; it forwards keys, voice messages and frame times here.
//! Native builds have no platform layer beyond `Settings::load`.

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebArcade;

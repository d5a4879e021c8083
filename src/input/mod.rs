//! Input handling
//!
//! Keyboard state arrives from the frame driver as an [`InputState`];
//! voice arrives as JSON messages from the speech backend. Both are turned
//! into game commands by the [`Dispatcher`].

pub mod controls;
pub mod dispatcher;
pub mod keys;
pub mod voice;

pub use controls::{ControlWord, Controls, Delivery, KeyBinding, Trigger, VoiceWord};
pub use dispatcher::{Dispatcher, VoiceAction};
pub use keys::{InputState, KeyLatch};
pub use voice::{VoiceMessage, VoiceRejection};

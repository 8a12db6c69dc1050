//! WASM bindings for drift-playback
//!
//! JavaScript owns the `<audio>` element, the `AudioContext` and the
//! `AnalyserNode`. It performs the commands the session emits and reports
//! completions back with the command's ticket.

#[cfg(feature = "wasm")]
pub mod types;

#[cfg(feature = "wasm")]
pub mod session;

#[cfg(feature = "wasm")]
pub use session::WasmShuffleSession;

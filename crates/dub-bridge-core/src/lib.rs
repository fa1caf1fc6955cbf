//! dub-bridge-core: client-side synchronization logic without browser dependencies.
//!
//! This crate reconciles three forces on a server-rendered page:
//! - IME composition sessions that must not be interrupted
//! - debounced change notifications driven by declarative attributes
//! - destructive subtree swaps that would otherwise clobber focused input
//!
//! Everything here is generic over `DomPlatform` and `TimerPlatform`, so the
//! same logic runs against the browser DOM (`dub-bridge-browser`) and the
//! in-memory doubles used by the tests.

pub mod bridge;
pub mod capability;
pub mod composition;
pub mod config;
pub mod debounce;
pub mod error;
pub mod platform;
pub mod request;
pub mod swap;
pub mod text_helpers;
pub mod theme;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use bridge::Bridge;
pub use capability::{DirectoryDialog, TextPrompt, select_directory};
pub use composition::CompositionTracker;
pub use config::{BridgeConfig, DebounceRule, attrs};
pub use debounce::{DebounceScheduler, TimerKey};
pub use error::{BridgeError, CapabilityError, ConfigError, PlatformError};
pub use platform::{DomPlatform, TimerPlatform};
pub use request::{BridgeRequest, RequestKind};
pub use smol_str::SmolStr;
pub use swap::{CaptureSlot, StateRestorer, SwapGate};
pub use theme::{Theme, ThemeStore, load_theme, toggle_theme};
pub use types::{
    CapturedInput, ControlKind, DebounceScope, DebounceSpec, InputKind, SelectionRange,
    SwapDecision,
};

//! # funtext
//!
//! Split text into animatable fragments and drive CSS keyframe animations
//! over them with per-fragment timing offsets.
//!
//! This crate provides platform-agnostic logic for:
//! - Compiling animation declarations (steps, timing, offsets, sync)
//! - Splitting text into letter/word/sentence fragments
//! - Generating `@keyframes` and `animation-*` CSS
//! - Managing the build/mount lifecycle of an animated text
//!
//! ## Features
//!
//! - `serde` - Enable serialization/deserialization for data structures
//! - `toml` - Load a [`FunTextConfig`] from TOML
//! - `web` - Enable web/WASM shadow-root mounting support
//!
//! ## Example
//!
//! ```rust
//! use funtext::{build_fragments, compile, style, Animation, AnimationType, Scope, SyncAnchor};
//!
//! // Declare an animation and compile it
//! let bounce = Animation::new(AnimationType::Vertical, ("0px", "-8px"))
//!     .duration("300ms")
//!     .offset(0.25)
//!     .sync(1.0, SyncAnchor::Start);
//! let animations = vec![compile(&bounce)];
//!
//! // Split the text and stagger the fragments
//! let mut fragments = build_fragments(Scope::Letter, "Fun!");
//! funtext::apply_offsets(&mut fragments, &animations, 4);
//! assert_eq!(fragments[3].variable("--offset-vertical"), Some("0.75s"));
//!
//! // Generate the stylesheet
//! let css = style::stylesheet(&animations);
//! assert!(css.contains("animation-duration: 1s;"));
//! ```

mod animation;
mod compiler;
mod config;
mod error;
mod fun_text;
mod nodes;
mod steps;
pub mod style;
mod time;

#[cfg(feature = "web")]
pub mod web;

pub use animation::{
    Animation, AnimationSync, AnimationType, IterationCount, Offset, OffsetFn, OffsetInput, Steps,
    SyncAnchor,
};
pub use compiler::{
    compile, compile_checked, normalize_steps, sync_steps, validate, CompiledAnimation,
    CompiledOffset,
};
pub use config::{AnimationConfig, FunTextConfig, Options, StepsConfig};
pub use error::{FunTextError, Result};
pub use fun_text::{Container, FunText};
pub use nodes::{apply_offsets, build_fragments, FragmentKind, Scope, TextFragment, FRAGMENT_CLASS};
pub use steps::{StepMap, StepValue};
pub use time::{extract_seconds, format_number, format_seconds, TimeValue};

#[cfg(feature = "web")]
pub use web::{js_offset, ElementContainer};

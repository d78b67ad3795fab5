//! Options and declarative configuration.

use std::collections::BTreeMap;

use crate::animation::{Animation, AnimationSync, AnimationType, IterationCount, Offset, Steps};
use crate::compiler::{compile_checked, CompiledAnimation};
use crate::error::Result;
use crate::nodes::Scope;
use crate::steps::StepValue;
use crate::time::TimeValue;

/// How a FunText instance reads and splits its text.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Options {
    /// Text to animate; the container's own text when `None`
    #[cfg_attr(feature = "serde", serde(default))]
    pub text: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scope: Scope,
}

impl Options {
    pub fn new(scope: Scope) -> Self {
        Self { text: None, scope }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// Steps as they appear in a configuration file.
///
/// Mapping keys are strings there; non-numeric keys are dropped when the
/// config is turned into an [`Animation`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(untagged))]
pub enum StepsConfig {
    Single(String),
    Pair([String; 2]),
    Keyed(BTreeMap<String, StepValue>),
}

impl StepsConfig {
    pub fn to_steps(&self) -> Steps {
        match self {
            StepsConfig::Single(to) => Steps::Single(to.clone()),
            StepsConfig::Pair([from, to]) => Steps::Pair(from.clone(), to.clone()),
            StepsConfig::Keyed(map) => Steps::parse_keyed(map.iter().map(|(k, v)| (k, v.clone()))),
        }
    }
}

/// One `[[animation]]` entry.
///
/// Offsets are limited to constant time values; calculators can only be
/// supplied from code.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationConfig {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: AnimationType,
    pub steps: StepsConfig,
    pub duration: Option<TimeValue>,
    pub delay: Option<TimeValue>,
    pub iteration: Option<IterationCount>,
    pub direction: Option<String>,
    pub timing: Option<String>,
    pub fill: Option<String>,
    pub offset: Option<TimeValue>,
    pub sync: Option<AnimationSync>,
}

impl AnimationConfig {
    pub fn to_animation(&self) -> Animation {
        Animation {
            kind: self.kind,
            steps: self.steps.to_steps(),
            duration: self.duration.clone(),
            delay: self.delay.clone(),
            iteration: self.iteration.clone(),
            direction: self.direction.clone(),
            timing: self.timing.clone(),
            fill: self.fill.clone(),
            offset: self.offset.clone().map(Offset::Constant),
            sync: self.sync.clone(),
        }
    }
}

/// A complete FunText setup: options plus animations.
///
/// ## Example
///
/// ```rust,ignore
/// let config = funtext::FunTextConfig::from_toml_str(r#"
///     scope = "letter"
///
///     [[animation]]
///     type = "color"
///     steps = ["red", "blue"]
///     offset = "100ms"
/// "#)?;
/// let compiled = config.compile()?;
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunTextConfig {
    pub text: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scope: Scope,
    #[cfg_attr(feature = "serde", serde(default, rename = "animation"))]
    pub animations: Vec<AnimationConfig>,
}

impl FunTextConfig {
    /// Parse a TOML configuration.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn options(&self) -> Options {
        Options {
            text: self.text.clone(),
            scope: self.scope,
        }
    }

    /// The configured animations as declarations.
    pub fn animations(&self) -> Vec<Animation> {
        self.animations.iter().map(AnimationConfig::to_animation).collect()
    }

    /// Validate and compile every configured animation.
    ///
    /// Fails on the first invalid animation.
    pub fn compile(&self) -> Result<Vec<CompiledAnimation>> {
        self.animations().iter().map(compile_checked).collect()
    }
}

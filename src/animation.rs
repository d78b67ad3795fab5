//! Animation declarations as supplied by the caller.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::error::FunTextError;
use crate::steps::StepValue;
use crate::time::{format_number, TimeValue};

/// What an animation moves. Also used as the `@keyframes` name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum AnimationType {
    /// Moves along `left`
    Horizontal,
    /// Moves along `top`
    Vertical,
    Color,
    /// Animates `background-color`
    Background,
    Opacity,
    Scale,
    /// Animates `rotate`
    Rotation,
}

impl AnimationType {
    /// Every animation type, in declaration order.
    pub const ALL: [AnimationType; 7] = [
        AnimationType::Horizontal,
        AnimationType::Vertical,
        AnimationType::Color,
        AnimationType::Background,
        AnimationType::Opacity,
        AnimationType::Scale,
        AnimationType::Rotation,
    ];

    /// Keyframe name of this type.
    pub fn name(&self) -> &'static str {
        match self {
            AnimationType::Horizontal => "horizontal",
            AnimationType::Vertical => "vertical",
            AnimationType::Color => "color",
            AnimationType::Background => "background",
            AnimationType::Opacity => "opacity",
            AnimationType::Scale => "scale",
            AnimationType::Rotation => "rotation",
        }
    }

    /// CSS property targeted by this type.
    pub fn property(&self) -> &'static str {
        match self {
            AnimationType::Horizontal => "left",
            AnimationType::Vertical => "top",
            AnimationType::Color => "color",
            AnimationType::Background => "background-color",
            AnimationType::Opacity => "opacity",
            AnimationType::Scale => "scale",
            AnimationType::Rotation => "rotate",
        }
    }

    /// Name of the per-fragment offset custom property, e.g. `--offset-color`.
    pub fn offset_variable(&self) -> String {
        format!("--offset-{}", self.name())
    }
}

impl fmt::Display for AnimationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnimationType {
    type Err = FunTextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnimationType::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| FunTextError::UnknownKeyword {
                what: "animation type",
                value: s.to_string(),
            })
    }
}

/// Keyframe steps in one of the three accepted shapes.
#[derive(Clone, Debug, PartialEq)]
pub enum Steps {
    /// Animate from `inherit` to this value
    Single(String),
    /// Animate from the first value to the second
    Pair(String, String),
    /// Explicit percentage to value(s) mapping, in any order
    Map(Vec<(f64, StepValue)>),
}

impl Steps {
    /// Build a percentage mapping.
    pub fn map<I, V>(steps: I) -> Self
    where
        I: IntoIterator<Item = (f64, V)>,
        V: Into<StepValue>,
    {
        Steps::Map(steps.into_iter().map(|(k, v)| (k, v.into())).collect())
    }

    /// Build a percentage mapping from string keys.
    ///
    /// Keys that don't read as a number are skipped.
    pub fn parse_keyed<I, K, V>(steps: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<StepValue>,
    {
        let mut parsed = Vec::new();
        for (key, value) in steps {
            let key = key.as_ref();
            match key.trim().trim_end_matches('%').parse::<f64>() {
                Ok(percent) if !percent.is_nan() => parsed.push((percent, value.into())),
                _ => tracing::warn!("FunText: ignoring non-numeric step key `{}`", key),
            }
        }
        Steps::Map(parsed)
    }
}

impl From<&str> for Steps {
    fn from(value: &str) -> Self {
        Steps::Single(value.to_string())
    }
}

impl From<String> for Steps {
    fn from(value: String) -> Self {
        Steps::Single(value)
    }
}

impl From<(&str, &str)> for Steps {
    fn from((from, to): (&str, &str)) -> Self {
        Steps::Pair(from.to_string(), to.to_string())
    }
}

impl From<[&str; 2]> for Steps {
    fn from([from, to]: [&str; 2]) -> Self {
        Steps::Pair(from.to_string(), to.to_string())
    }
}

/// CSS `animation-iteration-count` as given by the caller.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(untagged))]
pub enum IterationCount {
    Count(f64),
    /// A numeric string or `"infinite"`
    Text(String),
}

impl IterationCount {
    pub fn infinite() -> Self {
        IterationCount::Text("infinite".to_string())
    }

    /// CSS text of this count; `None` for an empty string.
    pub fn to_css(&self) -> Option<String> {
        match self {
            IterationCount::Count(count) => Some(format_number(*count)),
            IterationCount::Text(text) if text.is_empty() => None,
            IterationCount::Text(text) => Some(text.clone()),
        }
    }
}

impl From<f64> for IterationCount {
    fn from(count: f64) -> Self {
        IterationCount::Count(count)
    }
}

impl From<u32> for IterationCount {
    fn from(count: u32) -> Self {
        IterationCount::Count(count as f64)
    }
}

impl From<&str> for IterationCount {
    fn from(text: &str) -> Self {
        IterationCount::Text(text.to_string())
    }
}

/// Position of one fragment, passed to offset calculators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OffsetInput {
    /// Fragment index (0-based)
    pub index: usize,
    /// Total number of fragments
    pub count: usize,
    /// Characters in all fragments before this one
    pub consumed: usize,
    /// Characters in the whole text
    pub text_len: usize,
}

/// Calculator returning a fragment's offset in seconds.
///
/// No `Send` bound, so JavaScript callbacks can be wrapped on WASM.
pub type OffsetFn = Rc<dyn Fn(OffsetInput) -> f64>;

/// Extra per-fragment delay staggering an animation across fragments.
#[derive(Clone)]
pub enum Offset {
    /// Fragment `i` is delayed by `i * value`
    Constant(TimeValue),
    /// Fragment delay is computed per fragment
    Computed(OffsetFn),
}

impl Offset {
    /// Wrap a closure as an offset calculator.
    pub fn computed(calculator: impl Fn(OffsetInput) -> f64 + 'static) -> Self {
        Offset::Computed(Rc::new(calculator))
    }
}

impl fmt::Debug for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Offset::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Offset::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<TimeValue> for Offset {
    fn from(value: TimeValue) -> Self {
        Offset::Constant(value)
    }
}

impl From<f64> for Offset {
    fn from(seconds: f64) -> Self {
        Offset::Constant(TimeValue::Seconds(seconds))
    }
}

impl From<&str> for Offset {
    fn from(value: &str) -> Self {
        Offset::Constant(value.into())
    }
}

impl From<String> for Offset {
    fn from(value: String) -> Self {
        Offset::Constant(value.into())
    }
}

/// Which point of an animation keeps its timing when synced.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum SyncAnchor {
    Start,
    Middle,
    End,
    /// Any percentage of the timeline
    Percent(f64),
}

impl SyncAnchor {
    /// Percentage of the timeline this anchor names.
    pub fn percent(&self) -> f64 {
        match self {
            SyncAnchor::Start => 0.0,
            SyncAnchor::Middle => 50.0,
            SyncAnchor::End => 100.0,
            SyncAnchor::Percent(percent) => *percent,
        }
    }
}

impl fmt::Display for SyncAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncAnchor::Start => f.write_str("start"),
            SyncAnchor::Middle => f.write_str("middle"),
            SyncAnchor::End => f.write_str("end"),
            SyncAnchor::Percent(percent) => f.write_str(&format_number(*percent)),
        }
    }
}

impl FromStr for SyncAnchor {
    type Err = FunTextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(SyncAnchor::Start),
            "middle" => Ok(SyncAnchor::Middle),
            "end" => Ok(SyncAnchor::End),
            other => other
                .trim_end_matches('%')
                .parse::<f64>()
                .ok()
                .filter(|p| p.is_finite())
                .map(SyncAnchor::Percent)
                .ok_or_else(|| FunTextError::UnknownKeyword {
                    what: "sync anchor",
                    value: s.to_string(),
                }),
        }
    }
}

impl TryFrom<String> for SyncAnchor {
    type Error = FunTextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SyncAnchor> for String {
    fn from(anchor: SyncAnchor) -> Self {
        anchor.to_string()
    }
}

/// Request to force an animation onto a different duration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationSync {
    /// Duration the animation should end up with
    pub time: TimeValue,
    /// Point of the timeline that keeps its original timing
    pub to: SyncAnchor,
}

impl AnimationSync {
    pub fn new(time: impl Into<TimeValue>, to: SyncAnchor) -> Self {
        Self {
            time: time.into(),
            to,
        }
    }
}

/// A user animation declaration.
///
/// Only `kind` and `steps` are required; everything else falls back to a
/// default when compiled.
///
/// ## Example
///
/// ```rust
/// use funtext::{Animation, AnimationType, IterationCount};
///
/// let wave = Animation::new(AnimationType::Vertical, ("0px", "-8px"))
///     .duration("400ms")
///     .iteration(IterationCount::infinite())
///     .direction("alternate")
///     .offset(0.05);
///
/// assert_eq!(wave.kind, AnimationType::Vertical);
/// ```
#[derive(Clone, Debug)]
pub struct Animation {
    pub kind: AnimationType,
    pub steps: Steps,
    pub duration: Option<TimeValue>,
    pub delay: Option<TimeValue>,
    pub iteration: Option<IterationCount>,
    pub direction: Option<String>,
    pub timing: Option<String>,
    pub fill: Option<String>,
    pub offset: Option<Offset>,
    pub sync: Option<AnimationSync>,
}

impl Animation {
    /// Create an animation with every optional field unset.
    pub fn new(kind: AnimationType, steps: impl Into<Steps>) -> Self {
        Self {
            kind,
            steps: steps.into(),
            duration: None,
            delay: None,
            iteration: None,
            direction: None,
            timing: None,
            fill: None,
            offset: None,
            sync: None,
        }
    }

    pub fn duration(mut self, duration: impl Into<TimeValue>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    pub fn delay(mut self, delay: impl Into<TimeValue>) -> Self {
        self.delay = Some(delay.into());
        self
    }

    pub fn iteration(mut self, iteration: impl Into<IterationCount>) -> Self {
        self.iteration = Some(iteration.into());
        self
    }

    pub fn direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = Some(direction.into());
        self
    }

    pub fn timing(mut self, timing: impl Into<String>) -> Self {
        self.timing = Some(timing.into());
        self
    }

    pub fn fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    pub fn offset(mut self, offset: impl Into<Offset>) -> Self {
        self.offset = Some(offset.into());
        self
    }

    pub fn sync(mut self, time: impl Into<TimeValue>, to: SyncAnchor) -> Self {
        self.sync = Some(AnimationSync::new(time, to));
        self
    }
}

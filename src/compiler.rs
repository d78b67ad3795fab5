//! Compiles animation declarations into their render-ready form.
//!
//! [`compile`] is pure and total: it never inspects keyword values and never
//! fails. [`compile_checked`] validates the declaration first and rejects
//! anything that would only surface later as inert CSS.

use std::fmt;

use crate::animation::{
    Animation, AnimationType, IterationCount, Offset, OffsetFn, OffsetInput, Steps, SyncAnchor,
};
use crate::error::{FunTextError, Result};
use crate::steps::{StepMap, StepValue};
use crate::time::{extract_seconds, format_seconds, TimeValue};

/// Duration in seconds when none is given.
pub const DEFAULT_DURATION: f64 = 1.0;
/// Delay in seconds when none is given.
pub const DEFAULT_DELAY: f64 = 0.0;
pub const DEFAULT_ITERATION: &str = "1";
pub const DEFAULT_DIRECTION: &str = "normal";
pub const DEFAULT_TIMING: &str = "ease-in-out";
pub const DEFAULT_FILL: &str = "none";

const DIRECTIONS: &[&str] = &["normal", "reverse", "alternate", "alternate-reverse"];
const TIMINGS: &[&str] = &[
    "ease",
    "ease-in",
    "ease-out",
    "ease-in-out",
    "linear",
    "step-start",
    "step-end",
];
const TIMING_FUNCTIONS: &[&str] = &["cubic-bezier(", "steps("];
const FILLS: &[&str] = &["none", "forwards", "backwards", "both", "initial", "inherit"];

/// Resolved per-fragment offset.
#[derive(Clone)]
pub enum CompiledOffset {
    /// Fragment `i` is delayed by `i * seconds`
    Seconds(f64),
    /// Calculator kept as given, run once per fragment
    Computed(OffsetFn),
}

impl CompiledOffset {
    /// Offset of one fragment in seconds.
    pub fn at(&self, input: OffsetInput) -> f64 {
        match self {
            CompiledOffset::Seconds(seconds) => input.index as f64 * seconds,
            CompiledOffset::Computed(calculator) => calculator(input),
        }
    }
}

impl fmt::Debug for CompiledOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompiledOffset::Seconds(seconds) => f.debug_tuple("Seconds").field(seconds).finish(),
            CompiledOffset::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Normalized animation ready for keyframe and style generation.
///
/// `steps` always holds a 0% and a 100% step; after syncing it may also
/// hold keys below 0 or above 100.
#[derive(Clone, Debug)]
pub struct CompiledAnimation {
    pub kind: AnimationType,
    pub steps: StepMap,
    /// Seconds with unit, e.g. `"1.5s"`
    pub duration: String,
    /// Seconds with unit, e.g. `"0s"`
    pub delay: String,
    pub iteration: String,
    pub direction: String,
    pub timing: String,
    pub fill: String,
    pub offset: CompiledOffset,
}

impl CompiledAnimation {
    /// Express this compiled animation as a declaration again.
    ///
    /// Compiling the result yields the same timing and keyword values.
    pub fn to_animation(&self) -> Animation {
        Animation {
            kind: self.kind,
            steps: Steps::Map(self.steps.iter().map(|(k, v)| (k, v.clone())).collect()),
            duration: Some(TimeValue::Text(self.duration.clone())),
            delay: Some(TimeValue::Text(self.delay.clone())),
            iteration: Some(IterationCount::Text(self.iteration.clone())),
            direction: Some(self.direction.clone()),
            timing: Some(self.timing.clone()),
            fill: Some(self.fill.clone()),
            offset: Some(match &self.offset {
                CompiledOffset::Seconds(seconds) => Offset::Constant(TimeValue::Seconds(*seconds)),
                CompiledOffset::Computed(calculator) => Offset::Computed(calculator.clone()),
            }),
            sync: None,
        }
    }
}

/// Compile an animation declaration.
///
/// ## Example
///
/// ```rust
/// use funtext::{compile, Animation, AnimationType, StepValue, SyncAnchor};
///
/// let fade = Animation::new(AnimationType::Color, ("red", "blue"))
///     .duration(2.0)
///     .sync(4.0, SyncAnchor::Start);
///
/// let compiled = compile(&fade);
/// assert_eq!(compiled.duration, "4s");
/// assert_eq!(compiled.steps.get(50.0), Some(&StepValue::from("blue")));
/// assert_eq!(compiled.steps.get(100.0), Some(&StepValue::from("blue")));
/// ```
pub fn compile(animation: &Animation) -> CompiledAnimation {
    let mut steps = normalize_steps(&animation.steps);
    let mut duration = extract_seconds(animation.duration.as_ref(), DEFAULT_DURATION);
    let delay = extract_seconds(animation.delay.as_ref(), DEFAULT_DELAY);

    let iteration = animation
        .iteration
        .as_ref()
        .and_then(IterationCount::to_css)
        .unwrap_or_else(|| DEFAULT_ITERATION.to_string());
    let direction = keyword_or(&animation.direction, DEFAULT_DIRECTION);
    let timing = keyword_or(&animation.timing, DEFAULT_TIMING);
    let fill = keyword_or(&animation.fill, DEFAULT_FILL);

    let offset = match &animation.offset {
        Some(Offset::Computed(calculator)) => CompiledOffset::Computed(calculator.clone()),
        Some(Offset::Constant(value)) => CompiledOffset::Seconds(extract_seconds(Some(value), 0.0)),
        None => CompiledOffset::Seconds(0.0),
    };

    if let Some(sync) = &animation.sync {
        let time = extract_seconds(Some(&sync.time), duration);
        steps = sync_steps(&steps, duration, time, sync.to);
        duration = time;
    } else {
        steps.ensure_bounds();
    }

    tracing::debug!(
        "FunText: compiled `{}` ({} steps, duration {}s)",
        animation.kind,
        steps.len(),
        duration
    );

    CompiledAnimation {
        kind: animation.kind,
        steps,
        duration: format_seconds(duration),
        delay: format_seconds(delay),
        iteration,
        direction,
        timing,
        fill,
        offset,
    }
}

/// Validate an animation, then compile it.
///
/// Nothing is compiled when validation fails.
pub fn compile_checked(animation: &Animation) -> Result<CompiledAnimation> {
    validate(animation)?;
    Ok(compile(animation))
}

/// Turn any accepted steps shape into a step map.
pub fn normalize_steps(steps: &Steps) -> StepMap {
    let mut map = StepMap::new();
    match steps {
        Steps::Single(to) => {
            map.insert(0.0, StepValue::inherit());
            map.insert(100.0, StepValue::One(to.clone()));
        }
        Steps::Pair(from, to) => {
            map.insert(0.0, StepValue::One(from.clone()));
            map.insert(100.0, StepValue::One(to.clone()));
        }
        Steps::Map(entries) => {
            for (key, value) in entries {
                map.insert(*key, value.clone());
            }
        }
    }
    map
}

/// Rescale steps so an animation of `duration` seconds runs for `time`
/// seconds while the `anchor` point keeps its original timing.
///
/// Every key `k` moves to `k * ratio + anchor * (1 - ratio)` with
/// `ratio = duration / time`. Missing 0% and 100% steps are filled in
/// afterwards.
///
/// A zero `time` or a `0 / 0` ratio leaves the keys where they are.
pub fn sync_steps(steps: &StepMap, duration: f64, time: f64, anchor: SyncAnchor) -> StepMap {
    let ratio = duration / time;
    let mut synced = if ratio.is_finite() {
        let shift = anchor.percent() * (1.0 - ratio);
        steps.rescale(ratio, shift)
    } else {
        tracing::warn!(
            "FunText: cannot sync {duration}s to {time}s, keeping step keys unchanged"
        );
        steps.clone()
    };
    synced.ensure_bounds();
    synced
}

fn keyword_or(value: &Option<String>, default: &str) -> String {
    match value.as_deref() {
        Some(keyword) if !keyword.is_empty() => keyword.to_string(),
        _ => default.to_string(),
    }
}

/// Check an animation against the CSS keywords and value ranges it may use.
pub fn validate(animation: &Animation) -> Result<()> {
    let kind = animation.kind;

    if let Steps::Map(entries) = &animation.steps {
        if entries.is_empty() {
            return Err(FunTextError::invalid(kind, "steps mapping is empty"));
        }
        if let Some((key, _)) = entries
            .iter()
            .find(|(key, _)| !key.is_finite() || !(0.0..=100.0).contains(key))
        {
            return Err(FunTextError::invalid(
                kind,
                format!("step key {key} is outside 0..=100"),
            ));
        }
    }

    if let Some(duration) = &animation.duration {
        match duration.seconds() {
            Some(seconds) if seconds >= 0.0 => {}
            _ => return Err(FunTextError::invalid(kind, format!("bad duration {duration:?}"))),
        }
    }
    if let Some(delay) = &animation.delay {
        if delay.seconds().is_none() {
            return Err(FunTextError::invalid(kind, format!("bad delay {delay:?}")));
        }
    }
    if let Some(Offset::Constant(offset)) = &animation.offset {
        if offset.seconds().is_none() {
            return Err(FunTextError::invalid(kind, format!("bad offset {offset:?}")));
        }
    }

    if let Some(iteration) = &animation.iteration {
        let valid = match iteration {
            IterationCount::Count(count) => count.is_finite() && *count >= 0.0,
            IterationCount::Text(text) => {
                text.is_empty()
                    || text == "infinite"
                    || text.parse::<f64>().is_ok_and(|n| n.is_finite() && n >= 0.0)
            }
        };
        if !valid {
            return Err(FunTextError::invalid(kind, format!("bad iteration {iteration:?}")));
        }
    }

    check_keyword(kind, "direction", &animation.direction, |d| DIRECTIONS.contains(&d))?;
    check_keyword(kind, "fill", &animation.fill, |f| FILLS.contains(&f))?;
    check_keyword(kind, "timing", &animation.timing, |t| {
        TIMINGS.contains(&t)
            || (TIMING_FUNCTIONS.iter().any(|prefix| t.starts_with(prefix)) && t.ends_with(')'))
    })?;

    if let Some(sync) = &animation.sync {
        match sync.time.seconds() {
            Some(seconds) if seconds > 0.0 => {}
            _ => {
                return Err(FunTextError::invalid(
                    kind,
                    format!("sync time {:?} must be a positive time", sync.time),
                ))
            }
        }
        if !sync.to.percent().is_finite() {
            return Err(FunTextError::invalid(kind, "sync anchor is not a finite percentage"));
        }
    }

    Ok(())
}

fn check_keyword(
    kind: AnimationType,
    field: &str,
    value: &Option<String>,
    known: impl Fn(&str) -> bool,
) -> Result<()> {
    match value.as_deref() {
        Some(keyword) if !keyword.is_empty() && !known(keyword) => Err(FunTextError::invalid(
            kind,
            format!("unknown {field} `{keyword}`"),
        )),
        _ => Ok(()),
    }
}

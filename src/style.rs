//! Stylesheet generation for compiled animations.
//!
//! Output is plain CSS text; any consumer (a `<style>` element, a static file,
//! a test) can use it as is.

use crate::animation::AnimationType;
use crate::compiler::CompiledAnimation;
use crate::nodes::FRAGMENT_CLASS;
use crate::time::format_number;

/// Layout applied to every fragment so offsets move it relative to its slot.
const FRAGMENT_CSS: &[&str] = &[
    "position:relative;",
    "left:0;",
    "top:0;",
    "display:inline-block;",
    "margin:0;",
    "padding:0;",
    "white-space:pre;",
    "background-size:100px;",
];

/// Build the `@keyframes` block of one animation.
///
/// Steps are emitted in ascending percentage order, one declaration per value.
///
/// ## Example
///
/// ```rust
/// use funtext::{compile, style, Animation, AnimationType};
///
/// let compiled = compile(&Animation::new(AnimationType::Color, ("red", "blue")));
/// assert_eq!(
///     style::keyframes(&compiled),
///     "@keyframes color { 0% { color:red; } 100% { color:blue; } }"
/// );
/// ```
pub fn keyframes(animation: &CompiledAnimation) -> String {
    let property = animation.kind.property();
    let mut css = format!("@keyframes {} {{", animation.kind);
    for (key, step) in animation.steps.iter() {
        let declarations: String = step
            .values()
            .iter()
            .map(|value| format!("{property}:{value};"))
            .collect();
        css.push_str(&format!(" {}% {{ {} }}", format_number(key), declarations));
    }
    css.push_str(" }");
    css
}

/// Build the combined `animation-*` declarations for all animations.
///
/// Each animation's delay is pushed back by its fragment's
/// `--offset-<type>` variable. Returns an empty string for no animations.
pub fn animation_declaration(animations: &[CompiledAnimation]) -> String {
    if animations.is_empty() {
        return String::new();
    }

    let join = |field: fn(&CompiledAnimation) -> String| -> String {
        animations.iter().map(field).collect::<Vec<_>>().join(",")
    };

    let name = join(|an| an.kind.to_string());
    let duration = join(|an| an.duration.clone());
    let delay = join(|an| format!("calc({} + var({}))", an.delay, an.kind.offset_variable()));
    let iteration = join(|an| an.iteration.clone());
    let direction = join(|an| an.direction.clone());
    let timing = join(|an| an.timing.clone());
    let fill = join(|an| an.fill.clone());

    [
        format!("animation-name: {name};"),
        format!("animation-duration: {duration};"),
        format!("animation-delay: {delay};"),
        format!("animation-iteration-count: {iteration};"),
        format!("animation-direction: {direction};"),
        format!("animation-timing-function: {timing};"),
        format!("animation-fill-mode: {fill};"),
    ]
    .join("\n")
}

/// `:host` block defaulting every offset variable to zero.
pub fn host_variables() -> String {
    let variables: Vec<String> = AnimationType::ALL
        .iter()
        .map(|kind| format!("  {}: 0;", kind.offset_variable()))
        .collect();
    format!(":host {{\n{}\n}}", variables.join("\n"))
}

/// Build the full stylesheet placed next to the fragments.
pub fn stylesheet(animations: &[CompiledAnimation]) -> String {
    let mut css = host_variables();
    css.push_str(&format!("\n.{FRAGMENT_CLASS} {{\n"));
    css.push_str(&FRAGMENT_CSS.concat());
    css.push('\n');
    css.push_str(&animation_declaration(animations));
    css.push_str("\n}\n");
    for animation in animations {
        css.push_str(&keyframes(animation));
        css.push('\n');
    }
    css
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compile, Animation, SyncAnchor};

    #[test]
    fn keyframes_multiple_values() {
        let compiled = compile(&Animation::new(AnimationType::Opacity, "1"));
        assert_eq!(
            keyframes(&compiled),
            "@keyframes opacity { 0% { opacity:inherit;opacity:0; } 100% { opacity:1; } }"
        );
    }

    #[test]
    fn keyframes_after_sync() {
        let compiled = compile(
            &Animation::new(AnimationType::Horizontal, ("0px", "20px"))
                .duration(2.0)
                .sync(4.0, SyncAnchor::End),
        );
        let css = keyframes(&compiled);
        assert!(css.starts_with("@keyframes horizontal { 0% { left:inherit;left:0; }"));
        assert!(css.contains(" 50% { left:0px; }"));
        assert!(css.ends_with(" 100% { left:20px; } }"));
        assert!(!css.contains("150%"));
    }

    #[test]
    fn declaration_joins_animations() {
        let animations = vec![
            compile(&Animation::new(AnimationType::Color, "red").duration("500ms")),
            compile(&Animation::new(AnimationType::Vertical, "4px").delay(1.0).iteration(2u32)),
        ];
        let css = animation_declaration(&animations);
        let lines: Vec<&str> = css.lines().collect();

        assert_eq!(lines[0], "animation-name: color,vertical;");
        assert_eq!(lines[1], "animation-duration: 0.5s,1s;");
        assert_eq!(
            lines[2],
            "animation-delay: calc(0s + var(--offset-color)),calc(1s + var(--offset-vertical));"
        );
        assert_eq!(lines[3], "animation-iteration-count: 1,2;");
        assert_eq!(lines[4], "animation-direction: normal,normal;");
        assert_eq!(lines[5], "animation-timing-function: ease-in-out,ease-in-out;");
        assert_eq!(lines[6], "animation-fill-mode: none,none;");
    }

    #[test]
    fn declaration_empty() {
        assert_eq!(animation_declaration(&[]), "");
    }

    #[test]
    fn stylesheet_contains_everything() {
        let animations = vec![compile(&Animation::new(AnimationType::Scale, ("1", "2")))];
        let css = stylesheet(&animations);

        assert!(css.starts_with(":host {\n  --offset-horizontal: 0;"));
        assert!(css.contains("  --offset-rotation: 0;"));
        assert!(css.contains(".funtext {\nposition:relative;"));
        assert!(css.contains("animation-name: scale;"));
        assert!(css.contains("@keyframes scale { 0% { scale:1; } 100% { scale:2; } }"));
    }
}

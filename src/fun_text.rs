//! FunText instance lifecycle: build, mount, unmount and live updates.

use crate::animation::Animation;
use crate::compiler::{compile, CompiledAnimation};
use crate::config::{FunTextConfig, Options};
use crate::error::{FunTextError, Result};
use crate::nodes::{apply_offsets, build_fragments, TextFragment};
use crate::style;

/// A host element that can show fragments inside a private shadow root.
///
/// Implement this for your rendering target. The `web` feature provides
/// [`ElementContainer`](crate::web::ElementContainer) for real DOM elements.
pub trait Container {
    /// Text currently shown by the element, used when no text is configured.
    fn text(&self) -> String;

    /// Make the element a shadow host showing a `<slot>` placeholder.
    ///
    /// Must fail with [`FunTextError::ContainerInUse`] when the shadow root
    /// already holds another instance's stylesheet.
    fn attach_shadow(&mut self) -> Result<()>;

    /// Replace the shadow root content with fragments and their stylesheet.
    fn show_fragments(&mut self, fragments: &[TextFragment], stylesheet: &str) -> Result<()>;

    /// Replace the shadow root content with a `<slot>` placeholder.
    fn show_slot(&mut self) -> Result<()>;
}

/// Animated text bound to one container.
///
/// Animations are compiled once on construction (and again whenever the
/// animation list is replaced). `build()` prepares fragments and the
/// stylesheet and attaches the shadow root; `mount()` and `unmount()` swap
/// the shadow root content between the animated text and the original.
///
/// ## Example
///
/// ```rust,ignore
/// use funtext::{Animation, AnimationType, FunText, Options, Scope};
///
/// let mut text = FunText::new(
///     container,
///     Options::new(Scope::Letter),
///     &[Animation::new(AnimationType::Vertical, ("0px", "-6px")).offset(0.05)],
/// );
/// text.build()?.mount()?;
/// ```
#[derive(Debug)]
pub struct FunText<C: Container> {
    container: C,
    options: Options,
    text: String,
    animations: Vec<CompiledAnimation>,
    fragments: Vec<TextFragment>,
    stylesheet: String,
    built: bool,
    mounted: bool,
}

impl<C: Container> FunText<C> {
    /// Create an instance, compiling every animation.
    pub fn new(container: C, options: Options, animations: &[Animation]) -> Self {
        let text = resolve_text(&options, &container);
        Self {
            container,
            options,
            text,
            animations: animations.iter().map(compile).collect(),
            fragments: Vec::new(),
            stylesheet: String::new(),
            built: false,
            mounted: false,
        }
    }

    /// Create an instance from a configuration, validating every animation.
    pub fn from_config(container: C, config: &FunTextConfig) -> Result<Self> {
        let animations = config.compile()?;
        let options = config.options();
        let text = resolve_text(&options, &container);
        Ok(Self {
            container,
            options,
            text,
            animations,
            fragments: Vec::new(),
            stylesheet: String::new(),
            built: false,
            mounted: false,
        })
    }

    /// Build fragments and stylesheet, and attach the shadow root.
    ///
    /// Calling this again on a built instance only rebuilds fragments and
    /// stylesheet.
    pub fn build(&mut self) -> Result<&mut Self> {
        if self.built {
            tracing::warn!("FunText: object already built, rebuilding content");
            self.refactor(|this| {
                this.build_nodes();
                this.build_style();
                Ok(())
            })?;
            return Ok(self);
        }

        self.build_nodes();
        self.build_style();
        self.container.attach_shadow()?;
        self.built = true;

        tracing::debug!(
            "FunText: built {} fragments for {} animations",
            self.fragments.len(),
            self.animations.len()
        );
        Ok(self)
    }

    /// Show the animated fragments.
    ///
    /// Mounting an already mounted instance logs a warning and does nothing.
    pub fn mount(&mut self) -> Result<&mut Self> {
        if !self.built {
            return Err(FunTextError::NotBuilt { action: "mounting" });
        }
        if self.mounted {
            tracing::warn!("FunText: object already mounted");
            return Ok(self);
        }

        self.container.show_fragments(&self.fragments, &self.stylesheet)?;
        self.mounted = true;
        tracing::debug!("FunText: mounted");
        Ok(self)
    }

    /// Restore the container's original content.
    ///
    /// Unmounting an instance that isn't mounted logs a warning and does
    /// nothing.
    pub fn unmount(&mut self) -> Result<&mut Self> {
        if !self.built {
            return Err(FunTextError::NotBuilt { action: "unmounting" });
        }
        if !self.mounted {
            tracing::warn!("FunText: object already unmounted");
            return Ok(self);
        }

        self.container.show_slot()?;
        self.mounted = false;
        tracing::debug!("FunText: unmounted");
        Ok(self)
    }

    /// Replace the text; `None` falls back to the container's text.
    pub fn set_text(&mut self, text: Option<String>) -> Result<()> {
        self.options.text = text;
        self.text = resolve_text(&self.options, &self.container);
        if !self.built {
            return Ok(());
        }
        self.refactor(|this| {
            this.build_nodes();
            Ok(())
        })
    }

    /// Replace text and scope.
    pub fn set_options(&mut self, options: Options) -> Result<()> {
        self.options = options;
        self.text = resolve_text(&self.options, &self.container);
        if !self.built {
            return Ok(());
        }
        self.refactor(|this| {
            this.build_nodes();
            Ok(())
        })
    }

    /// Replace the animation list, compiling the new animations.
    pub fn set_animations(&mut self, animations: &[Animation]) -> Result<()> {
        self.animations = animations.iter().map(compile).collect();
        if !self.built {
            return Ok(());
        }
        self.refactor(|this| {
            this.build_nodes();
            this.build_style();
            Ok(())
        })
    }

    /// Move the instance to another container and return the old one.
    ///
    /// Only allowed while unmounted. A built instance attaches the new
    /// container's shadow root first; on failure the old container is kept.
    pub fn replace_container(&mut self, container: C) -> Result<C> {
        if self.mounted {
            return Err(FunTextError::ContainerSwitchWhileMounted);
        }

        let mut container = container;
        if self.built {
            container.attach_shadow()?;
        }
        let old = std::mem::replace(&mut self.container, container);

        self.text = resolve_text(&self.options, &self.container);
        if self.built {
            self.build_nodes();
        }
        Ok(old)
    }

    #[inline]
    pub fn is_built(&self) -> bool {
        self.built
    }

    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Text being animated.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn options(&self) -> &Options {
        &self.options
    }

    #[inline]
    pub fn animations(&self) -> &[CompiledAnimation] {
        &self.animations
    }

    /// Fragments from the last build; empty before `build()`.
    #[inline]
    pub fn fragments(&self) -> &[TextFragment] {
        &self.fragments
    }

    /// Stylesheet from the last build; empty before `build()`.
    #[inline]
    pub fn stylesheet(&self) -> &str {
        &self.stylesheet
    }

    #[inline]
    pub fn container(&self) -> &C {
        &self.container
    }

    fn build_nodes(&mut self) {
        let mut fragments = build_fragments(self.options.scope, &self.text);
        apply_offsets(&mut fragments, &self.animations, self.text.chars().count());
        self.fragments = fragments;
    }

    fn build_style(&mut self) {
        self.stylesheet = style::stylesheet(&self.animations);
    }

    /// Run `update` with the instance unmounted, remounting afterwards if it
    /// was mounted before.
    fn refactor(&mut self, update: impl FnOnce(&mut Self) -> Result<()>) -> Result<()> {
        let was_mounted = self.mounted;
        if was_mounted {
            self.unmount()?;
        }
        update(self)?;
        if was_mounted {
            self.mount()?;
        }
        Ok(())
    }
}

fn resolve_text<C: Container>(options: &Options, container: &C) -> String {
    options.text.clone().unwrap_or_else(|| container.text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnimationType, Scope};

    #[derive(Debug, Clone, PartialEq)]
    enum Shadow {
        Slot,
        Fragments(Vec<String>),
    }

    #[derive(Debug, Default)]
    struct MemoryContainer {
        text: String,
        shadow: Option<Shadow>,
        refuse_shadow: bool,
        shows: usize,
    }

    impl MemoryContainer {
        fn with_text(text: &str) -> Self {
            Self {
                text: text.to_string(),
                ..Default::default()
            }
        }
    }

    impl Container for MemoryContainer {
        fn text(&self) -> String {
            self.text.clone()
        }

        fn attach_shadow(&mut self) -> Result<()> {
            if self.refuse_shadow {
                return Err(FunTextError::AttachShadow("not supported".into()));
            }
            match self.shadow {
                Some(Shadow::Fragments(_)) => Err(FunTextError::ContainerInUse),
                _ => {
                    self.shadow = Some(Shadow::Slot);
                    Ok(())
                }
            }
        }

        fn show_fragments(&mut self, fragments: &[TextFragment], _stylesheet: &str) -> Result<()> {
            self.shows += 1;
            self.shadow = Some(Shadow::Fragments(
                fragments.iter().map(|f| f.text.clone()).collect(),
            ));
            Ok(())
        }

        fn show_slot(&mut self) -> Result<()> {
            self.shadow = Some(Shadow::Slot);
            Ok(())
        }
    }

    fn bounce() -> Vec<Animation> {
        vec![Animation::new(AnimationType::Vertical, ("0px", "-4px")).offset(0.1)]
    }

    #[test]
    fn build_mount_unmount() {
        let mut text = FunText::new(
            MemoryContainer::default(),
            Options::new(Scope::Word).with_text("Fun text"),
            &bounce(),
        );
        assert!(!text.is_built());

        text.build().unwrap();
        assert!(text.is_built());
        assert_eq!(text.container().shadow, Some(Shadow::Slot));
        assert!(text.stylesheet().contains("@keyframes vertical"));
        assert_eq!(text.fragments()[2].variable("--offset-vertical"), Some("0.2s"));

        text.mount().unwrap();
        assert!(text.is_mounted());
        assert_eq!(
            text.container().shadow,
            Some(Shadow::Fragments(vec!["Fun".into(), " ".into(), "text".into()]))
        );

        text.unmount().unwrap();
        assert!(!text.is_mounted());
        assert_eq!(text.container().shadow, Some(Shadow::Slot));
    }

    #[test]
    fn mount_requires_build() {
        let mut text = FunText::new(MemoryContainer::default(), Options::default(), &bounce());
        assert!(matches!(
            text.mount(),
            Err(FunTextError::NotBuilt { action: "mounting" })
        ));
        assert!(matches!(
            text.unmount(),
            Err(FunTextError::NotBuilt { action: "unmounting" })
        ));
    }

    #[test]
    fn redundant_mount_is_noop() {
        let mut text = FunText::new(MemoryContainer::with_text("hi"), Options::default(), &bounce());
        text.build().unwrap().mount().unwrap();
        text.mount().unwrap();
        assert_eq!(text.container().shows, 1);

        text.unmount().unwrap();
        text.unmount().unwrap();
        assert!(!text.is_mounted());
    }

    #[test]
    fn text_defaults_to_container() {
        let text = FunText::new(
            MemoryContainer::with_text("from the page"),
            Options::new(Scope::All),
            &[],
        );
        assert_eq!(text.text(), "from the page");
    }

    #[test]
    fn container_in_use() {
        let mut container = MemoryContainer::with_text("busy");
        container.shadow = Some(Shadow::Fragments(vec!["other".into()]));

        let mut text = FunText::new(container, Options::default(), &bounce());
        assert!(matches!(text.build(), Err(FunTextError::ContainerInUse)));
        assert!(!text.is_built());
    }

    #[test]
    fn attach_failure() {
        let container = MemoryContainer {
            refuse_shadow: true,
            ..Default::default()
        };
        let mut text = FunText::new(container, Options::default(), &bounce());
        assert!(matches!(text.build(), Err(FunTextError::AttachShadow(_))));
    }

    #[test]
    fn set_text_while_mounted_remounts() {
        let mut text = FunText::new(
            MemoryContainer::default(),
            Options::new(Scope::Letter).with_text("ab"),
            &bounce(),
        );
        text.build().unwrap().mount().unwrap();

        text.set_text(Some("xyz".into())).unwrap();
        assert!(text.is_mounted());
        assert_eq!(text.container().shows, 2);
        assert_eq!(
            text.container().shadow,
            Some(Shadow::Fragments(vec!["x".into(), "y".into(), "z".into()]))
        );
    }

    #[test]
    fn set_options_before_build_only_stores() {
        let mut text = FunText::new(MemoryContainer::with_text("a b"), Options::default(), &[]);
        text.set_options(Options::new(Scope::Word)).unwrap();
        assert!(text.fragments().is_empty());

        text.build().unwrap();
        assert_eq!(text.fragments().len(), 3);
    }

    #[test]
    fn set_animations_rebuilds_style() {
        let mut text = FunText::new(MemoryContainer::with_text("a"), Options::default(), &bounce());
        text.build().unwrap();

        text.set_animations(&[Animation::new(AnimationType::Color, "red")]).unwrap();
        assert_eq!(text.animations().len(), 1);
        assert!(text.stylesheet().contains("@keyframes color"));
        assert!(!text.stylesheet().contains("@keyframes vertical"));
        assert_eq!(text.fragments()[0].variable("--offset-color"), Some("0s"));
    }

    #[test]
    fn replace_container_rules() {
        let mut text = FunText::new(MemoryContainer::with_text("one"), Options::default(), &bounce());
        text.build().unwrap().mount().unwrap();

        assert!(matches!(
            text.replace_container(MemoryContainer::with_text("two")),
            Err(FunTextError::ContainerSwitchWhileMounted)
        ));

        text.unmount().unwrap();
        let old = text.replace_container(MemoryContainer::with_text("two")).unwrap();
        assert_eq!(old.text, "one");
        assert_eq!(text.text(), "two");
        assert_eq!(text.container().shadow, Some(Shadow::Slot));
    }

    #[test]
    fn from_config_validates() {
        let config = FunTextConfig {
            animations: vec![crate::AnimationConfig {
                kind: AnimationType::Color,
                steps: crate::StepsConfig::Single("red".into()),
                duration: None,
                delay: None,
                iteration: None,
                direction: Some("diagonal".into()),
                timing: None,
                fill: None,
                offset: None,
                sync: None,
            }],
            ..Default::default()
        };
        assert!(matches!(
            FunText::from_config(MemoryContainer::default(), &config),
            Err(FunTextError::InvalidAnimation { .. })
        ));
    }
}

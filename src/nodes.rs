//! Splitting text into animatable fragments.

use std::str::FromStr;

use unicode_segmentation::UnicodeSegmentation;

use crate::animation::OffsetInput;
use crate::compiler::CompiledAnimation;
use crate::error::FunTextError;
use crate::time::format_seconds;

/// Class carried by every fragment element.
pub const FRAGMENT_CLASS: &str = "funtext";

/// Granularity at which text is split.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Scope {
    /// The whole text is one fragment
    #[default]
    All,
    /// One fragment per line
    Sentence,
    /// One fragment per space-separated word
    Word,
    /// One fragment per grapheme cluster
    Letter,
}

impl FromStr for Scope {
    type Err = FunTextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Scope::All),
            "sentence" => Ok(Scope::Sentence),
            "word" => Ok(Scope::Word),
            "letter" => Ok(Scope::Letter),
            _ => Err(FunTextError::UnknownKeyword {
                what: "scope",
                value: s.to_string(),
            }),
        }
    }
}

/// Element a fragment is rendered as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FragmentKind {
    /// `<p>` holding text
    Paragraph,
    /// `<br>` between lines
    LineBreak,
}

impl FragmentKind {
    /// HTML tag name.
    pub fn tag(&self) -> &'static str {
        match self {
            FragmentKind::Paragraph => "p",
            FragmentKind::LineBreak => "br",
        }
    }
}

/// One animatable piece of the text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextFragment {
    pub kind: FragmentKind,
    pub text: String,
    /// Custom properties set on the fragment, e.g. `("--offset-color", "0.1s")`
    pub variables: Vec<(String, String)>,
}

impl TextFragment {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            kind: FragmentKind::Paragraph,
            text: text.into(),
            variables: Vec::new(),
        }
    }

    pub fn line_break() -> Self {
        Self {
            kind: FragmentKind::LineBreak,
            text: "\n".to_string(),
            variables: Vec::new(),
        }
    }

    /// Length of the rendered fragment text in characters.
    ///
    /// A line break renders no text and counts as 0.
    #[inline]
    pub fn char_count(&self) -> usize {
        match self.kind {
            FragmentKind::Paragraph => self.text.chars().count(),
            FragmentKind::LineBreak => 0,
        }
    }

    /// Get a custom property value by name.
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set a custom property, replacing any earlier value.
    pub fn set_variable(&mut self, name: String, value: String) {
        match self.variables.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.variables.push((name, value)),
        }
    }
}

/// Split text into fragments for the given scope.
///
/// Line breaks always become their own `<br>` fragment; words are separated
/// by a fragment holding a single space.
///
/// ## Example
///
/// ```rust
/// use funtext::{build_fragments, FragmentKind, Scope};
///
/// let fragments = build_fragments(Scope::Word, "Fun text!");
/// let texts: Vec<&str> = fragments.iter().map(|f| f.text.as_str()).collect();
/// assert_eq!(texts, vec!["Fun", " ", "text!"]);
/// assert!(fragments.iter().all(|f| f.kind == FragmentKind::Paragraph));
/// ```
pub fn build_fragments(scope: Scope, text: &str) -> Vec<TextFragment> {
    match scope {
        Scope::All => vec![TextFragment::paragraph(text)],
        Scope::Sentence => split_lines(text),
        Scope::Word => {
            let words: Vec<&str> = text.split(' ').collect();
            let mut fragments = Vec::new();
            for (index, word) in words.iter().enumerate() {
                fragments.extend(split_lines(word));
                if index < words.len() - 1 {
                    fragments.push(TextFragment::paragraph(" "));
                }
            }
            fragments
        }
        Scope::Letter => text.graphemes(true).flat_map(split_lines).collect(),
    }
}

fn split_lines(text: &str) -> Vec<TextFragment> {
    let mut fragments = Vec::new();
    let mut lines = text.split('\n').peekable();
    while let Some(line) = lines.next() {
        fragments.push(TextFragment::paragraph(line));
        if lines.peek().is_some() {
            fragments.push(TextFragment::line_break());
        }
    }
    fragments
}

/// Set the `--offset-<type>` variable of every fragment for every animation.
///
/// `text_len` is the character count of the whole source text.
pub fn apply_offsets(fragments: &mut [TextFragment], animations: &[CompiledAnimation], text_len: usize) {
    let count = fragments.len();
    for animation in animations {
        let variable = animation.kind.offset_variable();
        let mut consumed = 0;
        for (index, fragment) in fragments.iter_mut().enumerate() {
            let offset = animation.offset.at(OffsetInput {
                index,
                count,
                consumed,
                text_len,
            });
            fragment.set_variable(variable.clone(), format_seconds(offset));
            consumed += fragment.char_count();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compile, Animation, AnimationType, Offset};

    fn texts(fragments: &[TextFragment]) -> Vec<&str> {
        fragments.iter().map(|f| f.text.as_str()).collect()
    }

    #[test]
    fn scope_all() {
        let fragments = build_fragments(Scope::All, "one two\nthree");
        assert_eq!(texts(&fragments), vec!["one two\nthree"]);
    }

    #[test]
    fn scope_sentence() {
        let fragments = build_fragments(Scope::Sentence, "one\ntwo");
        assert_eq!(texts(&fragments), vec!["one", "\n", "two"]);
        assert_eq!(fragments[1].kind, FragmentKind::LineBreak);
    }

    #[test]
    fn scope_word_splits_lines_inside_words() {
        let fragments = build_fragments(Scope::Word, "a b\nc");
        assert_eq!(texts(&fragments), vec!["a", " ", "b", "\n", "c"]);
        assert_eq!(fragments[1].kind, FragmentKind::Paragraph);
        assert_eq!(fragments[3].kind, FragmentKind::LineBreak);
    }

    #[test]
    fn scope_letter_uses_graphemes() {
        let fragments = build_fragments(Scope::Letter, "e\u{301}h");
        assert_eq!(texts(&fragments), vec!["e\u{301}", "h"]);

        let fragments = build_fragments(Scope::Letter, "a\nb");
        assert_eq!(texts(&fragments), vec!["a", "", "\n", "", "b"]);

        assert!(build_fragments(Scope::Letter, "").is_empty());
    }

    #[test]
    fn scope_from_str() {
        assert_eq!("word".parse::<Scope>().unwrap(), Scope::Word);
        assert!("paragraph".parse::<Scope>().is_err());
    }

    #[test]
    fn constant_offsets() {
        let mut fragments = build_fragments(Scope::Letter, "abc");
        let animations = vec![compile(&Animation::new(AnimationType::Color, "red").offset(0.5))];
        apply_offsets(&mut fragments, &animations, 3);

        let offsets: Vec<_> = fragments
            .iter()
            .map(|f| f.variable("--offset-color").unwrap())
            .collect();
        assert_eq!(offsets, vec!["0s", "0.5s", "1s"]);
    }

    #[test]
    fn omitted_offset_is_zero() {
        let mut fragments = build_fragments(Scope::Letter, "abcd");
        let animations = vec![compile(&Animation::new(AnimationType::Opacity, "1"))];
        apply_offsets(&mut fragments, &animations, 4);

        assert!(fragments
            .iter()
            .all(|f| f.variable("--offset-opacity") == Some("0s")));
    }

    #[test]
    fn computed_offsets_see_consumed_length() {
        let mut fragments = build_fragments(Scope::Word, "ab cde f");
        let animation = Animation::new(AnimationType::Vertical, "10px").offset(Offset::computed(
            |input| input.consumed as f64 / input.text_len as f64 * input.count as f64,
        ));
        apply_offsets(&mut fragments, &[compile(&animation)], 8);

        // fragments: "ab", " ", "cde", " ", "f" -> consumed 0, 2, 3, 6, 7
        let offsets: Vec<_> = fragments
            .iter()
            .map(|f| f.variable("--offset-vertical").unwrap())
            .collect();
        assert_eq!(offsets, vec!["0s", "1.25s", "1.875s", "3.75s", "4.375s"]);
    }

    #[test]
    fn line_breaks_consume_nothing() {
        let mut fragments = build_fragments(Scope::Sentence, "ab\ncd\ne");
        let animation = Animation::new(AnimationType::Color, "red")
            .offset(Offset::computed(|input| input.consumed as f64));
        apply_offsets(&mut fragments, &[compile(&animation)], 7);

        // fragments: "ab", <br>, "cd", <br>, "e"
        let offsets: Vec<_> = fragments
            .iter()
            .map(|f| f.variable("--offset-color").unwrap())
            .collect();
        assert_eq!(offsets, vec!["0s", "2s", "2s", "4s", "4s"]);
        assert_eq!(fragments[1].char_count(), 0);
    }

    #[test]
    fn one_variable_per_animation() {
        let mut fragments = build_fragments(Scope::All, "x");
        let animations = vec![
            compile(&Animation::new(AnimationType::Color, "red")),
            compile(&Animation::new(AnimationType::Scale, "2")),
        ];
        apply_offsets(&mut fragments, &animations, 1);
        apply_offsets(&mut fragments, &animations, 1);

        assert_eq!(fragments[0].variables.len(), 2);
        assert_eq!(fragments[0].variable("--offset-scale"), Some("0s"));
    }
}

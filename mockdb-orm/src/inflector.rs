//! Mapping from model kind names to store collection names.
//!
//! A [`Schema`](crate::schema::Schema) asks its inflector once per registered kind. The
//! default rule is [`DefaultInflector`]; any `Fn(&str) -> String` can be used instead.

/// Maps a singular model kind to the name of its store collection.
pub trait Inflector {
    /// Returns the collection name for the given kind.
    fn pluralize(&self, kind: &str) -> String;
}

impl<F> Inflector for F
where
    F: Fn(&str) -> String,
{
    fn pluralize(&self, kind: &str) -> String {
        self(kind)
    }
}

/// English pluralization covering the regular cases.
///
/// - `y` after a consonant becomes `ies` (`category` -> `categories`)
/// - `s`, `x`, `z`, `ch`, `sh` take `es` (`box` -> `boxes`)
/// - everything else takes `s` (`user` -> `users`)
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultInflector;

impl Inflector for DefaultInflector {
    fn pluralize(&self, kind: &str) -> String {
        if let Some(stem) = kind.strip_suffix('y') {
            let after_vowel = stem
                .chars()
                .last()
                .is_some_and(|c| matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'));

            if !stem.is_empty() && !after_vowel {
                return format!("{stem}ies");
            }
        }

        if ["s", "x", "z", "ch", "sh"].iter().any(|suffix| kind.ends_with(suffix)) {
            return format!("{kind}es");
        }

        format!("{kind}s")
    }
}

//! Localization and templating of message bodies.
//!
//! Before a message is formatted, it is "digested": a template is looked up under a key
//! that is derived from the source and the message, and `{token}` placeholders are
//! replaced. Without a matching template, the message itself is used as template.

use regex::{Captures, Regex};
use std::{
    collections::{BTreeMap, HashMap},
    sync::LazyLock,
};

/// Values for `{name}` placeholders.
pub type Tokens = BTreeMap<String, String>;

// Number of characters of message and source that make up a template key.
const KEY_LENGTH: usize = 20;

/// Template lookup.
pub trait Translator: Send + Sync {
    /// Returns the template stored under `key`, if any.
    fn lookup(&self, key: &str) -> Option<String>;

    /// Returns the template stored under `key`, or `fallback`, with the tokens substituted.
    fn translate(&self, key: &str, fallback: &str, tokens: &Tokens) -> String {
        let template = self.lookup(key);
        substitute_tokens(template.as_deref().unwrap_or(fallback), tokens)
    }
}

/// A [`Translator`] without templates.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTranslations;
impl Translator for NoTranslations {
    fn lookup(&self, _key: &str) -> Option<String> {
        None
    }
}

/// A [`Translator`] backed by a map from key to template.
#[derive(Clone, Debug, Default)]
pub struct MapTranslator {
    templates: HashMap<String, String>,
}

impl MapTranslator {
    /// Creates a translator from key/template pairs.
    #[must_use]
    pub fn new<I, K, V>(templates: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            templates: templates
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Adds or replaces a template.
    #[must_use]
    pub fn with<K: Into<String>, V: Into<String>>(mut self, key: K, template: V) -> Self {
        self.templates.insert(key.into(), template.into());
        self
    }
}

impl Translator for MapTranslator {
    fn lookup(&self, key: &str) -> Option<String> {
        self.templates.get(key).cloned()
    }
}

/// Replaces `{name}` placeholders with the values from `tokens`.
///
/// Placeholders without a value are left untouched.
#[must_use]
pub fn substitute_tokens(template: &str, tokens: &Tokens) -> String {
    static PLACEHOLDER: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").unwrap(/* ok */));

    if tokens.is_empty() {
        return template.to_string();
    }
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            tokens
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Derives a template key: the first 20 characters, words capitalized, spaces removed.
///
/// `"file not found here"` becomes `"FileNotFoundHere"`.
#[must_use]
pub fn template_key(text: &str) -> String {
    let mut key = String::with_capacity(KEY_LENGTH);
    let mut word_start = true;
    for c in text.chars().take(KEY_LENGTH) {
        if word_start {
            key.extend(c.to_uppercase());
        } else if c != ' ' {
            key.push(c);
        }
        word_start = c.is_whitespace();
        if key.ends_with(' ') {
            key.pop();
        }
    }
    key
}

/// Digests a message.
///
/// Looks up `<source key>.<message key>`, then `<message key>`,
/// and falls back to the message itself; tokens are substituted in any case.
#[must_use]
pub fn digest(translator: &dyn Translator, message: &str, source: &str, tokens: &Tokens) -> String {
    let key = template_key(message);
    let source_key = template_key(source);
    let fallback = translator.translate(&key, message, tokens);
    translator.translate(&format!("{source_key}.{key}"), &fallback, tokens)
}

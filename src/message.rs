use crate::digest::Tokens;
use std::borrow::Cow;

/// A message as it is passed to the logging methods of a [`Debugger`](crate::Debugger).
///
/// Plain strings convert into messages; the builder methods add a source label,
/// which overrides the debugger's current source for this one message,
/// and tokens for the `{name}` placeholders of the message or its template.
///
/// ```rust
/// use sourcelog::Message;
///
/// let message = Message::new("Order {id} shipped")
///     .source("Shipping")
///     .token("id", 4711);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Message<'a> {
    pub(crate) body: Cow<'a, str>,
    pub(crate) source: Option<Cow<'a, str>>,
    pub(crate) tokens: Tokens,
}

impl<'a> Message<'a> {
    /// A message with the given text.
    pub fn new<S: Into<Cow<'a, str>>>(body: S) -> Self {
        Self {
            body: body.into(),
            source: None,
            tokens: Tokens::new(),
        }
    }

    /// Logs the message under this source label.
    #[must_use]
    pub fn source<S: Into<Cow<'a, str>>>(mut self, source: S) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds a value for the placeholder `{name}`.
    #[must_use]
    pub fn token<K: Into<String>, V: ToString>(mut self, name: K, value: V) -> Self {
        self.tokens.insert(name.into(), value.to_string());
        self
    }

    /// Adds values for several placeholders.
    #[must_use]
    pub fn tokens(mut self, tokens: Tokens) -> Self {
        self.tokens.extend(tokens);
        self
    }

    /// The message text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

impl<'a> From<&'a str> for Message<'a> {
    fn from(body: &'a str) -> Self {
        Self::new(body)
    }
}

impl<'a> From<&'a String> for Message<'a> {
    fn from(body: &'a String) -> Self {
        Self::new(body.as_str())
    }
}

impl From<String> for Message<'_> {
    fn from(body: String) -> Self {
        Self::new(body)
    }
}

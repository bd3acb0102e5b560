//! Switching on debugging for a browser session through a request parameter.
//!
//! The host application asks [`DebugCookie::decide`] what to do with the debug cookie for a
//! request, and applies the returned [`CookieAction`] to its response.

use crate::{DebugCookieConfig, Environment};
use std::collections::BTreeMap;

/// What to do with the debug cookie.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CookieAction {
    /// Set the cookie.
    Set {
        /// Cookie name.
        name: String,
        /// Cookie value.
        value: String,
        /// Days until the cookie expires.
        expiry_days: u32,
        /// Path the cookie is restricted to.
        path: String,
    },
    /// Remove the cookie.
    Clear {
        /// Cookie name.
        name: String,
    },
    /// Leave the cookie as it is.
    Untouched,
}

/// Decides about the debug cookie, based on a [`DebugCookieConfig`].
///
/// ```rust
/// use sourcelog::{CookieAction, DebugCookie, DebugCookieConfig, Environment};
/// use std::collections::BTreeMap;
///
/// let cookie = DebugCookie::new(DebugCookieConfig {
///     request_path: "/admin".to_string(),
///     request_param: Some("debug".to_string()),
///     cookie_name: Some("debug_session".to_string()),
///     cookie_value: Some("1".to_string()),
///     ..DebugCookieConfig::default()
/// });
/// let query = BTreeMap::from([("debug".to_string(), "yes".to_string())]);
/// assert!(matches!(
///     cookie.decide("/admin/orders", &query, Environment::Dev),
///     CookieAction::Set { .. }
/// ));
/// ```
#[derive(Clone, Debug)]
pub struct DebugCookie {
    config: DebugCookieConfig,
}

impl DebugCookie {
    /// Creates the decision maker.
    #[must_use]
    pub fn new(config: DebugCookieConfig) -> Self {
        Self { config }
    }

    /// The action for a request to `request_path` with the given query parameters,
    /// in the given environment.
    ///
    /// The cookie is only touched if the environment is enabled, the request path starts with
    /// the configured path, and the trigger parameter is present. It is set if the parameter
    /// has the configured value (or, without a configured value, any value other than
    /// empty or `0`), and cleared otherwise.
    #[must_use]
    pub fn decide(
        &self,
        request_path: &str,
        query: &BTreeMap<String, String>,
        environment: Environment,
    ) -> CookieAction {
        let config = &self.config;
        let (Some(name), Some(value), Some(param)) = (
            non_empty(config.cookie_name.as_deref()),
            non_empty(config.cookie_value.as_deref()),
            non_empty(config.request_param.as_deref()),
        ) else {
            return CookieAction::Untouched;
        };
        if !config.environments.contains(&environment) {
            return CookieAction::Untouched;
        }

        let match_path = rooted(&config.request_path);
        if !rooted(request_path).starts_with(&match_path) {
            return CookieAction::Untouched;
        }
        let Some(actual) = query.get(param) else {
            return CookieAction::Untouched;
        };

        let triggered = match non_empty(config.request_value.as_deref()) {
            Some(expected) => actual == expected,
            None => !actual.is_empty() && actual != "0",
        };
        if triggered {
            CookieAction::Set {
                name: name.to_string(),
                value: value.to_string(),
                expiry_days: 1,
                path: match_path,
            }
        } else {
            CookieAction::Clear {
                name: name.to_string(),
            }
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

fn rooted(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

use crate::{
    digest::MapTranslator, safe_path, writers::ScreenTarget, DebuggerError, DeferredNow,
    Environment, Facilities,
};
use std::{collections::BTreeMap, path::PathBuf};

/// Whether output ends up on a terminal or in a web page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "config_file",
    derive(serde_derive::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum OutputContext {
    /// Command line; lines end with a plain newline.
    #[default]
    Cli,
    /// Web request; screen and file lines get an HTML break tag.
    Web,
}

/// Settings for the request-triggered debug cookie, see [`DebugCookie`](crate::DebugCookie).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "config_file",
    derive(serde_derive::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct DebugCookieConfig {
    /// Only requests below this path are considered.
    pub request_path: String,
    /// Name of the query parameter that triggers the cookie.
    pub request_param: Option<String>,
    /// Required value of the query parameter; without it any non-empty value triggers.
    pub request_value: Option<String>,
    /// Name of the cookie.
    pub cookie_name: Option<String>,
    /// Value of the cookie.
    pub cookie_value: Option<String>,
    /// Environments in which the cookie is handled at all.
    pub environments: Vec<Environment>,
}

impl Default for DebugCookieConfig {
    fn default() -> Self {
        Self {
            request_path: "/".to_string(),
            request_param: None,
            request_value: None,
            cookie_name: None,
            cookie_value: None,
            environments: vec![Environment::Dev],
        }
    }
}

/// Configuration of a [`Debugger`](crate::Debugger).
///
/// Can be built with the setter methods, starting from `DebuggerConfig::default()`,
/// or, with feature `config_file`, read from a TOML file:
///
/// ```toml
/// environment = "live"
/// strict = false
/// context = "web"
/// base_path = "/srv/app"
/// log_file_path = "log_files"
/// log_file_name = "app"
/// log_file_prefix_date = false
/// email_log_file_to = "ops@example.org"
///
/// [environment_levels]
/// dev = "trace, file, screen"
/// test = "notice, file"
/// live = "warn, file, email"
///
/// [dedicated_logs]
/// Payments = "payments.log"
///
/// [translations]
/// "PaymentFailed" = "Payment {id} failed"
/// ```
#[derive(Clone, Debug)]
#[cfg_attr(
    feature = "config_file",
    derive(serde_derive::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct DebuggerConfig {
    pub(crate) environment: Environment,
    pub(crate) environment_levels: BTreeMap<Environment, Facilities>,
    pub(crate) strict: bool,
    pub(crate) context: OutputContext,
    pub(crate) base_path: PathBuf,
    pub(crate) log_file_path: PathBuf,
    pub(crate) log_file_name: String,
    pub(crate) log_file_prefix_date: bool,
    pub(crate) dedicated_logs: BTreeMap<String, String>,
    pub(crate) dedicated_log_sources: Vec<String>,
    pub(crate) screen: ScreenTarget,
    pub(crate) log_email: Option<String>,
    pub(crate) email_log_file_to: Option<String>,
    pub(crate) email_from: String,
    pub(crate) default_source: String,
    pub(crate) cookie: DebugCookieConfig,
    pub(crate) translations: BTreeMap<String, String>,
}

impl Default for DebuggerConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Dev,
            environment_levels: BTreeMap::from([
                (
                    Environment::Dev,
                    Facilities::TRACE | Facilities::FILE | Facilities::SCREEN,
                ),
                (Environment::Test, Facilities::NOTICE | Facilities::FILE),
                (
                    Environment::Live,
                    Facilities::WARN | Facilities::FILE | Facilities::EMAIL,
                ),
            ]),
            strict: false,
            context: OutputContext::Cli,
            base_path: PathBuf::from("."),
            log_file_path: PathBuf::from("log_files"),
            log_file_name: "debug.log".to_string(),
            log_file_prefix_date: true,
            dedicated_logs: BTreeMap::new(),
            dedicated_log_sources: Vec::new(),
            screen: ScreenTarget::Stdout,
            log_email: None,
            email_log_file_to: None,
            email_from: "debugger@localhost".to_string(),
            default_source: "global".to_string(),
            cookie: DebugCookieConfig::default(),
            translations: BTreeMap::new(),
        }
    }
}

/// Setters.
impl DebuggerConfig {
    /// Sets the current environment.
    #[must_use]
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Sets the level that is used in the given environment.
    #[must_use]
    pub fn environment_level(mut self, environment: Environment, level: Facilities) -> Self {
        self.environment_levels.insert(environment, level);
        self
    }

    /// Removes the level of the given environment.
    #[must_use]
    pub fn without_environment_level(mut self, environment: Environment) -> Self {
        self.environment_levels.remove(&environment);
        self
    }

    /// In strict mode, [`Debugger::error`](crate::Debugger::error) returns an error
    /// after logging, rather than only logging.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets the output context.
    #[must_use]
    pub fn context(mut self, context: OutputContext) -> Self {
        self.context = context;
        self
    }

    /// Log files must reside below this directory.
    #[must_use]
    pub fn base_path<P: Into<PathBuf>>(mut self, base_path: P) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Directory for the log files, relative to the base path.
    #[must_use]
    pub fn log_file_path<P: Into<PathBuf>>(mut self, log_file_path: P) -> Self {
        self.log_file_path = log_file_path.into();
        self
    }

    /// Name of the log file; `.log` is appended if missing.
    #[must_use]
    pub fn log_file_name<S: Into<String>>(mut self, log_file_name: S) -> Self {
        self.log_file_name = log_file_name.into();
        self
    }

    /// Prefix the log file name with the current date.
    #[must_use]
    pub fn log_file_prefix_date(mut self, prefix_date: bool) -> Self {
        self.log_file_prefix_date = prefix_date;
        self
    }

    /// Messages of this source go to their own log file with the given name.
    #[must_use]
    pub fn dedicated_log<S: Into<String>, F: Into<String>>(mut self, source: S, file_name: F) -> Self {
        self.dedicated_logs.insert(source.into(), file_name.into());
        self
    }

    /// Messages of this source go to their own log file, named after the source.
    #[must_use]
    pub fn dedicated_log_source<S: Into<String>>(mut self, source: S) -> Self {
        self.dedicated_log_sources.push(source.into());
        self
    }

    /// The stream screen output goes to.
    #[must_use]
    pub fn screen(mut self, screen: ScreenTarget) -> Self {
        self.screen = screen;
        self
    }

    /// Recipient of the lines collected with [`Facilities::EMAIL`].
    #[must_use]
    pub fn log_email<S: Into<String>>(mut self, to: S) -> Self {
        self.log_email = Some(to.into());
        self
    }

    /// Recipient of the complete log file at teardown.
    #[must_use]
    pub fn email_log_file_to<S: Into<String>>(mut self, to: S) -> Self {
        self.email_log_file_to = Some(to.into());
        self
    }

    /// Sender address of all log mails.
    #[must_use]
    pub fn email_from<S: Into<String>>(mut self, from: S) -> Self {
        self.email_from = from.into();
        self
    }

    /// Source label used when none is given.
    #[must_use]
    pub fn default_source<S: Into<String>>(mut self, source: S) -> Self {
        self.default_source = source.into();
        self
    }

    /// Settings for the debug cookie.
    #[must_use]
    pub fn cookie(mut self, cookie: DebugCookieConfig) -> Self {
        self.cookie = cookie;
        self
    }

    /// Adds a message template.
    #[must_use]
    pub fn translation<K: Into<String>, V: Into<String>>(mut self, key: K, template: V) -> Self {
        self.translations.insert(key.into(), template.into());
        self
    }
}

/// Reading the configuration from TOML.
#[cfg(feature = "config_file")]
#[cfg_attr(docsrs, doc(cfg(feature = "config_file")))]
impl DebuggerConfig {
    /// Parses a configuration; missing values keep their defaults.
    ///
    /// # Errors
    ///
    /// [`DebuggerError::Toml`] if the text is not a valid configuration.
    pub fn from_toml_str(s: &str) -> Result<Self, DebuggerError> {
        Ok(toml::from_str(s)?)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// [`DebuggerError::Io`] if the file cannot be read,
    /// [`DebuggerError::Toml`] if it is not a valid configuration.
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, DebuggerError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }
}

/// Getters and derived values.
impl DebuggerConfig {
    /// The current environment.
    #[must_use]
    pub fn current_environment(&self) -> Environment {
        self.environment
    }

    /// Whether strict mode is on.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// The output context.
    #[must_use]
    pub fn output_context(&self) -> OutputContext {
        self.context
    }

    /// The debug cookie settings.
    #[must_use]
    pub fn cookie_config(&self) -> &DebugCookieConfig {
        &self.cookie
    }

    /// The level configured for an environment.
    ///
    /// # Errors
    ///
    /// [`DebuggerError::UnmappedEnvironment`] if the environment has no level.
    pub fn level_for(&self, environment: Environment) -> Result<Facilities, DebuggerError> {
        self.environment_levels
            .get(&environment)
            .copied()
            .ok_or(DebuggerError::UnmappedEnvironment(environment))
    }

    /// A translator with the configured templates.
    #[must_use]
    pub fn translator(&self) -> MapTranslator {
        MapTranslator::new(self.translations.clone())
    }

    /// The log file a debugger for `source` writes to.
    ///
    /// # Errors
    ///
    /// [`DebuggerError::UnsafePath`] if the path would not be inside the base path.
    pub fn log_file_path_name(
        &self,
        source: &str,
        now: &mut DeferredNow,
    ) -> Result<PathBuf, DebuggerError> {
        let file_name = self.log_file_name_for(source, now);
        safe_path::within(
            &self.base_path,
            &safe_path::relative(&self.log_file_path).join(with_extension(&file_name, ".log")),
        )
    }

    fn log_file_name_for(&self, source: &str, now: &mut DeferredNow) -> String {
        if let Some(file_name) = self.dedicated_logs.get(source) {
            file_name.clone()
        } else if self.dedicated_log_sources.iter().any(|s| s == source) {
            source.replace(['\\', '/', ':'], "")
        } else if self.log_file_prefix_date {
            format!("{}_{}", now.date(), self.log_file_name)
        } else {
            self.log_file_name.clone()
        }
    }
}

fn with_extension(file_name: &str, extension: &str) -> String {
    if file_name.ends_with(extension) {
        file_name.to_string()
    } else {
        format!("{file_name}{extension}")
    }
}

#[cfg(test)]
mod test {
    use super::DebuggerConfig;
    use crate::{DebuggerError, DeferredNow, Environment, Facilities};
    use std::path::PathBuf;

    #[test]
    fn test_level_for_environment() {
        let config = DebuggerConfig::default()
            .environment_level(Environment::Live, Facilities::ERROR | Facilities::FILE);
        assert_eq!(
            config.level_for(Environment::Live).unwrap(),
            Facilities::ERROR | Facilities::FILE
        );
        let config = config.without_environment_level(Environment::Test);
        assert!(matches!(
            config.level_for(Environment::Test),
            Err(DebuggerError::UnmappedEnvironment(Environment::Test))
        ));
    }

    #[test]
    fn test_log_file_names() {
        let mut now = DeferredNow::new();
        let config = DebuggerConfig::default()
            .base_path("/srv/app")
            .log_file_path("/logs")
            .log_file_name("app")
            .log_file_prefix_date(false)
            .dedicated_log("Payments", "money.log")
            .dedicated_log_source("shop::Cart");

        assert_eq!(
            config.log_file_path_name("Other", &mut now).unwrap(),
            PathBuf::from("/srv/app/logs/app.log")
        );
        assert_eq!(
            config.log_file_path_name("Payments", &mut now).unwrap(),
            PathBuf::from("/srv/app/logs/money.log")
        );
        assert_eq!(
            config.log_file_path_name("shop::Cart", &mut now).unwrap(),
            PathBuf::from("/srv/app/logs/shopCart.log")
        );

        let dated = config.clone().log_file_prefix_date(true);
        let expected = format!("/srv/app/logs/{}_app.log", now.date());
        assert_eq!(
            dated.log_file_path_name("Other", &mut now).unwrap(),
            PathBuf::from(expected)
        );
    }

    #[test]
    fn test_unsafe_log_file_path() {
        let config = DebuggerConfig::default()
            .base_path("/srv/app")
            .log_file_path("../../etc");
        assert!(matches!(
            config.log_file_path_name("x", &mut DeferredNow::new()),
            Err(DebuggerError::UnsafePath { .. })
        ));
        let config = DebuggerConfig::default()
            .base_path("/srv/app")
            .dedicated_log("Evil", "../../../tmp/evil");
        assert!(config
            .log_file_path_name("Evil", &mut DeferredNow::new())
            .is_err());
    }

    #[cfg(feature = "config_file")]
    #[test]
    fn test_from_toml() {
        let config = DebuggerConfig::from_toml_str(
            r#"
            environment = "live"
            strict = true
            context = "web"
            screen = "stderr"
            log_email = "ops@example.org"

            [environment_levels]
            live = "error, file"

            [cookie]
            request_param = "debug"
            cookie_name = "dbg"
            cookie_value = "1"
            environments = ["dev", "test"]

            [translations]
            "PaymentFailed" = "Payment {id} failed"
            "#,
        )
        .unwrap();
        assert_eq!(config.current_environment(), Environment::Live);
        assert!(config.is_strict());
        assert_eq!(config.output_context(), crate::OutputContext::Web);
        assert_eq!(
            config.level_for(Environment::Live).unwrap(),
            Facilities::ERROR | Facilities::FILE
        );
        // a table replaces the default mapping completely
        assert!(config.level_for(Environment::Dev).is_err());
        assert_eq!(config.cookie_config().request_path, "/");
        assert_eq!(config.cookie_config().environments.len(), 2);

        assert!(DebuggerConfig::from_toml_str("unknown_key = 1").is_err());
        assert!(DebuggerConfig::from_toml_str("[environment_levels]\ndev = \"loud\"").is_err());
    }
}

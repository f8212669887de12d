//! Level configuration
//!
//! A [`LevelConfig`] can be deserialized (serde) or parsed from a directive
//! string such as `"info,net.*=debug,db=error"`: a bare level sets the
//! default, `module=level` adds a rule. Rules keep their written order,
//! which matters for overlapping patterns.

use super::error::{LoggerError, Result};
use super::level::Level;
use super::module_level::compile_pattern;
use serde::{Deserialize, Serialize};

/// One `module = level` rule. `module` may be an exact name or a glob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDirective {
    pub module: String,
    pub level: Level,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Level for modules no rule matches.
    #[serde(default)]
    pub default: Option<Level>,
    #[serde(default)]
    pub rules: Vec<LevelDirective>,
}

impl LevelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn default_level(mut self, level: Level) -> Self {
        self.default = Some(level);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn rule(mut self, module: impl Into<String>, level: Level) -> Self {
        self.rules.push(LevelDirective {
            module: module.into(),
            level,
        });
        self
    }

    /// Parse a comma separated directive string.
    pub fn parse_directives(spec: &str) -> Result<Self> {
        let mut config = LevelConfig::new();
        for directive in spec.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            match directive.split_once('=') {
                None => config.default = Some(directive.parse()?),
                Some((module, level)) => {
                    let module = module.trim();
                    if module.is_empty() {
                        return Err(LoggerError::config(
                            "LevelConfig",
                            format!("missing module name in directive '{}'", directive),
                        ));
                    }
                    config = config.rule(module, level.parse()?);
                }
            }
        }
        Ok(config)
    }

    /// Parse the directive string held by environment variable `var`.
    ///
    /// Returns `Ok(None)` when the variable is unset or empty.
    pub fn from_env(var: &str) -> Result<Option<Self>> {
        match std::env::var(var) {
            Ok(spec) if !spec.trim().is_empty() => Self::parse_directives(&spec).map(Some),
            Ok(_) | Err(std::env::VarError::NotPresent) => Ok(None),
            Err(err) => Err(LoggerError::config(var, err.to_string())),
        }
    }

    /// Reject rules that look like globs but do not parse as one.
    ///
    /// Applying such a rule is not fatal (it is registered as an exact
    /// name), but configuration sources usually want to fail early.
    pub fn validate(&self) -> Result<()> {
        for rule in &self.rules {
            if rule.module.contains(|c: char| c == '*' || c == '?') {
                compile_pattern(&rule.module)
                    .map_err(|err| LoggerError::invalid_pattern(&rule.module, err.msg))?;
            }
        }
        Ok(())
    }
}

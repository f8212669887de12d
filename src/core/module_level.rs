//! Module level filtering
//!
//! [`ModuleLeveled`] wraps a backend and drops records whose level is not
//! enabled for their module. Levels are configured per exact module name
//! or per glob pattern (`*`, `?`, `[...]`):
//!
//! - an exact rule always beats a pattern rule for the same module
//! - among patterns, the last registered match wins
//! - with no match, the level registered for `""` applies, else `Debug`
//!
//! Resolved levels are cached per module name. Registering a pattern (or
//! the `""` default) clears the cache; registering an exact name only
//! replaces that name's entry.

use super::arg::Arg;
use super::backend::{Backend, Leveled, LeveledBackend};
use super::config::LevelConfig;
use super::error::{LoggerError, Result};
use super::formatter::Formatter;
use super::global;
use super::level::Level;
use super::logger::Logger;
use super::record::Record;
use glob::{MatchOptions, Pattern};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Parse a module pattern written in shell glob syntax.
///
/// Runs of `*` act as a single `*` and `[^...]` negates a set, as in
/// `[!...]`; neither crosses a `/`.
pub(crate) fn compile_pattern(
    pattern: &str,
) -> std::result::Result<Pattern, glob::PatternError> {
    Pattern::new(&normalize_glob(pattern))
}

fn normalize_glob(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                out.push('*');
                while chars.peek() == Some(&'*') {
                    chars.next();
                }
            }
            '[' => {
                out.push('[');
                if chars.peek() == Some(&'^') {
                    chars.next();
                    out.push('!');
                }
                // a leading ']' is a member of the set
                if chars.peek() == Some(&']') {
                    chars.next();
                    out.push(']');
                }
                for c in chars.by_ref() {
                    out.push(c);
                    if c == ']' {
                        break;
                    }
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Level assigned when no rule matches a module.
pub const DEFAULT_LEVEL: Level = Level::Debug;

struct LevelRule {
    pattern: Pattern,
    level: Level,
}

#[derive(Default)]
struct LevelRules {
    cache: HashMap<String, Level>,
    exact: HashMap<String, Level>,
    patterns: Vec<LevelRule>,
}

impl LevelRules {
    fn resolve(&self, module: &str) -> Level {
        if let Some(level) = self.exact.get(module) {
            return *level;
        }
        self.patterns
            .iter()
            .rev()
            .find(|rule| rule.pattern.matches_with(module, MATCH_OPTIONS))
            .map(|rule| rule.level)
            .or_else(|| self.exact.get("").copied())
            .unwrap_or(DEFAULT_LEVEL)
    }
}

struct Inner {
    rules: RwLock<LevelRules>,
    formatter: OnceLock<Arc<dyn Formatter>>,
    backend: Box<dyn Backend>,
}

/// A backend decorator with per-module level rules.
///
/// Cloning yields another handle to the same filter.
#[derive(Clone)]
pub struct ModuleLeveled {
    inner: Arc<Inner>,
}

/// Wrap `backend` with module level knobs.
///
/// A backend that already filters by level (a [`ModuleLeveled`], a
/// [`MultiBackend`](crate::backends::MultiBackend), ...) is returned as is,
/// sharing its rules, instead of gaining a second layer.
pub fn add_module_level<B: Backend + 'static>(backend: B) -> Arc<dyn LeveledBackend> {
    match backend.as_leveled() {
        Some(leveled) => leveled,
        None => Arc::new(ModuleLeveled::new(backend)),
    }
}

impl ModuleLeveled {
    pub fn new<B: Backend + 'static>(backend: B) -> Self {
        Self {
            inner: Arc::new(Inner {
                rules: RwLock::new(LevelRules::default()),
                formatter: OnceLock::new(),
                backend: Box::new(backend),
            }),
        }
    }

    /// Pin the formatter this filter attaches to records.
    ///
    /// Returns `false` when a formatter was already fixed, either by an
    /// earlier call or by the first record that passed the filter.
    pub fn set_formatter(&self, formatter: Arc<dyn Formatter>) -> bool {
        self.inner.formatter.set(formatter).is_ok()
    }

    /// The formatter attached to passing records. Resolved from the process
    /// default on first use and fixed afterwards.
    pub fn formatter(&self) -> Arc<dyn Formatter> {
        Arc::clone(self.inner.formatter.get_or_init(global::formatter))
    }

    /// Register every rule in `config`, default level first.
    pub fn apply_config(&self, config: &LevelConfig) {
        if let Some(level) = config.default {
            self.set_level(level, "");
        }
        for rule in &config.rules {
            self.set_level(rule.level, &rule.module);
        }
    }
}

impl Leveled for ModuleLeveled {
    fn get_level(&self, module: &str) -> Level {
        let cached = self.inner.rules.read().cache.get(module).copied();
        if let Some(level) = cached {
            return level;
        }

        // resolve under the write lock so a concurrent invalidation cannot
        // be overwritten by a stale entry
        let mut rules = self.inner.rules.write();
        if let Some(level) = rules.cache.get(module) {
            return *level;
        }
        let level = rules.resolve(module);
        rules.cache.insert(module.to_string(), level);
        level
    }

    fn set_level(&self, level: Level, module: &str) {
        let mut invalid = None;
        let pattern = if module.contains(|c: char| c == '*' || c == '?') {
            match compile_pattern(module) {
                Ok(pattern) => Some(pattern),
                Err(err) => {
                    invalid = Some(LoggerError::invalid_pattern(module, err.msg));
                    None
                }
            }
        } else {
            None
        };

        {
            let mut rules = self.inner.rules.write();
            match pattern {
                Some(pattern) => {
                    rules.patterns.push(LevelRule { pattern, level });
                    rules.cache.clear();
                }
                None => {
                    if module.is_empty() {
                        rules.cache.clear();
                    }
                    rules.exact.insert(module.to_string(), level);
                    rules.cache.insert(module.to_string(), level);
                }
            }
        }

        // reported after the lock is released; the report may pass through
        // this very filter
        if let Some(err) = invalid {
            report_config_error(&err);
        }
    }

    fn is_enabled_for(&self, level: Level, module: &str) -> bool {
        level.is_enabled_under(self.get_level(module))
    }
}

impl Backend for ModuleLeveled {
    fn log(&self, level: Level, calldepth: usize, record: &mut Record) -> Result<()> {
        if !self.is_enabled_for(level, &record.module) {
            return Ok(());
        }
        record.attach_formatter(self.formatter());
        self.inner.backend.log(level, calldepth + 1, record)
    }

    fn as_leveled(&self) -> Option<Arc<dyn LeveledBackend>> {
        Some(Arc::new(self.clone()))
    }
}

impl fmt::Debug for ModuleLeveled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rules = self.inner.rules.read();
        f.debug_struct("ModuleLeveled")
            .field("exact", &rules.exact)
            .field(
                "patterns",
                &rules
                    .patterns
                    .iter()
                    .map(|r| (r.pattern.as_str(), r.level))
                    .collect::<Vec<_>>(),
            )
            .field("cached", &rules.cache.len())
            .finish()
    }
}

fn report_config_error(err: &LoggerError) {
    Logger::new("logger").error("{}", vec![Arg::from(err.to_string())]);
}

// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Tracing runtime control.

use ordermap::OrderMap;
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, Registry, filter::LevelFilter, prelude::*, reload};

use crate::targets::TRACING_TARGETS;
use crate::trace_target;

trace_target!("tracectl", LevelFilter::INFO, &[]);

/// Errors of the tracing control
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TraceCtlError {
    #[error("invalid syntax '{0}': expected tag=level")]
    Syntax(String),
    #[error("invalid level '{level}' for tag '{tag}'")]
    Level { tag: String, level: String },
    #[error("unknown tag '{0}'")]
    UnknownTag(String),
    #[error("failed to reload tracing filter: {0}")]
    Reload(String),
}

/// Configuration of one registered target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetCfg {
    pub target: &'static str,
    pub name: &'static str,
    pub level: LevelFilter,
    pub tags: BTreeSet<&'static str>,
}

impl Display for TargetCfg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tags = self.tags.iter().copied().collect::<Vec<_>>().join(",");
        write!(f, "{:>40} │ {:>6} │ {tags}", self.target, self.level)
    }
}

#[derive(Debug)]
struct TargetDb {
    default: LevelFilter,
    targets: OrderMap<&'static str, TargetCfg>,
}

impl TargetDb {
    fn load(default: LevelFilter) -> Self {
        let mut db = Self {
            default,
            targets: OrderMap::new(),
        };
        for t in TRACING_TARGETS {
            let mut tags: BTreeSet<_> = t.tags.iter().copied().collect();
            tags.insert(t.name);
            let cfg = TargetCfg {
                target: t.target,
                name: t.name,
                level: t.level,
                tags,
            };
            if db.targets.insert(t.target, cfg).is_some() {
                warn!("Tracing target {} declared more than once", t.target);
            }
        }
        db
    }

    fn env_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::new(self.default.to_string());
        for t in self.targets.values() {
            match format!("{}={}", t.target, t.level).parse() {
                Ok(directive) => filter = filter.add_directive(directive),
                Err(e) => warn!("Skipping tracing target {}: {e}", t.target),
            }
        }
        filter
    }

    fn tagged_mut(&mut self, tag: &str) -> impl Iterator<Item = &mut TargetCfg> {
        self.targets
            .values_mut()
            .filter(move |t| t.tags.contains(tag))
    }
}

/// Owner of the global subscriber and of the per-target levels.
pub struct TracingControl {
    db: Mutex<TargetDb>,
    handle: reload::Handle<EnvFilter, Registry>,
}

static TRACING_CTL: OnceLock<TracingControl> = OnceLock::new();

/// Get the process-wide [`TracingControl`], installing the subscriber on first use.
pub fn get_trace_ctl() -> &'static TracingControl {
    TRACING_CTL.get_or_init(TracingControl::new)
}

impl TracingControl {
    fn new() -> Self {
        let db = TargetDb::load(LevelFilter::INFO);
        let (filter, handle) = reload::Layer::new(db.env_filter());
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_line_number(true)
            .with_target(true)
            .with_thread_names(true)
            .with_level(true);
        if let Err(e) = tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
        {
            // another subscriber (a test harness, typically) got there first
            eprintln!("tracing subscriber not installed: {e}");
        }
        Self {
            db: Mutex::new(db),
            handle,
        }
    }

    /// Make sure the subscriber is installed.
    pub fn init() {
        get_trace_ctl();
    }

    fn reload(&self, db: &TargetDb) -> Result<(), TraceCtlError> {
        self.handle
            .reload(db.env_filter())
            .map_err(|e| TraceCtlError::Reload(e.to_string()))
    }

    /// Set the level of every target carrying `tag`. Returns how many targets changed.
    ///
    /// # Errors
    ///
    /// Fails if no target carries `tag` or the filter cannot be reloaded.
    pub fn set_tag_level(&self, tag: &str, level: LevelFilter) -> Result<usize, TraceCtlError> {
        let mut db = self.db.lock();
        let mut found = false;
        let mut changed = 0;
        for t in db.tagged_mut(tag) {
            found = true;
            if t.level != level {
                t.level = level;
                changed += 1;
            }
        }
        if !found {
            return Err(TraceCtlError::UnknownTag(tag.to_string()));
        }
        if changed > 0 {
            self.reload(&db)?;
        }
        info!("Log level for tag '{tag}' set to {level}, {changed} target(s) changed");
        Ok(changed)
    }

    /// Set the level of targets not otherwise configured.
    ///
    /// # Errors
    ///
    /// Fails if the filter cannot be reloaded.
    pub fn set_default_level(&self, level: LevelFilter) -> Result<(), TraceCtlError> {
        let mut db = self.db.lock();
        if db.default != level {
            db.default = level;
            self.reload(&db)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn default_level(&self) -> LevelFilter {
        self.db.lock().default
    }

    #[must_use]
    pub fn target(&self, target: &str) -> Option<TargetCfg> {
        self.db.lock().targets.get(target).cloned()
    }

    /// Parse a comma-separated list of `tag=level` items.
    ///
    /// # Errors
    ///
    /// Fails on items without `=` or with an unknown level.
    pub fn parse_config(input: &str) -> Result<OrderMap<String, LevelFilter>, TraceCtlError> {
        input
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| {
                let (tag, level) = item
                    .split_once('=')
                    .ok_or_else(|| TraceCtlError::Syntax(item.to_string()))?;
                let (tag, level) = (tag.trim(), level.trim());
                let Ok(parsed) = LevelFilter::from_str(level) else {
                    return Err(TraceCtlError::Level {
                        tag: tag.to_string(),
                        level: level.to_string(),
                    });
                };
                Ok((tag.to_string(), parsed))
            })
            .collect()
    }

    /// Apply a `tag=level,...` configuration. The pseudo-tag `default` sets the default level.
    ///
    /// # Errors
    ///
    /// Fails if the string does not parse or names an unknown tag. Items before the
    /// failing one stay applied.
    pub fn setup_from_string(&self, input: &str) -> Result<(), TraceCtlError> {
        let config = Self::parse_config(input)?;
        for (tag, level) in &config {
            if tag == "default" {
                self.set_default_level(*level)?;
            } else {
                self.set_tag_level(tag, *level)?;
            }
        }
        Ok(())
    }

    /// The current configuration, in the format [`TracingControl::setup_from_string`] takes.
    #[must_use]
    pub fn as_config_string(&self) -> String {
        let db = self.db.lock();
        let targets = db.targets.values();
        std::iter::once(format!("default={}", db.default))
            .chain(targets.map(|t| format!("{}={}", t.name, t.level)))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Log the configuration of every target.
    pub fn dump(&self) {
        let db = self.db.lock();
        let lines: Vec<_> = db.targets.values().map(ToString::to_string).collect();
        let lines = lines.join("\n");
        info!("Tracing targets (default {}):\n{lines}", db.default);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    trace_target!("tracectl-test", LevelFilter::DEBUG, &["tracectl-tests"]);

    #[test]
    fn parse_config() {
        let config = "default=warn, translate=debug";
        let parsed = TracingControl::parse_config(config).unwrap();
        assert_eq!(parsed.get("default"), Some(&LevelFilter::WARN));
        assert_eq!(parsed.get("translate"), Some(&LevelFilter::DEBUG));
        assert!(matches!(
            TracingControl::parse_config("translate"),
            Err(TraceCtlError::Syntax(_))
        ));
        assert!(matches!(
            TracingControl::parse_config("translate=loud"),
            Err(TraceCtlError::Level { .. })
        ));
    }

    #[test]
    #[serial]
    fn registered_targets_are_known() {
        let tctl = get_trace_ctl();
        let own = tctl.target(module_path!()).unwrap();
        assert_eq!(own.name, "tracectl-test");
        assert!(own.tags.contains("tracectl-tests"));
        assert!(tctl.as_config_string().contains("tracectl-test="));
    }

    #[test]
    #[serial]
    fn change_levels_by_tag() {
        let tctl = get_trace_ctl();
        tctl.setup_from_string("tracectl-tests=error").unwrap();
        assert_eq!(
            tctl.target(module_path!()).unwrap().level,
            LevelFilter::ERROR
        );
        assert_eq!(
            tctl.set_tag_level("tracectl-tests", LevelFilter::ERROR),
            Ok(0)
        );
        assert!(matches!(
            tctl.setup_from_string("no-such-tag=info"),
            Err(TraceCtlError::UnknownTag(_))
        ));
        tctl.setup_from_string("default=debug").unwrap();
        assert_eq!(tctl.default_level(), LevelFilter::DEBUG);
        tctl.dump();
    }
}

// src/logging/registry.rs

//! Explicit logger registry.
//!
//! Maps a logger name (a tracing target prefix) to its level and handlers.
//! Asking for the same name twice never attaches a second console or file
//! handler; only the level is updated. The registry is owned by the startup
//! routine and converted into a `tracing::Dispatch` once all loggers are
//! registered.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::io;
use std::path::PathBuf;

use anyhow::Context;
use tracing::{Dispatch, Level};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry, fmt};

use crate::errors::Result;
use crate::logging::format::LineFormat;
use crate::logging::rotating::RotatingFileWriter;

/// Rotating file sink settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSinkSpec {
    pub path: PathBuf,
    pub max_bytes: u64,
    pub backup_count: usize,
}

/// What a caller asks for when requesting a logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerSpec {
    pub level: Level,
    pub file: Option<FileSinkSpec>,
}

impl LoggerSpec {
    pub fn console(level: Level) -> Self {
        Self { level, file: None }
    }

    pub fn with_file(mut self, file: FileSinkSpec) -> Self {
        self.file = Some(file);
        self
    }
}

#[derive(Debug, Clone)]
pub enum Handler {
    /// STDERR.
    Console,
    RotatingFile(RotatingFileWriter),
}

#[derive(Debug)]
pub struct Logger {
    name: String,
    level: Level,
    handlers: Vec<Handler>,
}

impl Logger {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn handlers(&self) -> &[Handler] {
        &self.handlers
    }

    pub fn console_handlers(&self) -> usize {
        self.handlers
            .iter()
            .filter(|h| matches!(h, Handler::Console))
            .count()
    }

    pub fn file_handlers(&self) -> usize {
        self.handlers
            .iter()
            .filter(|h| matches!(h, Handler::RotatingFile(_)))
            .count()
    }
}

#[derive(Debug, Default)]
pub struct LogRegistry {
    loggers: BTreeMap<String, Logger>,
}

impl LogRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the logger called `name`, creating it on first use.
    ///
    /// A new logger gets one console handler plus, if `spec.file` is set, one
    /// rotating file handler (the log directory is created). An existing
    /// logger keeps its handlers and only takes the new level.
    pub fn get_logger(&mut self, name: &str, spec: &LoggerSpec) -> Result<&Logger> {
        match self.loggers.entry(name.to_string()) {
            Entry::Occupied(entry) => {
                let logger = entry.into_mut();
                logger.level = spec.level;
                Ok(logger)
            }
            Entry::Vacant(entry) => {
                let mut handlers = vec![Handler::Console];
                if let Some(file) = &spec.file {
                    let writer =
                        RotatingFileWriter::open(&file.path, file.max_bytes, file.backup_count)
                            .with_context(|| format!("opening log file {:?}", file.path))?;
                    handlers.push(Handler::RotatingFile(writer));
                }
                Ok(entry.insert(Logger {
                    name: name.to_string(),
                    level: spec.level,
                    handlers,
                }))
            }
        }
    }

    pub fn logger(&self, name: &str) -> Option<&Logger> {
        self.loggers.get(name)
    }

    pub fn len(&self) -> usize {
        self.loggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.is_empty()
    }

    /// Build a subscriber routing each logger's events to its handlers.
    ///
    /// One console layer serves every logger that has a console handler;
    /// each file handler gets its own layer filtered to its logger.
    pub fn dispatch(&self) -> Dispatch {
        let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

        let mut console_targets = Targets::new();
        let mut any_console = false;
        for logger in self.loggers.values() {
            if logger.console_handlers() > 0 {
                console_targets = console_targets.with_target(logger.name.clone(), logger.level);
                any_console = true;
            }
        }
        if any_console {
            layers.push(
                fmt::layer()
                    .event_format(LineFormat)
                    .with_writer(io::stderr)
                    .with_ansi(false)
                    .with_filter(console_targets)
                    .boxed(),
            );
        }

        for logger in self.loggers.values() {
            for handler in &logger.handlers {
                if let Handler::RotatingFile(writer) = handler {
                    let targets = Targets::new().with_target(logger.name.clone(), logger.level);
                    layers.push(
                        fmt::layer()
                            .event_format(LineFormat)
                            .with_writer(writer.clone())
                            .with_ansi(false)
                            .with_filter(targets)
                            .boxed(),
                    );
                }
            }
        }

        Dispatch::new(tracing_subscriber::registry().with(layers))
    }
}

//
// Copyright (c) 2025 Contributors to the Eclipse Foundation
//
// See the NOTICE file(s) distributed with this work for additional
// information regarding copyright ownership.
//
// This program and the accompanying materials are made available under the
// terms of the Apache License Version 2.0 which is available at
// <https://www.apache.org/licenses/LICENSE-2.0>
//
// SPDX-License-Identifier: Apache-2.0
//

use std::{fs::File, path::PathBuf};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::{self, format};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry};

pub use tracing::Level;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Debug)]
pub enum InitError {
    /// The log file could not be created.
    LogFile(std::io::Error),
    /// Another global subscriber was installed before.
    AlreadyInitialized,
}

impl From<std::io::Error> for InitError {
    fn from(err: std::io::Error) -> Self {
        InitError::LogFile(err)
    }
}

pub struct TracingLibrary {
    log_level: Level,
    enable_logging: bool,
    log_file: Option<PathBuf>,

    file_writer_guard: Option<WorkerGuard>,
}

pub struct TracingLibraryBuilder {
    log_level: Level,
    enable_logging: bool,
    log_file: Option<PathBuf>,
}

impl Default for TracingLibraryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TracingLibraryBuilder {
    pub fn new() -> Self {
        Self {
            log_level: Level::INFO,
            enable_logging: false,
            log_file: None,
        }
    }

    ///
    /// Level used when `RUST_LOG` is not set. `RUST_LOG` directives always take precedence.
    ///
    pub fn global_log_level(mut self, level: Level) -> Self {
        self.log_level = level;
        self
    }

    ///
    /// Enables logging to stdout
    ///
    pub fn enable_logging(mut self, enable: bool) -> Self {
        self.enable_logging = enable;
        self
    }

    ///
    /// Additionally writes all log lines into `path`. The file is written from a background thread which is flushed
    /// when the [`TracingLibrary`] is dropped.
    ///
    pub fn log_to_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    pub fn build(self) -> TracingLibrary {
        TracingLibrary {
            log_level: self.log_level,
            enable_logging: self.enable_logging,
            log_file: self.log_file,
            file_writer_guard: None,
        }
    }
}

impl TracingLibrary {
    ///
    /// Installs the configured layers as global subscriber.
    ///
    /// Nothing is installed if neither stdout logging nor a log file is configured.
    ///
    pub fn init_log_trace(&mut self) -> Result<(), InitError> {
        let mut layers: Option<BoxedLayer> = None;

        if self.enable_logging {
            let stdout_layer = fmt::layer()
                .with_writer(std::io::stdout)
                .event_format(format::Format::default().with_thread_ids(true))
                .with_filter(self.filter());

            layers = Some(stdout_layer.boxed());
        }

        if let Some(path) = &self.log_file {
            let (writer, guard) = tracing_appender::non_blocking(File::create(path)?);
            self.file_writer_guard = Some(guard);

            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .event_format(format::Format::default().with_thread_ids(true))
                .with_filter(self.filter());

            layers = Some(match layers {
                Some(l) => l.and_then(file_layer).boxed(),
                None => file_layer.boxed(),
            });
        }

        match layers {
            Some(layer) => {
                tracing::subscriber::set_global_default(Registry::default().with(layer)).map_err(|_| InitError::AlreadyInitialized)
            }
            None => Ok(()),
        }
    }

    pub fn log_level(&self) -> Level {
        self.log_level
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(self.log_level).into())
            .from_env_lossy()
    }
}

// Copyright (c) 2026 clusterscope developers.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Process-wide log setup driven by [`LoggingOptions`].

use tracing::{Level, info};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::reload::Handle;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, Registry};

use clusterscope_types::config::{LogFormat, LoggingOptions};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot parse log filter '{filter}': {source}")]
    LogDirectiveParseError {
        filter: String,
        #[source]
        source: ParseError,
    },
    #[error("a global log subscriber is already installed: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

fn parse_filter(filter: &str) -> Result<EnvFilter, Error> {
    EnvFilter::try_new(filter).map_err(|source| Error::LogDirectiveParseError {
        filter: filter.to_owned(),
        source,
    })
}

fn build_logging_layer<S>(opts: &LoggingOptions) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'span> tracing_subscriber::registry::LookupSpan<'span>,
{
    match opts.log_format {
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_writer(
                // Write WARN and ERR to stderr, everything else to stdout
                std::io::stderr
                    .with_max_level(Level::WARN)
                    .or_else(std::io::stdout),
            )
            .with_ansi(!opts.log_disable_ansi_codes)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_ansi(!opts.log_disable_ansi_codes)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .boxed(),
    }
}

/// Installs the global log subscriber. The returned [`LoggingGuard`] allows changing the log
/// filter afterwards.
///
/// Fails if the filter does not parse or if a global subscriber was already installed.
pub fn init_logging(opts: &LoggingOptions) -> Result<LoggingGuard, Error> {
    let filter = parse_filter(&opts.log_filter)?;
    let (filter, reload_handle) = tracing_subscriber::reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(build_logging_layer(opts).with_filter(filter))
        .try_init()?;

    Ok(LoggingGuard { reload_handle })
}

#[derive(Debug)]
pub struct LoggingGuard {
    reload_handle: Handle<EnvFilter, Registry>,
}

impl LoggingGuard {
    /// Swaps the active filter. The previous filter stays in place if the new one is invalid.
    pub fn reload_log_filter(&self, log_filter: &str) -> Result<(), Error> {
        let new_filter = parse_filter(log_filter)?;
        info!("Setting log filter to '{}'", log_filter);
        // reloading only fails once the subscriber is gone, in which case nothing logs anyway
        let _ = self.reload_handle.modify(|f| *f = new_filter);
        Ok(())
    }
}

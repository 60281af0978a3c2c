//! Unified application error type.
//!
//! Everything that can abort the program funnels into [`AppError`] so
//! `main` propagates a single type with `?`.

use crate::config::ConfigError;
use crate::filter::FilterError;
use crate::monitor::MonitorError;
use crate::port::PortError;
use thiserror::Error;

/// Fatal, program-ending failures.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid scan filter: {0}")]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Port(#[from] PortError),

    #[error(transparent)]
    Monitor(#[from] MonitorError),

    #[error("failed to install Ctrl-C handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

//! Error types for spotlaunch

use std::time::Duration;
use thiserror::Error;

/// Spotlaunch result type
pub type Result<T> = std::result::Result<T, SpotError>;

/// Errors that can occur while acquiring capacity or reporting prices
#[derive(Error, Debug)]
pub enum SpotError {
    /// AWS SDK error
    #[error("AWS error: {0}")]
    Aws(#[from] aws_sdk_ec2::Error),

    /// The provider rejected the initial spot request. Fatal, no retry:
    /// a malformed request will not succeed on a second attempt.
    #[error("spot request submission rejected: {0}")]
    Submission(#[source] aws_sdk_ec2::Error),

    /// A spot request entered a terminal non-active state. The whole
    /// batch is invalidated; no partial result is returned.
    #[error(
        "spot request {request_id} entered terminal state '{state}' (fault: {fault}; status: {status})"
    )]
    Acquisition {
        /// Provider-assigned spot request id
        request_id: String,
        /// Provider-reported state that caused the abort
        state: String,
        /// Provider fault message, verbatim
        fault: String,
        /// Provider status message, verbatim
        status: String,
    },

    /// Polling exceeded the maximum wait bound
    #[error("spot requests not fulfilled within {0:?}")]
    AcquisitionTimeout(Duration),

    /// The caller cancelled the acquisition mid-poll
    #[error("acquisition cancelled")]
    Cancelled,

    /// An instance-type identifier could not be parsed for ranking.
    /// Fatal for report generation: silently dropping a type would
    /// produce a misleading report.
    #[error("unrecognized instance type: {0}")]
    UnrecognizedInstanceType(String),

    /// No preset with the given name exists in the config file
    #[error("unknown instance preset: {0}")]
    UnknownPreset(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SpotError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Convert from EC2 SDK error
    pub fn from_ec2<E>(err: E) -> Self
    where
        aws_sdk_ec2::Error: From<E>,
    {
        Self::Aws(aws_sdk_ec2::Error::from(err))
    }

    /// Convert from EC2 SDK error raised at submission time
    pub fn submission<E>(err: E) -> Self
    where
        aws_sdk_ec2::Error: From<E>,
    {
        Self::Submission(aws_sdk_ec2::Error::from(err))
    }
}

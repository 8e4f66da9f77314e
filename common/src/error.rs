use std::process::ExitStatus;

use thiserror::Error;

/// Why address detection produced nothing.
///
/// Callers that only care about "an address or not" collapse this to `None`
/// at the reporting boundary; the variants exist so tests and diagnostics
/// can tell a missing tool apart from a network with no private address.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {status}")]
    CommandStatus {
        command: &'static str,
        status: ExitStatus,
    },
    #[error("no private IPv4 address in interface listing")]
    NoPrivateAddress,
}

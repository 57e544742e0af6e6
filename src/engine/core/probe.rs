// Encoder discovery through the bridge

use super::command::{PathStyle, version_command};
use super::types::EncoderHandle;
use crate::engine::bridge::{BridgeError, DesktopBridge};

/// Ask the bridge where the encoder lives.
///
/// An unreachable bridge is an expected mode and yields "not available" with no error.
pub async fn probe(bridge: &dyn DesktopBridge) -> EncoderHandle {
    match bridge.check_encoder_availability().await {
        Ok(report) => {
            let path = report.path.filter(|p| !p.trim().is_empty());
            // A report that claims availability without a path is not usable
            let available = report.is_available && path.is_some();
            let error = match (&report.error, available, report.is_available) {
                (Some(e), _, _) => Some(e.clone()),
                (None, false, true) => Some("encoder reported available without a path".into()),
                _ => None,
            };
            if available {
                tracing::info!(path = path.as_deref().unwrap_or_default(), "encoder found");
            } else {
                tracing::info!(error = error.as_deref().unwrap_or("none"), "encoder not available");
            }
            EncoderHandle {
                path,
                available,
                error,
            }
        }
        Err(BridgeError::Unavailable) => {
            tracing::debug!("no desktop bridge, encoder disabled");
            EncoderHandle::unavailable(None)
        }
        Err(e) => {
            tracing::warn!(error = %e, "encoder probe failed");
            EncoderHandle::unavailable(Some(e.to_string()))
        }
    }
}

/// Run `<encoder> -version` and return the first line, if any
pub async fn query_version(
    bridge: &dyn DesktopBridge,
    encoder_path: &str,
    style: PathStyle,
) -> Option<String> {
    let cmd = match version_command(encoder_path, style) {
        Ok(cmd) => cmd,
        Err(e) => {
            tracing::debug!(error = %e, "encoder version query not attempted");
            return None;
        }
    };
    match bridge.run_command(cmd.as_str()).await {
        Ok(out) if out.success() => parse_version_line(&out.stdout),
        Ok(out) => {
            tracing::debug!(exit_code = ?out.exit_code, "encoder version query failed");
            None
        }
        Err(e) => {
            tracing::debug!(error = %e, "encoder version query failed");
            None
        }
    }
}

/// First non-empty line of `-version` output
pub fn parse_version_line(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

// Maps raw encoder failure text onto the closed error taxonomy

use super::error::{EncodeError, ErrorKind};

const PERMISSION_SIGNALS: &[&str] = &[
    "permission denied",
    "eacces",
    "eperm",
    "access is denied",
    "operation not permitted",
];

// "(os error 2)" is how a failed spawn of a missing program renders; ffmpeg's own
// "No such file or directory" for a missing input never carries it.
const MISSING_BINARY_SIGNALS: &[&str] = &[
    "enoent",
    "(os error 2)",
    "command not found",
    "is not recognized as an internal or external command",
    "cannot find the file specified",
    "executable not found",
];

const INVALID_ARGUMENT_SIGNALS: &[&str] = &[
    "invalid argument",
    "einval",
    "error opening input",
    "invalid data found",
    "unrecognized option",
    "option not found",
    "no such filter",
    "error parsing",
    "no such file or directory",
    "could not find codec parameters",
];

/// Number of trailing lines of raw output kept for diagnostics
const DETAIL_TAIL_LINES: usize = 10;

/// Classify a raw failure report. Total: every input yields a structured error.
pub fn classify(raw: &str) -> EncodeError {
    let kind = classify_kind(raw);
    let message = match kind {
        ErrorKind::PermissionDenied => "Encoder was denied access to a file or directory",
        ErrorKind::MissingBinary => "Encoder binary could not be found or started",
        ErrorKind::InvalidArguments => "Encoder rejected its input or arguments",
        _ => "Encoder failed",
    };
    EncodeError::new(kind, message).with_detail(tail(raw, DETAIL_TAIL_LINES))
}

/// Classify a finished process that exited unsuccessfully
pub fn classify_exit(exit_code: Option<i32>, stderr: &str) -> EncodeError {
    let mut err = classify(stderr);
    if err.kind == ErrorKind::UnknownEncoderFailure {
        err.message = match exit_code {
            Some(code) => format!("Encoder exited with status {}", code),
            None => "Encoder was terminated without an exit status".to_string(),
        };
    }
    err
}

pub fn classify_kind(raw: &str) -> ErrorKind {
    let lowered = raw.to_lowercase();
    let hit = |signals: &[&str]| signals.iter().any(|s| lowered.contains(s));

    if hit(PERMISSION_SIGNALS) {
        ErrorKind::PermissionDenied
    } else if hit(MISSING_BINARY_SIGNALS) {
        ErrorKind::MissingBinary
    } else if hit(INVALID_ARGUMENT_SIGNALS) {
        ErrorKind::InvalidArguments
    } else {
        ErrorKind::UnknownEncoderFailure
    }
}

fn tail(raw: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = raw.trim_end().lines().collect();
    if lines.len() > max_lines {
        lines[lines.len() - max_lines..].join("\n")
    } else {
        lines.join("\n")
    }
}

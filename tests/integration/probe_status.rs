// Memoized availability probe and status reporting

use crate::common::frames;
use crate::common::mock_bridge::{Call, MOCK_ENCODER, MockBridge};
use gifsmith::engine::{
    CommandOutput, DetachedBridge, EncodeOptions, ErrorKind, GifHandler, PREVIEW_WORKSPACE_DIR,
    PathStyle,
};
use std::path::Path;
use std::sync::Arc;

#[tokio::test]
async fn test_probe_runs_once() {
    let bridge = Arc::new(MockBridge::available());
    let gif = GifHandler::new(bridge.clone()).with_path_style(PathStyle::Posix);

    let first = gif.ensure_ready().await.clone();
    let second = gif.ensure_ready().await.clone();
    gif.convert(&frames(1), Path::new("/o.gif"), &EncodeOptions::default())
        .await
        .unwrap();

    assert_eq!(first, second);
    assert!(first.available);
    assert_eq!(first.path.as_deref(), Some(MOCK_ENCODER));
    assert_eq!(bridge.count(|c| *c == Call::CheckAvailability), 1);
}

#[tokio::test]
async fn test_concurrent_first_use_shares_one_probe() {
    let bridge = Arc::new(MockBridge::available());
    let gif = GifHandler::new(bridge.clone());

    let (a, b) = tokio::join!(gif.ensure_ready(), gif.ensure_ready());
    assert_eq!(a, b);
    assert_eq!(bridge.count(|c| *c == Call::CheckAvailability), 1);
}

#[tokio::test]
async fn test_reinitialize_probes_again() {
    let bridge = Arc::new(MockBridge::available());
    let mut gif = GifHandler::new(bridge.clone());

    gif.ensure_ready().await;
    gif.reinitialize();
    gif.ensure_ready().await;

    assert_eq!(bridge.count(|c| *c == Call::CheckAvailability), 2);
}

#[tokio::test]
async fn test_detached_bridge_reports_unavailable_without_error() {
    let gif = GifHandler::new(Arc::new(DetachedBridge));
    let handle = gif.ensure_ready().await;
    assert!(!handle.available);
    assert_eq!(handle.error, None);

    let status = gif.status().await;
    assert!(!status.available);
    assert_eq!(status.version, None);
}

#[tokio::test]
async fn test_status_reports_version() {
    let bridge = Arc::new(MockBridge::available().with_command_results(vec![Ok(CommandOutput {
        stdout: "ffmpeg version 7.0.2 Copyright (c) 2000-2024 the FFmpeg developers\nbuilt with gcc\n"
            .to_string(),
        stderr: String::new(),
        exit_code: Some(0),
    })]));
    let gif = GifHandler::new(bridge.clone()).with_path_style(PathStyle::Posix);

    let status = gif.status().await;
    assert!(status.available);
    assert_eq!(status.path.as_deref(), Some(MOCK_ENCODER));
    assert_eq!(
        status.version.as_deref(),
        Some("ffmpeg version 7.0.2 Copyright (c) 2000-2024 the FFmpeg developers")
    );
    assert_eq!(bridge.commands(), vec![format!("{} -version", MOCK_ENCODER)]);
}

#[tokio::test]
async fn test_status_without_encoder_runs_nothing() {
    let bridge = Arc::new(MockBridge::unavailable(Some("not found")));
    let gif = GifHandler::new(bridge.clone());

    let status = gif.status().await;
    assert!(!status.available);
    assert_eq!(status.path, None);
    assert!(bridge.commands().is_empty());
}

#[tokio::test]
async fn test_preview_commands_touch_no_workspace() {
    let bridge = Arc::new(MockBridge::available());
    let gif = GifHandler::new(bridge.clone()).with_path_style(PathStyle::Posix);

    let pair = gif
        .preview_commands(Path::new("/exports/p.gif"), &EncodeOptions::default())
        .await
        .unwrap();

    assert!(pair.palette.as_str().contains(PREVIEW_WORKSPACE_DIR));
    assert!(pair.gif.as_str().contains(PREVIEW_WORKSPACE_DIR));
    assert_eq!(bridge.calls(), vec![Call::CheckAvailability]);
}

#[tokio::test]
async fn test_preview_requires_encoder() {
    let gif = GifHandler::new(Arc::new(DetachedBridge));
    let err = gif
        .preview_commands(Path::new("/exports/p.gif"), &EncodeOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::EncoderUnavailable);
}

#[tokio::test]
async fn test_preview_rejects_unquotable_output() {
    let bridge = Arc::new(MockBridge::available());
    let gif = GifHandler::new(bridge.clone()).with_path_style(PathStyle::Posix);
    let err = gif
        .preview_commands(Path::new("/exports/bad\0name.gif"), &EncodeOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArguments);
}

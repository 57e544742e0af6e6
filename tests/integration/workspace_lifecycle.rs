// Workspace acquisition/release accounting across every exit path

use crate::common::frames;
use crate::common::mock_bridge::{Call, MockBridge, failed_output, ok_output};
use gifsmith::engine::{EncodeOptions, ErrorKind, GifHandler, PathStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn assert_balanced(bridge: &MockBridge) {
    let created = bridge.created_dirs();
    let removed = bridge.removed_dirs();
    assert_eq!(
        created,
        removed.len(),
        "acquired {} workspaces but released {:?}",
        created,
        removed
    );
    let mut unique = removed.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), removed.len(), "workspace released twice");
}

async fn run(bridge: MockBridge) -> (Arc<MockBridge>, Result<(), ErrorKind>) {
    let bridge = Arc::new(bridge);
    let gif = GifHandler::new(bridge.clone()).with_path_style(PathStyle::Posix);
    let result = gif
        .convert(&frames(6), Path::new("/exports/x.gif"), &EncodeOptions::default())
        .await
        .map_err(|e| e.kind);
    (bridge, result)
}

#[tokio::test]
async fn test_release_on_every_path() {
    let cases: Vec<(&str, MockBridge, Result<(), ErrorKind>)> = vec![
        ("success", MockBridge::available(), Ok(())),
        (
            "frame write",
            MockBridge::available().failing_frame_at(0),
            Err(ErrorKind::FrameWriteFailed),
        ),
        (
            "empty listing",
            MockBridge::available().with_file_count(0),
            Err(ErrorKind::EmptyInputDirectory),
        ),
        (
            "palette stage",
            MockBridge::available()
                .with_command_results(vec![Ok(failed_output(1, "Unrecognized option 'x'"))]),
            Err(ErrorKind::InvalidArguments),
        ),
        (
            "gif stage",
            MockBridge::available().with_command_results(vec![
                Ok(ok_output()),
                Ok(failed_output(1, "boom")),
            ]),
            Err(ErrorKind::UnknownEncoderFailure),
        ),
        (
            "spawn failure",
            MockBridge::available().with_command_results(vec![Err("spawn ffmpeg ENOENT".into())]),
            Err(ErrorKind::MissingBinary),
        ),
        (
            "no workspace",
            MockBridge::available().failing_temp_dir(),
            Err(ErrorKind::WorkspaceCreationFailed),
        ),
        (
            "unavailable",
            MockBridge::unavailable(None),
            Err(ErrorKind::EncoderUnavailable),
        ),
    ];

    for (name, bridge, expected) in cases {
        let (bridge, result) = run(bridge).await;
        assert_eq!(result, expected, "case '{}'", name);
        assert_balanced(&bridge);
    }
}

#[tokio::test]
async fn test_cleanup_failure_does_not_mask_primary_error() {
    let (bridge, result) = run(MockBridge::available()
        .failing_cleanup()
        .with_command_results(vec![Ok(failed_output(1, "output.gif: Permission denied"))]))
    .await;
    assert_eq!(result, Err(ErrorKind::PermissionDenied));
    assert_eq!(bridge.removed_dirs().len(), 1);
}

#[tokio::test]
async fn test_cleanup_failure_does_not_fail_success() {
    let (bridge, result) = run(MockBridge::available().failing_cleanup()).await;
    assert_eq!(result, Ok(()));
    assert_eq!(bridge.removed_dirs().len(), 1);
}

#[tokio::test]
async fn test_release_happens_before_return_on_success() {
    let (bridge, _) = run(MockBridge::available()).await;
    assert_eq!(
        bridge.calls().last(),
        Some(&Call::RemoveDirectory(PathBuf::from("/mock/tmp/gifsmith_1")))
    );
}

#[tokio::test]
async fn test_each_call_gets_its_own_workspace() {
    let bridge = Arc::new(MockBridge::available());
    let gif = GifHandler::new(bridge.clone()).with_path_style(PathStyle::Posix);
    let out = Path::new("/exports/x.gif");

    gif.convert(&frames(2), out, &EncodeOptions::default()).await.unwrap();
    gif.convert(&frames(2), out, &EncodeOptions::default()).await.unwrap();

    assert_eq!(
        bridge.removed_dirs(),
        vec![
            PathBuf::from("/mock/tmp/gifsmith_1"),
            PathBuf::from("/mock/tmp/gifsmith_2"),
        ]
    );
    assert_balanced(&bridge);
}

#[tokio::test]
async fn test_failed_acquisition_is_not_a_workspace() {
    let (bridge, result) = run(MockBridge::available().failing_temp_dir()).await;

    assert_eq!(result, Err(ErrorKind::WorkspaceCreationFailed));
    assert_eq!(bridge.count(|c| matches!(c, Call::CreateTempDirectory)), 1);
    assert_eq!(bridge.created_dirs(), 0);
    assert!(bridge.removed_dirs().is_empty());
    assert_balanced(&bridge);
}

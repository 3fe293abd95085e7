mod common;

use std::io::Cursor;
use std::sync::mpsc;

use common::{FakePlatform, builtin_dispatcher};
use hostbridge::bridge::ChannelRouter;
use hostbridge::model::envelope::{FailureKind, ResponseEnvelope};
use hostbridge::transport::{self, ResponseFrame};

fn run(input: &str) -> Vec<ResponseFrame> {
    run_bytes(input.as_bytes())
}

fn run_bytes(input: &[u8]) -> Vec<ResponseFrame> {
    let router = ChannelRouter::new(
        vec!["hostbridge".to_string(), "io.hostbridge/platform".to_string()],
        builtin_dispatcher(FakePlatform::ios()),
    );

    let (tx, rx) = mpsc::channel();
    transport::spawn_reader(Cursor::new(input.to_vec()), tx);

    let mut out = Vec::new();
    transport::serve(&router, rx, &mut out).unwrap();

    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn one_reply_per_frame_in_order() {
    let replies = run(concat!(
        r#"{"id": 1, "channel": "io.hostbridge/platform", "method": "getPlatformVersion"}"#,
        "\n",
        r#"{"id": 2, "method": "isPackageInstalled", "arguments": {"identifier": "gitd"}}"#,
        "\n",
        r#"{"id": 3, "channel": "elsewhere", "method": "getPlatformVersion"}"#,
        "\n",
        "garbage\n",
    ));

    assert_eq!(replies.len(), 4);
    assert_eq!(
        replies[0],
        ResponseFrame {
            id: Some(1),
            response: ResponseEnvelope::success("iOS 17.0"),
        }
    );
    assert_eq!(replies[1].response, ResponseEnvelope::success(true));
    assert_eq!(
        replies[2].response,
        ResponseEnvelope::failure(FailureKind::MethodNotFound, "elsewhere/getPlatformVersion")
    );
    assert_eq!(replies[3].id, None);
    assert_eq!(
        replies[3].response.failure_kind(),
        Some(FailureKind::InvalidArguments)
    );
}

#[test]
fn invalid_utf8_frame_does_not_stop_the_loop() {
    let mut input = b"{\"id\": 1, \"method\": \"get\xff\xfeVersion\"}\n".to_vec();
    input.extend_from_slice(b"{\"id\": 2, \"method\": \"getPlatformVersion\"}\n");

    let replies = run_bytes(&input);
    assert_eq!(replies.len(), 2);
    assert_eq!(
        replies[0].response.failure_kind(),
        Some(FailureKind::InvalidArguments)
    );
    assert_eq!(
        replies[1],
        ResponseFrame {
            id: Some(2),
            response: ResponseEnvelope::success("iOS 17.0"),
        }
    );
}

#[test]
fn malformed_frame_between_valid_frames() {
    let replies = run(concat!(
        r#"{"id": 1, "method": "getPlatformVersion"}"#,
        "\n",
        r#"{"id": 2, "method": 42}"#,
        "\n",
        r#"{"id": 3, "method": "getPlatformVersion"}"#,
        "\n",
    ));

    assert_eq!(replies.len(), 3);
    assert!(replies[0].response.is_success());
    assert_eq!(replies[1].id, Some(2));
    assert_eq!(
        replies[1].response.failure_kind(),
        Some(FailureKind::InvalidArguments)
    );
    assert_eq!(replies[2].id, Some(3));
    assert!(replies[2].response.is_success());
}

#[test]
fn null_arguments_are_an_empty_bag() {
    let replies = run(concat!(
        r#"{"id": 5, "method": "getPlatformVersion", "arguments": null}"#,
        "\n",
        r#"{"id": 6, "method": "isPackageInstalled", "arguments": null}"#,
        "\n",
    ));

    assert_eq!(replies[0].response, ResponseEnvelope::success("iOS 17.0"));
    assert_eq!(
        replies[1].response,
        ResponseEnvelope::failure(
            FailureKind::InvalidArguments,
            "missing required argument: identifier"
        )
    );
}

#[test]
fn final_frame_without_newline_is_answered() {
    let replies = run(r#"{"id": 8, "method": "getPlatformVersion"}"#);
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].id, Some(8));
}

#[test]
fn empty_input_answers_nothing() {
    assert!(run("").is_empty());
}

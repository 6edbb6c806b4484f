//! Integration tests for pipeline orchestration: validation, output
//! directory handling, and outcome classification over a faked pipeline.

mod common;

use common::{config_with_pipeline, TestHarness};

async fn post_process(
    addr: std::net::SocketAddr,
    body: serde_json::Value,
) -> (reqwest::StatusCode, serde_json::Value) {
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://{addr}/process"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status();
    let body: serde_json::Value = resp.json().await.unwrap();
    (status, body)
}

#[tokio::test]
async fn missing_input_folder_is_400() {
    let (_h, addr) = TestHarness::with_server().await;

    let (status, body) = post_process(addr, serde_json::json!({})).await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn nonexistent_input_folder_is_404_and_mutates_nothing() {
    let (h, addr) =
        TestHarness::with_server_config(config_with_pipeline("echo processed")).await;

    let (status, _) = post_process(
        addr,
        serde_json::json!({"inputFolder": "ghost", "outputFolder": "ghost-out"}),
    )
    .await;
    assert_eq!(status, 404);

    // The output directory must not have been created.
    assert!(!h.root_path().join("ghost-out").exists());
}

#[tokio::test]
async fn default_output_folder_is_created_and_reported() {
    let (h, addr) =
        TestHarness::with_server_config(config_with_pipeline("echo processed")).await;
    h.mkdir("episode");

    let (status, body) = post_process(addr, serde_json::json!({"inputFolder": "episode"})).await;
    assert_eq!(status, 200);

    let expected = h.root_path().join("episode").join("Viral_Clips");
    assert!(expected.is_dir());
    assert_eq!(
        body["outputFolder"].as_str().unwrap(),
        expected.to_str().unwrap()
    );
    assert_eq!(body["message"], "Videos processed successfully");
    assert!(body["output"].as_str().unwrap().contains("processed"));
}

#[tokio::test]
async fn explicit_output_folder_is_used() {
    let (h, addr) =
        TestHarness::with_server_config(config_with_pipeline("echo processed")).await;
    h.mkdir("episode");

    let (status, body) = post_process(
        addr,
        serde_json::json!({"inputFolder": "episode", "outputFolder": "finished/clips"}),
    )
    .await;
    assert_eq!(status, 200);

    let expected = h.root_path().join("finished").join("clips");
    assert!(expected.is_dir());
    assert_eq!(
        body["outputFolder"].as_str().unwrap(),
        expected.to_str().unwrap()
    );
}

#[tokio::test]
async fn existing_output_folder_is_not_an_error() {
    let (h, addr) =
        TestHarness::with_server_config(config_with_pipeline("echo processed")).await;
    h.mkdir("episode/Viral_Clips");

    let (status, _) = post_process(addr, serde_json::json!({"inputFolder": "episode"})).await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn pipeline_receives_input_and_output_directories() {
    // The fake pipeline writes its argv into the output directory, proving
    // the two positional arguments arrive as absolute paths.
    let (h, addr) = TestHarness::with_server_config(config_with_pipeline(
        r#"printf '%s\n%s\n' "$0" "$1" > "$1/argv.txt""#,
    ))
    .await;
    h.mkdir("episode");

    let (status, _) = post_process(addr, serde_json::json!({"inputFolder": "episode"})).await;
    assert_eq!(status, 200);

    let recorded =
        std::fs::read_to_string(h.root_path().join("episode/Viral_Clips/argv.txt")).unwrap();
    let mut lines = recorded.lines();
    assert_eq!(
        lines.next().unwrap(),
        h.root_path().join("episode").to_str().unwrap()
    );
    assert_eq!(
        lines.next().unwrap(),
        h.root_path().join("episode/Viral_Clips").to_str().unwrap()
    );
}

#[tokio::test]
async fn stderr_output_classifies_as_failure() {
    let (h, addr) = TestHarness::with_server_config(config_with_pipeline(
        "echo 'Traceback (most recent call last):' >&2",
    ))
    .await;
    h.mkdir("episode");

    let (status, body) = post_process(addr, serde_json::json!({"inputFolder": "episode"})).await;
    assert_eq!(status, 500);
    assert_eq!(body["code"], "job_failed");
    assert!(body["details"].as_str().unwrap().contains("Traceback"));
}

#[tokio::test]
async fn info_logging_on_stderr_is_still_success() {
    let (h, addr) = TestHarness::with_server_config(config_with_pipeline(
        "echo '2024-10-02 - INFO - Transcribing video' >&2",
    ))
    .await;
    h.mkdir("episode");

    let (status, body) = post_process(addr, serde_json::json!({"inputFolder": "episode"})).await;
    assert_eq!(status, 200);
    assert!(body["output"].as_str().unwrap().contains("INFO"));
}

#[tokio::test]
async fn nonzero_exit_classifies_as_failure() {
    let (h, addr) = TestHarness::with_server_config(config_with_pipeline("exit 3")).await;
    h.mkdir("episode");

    let (status, body) = post_process(addr, serde_json::json!({"inputFolder": "episode"})).await;
    assert_eq!(status, 500);
    assert_eq!(body["code"], "job_failed");
}

#[tokio::test]
async fn missing_pipeline_program_is_process_start_error() {
    let mut config = clipforged::config::Config::default();
    config.pipeline.program = "clipforged-no-such-binary".to_string();
    config.pipeline.args = vec![];
    let (h, addr) = TestHarness::with_server_config(config).await;
    h.mkdir("episode");

    let (status, body) = post_process(addr, serde_json::json!({"inputFolder": "episode"})).await;
    assert_eq!(status, 500);
    assert_eq!(body["code"], "process_start_error");
}

#[tokio::test]
async fn job_timeout_classifies_as_failure() {
    let mut config = config_with_pipeline("sleep 30");
    config.pipeline.timeout_secs = Some(1);
    let (h, addr) = TestHarness::with_server_config(config).await;
    h.mkdir("episode");

    let (status, body) = post_process(addr, serde_json::json!({"inputFolder": "episode"})).await;
    assert_eq!(status, 500);
    assert_eq!(body["code"], "job_failed");
    assert!(body["details"].as_str().unwrap().contains("timed out"));
}

//! Step generation against a local fake chat-completions endpoint

use axum::routing::post;
use axum::{Json, Router};
use fotodesk_steps::generator::fallback_steps;
use fotodesk_steps::{PlanStore, StepGenerator, TaskSession};
use serde_json::{json, Value};

/// Spawn a chat-completions endpoint returning `completion` as message text
async fn spawn_fake_llm(completion: &'static str) -> String {
    let app = Router::new().route(
        "/chat/completions",
        post(move |_body: Json<Value>| async move {
            Json(json!({
                "choices": [
                    { "message": { "role": "assistant", "content": completion } }
                ]
            }))
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake llm");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve fake llm");
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn completion_lines_become_steps() {
    let base_url =
        spawn_fake_llm("- unpack boxes\n- label shelves\n- sort prints by year").await;
    let generator = StepGenerator::with_config(base_url, Some("test-key".to_string()));

    let steps = generator.generate("organize the archive").await;
    assert_eq!(
        steps,
        vec!["unpack boxes", "label shelves", "sort prints by year"]
    );
}

#[tokio::test]
async fn blank_completion_falls_back() {
    let base_url = spawn_fake_llm("\n\n  \n").await;
    let generator = StepGenerator::with_config(base_url, Some("test-key".to_string()));

    let steps = generator.generate("organize the archive").await;
    assert_eq!(steps, fallback_steps("organize the archive"));
}

#[tokio::test]
async fn session_persists_generated_steps() {
    let base_url = spawn_fake_llm("1. charge batteries\n2. pack lenses").await;
    let dir = tempfile::tempdir().unwrap();

    let mut session = TaskSession::open(
        PlanStore::new(dir.path().join("tasks.json")),
        StepGenerator::with_config(base_url, Some("test-key".to_string())),
    );
    session.submit_task("prepare the shoot").await.unwrap();

    assert_eq!(session.progress(), (0, 2));
    assert_eq!(session.current_step(), Some("charge batteries"));
    assert!(dir.path().join("tasks.json").is_file());
}

use std::time::Duration;

use homework_core::{spawn_poller, HomeworkPoller, PollCursor, PracticumClient, TelegramNotifier};
use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn spawned_poller_keeps_cycling_after_failures() {
    let server = MockServer::start().await;
    // The first poll gets a 500, the retry sees the homework.
    Mock::given(method("GET"))
        .and(path("/statuses/"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/statuses/"))
        .and(query_param("from_date", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "homeworks": [{"homework_name": "hw1", "status": "rejected"}],
            "current_date": 1000
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/statuses/"))
        .and(query_param("from_date", "1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"homeworks": [], "current_date": 1000})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/botTOKEN/sendMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let client = Client::new();
    let source = PracticumClient::new(client.clone(), format!("{}/statuses/", server.uri()), "secret");
    let notifier = TelegramNotifier::new(client, server.uri(), "TOKEN", "42");
    let handle = spawn_poller(
        HomeworkPoller::new(source, notifier, PollCursor::new(0)),
        Duration::from_millis(50),
    );

    tokio::time::sleep(Duration::from_millis(500)).await;
    handle.stop().await.expect("stop poller");

    let requests = server.received_requests().await.expect("request recording enabled");
    let sent: Vec<String> = requests
        .iter()
        .filter(|request| request.method.as_str() == "POST")
        .map(|request| String::from_utf8_lossy(&request.body).into_owned())
        .collect();
    assert_eq!(sent.len(), 2, "one diagnostic and one status message");
    assert!(sent[0].contains("Сбой в работе программы"));
    assert!(sent[1].contains("hw1"));

    let polls = requests
        .iter()
        .filter(|request| request.method.as_str() == "GET")
        .count();
    assert!(polls >= 3, "poller should keep going after the failure");
}

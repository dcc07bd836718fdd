#![cfg(feature = "remote")]

//! End-to-end tests over real HTTP using tiny_http mock servers.

use std::time::Duration;

use linkpage::controller::RefreshController;
use linkpage::error::Error;
use linkpage::fetch::{HttpDocumentSource, HttpProfileSource};
use linkpage::{PageConfig, Viewport};

const USER_DOCUMENT: &str =
    r#"{"links":[{"name":"Blog","url":"example.com"}],"bio":"hello","githubUsername":"octocat"}"#;

const PROFILE_RECORD: &str =
    r#"{"login":"octocat","avatar_url":"https://avatars.test/u/583231"}"#;

fn config(profile_api_base: String) -> PageConfig {
    PageConfig {
        viewport: Viewport {
            width: 800,
            height: 600,
        },
        profile_api_base,
        timeout_ms: 5000,
        ..Default::default()
    }
}

/// Serve `responses` one request at a time, capturing each request URL.
fn spawn_server(
    responses: Vec<(u16, &'static str)>,
) -> (String, std::sync::mpsc::Receiver<String>) {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();
    let (tx, rx) = std::sync::mpsc::channel();

    std::thread::spawn(move || {
        for (status, body) in responses {
            let Ok(request) = server.recv() else { break };
            let _ = tx.send(request.url().to_string());
            let response = tiny_http::Response::from_string(body).with_status_code(status);
            let _ = request.respond(response);
        }
    });

    (format!("http://{}", addr), rx)
}

#[test]
fn load_renders_links_and_eventually_the_profile_badge() {
    // Skip on CI where network may not be available
    if std::env::var("CI").is_ok() {
        return;
    }

    let (doc_base, doc_urls) = spawn_server(vec![(200, USER_DOCUMENT)]);
    let (profile_base, profile_urls) = spawn_server(vec![(200, PROFILE_RECORD)]);

    let config = config(profile_base);
    let documents = HttpDocumentSource::new(&config, &format!("{doc_base}/user.json"))
        .expect("document source");
    let profiles = HttpProfileSource::new(&config).expect("profile source");
    let mut controller = RefreshController::new(config, documents, profiles);

    controller.load().expect("load");

    // cache-busting query parameter on the document fetch
    let doc_url = doc_urls.recv_timeout(Duration::from_secs(2)).unwrap();
    assert!(doc_url.starts_with("/user.json?t="));

    let html = controller.html();
    assert!(html.contains("Blog"));
    assert!(html.contains("domain=example.com"));
    assert!(!html.contains("githubProfileContainer"));

    assert!(controller.wait_profile(Duration::from_secs(5)));
    let profile_url = profile_urls.recv_timeout(Duration::from_secs(2)).unwrap();
    assert_eq!(profile_url, "/octocat");

    let html = controller.html();
    assert!(html.contains("githubProfileContainer"));
    assert!(html.contains(">octocat</p>"));
    assert!(html.contains("https://avatars.test/u/583231"));
}

#[test]
fn profile_fetch_failure_leaves_the_rest_of_the_page_intact() {
    // Skip on CI where network may not be available
    if std::env::var("CI").is_ok() {
        return;
    }

    let (doc_base, _doc_urls) = spawn_server(vec![(200, USER_DOCUMENT)]);
    let (profile_base, _profile_urls) = spawn_server(vec![(404, "Not Found")]);

    let config = config(profile_base);
    let documents = HttpDocumentSource::new(&config, &format!("{doc_base}/user.json"))
        .expect("document source");
    let profiles = HttpProfileSource::new(&config).expect("profile source");
    let mut controller = RefreshController::new(config, documents, profiles);

    controller.load().expect("load");
    assert!(controller.wait_profile(Duration::from_secs(5)));

    let html = controller.html();
    assert!(!html.contains("githubProfileContainer"));
    assert!(html.contains("Blog"));
    assert!(html.contains("class=\"bio\""));
}

#[test]
fn failed_refetch_keeps_the_previous_render() {
    // Skip on CI where network may not be available
    if std::env::var("CI").is_ok() {
        return;
    }

    let (doc_base, _doc_urls) =
        spawn_server(vec![(200, USER_DOCUMENT), (500, "Internal Server Error")]);
    let (profile_base, _profile_urls) = spawn_server(vec![(404, "Not Found")]);

    let config = config(profile_base);
    let documents = HttpDocumentSource::new(&config, &format!("{doc_base}/user.json"))
        .expect("document source");
    let profiles = HttpProfileSource::new(&config).expect("profile source");
    let mut controller = RefreshController::new(config, documents, profiles);

    controller.load().expect("first load");
    let _ = controller.wait_profile(Duration::from_secs(5));
    let rendered = controller.html();

    match controller.load() {
        Err(Error::DocumentFetch(message)) => assert!(message.contains("500")),
        other => panic!("expected DocumentFetch error, got {other:?}"),
    }
    assert_eq!(controller.html(), rendered);
}

#[test]
fn usernames_are_encoded_as_a_path_segment() {
    // Skip on CI where network may not be available
    if std::env::var("CI").is_ok() {
        return;
    }

    let doc = r#"{"links":[],"githubUsername":"octo cat/.."}"#;
    let (doc_base, _doc_urls) = spawn_server(vec![(200, doc)]);
    let (profile_base, profile_urls) = spawn_server(vec![(404, "Not Found")]);

    let config = config(profile_base);
    let documents =
        HttpDocumentSource::new(&config, &format!("{doc_base}/user.json")).expect("document source");
    let profiles = HttpProfileSource::new(&config).expect("profile source");
    let mut controller = RefreshController::new(config, documents, profiles);

    controller.load().expect("load");
    let _ = controller.wait_profile(Duration::from_secs(5));

    let requested = profile_urls.recv_timeout(Duration::from_secs(2)).unwrap();
    // the raw username must not be able to rewrite the request path
    assert!(!requested.contains("octo cat"));
    assert!(requested.contains("octo%20cat"));
}

#[test]
fn malformed_document_body_is_a_document_fetch_error() {
    // Skip on CI where network may not be available
    if std::env::var("CI").is_ok() {
        return;
    }

    let (doc_base, _doc_urls) = spawn_server(vec![(200, "this is not json")]);
    let config = config("https://api.github.com/users".to_string());
    let documents = HttpDocumentSource::new(&config, &format!("{doc_base}/user.json"))
        .expect("document source");
    let profiles = HttpProfileSource::new(&config).expect("profile source");
    let mut controller = RefreshController::new(config, documents, profiles);

    assert!(matches!(
        controller.load(),
        Err(Error::DocumentFetch(_))
    ));
    assert_eq!(controller.html(), "");
}

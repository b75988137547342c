//! Integration tests for the request pipeline middleware.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert2::{check, let_assert};
use warden::session::{ConfirmPrompt, LogoutFuture, Notifier, Page, SessionStore, Toast};
use warden::{
    ApiClient, Envelope, Error, HttpClient, HyperClient, Method, PipelineConfig, Request,
    RequestPipeline, token_fn,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, header_exists, method, path},
};

/// Records everything the pipeline asks of the UI.
#[derive(Default)]
struct Ui {
    toasts: Mutex<Vec<Toast>>,
    prompts: Mutex<Vec<ConfirmPrompt>>,
    events: Mutex<Vec<&'static str>>,
}

impl Ui {
    fn toasts(&self) -> Vec<String> {
        self.toasts
            .lock()
            .expect("lock")
            .iter()
            .map(|toast| toast.content.clone())
            .collect()
    }

    fn prompt_count(&self) -> usize {
        self.prompts.lock().expect("lock").len()
    }

    fn take_prompt(&self) -> ConfirmPrompt {
        self.prompts.lock().expect("lock").pop().expect("a prompt")
    }

    fn events(&self) -> Vec<&'static str> {
        self.events.lock().expect("lock").clone()
    }
}

impl Notifier for Ui {
    fn show_error(&self, toast: Toast) {
        self.toasts.lock().expect("lock").push(toast);
    }

    fn show_confirm(&self, prompt: ConfirmPrompt) {
        self.prompts.lock().expect("lock").push(prompt);
    }
}

impl SessionStore for Ui {
    fn logout(&self) -> LogoutFuture<'_> {
        Box::pin(async move {
            self.events.lock().expect("lock").push("logout");
            Ok(())
        })
    }
}

impl Page for Ui {
    fn reload(&self) {
        self.events.lock().expect("lock").push("reload");
    }
}

fn client_with_token(token: Option<&str>) -> (HyperClient, Arc<Ui>) {
    let ui = Arc::new(Ui::default());
    let pipeline = RequestPipeline::new(
        token.map(str::to_string),
        Arc::clone(&ui),
        Arc::clone(&ui),
        Arc::clone(&ui),
    );
    let client = HyperClient::builder()
        .with_logging()
        .with_pipeline(pipeline)
        .build();
    (client, ui)
}

fn client() -> (HyperClient, Arc<Ui>) {
    client_with_token(Some("jwt-123"))
}

async fn mount(server: &MockServer, route: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(template)
        .mount(server)
        .await;
}

fn get(server: &MockServer, route: &str) -> Request {
    let url = url::Url::parse(&format!("{}{route}", server.uri())).expect("url");
    Request::builder(Method::Get, url).build()
}

/// A token in the store is sent as a bearer header.
#[tokio::test]
async fn test_token_is_attached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/order/list"))
        .and(header("Authorization", "Bearer jwt-123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"code": 20000})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, ui) = client();

    let response = client
        .execute(get(&mock_server, "/api/order/list"))
        .await
        .expect("response");

    check!(response.is_success());
    check!(ui.toasts().is_empty());
}

/// Without a token the request goes out without an Authorization header.
#[tokio::test]
async fn test_no_token_no_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(401))
        .expect(0)
        .mount(&mock_server)
        .await;
    mount(
        &mock_server,
        "/api/public/config",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"code": 20000})),
    )
    .await;

    let (client, _ui) = client_with_token(None);

    let response = client
        .execute(get(&mock_server, "/api/public/config"))
        .await
        .expect("response");

    check!(response.status() == 200);
}

/// The token is read again for every request.
#[tokio::test]
async fn test_token_changes_between_requests() {
    let mock_server = MockServer::start().await;

    for token in ["first", "second"] {
        Mock::given(method("GET"))
            .and(header("Authorization", format!("Bearer {token}").as_str()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"code": 20000})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let current = Arc::new(Mutex::new("first".to_string()));
    let source = Arc::clone(&current);
    let ui = Arc::new(Ui::default());
    let pipeline = RequestPipeline::new(
        token_fn(move || Some(source.lock().expect("lock").clone())),
        Arc::clone(&ui),
        Arc::clone(&ui),
        Arc::clone(&ui),
    );
    let client = HyperClient::builder().with_pipeline(pipeline).build();

    client
        .execute(get(&mock_server, "/api/order/list"))
        .await
        .expect("first");
    *current.lock().expect("lock") = "second".to_string();
    client
        .execute(get(&mock_server, "/api/order/list"))
        .await
        .expect("second");
}

/// `code == 20000` resolves with the response, nothing is shown.
#[tokio::test]
async fn test_success_envelope_resolves() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/api/order/list",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": 200, "code": 20000, "msg": "ok", "data": [1, 2, 3]
        })),
    )
    .await;

    let (client, ui) = client();
    let api = ApiClient::new(client, mock_server.uri()).expect("api client");

    let envelope: Envelope<Vec<u32>> = api.get("/api/order/list").await.expect("envelope");

    check!(envelope.data == Some(vec![1, 2, 3]));
    check!(ui.toasts().is_empty());
    check!(ui.prompt_count() == 0);
}

/// Any other code shows one toast with the message and rejects.
#[tokio::test]
async fn test_application_error_rejects() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/api/order/list",
        ResponseTemplate::new(200)
            .set_body_json(serde_json::json!({"code": 40001, "msg": "bad request"})),
    )
    .await;

    let (client, ui) = client();

    let result = client.execute(get(&mock_server, "/api/order/list")).await;

    let_assert!(Err(Error::Api { code, message }) = result);
    check!(code == Some(40001));
    check!(message == "bad request");
    check!(ui.toasts() == vec!["bad request".to_string()]);
    check!(ui.prompt_count() == 0);
}

/// An error envelope without a message falls back to "Error".
#[tokio::test]
async fn test_application_error_without_message() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/api/order/list",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"code": 40300})),
    )
    .await;

    let (client, ui) = client();

    let result = client.execute(get(&mock_server, "/api/order/list")).await;

    let_assert!(Err(err) = result);
    check!(err.to_string() == "Error");
    check!(ui.toasts() == vec!["Error".to_string()]);
}

/// Session-invalid codes open the re-login prompt; confirming logs out then reloads.
#[tokio::test]
async fn test_session_invalid_prompts_relogin() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/api/order/list",
        ResponseTemplate::new(200)
            .set_body_json(serde_json::json!({"code": 50008, "msg": "illegal token"})),
    )
    .await;

    let (client, ui) = client();

    let result = client.execute(get(&mock_server, "/api/order/list")).await;

    let_assert!(Err(err) = result);
    check!(err.is_session_invalid());
    check!(ui.toasts() == vec!["illegal token".to_string()]);

    let prompt = ui.take_prompt();
    check!(prompt.ok_label == "Re-Login");
    check!(ui.events().is_empty());

    prompt.confirm().await.expect("relogin");
    check!(ui.events() == vec!["logout", "reload"]);
}

/// Dismissing the prompt leaves the session alone.
#[tokio::test]
async fn test_dismissed_prompt_keeps_session() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/api/order/list",
        ResponseTemplate::new(200)
            .set_body_json(serde_json::json!({"code": 50012, "msg": "logged in elsewhere"})),
    )
    .await;

    let (client, ui) = client();

    let result = client.execute(get(&mock_server, "/api/order/list")).await;

    check!(result.is_err());
    ui.take_prompt().dismiss();
    check!(ui.events().is_empty());
}

/// The current-user endpoint never opens the prompt.
#[tokio::test]
async fn test_current_user_endpoint_never_prompts() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/api/user/info",
        ResponseTemplate::new(200)
            .set_body_json(serde_json::json!({"code": 50014, "msg": "token expired"})),
    )
    .await;

    let (client, ui) = client();

    let result = client.execute(get(&mock_server, "/api/user/info")).await;

    let_assert!(Err(err) = result);
    check!(err.api_code() == Some(50014));
    check!(ui.toasts() == vec!["token expired".to_string()]);
    check!(ui.prompt_count() == 0);
}

/// A custom current-user path replaces the default one.
#[tokio::test]
async fn test_custom_current_user_path() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/api/user/info",
        ResponseTemplate::new(200)
            .set_body_json(serde_json::json!({"code": 50014, "msg": "token expired"})),
    )
    .await;

    let ui = Arc::new(Ui::default());
    let pipeline = RequestPipeline::new(
        "jwt".to_string(),
        Arc::clone(&ui),
        Arc::clone(&ui),
        Arc::clone(&ui),
    )
    .with_config(PipelineConfig::builder().current_user_path("/api/me").build());
    let client = HyperClient::builder().with_pipeline(pipeline).build();

    let result = client.execute(get(&mock_server, "/api/user/info")).await;

    check!(result.is_err());
    check!(ui.prompt_count() == 1);
}

/// Transport failures show "Request Error" and are returned unchanged.
#[tokio::test]
async fn test_connection_error_toast() {
    let (client, ui) = client();

    // Nothing listens on port 1
    let url = url::Url::parse("http://127.0.0.1:1/api/order/list").expect("url");
    let result = client.execute(Request::builder(Method::Get, url).build()).await;

    let_assert!(Err(err) = result);
    check!(err.is_connection(), "Expected connection error, got: {err}");
    check!(ui.toasts() == vec!["Request Error".to_string()]);
    check!(ui.prompt_count() == 0);
}

/// Timeouts are transport failures too.
#[tokio::test]
async fn test_timeout_toast() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/api/slow",
        ResponseTemplate::new(200).set_delay(Duration::from_secs(5)),
    )
    .await;

    let ui = Arc::new(Ui::default());
    let pipeline = RequestPipeline::new(
        None::<String>,
        Arc::clone(&ui),
        Arc::clone(&ui),
        Arc::clone(&ui),
    );
    let client = HyperClient::builder()
        .timeout(Duration::from_millis(100))
        .with_pipeline(pipeline)
        .build();

    let result = client.execute(get(&mock_server, "/api/slow")).await;

    let_assert!(Err(Error::Timeout) = result);
    check!(ui.toasts() == vec!["Request Error".to_string()]);
}

/// A non-envelope error page becomes an HTTP error with the canonical reason.
#[tokio::test]
async fn test_error_page_becomes_http_error() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/api/order/list",
        ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"),
    )
    .await;

    let (client, ui) = client();

    let result = client.execute(get(&mock_server, "/api/order/list")).await;

    let_assert!(Err(err) = result);
    check!(err.status() == Some(502));
    check!(err.is_server_error());
    check!(ui.toasts() == vec!["Request Error".to_string()]);
}

/// A 2xx JSON body without a code is rejected with its message.
#[tokio::test]
async fn test_success_body_without_code_is_application_error() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/api/order/list",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"msg": "x"})),
    )
    .await;

    let (client, ui) = client();

    let result = client.execute(get(&mock_server, "/api/order/list")).await;

    let_assert!(Err(Error::Api { code: None, message }) = result);
    check!(message == "x");
    check!(ui.toasts() == vec!["x".to_string()]);
    check!(ui.prompt_count() == 0);
}

/// A 2xx plain-text body is rejected with the generic message.
#[tokio::test]
async fn test_plain_text_success_body_is_application_error() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/api/order/list",
        ResponseTemplate::new(200).set_body_string("ok"),
    )
    .await;

    let (client, ui) = client();

    let result = client.execute(get(&mock_server, "/api/order/list")).await;

    let_assert!(Err(err) = result);
    check!(err.is_api());
    check!(err.api_code().is_none());
    check!(ui.toasts() == vec!["Error".to_string()]);
}

/// The application code wins over the HTTP status.
#[tokio::test]
async fn test_envelope_on_error_status() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/api/order/list",
        ResponseTemplate::new(500)
            .set_body_json(serde_json::json!({"code": 50000, "msg": "database unavailable"})),
    )
    .await;

    let (client, ui) = client();

    let result = client.execute(get(&mock_server, "/api/order/list")).await;

    let_assert!(Err(err) = result);
    check!(err.api_code() == Some(50000));
    check!(ui.toasts() == vec!["database unavailable".to_string()]);
}

/// Custom toast duration reaches the notifier.
#[tokio::test]
async fn test_toast_duration_from_config() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/api/order/list",
        ResponseTemplate::new(200)
            .set_body_json(serde_json::json!({"code": 40001, "msg": "bad request"})),
    )
    .await;

    let ui = Arc::new(Ui::default());
    let pipeline = RequestPipeline::new(
        None::<String>,
        Arc::clone(&ui),
        Arc::clone(&ui),
        Arc::clone(&ui),
    )
    .with_config(
        PipelineConfig::builder()
            .toast_duration(Duration::from_secs(3))
            .build(),
    );
    let client = HyperClient::builder().with_pipeline(pipeline).build();

    let _ = client.execute(get(&mock_server, "/api/order/list")).await;

    let toasts = ui.toasts.lock().expect("lock").clone();
    let_assert!([toast] = toasts.as_slice());
    check!(toast.duration == Duration::from_secs(3));
}

/// Debug logging composes with the pipeline.
#[tokio::test]
async fn test_logging_composition() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/api/order/list",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"code": 20000})),
    )
    .await;

    let ui = Arc::new(Ui::default());
    let pipeline = RequestPipeline::new(
        "jwt".to_string(),
        Arc::clone(&ui),
        Arc::clone(&ui),
        Arc::clone(&ui),
    );
    let client = HyperClient::builder()
        .with_debug_logging()
        .with_pipeline(pipeline)
        .build();

    let response = client
        .execute(get(&mock_server, "/api/order/list"))
        .await
        .expect("response");

    check!(response.is_success());
}

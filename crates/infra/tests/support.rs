use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use xui_domain::PanelConfig;
use xui_infra::{PanelLogger, XuiApi};

/// Logger that keeps every message for later assertions.
#[derive(Default)]
pub struct RecordingLogger {
    infos: Mutex<Vec<String>>,
    warns: Mutex<Vec<String>>,
}

impl RecordingLogger {
    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().clone()
    }

    pub fn warns(&self) -> Vec<String> {
        self.warns.lock().clone()
    }
}

impl PanelLogger for RecordingLogger {
    fn info(&self, message: &str) {
        self.infos.lock().push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.warns.lock().push(message.to_string());
    }
}

/// Client against `host` with a short backoff and a recording logger.
pub fn api_with_logger(host: &str) -> (XuiApi, Arc<RecordingLogger>) {
    let logger = Arc::new(RecordingLogger::default());
    let api = XuiApi::builder()
        .config(PanelConfig::new(host, "admin", "admin"))
        .logger(logger.clone())
        .base_backoff(Duration::from_millis(10))
        .build()
        .expect("api should build");
    (api, logger)
}

pub fn api(host: &str) -> XuiApi {
    api_with_logger(host).0
}

/// URL of a local port nothing listens on.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}", addr)
}

pub fn ok(obj: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"success": true, "msg": "", "obj": obj}))
}

/// Mount a login endpoint that issues `3x-ui=<value>`.
pub async fn mount_login(server: &MockServer, value: &str) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", format!("3x-ui={value}; Path=/; HttpOnly").as_str())
                .set_body_json(json!({"success": true, "msg": "Login successfully", "obj": null})),
        )
        .mount(server)
        .await;
}

/// Logged-in client against `server`.
pub async fn logged_in(server: &MockServer) -> XuiApi {
    mount_login(server, "abc123").await;
    let api = api(&server.uri());
    api.login(None).await.expect("login should succeed");
    api
}

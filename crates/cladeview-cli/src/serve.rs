//! Blocking HTTP front end for a [`Viewer`].
//!
//! Requests are handled one at a time on the calling thread. Routing is a pure function of the
//! method and URL so it can be tested without opening a socket.

use cladeview::Viewer;
use cladeview::render::PageEndpoints;
use serde::Serialize;
use std::path::PathBuf;
use tiny_http::{Header, Method, Response, Server};
use url::Url;

const JSON: &str = "application/json";
const HTML: &str = "text/html; charset=utf-8";
const TEXT: &str = "text/plain; charset=utf-8";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    fn new(status: u16, content_type: &'static str, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    fn json(status: u16, value: &impl Serialize) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self::new(status, JSON, body),
            Err(err) => Self::new(500, TEXT, format!("JSON error: {err}")),
        }
    }
}

#[derive(Serialize)]
struct SaveBody<'a> {
    ok: bool,
    message: String,
    path: &'a str,
}

/// Request-independent state: the viewer plus the page and element JSON rendered once.
pub struct App {
    viewer: Viewer,
    page: String,
    elements: String,
    save_path: Option<PathBuf>,
}

impl App {
    pub fn new(viewer: Viewer, save_path: Option<PathBuf>) -> cladeview::Result<Self> {
        let endpoints = PageEndpoints {
            save: save_path.as_ref().map(|_| "/api/save".to_string()),
            ..PageEndpoints::default()
        };
        let page = viewer.interactive_html(&endpoints)?;
        let elements = serde_json::to_string(viewer.layout())
            .map_err(|err| cladeview::HeadlessError::Render(err.into()))?;
        Ok(Self {
            viewer,
            page,
            elements,
            save_path,
        })
    }

    pub fn route(&self, method: &Method, raw_url: &str) -> Reply {
        let Some(url) = request_url(raw_url) else {
            return Reply::new(400, TEXT, "bad request URL");
        };

        let allowed = match url.path() {
            "/" | "/index.html" | "/api/elements" | "/api/stylesheet" | "/api/hover" => Method::Get,
            "/api/save" if self.save_path.is_some() => Method::Post,
            _ => return Reply::new(404, TEXT, "not found"),
        };
        if *method != allowed {
            return Reply::new(405, TEXT, "method not allowed");
        }

        match url.path() {
            "/api/elements" => Reply::new(200, JSON, self.elements.as_str()),
            "/api/stylesheet" => Reply::json(200, &self.viewer.stylesheet()),
            "/api/hover" => {
                let source = url
                    .query_pairs()
                    .find(|(key, _)| key == "source")
                    .map(|(_, value)| value.into_owned())
                    .unwrap_or_default();
                Reply::json(200, &self.viewer.hover_stylesheet(&source))
            }
            "/api/save" => self.save(),
            _ => Reply::new(200, HTML, self.page.as_str()),
        }
    }

    fn save(&self) -> Reply {
        let Some(path) = self.save_path.as_deref() else {
            return Reply::new(404, TEXT, "not found");
        };
        let shown = path.to_string_lossy();
        match self.viewer.save_html(path) {
            Ok(report) => Reply::json(
                200,
                &SaveBody {
                    ok: true,
                    message: report.message(),
                    path: &shown,
                },
            ),
            Err(err) => {
                tracing::error!(error = %err, "save failed");
                Reply::json(
                    500,
                    &SaveBody {
                        ok: false,
                        message: err.to_string(),
                        path: &shown,
                    },
                )
            }
        }
    }
}

fn request_url(raw: &str) -> Option<Url> {
    let base = Url::parse("http://localhost/").ok()?;
    base.join(raw).ok()
}

/// Serves `app` until the listener shuts down.
pub fn run(app: &App, address: &str) -> Result<(), String> {
    let server = Server::http(address).map_err(|err| format!("failed to bind {address}: {err}"))?;
    tracing::info!("serving on http://{address}/");

    for request in server.incoming_requests() {
        let reply = app.route(request.method(), request.url());
        tracing::debug!(
            method = %request.method(),
            url = request.url(),
            status = reply.status,
            "request"
        );

        let mut response = Response::from_string(reply.body).with_status_code(reply.status);
        if let Ok(header) = Header::from_bytes("Content-Type", reply.content_type) {
            response = response.with_header(header);
        }
        if let Err(err) = request.respond(response) {
            tracing::warn!(error = %err, "failed to send response");
        }
    }
    Ok(())
}

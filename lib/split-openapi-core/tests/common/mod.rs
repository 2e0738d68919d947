#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::Router;
use rstest::fixture;
use tempfile::TempDir;
use tracing::info;

pub fn init_tracing() {
    // should be run once, fail otherwise, we skip that error
    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    info!("Tracing initialized");
}

pub const PING_SPEC: &str = r#"
openapi: 3.0.0
info:
  title: X
paths:
  /ping:
    get:
      summary: Ping
      responses:
        '200':
          description: pong
"#;

pub const WEATHER_SPEC_JSON: &str = r#"{
  "openapi": "3.0.1",
  "info": { "title": "MyApi", "version": "v1" },
  "paths": {
    "/WeatherForecast": {
      "get": {
        "tags": ["WeatherForecast"],
        "responses": { "200": { "description": "Success" } }
      }
    },
    "/WeatherForecast/{city}": {
      "get": {
        "parameters": [{ "name": "city", "in": "path", "required": true }],
        "responses": { "200": { "description": "Success" } }
      }
    },
    "/": {
      "get": { "responses": { "200": { "description": "Home" } } }
    }
  },
  "components": { "schemas": {} }
}"#;

/// A scratch directory holding the input document and the output root.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn output_root(&self) -> PathBuf {
        self.dir.path().join("output")
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).expect("should write input file");
        path
    }

    pub fn read(&self, relative: impl AsRef<Path>) -> String {
        std::fs::read_to_string(self.dir.path().join(relative)).expect("should read output file")
    }

    pub fn list(&self, relative: impl AsRef<Path>) -> Vec<String> {
        let mut names: Vec<_> = std::fs::read_dir(self.dir.path().join(relative))
            .expect("should list output directory")
            .map(|entry| {
                entry
                    .expect("directory entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        names
    }
}

#[fixture]
pub fn workspace() -> Workspace {
    init_tracing();
    Workspace {
        dir: tempfile::tempdir().expect("should create temporary directory"),
    }
}

/// Serves `router` on an ephemeral local port until the test runtime stops.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("should bind test server");
    let addr = listener.local_addr().expect("bound address");
    tokio::spawn(async move {
        if let Err(error) = axum::serve(listener, router).await {
            tracing::error!(?error, "test server failed");
        }
    });
    addr
}

//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::io::Read;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

pub const SOURCE: &str = r#"class App:
    def __init__(self):
        self.current_version = "1.0.5"
        self.update_url = "https://dl.example.org/app/update.json?v=1.0.5"
"#;

const PUBLISH_TOML: &str = r#"[product]
name = "App"
extension = "exe"

[paths]
source_file = "app.py"
copy_to = "desktop"

[remote]
url = "@URL@"
username = "user"
password = "secret"
download_url_base = "https://dl.example.org/app/"

[retention]
keep = @KEEP@

[build]
validate = ["sh", "-c", "grep -q current_version {source}"]
package = ["sh", "-c", "mkdir -p dist && printf 'MZ{version}' > dist/App_v{version}.exe"]
cache_dirs = ["cache"]
stale_extensions = ["pyc"]
"#;

/// A project directory with publish.toml, a source file and a version file
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestProject {
  /// Project publishing to `remote_url`, keeping `keep` versions
  pub fn new(remote_url: &str, keep: usize) -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    let config = PUBLISH_TOML
      .replace("@URL@", remote_url)
      .replace("@KEEP@", &keep.to_string());
    std::fs::write(path.join("publish.toml"), config)?;
    std::fs::write(path.join("app.py"), SOURCE)?;

    Ok(Self { _root: root, path })
  }

  pub fn write(&self, rel: &str, content: impl AsRef<[u8]>) -> Result<PathBuf> {
    let file = self.path.join(rel);
    if let Some(parent) = file.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&file, content)?;
    Ok(file)
  }

  pub fn read(&self, rel: &str) -> Result<String> {
    std::fs::read_to_string(self.path.join(rel)).with_context(|| format!("Failed to read {}", rel))
  }

  /// Replace one line of publish.toml, e.g. the validate command
  pub fn set_config_line(&self, prefix: &str, line: &str) -> Result<()> {
    let config = self.read("publish.toml")?;
    let updated: Vec<String> = config
      .lines()
      .map(|l| if l.starts_with(prefix) { line.to_string() } else { l.to_string() })
      .collect();
    std::fs::write(self.path.join("publish.toml"), updated.join("\n"))?;
    Ok(())
  }
}

/// Run dav-publish and return its output, whatever the exit status
pub fn run_dav_publish(cwd: &Path, args: &[&str]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_dav-publish");

  Command::new(bin)
    .current_dir(cwd)
    .args(args)
    .env("RUST_LOG", "warn")
    .output()
    .context("Failed to run dav-publish")
}

/// Run dav-publish and fail unless it exits successfully
pub fn run_ok(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_dav_publish(cwd, args)?;
  if !output.status.success() {
    anyhow::bail!(
      "dav-publish command failed: dav-publish {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout(&output),
      stderr(&output)
    );
  }
  Ok(output)
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).into_owned()
}

/// What the fake server has seen and holds
#[derive(Default)]
pub struct DavState {
  pub files: BTreeMap<String, (Vec<u8>, String)>,
  /// `METHOD name` for every request, in order
  pub requests: Vec<String>,
  /// Status returned for every PUT instead of storing the body
  pub reject_put: Option<u16>,
  /// Status returned for PROPFIND instead of a listing
  pub reject_propfind: Option<u16>,
}

impl DavState {
  pub fn names(&self) -> Vec<String> {
    self.files.keys().cloned().collect()
  }

  pub fn requests_with(&self, method: &str) -> Vec<String> {
    self
      .requests
      .iter()
      .filter_map(|r| r.strip_prefix(&format!("{} ", method)).map(str::to_string))
      .collect()
  }
}

/// Minimal WebDAV collection at `/dav/` served on a background thread
pub struct FakeDav {
  pub state: Arc<Mutex<DavState>>,
  addr: SocketAddr,
  shutdown: Arc<AtomicBool>,
  thread: Option<thread::JoinHandle<()>>,
}

const EXPECTED_AUTH: &str = "Basic dXNlcjpzZWNyZXQ=";

impl FakeDav {
  pub fn start(initial: &[&str]) -> Result<Self> {
    let server = tiny_http::Server::http("127.0.0.1:0").map_err(|e| anyhow::anyhow!("bind failed: {}", e))?;
    let addr = server
      .server_addr()
      .to_ip()
      .context("fake server has no IP address")?;

    let mut state = DavState::default();
    for name in initial {
      state
        .files
        .insert(name.to_string(), (b"old".to_vec(), "application/octet-stream".to_string()));
    }
    let state = Arc::new(Mutex::new(state));
    let shutdown = Arc::new(AtomicBool::new(false));

    let thread = {
      let state = state.clone();
      let shutdown = shutdown.clone();
      thread::spawn(move || serve(server, &state, &shutdown))
    };

    Ok(Self {
      state,
      addr,
      shutdown,
      thread: Some(thread),
    })
  }

  /// Collection URL to put in publish.toml
  pub fn url(&self) -> String {
    format!("http://{}/dav", self.addr)
  }

  pub fn with_state<T>(&self, f: impl FnOnce(&mut DavState) -> T) -> T {
    let mut state = self.state.lock().unwrap();
    f(&mut state)
  }
}

impl Drop for FakeDav {
  fn drop(&mut self) {
    self.shutdown.store(true, Ordering::SeqCst);
    if let Some(thread) = self.thread.take() {
      let _ = thread.join();
    }
  }
}

fn serve(server: tiny_http::Server, state: &Mutex<DavState>, shutdown: &AtomicBool) {
  while !shutdown.load(Ordering::SeqCst) {
    let mut request = match server.recv_timeout(Duration::from_millis(50)) {
      Ok(Some(req)) => req,
      Ok(None) => continue,
      Err(_) => break,
    };

    let method = request.method().to_string().to_uppercase();
    let url = request.url().to_string();
    let name = url.trim_start_matches("/dav").trim_start_matches('/').to_string();
    let header = |field: &'static str| {
      request
        .headers()
        .iter()
        .find(|h| h.field.equiv(field))
        .map(|h| h.value.as_str().to_string())
    };
    let authorized = header("Authorization").as_deref() == Some(EXPECTED_AUTH);
    let depth = header("Depth");
    let content_type = header("Content-Type").unwrap_or_default();

    let mut body = Vec::new();
    let _ = request.as_reader().read_to_end(&mut body);

    let mut state = state.lock().unwrap();
    state.requests.push(format!("{} {}", method, name));

    let response = if !authorized {
      tiny_http::Response::from_string("unauthorized").with_status_code(401)
    } else {
      match method.as_str() {
        "PUT" => match state.reject_put {
          Some(status) => tiny_http::Response::from_string("rejected").with_status_code(status),
          None => {
            state.files.insert(name, (body, content_type));
            tiny_http::Response::from_string("").with_status_code(201)
          }
        },
        "DELETE" => {
          if state.files.remove(&name).is_some() {
            tiny_http::Response::from_string("").with_status_code(204)
          } else {
            tiny_http::Response::from_string("missing").with_status_code(404)
          }
        }
        "PROPFIND" if depth.as_deref() != Some("1") => {
          tiny_http::Response::from_string("depth required").with_status_code(403)
        }
        "PROPFIND" => match state.reject_propfind {
          Some(status) => tiny_http::Response::from_string("listing failed").with_status_code(status),
          None => tiny_http::Response::from_string(multistatus(&state.names()))
            .with_status_code(207)
            .with_header(
              "Content-Type: application/xml; charset=utf-8"
                .parse::<tiny_http::Header>()
                .unwrap(),
            ),
        },
        _ => tiny_http::Response::from_string("not allowed").with_status_code(405),
      }
    };
    drop(state);
    let _ = request.respond(response);
  }
}

fn multistatus(names: &[String]) -> String {
  let mut xml = String::from(
    "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<D:multistatus xmlns:D=\"DAV:\">\n\
     <D:response><D:href>/dav/</D:href></D:response>\n",
  );
  for name in names {
    xml.push_str(&format!(
      "<D:response><D:href>/dav/{}</D:href><D:propstat><D:status>HTTP/1.1 200 OK</D:status></D:propstat></D:response>\n",
      name
    ));
  }
  xml.push_str("</D:multistatus>\n");
  xml
}

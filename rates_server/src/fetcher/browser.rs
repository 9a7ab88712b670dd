//! Headless browser fetcher.
//!
//! Runs a Chromium-compatible executable with `--dump-dom`, which prints the DOM
//! after scripts have run. `--virtual-time-budget` makes the renderer wait for
//! network activity to settle plus `Readiness::settle` before dumping.
//!
//! The renderer process is owned by a `RendererSession`. Dropping the session
//! kills and reaps the process if it is still running, so a timeout or a read
//! failure never leaves a renderer behind. Failures while releasing it are
//! logged and swallowed.
//!
//! `Readiness::timeout` bounds the whole attempt from launch to exit. A renderer
//! that closes stdout but lingers afterwards is killed at the same deadline.
use crossbeam_channel::{RecvTimeoutError, bounded};
use log::{debug, warn};
use rates_common::{Document, RatesError, Result};
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::fetcher::{DocumentFetcher, Readiness};

/// Flags of a sandbox-less, GPU-less headless run sized like a phone viewport.
const DEFAULT_FLAGS: [&str; 6] = [
    "--headless=new",
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-gpu",
    "--disable-dev-shm-usage",
    "--window-size=390,844",
];

/// How often a renderer that already closed stdout is polled for its exit.
const EXIT_POLL: Duration = Duration::from_millis(10);

/// Fetches the document by dumping the DOM of a headless renderer.
#[derive(Debug, Clone)]
pub struct BrowserFetcher {
    executable: PathBuf,
    flags: Vec<String>,
}

impl BrowserFetcher {
    /// Renderer at `executable`, run with the default headless flags.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            flags: DEFAULT_FLAGS.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Replace the flags passed before the settle budget, `--dump-dom` and the URL.
    pub fn with_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags = flags.into_iter().map(Into::into).collect();
        self
    }

    fn command(&self, url: &str, readiness: &Readiness) -> Command {
        let mut command = Command::new(&self.executable);
        command
            .args(&self.flags)
            .arg(format!(
                "--virtual-time-budget={}",
                readiness.settle.as_millis()
            ))
            .arg("--dump-dom")
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        command
    }
}

/// A running renderer process, released on drop.
struct RendererSession {
    child: Child,
}

impl RendererSession {
    /// Wait for the process to exit, giving up at `deadline`.
    fn wait_until(&mut self, deadline: Instant) -> Result<Option<ExitStatus>> {
        loop {
            if let Some(status) = self.child.try_wait()? {
                return Ok(Some(status));
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            thread::sleep(EXIT_POLL.min(deadline - now));
        }
    }

    fn launch(mut command: Command) -> Result<Self> {
        let child = command.spawn().map_err(|e| {
            RatesError::Resource(format!(
                "cannot launch renderer {:?}: {e}",
                command.get_program()
            ))
        })?;
        debug!("Renderer session started (pid {})", child.id());
        Ok(Self { child })
    }
}

impl Drop for RendererSession {
    fn drop(&mut self) {
        let pid = self.child.id();
        match self.child.try_wait() {
            Ok(Some(_)) => debug!("Renderer session {} released", pid),
            Ok(None) => {
                if let Err(e) = self.child.kill() {
                    warn!("Resource error: cannot kill renderer {}: {}", pid, e);
                }
                match self.child.wait() {
                    Ok(_) => debug!("Renderer session {} killed and released", pid),
                    Err(e) => warn!("Resource error: cannot reap renderer {}: {}", pid, e),
                }
            }
            Err(e) => warn!("Resource error: cannot query renderer {}: {}", pid, e),
        }
    }
}

impl DocumentFetcher for BrowserFetcher {
    fn fetch(&self, url: &str, readiness: &Readiness) -> Result<Document> {
        let deadline = Instant::now() + readiness.timeout;
        let mut session = RendererSession::launch(self.command(url, readiness))?;
        let mut stdout = session
            .child
            .stdout
            .take()
            .ok_or_else(|| RatesError::Resource("renderer stdout was not captured".into()))?;

        // Reading happens off-thread so the timeout also covers a renderer that never closes stdout.
        let (dom_tx, dom_rx) = bounded(1);
        thread::Builder::new()
            .name("renderer-reader".into())
            .spawn(move || {
                let mut dom = String::new();
                let read = stdout.read_to_string(&mut dom).map(|_| dom);
                let _ = dom_tx.send(read);
            })?;

        let dom = match dom_rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
            Ok(Ok(dom)) => dom,
            Ok(Err(e)) => {
                return Err(RatesError::Fetch(format!("cannot read rendered DOM: {e}")));
            }
            Err(RecvTimeoutError::Timeout) => {
                return Err(RatesError::FetchTimeout(readiness.timeout));
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(RatesError::ChannelRecv("renderer reader exited".into()));
            }
        };

        let Some(status) = session.wait_until(deadline)? else {
            warn!("Renderer closed its output but did not exit within {:?}", readiness.timeout);
            return Err(RatesError::FetchTimeout(readiness.timeout));
        };
        if !status.success() {
            return Err(RatesError::Fetch(format!("renderer exited with {status}")));
        }
        debug!("Rendered {} bytes from {}", dom.len(), url);
        Ok(Document::new(url, dom))
    }
}

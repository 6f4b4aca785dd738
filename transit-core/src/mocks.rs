//! Test doubles for the network, delay and display seams

use std::collections::VecDeque;

use embedded_hal::delay::DelayNs;
use transit_display::{DisplayError, PageStatus, PagedSurface};
use transit_hal::{HttpClient, NetworkLink, Request, Response};

/// Delay that records every wait instead of sleeping
#[derive(Debug, Default)]
pub struct RecordingDelay {
    pub waits_ms: Vec<u32>,
    pending_ns: u64,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.pending_ns += u64::from(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.waits_ms.push(ms);
    }
}

impl RecordingDelay {
    /// Sum of all recorded waits
    pub fn total_ms(&self) -> u64 {
        self.waits_ms.iter().map(|&ms| u64::from(ms)).sum::<u64>() + self.pending_ns / 1_000_000
    }
}

/// Link whose connect results are scripted
#[derive(Debug)]
pub struct ScriptedLink {
    up: bool,
    script: VecDeque<bool>,
    pub connects: u32,
}

impl ScriptedLink {
    /// Link that is already up
    pub fn up() -> Self {
        Self {
            up: true,
            script: VecDeque::new(),
            connects: 0,
        }
    }

    /// Link that is down; each connect pops the next scripted result and
    /// fails once the script runs out
    pub fn down(script: &[bool]) -> Self {
        Self {
            up: false,
            script: script.iter().copied().collect(),
            connects: 0,
        }
    }
}

impl NetworkLink for ScriptedLink {
    type Error = ();

    fn is_connected(&self) -> bool {
        self.up
    }

    fn connect(&mut self) -> Result<(), ()> {
        self.connects += 1;
        self.up = self.script.pop_front().unwrap_or(false);
        if self.up {
            Ok(())
        } else {
            Err(())
        }
    }
}

/// Scripted result of one GET
#[derive(Debug, Clone)]
pub enum ClientOutcome {
    /// Transport failure
    Fail,
    /// Response received
    Respond { status: u16, body: Vec<u8> },
}

impl ClientOutcome {
    pub fn body(status: u16, body: &str) -> Self {
        Self::Respond {
            status,
            body: body.as_bytes().to_vec(),
        }
    }
}

/// Owned copy of a request seen by [`ScriptedClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub connect_timeout_ms: u32,
}

/// HTTP client replaying scripted outcomes
///
/// Fails with a transport error once the script runs out.
#[derive(Debug)]
pub struct ScriptedClient {
    outcomes: VecDeque<ClientOutcome>,
    pub calls: u32,
    pub requests: Vec<SeenRequest>,
}

impl ScriptedClient {
    pub fn new(outcomes: &[ClientOutcome]) -> Self {
        Self {
            outcomes: outcomes.iter().cloned().collect(),
            calls: 0,
            requests: Vec::new(),
        }
    }
}

impl HttpClient for ScriptedClient {
    type Error = ();

    fn get(&mut self, request: &Request<'_>) -> Result<Response, ()> {
        self.calls += 1;
        self.requests.push(SeenRequest {
            url: request.url.to_string(),
            headers: request
                .headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            connect_timeout_ms: request.connect_timeout_ms,
        });
        match self.outcomes.pop_front() {
            Some(ClientOutcome::Respond { status, body }) => Ok(Response { status, body }),
            Some(ClientOutcome::Fail) | None => Err(()),
        }
    }
}

/// One call received by [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    Begin,
    Fill,
    Cursor(i32, i32),
    Text(String),
    Line(i32, i32, i32),
    Commit,
}

/// Surface that records every call
#[derive(Debug)]
pub struct RecordingSurface {
    pub calls: Vec<SurfaceCall>,
    /// Pages per frame
    pages: u8,
    page: u8,
    /// Fail the n-th `draw_text` (0-indexed, counted across the frame)
    fail_text_at: Option<usize>,
    texts: usize,
    width: u16,
    height: u16,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::paged(1)
    }
}

impl RecordingSurface {
    /// Surface that needs `pages` commits per frame
    pub fn paged(pages: u8) -> Self {
        Self {
            calls: Vec::new(),
            pages,
            page: 0,
            fail_text_at: None,
            texts: 0,
            width: 400,
            height: 300,
        }
    }

    /// Fail the n-th text draw with a communication error
    pub fn failing_text_at(mut self, n: usize) -> Self {
        self.fail_text_at = Some(n);
        self
    }

    /// Texts drawn, in order
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of calls matching `call`
    pub fn count(&self, call: &SurfaceCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

impl PagedSurface for RecordingSurface {
    fn begin_full_frame_page(&mut self) -> Result<(), DisplayError> {
        self.page = 0;
        self.calls.push(SurfaceCall::Begin);
        Ok(())
    }

    fn fill_background(&mut self) -> Result<(), DisplayError> {
        self.calls.push(SurfaceCall::Fill);
        Ok(())
    }

    fn set_cursor(&mut self, x: i32, y: i32) {
        self.calls.push(SurfaceCall::Cursor(x, y));
    }

    fn draw_text(&mut self, text: &str) -> Result<(), DisplayError> {
        let index = self.texts;
        self.texts += 1;
        if self.fail_text_at == Some(index) {
            return Err(DisplayError::Communication);
        }
        self.calls.push(SurfaceCall::Text(text.to_string()));
        Ok(())
    }

    fn draw_horizontal_line(&mut self, x0: i32, x1: i32, y: i32) -> Result<(), DisplayError> {
        self.calls.push(SurfaceCall::Line(x0, x1, y));
        Ok(())
    }

    fn commit_page(&mut self) -> Result<PageStatus, DisplayError> {
        self.calls.push(SurfaceCall::Commit);
        self.page += 1;
        if self.page >= self.pages {
            Ok(PageStatus::Done)
        } else {
            Ok(PageStatus::More)
        }
    }

    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }
}

//! Refresh cycle
//!
//! One tick fetches the feed, extracts a board and draws it as a single
//! full frame. A failed fetch leaves the panel untouched so it keeps the
//! last good frame.

use alloc::string::String;
use core::fmt;

use embedded_hal::delay::DelayNs;
use transit_display::{DisplayError, PageStatus, PagedSurface};
use transit_hal::{Header, HttpClient, NetworkLink, Request};

use crate::config::BoardConfig;
use crate::extract::{ExtractError, Extractor, FeedExtractor, Titles};
use crate::fetch::{FetchError, Fetcher};
use crate::format::TRANSIT_COLUMNS;
use crate::model::Board;
use crate::render::SectionRenderer;

/// Upper bound on pages per frame
///
/// A surface still asking for more pages after this is treated as
/// overflowing its buffer.
pub const MAX_PAGES_PER_FRAME: u16 = 64;

/// Request header carrying the feed API key
pub const API_KEY_HEADER: &str = "x-apikey";

/// Why a tick did not render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SkipReason {
    /// Every fetch attempt failed
    Fetch(FetchError),
    /// Body accepted by the fetcher but not extractable
    Extract(ExtractError),
    /// Drawing or committing failed
    Display(DisplayError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(e) => write!(f, "{}", e),
            Self::Extract(e) => write!(f, "{}", e),
            Self::Display(e) => write!(f, "{}", e),
        }
    }
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Frame drawn
    Rendered {
        /// Departure rows drawn across both sections
        rows: usize,
        /// Pages committed
        pages: u16,
    },
    /// Frame not drawn; the panel shows the previous one
    Skipped(SkipReason),
}

impl TickOutcome {
    /// Check if a frame was drawn
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered { .. })
    }
}

/// Fetch, extract, render
pub struct Orchestrator<L, C, S> {
    fetcher: Fetcher<L, C>,
    surface: S,
    extractor: FeedExtractor,
    retry_parse_failures: bool,
    renderer: SectionRenderer,
    url: String,
    api_key: Option<String>,
    connect_timeout_ms: u32,
    bus_title: String,
    train_title: String,
}

impl<L, C, S> Orchestrator<L, C, S>
where
    L: NetworkLink,
    C: HttpClient,
    S: PagedSurface,
{
    /// Wire the pipeline from configuration
    pub fn new(config: &BoardConfig, link: L, client: C, surface: S) -> Self {
        Self {
            fetcher: Fetcher::new(link, client, config.retry),
            surface,
            extractor: FeedExtractor::from(config.feed.kind),
            retry_parse_failures: config.retry_parse_failures(),
            renderer: SectionRenderer::new(config.layout, TRANSIT_COLUMNS),
            url: config.feed_url(),
            api_key: config.feed.api_key.clone(),
            connect_timeout_ms: config.feed.connect_timeout_ms,
            bus_title: config.titles.buses.clone(),
            train_title: config.titles.trains.clone(),
        }
    }

    /// Feed URL requested every tick
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Display surface
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Run one refresh cycle
    pub fn tick<D: DelayNs>(&mut self, delay: &mut D) -> TickOutcome {
        let board = match self.acquire(delay) {
            Ok(board) => board,
            Err(reason) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Refresh skipped: {}", reason);
                return TickOutcome::Skipped(reason);
            }
        };

        match self.present(&board) {
            Ok(pages) => {
                let rows = board.row_count();
                #[cfg(feature = "defmt")]
                defmt::info!("Rendered {} rows in {} pages", rows, pages);
                TickOutcome::Rendered { rows, pages }
            }
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::error!("Render failed: {}", e);
                TickOutcome::Skipped(SkipReason::Display(e))
            }
        }
    }

    /// Fetch and extract
    fn acquire<D: DelayNs>(&mut self, delay: &mut D) -> Result<Board, SkipReason> {
        let Self {
            fetcher,
            extractor,
            retry_parse_failures,
            url,
            api_key,
            connect_timeout_ms,
            bus_title,
            train_title,
            ..
        } = self;

        let titles = Titles {
            buses: bus_title,
            trains: train_title,
        };

        let header: [Header<'_>; 1];
        let mut request = Request::get(url).with_connect_timeout(*connect_timeout_ms);
        if let Some(key) = api_key.as_deref() {
            header = [(API_KEY_HEADER, key)];
            request = request.with_headers(&header);
        }

        if *retry_parse_failures {
            fetcher
                .fetch_with(&request, delay, |body| extractor.extract(&body, &titles))
                .map_err(SkipReason::Fetch)
        } else {
            let body = fetcher.fetch(&request, delay).map_err(SkipReason::Fetch)?;
            extractor
                .extract(&body, &titles)
                .map_err(SkipReason::Extract)
        }
    }

    /// Draw the board as one frame, replaying it for every page
    ///
    /// The page cycle is always driven to completion; a drawing error is
    /// reported after the final commit.
    fn present(&mut self, board: &Board) -> Result<u16, DisplayError> {
        self.surface.begin_full_frame_page()?;

        let mut failure = None;
        let mut pages = 0;
        while pages < MAX_PAGES_PER_FRAME {
            if failure.is_none() {
                if let Err(e) = self.compose(board) {
                    failure = Some(e);
                }
            }

            let status = self.surface.commit_page()?;
            pages += 1;
            if status == PageStatus::Done {
                return match failure {
                    Some(e) => Err(e),
                    None => Ok(pages),
                };
            }
        }

        Err(failure.unwrap_or(DisplayError::BufferOverflow))
    }

    fn compose(&mut self, board: &Board) -> Result<(), DisplayError> {
        let layout = *self.renderer.layout();

        self.surface.fill_background()?;
        self.renderer.render(
            &mut self.surface,
            board.buses.as_ref(),
            layout.section_top(0),
            &self.bus_title,
        )?;
        self.renderer.render(
            &mut self.surface,
            board.trains.as_ref(),
            layout.section_top(1),
            &self.train_title,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::extract::FeedKind;
    use crate::fetch::AttemptError;
    use crate::mocks::{
        ClientOutcome, RecordingDelay, RecordingSurface, ScriptedClient, ScriptedLink, SurfaceCall,
    };

    const FEED: &str = r#"{"bus_info":{"departures":[{"service":"1","dest":"X","eta":"2"}]}}"#;

    type TestOrchestrator = Orchestrator<ScriptedLink, ScriptedClient, RecordingSurface>;

    fn orchestrator(
        config: &BoardConfig,
        outcomes: &[ClientOutcome],
        surface: RecordingSurface,
    ) -> TestOrchestrator {
        Orchestrator::new(
            config,
            ScriptedLink::up(),
            ScriptedClient::new(outcomes),
            surface,
        )
    }

    fn structured() -> BoardConfig {
        BoardConfig::default()
    }

    #[test]
    fn test_tick_renders_both_sections() {
        let mut orch = orchestrator(
            &structured(),
            &[ClientOutcome::body(200, FEED)],
            RecordingSurface::default(),
        );
        let mut delay = RecordingDelay::default();

        let outcome = orch.tick(&mut delay);

        assert_eq!(outcome, TickOutcome::Rendered { rows: 1, pages: 1 });
        let surface = orch.surface();
        assert_eq!(surface.calls[0], SurfaceCall::Begin);
        assert_eq!(surface.calls[1], SurfaceCall::Fill);
        assert_eq!(
            surface.texts(),
            [
                "Buses",
                "1     X                      2      ",
                "Trains"
            ]
        );
        assert!(surface.calls.contains(&SurfaceCall::Cursor(0, 168)));
        assert_eq!(surface.calls.last(), Some(&SurfaceCall::Commit));
    }

    #[test]
    fn test_fetch_failure_skips_render() {
        let mut orch = orchestrator(&structured(), &[], RecordingSurface::default());
        let mut delay = RecordingDelay::default();

        let outcome = orch.tick(&mut delay);

        assert_eq!(
            outcome,
            TickOutcome::Skipped(SkipReason::Fetch(FetchError::Exhausted {
                attempts: 3,
                last: AttemptError::Transport
            }))
        );
        assert_eq!(delay.waits_ms, [2_000, 4_000, 6_000]);
        assert!(orch.surface().calls.is_empty());
    }

    #[test]
    fn test_parse_failure_retried_for_json_feed() {
        let mut orch = orchestrator(
            &structured(),
            &[
                ClientOutcome::body(200, "{\"bus_info\":"),
                ClientOutcome::body(200, FEED),
            ],
            RecordingSurface::default(),
        );
        let mut delay = RecordingDelay::default();

        assert!(orch.tick(&mut delay).is_rendered());
        assert_eq!(delay.waits_ms, [2_000]);
    }

    #[test]
    fn test_parse_retry_disabled_skips_without_retry() {
        let mut config = structured();
        config.feed.retry_parse_failures = Some(false);
        let mut orch = orchestrator(
            &config,
            &[ClientOutcome::body(200, "not json")],
            RecordingSurface::default(),
        );
        let mut delay = RecordingDelay::default();

        let outcome = orch.tick(&mut delay);

        assert_eq!(
            outcome,
            TickOutcome::Skipped(SkipReason::Extract(ExtractError::Malformed))
        );
        assert!(delay.waits_ms.is_empty());
        assert!(orch.surface().calls.is_empty());
    }

    #[test]
    fn test_scraped_feed_accepts_any_body() {
        let mut config = structured();
        config.feed.kind = FeedKind::Scraped;
        let mut orch = orchestrator(
            &config,
            &[ClientOutcome::body(200, "<html>maintenance</html>")],
            RecordingSurface::default(),
        );
        let mut delay = RecordingDelay::default();

        assert_eq!(
            orch.tick(&mut delay),
            TickOutcome::Rendered { rows: 0, pages: 1 }
        );
        assert_eq!(orch.surface().texts(), ["Buses", "Trains"]);
    }

    #[test]
    fn test_multi_page_surface_replays_frame() {
        let mut orch = orchestrator(
            &structured(),
            &[ClientOutcome::body(200, FEED)],
            RecordingSurface::paged(3),
        );
        let mut delay = RecordingDelay::default();

        assert_eq!(
            orch.tick(&mut delay),
            TickOutcome::Rendered { rows: 1, pages: 3 }
        );
        let surface = orch.surface();
        assert_eq!(surface.count(&SurfaceCall::Begin), 1);
        assert_eq!(surface.count(&SurfaceCall::Fill), 3);
        assert_eq!(surface.count(&SurfaceCall::Commit), 3);
        assert_eq!(surface.texts().len(), 9);
    }

    #[test]
    fn test_draw_failure_still_commits() {
        let mut orch = orchestrator(
            &structured(),
            &[ClientOutcome::body(200, FEED)],
            RecordingSurface::paged(2).failing_text_at(1),
        );
        let mut delay = RecordingDelay::default();

        let outcome = orch.tick(&mut delay);

        assert_eq!(
            outcome,
            TickOutcome::Skipped(SkipReason::Display(DisplayError::Communication))
        );
        let surface = orch.surface();
        assert_eq!(surface.count(&SurfaceCall::Commit), 2);
        assert_eq!(surface.count(&SurfaceCall::Fill), 1);
    }

    #[test]
    fn test_runaway_paging_overflows() {
        let mut orch = orchestrator(
            &structured(),
            &[ClientOutcome::body(200, FEED)],
            RecordingSurface::paged(u8::MAX),
        );
        let mut delay = RecordingDelay::default();

        assert_eq!(
            orch.tick(&mut delay),
            TickOutcome::Skipped(SkipReason::Display(DisplayError::BufferOverflow))
        );
        assert_eq!(
            orch.surface().count(&SurfaceCall::Commit),
            usize::from(MAX_PAGES_PER_FRAME)
        );
    }

    #[test]
    fn test_request_carries_url_key_and_timeout() {
        let config = parse_config(
            r#"
            [feed]
            base_url = "feed.local:8000"
            path = "board"
            kind = "rail_board"
            api_key = "secret"
            connect_timeout_ms = 1500
            "#,
        )
        .unwrap();
        let mut orch = orchestrator(
            &config,
            &[ClientOutcome::body(200, r#"{"locationName":"Ely"}"#)],
            RecordingSurface::default(),
        );
        let mut delay = RecordingDelay::default();

        assert!(orch.tick(&mut delay).is_rendered());

        let request = &orch.fetcher_client().requests[0];
        assert_eq!(request.url, "http://feed.local:8000/board");
        assert_eq!(
            request.headers,
            [("x-apikey".to_string(), "secret".to_string())]
        );
        assert_eq!(request.connect_timeout_ms, 1500);
        assert_eq!(orch.surface().texts(), ["Buses", "Trains - Ely"]);
    }

    #[test]
    fn test_configured_titles() {
        let mut config = structured();
        config.titles.buses = "Bus".to_string();
        config.titles.trains = "Rail".to_string();
        let mut orch = orchestrator(
            &config,
            &[ClientOutcome::body(200, "{}")],
            RecordingSurface::default(),
        );
        let mut delay = RecordingDelay::default();

        orch.tick(&mut delay);

        assert_eq!(orch.surface().texts(), ["Bus", "Rail"]);
    }

    impl TestOrchestrator {
        fn fetcher_client(&self) -> &ScriptedClient {
            self.fetcher.client()
        }
    }
}

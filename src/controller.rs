//! The refresh controller: cached session state and re-render policy.
//!
//! All state mutation happens on the caller's thread, inside [`RefreshController::load`],
//! [`RefreshController::tick`] and [`RefreshController::wait_profile`]. The
//! profile fetch is the one background activity: it runs on a spawned thread
//! and reports through an mpsc channel that `tick` drains, so a late profile
//! simply re-renders with the freshest completed data. The final tree is the
//! same whether the profile resolves before or after the initial render.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::document::{ExternalProfile, UserDocument};
use crate::error::Result;
use crate::fetch::{DocumentSource, ProfileSource};
use crate::render::PageTree;
use crate::sizing::{compute_size_tier, SizeTier};
use crate::PageConfig;

/// Session-wide cached state, replaced only by a fresh successful fetch.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub document: Option<UserDocument>,
    pub profile: Option<ExternalProfile>,
}

/// Trailing-edge resize debouncer.
///
/// Every submission replaces the pending width and pushes the deadline out,
/// so only the last resize of a burst fires once the burst goes quiet.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(u32, Instant)>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn submit(&mut self, width: u32) {
        self.pending = Some((width, Instant::now() + self.delay));
    }

    /// Take the settled width once the delay has elapsed with no newer event.
    pub fn poll(&mut self) -> Option<u32> {
        match self.pending {
            Some((width, deadline)) if Instant::now() >= deadline => {
                self.pending = None;
                Some(width)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Owns the cached state and decides when the render pipeline re-runs:
/// on load, on (debounced) resize, and when the external profile arrives.
pub struct RefreshController<D, P> {
    config: PageConfig,
    documents: D,
    profiles: Arc<P>,
    state: SessionState,
    page: PageTree,
    tier: &'static SizeTier,
    debouncer: Debouncer,
    profile_rx: Option<Receiver<Result<ExternalProfile>>>,
    /// Username the cached/in-flight profile was requested for; requests are
    /// made at most once per username per session, with no automatic retry.
    profile_username: Option<String>,
}

impl<D, P> RefreshController<D, P>
where
    D: DocumentSource,
    P: ProfileSource + 'static,
{
    pub fn new(config: PageConfig, documents: D, profiles: P) -> Self {
        let tier = compute_size_tier(config.viewport.width);
        let debouncer = Debouncer::new(Duration::from_millis(config.resize_debounce_ms));
        Self {
            config,
            documents,
            profiles: Arc::new(profiles),
            state: SessionState::default(),
            page: PageTree::new(),
            tier,
            debouncer,
            profile_rx: None,
            profile_username: None,
        }
    }

    /// Fetch the user document and render the data regions.
    ///
    /// On failure the error is returned for the caller to surface and the
    /// previously cached state (and rendered tree) stays untouched. On
    /// success the cached document is replaced atomically, tags, bio and
    /// links render in that order, and a profile fetch is started in the
    /// background when the document names a GitHub user.
    pub fn load(&mut self) -> Result<()> {
        let document = self.documents.fetch_document()?;
        self.state.document = Some(document);
        self.render_data_regions();
        self.request_profile_if_needed();
        Ok(())
    }

    /// Record a viewport resize; the re-render fires from a later `tick`
    /// once the debounce delay elapses.
    pub fn resize(&mut self, width: u32) {
        self.debouncer.submit(width);
    }

    /// Drive pending work: apply a completed profile fetch and any settled
    /// resize. Returns true when something re-rendered.
    pub fn tick(&mut self) -> bool {
        let mut changed = false;

        let polled = self.profile_rx.as_ref().map(Receiver::try_recv);
        match polled {
            Some(Ok(outcome)) => {
                self.profile_rx = None;
                changed |= self.apply_profile_outcome(outcome);
            }
            Some(Err(TryRecvError::Disconnected)) => {
                self.profile_rx = None;
                log::warn!("profile fetch worker disappeared without a result");
            }
            Some(Err(TryRecvError::Empty)) | None => {}
        }

        if let Some(width) = self.debouncer.poll() {
            self.config.viewport.width = width;
            self.tier = compute_size_tier(width);
            if self.state.document.is_some() {
                // data is unchanged; only the tier-dependent regions re-render
                self.render_data_regions();
                changed = true;
            }
        }

        changed
    }

    /// Block until the in-flight profile fetch completes or the timeout
    /// elapses. Returns true when an outcome was applied.
    pub fn wait_profile(&mut self, timeout: Duration) -> bool {
        let Some(rx) = self.profile_rx.take() else {
            return false;
        };
        match rx.recv_timeout(timeout) {
            Ok(outcome) => {
                self.apply_profile_outcome(outcome);
                true
            }
            Err(RecvTimeoutError::Timeout) => {
                self.profile_rx = Some(rx);
                false
            }
            Err(RecvTimeoutError::Disconnected) => {
                log::warn!("profile fetch worker disappeared without a result");
                false
            }
        }
    }

    pub fn profile_pending(&self) -> bool {
        self.profile_rx.is_some()
    }

    pub fn resize_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn tier(&self) -> &'static SizeTier {
        self.tier
    }

    /// Serialize the current tree (region fragments only).
    pub fn html(&self) -> String {
        self.page.to_html()
    }

    /// Serialize the current tree as a standalone HTML document.
    pub fn document_html(&self, title: &str) -> String {
        self.page.to_document(title)
    }

    fn render_data_regions(&mut self) {
        if let Some(document) = &self.state.document {
            self.page.render_tags(document, self.tier);
            self.page.render_bio(document, self.tier);
            self.page
                .render_links(document, self.tier, &self.config.favicon_service);
        }
    }

    fn request_profile_if_needed(&mut self) {
        let Some(username) = self
            .state
            .document
            .as_ref()
            .and_then(UserDocument::github_username)
            .map(str::to_string)
        else {
            return;
        };
        if self.profile_username.as_deref() == Some(username.as_str()) {
            return;
        }

        self.profile_username = Some(username.clone());
        let (tx, rx) = mpsc::channel();
        let profiles = Arc::clone(&self.profiles);
        std::thread::spawn(move || {
            let _ = tx.send(profiles.fetch_profile(&username));
        });
        self.profile_rx = Some(rx);
    }

    fn apply_profile_outcome(&mut self, outcome: Result<ExternalProfile>) -> bool {
        match outcome {
            Ok(profile) => {
                self.state.profile = Some(profile);
                self.page.render_profile(self.state.profile.as_ref());
                // tags and bio sit relative to the profile region, so they
                // re-render for the tree to converge regardless of arrival order
                if let Some(document) = &self.state.document {
                    self.page.render_tags(document, self.tier);
                    self.page.render_bio(document, self.tier);
                }
                true
            }
            Err(err) => {
                log::warn!("profile fetch failed: {err}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debouncer_fires_once_with_the_final_width() {
        let mut debouncer = Debouncer::new(Duration::from_millis(30));
        debouncer.submit(400);
        debouncer.submit(500);
        debouncer.submit(700);
        assert_eq!(debouncer.poll(), None);
        assert!(debouncer.is_pending());

        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(debouncer.poll(), Some(700));
        assert_eq!(debouncer.poll(), None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn debouncer_resets_its_deadline_on_every_event() {
        let mut debouncer = Debouncer::new(Duration::from_millis(40));
        debouncer.submit(300);
        std::thread::sleep(Duration::from_millis(25));
        // still inside the window: this resets the clock
        debouncer.submit(900);
        std::thread::sleep(Duration::from_millis(25));
        assert_eq!(debouncer.poll(), None);
        std::thread::sleep(Duration::from_millis(25));
        assert_eq!(debouncer.poll(), Some(900));
    }
}

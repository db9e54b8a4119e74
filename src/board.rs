//! Per-topic request state.
//!
//! A [`FeedBoard`] tracks one tab per distinct topic. Each tab moves through
//! an explicit state machine driven only by orchestrator results:
//!
//! ```text
//! Idle ──begin──> Loading ──complete(Ok)──> Ready(feed)
//!                    │
//!                    └──complete(Err)──> Failed(error)
//! Ready | Failed ──begin──> Loading        (refresh or retry)
//! ```
//!
//! Topics are matched case-insensitively after trimming, so "AI" and " ai "
//! share one tab.

use crate::errors::FetchError;
use crate::models::NewsFeed;
use std::fmt;
use tracing::debug;
use uuid::Uuid;

/// Identifier of a tab, unique for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabId(Uuid);

impl TabId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
pub enum FeedState {
    Idle,
    Loading,
    Ready(NewsFeed),
    Failed(FetchError),
}

impl FeedState {
    pub fn label(&self) -> &'static str {
        match self {
            FeedState::Idle => "idle",
            FeedState::Loading => "loading",
            FeedState::Ready(_) => "ready",
            FeedState::Failed(_) => "failed",
        }
    }
}

#[derive(Debug)]
pub struct Tab {
    pub id: TabId,
    pub topic: String,
    pub state: FeedState,
}

fn topic_key(topic: &str) -> String {
    topic.trim().to_lowercase()
}

#[derive(Debug, Default)]
pub struct FeedBoard {
    tabs: Vec<Tab>,
    active: Option<TabId>,
}

impl FeedBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a tab for `topic`, or focus the existing one.
    ///
    /// Returns the tab id and whether a new tab was created. Blank topics are
    /// rejected with `None`.
    pub fn open(&mut self, topic: &str) -> Option<(TabId, bool)> {
        let topic = topic.trim();
        if topic.is_empty() {
            return None;
        }
        if let Some(tab) = self.find(topic) {
            let id = tab.id;
            self.active = Some(id);
            return Some((id, false));
        }

        let id = TabId::new();
        debug!(%id, topic, "Opened tab");
        self.tabs.push(Tab {
            id,
            topic: topic.to_string(),
            state: FeedState::Idle,
        });
        self.active = Some(id);
        Some((id, true))
    }

    /// Move a tab to `Loading`, discarding any previous feed or error.
    ///
    /// Returns `false` if the tab does not exist or is already loading.
    pub fn begin(&mut self, id: TabId) -> bool {
        match self.get_mut(id) {
            Some(tab) if !matches!(tab.state, FeedState::Loading) => {
                tab.state = FeedState::Loading;
                true
            }
            _ => false,
        }
    }

    /// Record the orchestrator's result for a loading tab.
    ///
    /// Results for tabs that were closed or are not loading are dropped and
    /// reported as `false`.
    pub fn complete(&mut self, id: TabId, result: Result<NewsFeed, FetchError>) -> bool {
        match self.get_mut(id) {
            Some(tab) if matches!(tab.state, FeedState::Loading) => {
                tab.state = match result {
                    Ok(feed) => FeedState::Ready(feed),
                    Err(e) => FeedState::Failed(e),
                };
                true
            }
            _ => {
                debug!(%id, "Dropping stale feed result");
                false
            }
        }
    }

    /// Close a tab. If it was active, the last remaining tab becomes active.
    pub fn close(&mut self, id: TabId) -> Option<Tab> {
        let index = self.tabs.iter().position(|t| t.id == id)?;
        let tab = self.tabs.remove(index);
        if self.active == Some(id) {
            self.active = self.tabs.last().map(|t| t.id);
        }
        Some(tab)
    }

    pub fn find(&self, topic: &str) -> Option<&Tab> {
        let key = topic_key(topic);
        self.tabs.iter().find(|t| topic_key(&t.topic) == key)
    }

    pub fn get(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    pub fn active(&self) -> Option<&Tab> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn set_active(&mut self, id: TabId) -> bool {
        if self.get(id).is_some() {
            self.active = Some(id);
            true
        } else {
            false
        }
    }

    /// Tabs in the order they were opened.
    pub fn iter(&self) -> impl Iterator<Item = &Tab> {
        self.tabs.iter()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }
}

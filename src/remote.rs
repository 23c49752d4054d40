//! Remote leaderboard store
//!
//! The store is a black box behind two calls: list every raw entry, and
//! append one. [`HttpStore`] talks to the deployed endpoint; the round-end
//! pipeline and refresh below are generic over [`LeaderboardStore`].

use std::cell::RefCell;
use std::future::Future;

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

use crate::config::LeaderboardConfig;
use crate::leaderboard::{BoardState, LeaderboardEntry, parse_payload};
use crate::platform::time;
use crate::sim::RoundResult;

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("leaderboard returned HTTP {0}")]
    Status(u16),
    #[error("could not read leaderboard: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("leaderboard is not configured")]
    NotConfigured,
}

/// Append-only remote score list
pub trait LeaderboardStore {
    /// Every stored entry, unordered
    fn fetch_raw(&self) -> impl Future<Output = Result<Vec<LeaderboardEntry>, LeaderboardError>>;

    /// Store one entry
    fn submit(&self, entry: &LeaderboardEntry) -> impl Future<Output = Result<(), LeaderboardError>>;
}

/// HTTP store with bearer authentication
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    config: LeaderboardConfig,
}

impl HttpStore {
    pub fn new(config: LeaderboardConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

impl LeaderboardStore for HttpStore {
    async fn fetch_raw(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        log::debug!("Fetching leaderboard");

        let response = self
            .client
            .get(&self.config.endpoint)
            .bearer_auth(&self.config.token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LeaderboardError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(parse_payload(&body)?)
    }

    async fn submit(&self, entry: &LeaderboardEntry) -> Result<(), LeaderboardError> {
        log::debug!("Submitting {}", entry);

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.token)
            .json(entry)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LeaderboardError::Status(status.as_u16()));
        }
        Ok(())
    }
}

/// What happened to a round's score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    /// Zero-score round; nothing sent
    Skipped,
    /// The score is on the board
    Submitted,
    /// The write failed (already logged)
    Failed,
}

/// Fetch the board into `board`
///
/// The `RefCell` is only borrowed around the await, never across it, so hits
/// and timers keep running while the request is outstanding.
pub async fn refresh<S: LeaderboardStore>(store: &S, board: &RefCell<BoardState>) {
    board.borrow_mut().begin_fetch();
    let result = store.fetch_raw().await;
    board.borrow_mut().finish_fetch(result);
}

/// Submit a finished round (if it scored), then refresh the board once
pub async fn settle_round<S: LeaderboardStore>(
    store: &S,
    board: &RefCell<BoardState>,
    result: &RoundResult,
) -> SubmitStatus {
    let status = match LeaderboardEntry::from_round(result, time::now_iso()) {
        None => {
            log::info!("Zero-score round, not submitting");
            SubmitStatus::Skipped
        }
        Some(entry) => match store.submit(&entry).await {
            Ok(()) => {
                log::info!("Score submitted: {}", entry);
                SubmitStatus::Submitted
            }
            Err(e) => {
                log::warn!("Score submission failed: {}", e);
                SubmitStatus::Failed
            }
        },
    };

    refresh(store, board).await;
    status
}

use std::sync::RwLock;
use std::time::Duration;

use actix_web::web;
use awc::error::SendRequestError;
use futures_util::{StreamExt, stream};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::NodeRegistry;
use crate::blockchain::{Block, ChainValidator, Ledger};

/// Largest `/chain` payload accepted from a peer.
const CHAIN_PAYLOAD_LIMIT: usize = 64 * 1024 * 1024;

/// The `{chain, length}` envelope every node serves on `GET /chain`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerChain {
    pub chain: Vec<Block>,
    pub length: usize,
}

impl PeerChain {
    /// Reject envelopes whose reported length disagrees with their content.
    fn verify_length(self) -> Result<Self, FetchError> {
        if self.length != self.chain.len() {
            return Err(FetchError::LengthMismatch {
                reported: self.length,
                actual: self.chain.len(),
            });
        }
        Ok(self)
    }
}

/// Why a peer's chain could not be obtained.
#[derive(Debug, Error, PartialEq)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("peer answered with status {0}")]
    Status(u16),

    #[error("undecodable chain payload: {0}")]
    Decode(String),

    #[error("peer reported length {reported} but sent {actual} blocks")]
    LengthMismatch { reported: usize, actual: usize },
}

impl From<SendRequestError> for FetchError {
    fn from(err: SendRequestError) -> Self {
        match err {
            SendRequestError::Timeout => FetchError::Timeout,
            other => FetchError::Transport(other.to_string()),
        }
    }
}

/// Where peer chains come from. Resolution runs on a single actix worker, so
/// the returned futures need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait ChainSource {
    async fn fetch_chain(&self, peer: &str) -> Result<PeerChain, FetchError>;
}

/// Fetches `http://<peer>/chain` with actix's HTTP client.
pub struct HttpChainSource {
    client: awc::Client,
}

impl HttpChainSource {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: awc::Client::builder().timeout(timeout).finish(),
        }
    }
}

impl ChainSource for HttpChainSource {
    async fn fetch_chain(&self, peer: &str) -> Result<PeerChain, FetchError> {
        let url = format!("http://{peer}/chain");
        let mut resp = self.client.get(url.as_str()).send().await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status().as_u16()));
        }
        resp.json::<PeerChain>()
            .limit(CHAIN_PAYLOAD_LIMIT)
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// Outcome of asking one peer for its chain.
#[derive(Debug)]
pub struct PeerReport {
    pub peer: String,
    pub outcome: Result<PeerChain, FetchError>,
}

/// Pick the longest valid chain strictly longer than `local_len`. Reports are
/// folded in order, so among equally long winners the first one is kept.
pub fn select_winner(
    validator: ChainValidator,
    local_len: usize,
    reports: Vec<PeerReport>,
) -> Option<Vec<Block>> {
    let mut max_length = local_len;
    let mut winner = None;

    for PeerReport { peer, outcome } in reports {
        let candidate = match outcome {
            Ok(candidate) => candidate,
            Err(e) => {
                warn!("CONSENSUS - skipping peer {peer}: {e}");
                continue;
            }
        };

        if candidate.length <= max_length {
            debug!(
                "CONSENSUS - peer {peer} chain not longer ({} <= {max_length})",
                candidate.length
            );
            continue;
        }
        if !validator.is_valid(&candidate.chain) {
            warn!("CONSENSUS - peer {peer} sent an invalid chain of {} blocks", candidate.length);
            continue;
        }

        debug!("CONSENSUS - peer {peer} leads with {} blocks", candidate.length);
        max_length = candidate.length;
        winner = Some(candidate.chain);
    }

    winner
}

/// Longest-valid-chain resolution against every registered peer.
pub struct ConsensusResolver<S> {
    source: S,
    validator: ChainValidator,
    concurrency: usize,
}

impl<S: ChainSource> ConsensusResolver<S> {
    pub fn new(source: S, validator: ChainValidator, concurrency: usize) -> Self {
        Self {
            source,
            validator,
            concurrency: concurrency.max(1),
        }
    }

    /// Ask every peer for its chain, at most `concurrency` at a time.
    /// Reports come back sorted by peer address, whatever order they finished in.
    pub async fn fetch_all(&self, peers: Vec<String>) -> Vec<PeerReport> {
        let mut reports: Vec<PeerReport> = stream::iter(peers)
            .map(|peer| async move {
                let outcome = self
                    .source
                    .fetch_chain(&peer)
                    .await
                    .and_then(PeerChain::verify_length);
                PeerReport { peer, outcome }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;
        reports.sort_by(|a, b| a.peer.cmp(&b.peer));
        reports
    }

    /// Replace the local chain with the longest valid peer chain, if any peer
    /// has one strictly longer. Returns whether a replacement happened.
    ///
    /// No lock is held while peers are queried or their chains validated;
    /// the write lock is taken only for the final swap. Validation runs on the
    /// blocking pool.
    pub async fn resolve(&self, ledger: &RwLock<Ledger>, registry: &RwLock<NodeRegistry>) -> bool {
        let peers = {
            let registry = registry.read().expect("registry lock poisoned");
            if registry.is_empty() {
                info!("CONSENSUS - no peers registered, local chain is authoritative");
                return false;
            }
            registry.nodes()
        };
        let local_len = ledger.read().expect("ledger lock poisoned").len();
        debug!("CONSENSUS - resolving against {} peers (local length {local_len})", peers.len());

        let reports = self.fetch_all(peers).await;
        let validator = self.validator;
        let winner = match web::block(move || select_winner(validator, local_len, reports)).await {
            Ok(Some(winner)) => winner,
            Ok(None) => {
                info!("CONSENSUS - local chain is authoritative");
                return false;
            }
            Err(e) => {
                warn!("CONSENSUS - validation task failed: {e}");
                return false;
            }
        };

        let mut ledger = ledger.write().expect("ledger lock poisoned");
        if winner.len() <= ledger.len() {
            info!(
                "CONSENSUS - local chain grew to {} blocks while resolving; keeping it",
                ledger.len()
            );
            return false;
        }
        ledger.replace_chain(winner);
        true
    }
}

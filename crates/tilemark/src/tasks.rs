//! # Background Worker
//!
//! One worker thread runs one-shot jobs that may block on storage. Results
//! travel back as [`Completion`]s over a second channel that only the
//! owning thread drains, so the marker store is never mutated off-thread.
//!
//! ```text
//! owning thread ──Job──▶ [jobs] ──▶ worker ──▶ [completions] ──▶ pump()
//! ```
//!
//! There is no cancellation: a submitted job runs to completion. Dropping
//! the worker closes the job queue and joins the thread.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use tilemark_markers::{CullJob, CullReport};
use tracing::{debug, warn};

use crate::contracts::{EntityRef, PlayerPosition, WorldData};
use crate::error::{MapError, MapResult, StorageResult};
use crate::teleport::{teleport_record, TeleportTarget};

/// What started a teleport, for the messages shown afterwards.
#[derive(Clone, Debug, PartialEq)]
pub enum TeleportOrigin {
    /// Tapped marker, by display name.
    Marker(String),
    /// Long press on the map.
    MapPosition,
}

/// A teleport to run in the background.
#[derive(Clone, Debug, PartialEq)]
pub struct TeleportRequest {
    /// Whose record to edit.
    pub entity: EntityRef,
    /// New position and dimension.
    pub target: TeleportTarget,
    /// What started it.
    pub origin: TeleportOrigin,
}

/// Work for the background thread.
#[derive(Debug)]
pub enum Job {
    /// Viewport culling scan.
    Cull(CullJob),
    /// List multiplayer player names.
    ListNetworkPlayers,
    /// Load a player's stored position.
    LocatePlayer(EntityRef),
    /// Validate, write and save a player's position.
    Teleport(TeleportRequest),
}

/// Result of a [`Job`], applied on the owning thread.
#[derive(Debug)]
pub enum Completion {
    /// Culling scan finished.
    CullFinished(CullReport),
    /// Player names, empty when the world has none.
    NetworkPlayers(StorageResult<Vec<String>>),
    /// Stored position of a player.
    PlayerLocated {
        /// Player looked up.
        player: EntityRef,
        /// Position, `None` if the player has no data.
        result: StorageResult<Option<PlayerPosition>>,
    },
    /// Teleport finished.
    Teleported {
        /// The request.
        request: TeleportRequest,
        /// Outcome.
        result: MapResult<()>,
    },
}

/// Handle to the worker thread.
#[derive(Debug)]
pub struct TaskWorker {
    jobs: Option<Sender<Job>>,
    completions: Receiver<Completion>,
    handle: Option<JoinHandle<()>>,
}

impl TaskWorker {
    /// Starts the worker thread.
    #[must_use]
    pub fn spawn<D: WorldData + 'static>(data: Arc<D>) -> Self {
        let (job_tx, job_rx) = unbounded::<Job>();
        let (done_tx, done_rx) = unbounded::<Completion>();

        let handle = thread::spawn(move || {
            for job in job_rx {
                let completion = run_job(data.as_ref(), job);
                if done_tx.send(completion).is_err() {
                    break;
                }
            }
            debug!("task worker stopped");
        });

        Self {
            jobs: Some(job_tx),
            completions: done_rx,
            handle: Some(handle),
        }
    }

    /// Queues a job. Returns false if the worker is gone.
    pub fn submit(&self, job: Job) -> bool {
        match &self.jobs {
            Some(jobs) => jobs.send(job).is_ok(),
            None => false,
        }
    }

    /// Next finished job, without waiting.
    #[must_use]
    pub fn try_next(&self) -> Option<Completion> {
        self.completions.try_recv().ok()
    }

    /// Next finished job, waiting at most `timeout`.
    #[must_use]
    pub fn next_timeout(&self, timeout: Duration) -> Option<Completion> {
        match self.completions.recv_timeout(timeout) {
            Ok(completion) => Some(completion),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for TaskWorker {
    fn drop(&mut self) {
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("task worker panicked");
            }
        }
    }
}

fn run_job<D: WorldData + ?Sized>(data: &D, job: Job) -> Completion {
    match job {
        Job::Cull(job) => Completion::CullFinished(job.run()),
        Job::ListNetworkPlayers => Completion::NetworkPlayers(data.network_player_names()),
        Job::LocatePlayer(player) => {
            let result = data.player_position(&player);
            Completion::PlayerLocated { player, result }
        }
        Job::Teleport(request) => {
            let result = teleport(data, &request);
            if let Err(err) = &result {
                warn!(%err, entity = %request.entity, "teleport failed");
            }
            Completion::Teleported { request, result }
        }
    }
}

fn teleport<D: WorldData + ?Sized>(data: &D, request: &TeleportRequest) -> MapResult<()> {
    let mut record = data
        .editable_entity(&request.entity)
        .map_err(MapError::PlayerData)?
        .ok_or_else(|| MapError::NotFound(request.entity.to_string()))?;
    teleport_record(record.as_mut(), &request.target)
}

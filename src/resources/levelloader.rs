//! Background level loading bridge.
//!
//! [`LevelLoaderBridge::request`] runs [`load_level`] on a worker thread and
//! sends the finished [`TileGrid`] (or the error) back over a channel. The
//! grid is moved to the main thread by value; the worker keeps nothing.
//! [`poll_level_loader`](crate::systems::levelload::poll_level_loader)
//! drains the channel once per frame.

use std::thread::JoinHandle;

use bevy_ecs::prelude::Resource;
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, error};

use crate::resources::level::{LevelError, LevelSettings, LevelSource, load_level};
use crate::resources::tilegrid::TileGrid;

/// Outcome of one load request.
#[derive(Debug)]
pub enum LevelLoadMessage {
    Loaded { id: String, grid: TileGrid },
    Failed { id: String, error: LevelError },
}

impl LevelLoadMessage {
    pub fn id(&self) -> &str {
        match self {
            LevelLoadMessage::Loaded { id, .. } | LevelLoadMessage::Failed { id, .. } => id,
        }
    }
}

/// Shared bridge between the ECS world and level loading threads.
#[derive(Resource)]
pub struct LevelLoaderBridge {
    tx_msg: Sender<LevelLoadMessage>,
    /// Receiver for finished loads (worker -> ECS).
    pub rx_msg: Receiver<LevelLoadMessage>,
    workers: Vec<JoinHandle<()>>,
    pending: usize,
}

impl Default for LevelLoaderBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelLoaderBridge {
    pub fn new() -> Self {
        let (tx_msg, rx_msg) = unbounded::<LevelLoadMessage>();
        Self {
            tx_msg,
            rx_msg,
            workers: Vec::new(),
            pending: 0,
        }
    }

    /// Start loading `id` from `source` on a worker thread.
    ///
    /// If the thread cannot be spawned the failure is queued as a
    /// [`LevelLoadMessage::Failed`] so callers see it through the same path.
    pub fn request<S>(&mut self, source: S, id: impl Into<String>, settings: LevelSettings)
    where
        S: LevelSource + Send + 'static,
    {
        let id: String = id.into();
        let tx = self.tx_msg.clone();
        let worker_id = id.clone();
        self.pending += 1;
        debug!("Requesting level '{}'", id);

        let spawned = std::thread::Builder::new()
            .name(format!("level-loader:{id}"))
            .spawn(move || {
                let msg = match load_level(&source, &worker_id, &settings) {
                    Ok(grid) => LevelLoadMessage::Loaded {
                        id: worker_id,
                        grid,
                    },
                    Err(error) => LevelLoadMessage::Failed {
                        id: worker_id,
                        error,
                    },
                };
                // Receiver gone means the game shut down; nothing to report to.
                let _ = tx.send(msg);
            });

        match spawned {
            Ok(handle) => self.workers.push(handle),
            Err(source) => {
                error!("Failed to spawn level loader thread: {}", source);
                let _ = self.tx_msg.send(LevelLoadMessage::Failed {
                    id,
                    error: LevelError::Spawn(source),
                });
            }
        }
    }

    /// Whether any request has not been received yet.
    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }

    /// Non-blocking receive of the next finished load.
    pub fn try_recv(&mut self) -> Option<LevelLoadMessage> {
        let msg = self.rx_msg.try_recv().ok()?;
        self.finish_one();
        Some(msg)
    }

    /// Block until the next load finishes. Returns `None` if nothing is pending.
    pub fn wait(&mut self) -> Option<LevelLoadMessage> {
        if self.pending == 0 {
            return None;
        }
        let msg = self.rx_msg.recv().ok()?;
        self.finish_one();
        Some(msg)
    }

    fn finish_one(&mut self) {
        self.pending = self.pending.saturating_sub(1);
        self.workers.retain(|handle| !handle.is_finished());
    }
}

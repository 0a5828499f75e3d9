use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::backend::AudioBackend;
use crate::engine::AmbientEngine;
use crate::error::{EngineError, Result};
use crate::sound::{clamp_volume, PlaybackState, SoundType};
use crate::config::VOLUME_DEFAULT;

/// current engine state that the UI can read (what is playing + at what gain)
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSnapshot {
    pub state: PlaybackState,
    /// last level asked for; the engine only applies it while playing
    pub volume: f32,
    pub last_error: Option<EngineError>,
}

impl Default for EngineSnapshot {
    fn default() -> Self {
        Self {
            state: PlaybackState::Idle,
            volume: VOLUME_DEFAULT,
            last_error: None,
        }
    }
}

/// cmds that the UI sends to the engine runtime
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmbientCommand {
    Start(SoundType, f32),
    SetVolume(f32),
    Stop,
}

/// handle used by the UI: send commands + subscribe to live snapshots
#[derive(Clone)]
pub struct AmbientHandle {
    tx: mpsc::UnboundedSender<AmbientCommand>,
    snapshot_rx: watch::Receiver<EngineSnapshot>,
}

impl AmbientHandle {
    pub fn start(&self, sound: SoundType, volume: f32) -> Result<()> {
        self.send(AmbientCommand::Start(sound, volume))
    }

    pub fn set_volume(&self, volume: f32) -> Result<()> {
        self.send(AmbientCommand::SetVolume(volume))
    }

    pub fn stop(&self) -> Result<()> {
        self.send(AmbientCommand::Stop)
    }

    /// last state published by the runtime
    pub fn is_playing(&self) -> bool {
        self.snapshot_rx.borrow().state.is_playing()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<EngineSnapshot> {
        self.snapshot_rx.clone()
    }

    fn send(&self, cmd: AmbientCommand) -> Result<()> {
        self.tx.send(cmd).map_err(|_| EngineError::EngineClosed)
    }
}

/// runtime side of the channels, consumed by `run_engine`
pub struct EngineChannels {
    cmd_rx: mpsc::UnboundedReceiver<AmbientCommand>,
    snapshot_tx: watch::Sender<EngineSnapshot>,
}

pub fn channel() -> (AmbientHandle, EngineChannels) {
    let (tx, cmd_rx) = mpsc::unbounded_channel();
    let (snapshot_tx, snapshot_rx) = watch::channel(EngineSnapshot::default());
    (
        AmbientHandle { tx, snapshot_rx },
        EngineChannels { cmd_rx, snapshot_tx },
    )
}

/// push the latest engine state to watchers (UI)
fn publish<B: AudioBackend>(
    tx: &watch::Sender<EngineSnapshot>,
    engine: &AmbientEngine<B>,
    volume: f32,
    last_error: Option<EngineError>,
) {
    let _ = tx.send(EngineSnapshot {
        state: engine.state(),
        volume,
        last_error,
    });
}

/// main engine runtime: applies UI commands in order until shutdown or every handle is gone
pub async fn run_engine<B: AudioBackend>(
    mut engine: AmbientEngine<B>,
    channels: EngineChannels,
    mut shutdown: watch::Receiver<bool>,
) {
    let EngineChannels { mut cmd_rx, snapshot_tx } = channels;
    let mut volume = snapshot_tx.borrow().volume;
    let mut last_error = None;

    loop {
        tokio::select! {
            // application-level shutdown flag (a dropped sender counts too)
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() { break; }
            }

            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else { break; };
                debug!(?cmd, "engine command");

                match cmd {
                    AmbientCommand::Start(sound, v) => {
                        volume = clamp_volume(v);
                        last_error = engine.start(sound, volume).err();
                    }
                    AmbientCommand::SetVolume(v) => {
                        volume = clamp_volume(v);
                        engine.set_volume(volume);
                    }
                    AmbientCommand::Stop => engine.stop(),
                }
                publish(&snapshot_tx, &engine, volume, last_error.clone());
            }
        }
    }

    // shutdown: release the device before the runtime goes away
    engine.stop();
    publish(&snapshot_tx, &engine, volume, last_error);
    info!("engine runtime exited");
}

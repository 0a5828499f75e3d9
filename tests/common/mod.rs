#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use ambient::backend::{AudioBackend, RenderContext};
use ambient::graph::SignalGraph;
use ambient::{EngineError, Result};

pub const MOCK_RATE: u32 = 8_000;

/// everything the mock backend saw, shared with the test body
#[derive(Debug, Default)]
pub struct Probe {
    pub opened: usize,
    pub closed: usize,
    /// contexts opened and not yet closed
    pub live: usize,
    /// contexts with a connected graph that are not yet closed
    pub connected: usize,
    pub graphs: Vec<SignalGraph>,
    pub gain: Option<f32>,
    pub gain_writes: usize,
    /// when set, every context reports this instead of the level it was given
    pub gain_readback: Option<f32>,
    pub fail_open: bool,
    pub fail_connect: bool,
}

#[derive(Clone, Default)]
pub struct MockBackend {
    pub probe: Arc<Mutex<Probe>>,
}

impl MockBackend {
    pub fn new() -> (Self, Arc<Mutex<Probe>>) {
        let backend = Self::default();
        let probe = backend.probe.clone();
        (backend, probe)
    }
}

impl AudioBackend for MockBackend {
    fn open_context(&mut self) -> Result<Box<dyn RenderContext>> {
        let mut p = self.probe.lock().unwrap();
        if p.fail_open {
            return Err(EngineError::ContextUnavailable("no user gesture yet".into()));
        }
        p.opened += 1;
        p.live += 1;
        Ok(Box::new(MockContext {
            probe: self.probe.clone(),
            connected: false,
            closed: false,
            gain: None,
        }))
    }
}

struct MockContext {
    probe: Arc<Mutex<Probe>>,
    connected: bool,
    closed: bool,
    gain: Option<f32>,
}

impl RenderContext for MockContext {
    fn sample_rate(&self) -> u32 {
        MOCK_RATE
    }

    fn connect(&mut self, graph: SignalGraph, gain: f32) -> Result<()> {
        let mut p = self.probe.lock().unwrap();
        if p.fail_connect {
            return Err(EngineError::Graph("node creation failed".into()));
        }
        p.graphs.push(graph);
        p.connected += 1;
        p.gain = Some(gain);
        self.connected = true;
        self.gain = Some(gain);
        Ok(())
    }

    fn set_gain(&mut self, gain: f32) {
        let mut p = self.probe.lock().unwrap();
        p.gain = Some(gain);
        p.gain_writes += 1;
        self.gain = Some(gain);
    }

    fn gain(&self) -> Option<f32> {
        let readback = self.probe.lock().unwrap().gain_readback;
        self.gain.map(|g| readback.unwrap_or(g))
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        let mut p = self.probe.lock().unwrap();
        p.closed += 1;
        p.live -= 1;
        if self.connected {
            p.connected -= 1;
            p.gain = None;
        }
    }
}

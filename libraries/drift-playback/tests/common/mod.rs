//! In-memory audio platform and media output for driver tests

#![allow(dead_code)]

use async_trait::async_trait;
use drift_playback::{
    AnalysisTap, AudioContextHandle, AudioPlatform, ContextState, ElementId, GraphError,
    MediaError, MediaOutput, Ticket,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

pub const ELEMENT: &str = "audio-main";

// ============================================================================
// AUDIO PLATFORM
// ============================================================================

#[derive(Debug, Default)]
pub struct PlatformLog {
    pub contexts_created: usize,
    pub closes: usize,
    /// Elements sourced into any context, ever
    pub sourced: HashSet<ElementId>,
    pub destination_only: usize,
    pub fail_resume: bool,
}

#[derive(Clone, Default)]
pub struct FakePlatform {
    pub log: Arc<Mutex<PlatformLog>>,
}

impl FakePlatform {
    pub fn log(&self) -> std::sync::MutexGuard<'_, PlatformLog> {
        self.log.lock().unwrap()
    }
}

pub struct FakeContext {
    log: Arc<Mutex<PlatformLog>>,
    state: ContextState,
}

pub struct FakeTap {
    bins: usize,
}

impl AnalysisTap for FakeTap {
    fn frequency_bin_count(&self) -> usize {
        self.bins
    }

    fn read_frequency_data(&self, out: &mut [u8]) {
        for (i, bin) in out.iter_mut().enumerate() {
            *bin = (255 - i.min(255)) as u8;
        }
    }
}

impl AudioPlatform for FakePlatform {
    type Context = FakeContext;

    fn create_context(&mut self) -> Result<FakeContext, GraphError> {
        self.log().contexts_created += 1;
        Ok(FakeContext {
            log: Arc::clone(&self.log),
            state: ContextState::Suspended,
        })
    }
}

#[async_trait]
impl AudioContextHandle for FakeContext {
    type Tap = FakeTap;

    fn state(&self) -> ContextState {
        self.state
    }

    async fn resume(&mut self) -> Result<(), GraphError> {
        if self.log.lock().unwrap().fail_resume {
            return Err(GraphError::ContextResume("resume refused".into()));
        }
        self.state = ContextState::Running;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), GraphError> {
        self.log.lock().unwrap().closes += 1;
        self.state = ContextState::Closed;
        Ok(())
    }

    fn create_analyser(&mut self, fft_size: u32) -> Result<FakeTap, GraphError> {
        Ok(FakeTap {
            bins: (fft_size / 2) as usize,
        })
    }

    fn connect_element(&mut self, element: &ElementId, _tap: &FakeTap) -> Result<(), GraphError> {
        if !self.log.lock().unwrap().sourced.insert(element.clone()) {
            return Err(GraphError::AlreadyBound);
        }
        Ok(())
    }

    fn connect_to_destination(&mut self, _tap: &FakeTap) -> Result<(), GraphError> {
        self.log.lock().unwrap().destination_only += 1;
        Ok(())
    }

    fn disconnect(&mut self, _tap: FakeTap) {}
}

// ============================================================================
// MEDIA OUTPUT
// ============================================================================

#[derive(Debug)]
pub struct MediaLog {
    pub loads: Vec<(Ticket, String)>,
    pub plays: usize,
    pub pauses: usize,
    pub seeks: Vec<f64>,
    pub muted: bool,
    pub paused: bool,
    pub position_secs: f64,
    pub duration_secs: Option<f64>,
    /// URLs whose play() is rejected
    pub failing: HashSet<String>,
}

impl Default for MediaLog {
    fn default() -> Self {
        Self {
            loads: Vec::new(),
            plays: 0,
            pauses: 0,
            seeks: Vec::new(),
            muted: false,
            paused: true,
            position_secs: 0.0,
            duration_secs: None,
            failing: HashSet::new(),
        }
    }
}

#[derive(Clone, Default)]
pub struct FakeMedia {
    pub log: Arc<Mutex<MediaLog>>,
}

impl FakeMedia {
    pub fn failing(urls: &[&str]) -> Self {
        let media = Self::default();
        media.log().failing = urls.iter().map(|u| (*u).to_string()).collect();
        media
    }

    pub fn log(&self) -> std::sync::MutexGuard<'_, MediaLog> {
        self.log.lock().unwrap()
    }

    pub fn last_load(&self) -> Option<(Ticket, String)> {
        self.log().loads.last().cloned()
    }
}

#[async_trait]
impl MediaOutput for FakeMedia {
    fn element_id(&self) -> ElementId {
        ELEMENT.to_string()
    }

    fn load(&self, ticket: Ticket, url: &str) {
        let mut log = self.log();
        log.loads.push((ticket, url.to_string()));
        log.paused = true;
        log.position_secs = 0.0;
        log.duration_secs = Some(180.0);
    }

    async fn play(&self) -> Result<(), MediaError> {
        let mut log = self.log();
        log.plays += 1;
        let url = log.loads.last().map(|(_, url)| url.clone()).unwrap_or_default();
        if log.failing.contains(&url) {
            return Err(MediaError::Source(format!("cannot decode {url}")));
        }
        log.paused = false;
        Ok(())
    }

    fn pause(&self) {
        let mut log = self.log();
        log.pauses += 1;
        log.paused = true;
    }

    fn seek(&self, position_secs: f64) {
        let mut log = self.log();
        log.seeks.push(position_secs);
        log.position_secs = position_secs;
    }

    fn set_muted(&self, muted: bool) {
        self.log().muted = muted;
    }

    fn position_secs(&self) -> f64 {
        self.log().position_secs
    }

    fn duration_secs(&self) -> Option<f64> {
        self.log().duration_secs
    }

    fn is_paused(&self) -> bool {
        self.log().paused
    }
}

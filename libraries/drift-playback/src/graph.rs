//! Audio graph lifecycle
//!
//! Owns the single audio-processing context and the analysis tap bound to
//! the media element. The playback session never touches these directly;
//! the host performs `ResumeContext` / `RebuildAudioGraph` commands through
//! this manager.
//!
//! The platform's element-to-source binding is one-time-only: once an
//! element has been sourced into any context, binding it again fails with
//! `GraphError::AlreadyBound`. The manager recovers by wiring a fresh
//! analyser straight to the destination.

use crate::error::GraphError;
use crate::feed::AnalysisTap;
use crate::types::ContextState;
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Identifies a media output element
pub type ElementId = String;

/// Platform audio context
#[async_trait]
pub trait AudioContextHandle: Send {
    /// Analyser node type produced by this context
    type Tap: AnalysisTap + 'static;

    /// Current state
    fn state(&self) -> ContextState;

    /// Resume processing
    async fn resume(&mut self) -> Result<(), GraphError>;

    /// Close the context; all nodes become unusable
    async fn close(&mut self) -> Result<(), GraphError>;

    /// Create an analyser with the given FFT size
    fn create_analyser(&mut self, fft_size: u32) -> Result<Self::Tap, GraphError>;

    /// Route element -> analyser -> destination
    ///
    /// Fails with `GraphError::AlreadyBound` if the element was sourced
    /// before, in this or any other context.
    fn connect_element(&mut self, element: &ElementId, tap: &Self::Tap) -> Result<(), GraphError>;

    /// Route analyser -> destination without sourcing an element
    fn connect_to_destination(&mut self, tap: &Self::Tap) -> Result<(), GraphError>;

    /// Detach an analyser from the graph
    fn disconnect(&mut self, tap: Self::Tap);
}

/// Factory for audio contexts
pub trait AudioPlatform: Send {
    /// Context type
    type Context: AudioContextHandle;

    /// Create a new context (may start suspended)
    fn create_context(&mut self) -> Result<Self::Context, GraphError>;
}

type TapOf<P> = <<P as AudioPlatform>::Context as AudioContextHandle>::Tap;

/// Audio graph manager
///
/// Holds at most one context and at most one tap bound to at most one
/// element.
pub struct AudioGraph<P: AudioPlatform> {
    platform: P,
    fft_size: u32,
    context: Option<P::Context>,
    tap: Option<TapOf<P>>,
    /// (context generation, element) of the live binding
    binding: Option<(u64, ElementId)>,
    generation: u64,
}

impl<P: AudioPlatform> AudioGraph<P> {
    /// Create a manager; no context exists until first use
    pub fn new(platform: P, fft_size: u32) -> Self {
        Self {
            platform,
            fft_size,
            context: None,
            tap: None,
            binding: None,
            generation: 0,
        }
    }

    /// Current context state
    pub fn state(&self) -> ContextState {
        self.context
            .as_ref()
            .map(|c| c.state())
            .unwrap_or(ContextState::Uninitialized)
    }

    /// Number of contexts created so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Live analysis tap, if bound
    pub fn tap(&self) -> Option<&dyn AnalysisTap> {
        self.tap.as_ref().map(|t| t as &dyn AnalysisTap)
    }

    /// Element the tap is bound to
    pub fn bound_element(&self) -> Option<&ElementId> {
        self.binding
            .as_ref()
            .filter(|(generation, _)| *generation == self.generation)
            .map(|(_, element)| element)
    }

    /// Access the platform (tests, diagnostics)
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Existing usable context, or a freshly created one
    fn context_mut(&mut self) -> Result<&mut P::Context, GraphError> {
        let closed = self
            .context
            .as_ref()
            .is_some_and(|c| c.state() == ContextState::Closed);
        if closed {
            debug!(generation = self.generation, "Audio context closed, recreating");
            self.context = None;
            self.tap = None;
            self.binding = None;
        }

        if self.context.is_none() {
            let context = self.platform.create_context()?;
            self.generation += 1;
            info!(generation = self.generation, "Created audio context");
            self.tap = None;
            self.binding = None;
            self.context = Some(context);
        }

        self.context
            .as_mut()
            .ok_or_else(|| GraphError::ContextCreate("context unavailable".to_string()))
    }

    /// Create the context lazily and resume it if suspended
    pub async fn ensure_context(&mut self) -> Result<ContextState, GraphError> {
        let context = self.context_mut()?;
        if context.state() == ContextState::Suspended {
            debug!("Resuming suspended audio context");
            context.resume().await?;
        }
        Ok(context.state())
    }

    /// Attach the analyser to `element`'s output
    ///
    /// Idempotent per (context, element). Recovers from `AlreadyBound` by
    /// wiring a fresh analyser directly to the destination.
    pub async fn bind_analysis(&mut self, element: &ElementId) -> Result<(), GraphError> {
        // Creating the context may bump the generation, so do it first.
        self.context_mut()?;
        let generation = self.generation;

        let already = self
            .binding
            .as_ref()
            .is_some_and(|(g, e)| *g == generation && e == element);
        if already && self.tap.is_some() {
            return Ok(());
        }

        let fft_size = self.fft_size;
        let previous = self.tap.take();
        self.binding = None;

        let context = self.context_mut()?;
        if let Some(old) = previous {
            context.disconnect(old);
        }

        let tap = context.create_analyser(fft_size)?;
        match context.connect_element(element, &tap) {
            Ok(()) => debug!(element = %element, generation, "Bound analysis tap"),
            Err(GraphError::AlreadyBound) => {
                debug!(
                    element = %element,
                    generation,
                    "Element already sourced, wiring analyser to destination"
                );
                context.connect_to_destination(&tap)?;
            }
            Err(e) => return Err(e),
        }

        self.tap = Some(tap);
        self.binding = Some((generation, element.clone()));
        Ok(())
    }

    /// Ensure a running context with the tap bound to `element`
    pub async fn prepare(&mut self, element: &ElementId) -> Result<ContextState, GraphError> {
        self.ensure_context().await?;
        self.bind_analysis(element).await?;
        Ok(self.state())
    }

    /// Close the context and invalidate the tap; safe to call repeatedly
    pub async fn teardown(&mut self) {
        self.tap = None;
        self.binding = None;
        if let Some(mut context) = self.context.take() {
            if context.state() != ContextState::Closed {
                if let Err(e) = context.close().await {
                    warn!(error = %e, "Failed to close audio context");
                }
            }
            info!(generation = self.generation, "Audio context torn down");
        }
    }

    /// Tear everything down and build a fresh graph bound to `element`
    pub async fn rebuild(&mut self, element: &ElementId) -> Result<ContextState, GraphError> {
        self.teardown().await;
        self.prepare(element).await
    }
}

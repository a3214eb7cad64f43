//! Two-phase render-then-loop lifecycle
//!
//! Builds the full graph against the offline engine, awaits the rendered
//! buffer, then loops that buffer through a minimal playback graph. The
//! offline render is the single suspension point; a rejected render is
//! logged and leaves the system silent, with no retry.

use crate::config::GenerationContext;
use crate::engine::{OfflineEngine, PlaybackEngine};
use crate::error::{Error, RenderError};
use crate::graph::builder;
use crate::params::{self, RandomSource};
use crate::synth::SampleBuffer;
use std::sync::Arc;
use tracing::{error, info};

/// Seconds of shared noise bed generated per piece; the source loops
const NOISE_DURATION: f64 = 3.0;

/// Lifecycle phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    BuildingOffline,
    Rendering,
    RenderComplete,
    BuildingPlayback,
    Playing,
    Failed,
}

/// Drives one piece from generation to looping playback
pub struct Orchestrator<O, P> {
    context: GenerationContext,
    offline: Arc<O>,
    playback: P,
    phase: Phase,
}

impl<O, P> Orchestrator<O, P>
where
    O: OfflineEngine + 'static,
    P: PlaybackEngine,
{
    /// Create an orchestrator for one generation run
    pub fn new(context: GenerationContext, offline: O, playback: P) -> Self {
        Self {
            context,
            offline: Arc::new(offline),
            playback,
            phase: Phase::Idle,
        }
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The run's generation context
    pub fn context(&self) -> &GenerationContext {
        &self.context
    }

    /// Generate voices, build the master graph, and render the full track.
    ///
    /// Rendering runs on a blocking worker; this is the only await point in
    /// the lifecycle. A rejected render moves the orchestrator to `Failed`.
    pub async fn render_track<R: RandomSource>(
        &mut self,
        rng: &mut R,
    ) -> Result<Arc<SampleBuffer>, Error> {
        self.phase = Phase::BuildingOffline;
        let config = &self.context.config;
        let voices = params::generate_voices(config, rng);
        let noise = Arc::new(params::generate_noise(
            NOISE_DURATION,
            self.context.sample_rate,
            rng,
        ));
        let graph = builder::build_master_graph(&voices, noise, config)?;

        let frames = self.context.track_frames();
        info!(
            frames,
            duration_secs = config.track_duration,
            nodes = graph.len(),
            "rendering track"
        );

        self.phase = Phase::Rendering;
        let offline = Arc::clone(&self.offline);
        let handle = tokio::task::spawn_blocking(move || offline.render(&graph, frames));

        match handle.await {
            Ok(Ok(buffer)) => {
                self.phase = Phase::RenderComplete;
                info!(frames = buffer.frames(), "render complete");
                Ok(Arc::new(buffer))
            }
            Ok(Err(err)) => {
                self.phase = Phase::Failed;
                error!(%err, "offline render failed; staying silent");
                Err(err.into())
            }
            Err(err) => {
                self.phase = Phase::Failed;
                error!(%err, "render task aborted");
                Err(Error::Render(RenderError::Backend(err.to_string())))
            }
        }
    }

    /// Build the minimal loop graph and start the real-time engine
    pub fn play_loop(&mut self, buffer: Arc<SampleBuffer>) -> Result<(), Error> {
        self.phase = Phase::BuildingPlayback;
        let graph = builder::build_playback_graph(buffer)?;
        self.playback.play(&graph)?;
        self.phase = Phase::Playing;
        info!("looping playback started");
        Ok(())
    }

    /// Full lifecycle: render the track, then loop it on success
    pub async fn run<R: RandomSource>(&mut self, rng: &mut R) -> Result<(), Error> {
        let buffer = self.render_track(rng).await?;
        self.play_loop(buffer)
    }
}

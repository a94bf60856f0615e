//! Live output: wiring a [`SynthEngine`] to an audio backend.

use crate::backend::{AudioBackend, BackendStreamConfig, StreamHandle};
use crate::Result;
use polytone_synth::SynthEngine;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// A running output stream rendering one engine.
///
/// Starting the stream reports the backend's sample rate to the engine and
/// registers the engine's [`Renderer`](polytone_synth::Renderer) as the
/// output callback. Note events go straight to the engine from any thread;
/// dropping the stream stops playback.
///
/// # Example
///
/// ```rust,ignore
/// use polytone_io::{BackendStreamConfig, CpalBackend, SynthStream};
/// use polytone_synth::{SynthConfig, SynthEngine};
///
/// let engine = SynthEngine::shared(SynthConfig::default())?;
/// let stream = SynthStream::start(&CpalBackend::new(), engine, BackendStreamConfig::default())?;
/// stream.engine().play(60, 1.0)?;
/// ```
#[derive(Debug)]
pub struct SynthStream {
    engine: Arc<SynthEngine>,
    config: BackendStreamConfig,
    sample_rate: u32,
    errors: Arc<AtomicU32>,
    _handle: StreamHandle,
}

impl SynthStream {
    /// Start rendering `engine` through `backend`.
    pub fn start(
        backend: &dyn AudioBackend,
        engine: Arc<SynthEngine>,
        config: BackendStreamConfig,
    ) -> Result<Self> {
        let sample_rate = backend.actual_sample_rate(&config);
        engine.set_sample_rate(sample_rate)?;

        let channels = usize::from(config.channels);
        let mut renderer = engine.renderer();
        let errors = Arc::new(AtomicU32::new(0));
        let error_count = Arc::clone(&errors);

        let handle = backend.build_output_stream(
            &config,
            Box::new(move |buffer: &mut [f32]| {
                renderer.render(buffer, channels);
            }),
            Box::new(move |message: &str| {
                error_count.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(error = message, "output stream error");
            }),
        )?;

        tracing::info!(
            backend = backend.name(),
            generator = engine.generator().name(),
            sample_rate,
            channels = config.channels,
            buffer_size = config.buffer_size,
            "synth stream running"
        );

        Ok(Self {
            engine,
            config,
            sample_rate,
            errors,
            _handle: handle,
        })
    }

    /// The engine being rendered.
    pub fn engine(&self) -> &Arc<SynthEngine> {
        &self.engine
    }

    /// Configuration the stream was requested with.
    pub fn config(&self) -> &BackendStreamConfig {
        &self.config
    }

    /// Sample rate the backend is running at.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of errors the backend has reported since start.
    pub fn error_count(&self) -> u32 {
        self.errors.load(Ordering::Relaxed)
    }

    /// Stop playback.
    pub fn stop(self) {
        tracing::info!(errors = self.error_count(), "synth stream stopped");
    }
}

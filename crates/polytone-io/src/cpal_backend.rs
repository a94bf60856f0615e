//! cpal-based audio backend implementation.
//!
//! [`CpalBackend`] is the default [`AudioBackend`], wrapping
//! [cpal](https://crates.io/crates/cpal) for ALSA (Linux), CoreAudio
//! (macOS), WASAPI (Windows) and the other hosts cpal supports.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use polytone_io::{AudioBackend, BackendStreamConfig, CpalBackend};
//!
//! let backend = CpalBackend::new();
//! let stream = backend.build_output_stream(
//!     &BackendStreamConfig::default(),
//!     Box::new(|buffer: &mut [f32]| buffer.fill(0.0)),
//!     Box::new(|err| eprintln!("Audio error: {}", err)),
//! )?;
//! // Stream plays until `stream` is dropped.
//! ```

use crate::backend::{
    AudioBackend, BackendStreamConfig, ErrorCallback, OutputCallback, StreamHandle,
};
use crate::device::device_name;
use crate::{AudioDevice, Error, Result};
use cpal::Host;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

/// cpal-based audio backend.
///
/// Holds a cpal [`Host`], the connection to the platform's audio system.
pub struct CpalBackend {
    host: Host,
}

impl CpalBackend {
    /// Create a new cpal backend using the platform's default audio host.
    pub fn new() -> Self {
        let host = cpal::default_host();
        tracing::info!(host = host.id().name(), "cpal backend initialized");
        Self { host }
    }

    /// Find a cpal output device by name, or return the default.
    ///
    /// Matching is a case-insensitive substring search.
    fn find_output_device(&self, name: Option<&str>) -> Result<cpal::Device> {
        match name {
            Some(search) => {
                let search_lower = search.to_lowercase();
                let devices = self
                    .host
                    .output_devices()
                    .map_err(|e| Error::Stream(e.to_string()))?;

                for device in devices {
                    if let Ok(dev_name) = device_name(&device)
                        && dev_name.to_lowercase().contains(search_lower.as_str())
                    {
                        return Ok(device);
                    }
                }
                Err(Error::DeviceNotFound(format!(
                    "no output device matching '{}'",
                    search
                )))
            }
            None => self.host.default_output_device().ok_or(Error::NoDevice),
        }
    }

    /// Whether `device` advertises `config`'s channel count at its sample rate.
    fn supports(device: &cpal::Device, config: &BackendStreamConfig) -> bool {
        device
            .supported_output_configs()
            .map(|mut ranges| {
                ranges.any(|range| {
                    range.channels() == config.channels
                        && range.min_sample_rate() <= config.sample_rate
                        && config.sample_rate <= range.max_sample_rate()
                })
            })
            .unwrap_or(false)
    }
}

impl Default for CpalBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioBackend for CpalBackend {
    fn name(&self) -> &'static str {
        "cpal"
    }

    fn list_devices(&self) -> Result<Vec<AudioDevice>> {
        // CpalBackend always uses the default host, as does list_devices().
        crate::device::list_devices()
    }

    fn default_output_device(&self) -> Result<Option<AudioDevice>> {
        crate::device::default_output_device()
    }

    fn build_output_stream(
        &self,
        config: &BackendStreamConfig,
        mut callback: OutputCallback,
        mut error_callback: ErrorCallback,
    ) -> Result<StreamHandle> {
        let device = self.find_output_device(config.device_name.as_deref())?;
        let sample_rate = self.actual_sample_rate(config);

        let stream_config = cpal::StreamConfig {
            channels: config.channels,
            sample_rate,
            buffer_size: cpal::BufferSize::Fixed(config.buffer_size),
        };

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    callback(data);
                },
                move |err| {
                    error_callback(&err.to_string());
                },
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;

        stream.play().map_err(|e| Error::Stream(e.to_string()))?;
        tracing::info!(
            channels = config.channels,
            sample_rate,
            buffer_size = config.buffer_size,
            "output stream started"
        );

        Ok(StreamHandle::new(stream))
    }

    /// Falls back to the device's default rate when the requested one
    /// isn't advertised.
    fn actual_sample_rate(&self, config: &BackendStreamConfig) -> u32 {
        let Ok(device) = self.find_output_device(config.device_name.as_deref()) else {
            return config.sample_rate;
        };
        if Self::supports(&device, config) {
            return config.sample_rate;
        }
        let fallback = device
            .default_output_config()
            .map(|c| c.sample_rate())
            .unwrap_or(config.sample_rate);
        tracing::warn!(
            requested = config.sample_rate,
            fallback,
            "requested sample rate not supported by device"
        );
        fallback
    }
}

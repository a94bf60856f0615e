//! Output device discovery via cpal.

use crate::Result;
use cpal::Device;
use cpal::traits::{DeviceTrait, HostTrait};

/// Extract device name via `description()` (cpal 0.17+).
pub(crate) fn device_name(device: &Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

/// Output device information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDevice {
    /// Human-readable device name.
    pub name: String,
    /// Whether this is the host's default output.
    pub is_default: bool,
    /// Default sample rate in Hz.
    pub default_sample_rate: u32,
    /// Default channel count.
    pub channels: u16,
}

fn describe(device: &Device, name: String, is_default: bool) -> AudioDevice {
    let config = device.default_output_config().ok();
    AudioDevice {
        name,
        is_default,
        default_sample_rate: config.as_ref().map(|c| c.sample_rate()).unwrap_or(48000),
        channels: config.as_ref().map(|c| c.channels()).unwrap_or(2),
    }
}

/// List all output devices on the default host.
pub fn list_devices() -> Result<Vec<AudioDevice>> {
    let host = cpal::default_host();
    let default_name = host
        .default_output_device()
        .and_then(|d| device_name(&d).ok());

    let mut devices = Vec::new();
    if let Ok(outputs) = host.output_devices() {
        for device in outputs {
            if let Ok(name) = device_name(&device) {
                // Some hosts list the same endpoint twice
                if devices.iter().any(|d: &AudioDevice| d.name == name) {
                    continue;
                }
                let is_default = default_name.as_deref() == Some(name.as_str());
                devices.push(describe(&device, name, is_default));
            }
        }
    }

    Ok(devices)
}

/// Get the default output device info.
pub fn default_output_device() -> Result<Option<AudioDevice>> {
    let host = cpal::default_host();
    Ok(host.default_output_device().and_then(|d| {
        device_name(&d)
            .ok()
            .map(|name| describe(&d, name, true))
    }))
}

//! Virtual pointer device implementations.
//!
//! The OS backend is selected at compile time via `#[cfg(target_os = ...)]`;
//! [`open_pointer_device`] then picks between it and the dry-run logger at
//! runtime from [`DeviceConfig::backend`].

use std::sync::Arc;

use tracing::info;

use crate::application::emit_pointer::{DeviceError, PointerDevice};
use crate::infrastructure::storage::config::{DeviceBackend, DeviceConfig};

pub mod dry_run;
pub mod mock;

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(target_os = "windows")]
pub mod windows;

/// Opens the process's single virtual pointer device.
///
/// # Errors
///
/// Returns [`DeviceError::Create`] when the OS refuses the device and
/// [`DeviceError::UnsupportedPlatform`] when no OS backend exists for this
/// target.
pub fn open_pointer_device(config: &DeviceConfig) -> Result<Arc<dyn PointerDevice>, DeviceError> {
    match config.backend {
        DeviceBackend::DryRun => {
            info!("using dry-run pointer backend");
            Ok(Arc::new(dry_run::DryRunPointerDevice::new()))
        }
        DeviceBackend::Auto => open_platform_device(config),
    }
}

#[cfg(target_os = "linux")]
fn open_platform_device(config: &DeviceConfig) -> Result<Arc<dyn PointerDevice>, DeviceError> {
    Ok(Arc::new(linux::UinputPointerDevice::create(config)?))
}

#[cfg(target_os = "windows")]
fn open_platform_device(_config: &DeviceConfig) -> Result<Arc<dyn PointerDevice>, DeviceError> {
    info!("using SendInput pointer backend");
    Ok(Arc::new(windows::SendInputPointerDevice::new()))
}

#[cfg(not(any(target_os = "linux", target_os = "windows")))]
fn open_platform_device(_config: &DeviceConfig) -> Result<Arc<dyn PointerDevice>, DeviceError> {
    Err(DeviceError::UnsupportedPlatform(
        std::env::consts::OS.to_string(),
    ))
}

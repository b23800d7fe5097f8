//! Exclusive access to a capture device
//!
//! A microphone or camera is held by at most one session at a time. A
//! [`DeviceLease`] stops the device when dropped, so every exit path
//! (early return, `?`, panic) releases it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::AudioError;

/// A hardware capture source
pub trait CaptureDevice {
    /// Acquire the hardware (permission prompt, open stream)
    fn open(&mut self) -> Result<(), AudioError>;

    /// Stop all tracks; must not fail
    fn release(&mut self);
}

/// Guards a device so only one lease exists at a time
#[derive(Debug, Clone, Default)]
pub struct DeviceSlot {
    busy: Arc<AtomicBool>,
}

impl DeviceSlot {
    /// Create a free slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a lease is currently held
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Open `device` and hold it until the lease is dropped
    ///
    /// # Errors
    ///
    /// `DeviceAccessError` if another lease is active or `open` fails. A failed
    /// open leaves the slot free.
    pub fn acquire<D: CaptureDevice>(&self, mut device: D) -> Result<DeviceLease<D>, AudioError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(AudioError::DeviceAccessError(
                "Device is already in use".to_string(),
            ));
        }

        if let Err(err) = device.open() {
            self.busy.store(false, Ordering::Release);
            log::warn!("Failed to open capture device: {}", err);
            return Err(match err {
                AudioError::DeviceAccessError(_) => err,
                other => AudioError::DeviceAccessError(other.to_string()),
            });
        }

        log::debug!("Capture device acquired");
        Ok(DeviceLease {
            device,
            busy: Arc::clone(&self.busy),
        })
    }
}

/// Active hold on a capture device
#[derive(Debug)]
pub struct DeviceLease<D: CaptureDevice> {
    device: D,
    busy: Arc<AtomicBool>,
}

impl<D: CaptureDevice> DeviceLease<D> {
    /// The leased device
    pub fn device(&mut self) -> &mut D {
        &mut self.device
    }

    /// Release the device now
    pub fn stop(self) {
        drop(self);
    }
}

impl<D: CaptureDevice> Drop for DeviceLease<D> {
    fn drop(&mut self) {
        self.device.release();
        self.busy.store(false, Ordering::Release);
        log::debug!("Capture device released");
    }
}

//! Single-flight guard for crop operations.
//!
//! A crop rasterizes and encodes a full-resolution surface, which can take a
//! while. Only one may run at a time; a second request while one is in
//! flight fails fast with [`CropError::Busy`] instead of queueing.

use std::sync::atomic::{AtomicBool, Ordering};

use log::warn;

use super::{CropError, CropRequest, OutputImage, Rasterizer};
use crate::decode::SourceImage;

/// Tracks whether a crop operation is in flight.
#[derive(Debug, Default)]
pub struct CropGate {
    busy: AtomicBool,
}

/// Held while a crop runs. Dropping it reopens the gate.
#[derive(Debug)]
pub struct CropPermit<'a> {
    gate: &'a CropGate,
}

impl CropGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn acquire(&self) -> Result<(), CropError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|_| {
                warn!("crop rejected: another crop is in progress");
                CropError::Busy
            })
    }

    fn release(&self) {
        self.busy.store(false, Ordering::Release);
    }

    /// Mark a crop as started, or fail with [`CropError::Busy`].
    pub fn try_begin(&self) -> Result<CropPermit<'_>, CropError> {
        self.acquire()?;
        Ok(CropPermit { gate: self })
    }

    /// Run one crop under the gate. The gate reopens whether the crop
    /// succeeds or fails.
    pub fn run<R: Rasterizer + ?Sized>(
        &self,
        rasterizer: &R,
        source: &SourceImage,
        request: CropRequest,
    ) -> Result<OutputImage, CropError> {
        let _permit = self.try_begin()?;
        rasterizer.rasterize(source, request.region, request.rotation)
    }
}

impl Drop for CropPermit<'_> {
    fn drop(&mut self) {
        self.gate.release();
    }
}

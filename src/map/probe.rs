//! Raster decode probing.
//!
//! An overlay image is only bound to the map surface once it is known to
//! decode. The probe reports a tri-state outcome rather than a `Result`:
//! decode failure is an expected condition that defers registration, never
//! an error, and a probe backed by an in-flight load may simply not have an
//! answer yet.

use lru::LruCache;
use std::num::NonZeroUsize;
use tracing::debug;

use crate::models::ImageHandle;

/// Bound on remembered probe verdicts.
///
/// Using `NonZeroUsize` directly to avoid runtime `expect()` calls.
#[allow(clippy::panic)]
const PROBE_CACHE_CAPACITY: NonZeroUsize = {
    match NonZeroUsize::new(256) {
        Some(n) => n,
        None => panic!("PROBE_CACHE_CAPACITY must be non-zero"),
    }
};

/// Result of asking whether an image decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The image decoded successfully.
    Valid,
    /// The bytes are not a decodable image.
    Invalid,
    /// No verdict yet; treat the layer as not ready.
    Pending,
}

impl ProbeOutcome {
    /// Whether the image may be bound to the surface.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Asks whether raster content decodes into a displayable image.
pub trait DecodeProbe {
    /// Probes `image`, returning a verdict or [`ProbeOutcome::Pending`]
    /// when none is available yet.
    fn probe(&mut self, image: &ImageHandle) -> ProbeOutcome;
}

/// Probe that decodes the bytes in place and remembers verdicts.
///
/// Verdicts are cached by content digest, so reconciling repeatedly over an
/// unchanged working set decodes each image at most once.
#[derive(Debug)]
pub struct ImageDecodeProbe {
    verdicts: LruCache<String, bool>,
}

impl ImageDecodeProbe {
    /// Creates a probe with the default verdict cache size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            verdicts: LruCache::new(PROBE_CACHE_CAPACITY),
        }
    }
}

impl Default for ImageDecodeProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl DecodeProbe for ImageDecodeProbe {
    fn probe(&mut self, image: &ImageHandle) -> ProbeOutcome {
        let digest = image.digest();
        if let Some(valid) = self.verdicts.get(&digest) {
            return if *valid {
                ProbeOutcome::Valid
            } else {
                ProbeOutcome::Invalid
            };
        }

        let valid = image::load_from_memory(image.as_bytes()).is_ok();
        if !valid {
            debug!(digest = %digest, len = image.len(), "image failed decode probe");
        }
        self.verdicts.put(digest, valid);
        if valid {
            ProbeOutcome::Valid
        } else {
            ProbeOutcome::Invalid
        }
    }
}

/// Probe whose verdict never arrives.
///
/// Models an image load that hangs forever; layers probed through it stay
/// perpetually not ready.
#[derive(Debug, Default, Clone, Copy)]
pub struct PendingProbe;

impl DecodeProbe for PendingProbe {
    fn probe(&mut self, _image: &ImageHandle) -> ProbeOutcome {
        ProbeOutcome::Pending
    }
}

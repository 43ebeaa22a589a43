// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Configuration-error taxonomy.  Every fallible constructor in the
//! crate fails fast with one of these before any computation state is
//! created; nothing here is retried or recovered at this level.

/// A rejected run configuration.  Each variant names the parameter
/// that failed validation.
#[derive(Debug, Fail, PartialEq)]
pub enum ConfigError {
    /// The image width or height is zero.
    #[fail(display = "image dimensions must be positive, got {}x{}", width, height)]
    BadDimensions {
        /// Requested image width in pixels.
        width: usize,
        /// Requested image height in pixels.
        height: usize,
    },

    /// The complex-plane corners do not describe a non-empty rectangle.
    #[fail(display = "the left lower corner is not below and to the left of the right upper corner")]
    BadPlane,

    /// The iteration cap is zero.
    #[fail(display = "the iteration cap must be positive")]
    BadIterationCap,

    /// The chunk size is zero.
    #[fail(display = "the chunk size must be positive")]
    BadChunkSize,

    /// The per-worker thread count is zero.
    #[fail(display = "the thread count must be positive")]
    BadThreadCount,

    /// The worker count is zero.
    #[fail(display = "the worker count must be positive")]
    BadWorkerCount,
}

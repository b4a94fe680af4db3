//! Face detection submission pipeline: send an image URL to a remote
//! detection service, turn its normalized regions into pixel bounding
//! boxes once the image's size is known, and report the face count to a
//! usage-tracking backend.

pub mod detection;
pub mod imaging;
pub mod pipeline;
pub mod shared;
pub mod usage;

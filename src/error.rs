use std::path::PathBuf;

use crate::state::SlideState;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown transition `{0}`")]
    UnknownTransition(String),

    #[error("slide `{0}` has no video to play")]
    MissingVideo(String),

    #[error("attribute `{name}` on slide `{slide}` expects a number, got `{value}`")]
    NotANumber {
        slide: String,
        name: String,
        value: String,
    },

    #[error("slide `{slide}` cannot go from {from} to {to}")]
    InvalidState {
        slide: String,
        from: SlideState,
        to: SlideState,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid deck manifest {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no slides found in {}", .0.display())]
    NoSlides(PathBuf),
}

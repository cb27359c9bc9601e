/// Scene assembly errors
use thiserror::Error;

/// Errors raised while partitioning, placing and composing a scene.
///
/// Every variant is detected before any rendering resource exists and
/// is fatal: the binary reports it and exits without a partial image.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("cannot partition a window into {0} viewports (supported: 1 to 4)")]
    InvalidTileCount(usize),

    #[error("no placement defined for slot {0}")]
    InvalidPlacementSlot(usize),

    #[error("unknown camera direction '{0}' (expected 'a', 'e' or 'r')")]
    InvalidCameraSpec(char),

    #[error("combi-view overlays at most 2 objects, got {0}")]
    CombiViewOverflow(usize),

    #[error("cannot compose a window with {0} tiles (supported: 1 to 4)")]
    TooManyTiles(usize),
}

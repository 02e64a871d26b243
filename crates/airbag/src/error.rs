//! Error taxonomy for detection sessions

use thiserror::Error;

/// Errors surfaced by a detection session
///
/// List- and rule-mutation failures leave session state untouched; the
/// target precondition variants abort a single detection cycle and the next
/// scheduled tick runs independently.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CollisionError {
    /// The object passed to `remove` is not in the detection list
    #[error("object is not in the detection list")]
    ObjectNotFound,

    /// The color passed to exclusion-list removal was never added
    #[error("color 0x{0:08X} is not in the exclusion list")]
    ColorNotFound(u32),

    /// Alpha threshold outside `0.0..=1.0`; the previous value is retained
    #[error("alpha threshold {0} is outside the range 0.0..=1.0")]
    AlphaThresholdOutOfRange(f32),

    /// The single target has no containing stage while `ignore_parentless`
    /// is enabled
    #[error("single target is not on the stage")]
    TargetOffStage,

    /// The single target is invisible while `ignore_invisibles` is enabled
    #[error("single target is not visible")]
    TargetInvisible,
}

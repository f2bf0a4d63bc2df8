/*!
 * Validation of processed lyric timelines.
 *
 * - `timing`: audits word durations, inter-word gaps, line bounds and order
 */

pub mod timing;

// Re-export main types
pub use timing::{TimingIssue, TimingValidator, TimingValidatorConfig, TimingValidationResult};

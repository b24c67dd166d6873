/*!
 * Document model for parsed transcripts.
 *
 * This module provides the typed structure a transcript page is parsed into:
 * - Shows made of episodes, in index order
 * - Episodes made of scenes
 * - Scenes made of directions (dialogue lines and stage descriptions)
 */

pub mod model;

// Re-export types used by other modules
pub use model::{Dialogue, Direction, Episode, Scene, Show, SpeakerLine, StageDescription};

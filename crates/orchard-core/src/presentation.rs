//! Display contract.
//!
//! The core publishes counters, facing and the two terminal overlays through a
//! [`PresentationSink`]. A session without one simply skips every update.

use crate::output::{Facing, Summary};

/// Screen-side collaborator that renders HUD and overlays.
pub trait PresentationSink {
    /// Updates the item counter.
    fn show_items(&mut self, items: u32);

    /// Updates the life counter.
    fn show_lives(&mut self, lives: u32);

    /// Turns the player sprite.
    fn show_facing(&mut self, facing: Facing);

    /// Shows the game-over overlay with final counts.
    fn show_game_over(&mut self, summary: Summary);

    /// Shows the win overlay with final counts.
    fn show_win(&mut self, summary: Summary);

    /// Hides both terminal overlays (level restart).
    fn hide_overlays(&mut self);
}

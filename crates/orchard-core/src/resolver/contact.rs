//! Contact rules.
//!
//! | tag | phase | rule |
//! |-----|-------|------|
//! | Ground | Enter / Exit | count the contact in / out; grounded while any remain |
//! | PassiveEnemy | Enter | hurt unless landed on squarely (`normal_y <= -0.5`) |
//! | ActiveEnemy | Enter | stomp if `normal_y > 0.5`, otherwise hurt |
//! | Item | Enter | collect; win at the threshold |
//!
//! Everything else is ignored.

use glam::Vec2;
use tracing::{debug, info, trace};

use crate::audio::Cue;
use crate::entity::{EntityId, EntityTag};
use crate::event::{CollisionEvent, ContactPhase};
use crate::output::Command;

use super::{Outcome, PlayerStateResolver};

impl PlayerStateResolver {
    pub(super) fn resolve_contact(&mut self, event: &CollisionEvent, out: &mut Vec<Command>) {
        match (event.tag, event.phase) {
            (EntityTag::Ground, ContactPhase::Enter) => self.touch_ground(event.other),
            (EntityTag::Ground, ContactPhase::Exit) => self.leave_ground(event.other),
            (EntityTag::PassiveEnemy, ContactPhase::Enter) => {
                if event.contact_normal_y > self.tuning.hurt_normal_threshold {
                    self.take_hit(event.other_position, out);
                }
            }
            (EntityTag::ActiveEnemy, ContactPhase::Enter) => {
                if event.contact_normal_y > self.tuning.stomp_normal_threshold {
                    self.stomp(event.other, out);
                } else {
                    self.take_hit(event.other_position, out);
                }
            }
            (EntityTag::Item, ContactPhase::Enter) => self.collect(event.other, out),
            _ => trace!(tag = %event.tag, phase = ?event.phase, "contact has no rule"),
        }
    }

    fn touch_ground(&mut self, ground: EntityId) {
        self.ground_contacts.insert(ground);
        self.state.is_grounded = true;
    }

    fn leave_ground(&mut self, ground: EntityId) {
        self.ground_contacts.remove(&ground);
        self.state.is_grounded = !self.ground_contacts.is_empty();
    }

    /// Loses a life and bounces away from `enemy_position`.
    fn take_hit(&mut self, enemy_position: Vec2, out: &mut Vec<Command>) {
        self.state.lives_remaining = self.state.lives_remaining.saturating_sub(1);
        out.push(Command::PlayCue(Cue::PlayerHurt));

        let away = if self.state.position.x < enemy_position.x {
            -1.0
        } else {
            1.0
        };
        let rebound = Vec2::new(away * self.tuning.speed, self.tuning.velocity_rebound);
        self.state.velocity = rebound;
        out.push(Command::SetVelocity(rebound));
        debug!(lives = self.state.lives_remaining, "player hurt");

        if self.state.lives_remaining == 0 {
            self.lose(out);
        } else {
            out.push(Command::ShowLives(self.state.lives_remaining));
        }
    }

    fn lose(&mut self, out: &mut Vec<Command>) {
        self.state.lives_remaining = 0;
        self.state.outcome = Outcome::Lost;
        info!(items = self.state.items_collected, "player lost");
        out.extend([
            Command::ShowLives(0),
            Command::PlayCue(Cue::DeadCharacter),
            Command::StopMusic,
            Command::Pause,
            Command::ShowGameOver(self.state.summary()),
        ]);
    }

    /// Defeats `enemy` and bounces straight up.
    fn stomp(&mut self, enemy: EntityId, out: &mut Vec<Command>) {
        debug!(%enemy, "stomp");
        out.push(Command::HitEnemy(enemy));
        let rebound = Vec2::new(self.state.velocity.x, self.tuning.velocity_rebound);
        self.state.velocity = rebound;
        out.push(Command::SetVelocity(rebound));
    }

    fn collect(&mut self, item: EntityId, out: &mut Vec<Command>) {
        self.state.items_collected = self.state.items_collected.saturating_add(1);
        debug!(%item, items = self.state.items_collected, "item collected");
        out.extend([
            Command::RemoveEntity(item),
            Command::ShowItems(self.state.items_collected),
            Command::PlayCue(Cue::TakeCollectible),
        ]);

        if self.state.items_collected >= self.tuning.win_items {
            self.state.outcome = Outcome::Won;
            info!(lives = self.state.lives_remaining, "player won");
            out.extend([
                Command::ShowWin(self.state.summary()),
                Command::PlayCue(Cue::PlayerWin),
                Command::StopMusic,
                Command::Pause,
            ]);
        }
    }
}

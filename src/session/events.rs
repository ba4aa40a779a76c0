use super::{
    builder::WorkingCard,
    results::SessionSummary,
};
use crate::core::CardStats;

pub type CardChangedFn = Box<dyn FnMut(&WorkingCard, &CardStats)>;
pub type FlipChangedFn = Box<dyn FnMut(bool)>;
pub type TimerTickFn = Box<dyn FnMut(u64)>;
pub type SessionFinishedFn = Box<dyn FnMut(&SessionSummary)>;

/// Observer hooks for the presentation layer. All dispatch is synchronous,
/// from inside the session call that caused the change; unset hooks are
/// skipped.
#[derive(Default)]
pub struct SessionEvents {
    pub(crate) on_card_changed: Option<CardChangedFn>,
    pub(crate) on_flip_changed: Option<FlipChangedFn>,
    pub(crate) on_timer_tick: Option<TimerTickFn>,
    pub(crate) on_session_finished: Option<SessionFinishedFn>,
}

impl SessionEvents {
    pub(crate) fn emit_card_changed(&mut self, card: &WorkingCard, stats: &CardStats) {
        if let Some(callback) = self.on_card_changed.as_mut() {
            callback(card, stats);
        }
    }

    pub(crate) fn emit_flip_changed(&mut self, flipped: bool) {
        if let Some(callback) = self.on_flip_changed.as_mut() {
            callback(flipped);
        }
    }

    pub(crate) fn emit_timer_tick(&mut self, remaining: u64) {
        if let Some(callback) = self.on_timer_tick.as_mut() {
            callback(remaining);
        }
    }

    pub(crate) fn emit_session_finished(&mut self, summary: &SessionSummary) {
        if let Some(callback) = self.on_session_finished.as_mut() {
            callback(summary);
        }
    }
}

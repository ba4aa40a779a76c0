use std::sync::{
    Arc,
    Mutex,
};

use chrono::{
    DateTime,
    Utc,
};

use super::{
    builder::{
        build_working_set,
        WorkingCard,
    },
    config::SessionConfig,
    events::SessionEvents,
    results::{
        self,
        SessionSummary,
    },
    scheduler::{
        Scheduler,
        TimerEvent,
        TimerEventKind,
    },
    stats::{
        MarkKind,
        SessionInteraction,
        StatsTracker,
    },
};
use crate::{
    core::{
        CardStats,
        Deck,
        FlashdeckError,
    },
    deck::DeckRepository,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Active,
    Finished,
}

/// One run through a working set. All mutation happens on the caller's
/// thread: user actions call the methods below directly, and the timer
/// threads only queue events that `poll_timers` applies. Call `poll_timers`
/// from the presentation layer's update loop.
///
/// The session is created Active and ends Finished; Finished is terminal
/// and rejects every mutating call.
pub struct StudySession {
    deck_name: String,
    config: SessionConfig,
    working_set: Vec<WorkingCard>,
    current_index: usize,
    flipped: bool,
    start_time: DateTime<Utc>,
    phase: SessionPhase,
    tracker: StatsTracker,
    scheduler: Scheduler,
    events: SessionEvents,
    repository: Arc<Mutex<dyn DeckRepository>>,
    summary: Option<SessionSummary>,
}

impl StudySession {
    /// Builds the working set and starts the session on its first card:
    /// index 0, question face up, first view recorded, countdown running
    /// when the config asks for one.
    pub fn create(
        deck: &Deck,
        config: SessionConfig,
        repository: Arc<Mutex<dyn DeckRepository>>,
    ) -> Result<Self, FlashdeckError> {
        let working_set = build_working_set(deck, &config)?;
        let tracker = StatsTracker::new(deck, &working_set);

        let mut session = StudySession {
            deck_name: deck.name.clone(),
            config,
            working_set,
            current_index: 0,
            flipped: false,
            start_time: Utc::now(),
            phase: SessionPhase::Active,
            tracker,
            scheduler: Scheduler::new(),
            events: SessionEvents::default(),
            repository,
            summary: None,
        };

        session.tracker.record_view(session.working_set[0].original_index);
        if let Some(seconds) = session.config.countdown_seconds() {
            session.scheduler.start_countdown(seconds);
        }

        Ok(session)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    pub fn deck_name(&self) -> &str {
        &self.deck_name
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn current_card(&self) -> &WorkingCard {
        &self.working_set[self.current_index]
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn card_count(&self) -> usize {
        self.working_set.len()
    }

    /// 1-based position for "Card X / Y" displays.
    pub fn progress(&self) -> (usize, usize) {
        (self.current_index + 1, self.working_set.len())
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn is_autoplaying(&self) -> bool {
        self.scheduler.autoplay_running()
    }

    pub fn card_stats(&self, original_index: usize) -> CardStats {
        self.tracker.stats(original_index)
    }

    pub fn interaction(&self, original_index: usize) -> SessionInteraction {
        self.tracker.interaction(original_index)
    }

    /// The cached summary; `None` until the session finishes.
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    pub fn on_card_changed(
        &mut self,
        callback: impl FnMut(&WorkingCard, &CardStats) + 'static,
    ) {
        self.events.on_card_changed = Some(Box::new(callback));
    }

    pub fn on_flip_changed(&mut self, callback: impl FnMut(bool) + 'static) {
        self.events.on_flip_changed = Some(Box::new(callback));
    }

    pub fn on_timer_tick(&mut self, callback: impl FnMut(u64) + 'static) {
        self.events.on_timer_tick = Some(Box::new(callback));
    }

    pub fn on_session_finished(&mut self, callback: impl FnMut(&SessionSummary) + 'static) {
        self.events.on_session_finished = Some(Box::new(callback));
    }

    /// Toggles between question and answer face. Revealing the answer stops
    /// the countdown: it measures time-to-answer, not time on the card.
    pub fn flip(&mut self) -> Result<bool, FlashdeckError> {
        self.ensure_active()?;

        self.flipped = !self.flipped;
        if self.flipped {
            self.scheduler.cancel_countdown();
        }
        self.events.emit_flip_changed(self.flipped);

        Ok(self.flipped)
    }

    /// Advances to the next card, or finishes the session when the current
    /// card is the last one.
    pub fn next(&mut self) -> Result<(), FlashdeckError> {
        self.ensure_active()?;

        if self.current_index + 1 >= self.working_set.len() {
            self.finish_session();
            return Ok(());
        }

        self.current_index += 1;
        self.show_current_card();
        Ok(())
    }

    /// Steps back one card. A complete no-op on the first card.
    pub fn previous(&mut self) -> Result<(), FlashdeckError> {
        self.ensure_active()?;

        if self.current_index == 0 {
            return Ok(());
        }

        self.current_index -= 1;
        self.show_current_card();
        Ok(())
    }

    /// Applies a mark to the currently displayed card. Neither the position
    /// nor the flip state changes.
    pub fn mark(&mut self, kind: MarkKind) -> Result<(), FlashdeckError> {
        self.ensure_active()?;

        let original_index = self.working_set[self.current_index].original_index;
        self.tracker.record_mark(original_index, kind);
        Ok(())
    }

    /// Starts or stops the autoplay loop; returns the new state.
    pub fn toggle_autoplay(&mut self) -> Result<bool, FlashdeckError> {
        self.ensure_active()?;

        if self.scheduler.autoplay_running() {
            self.scheduler.stop_autoplay();
            Ok(false)
        } else {
            self.scheduler.start_autoplay(self.config.autoplay_step_seconds());
            Ok(true)
        }
    }

    /// Ends the session early. Same aggregation and save path as running
    /// out of cards via `next`.
    pub fn finish(&mut self) -> Result<SessionSummary, FlashdeckError> {
        self.ensure_active()?;
        Ok(self.finish_session())
    }

    /// Drains queued timer events and applies them here, on the caller's
    /// thread. Safe to call at any time, including after the session
    /// finished (events from cancelled timers are dropped).
    pub fn poll_timers(&mut self) {
        let events = self.scheduler.poll_events();
        for event in events {
            self.apply_timer_event(event);
        }
    }

    /// Builds a fresh session over the same deck and config: new shuffle,
    /// new interaction flags, stats carried over through the repository.
    pub fn restart(&self) -> Result<StudySession, FlashdeckError> {
        let deck = match self.repository.lock() {
            Ok(repository) => repository.get_deck(&self.deck_name),
            Err(_) => {
                return Err(FlashdeckError::Custom(
                    "Deck repository lock poisoned".to_string(),
                ))
            }
        }
        .ok_or_else(|| FlashdeckError::DeckNotFound(self.deck_name.clone()))?;

        StudySession::create(&deck, self.config.clone(), Arc::clone(&self.repository))
    }

    pub(crate) fn apply_timer_event(&mut self, event: TimerEvent) {
        // A cancelled timer's queued events must be no-ops, even when the
        // cancellation happened earlier in this same batch.
        if !event.is_live() || self.phase == SessionPhase::Finished {
            return;
        }

        match event.kind {
            TimerEventKind::CountdownTick { remaining } => {
                self.events.emit_timer_tick(remaining);
            }
            TimerEventKind::CountdownExpired => {
                // Auto-reveal once; advancing stays a user or autoplay action.
                if !self.flipped {
                    let _ = self.flip();
                }
            }
            TimerEventKind::AutoplayStep => {
                if !self.flipped {
                    let _ = self.flip();
                } else {
                    let _ = self.next();
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    fn ensure_active(&self) -> Result<(), FlashdeckError> {
        match self.phase {
            SessionPhase::Active => Ok(()),
            SessionPhase::Finished => {
                Err(FlashdeckError::InvalidState("session is already finished"))
            }
        }
    }

    /// Shared tail of next/previous: fresh face, fresh countdown, view
    /// recorded for the newly displayed card.
    fn show_current_card(&mut self) {
        self.flipped = false;
        self.scheduler.cancel_countdown();
        if let Some(seconds) = self.config.countdown_seconds() {
            self.scheduler.start_countdown(seconds);
        }

        let original_index = self.working_set[self.current_index].original_index;
        self.tracker.record_view(original_index);
        let stats = self.tracker.stats(original_index);
        self.events.emit_card_changed(&self.working_set[self.current_index], &stats);
    }

    /// The single Active -> Finished transition: timers die, the summary is
    /// aggregated once, and the repository save is attempted fire-and-forget.
    fn finish_session(&mut self) -> SessionSummary {
        self.phase = SessionPhase::Finished;
        self.scheduler.cancel_all();

        let mut summary = results::summarize(
            &self.deck_name,
            &self.config,
            &self.working_set,
            &self.tracker,
            self.start_time,
        );
        summary.stats_saved = self.save_results();

        self.events.emit_session_finished(&summary);
        self.summary = Some(summary.clone());
        summary
    }

    /// Pushes the session's stats back through the repository. Failures are
    /// a warning, never an error: the in-memory summary stays complete, the
    /// stats may be lost on reload.
    fn save_results(&self) -> bool {
        let mut repository = match self.repository.lock() {
            Ok(repository) => repository,
            Err(_) => {
                eprintln!(
                    "Deck repository lock poisoned; stats for '{}' not saved",
                    self.deck_name
                );
                return false;
            }
        };

        let mut saved = true;
        for working_card in &self.working_set {
            let stats = self.tracker.stats(working_card.original_index);
            if !repository.update_card_stats(&self.deck_name, working_card.original_index, &stats)
            {
                saved = false;
            }
        }
        if !repository.save_session_completion(&self.deck_name) {
            saved = false;
        }

        if !saved {
            eprintln!(
                "Failed to save stats for deck '{}'; session results may be lost on reload",
                self.deck_name
            );
        }
        saved
    }
}

use std::{
    sync::{
        atomic::{
            AtomicBool,
            Ordering,
        },
        mpsc,
        Arc,
    },
    thread::{
        self,
        JoinHandle,
    },
    time::Duration,
};

/// Handle to one spawned timer thread. Cancelling flips the shared token;
/// the thread checks it after every sleep and exits without sending.
pub struct TimerHandle {
    cancel_token: Arc<AtomicBool>,
    join_handle: Option<JoinHandle<()>>,
}

impl TimerHandle {
    fn new(cancel_token: Arc<AtomicBool>, join_handle: JoinHandle<()>) -> Self {
        Self { cancel_token, join_handle: Some(join_handle) }
    }

    pub fn cancel(&self) {
        self.cancel_token.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.load(Ordering::Relaxed)
    }

    pub fn is_finished(&self) -> bool {
        self.join_handle.as_ref().map(|h| h.is_finished()).unwrap_or(true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEventKind {
    /// One countdown second elapsed; `remaining` seconds left on the clock.
    CountdownTick { remaining: u64 },
    /// The countdown reached zero without user action.
    CountdownExpired,
    /// The autoplay cadence fired: reveal the card, or advance past it.
    AutoplayStep,
}

/// A message from a timer thread. Events carry their timer's cancel token,
/// so an event queued just before cancellation is dropped at apply time.
pub struct TimerEvent {
    token: Arc<AtomicBool>,
    pub kind: TimerEventKind,
}

impl TimerEvent {
    pub(crate) fn new(token: Arc<AtomicBool>, kind: TimerEventKind) -> Self {
        Self { token, kind }
    }

    pub fn is_live(&self) -> bool {
        !self.token.load(Ordering::Relaxed)
    }
}

/// Owns the session's two timers: the per-card countdown and the autoplay
/// loop. Timer threads never touch session state; they push events through
/// the channel and the session drains them on the caller's thread.
pub struct Scheduler {
    sender: mpsc::Sender<TimerEvent>,
    receiver: mpsc::Receiver<TimerEvent>,
    countdown: Option<TimerHandle>,
    autoplay: Option<TimerHandle>,
    tick: Duration,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::with_tick(Duration::from_secs(1))
    }

    /// A scheduler whose "second" lasts `tick`. Tests shrink it to keep the
    /// thread paths fast; behavior is otherwise identical.
    pub fn with_tick(tick: Duration) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver, countdown: None, autoplay: None, tick }
    }

    /// Replaces any running countdown with a fresh one of `seconds` seconds.
    pub fn start_countdown(&mut self, seconds: u64) {
        self.cancel_countdown();

        let token = Arc::new(AtomicBool::new(false));
        let thread_token = Arc::clone(&token);
        let sender = self.sender.clone();
        let tick = self.tick;

        let join_handle = thread::spawn(move || {
            let mut remaining = seconds;
            while remaining > 0 {
                thread::sleep(tick);
                if thread_token.load(Ordering::Relaxed) {
                    return;
                }
                remaining -= 1;
                let _ = sender.send(TimerEvent::new(
                    Arc::clone(&thread_token),
                    TimerEventKind::CountdownTick { remaining },
                ));
            }
            if !thread_token.load(Ordering::Relaxed) {
                let _ = sender.send(TimerEvent::new(
                    thread_token,
                    TimerEventKind::CountdownExpired,
                ));
            }
        });

        self.countdown = Some(TimerHandle::new(token, join_handle));
    }

    pub fn cancel_countdown(&mut self) {
        if let Some(handle) = self.countdown.take() {
            handle.cancel();
        }
    }

    /// Starts the repeating autoplay loop. A no-op while one is running.
    pub fn start_autoplay(&mut self, step_seconds: u64) {
        if self.autoplay.is_some() {
            return;
        }

        let token = Arc::new(AtomicBool::new(false));
        let thread_token = Arc::clone(&token);
        let sender = self.sender.clone();
        let step = self.tick * step_seconds.max(1) as u32;

        let join_handle = thread::spawn(move || loop {
            thread::sleep(step);
            if thread_token.load(Ordering::Relaxed) {
                return;
            }
            let send_result = sender.send(TimerEvent::new(
                Arc::clone(&thread_token),
                TimerEventKind::AutoplayStep,
            ));
            if send_result.is_err() {
                return;
            }
        });

        self.autoplay = Some(TimerHandle::new(token, join_handle));
    }

    pub fn stop_autoplay(&mut self) {
        if let Some(handle) = self.autoplay.take() {
            handle.cancel();
        }
    }

    pub fn autoplay_running(&self) -> bool {
        self.autoplay.is_some()
    }

    pub fn cancel_all(&mut self) {
        self.cancel_countdown();
        self.stop_autoplay();
    }

    /// Drains everything queued by the timer threads. Liveness is checked
    /// again when each event is applied, not here: applying one event may
    /// cancel a timer whose next event is already in this batch.
    pub fn poll_events(&mut self) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST_TICK: Duration = Duration::from_millis(5);

    fn drain_live(scheduler: &mut Scheduler) -> Vec<TimerEventKind> {
        scheduler.poll_events().into_iter().filter(|e| e.is_live()).map(|e| e.kind).collect()
    }

    #[test]
    fn countdown_ticks_down_and_expires() {
        let mut scheduler = Scheduler::with_tick(FAST_TICK);
        scheduler.start_countdown(3);

        thread::sleep(FAST_TICK * 40);
        let events = drain_live(&mut scheduler);

        assert_eq!(
            events,
            vec![
                TimerEventKind::CountdownTick { remaining: 2 },
                TimerEventKind::CountdownTick { remaining: 1 },
                TimerEventKind::CountdownTick { remaining: 0 },
                TimerEventKind::CountdownExpired,
            ]
        );
    }

    #[test]
    fn cancelled_countdown_delivers_no_live_events() {
        let mut scheduler = Scheduler::with_tick(Duration::from_millis(20));
        scheduler.start_countdown(5);
        scheduler.cancel_countdown();

        thread::sleep(Duration::from_millis(120));
        assert!(drain_live(&mut scheduler).is_empty());
    }

    #[test]
    fn restarting_the_countdown_kills_the_previous_handle() {
        let mut scheduler = Scheduler::with_tick(FAST_TICK);
        scheduler.start_countdown(100);
        scheduler.start_countdown(2);

        thread::sleep(FAST_TICK * 30);
        let events = drain_live(&mut scheduler);

        // Only the second countdown's events survive, ending in expiry.
        assert_eq!(events.last(), Some(&TimerEventKind::CountdownExpired));
        assert!(events
            .iter()
            .all(|kind| !matches!(kind, TimerEventKind::CountdownTick { remaining } if *remaining > 1)));
    }

    #[test]
    fn autoplay_repeats_until_stopped() {
        let mut scheduler = Scheduler::with_tick(FAST_TICK);
        scheduler.start_autoplay(1);
        assert!(scheduler.autoplay_running());

        // Drain before cancelling: stopping kills the queued events' token.
        thread::sleep(FAST_TICK * 20);
        let steps = drain_live(&mut scheduler)
            .into_iter()
            .filter(|kind| *kind == TimerEventKind::AutoplayStep)
            .count();
        assert!(steps >= 2, "expected repeated autoplay steps, got {}", steps);

        scheduler.stop_autoplay();
        assert!(!scheduler.autoplay_running());

        // Nothing live arrives once stopped.
        thread::sleep(FAST_TICK * 6);
        assert!(drain_live(&mut scheduler).is_empty());
    }
}

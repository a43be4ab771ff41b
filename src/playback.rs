//! Frame transport: play/pause, looping ticks, scrubbing and nudging.

use std::time::Duration;

use crate::signal::{Signal, SubscriptionId};
use crate::types::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Paused,
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackState {
    pub active_frame: Frame,
    pub start_frame: Frame,
    pub end_frame: Frame,
    pub is_playing: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        PlaybackState {
            active_frame: 0,
            start_frame: 0,
            end_frame: 0,
            is_playing: false,
        }
    }
}

/// Owns the [`PlaybackState`]. Every [`set_active_frame`](Self::set_active_frame)
/// notifies frame-changed subscribers after the frame has been stored.
#[derive(Debug, Default)]
pub struct PlaybackController {
    state: PlaybackState,
    frame_changed: Signal<Frame>,
}

impl PlaybackController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn play_state(&self) -> PlayState {
        if self.state.is_playing {
            PlayState::Playing
        } else {
            PlayState::Paused
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn active_frame(&self) -> Frame {
        self.state.active_frame
    }

    pub fn start_frame(&self) -> Frame {
        self.state.start_frame
    }

    pub fn end_frame(&self) -> Frame {
        self.state.end_frame
    }

    /// Replace the playable range and rewind to its start. Emits nothing.
    pub fn set_range(&mut self, start: Frame, end: Frame) {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        self.state.start_frame = start;
        self.state.end_frame = end;
        self.state.active_frame = start;
    }

    pub fn toggle_play(&mut self) {
        self.state.is_playing = !self.state.is_playing;
        log::debug!("playback {:?}", self.play_state());
    }

    /// One timer step: advance by a frame, looping back to the start at the end.
    pub fn tick(&mut self) {
        if !self.state.is_playing {
            return;
        }
        if self.state.active_frame >= self.state.end_frame {
            self.set_active_frame(self.state.start_frame);
        } else {
            self.set_active_frame(self.state.active_frame + 1);
        }
    }

    /// Timeline-driven scrub. Ignored while playing; not clamped.
    pub fn set_frame(&mut self, frame: Frame) {
        if self.state.is_playing {
            return;
        }
        self.state.active_frame = frame;
    }

    pub fn set_active_frame(&mut self, frame: Frame) {
        self.state.active_frame = frame;
        self.frame_changed.emit(&frame);
    }

    /// Relative nudge, clamped to `[start_frame, end_frame]`.
    pub fn increment_frame(&mut self, delta: Frame) {
        let target = self
            .state
            .active_frame
            .saturating_add(delta)
            .clamp(self.state.start_frame, self.state.end_frame);
        self.set_active_frame(target);
    }

    pub fn go_to_start_frame(&mut self) {
        self.set_active_frame(self.state.start_frame);
    }

    pub fn go_to_end_frame(&mut self) {
        self.set_active_frame(self.state.end_frame);
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&Frame) + Send + Sync + 'static) -> SubscriptionId {
        self.frame_changed.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.frame_changed.unsubscribe(id)
    }
}

/// Converts elapsed wall time into whole playback ticks at a fixed interval.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    interval: Duration,
    accumulated: Duration,
}

impl PlaybackClock {
    /// A zero interval is bumped to one millisecond.
    pub fn new(interval: Duration) -> Self {
        PlaybackClock {
            interval: interval.max(Duration::from_millis(1)),
            accumulated: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Add `elapsed` and return how many ticks are now due. The remainder carries over.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulated += elapsed;
        let due = self.accumulated.as_nanos() / self.interval.as_nanos();
        self.accumulated -= self.interval * due as u32;
        due as u32
    }

    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn controller(start: Frame, end: Frame) -> PlaybackController {
        let mut c = PlaybackController::new();
        c.set_range(start, end);
        c
    }

    fn assert_in_range(c: &PlaybackController) {
        let s = c.state();
        assert!(s.start_frame <= s.active_frame && s.active_frame <= s.end_frame, "{s:?}");
    }

    #[test]
    fn tick_is_a_no_op_while_paused() {
        let mut c = controller(0, 10);
        c.tick();
        assert_eq!(c.active_frame(), 0);
        assert_eq!(c.play_state(), PlayState::Paused);
    }

    #[test]
    fn tick_advances_and_loops() {
        let mut c = controller(3, 5);
        c.toggle_play();
        c.tick();
        c.tick();
        assert_eq!(c.active_frame(), 5);
        c.tick();
        assert_eq!(c.active_frame(), 3);
        assert_in_range(&c);
    }

    #[test]
    fn increment_clamps_in_both_directions() {
        let mut c = controller(10, 20);
        for delta in [1, 15, -15, -1, Frame::MAX, Frame::MIN, 0, 7, -3] {
            c.increment_frame(delta);
            assert_in_range(&c);
        }
        c.increment_frame(1000);
        assert_eq!(c.active_frame(), 20);
        c.increment_frame(-1000);
        assert_eq!(c.active_frame(), 10);
    }

    #[test]
    fn set_frame_is_ignored_while_playing() {
        let mut c = controller(0, 100);
        c.set_frame(40);
        assert_eq!(c.active_frame(), 40);
        c.toggle_play();
        c.set_frame(60);
        assert_eq!(c.active_frame(), 40);
    }

    #[test]
    fn start_and_end_jumps() {
        let mut c = controller(-5, 5);
        c.go_to_end_frame();
        assert_eq!(c.active_frame(), 5);
        c.go_to_start_frame();
        assert_eq!(c.active_frame(), -5);
    }

    #[test]
    fn every_active_frame_change_is_announced() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut c = controller(0, 2);
        let sink = Arc::clone(&seen);
        c.subscribe(move |frame| sink.lock().unwrap().push(*frame));

        c.set_frame(1); // timeline scrub: silent
        c.increment_frame(5);
        c.go_to_start_frame();
        c.toggle_play();
        c.tick();
        c.tick();
        c.tick();
        assert_eq!(*seen.lock().unwrap(), vec![2, 0, 1, 2, 0]);
    }

    #[test]
    fn subscribers_see_the_stored_frame() {
        let c = Arc::new(Mutex::new(Vec::new()));
        let mut controller = controller(0, 9);
        let sink = Arc::clone(&c);
        controller.subscribe(move |frame| sink.lock().unwrap().push(*frame));
        controller.set_active_frame(4);
        assert_eq!(controller.active_frame(), 4);
        assert_eq!(*c.lock().unwrap(), vec![4]);
    }

    #[test]
    fn reversed_range_is_normalized() {
        let c = controller(8, 2);
        assert_eq!((c.start_frame(), c.end_frame(), c.active_frame()), (2, 8, 2));
    }

    #[test]
    fn clock_carries_the_remainder() {
        let mut clock = PlaybackClock::new(Duration::from_millis(30));
        assert_eq!(clock.advance(Duration::from_millis(95)), 3);
        assert_eq!(clock.advance(Duration::from_millis(24)), 0);
        assert_eq!(clock.advance(Duration::from_millis(1)), 1);
        assert_eq!(PlaybackClock::new(Duration::ZERO).interval(), Duration::from_millis(1));
    }
}

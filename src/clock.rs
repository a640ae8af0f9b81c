//! The single sequential timer queue everything runs on.
//!
//! Time is virtual: it only moves when the host calls [`Clock::advance`],
//! once per rendered frame in the viewer or in fixed steps when headless.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;

use crate::constants::frame_duration;

type Callback = Box<dyn FnOnce() -> Result<()>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

struct Timer {
    id: u64,
    due: Duration,
    callback: Callback,
}

#[derive(Default)]
struct ClockState {
    now: Duration,
    next_id: u64,
    timers: Vec<Timer>,
}

#[derive(Clone, Default)]
pub struct Clock(Rc<RefCell<ClockState>>);

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.0.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.0.borrow().timers.len()
    }

    pub fn set_timeout<F>(&self, delay: Duration, callback: F) -> TimerId
    where
        F: FnOnce() -> Result<()> + 'static,
    {
        let mut state = self.0.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        let due = state.now.saturating_add(delay);
        state.timers.push(Timer { id, due, callback: Box::new(callback) });
        TimerId(id)
    }

    /// Returns false if the timer already ran or was cleared.
    pub fn clear_timeout(&self, timer: TimerId) -> bool {
        let mut state = self.0.borrow_mut();
        let before = state.timers.len();
        state.timers.retain(|t| t.id != timer.0);
        state.timers.len() != before
    }

    /// Move time forward by `dt`, running every timer that falls due on the
    /// way. Timers scheduled by callbacks run too if they are due in time.
    pub fn advance(&self, dt: Duration) -> Result<()> {
        let target = self.now().saturating_add(dt);
        while let Some(timer) = self.pop_due(target) {
            (timer.callback)()?;
        }
        self.0.borrow_mut().now = target;
        Ok(())
    }

    /// Run timers until the queue is empty or `limit` of virtual time has
    /// passed. Repeating work (looping decks) stops at the limit.
    pub fn run_until_idle(&self, limit: Duration) -> Result<()> {
        let deadline = self.now().saturating_add(limit);
        loop {
            let next_due = self.0.borrow().timers.iter().map(|t| t.due).min();
            match next_due {
                Some(due) if due <= deadline => {
                    let now = self.now();
                    self.advance(due.saturating_sub(now))?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn pop_due(&self, target: Duration) -> Option<Timer> {
        let mut state = self.0.borrow_mut();
        let index = state
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= target)
            .min_by_key(|(_, t)| (t.due, t.id))
            .map(|(i, _)| i)?;
        let timer = state.timers.swap_remove(index);
        state.now = state.now.max(timer.due);
        Some(timer)
    }

    /// Call `step` once per frame with the seconds elapsed since the
    /// previous frame, the way a render loop feeds `Tween::apply`. Calls
    /// `done` after the frame that reaches `duration`.
    pub fn animate<S, D>(&self, duration: Duration, step: S, done: D) -> Animation
    where
        S: FnMut(f32) + 'static,
        D: FnOnce() -> Result<()> + 'static,
    {
        let animation = Animation::default();
        let now = self.now();
        schedule_frame(
            self.clone(),
            now.saturating_add(duration),
            now,
            Box::new(step),
            Box::new(done),
            animation.clone(),
        );
        animation
    }
}

fn schedule_frame(
    clock: Clock,
    end: Duration,
    last: Duration,
    mut step: Box<dyn FnMut(f32)>,
    done: Callback,
    animation: Animation,
) {
    let next = clock.clone();
    clock.set_timeout(frame_duration(), move || {
        if animation.is_cancelled() {
            return Ok(());
        }
        let now = next.now();
        step(now.saturating_sub(last).as_secs_f32());
        if now >= end {
            animation.finished.set(true);
            done()
        } else {
            schedule_frame(next, end, now, step, done, animation);
            Ok(())
        }
    });
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0.borrow();
        f.debug_struct("Clock")
            .field("now", &state.now)
            .field("pending", &state.timers.len())
            .finish()
    }
}

/// Handle onto a running [`Clock::animate`].
#[derive(Debug, Clone, Default)]
pub struct Animation {
    cancelled: Rc<Cell<bool>>,
    finished: Rc<Cell<bool>>,
}

impl Animation {
    /// Stop at the current frame. `done` will never run.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    pub fn is_finished(&self) -> bool {
        self.finished.get()
    }
}

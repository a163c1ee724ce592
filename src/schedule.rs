//! Named periodic timer tasks and the scheduler seam that runs them.
//!
//! The game never touches a clock. It asks for tasks to be started or
//! cancelled through [`Effect`]s, and whoever owns the clock calls
//! [`Game::on_timer`] back. In the browser that is `setInterval`
//! (see `dom::WebScheduler`); in tests it is [`VirtualClock`].

use std::time::Duration;

use crate::game::{Effect, Game};
use crate::tuning::{COUNTDOWN_PERIOD, FAST_DECAY_PERIOD, SAMPLER_PERIOD, SLOW_DECAY_PERIOD};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Decay {
    /// Runs after a gesture ends.
    Fast,
    /// Runs while idle with residual stress.
    Slow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Task {
    Sampler,
    Decay(Decay),
    Countdown,
}

impl Task {
    pub const ALL: [Task; 4] = [
        Task::Sampler,
        Task::Decay(Decay::Fast),
        Task::Decay(Decay::Slow),
        Task::Countdown,
    ];

    pub fn period(self) -> Duration {
        match self {
            Task::Sampler => SAMPLER_PERIOD,
            Task::Decay(Decay::Fast) => FAST_DECAY_PERIOD,
            Task::Decay(Decay::Slow) => SLOW_DECAY_PERIOD,
            Task::Countdown => COUNTDOWN_PERIOD,
        }
    }
}

/// Fixed-period repeating timers keyed by task.
///
/// `start` must replace a running instance of the same task, never add a
/// second one.
pub trait Scheduler {
    fn start(&mut self, task: Task);
    fn cancel(&mut self, task: Task);
}

/// Hands timer effects to `scheduler` and returns the rest in order.
pub fn route_effects<S: Scheduler>(scheduler: &mut S, effects: Vec<Effect>) -> Vec<Effect> {
    let mut rest = Vec::new();
    for effect in effects {
        match effect {
            Effect::StartTimer(task) => scheduler.start(task),
            Effect::CancelTimer(task) => scheduler.cancel(task),
            other => rest.push(other),
        }
    }
    rest
}

struct Armed {
    task: Task,
    due_ms: u64,
    seq: u64,
}

/// Deterministic scheduler: time only moves when [`VirtualClock::advance`] is called.
///
/// Timers due at the same instant fire in the order they were started.
#[derive(Default)]
pub struct VirtualClock {
    now_ms: u64,
    timers: Vec<Armed>,
    next_seq: u64,
    last_sample_ms: u64,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        Duration::from_millis(self.now_ms)
    }

    pub fn is_running(&self, task: Task) -> bool {
        self.timers.iter().any(|t| t.task == task)
    }

    /// Number of decay timers currently armed (fast and slow together).
    pub fn decay_timers(&self) -> usize {
        self.timers.iter().filter(|t| matches!(t.task, Task::Decay(_))).count()
    }

    /// Applies pending timer effects from `game`; returns the non-timer ones.
    pub fn settle(&mut self, game: &mut Game) -> Vec<Effect> {
        route_effects(self, game.drain_effects())
    }

    /// Moves time forward by `by`, firing every timer that falls due.
    /// Returns the non-timer effects produced along the way.
    pub fn advance(&mut self, game: &mut Game, by: Duration) -> Vec<Effect> {
        let target = self.now_ms + by.as_millis() as u64;
        let mut out = self.settle(game);
        while let Some(idx) = self.next_due(target) {
            let task = self.timers[idx].task;
            let period = task.period().as_millis() as u64;
            self.now_ms = self.timers[idx].due_ms;
            self.timers[idx].due_ms += period;

            let elapsed = match task {
                Task::Sampler => {
                    let e = self.now_ms - self.last_sample_ms;
                    self.last_sample_ms = self.now_ms;
                    Duration::from_millis(e)
                }
                _ => task.period(),
            };
            game.on_timer(task, elapsed);
            out.extend(self.settle(game));
        }
        self.now_ms = target;
        out
    }

    fn next_due(&self, target: u64) -> Option<usize> {
        self.timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= target)
            .min_by_key(|(_, t)| (t.due_ms, t.seq))
            .map(|(i, _)| i)
    }
}

impl Scheduler for VirtualClock {
    fn start(&mut self, task: Task) {
        self.cancel(task);
        if task == Task::Sampler {
            self.last_sample_ms = self.now_ms;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Armed {
            task,
            due_ms: self.now_ms + task.period().as_millis() as u64,
            seq,
        });
    }

    fn cancel(&mut self, task: Task) {
        self.timers.retain(|t| t.task != task);
    }
}

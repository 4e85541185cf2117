//! Timed-event scheduler
//!
//! A binary min-heap of time-stamped callbacks supporting one-shot and
//! periodic execution with cooperative cancellation. The scheduler knows
//! nothing about the simulation: callbacks receive a mutable context value
//! supplied by whoever calls [`Scheduler::tick`], plus the tick's clock
//! reading.

use std::cell::Cell;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;

/// Callback stored in the scheduler.
///
/// Invoked with the caller's context and the `now` passed to the `tick`
/// that fired it.
pub type ScheduledFn<Ctx> = Box<dyn FnMut(&mut Ctx, f64)>;

/// Cancellation token for a scheduled event.
///
/// Cancellation is lazy: the event stays in the heap and is discarded,
/// uninvoked, when it next reaches the front. Cancelling an already-fired
/// one-shot event is a no-op; cancelling a periodic event stops all future
/// firings.
#[derive(Debug, Clone)]
pub struct ScheduleHandle {
    cancelled: Rc<Cell<bool>>,
}

impl ScheduleHandle {
    /// Mark the event cancelled. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    /// Whether `cancel` has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

struct ScheduledEvent<Ctx> {
    fire_time: f64,
    /// Secondary heap key: equal fire times run in insertion order.
    seq: u64,
    interval: Option<f64>,
    cancelled: Rc<Cell<bool>>,
    callback: ScheduledFn<Ctx>,
}

impl<Ctx> PartialEq for ScheduledEvent<Ctx> {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl<Ctx> Eq for ScheduledEvent<Ctx> {}

impl<Ctx> PartialOrd for ScheduledEvent<Ctx> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Ctx> Ord for ScheduledEvent<Ctx> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse both keys so the earliest fire
        // time (then lowest sequence number) surfaces first.
        other
            .fire_time
            .total_cmp(&self.fire_time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Priority queue of timed callbacks.
///
/// `Ctx` is whatever mutable state the callbacks need; the orchestrator uses
/// its bullet manager, tests use plain vectors.
pub struct Scheduler<Ctx> {
    heap: BinaryHeap<ScheduledEvent<Ctx>>,
    next_seq: u64,
}

impl<Ctx> Default for Scheduler<Ctx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ctx> Scheduler<Ctx> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Insert an event firing at `fire_time`, refiring every `interval`
    /// seconds if given.
    ///
    /// `fire_time` may already be in the past; the event then fires on the
    /// next `tick`. Events with equal fire times run in insertion order.
    ///
    /// # Panics
    /// If `interval` is not strictly positive. A zero or negative interval
    /// would refire without ever advancing past the clock, so it is a
    /// configuration error, handled fail-fast.
    pub fn schedule(
        &mut self,
        callback: impl FnMut(&mut Ctx, f64) + 'static,
        fire_time: f64,
        interval: Option<f64>,
    ) -> ScheduleHandle {
        if let Some(interval) = interval {
            if interval <= 0.0 || interval.is_nan() {
                panic!("periodic interval must be strictly positive, got {interval}");
            }
        }
        let cancelled = Rc::new(Cell::new(false));
        let seq = self.next_seq;
        self.next_seq += 1;
        log::trace!("scheduled event #{seq} at t={fire_time} interval={interval:?}");
        self.heap.push(ScheduledEvent {
            fire_time,
            seq,
            interval,
            cancelled: Rc::clone(&cancelled),
            callback: Box::new(callback),
        });
        ScheduleHandle { cancelled }
    }

    /// Pop and invoke every non-cancelled event with `fire_time <= now`, in
    /// ascending fire-time order. Cancelled events are discarded silently.
    ///
    /// A periodic event is refired relative to its own prior fire time
    /// (`fire_time + interval`, never `now + interval`), so its cadence holds
    /// even when ticks arrive late; a tick that crosses several interval
    /// boundaries fires once per boundary.
    ///
    /// `now` must be non-decreasing across calls. The clock is the host's and
    /// a backwards step is not defended against here.
    pub fn tick(&mut self, now: f64, ctx: &mut Ctx) {
        while let Some(head) = self.heap.peek() {
            if head.fire_time > now {
                break;
            }
            let Some(mut event) = self.heap.pop() else {
                break;
            };
            if event.cancelled.get() {
                log::trace!("discarding cancelled event #{}", event.seq);
                continue;
            }
            (event.callback)(ctx, now);
            if let Some(interval) = event.interval {
                // The callback may have cancelled its own handle.
                if !event.cancelled.get() {
                    event.fire_time += interval;
                    self.heap.push(event);
                }
            }
        }
    }

    /// Drop every pending event unconditionally.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Number of pending events, lazily-cancelled entries included.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

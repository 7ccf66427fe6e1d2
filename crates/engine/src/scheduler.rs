//! Delayed event delivery.
//!
//! Every simulated delay of the client (form submission, biometric scan,
//! processing stages) is expressed as an event handed to a [`Scheduler`].
//! The terminal client delivers them with tokio sleeps; tests use
//! [`ManualScheduler`] and move virtual time forward explicitly.

use std::time::Duration;

use chrono::{Local, NaiveDate};

pub trait Scheduler<E> {
    /// Delivers `event` once `delay` has passed.
    fn schedule(&mut self, delay: Duration, event: E);

    /// The calendar date used to label new transactions.
    fn today(&self) -> NaiveDate;
}

#[derive(Debug)]
struct Queued<E> {
    due: Duration,
    seq: u64,
    event: E,
}

/// Virtual-time scheduler.
///
/// Events are returned in due order; events due at the same instant come
/// out in the order they were scheduled.
#[derive(Debug)]
pub struct ManualScheduler<E> {
    now: Duration,
    seq: u64,
    queue: Vec<Queued<E>>,
    today: NaiveDate,
}

impl<E> Default for ManualScheduler<E> {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}

impl<E> ManualScheduler<E> {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            now: Duration::ZERO,
            seq: 0,
            queue: Vec::new(),
            today,
        }
    }

    /// Virtual time elapsed since creation.
    pub fn elapsed(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    fn next_index(&self) -> Option<usize> {
        self.queue
            .iter()
            .enumerate()
            .min_by_key(|(_, q)| (q.due, q.seq))
            .map(|(i, _)| i)
    }

    /// Jumps to the next due event and returns it.
    pub fn pop_next(&mut self) -> Option<E> {
        let index = self.next_index()?;
        let queued = self.queue.swap_remove(index);
        self.now = self.now.max(queued.due);
        Some(queued.event)
    }

    /// Returns the next event due no later than `until`, with virtual time
    /// set to that event's due instant.
    pub fn pop_due(&mut self, until: Duration) -> Option<E> {
        let index = self.next_index()?;
        if self.queue[index].due > until {
            return None;
        }
        let queued = self.queue.swap_remove(index);
        self.now = self.now.max(queued.due);
        Some(queued.event)
    }

    /// Moves time forward by `by`, handing each due event to `on_event` at
    /// its own instant.
    ///
    /// Events scheduled by `on_event` are timed from the event that caused
    /// them and fire in the same call when they fall due inside the window.
    /// Returns how many events were delivered.
    pub fn advance(&mut self, by: Duration, mut on_event: impl FnMut(E, &mut Self)) -> usize {
        let target = self.now + by;
        let mut delivered = 0;
        while let Some(event) = self.pop_due(target) {
            on_event(event, self);
            delivered += 1;
        }
        self.now = target;
        delivered
    }
}

impl<E> Scheduler<E> for ManualScheduler<E> {
    fn schedule(&mut self, delay: Duration, event: E) {
        self.seq += 1;
        self.queue.push(Queued {
            due: self.now + delay,
            seq: self.seq,
            event,
        });
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}

/// `Oct 14`
pub fn date_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn collect<E>(scheduler: &mut ManualScheduler<E>, by: Duration) -> Vec<E> {
        let mut out = Vec::new();
        scheduler.advance(by, |event, _| out.push(event));
        out
    }

    #[test]
    fn advance_returns_due_events_in_order() {
        let mut scheduler = ManualScheduler::new(NaiveDate::from_ymd_opt(2026, 10, 14).unwrap());
        scheduler.schedule(ms(300), "c");
        scheduler.schedule(ms(100), "a");
        scheduler.schedule(ms(100), "b");

        assert_eq!(collect(&mut scheduler, ms(99)), Vec::<&str>::new());
        assert_eq!(collect(&mut scheduler, ms(1)), vec!["a", "b"]);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.elapsed(), ms(100));

        assert_eq!(scheduler.pop_next(), Some("c"));
        assert_eq!(scheduler.elapsed(), ms(300));
        assert_eq!(scheduler.pop_next(), None);
    }

    #[test]
    fn delays_are_relative_to_virtual_now() {
        let mut scheduler = ManualScheduler::new(NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());
        scheduler.advance(ms(1000), |_: i32, _| {});
        scheduler.schedule(ms(500), 1);
        assert!(collect(&mut scheduler, ms(499)).is_empty());
        assert_eq!(collect(&mut scheduler, ms(1)), vec![1]);
    }

    #[test]
    fn chained_events_fire_inside_the_window() {
        let mut scheduler = ManualScheduler::new(NaiveDate::from_ymd_opt(2026, 10, 14).unwrap());
        scheduler.schedule(ms(800), 1);

        let mut fired = Vec::new();
        let delivered = scheduler.advance(ms(10_000), |event, scheduler| {
            fired.push((event, scheduler.elapsed()));
            if event < 3 {
                scheduler.schedule(ms(1000), event + 1);
            }
        });

        assert_eq!(delivered, 3);
        assert_eq!(fired, [(1, ms(800)), (2, ms(1800)), (3, ms(2800))]);
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.elapsed(), ms(10_000));
    }

    #[test]
    fn chained_event_past_the_window_stays_queued() {
        let mut scheduler = ManualScheduler::new(NaiveDate::from_ymd_opt(2026, 10, 14).unwrap());
        scheduler.schedule(ms(800), "first");

        let delivered = scheduler.advance(ms(1000), |_, scheduler| {
            scheduler.schedule(ms(1000), "second");
        });
        assert_eq!(delivered, 1);
        assert_eq!(scheduler.pending(), 1);

        assert_eq!(collect(&mut scheduler, ms(799)), Vec::<&str>::new());
        assert_eq!(collect(&mut scheduler, ms(1)), vec!["second"]);
        assert_eq!(scheduler.elapsed(), ms(1800));
    }

    #[test]
    fn date_label_uses_short_month() {
        assert_eq!(date_label(NaiveDate::from_ymd_opt(2026, 10, 4).unwrap()), "Oct 4");
    }
}

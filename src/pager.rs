//! Section changes driven by scroll and keys, rate limited to the length of a
//! transition. Requests inside the cooldown are dropped, never queued.

use std::time::Duration;

use log::debug;

#[derive(Debug, Clone)]
pub struct SectionPager {
    section: i32,
    len: i32,
    cooldown: Duration,
    last_change: Option<Duration>,
}

impl SectionPager {
    pub fn new(len: usize, section: i32, cooldown: Duration) -> Self {
        let len = len.max(1) as i32;
        Self {
            section: section.clamp(0, len - 1),
            len,
            cooldown,
            last_change: None,
        }
    }

    pub fn section(&self) -> i32 {
        self.section
    }

    /// Moves to `target` unless a change happened less than the cooldown ago.
    /// Returns the new section when the request was applied.
    pub fn request(&mut self, target: i32, now: Duration) -> Option<i32> {
        let target = target.clamp(0, self.len - 1);
        if target == self.section {
            return None;
        }
        if let Some(last) = self.last_change {
            if now.saturating_sub(last) < self.cooldown {
                debug!("Dropped section request {} during cooldown", target);
                return None;
            }
        }
        self.section = target;
        self.last_change = Some(now);
        Some(target)
    }

    pub fn step(&mut self, delta: i32, now: Duration) -> Option<i32> {
        self.request(self.section + delta, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn requests_inside_the_cooldown_are_dropped() {
        let mut pager = SectionPager::new(5, 0, ms(1200));
        assert_eq!(pager.request(1, ms(10_000)), Some(1));
        assert_eq!(pager.request(2, ms(10_500)), None);
        assert_eq!(pager.section(), 1);
        assert_eq!(pager.request(2, ms(11_200)), Some(2));
    }

    #[test]
    fn first_request_is_never_blocked() {
        let mut pager = SectionPager::new(5, 0, ms(1200));
        assert_eq!(pager.step(1, ms(0)), Some(1));
    }

    #[test]
    fn steps_clamp_to_the_layout() {
        let mut pager = SectionPager::new(3, 2, ms(0));
        assert_eq!(pager.step(1, ms(0)), None);
        assert_eq!(pager.step(-1, ms(1)), Some(1));
        assert_eq!(pager.request(-7, ms(2)), Some(0));
    }

    #[test]
    fn no_op_requests_do_not_restart_the_cooldown() {
        let mut pager = SectionPager::new(5, 0, ms(1000));
        assert_eq!(pager.request(1, ms(0)), Some(1));
        assert_eq!(pager.request(1, ms(900)), None);
        assert_eq!(pager.request(2, ms(1000)), Some(2));
    }
}

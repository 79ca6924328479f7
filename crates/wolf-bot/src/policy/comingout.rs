use std::collections::VecDeque;
use wolf_core::model::Judge;

/// When to reveal one's role: on a scheduled day, or as soon as a werewolf is
/// found, at most once per game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComingoutSchedule {
    co_day: u32,
    done: bool,
}

impl ComingoutSchedule {
    pub const DEFAULT_DAY: u32 = 3;

    pub fn new(co_day: u32) -> Self {
        Self {
            co_day,
            done: false,
        }
    }

    pub fn reset(&mut self) {
        self.done = false;
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Returns `true` exactly once, on the first call where the trigger holds.
    pub fn should_come_out(&mut self, day: u32, found_werewolf: bool) -> bool {
        if self.done || !(day == self.co_day || found_werewolf) {
            return false;
        }
        self.done = true;
        true
    }
}

impl Default for ComingoutSchedule {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DAY)
    }
}

/// Own results waiting to be announced, oldest first.
#[derive(Debug, Clone, Default)]
pub struct ReportQueue {
    pending: VecDeque<Judge>,
}

impl ReportQueue {
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn push(&mut self, judge: Judge) {
        self.pending.push_back(judge);
    }

    pub fn pop(&mut self) -> Option<Judge> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

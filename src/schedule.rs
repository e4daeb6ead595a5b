//! Frame scheduling
//!
//! The pipeline defers work to "the next rendering frame" in two places: the
//! initial stylesheet scan, and styling a freshly attached shadow root (so
//! the attaching code finishes populating it first). Rather than ad hoc
//! callback nesting, deferral is an explicit queue of typed tasks drained
//! once per frame, which keeps ordering guarantees testable.

use std::collections::VecDeque;

use crate::dom::NodeId;

/// Work deferred to the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
  /// Full pipeline pass: extract, compile, re-apply to tracked hosts.
  SyncAll,
  /// Post-attachment styling for one shadow host.
  StyleHost(NodeId),
}

/// A one-shot task queue standing in for `requestAnimationFrame`.
///
/// Tasks scheduled while a frame is being drained land in the next frame,
/// matching how a frame callback that schedules another frame callback runs
/// one paint later.
#[derive(Debug, Default)]
pub struct FrameScheduler {
  queue: VecDeque<Task>,
}

impl FrameScheduler {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn schedule(&mut self, task: Task) {
    self.queue.push_back(task);
  }

  /// Takes every task due this frame, leaving the queue empty for tasks
  /// scheduled during processing.
  pub fn take_frame(&mut self) -> Vec<Task> {
    std::mem::take(&mut self.queue).into()
  }

  /// True when no deferred work is pending.
  pub fn is_idle(&self) -> bool {
    self.queue.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn take_frame_drains_in_fifo_order() {
    let mut scheduler = FrameScheduler::new();
    scheduler.schedule(Task::SyncAll);
    assert!(!scheduler.is_idle());

    let frame = scheduler.take_frame();
    assert_eq!(frame, vec![Task::SyncAll]);
    assert!(scheduler.is_idle());
    assert!(scheduler.take_frame().is_empty());
  }

  #[test]
  fn tasks_scheduled_mid_frame_run_next_frame() {
    let mut scheduler = FrameScheduler::new();
    scheduler.schedule(Task::SyncAll);

    let frame = scheduler.take_frame();
    // Simulate a handler scheduling follow-up work while draining.
    for _ in frame {
      scheduler.schedule(Task::SyncAll);
    }
    assert_eq!(scheduler.take_frame().len(), 1);
  }
}

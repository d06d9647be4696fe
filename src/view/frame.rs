//! Work deferred until after the next frame is painted.
//!
//! Measurements only make sense once a frame has been laid out, so
//! state changes queue tasks here and the event loop drains the queue right
//! after each draw.

use crate::data::TrackerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTask {
    /// Scroll the chart to its rightmost point
    JumpToLatest(TrackerId),
    /// Re-size and re-position the scrollbar thumb
    SyncScrollbar(TrackerId),
    /// Measure the history block and resize the chart to match
    SyncChartHeight(TrackerId),
    /// Resize the chart to its current geometry
    ResizeChart(TrackerId),
}

impl FrameTask {
    pub fn tracker(&self) -> TrackerId {
        match *self {
            FrameTask::JumpToLatest(id)
            | FrameTask::SyncScrollbar(id)
            | FrameTask::SyncChartHeight(id)
            | FrameTask::ResizeChart(id) => id,
        }
    }
}

/// Ordered queue of after-paint tasks; duplicates are coalesced
#[derive(Debug, Default)]
pub struct FrameQueue {
    tasks: Vec<FrameTask>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, task: FrameTask) {
        if !self.tasks.contains(&task) {
            self.tasks.push(task);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Take every queued task. Tasks requested while running these land in
    /// the next frame.
    pub fn take(&mut self) -> Vec<FrameTask> {
        std::mem::take(&mut self.tasks)
    }

    /// Forget tasks for a tracker that no longer exists
    pub fn cancel(&mut self, id: TrackerId) {
        self.tasks.retain(|t| t.tracker() != id);
    }
}

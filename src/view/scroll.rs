//! Custom horizontal scrollbar kept in sync with a chart viewport.
//!
//! Two one-directional updates keep the pair consistent:
//! - [`ScrollSync::sync_thumb_from_scroll`]: viewport offset to thumb position
//! - [`ScrollSync::scroll_from_thumb_left`]: thumb gesture to viewport offset
//!
//! Every write compares against the current value and reports whether it
//! changed anything, so a gesture that writes the offset and the resulting
//! offset update that moves the thumb settle after one round.

use std::time::{Duration, Instant};

use crate::config::ScrollbarSettings;

/// Values closer than this are considered equal
const EPSILON: f64 = 1e-6;

/// Fraction of the remaining distance covered per animation frame
const SMOOTH_FACTOR: f64 = 0.35;

/// Remaining distance below which an animation snaps to its target
const SMOOTH_SNAP_PX: f64 = 0.5;

/// Upper bound on repeats fired by one tick after a stall
const MAX_CATCH_UP: u32 = 8;

fn clamp(n: f64, min: f64, max: f64) -> f64 {
    n.min(max).max(min)
}

/// Thumb width for a track, never below `min_thumb` unless the track itself
/// is narrower.
pub fn thumb_width(track_width: f64, visible: f64, total: f64, min_thumb: f64) -> f64 {
    let track_width = track_width.max(0.0);
    let ratio = (visible.max(1.0) / total.max(1.0)).min(1.0);
    min_thumb.max((track_width * ratio).floor()).min(track_width)
}

/// Thumb left offset for a viewport offset
pub fn thumb_left_for_scroll(
    scroll_left: f64,
    max_scroll: f64,
    track_width: f64,
    thumb_width: f64,
) -> f64 {
    let room = (track_width - thumb_width).max(0.0);
    if max_scroll <= 0.0 {
        return 0.0;
    }
    clamp(scroll_left / max_scroll * room, 0.0, room)
}

/// Viewport offset for a thumb left offset (inverse of [`thumb_left_for_scroll`])
pub fn scroll_for_thumb_left(
    thumb_left: f64,
    track_width: f64,
    thumb_width: f64,
    max_scroll: f64,
) -> f64 {
    let ratio = thumb_left / (track_width - thumb_width).max(1.0);
    clamp(ratio * max_scroll, 0.0, max_scroll.max(0.0))
}

/// The native scroll container: content wider than what is visible
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    content_width: f64,
    visible_width: f64,
    scroll_left: f64,
}

impl Viewport {
    pub fn new(content_width: f64, visible_width: f64) -> Self {
        Viewport {
            content_width,
            visible_width,
            scroll_left: 0.0,
        }
    }

    pub fn content_width(&self) -> f64 {
        self.content_width
    }

    pub fn visible_width(&self) -> f64 {
        self.visible_width
    }

    pub fn scroll_left(&self) -> f64 {
        self.scroll_left
    }

    pub fn max_scroll(&self) -> f64 {
        (self.content_width.max(1.0) - self.visible_width.max(1.0)).max(0.0)
    }

    pub fn overflows(&self) -> bool {
        self.max_scroll() > 0.0
    }

    /// Change the extent, keeping the offset within the new range
    pub fn set_extent(&mut self, content_width: f64, visible_width: f64) {
        self.content_width = content_width;
        self.visible_width = visible_width;
        self.scroll_left = clamp(self.scroll_left, 0.0, self.max_scroll());
    }

    /// Set the offset, clamped. Returns false if it was already there.
    pub fn set_scroll_left(&mut self, scroll_left: f64) -> bool {
        let next = clamp(scroll_left, 0.0, self.max_scroll());
        if (next - self.scroll_left).abs() < EPSILON {
            return false;
        }
        self.scroll_left = next;
        true
    }
}

/// Current thumb geometry in track coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thumb {
    pub left: f64,
    pub width: f64,
}

impl Thumb {
    pub fn contains(&self, x: f64) -> bool {
        x >= self.left && x <= self.left + self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowSide {
    Left,
    Right,
}

impl ArrowSide {
    fn sign(self) -> f64 {
        match self {
            ArrowSide::Left => -1.0,
            ArrowSide::Right => 1.0,
        }
    }
}

/// Outcome of pressing on the track
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackPress {
    /// Pressed on the thumb; the caller should start a drag
    Thumb(DragGesture),
    /// Pressed elsewhere; the thumb jumped to the press point
    Jumped,
}

/// An in-progress thumb drag: where the pointer and thumb started
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGesture {
    pub start_x: f64,
    pub start_left: f64,
}

#[derive(Debug, Clone, Copy)]
struct ArrowHold {
    side: ArrowSide,
    next_fire: Instant,
}

/// Scrollbar state for one chart
#[derive(Debug, Clone)]
pub struct ScrollSync {
    viewport: Viewport,
    track_width: f64,
    thumb: Thumb,
    track_visible: bool,
    /// Target offset of an in-flight smooth scroll
    animation: Option<f64>,
    arrow: Option<ArrowHold>,
    settings: ScrollbarSettings,
}

impl ScrollSync {
    pub fn new(settings: ScrollbarSettings) -> Self {
        ScrollSync {
            viewport: Viewport::new(0.0, 0.0),
            track_width: 0.0,
            thumb: Thumb {
                left: 0.0,
                width: 0.0,
            },
            track_visible: false,
            animation: None,
            arrow: None,
            settings,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn thumb(&self) -> Thumb {
        self.thumb
    }

    /// False when the content fits and the track should not be drawn
    pub fn track_visible(&self) -> bool {
        self.track_visible
    }

    /// True while a smooth scroll or an arrow hold needs frames
    pub fn is_animating(&self) -> bool {
        self.animation.is_some() || self.arrow.is_some()
    }

    pub fn is_arrow_held(&self) -> bool {
        self.arrow.is_some()
    }

    /// New content or viewport size from the chart
    pub fn set_extent(&mut self, content_width: f64, visible_width: f64) {
        self.viewport.set_extent(content_width, visible_width);
        if let Some(target) = self.animation {
            self.animation = Some(clamp(target, 0.0, self.viewport.max_scroll()));
        }
        self.update_metrics();
        self.sync_thumb_from_scroll();
    }

    /// New track length from layout
    pub fn set_track_width(&mut self, track_width: f64) {
        if (track_width - self.track_width).abs() < EPSILON {
            return;
        }
        self.track_width = track_width.max(0.0);
        self.update_metrics();
        self.sync_thumb_from_scroll();
    }

    /// Size the thumb, hide the track when nothing overflows and keep the
    /// thumb inside the track.
    pub fn update_metrics(&mut self) {
        self.thumb.width = thumb_width(
            self.track_width,
            self.viewport.visible_width(),
            self.viewport.content_width(),
            self.settings.min_thumb_px,
        );
        self.track_visible = self.viewport.overflows();
        let room = (self.track_width - self.thumb.width).max(0.0);
        self.thumb.left = clamp(self.thumb.left, 0.0, room);
    }

    /// Move the thumb to reflect the viewport offset. Returns whether the
    /// thumb moved.
    pub fn sync_thumb_from_scroll(&mut self) -> bool {
        let max_scroll = self.viewport.max_scroll();
        if max_scroll <= 0.0 {
            self.track_visible = false;
            return false;
        }
        let left = thumb_left_for_scroll(
            self.viewport.scroll_left(),
            max_scroll,
            self.track_width,
            self.thumb.width,
        );
        if (left - self.thumb.left).abs() < EPSILON {
            return false;
        }
        self.thumb.left = left;
        true
    }

    /// Native scroll (wheel, pan, animation frame): write the offset, then
    /// let the thumb follow.
    pub fn scroll_to(&mut self, scroll_left: f64) -> bool {
        let changed = self.viewport.set_scroll_left(scroll_left);
        if changed {
            self.sync_thumb_from_scroll();
        }
        changed
    }

    /// Direct pointer pan: takes over from any smooth scroll in flight
    pub fn pan_to(&mut self, scroll_left: f64) -> bool {
        self.animation = None;
        self.scroll_to(scroll_left)
    }

    /// Drop the smooth-scroll target, leaving the offset where it is
    pub fn cancel_animation(&mut self) {
        self.animation = None;
    }

    /// Set the viewport offset from a desired thumb left. Returns whether the
    /// offset changed.
    pub fn scroll_from_thumb_left(&mut self, thumb_left: f64) -> bool {
        let max_scroll = self.viewport.max_scroll();
        if max_scroll <= 0.0 {
            return false;
        }
        self.animation = None;
        let room = (self.track_width - self.thumb.width).max(0.0);
        self.thumb.left = clamp(thumb_left, 0.0, room);
        let target = scroll_for_thumb_left(self.thumb.left, self.track_width, self.thumb.width, max_scroll);
        let changed = self.viewport.set_scroll_left(target);
        self.sync_thumb_from_scroll();
        changed
    }

    /// Jump to the rightmost (latest) content
    pub fn jump_to_end(&mut self) -> bool {
        self.animation = None;
        self.scroll_to(self.viewport.max_scroll())
    }

    /// Press on the track at `x` (track coordinates)
    pub fn press_track(&mut self, x: f64) -> TrackPress {
        if self.thumb.contains(x) {
            return TrackPress::Thumb(self.begin_drag(x));
        }
        let room = (self.track_width - self.thumb.width).max(0.0);
        let left = clamp(x - self.thumb.width / 2.0, 0.0, room);
        self.scroll_from_thumb_left(left);
        TrackPress::Jumped
    }

    pub fn begin_drag(&self, pointer_x: f64) -> DragGesture {
        DragGesture {
            start_x: pointer_x,
            start_left: self.thumb.left,
        }
    }

    /// Pointer moved during a drag: translate its delta 1:1 to the thumb
    pub fn drag(&mut self, gesture: DragGesture, pointer_x: f64) -> bool {
        let room = (self.track_width - self.thumb.width).max(0.0);
        let left = clamp(gesture.start_left + (pointer_x - gesture.start_x), 0.0, room);
        self.scroll_from_thumb_left(left)
    }

    /// Start a smooth scroll by `dx`, accumulating onto any in-flight target
    pub fn scroll_by_smooth(&mut self, dx: f64) {
        let from = self.animation.unwrap_or(self.viewport.scroll_left());
        let target = clamp(from + dx, 0.0, self.viewport.max_scroll());
        if (target - self.viewport.scroll_left()).abs() < EPSILON {
            self.animation = None;
        } else {
            self.animation = Some(target);
        }
    }

    /// Single arrow tap
    pub fn tap_arrow(&mut self, side: ArrowSide) {
        self.scroll_by_smooth(side.sign() * self.settings.step_px);
    }

    /// Arrow pressed: step once now and keep repeating until released
    pub fn press_arrow(&mut self, side: ArrowSide, now: Instant) {
        if self.arrow.is_some() {
            return;
        }
        self.tap_arrow(side);
        self.arrow = Some(ArrowHold {
            side,
            next_fire: now + self.hold_interval(),
        });
    }

    /// Stop any arrow repetition. Returns whether an arrow was held.
    pub fn release_arrow(&mut self) -> bool {
        self.arrow.take().is_some()
    }

    /// Advance timers and animation. Returns whether the offset changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let Some(mut hold) = self.arrow {
            let interval = self.hold_interval();
            let mut fired = 0;
            while now >= hold.next_fire && fired < MAX_CATCH_UP {
                self.tap_arrow(hold.side);
                hold.next_fire += interval;
                fired += 1;
            }
            if now >= hold.next_fire {
                hold.next_fire = now + interval;
            }
            self.arrow = Some(hold);
        }

        let Some(target) = self.animation else {
            return false;
        };
        let current = self.viewport.scroll_left();
        let remaining = target - current;
        let next = if remaining.abs() <= SMOOTH_SNAP_PX {
            self.animation = None;
            target
        } else {
            current + remaining * SMOOTH_FACTOR
        };
        self.scroll_to(next)
    }

    /// Drop timers and animation (tracker deleted)
    pub fn teardown(&mut self) {
        self.arrow = None;
        self.animation = None;
    }

    fn hold_interval(&self) -> Duration {
        Duration::from_millis(self.settings.hold_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sync(content: f64, visible: f64, track: f64) -> ScrollSync {
        let mut sync = ScrollSync::new(ScrollbarSettings::default());
        sync.set_track_width(track);
        sync.set_extent(content, visible);
        sync
    }

    fn settle(sync: &mut ScrollSync, now: Instant) {
        for _ in 0..200 {
            sync.tick(now);
        }
    }

    #[test]
    fn test_thumb_width_bounds() {
        // Tiny ratio still yields the minimum grab size
        assert_eq!(thumb_width(300.0, 100.0, 100_000.0, 28.0), 28.0);
        // Content fits: thumb fills the track
        assert_eq!(thumb_width(300.0, 500.0, 400.0, 28.0), 300.0);
        // Proportional
        assert_eq!(thumb_width(300.0, 500.0, 1000.0, 28.0), 150.0);
        // A track narrower than the minimum is filled, never exceeded
        assert_eq!(thumb_width(20.0, 100.0, 1000.0, 28.0), 20.0);

        for content in [1.0, 50.0, 640.0, 5000.0, 1e7] {
            for track in [28.0, 100.0, 333.0, 1200.0] {
                let w = thumb_width(track, 640.0, content, 28.0);
                assert!((28.0..=track).contains(&w), "width {w} for track {track}");
            }
        }
    }

    #[test]
    fn test_thumb_left_bounds() {
        for scroll in [-50.0, 0.0, 10.0, 500.0, 999.0, 5000.0] {
            let left = thumb_left_for_scroll(scroll, 1000.0, 300.0, 60.0);
            assert!((0.0..=240.0).contains(&left), "left {left} for scroll {scroll}");
        }
        assert_eq!(thumb_left_for_scroll(500.0, 1000.0, 300.0, 60.0), 120.0);
        assert_eq!(thumb_left_for_scroll(500.0, 0.0, 300.0, 60.0), 0.0);
    }

    #[test]
    fn test_inverse_mapping() {
        let scroll = scroll_for_thumb_left(120.0, 300.0, 60.0, 1000.0);
        assert_eq!(scroll, 500.0);
        assert_eq!(scroll_for_thumb_left(1000.0, 300.0, 60.0, 1000.0), 1000.0);
        assert_eq!(scroll_for_thumb_left(-5.0, 300.0, 60.0, 1000.0), 0.0);
    }

    #[test]
    fn test_track_hidden_when_content_fits() {
        let fits = sync(400.0, 640.0, 300.0);
        assert!(!fits.track_visible());

        let exact = sync(640.0, 640.0, 300.0);
        assert!(!exact.track_visible());

        let overflowing = sync(1280.0, 640.0, 300.0);
        assert!(overflowing.track_visible());
        assert_eq!(overflowing.thumb().width, 150.0);
    }

    #[test]
    fn test_native_scroll_moves_thumb_once() {
        let mut sync = sync(1640.0, 640.0, 300.0);
        assert!(sync.scroll_to(500.0));
        assert_eq!(sync.thumb().left, 91.5);

        // Writing the same offset again is a no-op in both directions
        assert!(!sync.scroll_to(500.0));
        assert!(!sync.sync_thumb_from_scroll());
    }

    #[test]
    fn test_thumb_write_settles_without_oscillation() {
        let mut sync = sync(1640.0, 640.0, 300.0);
        assert!(sync.scroll_from_thumb_left(91.5));
        let offset = sync.viewport().scroll_left();
        let left = sync.thumb().left;
        assert_eq!(offset, 500.0);
        assert_eq!(left, 91.5);

        // The echo of the native scroll event changes nothing
        assert!(!sync.sync_thumb_from_scroll());
        assert!(!sync.scroll_from_thumb_left(left));
        assert_eq!(sync.viewport().scroll_left(), offset);
    }

    #[test]
    fn test_press_track_centers_thumb() {
        let mut sync = sync(1640.0, 640.0, 300.0);
        // Thumb is 117 wide at left 0; press far right
        assert_eq!(sync.press_track(250.0), TrackPress::Jumped);
        assert_eq!(sync.thumb().left, 183.0);
        assert_eq!(sync.viewport().scroll_left(), sync.viewport().max_scroll());

        // Press near the left edge clamps to 0
        sync.press_track(5.0);
        assert_eq!(sync.thumb().left, 0.0);
        assert_eq!(sync.viewport().scroll_left(), 0.0);
    }

    #[test]
    fn test_press_on_thumb_starts_drag() {
        let mut sync = sync(1640.0, 640.0, 300.0);
        match sync.press_track(50.0) {
            TrackPress::Thumb(gesture) => {
                assert_eq!(gesture.start_x, 50.0);
                assert_eq!(gesture.start_left, 0.0);
            }
            other => panic!("expected drag, got {other:?}"),
        }
        assert_eq!(sync.viewport().scroll_left(), 0.0);
    }

    #[test]
    fn test_drag_is_one_to_one_and_clamped() {
        let mut sync = sync(1640.0, 640.0, 300.0);
        let gesture = sync.begin_drag(10.0);

        sync.drag(gesture, 70.0);
        assert_eq!(sync.thumb().left, 60.0);

        sync.drag(gesture, 10_000.0);
        assert_eq!(sync.thumb().left, 183.0);
        assert_eq!(sync.viewport().scroll_left(), 1000.0);

        sync.drag(gesture, -10_000.0);
        assert_eq!(sync.thumb().left, 0.0);
    }

    #[test]
    fn test_arrow_tap_scrolls_one_step() {
        let now = Instant::now();
        let mut sync = sync(1640.0, 640.0, 300.0);
        sync.press_arrow(ArrowSide::Right, now);
        assert!(sync.release_arrow());
        settle(&mut sync, now);
        assert_eq!(sync.viewport().scroll_left(), 200.0);
        assert!(!sync.is_animating());

        sync.tap_arrow(ArrowSide::Left);
        settle(&mut sync, now);
        assert_eq!(sync.viewport().scroll_left(), 0.0);
    }

    #[test]
    fn test_arrow_hold_repeats_until_release() {
        let start = Instant::now();
        let mut sync = sync(10_640.0, 640.0, 300.0);
        sync.press_arrow(ArrowSide::Right, start);
        // Pressing again while held does not double-fire
        sync.press_arrow(ArrowSide::Right, start);

        sync.tick(start + Duration::from_millis(18));
        sync.tick(start + Duration::from_millis(36));
        sync.release_arrow();
        let after_release = start + Duration::from_millis(1000);
        settle(&mut sync, after_release);

        assert_eq!(sync.viewport().scroll_left(), 600.0);
    }

    #[test]
    fn test_smooth_scroll_clamps_to_range() {
        let now = Instant::now();
        let mut sync = sync(900.0, 640.0, 300.0);
        sync.tap_arrow(ArrowSide::Right);
        sync.tap_arrow(ArrowSide::Right);
        settle(&mut sync, now);
        assert_eq!(sync.viewport().scroll_left(), 260.0);

        // Already at the end: nothing to animate
        sync.tap_arrow(ArrowSide::Right);
        assert!(!sync.is_animating());
    }

    #[test]
    fn test_jump_to_end_and_shrinking_extent() {
        let mut sync = sync(2000.0, 500.0, 200.0);
        sync.jump_to_end();
        assert_eq!(sync.viewport().scroll_left(), 1500.0);
        assert_eq!(sync.thumb().left, sync.track_width - sync.thumb().width);

        // Content shrinks below the viewport: offset resets and track hides
        sync.set_extent(400.0, 500.0);
        assert_eq!(sync.viewport().scroll_left(), 0.0);
        assert!(!sync.track_visible());
        assert_eq!(sync.thumb().left, 0.0);
    }

    #[test]
    fn test_pan_overrides_smooth_scroll() {
        let now = Instant::now();
        let mut sync = sync(1640.0, 640.0, 300.0);
        sync.jump_to_end();
        sync.scroll_by_smooth(-64.0);
        assert!(sync.is_animating());

        assert!(sync.pan_to(840.0));
        assert!(!sync.is_animating());
        settle(&mut sync, now);
        assert_eq!(sync.viewport().scroll_left(), 840.0);
    }

    #[test]
    fn test_cancel_animation_keeps_offset() {
        let now = Instant::now();
        let mut sync = sync(1640.0, 640.0, 300.0);
        sync.scroll_by_smooth(400.0);
        sync.tick(now);
        let reached = sync.viewport().scroll_left();
        assert!(reached > 0.0 && reached < 400.0);

        sync.cancel_animation();
        settle(&mut sync, now);
        assert_eq!(sync.viewport().scroll_left(), reached);
    }

    #[test]
    fn test_no_overflow_ignores_gestures() {
        let mut sync = sync(300.0, 640.0, 300.0);
        assert!(!sync.scroll_from_thumb_left(100.0));
        sync.tap_arrow(ArrowSide::Right);
        assert!(!sync.is_animating());
    }

    #[test]
    fn test_teardown_stops_timers() {
        let now = Instant::now();
        let mut sync = sync(5000.0, 640.0, 300.0);
        sync.press_arrow(ArrowSide::Right, now);
        assert!(sync.is_arrow_held());
        sync.teardown();
        assert!(!sync.is_animating());
        assert!(!sync.tick(now + Duration::from_secs(1)));
    }
}

//! Shared scroll position feed
//!
//! The grid's scroll area publishes its metrics once per frame into a single
//! [`ScrollFeed`]. Components that care about scrolling hold a
//! [`ScrollSubscription`] and see a "scroll event" only when the vertical
//! offset actually moved since they last looked. Content growing or shrinking
//! under a fixed offset is not an event.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Offsets closer than this are treated as unchanged
const OFFSET_EPSILON: f32 = 0.01;

/// Duration of the scroll-to-top animation
pub const SCROLL_TOP_DURATION: Duration = Duration::from_millis(350);

/// Geometry of a vertical scroll area at one instant
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Distance scrolled from the top
    pub offset: f32,
    /// Height of the visible region
    pub viewport_height: f32,
    /// Full height of the scrolled content
    pub content_height: f32,
}

impl ScrollMetrics {
    pub fn new(offset: f32, viewport_height: f32, content_height: f32) -> Self {
        Self {
            offset,
            viewport_height,
            content_height,
        }
    }

    /// `offset + viewport + slack >= content`
    pub fn near_bottom(&self, slack: f32) -> bool {
        self.offset + self.viewport_height + slack >= self.content_height
    }
}

// ============================================================================
// Feed / subscriptions
// ============================================================================

#[derive(Debug, Default)]
struct FeedState {
    latest: ScrollMetrics,
    /// Bumped every time the offset moves
    version: u64,
}

/// Single publisher of scroll metrics, cheap to clone
#[derive(Debug, Clone, Default)]
pub struct ScrollFeed {
    state: Rc<RefCell<FeedState>>,
}

impl ScrollFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record this frame's metrics; returns true when it counts as a scroll event
    pub fn publish(&self, metrics: ScrollMetrics) -> bool {
        let mut state = self.state.borrow_mut();
        let moved = (state.latest.offset - metrics.offset).abs() > OFFSET_EPSILON;
        state.latest = metrics;
        if moved {
            state.version += 1;
        }
        moved
    }

    pub fn latest(&self) -> ScrollMetrics {
        self.state.borrow().latest
    }

    /// New subscriber; events published before this call are not replayed
    pub fn subscribe(&self) -> ScrollSubscription {
        let seen = self.state.borrow().version;
        ScrollSubscription {
            feed: self.clone(),
            seen,
        }
    }
}

/// One reader of a [`ScrollFeed`]
#[derive(Debug, Clone)]
pub struct ScrollSubscription {
    feed: ScrollFeed,
    seen: u64,
}

impl ScrollSubscription {
    /// Latest metrics if a scroll event happened since the previous call
    pub fn next_event(&mut self) -> Option<ScrollMetrics> {
        let state = self.feed.state.borrow();
        if state.version > self.seen {
            self.seen = state.version;
            Some(state.latest)
        } else {
            None
        }
    }
}

// ============================================================================
// Scroll-to-top control
// ============================================================================

/// Ease-out animation of the scroll offset back to zero
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    from: f32,
    start: Instant,
    duration: Duration,
}

impl ScrollAnimation {
    pub fn new(from: f32, start: Instant, duration: Duration) -> Self {
        Self {
            from,
            start,
            duration,
        }
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.start) >= self.duration
    }

    /// Offset to display at `now`; exactly 0.0 once finished
    pub fn offset_at(&self, now: Instant) -> f32 {
        if self.duration.is_zero() || self.is_finished(now) {
            return 0.0;
        }
        let t = now.saturating_duration_since(self.start).as_secs_f32() / self.duration.as_secs_f32();
        let eased = 1.0 - (1.0 - t).powi(3);
        self.from * (1.0 - eased)
    }
}

/// Visibility and animation state of the floating "back to top" button
#[derive(Debug)]
pub struct ScrollTopControl {
    threshold: f32,
    visible: bool,
    animation: Option<ScrollAnimation>,
    events: ScrollSubscription,
}

impl ScrollTopControl {
    pub fn new(threshold: f32, events: ScrollSubscription) -> Self {
        Self {
            threshold,
            visible: false,
            animation: None,
            events,
        }
    }

    /// Consume the latest scroll event, if any, and update visibility
    pub fn update(&mut self) {
        if let Some(metrics) = self.events.next_event() {
            self.visible = metrics.offset > self.threshold;
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Start animating from `current_offset` to the top
    pub fn click(&mut self, current_offset: f32, now: Instant) {
        log::debug!("scroll-to-top from offset {:.0}", current_offset);
        self.animation = Some(ScrollAnimation::new(current_offset, now, SCROLL_TOP_DURATION));
    }

    /// Offset the scroll area must be forced to this frame, if animating
    pub fn animated_offset(&mut self, now: Instant) -> Option<f32> {
        let animation = self.animation?;
        let offset = animation.offset_at(now);
        if animation.is_finished(now) {
            self.animation = None;
        }
        Some(offset)
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }
}

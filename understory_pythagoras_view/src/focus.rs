// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover focus: which squares to raise, and when to let go.
//!
//! Moving the pointer between squares produces a leave immediately followed by an
//! enter. Restoring the tree on every leave would make it flicker, so a leave only
//! schedules the restore on a [`Debounce`] timer and the next enter cancels it.
//!
//! ```
//! use core::time::Duration;
//! use understory_pythagoras_view::Debounce;
//!
//! let mut t = Debounce::new(Duration::from_millis(250));
//! t.schedule(Duration::from_secs(1));
//! assert!(!t.poll(Duration::from_millis(1100)));
//! assert!(t.poll(Duration::from_millis(1250)));
//! // Single shot.
//! assert!(!t.poll(Duration::from_secs(2)));
//! ```

use core::hash::Hash;
use core::time::Duration;

use hashbrown::HashSet;
use understory_pythagoras::{LayoutId, PythagorasTree};

/// A single-shot timer driven by host-supplied monotonic time.
///
/// Scheduling again replaces the pending deadline.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Duration>,
}

impl Debounce {
    /// Create an idle timer that fires `delay` after being scheduled.
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// The configured delay.
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm the timer to fire `delay` after `now`.
    pub fn schedule(&mut self, now: Duration) {
        self.deadline = Some(now.saturating_add(self.delay));
    }

    /// Disarm the timer.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// When the timer will fire, if armed.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// True while armed.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Fire if the deadline has passed. Returns `true` at most once per scheduling.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Nodes raised while `hovered` is under the pointer: its subtree and its ancestors.
pub(crate) fn raised<K: Copy + Eq + Hash>(
    tree: &PythagorasTree<K>,
    hovered: LayoutId,
) -> HashSet<LayoutId> {
    let mut set: HashSet<LayoutId> = tree.subtree(hovered).into_iter().collect();
    set.extend(tree.path_to_root(hovered));
    set
}

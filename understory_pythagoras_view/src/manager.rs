// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The depth-limited draw manager.

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;
use core::f64::consts::FRAC_PI_2;
use core::fmt;
use core::time::Duration;

use hashbrown::HashMap;
use kurbo::Point;
use understory_pythagoras::{LayoutId, PythagorasLayout, PythagorasTree, Square, TreeAdapter};

use crate::events::{DrawEvent, Emphasis};
use crate::focus::{self, Debounce};
use crate::stacking::Stacking;
use crate::style::{self, NodeColorFn, Rgba8, TooltipFn};

/// Delay between the pointer leaving the tree and the focus being restored.
pub const DEFAULT_HOVER_DELAY: Duration = Duration::from_millis(250);

/// Settings for a [`DrawManager`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DrawConfig {
    /// Square the layout root is placed at.
    pub initial_square: Square,
    /// Depth limit applied by [`DrawManager::set_tree`].
    ///
    /// `None` draws the whole tree (the adapter's `max_depth`).
    pub initial_depth_limit: Option<i64>,
    /// Debounce delay for restoring focus after a hover leave.
    pub hover_delay: Duration,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            initial_square: Square::new(Point::ORIGIN, 200.0, -FRAC_PI_2),
            initial_depth_limit: None,
            hover_delay: DEFAULT_HOVER_DELAY,
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct Materialized {
    visible: bool,
    stacking: Stacking,
}

/// Keeps a host's scene in sync with "every node whose depth is at most the limit".
///
/// The manager owns the adapter and its layout and answers every change with the
/// [`DrawEvent`]s the host should apply. Changing the depth limit only touches
/// the squares that cross it: lowering the limit hides the deepest drawn squares,
/// raising it shows or creates squares from a frontier one level past the drawn
/// boundary. A square is created at most once per tree and only hidden
/// afterwards, never dropped, until the tree is replaced or cleared.
///
/// ```
/// use understory_pythagoras::WeightedTree;
/// use understory_pythagoras_view::{DrawEvent, DrawManager};
///
/// let mut manager = DrawManager::new(Default::default());
/// let events = manager.set_tree(Some(WeightedTree::balanced(2, 2)));
/// assert_eq!(events.len(), 7);
///
/// let events = manager.set_depth_limit(0);
/// assert!(events.iter().all(|e| matches!(e, DrawEvent::Hide { .. })));
/// assert_eq!(manager.visible_labels(), [0]);
/// ```
pub struct DrawManager<A: TreeAdapter> {
    config: DrawConfig,
    adapter: Option<A>,
    tree: Option<PythagorasTree<A::NodeId>>,
    depth_limit: i64,
    // Drawn entries in non-decreasing depth order; the back is the deepest.
    drawn: VecDeque<(usize, LayoutId)>,
    // Entries one level past the drawn boundary; the front is the shallowest.
    frontier: VecDeque<(usize, LayoutId)>,
    handles: HashMap<LayoutId, Materialized>,
    node_color: NodeColorFn<A, A::NodeId>,
    tooltip: TooltipFn<A, A::NodeId>,
    hovered: Option<LayoutId>,
    restore: Debounce,
}

impl<A: TreeAdapter> fmt::Debug for DrawManager<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawManager")
            .field("config", &self.config)
            .field("tree", &self.tree)
            .field("depth_limit", &self.depth_limit)
            .field("drawn", &self.drawn.len())
            .field("frontier", &self.frontier.len())
            .field("handles", &self.handles.len())
            .field("hovered", &self.hovered)
            .field("restore", &self.restore)
            .finish_non_exhaustive()
    }
}

impl<A: TreeAdapter> Default for DrawManager<A> {
    fn default() -> Self {
        Self::new(DrawConfig::default())
    }
}

/// True if a node at `depth` lies below `limit`.
fn exceeds(depth: usize, limit: i64) -> bool {
    i64::try_from(depth).unwrap_or(i64::MAX) > limit
}

impl<A: TreeAdapter> DrawManager<A> {
    /// Create an empty manager.
    pub fn new(config: DrawConfig) -> Self {
        Self {
            config,
            adapter: None,
            tree: None,
            depth_limit: 0,
            drawn: VecDeque::new(),
            frontier: VecDeque::new(),
            handles: HashMap::new(),
            node_color: style::default_color(),
            tooltip: style::default_tooltip(),
            hovered: None,
            restore: Debounce::new(config.hover_delay),
        }
    }

    /// The configuration this manager was created with.
    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    /// The current depth limit.
    pub fn depth_limit(&self) -> i64 {
        self.depth_limit
    }

    /// The current adapter, if a tree is set.
    pub fn adapter(&self) -> Option<&A> {
        self.adapter.as_ref()
    }

    /// The current layout, if a tree is set.
    pub fn tree(&self) -> Option<&PythagorasTree<A::NodeId>> {
        self.tree.as_ref()
    }

    fn id_of(&self, label: A::NodeId) -> Option<LayoutId> {
        self.tree.as_ref()?.find(label)
    }

    /// True if a renderable exists for `label`, visible or not.
    pub fn is_materialized(&self, label: A::NodeId) -> bool {
        self.id_of(label)
            .is_some_and(|id| self.handles.contains_key(&id))
    }

    /// True if the renderable for `label` is currently shown.
    pub fn is_visible(&self, label: A::NodeId) -> bool {
        self.id_of(label)
            .and_then(|id| self.handles.get(&id))
            .is_some_and(|h| h.visible)
    }

    /// Labels of the drawn nodes, shallowest first.
    pub fn visible_labels(&self) -> Vec<A::NodeId> {
        let Some(tree) = &self.tree else {
            return Vec::new();
        };
        self.drawn.iter().map(|&(_, id)| tree[id].label()).collect()
    }

    /// Replace the tree.
    ///
    /// Destroys every renderable of the previous tree, then lays out the new one
    /// from [`DrawConfig::initial_square`] and draws it down to
    /// [`DrawConfig::initial_depth_limit`] (the whole tree by default).
    pub fn set_tree(&mut self, adapter: Option<A>) -> Vec<DrawEvent<A::NodeId>> {
        let mut events = self.clear();
        let Some(adapter) = adapter else {
            return events;
        };
        let tree = PythagorasLayout::new().compute(
            &adapter,
            adapter.root(),
            self.config.initial_square,
        );
        let limit = self
            .config
            .initial_depth_limit
            .unwrap_or_else(|| i64::try_from(adapter.max_depth()).unwrap_or(i64::MAX));
        tracing::debug!(nodes = tree.len(), limit, "tree set");
        self.adapter = Some(adapter);
        self.tree = Some(tree);
        events.extend(self.set_depth_limit(limit));
        events
    }

    /// Drop the tree and every renderable.
    ///
    /// Returns a `Destroy` for every materialized node, in layout pre-order. The
    /// depth limit is kept.
    pub fn clear(&mut self) -> Vec<DrawEvent<A::NodeId>> {
        let mut events = Vec::new();
        if let Some(tree) = &self.tree {
            events.extend(
                tree.iter()
                    .filter(|(id, _)| self.handles.contains_key(id))
                    .map(|(_, n)| DrawEvent::Destroy { node: n.label() }),
            );
            tracing::debug!(destroyed = events.len(), "tree cleared");
        }
        self.adapter = None;
        self.tree = None;
        self.drawn.clear();
        self.frontier.clear();
        self.handles.clear();
        self.hovered = None;
        self.restore.cancel();
        events
    }

    /// Draw every node whose depth is at most `limit` (the root has depth `0`).
    ///
    /// Any limit is accepted. A negative limit hides everything, including the
    /// root. Without a tree only the limit is recorded.
    pub fn set_depth_limit(&mut self, limit: i64) -> Vec<DrawEvent<A::NodeId>> {
        self.depth_limit = limit;
        let (Some(tree), Some(adapter)) = (&self.tree, &self.adapter) else {
            return Vec::new();
        };
        let mut events = Vec::new();

        if self.drawn.is_empty() && self.frontier.is_empty() {
            self.frontier.push_front((0, tree.root()));
        }
        // After a decrease the frontier lies entirely below the limit; it is
        // rebuilt from the hidden entries at `limit + 1`.
        if self.drawn.back().is_some_and(|&(d, _)| exceeds(d, limit)) {
            self.frontier.clear();
        }

        let mut hidden = 0_usize;
        while let Some(&(depth, id)) = self.drawn.back() {
            if !exceeds(depth, limit) {
                break;
            }
            self.drawn.pop_back();
            if limit.checked_add(1) == i64::try_from(depth).ok() {
                self.frontier.push_front((depth, id));
            }
            if let Some(handle) = self.handles.get_mut(&id) {
                handle.visible = false;
                hidden += 1;
                events.push(DrawEvent::Hide {
                    node: tree[id].label(),
                });
            }
        }

        let (mut created, mut shown) = (0_usize, 0_usize);
        while let Some(&(depth, id)) = self.frontier.front() {
            if exceeds(depth, limit) {
                break;
            }
            self.frontier.pop_front();
            self.drawn.push_back((depth, id));
            self.frontier
                .extend(tree.children(id).iter().map(|&c| (depth + 1, c)));

            let node = &tree[id];
            if let Some(handle) = self.handles.get_mut(&id) {
                handle.visible = true;
                shown += 1;
                events.push(DrawEvent::Show { node: node.label() });
                continue;
            }
            let stacking = match node.parent() {
                None => Stacking::ROOT,
                Some(parent) => {
                    let siblings = tree.children(parent);
                    let index = siblings.iter().position(|&s| s == id).unwrap_or(0);
                    self.handles
                        .get(&parent)
                        .map_or(Stacking::ROOT, |h| h.stacking)
                        .child(index, siblings.len())
                }
            };
            self.handles.insert(
                id,
                Materialized {
                    visible: true,
                    stacking,
                },
            );
            created += 1;
            events.push(DrawEvent::Create {
                node: node.label(),
                square: node.square(),
                color: (self.node_color)(adapter, node.label()),
                tooltip: (self.tooltip)(adapter, node.label()),
                depth: node.depth(),
                z_index: stacking.z,
            });
        }

        tracing::debug!(limit, created, shown, hidden, "depth limit changed");
        events
    }

    /// Set the callback that computes node fills. Call [`Self::refresh_styles`] to apply it
    /// to existing renderables.
    pub fn set_node_color_fn(&mut self, f: impl Fn(&A, A::NodeId) -> Rgba8 + 'static) {
        self.node_color = alloc::boxed::Box::new(f);
    }

    /// Set the callback that computes node tooltips. Call [`Self::refresh_styles`] to apply
    /// it to existing renderables.
    pub fn set_tooltip_fn(&mut self, f: impl Fn(&A, A::NodeId) -> String + 'static) {
        self.tooltip = alloc::boxed::Box::new(f);
    }

    /// Recompute color and tooltip of every materialized node, hidden ones included.
    pub fn refresh_styles(&self) -> Vec<DrawEvent<A::NodeId>> {
        let (Some(tree), Some(adapter)) = (&self.tree, &self.adapter) else {
            return Vec::new();
        };
        tree.iter()
            .filter(|(id, _)| self.handles.contains_key(id))
            .map(|(_, n)| DrawEvent::Restyle {
                node: n.label(),
                color: (self.node_color)(adapter, n.label()),
                tooltip: (self.tooltip)(adapter, n.label()),
            })
            .collect()
    }

    /// The pointer entered the square of `label`.
    ///
    /// Cancels a pending restore, then raises the hovered subtree and its
    /// ancestors and dims every other materialized node. Unknown or
    /// unmaterialized labels produce no events.
    pub fn hover_enter(&mut self, label: A::NodeId) -> Vec<DrawEvent<A::NodeId>> {
        self.restore.cancel();
        let Some(tree) = &self.tree else {
            return Vec::new();
        };
        let Some(id) = tree.find(label).filter(|id| self.handles.contains_key(id)) else {
            return Vec::new();
        };
        self.hovered = Some(id);
        let raised = focus::raised(tree, id);
        tracing::trace!(?label, raised = raised.len(), "hover enter");
        self.focus_events(|id| {
            if raised.contains(&id) {
                Emphasis::Raised
            } else {
                Emphasis::Dimmed
            }
        })
    }

    /// The pointer left the square of `label` at `now`.
    ///
    /// Schedules the restore; [`Self::poll_timer`] performs it once the hover
    /// delay has passed without another enter. A leave for any node other than
    /// the hovered one is ignored.
    pub fn hover_leave(&mut self, label: A::NodeId, now: Duration) {
        if self.hovered.is_none() || self.id_of(label) != self.hovered {
            return;
        }
        tracing::trace!(?label, "hover leave");
        self.restore.schedule(now);
    }

    /// When the pending restore fires, if one is scheduled.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.restore.deadline()
    }

    /// Advance the hover timer to `now`.
    ///
    /// Returns `Focus { emphasis: Normal }` for every materialized node when a
    /// scheduled restore is due, and nothing otherwise.
    pub fn poll_timer(&mut self, now: Duration) -> Vec<DrawEvent<A::NodeId>> {
        if !self.restore.poll(now) {
            return Vec::new();
        }
        self.hovered = None;
        self.focus_events(|_| Emphasis::Normal)
    }

    fn focus_events(&self, emphasis: impl Fn(LayoutId) -> Emphasis) -> Vec<DrawEvent<A::NodeId>> {
        let Some(tree) = &self.tree else {
            return Vec::new();
        };
        tree.iter()
            .filter(|(id, _)| self.handles.contains_key(id))
            .map(|(id, n)| DrawEvent::Focus {
                node: n.label(),
                emphasis: emphasis(id),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use understory_pythagoras::WeightedTree;

    fn count(events: &[DrawEvent<usize>]) -> (usize, usize, usize) {
        let mut out = (0, 0, 0);
        for e in events {
            match e {
                DrawEvent::Create { .. } => out.0 += 1,
                DrawEvent::Show { .. } => out.1 += 1,
                DrawEvent::Hide { .. } => out.2 += 1,
                _ => {}
            }
        }
        out
    }

    fn manager_at(limit: i64) -> DrawManager<WeightedTree> {
        DrawManager::new(DrawConfig {
            initial_depth_limit: Some(limit),
            ..DrawConfig::default()
        })
    }

    fn sorted(mut v: Vec<usize>) -> Vec<usize> {
        v.sort_unstable();
        v
    }

    #[test]
    fn set_tree_draws_everything_by_default() {
        let mut m = DrawManager::default();
        let events = m.set_tree(Some(WeightedTree::balanced(2, 2)));
        assert_eq!(count(&events), (7, 0, 0));
        assert_eq!(m.depth_limit(), 2);
        assert_eq!(m.visible_labels(), [0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn depth_changes_reuse_handles() {
        let mut m = manager_at(0);
        assert_eq!(count(&m.set_tree(Some(WeightedTree::balanced(2, 2)))), (1, 0, 0));

        assert_eq!(count(&m.set_depth_limit(2)), (6, 0, 0));
        assert_eq!(count(&m.set_depth_limit(0)), (0, 0, 6));
        assert_eq!(m.visible_labels(), [0]);
        assert!(m.is_materialized(6));
        assert!(!m.is_visible(6));

        assert_eq!(count(&m.set_depth_limit(2)), (0, 6, 0));
        assert!(m.is_visible(6));
    }

    #[test]
    fn partial_steps() {
        let mut m = manager_at(2);
        m.set_tree(Some(WeightedTree::balanced(3, 2)));
        assert_eq!(count(&m.set_depth_limit(1)), (0, 0, 4));
        assert_eq!(count(&m.set_depth_limit(3)), (8, 4, 0));
        assert_eq!(count(&m.set_depth_limit(1)), (0, 0, 12));
        assert_eq!(count(&m.set_depth_limit(2)), (0, 4, 0));
        assert_eq!(sorted(m.visible_labels()), [0, 1, 2, 3, 4, 5, 6]);
        // Nothing changes at an unchanged limit.
        assert!(m.set_depth_limit(2).is_empty());
    }

    #[test]
    fn incremental_matches_full_rebuild() {
        let paths: [&[i64]; 4] = [&[0, 3, 1, 2], &[3, 0, 3], &[-1, 2, -5, 1], &[1, 1, 4, 0, 2]];
        for path in paths {
            let mut m = manager_at(0);
            m.set_tree(Some(WeightedTree::balanced(3, 2)));
            for &limit in path {
                m.set_depth_limit(limit);
                let mut fresh = manager_at(limit);
                fresh.set_tree(Some(WeightedTree::balanced(3, 2)));
                assert_eq!(
                    sorted(m.visible_labels()),
                    sorted(fresh.visible_labels()),
                    "limit path {path:?} at {limit}"
                );
            }
        }
    }

    #[test]
    fn each_node_is_created_once() {
        let mut m = manager_at(0);
        let mut creates = HashMap::<usize, usize>::new();
        let mut record = |events: Vec<DrawEvent<usize>>| {
            for e in events {
                if let DrawEvent::Create { node, .. } = e {
                    *creates.entry(node).or_default() += 1;
                }
            }
        };
        record(m.set_tree(Some(WeightedTree::balanced(3, 2))));
        for limit in [3, 0, -1, 2, 3, 1, 3] {
            record(m.set_depth_limit(limit));
        }
        assert_eq!(creates.len(), 15);
        assert!(creates.values().all(|&n| n == 1));
    }

    #[test]
    fn negative_limit_hides_the_root() {
        let mut m = manager_at(1);
        m.set_tree(Some(WeightedTree::balanced(2, 2)));
        assert_eq!(count(&m.set_depth_limit(-1)), (0, 0, 3));
        assert!(m.visible_labels().is_empty());
        assert!(m.set_depth_limit(-3).is_empty());

        let events = m.set_depth_limit(0);
        assert_eq!(events, vec![DrawEvent::Show { node: 0 }]);
        assert_eq!(m.visible_labels(), [0]);
    }

    #[test]
    fn limit_without_tree_is_recorded() {
        let mut m: DrawManager<WeightedTree> = DrawManager::default();
        assert!(m.set_depth_limit(4).is_empty());
        assert_eq!(m.depth_limit(), 4);
        assert!(m.visible_labels().is_empty());
    }

    #[test]
    fn create_carries_geometry_style_and_stacking() {
        let mut m = manager_at(2);
        m.set_node_color_fn(|_, n| Rgba8::rgb(0, 0, u8::try_from(n).unwrap()));
        m.set_tooltip_fn(|t: &WeightedTree, n| alloc::format!("{} samples", t.num_samples(n)));
        let events = m.set_tree(Some(WeightedTree::balanced(2, 2)));

        let DrawEvent::Create {
            node,
            square,
            color,
            tooltip,
            depth,
            z_index,
        } = &events[0]
        else {
            panic!("expected a create, got {:?}", events[0]);
        };
        assert_eq!(*node, 0);
        assert_eq!(*square, DrawConfig::default().initial_square);
        assert_eq!(*color, Rgba8::rgb(0, 0, 0));
        assert_eq!(tooltip, "4 samples");
        assert_eq!((*depth, *z_index), (0, 0));

        let z: HashMap<usize, u64> = events
            .iter()
            .filter_map(|e| match e {
                DrawEvent::Create { node, z_index, .. } => Some((*node, *z_index)),
                _ => None,
            })
            .collect();
        assert_eq!(z[&1], 0);
        assert_eq!(z[&2], 2_500_000);
        assert_eq!(z[&5], 2_500_000);
        assert_eq!(z[&6], 3_750_000);
    }

    #[test]
    fn default_style() {
        let mut m = manager_at(0);
        let events = m.set_tree(Some(WeightedTree::new(1)));
        assert!(matches!(
            &events[0],
            DrawEvent::Create { color, tooltip, .. }
                if *color == style::DEFAULT_NODE_COLOR && tooltip == style::DEFAULT_TOOLTIP
        ));
    }

    #[test]
    fn refresh_restyles_hidden_nodes_too() {
        let mut m = manager_at(2);
        m.set_tree(Some(WeightedTree::balanced(2, 2)));
        m.set_depth_limit(1);
        m.set_node_color_fn(|_, _| Rgba8::rgb(1, 2, 3));
        let events = m.refresh_styles();
        assert_eq!(events.len(), 7);
        assert!(events.iter().all(|e| matches!(
            e,
            DrawEvent::Restyle { color, .. } if *color == Rgba8::rgb(1, 2, 3)
        )));
    }

    #[test]
    fn replacing_and_clearing_destroy_handles() {
        let mut m = manager_at(1);
        m.set_tree(Some(WeightedTree::balanced(2, 2)));
        m.set_depth_limit(0);

        let events = m.set_tree(Some(WeightedTree::new(5)));
        let destroyed: Vec<usize> = events
            .iter()
            .filter(|e| matches!(e, DrawEvent::Destroy { .. }))
            .map(DrawEvent::node)
            .collect();
        assert_eq!(destroyed, [0, 1, 2]);
        assert_eq!(count(&events), (1, 0, 0));

        assert_eq!(m.clear(), vec![DrawEvent::Destroy { node: 0 }]);
        assert!(m.tree().is_none());
        assert!(m.adapter().is_none());
        assert!(m.set_tree(None).is_empty());
    }

    fn emphasis_of(events: &[DrawEvent<usize>]) -> Vec<(usize, Emphasis)> {
        events
            .iter()
            .filter_map(|e| match e {
                DrawEvent::Focus { node, emphasis } => Some((*node, *emphasis)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn hover_raises_branch_and_dims_the_rest() {
        let mut m = DrawManager::default();
        m.set_tree(Some(WeightedTree::balanced(2, 2)));
        use Emphasis::{Dimmed, Raised};
        assert_eq!(
            emphasis_of(&m.hover_enter(1)),
            [
                (0, Raised),
                (1, Raised),
                (3, Raised),
                (4, Raised),
                (2, Dimmed),
                (5, Dimmed),
                (6, Dimmed),
            ]
        );
        assert!(m.hover_enter(99).is_empty());
    }

    #[test]
    fn hover_leave_restores_after_the_delay() {
        let mut m = DrawManager::default();
        m.set_tree(Some(WeightedTree::balanced(2, 2)));
        m.hover_enter(2);
        m.hover_leave(2, Duration::from_secs(1));
        assert_eq!(m.next_deadline(), Some(Duration::from_millis(1250)));
        assert!(m.poll_timer(Duration::from_millis(1100)).is_empty());

        let events = m.poll_timer(Duration::from_millis(1250));
        assert_eq!(events.len(), 7);
        assert!(emphasis_of(&events).iter().all(|&(_, e)| e == Emphasis::Normal));
        assert!(m.poll_timer(Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn reentering_cancels_the_restore() {
        let mut m = DrawManager::default();
        m.set_tree(Some(WeightedTree::balanced(2, 2)));
        m.hover_enter(3);
        m.hover_leave(3, Duration::from_secs(1));
        assert!(!m.hover_enter(4).is_empty());
        assert_eq!(m.next_deadline(), None);
        assert!(m.poll_timer(Duration::from_secs(2)).is_empty());
    }

    #[test]
    fn leave_without_enter_schedules_nothing() {
        let mut m = DrawManager::default();
        m.set_tree(Some(WeightedTree::balanced(1, 2)));
        m.hover_leave(1, Duration::ZERO);
        assert_eq!(m.next_deadline(), None);
    }

    #[test]
    fn late_leave_of_the_previous_node_is_ignored() {
        let mut m = DrawManager::default();
        m.set_tree(Some(WeightedTree::balanced(2, 2)));
        m.hover_enter(3);
        m.hover_enter(4);
        m.hover_leave(3, Duration::from_secs(1));
        assert_eq!(m.next_deadline(), None);
        assert!(m.poll_timer(Duration::from_secs(2)).is_empty());

        m.hover_leave(4, Duration::from_secs(3));
        assert_eq!(m.next_deadline(), Some(Duration::from_millis(3250)));
    }
}

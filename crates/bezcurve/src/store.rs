//! Ordered anchor store.
//!
//! Every anchor owns exactly two handles: the previous-side handle, which
//! shapes the curve arriving at the anchor, and the next-side handle, which
//! shapes the curve leaving it. Externally handles are addressed by a flat
//! index where anchor `i` owns handles `2i` (previous) and `2i + 1` (next).

use tracing::debug;

use crate::{
    config::HANDLE_OFFSET,
    error::{Error, Result},
    point::Point2,
};

/// Which of an anchor's two handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Handle toward the preceding anchor (flat index `2i`).
    Prev,
    /// Handle toward the following anchor (flat index `2i + 1`).
    Next,
}

/// Structured address of a handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandleId {
    /// Index of the owning anchor.
    pub anchor: usize,
    /// Which of the anchor's handles.
    pub side: Side,
}

impl HandleId {
    /// Decode a flat handle index.
    pub const fn from_flat(index: usize) -> Self {
        Self {
            anchor: index / 2,
            side: if index % 2 == 0 { Side::Prev } else { Side::Next },
        }
    }
}

/// An anchor together with the two handles it owns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    /// Position of the anchor itself.
    pub position: Point2,
    /// Previous-side handle.
    pub prev: Point2,
    /// Next-side handle.
    pub next: Point2,
}

impl Anchor {
    /// An anchor at `position` with handles `offset` units to either side
    /// along the x axis.
    pub fn with_offset(position: Point2, offset: f64) -> Self {
        let delta = Point2::new(offset, 0.0);
        Self {
            position,
            prev: position - delta,
            next: position + delta,
        }
    }

    /// The handle on `side`.
    pub const fn handle(&self, side: Side) -> Point2 {
        match side {
            Side::Prev => self.prev,
            Side::Next => self.next,
        }
    }

    /// Mutable access to the handle on `side`.
    fn handle_mut(&mut self, side: Side) -> &mut Point2 {
        match side {
            Side::Prev => &mut self.prev,
            Side::Next => &mut self.next,
        }
    }

    /// Rigidly move the anchor and both handles so the anchor lands on `to`.
    ///
    /// Each handle keeps its offset from the anchor, so the result stays
    /// finite whenever `to` plus that offset is.
    fn translate_to(&mut self, to: Point2) {
        self.prev = to + (self.prev - self.position);
        self.next = to + (self.next - self.position);
        self.position = to;
    }
}

/// Ordered collection of anchors with their handles.
///
/// Anchor indices are always contiguous, and the handle count is always twice
/// the anchor count.
#[derive(Clone, Debug, PartialEq)]
pub struct AnchorStore {
    /// Anchors in curve order.
    anchors: Vec<Anchor>,
    /// Initial handle offset for newly inserted anchors.
    handle_offset: f64,
}

impl Default for AnchorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AnchorStore {
    /// An empty store using the default handle offset.
    pub fn new() -> Self {
        Self::with_handle_offset(HANDLE_OFFSET)
    }

    /// An empty store whose new anchors get handles `offset` units away.
    pub fn with_handle_offset(offset: f64) -> Self {
        Self {
            anchors: Vec::new(),
            handle_offset: offset,
        }
    }

    /// Number of anchors.
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Whether the store holds no anchors.
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Number of handles, always `2 * len()`.
    pub fn handle_count(&self) -> usize {
        self.anchors.len() * 2
    }

    /// All anchors in order.
    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// The anchor at `index`, if any.
    pub fn anchor(&self, index: usize) -> Option<&Anchor> {
        self.anchors.get(index)
    }

    /// The handle at flat index `index`, if any.
    pub fn handle(&self, index: usize) -> Option<Point2> {
        let id = HandleId::from_flat(index);
        self.anchors.get(id.anchor).map(|a| a.handle(id.side))
    }

    /// Anchor positions in order.
    pub fn anchor_positions(&self) -> impl ExactSizeIterator<Item = Point2> + '_ {
        self.anchors.iter().map(|a| a.position)
    }

    /// Handle positions in flat index order.
    pub fn handle_positions(&self) -> impl Iterator<Item = Point2> + '_ {
        self.anchors.iter().flat_map(|a| [a.prev, a.next])
    }

    /// Guide lines from every anchor to each of its handles, in flat handle
    /// order.
    pub fn guides(&self) -> impl Iterator<Item = [Point2; 2]> + '_ {
        self.anchors
            .iter()
            .flat_map(|a| [[a.position, a.prev], [a.position, a.next]])
    }

    /// Append an anchor at `position` and return its index.
    pub fn insert_anchor(&mut self, position: Point2) -> usize {
        self.anchors
            .push(Anchor::with_offset(position, self.handle_offset));
        let index = self.anchors.len() - 1;
        debug!(index, %position, "inserted anchor");
        index
    }

    /// Remove the anchor at `index` together with both its handles.
    ///
    /// Higher anchors shift down by one index, higher handles by two.
    pub fn delete_anchor(&mut self, index: usize) -> Result<Anchor> {
        self.check_anchor(index)?;
        let removed = self.anchors.remove(index);
        debug!(index, remaining = self.anchors.len(), "deleted anchor");
        Ok(removed)
    }

    /// Move the anchor at `index` to `position`, translating both its handles
    /// by the same displacement.
    pub fn move_anchor(&mut self, index: usize, position: Point2) -> Result<()> {
        self.check_anchor(index)?;
        self.anchors[index].translate_to(position);
        debug!(index, %position, "moved anchor");
        Ok(())
    }

    /// Place the handle with flat index `index` at `position`. The owning
    /// anchor and the sibling handle are unaffected.
    pub fn move_handle(&mut self, index: usize, position: Point2) -> Result<()> {
        let id = HandleId::from_flat(index);
        let len = self.handle_count();
        let anchor = self.anchors.get_mut(id.anchor).ok_or(Error::OutOfRange {
            entity: "handle",
            index,
            len,
        })?;
        *anchor.handle_mut(id.side) = position;
        debug!(index, %position, "moved handle");
        Ok(())
    }

    /// Fail with `OutOfRange` unless `index` addresses an anchor.
    fn check_anchor(&self, index: usize) -> Result<()> {
        if index < self.anchors.len() {
            Ok(())
        } else {
            Err(Error::OutOfRange {
                entity: "anchor",
                index,
                len: self.anchors.len(),
            })
        }
    }
}

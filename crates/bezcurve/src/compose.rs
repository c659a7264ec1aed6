//! Turn the anchor sequence into Bézier control tuples.

use smallvec::{SmallVec, smallvec};
use tracing::trace;

use crate::{point::Point2, store::Anchor};

/// Ordered control points of one Bézier piece. Degree is `len() - 1`.
///
/// Segments produced by the composite and segmented modes never exceed four
/// points, so they stay inline.
pub type Segment = SmallVec<[Point2; 4]>;

/// How anchors and handles are assembled into segments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CurveMode {
    /// One visually continuous chain with one segment per consecutive anchor
    /// pair. The two end segments are quadratic unless there are exactly two
    /// anchors.
    #[default]
    Composite,
    /// An independent cubic per consecutive anchor pair.
    Segmented,
    /// A single Bézier over the whole control chain, of degree `3n - 3`.
    Single,
}

/// Build the segments for `anchors` under `mode`.
///
/// Fewer than two anchors never produce a segment.
pub fn compose(anchors: &[Anchor], mode: CurveMode) -> Vec<Segment> {
    if anchors.len() < 2 {
        return Vec::new();
    }
    let segments = match mode {
        CurveMode::Composite => composite(anchors),
        CurveMode::Segmented => segmented(anchors),
        CurveMode::Single => vec![single(anchors)],
    };
    trace!(?mode, anchors = anchors.len(), segments = segments.len(), "composed");
    segments
}

/// The cubic between a pair of anchors using the facing handles.
fn cubic(from: &Anchor, to: &Anchor) -> Segment {
    smallvec![from.position, from.next, to.prev, to.position]
}

/// Segmented mode.
fn segmented(anchors: &[Anchor]) -> Vec<Segment> {
    anchors.windows(2).map(|w| cubic(&w[0], &w[1])).collect()
}

/// Composite mode.
///
/// The first anchor contributes only its next-side handle and the last only
/// its previous-side handle, so the end segments drop to quadratics. With
/// exactly two anchors the single segment keeps both handles.
fn composite(anchors: &[Anchor]) -> Vec<Segment> {
    let n = anchors.len();
    if n == 2 {
        return vec![cubic(&anchors[0], &anchors[1])];
    }
    let last = n - 2;
    anchors
        .windows(2)
        .enumerate()
        .map(|(k, w)| {
            let (from, to) = (&w[0], &w[1]);
            match k {
                0 => smallvec![from.position, from.next, to.position],
                k if k == last => smallvec![from.position, to.prev, to.position],
                _ => cubic(from, to),
            }
        })
        .collect()
}

/// Single mode: `[a0, next0, prev1, a1, next1, ..., prev(n-1), a(n-1)]`.
fn single(anchors: &[Anchor]) -> Segment {
    let mut chain = Segment::with_capacity(anchors.len() * 3 - 2);
    let last = anchors.len() - 1;
    for (i, a) in anchors.iter().enumerate() {
        if i > 0 {
            chain.push(a.prev);
        }
        chain.push(a.position);
        if i < last {
            chain.push(a.next);
        }
    }
    chain
}

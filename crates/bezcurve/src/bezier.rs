//! De Casteljau evaluation of arbitrary-degree Bézier segments.

use std::iter::FusedIterator;

use smallvec::SmallVec;

use crate::point::Point2;

/// Evaluate the Bézier curve with control points `segment` at `t`.
///
/// The control tuple is reduced by repeated linear interpolation until one
/// point remains. `t == 0` returns `segment[0]` and `t == 1` returns the last
/// control point exactly. An empty segment has no curve and evaluates to the
/// origin.
pub fn evaluate(segment: &[Point2], t: f64) -> Point2 {
    let mut work: SmallVec<[Point2; 8]> = SmallVec::from_slice(segment);
    for m in (1..work.len()).rev() {
        for i in 0..m {
            work[i] = work[i].lerp(work[i + 1], t);
        }
    }
    work.first().copied().unwrap_or(Point2::ZERO)
}

/// Parameter value of sample `index` out of `count` uniformly spaced samples
/// over `[0, 1]`.
fn parameter(index: usize, count: usize) -> f64 {
    if count <= 1 {
        0.0
    } else {
        index as f64 / (count - 1) as f64
    }
}

/// Lazy sequence of points sampled uniformly along a segment.
///
/// The iterator borrows the segment and computes each point on demand. Clone
/// it before consuming to walk the same samples again.
#[derive(Clone, Debug)]
pub struct Discretize<'a> {
    /// Control points.
    segment: &'a [Point2],
    /// Total number of samples.
    count: usize,
    /// Next index from the front.
    front: usize,
    /// One past the next index from the back.
    back: usize,
}

impl Iterator for Discretize<'_> {
    type Item = Point2;

    fn next(&mut self) -> Option<Point2> {
        if self.front >= self.back {
            return None;
        }
        let t = parameter(self.front, self.count);
        self.front += 1;
        Some(evaluate(self.segment, t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl DoubleEndedIterator for Discretize<'_> {
    fn next_back(&mut self) -> Option<Point2> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(evaluate(self.segment, parameter(self.back, self.count)))
    }
}

impl ExactSizeIterator for Discretize<'_> {}

impl FusedIterator for Discretize<'_> {}

/// Sample `count` points at uniformly spaced parameters over `[0, 1]`, both
/// ends included.
///
/// The first sample is `evaluate(segment, 0)` and the last is
/// `evaluate(segment, 1)`. A count of one yields only the start point and a
/// count of zero yields nothing. An empty segment yields nothing.
pub fn discretize(segment: &[Point2], count: usize) -> Discretize<'_> {
    let count = if segment.is_empty() { 0 } else { count };
    Discretize {
        segment,
        count,
        front: 0,
        back: count,
    }
}

/// Collect [`discretize`] into a polyline.
pub fn polyline(segment: &[Point2], count: usize) -> Vec<Point2> {
    discretize(segment, count).collect()
}

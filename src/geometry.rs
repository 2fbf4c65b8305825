//! Axis-aligned rectangles and sets of pairwise-disjoint rectangles.
//!
//! Rectangles are stored by their edges (`left`, `top`, `right`, `bottom`) rather than
//! origin + size so that splitting and re-joining them never accumulates rounding.
//! A [`Region`] keeps its members disjoint after every `add`/`discard`, but makes no
//! attempt to merge neighbouring fragments back together: the same area can be
//! represented by different member sets.

use std::fmt;

use cgmath::BaseNum;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    pub fn new(x: T, y: T) -> Point<T> {
        Point { x, y }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rect<T> {
    pub left: T,
    pub top: T,
    pub right: T,
    pub bottom: T,
}

fn min<T: PartialOrd>(a: T, b: T) -> T {
    if b < a {
        b
    } else {
        a
    }
}

fn max<T: PartialOrd>(a: T, b: T) -> T {
    if b > a {
        b
    } else {
        a
    }
}

/// Sorts and deduplicates a handful of coordinates.
fn sorted_coords<T: BaseNum>(mut coords: Vec<T>) -> Vec<T> {
    coords.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    coords.dedup();
    coords
}

impl<T: BaseNum> Rect<T> {
    pub fn new(left: T, top: T, right: T, bottom: T) -> Rect<T> {
        Rect {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_size(x: T, y: T, width: T, height: T) -> Rect<T> {
        Rect::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> T {
        self.right - self.left
    }

    pub fn height(&self) -> T {
        self.bottom - self.top
    }

    pub fn area(&self) -> T {
        self.width() * self.height()
    }

    /// A rectangle without positive area covers nothing.
    pub fn is_empty(&self) -> bool {
        !(self.left < self.right && self.top < self.bottom)
    }

    pub fn top_left(&self) -> Point<T> {
        Point::new(self.left, self.top)
    }

    pub fn top_right(&self) -> Point<T> {
        Point::new(self.right, self.top)
    }

    pub fn bottom_left(&self) -> Point<T> {
        Point::new(self.left, self.bottom)
    }

    pub fn bottom_right(&self) -> Point<T> {
        Point::new(self.right, self.bottom)
    }

    pub fn center(&self) -> Point<T> {
        let two = T::one() + T::one();
        Point::new(
            self.left + self.width() / two,
            self.top + self.height() / two,
        )
    }

    /// Edges count as inside.
    pub fn contains_point(&self, point: &Point<T>) -> bool {
        self.left <= point.x && point.x <= self.right && self.top <= point.y && point.y <= self.bottom
    }

    pub fn contains_rect(&self, rect: &Rect<T>) -> bool {
        self.contains_point(&rect.top_left()) && self.contains_point(&rect.bottom_right())
    }

    /// The overlap of both rectangles, `None` unless it has positive width and height.
    /// Rectangles that only share an edge or a corner do not intersect.
    pub fn intersect(&self, rect: &Rect<T>) -> Option<Rect<T>> {
        let x1 = max(min(self.left, self.right), min(rect.left, rect.right));
        let y1 = max(min(self.top, self.bottom), min(rect.top, rect.bottom));
        let x2 = min(max(self.left, self.right), max(rect.left, rect.right));
        let y2 = min(max(self.top, self.bottom), max(rect.top, rect.bottom));
        if x1 < x2 && y1 < y2 {
            Some(Rect::new(x1, y1, x2, y2))
        } else {
            None
        }
    }

    pub fn overlaps(&self, rect: &Rect<T>) -> bool {
        self.intersect(rect).is_some()
    }

    /// Partitions what is left of `self` once `rect` is cut out of it.
    ///
    /// `self` is cut along every edge of `rect` that falls strictly inside it; every
    /// cell of the resulting grid except the intersection itself is returned, columns
    /// first. If the two don't overlap, `self` is returned whole.
    pub fn difference(&self, rect: &Rect<T>) -> Vec<Rect<T>> {
        let intersection = match self.intersect(rect) {
            Some(intersection) => intersection,
            None => return vec![*self],
        };

        let mut xs = vec![self.left, self.right];
        let mut ys = vec![self.top, self.bottom];
        for &x in &[rect.left, rect.right] {
            if self.left < x && x < self.right {
                xs.push(x);
            }
        }
        for &y in &[rect.top, rect.bottom] {
            if self.top < y && y < self.bottom {
                ys.push(y);
            }
        }
        let xs = sorted_coords(xs);
        let ys = sorted_coords(ys);

        let mut out = Vec::with_capacity(8);
        for xp in xs.windows(2) {
            for yp in ys.windows(2) {
                let cell = Rect::new(xp[0], yp[0], xp[1], yp[1]);
                if cell != intersection {
                    out.push(cell);
                }
            }
        }
        out
    }

    /// Everything covered by exactly one of the two rectangles.
    pub fn symmetric_difference(&self, rect: &Rect<T>) -> Region<T> {
        let mut region = Region::new();
        region.add(*self);
        region.add(*rect);
        if let Some(intersection) = self.intersect(rect) {
            region.discard(&intersection);
        }
        region
    }
}

impl<T: fmt::Display> fmt::Display for Rect<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rect({}, {}, {}, {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// A set of pairwise-disjoint rectangles.
#[derive(Clone, Debug)]
pub struct Region<T> {
    rects: Vec<Rect<T>>,
}

impl<T> Default for Region<T> {
    fn default() -> Self {
        Region { rects: Vec::new() }
    }
}

impl<T: BaseNum> Region<T> {
    pub fn new() -> Region<T> {
        Region::default()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rect<T>> {
        self.rects.iter()
    }

    /// Whether `rect` is one of the members, as opposed to merely being covered.
    pub fn has_member(&self, rect: &Rect<T>) -> bool {
        self.rects.contains(rect)
    }

    pub fn contains_point(&self, point: &Point<T>) -> bool {
        self.rects.iter().any(|r| r.contains_point(point))
    }

    /// True if a single member covers `rect`.
    pub fn contains_rect(&self, rect: &Rect<T>) -> bool {
        self.rects.iter().any(|r| r.contains_rect(rect))
    }

    pub fn contains_region(&self, region: &Region<T>) -> bool {
        region.iter().all(|r| self.contains_rect(r))
    }

    pub fn area(&self) -> T {
        self.rects.iter().fold(T::zero(), |acc, r| acc + r.area())
    }

    /// Adds the part of `rect` not yet covered, as fragments disjoint from every member.
    pub fn add(&mut self, rect: Rect<T>) {
        if rect.is_empty() || self.contains_rect(&rect) {
            return;
        }

        let mut fragments = vec![rect];
        for member in self.rects.iter().filter(|m| m.overlaps(&rect)) {
            fragments = fragments
                .into_iter()
                .flat_map(|f| {
                    if f.overlaps(member) {
                        f.difference(member)
                    } else {
                        vec![f]
                    }
                })
                .collect();
            if fragments.is_empty() {
                return;
            }
        }
        self.rects.extend(fragments);
    }

    /// Removes `rect` from the covered area, splitting the members it cuts through.
    pub fn discard(&mut self, rect: &Rect<T>) {
        let mut rects = Vec::with_capacity(self.rects.len());
        for member in self.rects.drain(..) {
            if member.overlaps(rect) {
                rects.extend(member.difference(rect));
            } else {
                rects.push(member);
            }
        }
        self.rects = rects;
    }

    pub fn union(&mut self, region: &Region<T>) {
        for rect in region.iter() {
            self.add(*rect);
        }
    }

    pub fn subtract(&mut self, region: &Region<T>) {
        for rect in region.iter() {
            self.discard(rect);
        }
    }

    /// The smallest rectangle covering every member, `None` for an empty region.
    pub fn bounding_rect(&self) -> Option<Rect<T>> {
        let mut iter = self.rects.iter();
        let first = *iter.next()?;
        Some(iter.fold(first, |acc, r| Rect {
            left: min(acc.left, r.left),
            top: min(acc.top, r.top),
            right: max(acc.right, r.right),
            bottom: max(acc.bottom, r.bottom),
        }))
    }

    pub fn clear(&mut self) {
        self.rects.clear();
    }
}

impl<T: BaseNum> PartialEq for Region<T> {
    /// Membership equality, independent of order.
    fn eq(&self, other: &Region<T>) -> bool {
        self.len() == other.len() && self.rects.iter().all(|r| other.has_member(r))
    }
}

impl<T: BaseNum> Extend<Rect<T>> for Region<T> {
    fn extend<I: IntoIterator<Item = Rect<T>>>(&mut self, iter: I) {
        for rect in iter {
            self.add(rect);
        }
    }
}

impl<T: BaseNum> std::iter::FromIterator<Rect<T>> for Region<T> {
    fn from_iter<I: IntoIterator<Item = Rect<T>>>(iter: I) -> Self {
        let mut region = Region::new();
        region.extend(iter);
        region
    }
}

impl<T: BaseNum> From<Rect<T>> for Region<T> {
    fn from(rect: Rect<T>) -> Self {
        let mut region = Region::new();
        region.add(rect);
        region
    }
}

impl<'a, T> IntoIterator for &'a Region<T> {
    type Item = &'a Rect<T>;
    type IntoIter = std::slice::Iter<'a, Rect<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rects.iter()
    }
}

impl<T> IntoIterator for Region<T> {
    type Item = Rect<T>;
    type IntoIter = std::vec::IntoIter<Rect<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rects.into_iter()
    }
}

impl<T> fmt::Display for Region<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Region(rects={})", self.rects.len())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    fn r(left: f32, top: f32, right: f32, bottom: f32) -> Rect<f32> {
        Rect::new(left, top, right, bottom)
    }

    fn ri(left: i32, top: i32, right: i32, bottom: i32) -> Rect<i32> {
        Rect::new(left, top, right, bottom)
    }

    fn sorted<T: BaseNum>(rects: impl IntoIterator<Item = Rect<T>>) -> Vec<Rect<T>> {
        let mut v: Vec<_> = rects.into_iter().collect();
        v.sort_by(|a, b| a.partial_cmp(b).unwrap());
        v
    }

    #[test]
    fn point_order() {
        assert!(Point::new(0, 0) < Point::new(10, 10));
        assert!(Point::new(0, 0) < Point::new(0, 10));
        assert!(Point::new(0, 0) < Point::new(10, 0));
        assert!(Point::new(0, 10) < Point::new(10, 0));
        assert!(!(Point::new(10, 10) < Point::new(0, 0)));
    }

    #[test]
    fn difference_of_corner_overlap() {
        let a = r(0.0, 0.0, 1.0, 1.0);
        let b = r(0.5, 0.5, 1.5, 1.5);
        assert_eq!(a.intersect(&b), Some(r(0.5, 0.5, 1.0, 1.0)));
        assert_eq!(
            a.difference(&b),
            vec![
                r(0.0, 0.0, 0.5, 0.5),
                r(0.0, 0.5, 0.5, 1.0),
                r(0.5, 0.0, 1.0, 0.5),
            ]
        );
    }

    #[test]
    fn difference_of_band_through_side() {
        let a = r(0.0, 0.0, 1.0, 1.0);
        let b = r(0.25, 0.25, 1.25, 0.75);
        assert_eq!(a.intersect(&b), Some(r(0.25, 0.25, 1.0, 0.75)));
        assert_eq!(
            a.difference(&b),
            vec![
                r(0.0, 0.0, 0.25, 0.25),
                r(0.0, 0.25, 0.25, 0.75),
                r(0.0, 0.75, 0.25, 1.0),
                r(0.25, 0.0, 1.0, 0.25),
                r(0.25, 0.75, 1.0, 1.0),
            ]
        );
    }

    #[test]
    fn difference_of_hole() {
        let a = r(0.0, 0.0, 1.0, 1.0);
        let b = r(0.25, 0.25, 0.75, 0.75);
        assert_eq!(a.intersect(&b), Some(b));
        assert_eq!(a.difference(&b).len(), 8);
        assert!(!a.difference(&b).contains(&b));
    }

    #[test]
    fn difference_without_overlap_or_with_cover() {
        let a = r(0.0, 0.0, 1.0, 1.0);
        assert_eq!(a.intersect(&r(5.0, 5.0, 10.0, 10.0)), None);
        assert_eq!(a.difference(&r(5.0, 5.0, 10.0, 10.0)), vec![a]);

        let cover = r(-5.0, -5.0, 10.0, 10.0);
        assert_eq!(a.intersect(&cover), Some(a));
        assert!(a.difference(&cover).is_empty());
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = ri(0, 0, 10, 10);
        assert_eq!(a.intersect(&ri(10, 0, 20, 10)), None);
        assert_eq!(a.intersect(&ri(10, 10, 20, 20)), None);
        assert_eq!(a.difference(&ri(10, 0, 20, 10)), vec![a]);
    }

    #[test]
    fn region_add_to_empty() {
        let mut region = Region::new();
        region.add(ri(0, 0, 1, 1));
        assert_eq!(sorted(region), vec![ri(0, 0, 1, 1)]);
    }

    #[test]
    fn region_discard_whole_member() {
        let mut region = Region::from(ri(5, 5, 10, 10));
        region.discard(&ri(5, 5, 10, 10));
        assert!(region.is_empty());
    }

    #[test]
    fn region_add_overlapping_does_not_merge() {
        let mut region = Region::from(ri(5, 5, 10, 10));
        region.add(ri(5, 5, 20, 20));
        assert_eq!(
            sorted(region),
            sorted(vec![
                ri(5, 5, 10, 10),
                ri(10, 5, 20, 10),
                ri(5, 10, 10, 20),
                ri(10, 10, 20, 20),
            ])
        );
    }

    #[test]
    fn region_union_of_cross() {
        let mut region = Region::from(ri(5, 5, 10, 10));
        let cross: Region<i32> = vec![ri(0, 5, 20, 10), ri(5, 0, 10, 20)].into_iter().collect();
        region.union(&cross);
        assert_eq!(
            sorted(region.clone()),
            sorted(vec![
                ri(10, 5, 20, 10),
                ri(5, 0, 10, 5),
                ri(5, 10, 10, 20),
                ri(5, 5, 10, 10),
                ri(0, 5, 5, 10),
            ])
        );
        assert_eq!(region.bounding_rect(), Some(ri(0, 0, 20, 20)));
        assert_eq!(region.area(), 25 + 25 + 25 + 50 + 50);
    }

    #[test]
    fn bounding_rect_of_empty_region() {
        assert_eq!(Region::<i32>::new().bounding_rect(), None);
    }

    #[test]
    fn symmetric_difference() {
        let a = ri(0, 0, 20, 20);
        let b = ri(10, 10, 20, 30);
        let expected: Region<i32> = vec![
            ri(0, 0, 10, 10),
            ri(0, 10, 10, 20),
            ri(10, 20, 20, 30),
            ri(10, 0, 20, 10),
        ]
        .into_iter()
        .collect();
        assert_eq!(a.symmetric_difference(&b), expected);
    }

    #[test]
    fn containment() {
        let region: Region<i32> = vec![ri(0, 0, 10, 10), ri(20, 0, 30, 10)].into_iter().collect();
        assert!(region.contains_point(&Point::new(10, 10)));
        assert!(!region.contains_point(&Point::new(15, 5)));
        assert!(region.contains_rect(&ri(2, 2, 8, 8)));
        assert!(!region.contains_rect(&ri(5, 0, 25, 10)));
        assert!(region.contains_region(&Region::from(ri(21, 1, 29, 9))));
    }

    fn rect_strategy() -> impl Strategy<Value = Rect<i32>> {
        (0..40i32, 0..40i32, 1..25i32, 1..25i32).prop_map(|(x, y, w, h)| Rect::from_size(x, y, w, h))
    }

    fn cells(rect: &Rect<i32>) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for x in rect.left..rect.right {
            for y in rect.top..rect.bottom {
                out.push((x, y));
            }
        }
        out
    }

    fn pairwise_disjoint(rects: &[Rect<i32>]) -> bool {
        rects
            .iter()
            .enumerate()
            .all(|(i, a)| rects[i + 1..].iter().all(|b| !a.overlaps(b)))
    }

    proptest! {
        #[test]
        fn intersect_is_none_iff_no_shared_cell(a in rect_strategy(), b in rect_strategy()) {
            let shared = cells(&a).iter().any(|c| b.contains_point(&Point::new(c.0, c.1))
                && c.0 < b.right && c.1 < b.bottom);
            prop_assert_eq!(a.intersect(&b).is_some(), shared);
        }

        #[test]
        fn difference_partitions_self(a in rect_strategy(), b in rect_strategy()) {
            let pieces = a.difference(&b);
            prop_assert!(pairwise_disjoint(&pieces));
            for piece in &pieces {
                prop_assert!(!piece.is_empty());
                prop_assert!(a.contains_rect(piece));
                prop_assert!(!piece.overlaps(&b));
            }
            let covered: i32 = pieces.iter().map(|p| p.area()).sum::<i32>()
                + a.intersect(&b).map_or(0, |i| i.area());
            prop_assert_eq!(covered, a.area());
        }

        #[test]
        fn add_is_idempotent(seed in proptest::collection::vec(rect_strategy(), 0..5), r in rect_strategy()) {
            let mut once: Region<i32> = seed.into_iter().collect();
            once.add(r);
            let mut twice = once.clone();
            twice.add(r);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn disjoint_rects_stay_whole(a in rect_strategy(), b in rect_strategy()) {
            prop_assume!(!a.overlaps(&b));
            let mut region = Region::from(a);
            region.add(b);
            prop_assert!(region.has_member(&a));
            prop_assert!(region.has_member(&b));
            prop_assert_eq!(region.len(), 2);
        }

        #[test]
        fn region_covers_exactly_what_was_added_minus_discarded(
            added in proptest::collection::vec(rect_strategy(), 1..6),
            discarded in proptest::collection::vec(rect_strategy(), 0..3),
        ) {
            let mut region = Region::new();
            for r in &added {
                region.add(*r);
            }
            for r in &discarded {
                region.discard(r);
            }
            let members: Vec<_> = region.iter().cloned().collect();
            prop_assert!(pairwise_disjoint(&members));

            let mut expected = std::collections::BTreeSet::new();
            for r in &added {
                expected.extend(cells(r));
            }
            for r in &discarded {
                for c in cells(r) {
                    expected.remove(&c);
                }
            }
            let mut actual = std::collections::BTreeSet::new();
            for r in &members {
                actual.extend(cells(r));
            }
            prop_assert_eq!(actual, expected);
        }
    }
}

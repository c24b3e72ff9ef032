//! Rectangles and regions for placement and outside-press hit testing

use smallvec::SmallVec;

/// Axis-aligned rectangle in absolute logical pixels, as reported by layout
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Used by auto placement to decide which half of the viewport we sit in
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Half-open hit test: the right and bottom edges are outside
    pub fn contains(&self, px: f32, py: f32) -> bool {
        (self.x..self.right()).contains(&px) && (self.y..self.bottom()).contains(&py)
    }
}

/// A boundary made of one or more rectangles
///
/// A dropdown's interaction boundary usually covers both the trigger and the
/// floating panel, which are not adjacent when a portal is used.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Region {
    rects: SmallVec<[Bounds; 2]>,
}

impl Region {
    /// Create an empty region (contains nothing)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a region from a single rectangle
    pub fn from_bounds(bounds: Bounds) -> Self {
        let mut rects = SmallVec::new();
        rects.push(bounds);
        Self { rects }
    }

    /// Add a rectangle to the region
    pub fn with(mut self, bounds: Bounds) -> Self {
        self.rects.push(bounds);
        self
    }

    /// Add a rectangle in place
    pub fn push(&mut self, bounds: Bounds) {
        self.rects.push(bounds);
    }

    /// Remove all rectangles
    pub fn clear(&mut self) {
        self.rects.clear();
    }

    /// Check if the region has no rectangles
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Rectangles making up this region
    pub fn rects(&self) -> &[Bounds] {
        &self.rects
    }

    /// Check if a point falls inside any rectangle of the region
    pub fn contains(&self, px: f32, py: f32) -> bool {
        self.rects.iter().any(|r| r.contains(px, py))
    }
}

impl From<Bounds> for Region {
    fn from(bounds: Bounds) -> Self {
        Self::from_bounds(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_contains_is_half_open() {
        let b = Bounds::new(10.0, 10.0, 20.0, 10.0);
        assert!(b.contains(10.0, 10.0));
        assert!(b.contains(29.9, 19.9));
        assert!(!b.contains(30.0, 15.0));
        assert!(!b.contains(15.0, 20.0));
    }

    #[test]
    fn test_bounds_edges() {
        let b = Bounds::new(0.0, 100.0, 50.0, 40.0);
        assert_eq!(b.bottom(), 140.0);
        assert_eq!(b.right(), 50.0);
        assert_eq!(b.center_y(), 120.0);
    }

    #[test]
    fn test_region_union() {
        let region = Region::from_bounds(Bounds::new(0.0, 0.0, 10.0, 10.0))
            .with(Bounds::new(0.0, 50.0, 10.0, 10.0));

        assert!(region.contains(5.0, 5.0));
        assert!(region.contains(5.0, 55.0));
        assert!(!region.contains(5.0, 30.0));
        assert!(!Region::new().contains(0.0, 0.0));
    }
}

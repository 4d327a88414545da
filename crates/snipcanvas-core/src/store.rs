//! Ordered collection of info boxes.

use crate::geometry::bounding_box_of;
use crate::info_box::{clamp_size, BoxId, BoxRegion, InfoBox};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Read-only copy of the store contents, in z-order (back to front).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasSnapshot {
    pub items: Vec<InfoBox>,
}

/// Owns every box on the canvas.
///
/// Vector order is paint order: later entries are drawn on top. Every
/// operation addressed to an id that is not present is a silent no-op, since
/// gestures can outlive the box they started on.
#[derive(Debug, Clone, Default)]
pub struct ObjectStore {
    items: Vec<InfoBox>,
}

impl ObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn index_of(&self, id: BoxId) -> Option<usize> {
        self.items.iter().position(|b| b.id == id)
    }

    /// Append a box on top of the z-order.
    ///
    /// A box whose id is already present is ignored to keep ids unique.
    pub fn add(&mut self, item: InfoBox) -> BoxId {
        let id = item.id;
        if self.index_of(id).is_some() {
            log::warn!("Ignoring box with duplicate id {}", id);
            return id;
        }
        self.items.push(item);
        id
    }

    /// Get a box by id.
    pub fn get(&self, id: BoxId) -> Option<&InfoBox> {
        self.items.iter().find(|b| b.id == id)
    }

    fn get_mut(&mut self, id: BoxId) -> Option<&mut InfoBox> {
        self.items.iter_mut().find(|b| b.id == id)
    }

    /// Move a box to the top of the z-order.
    pub fn bring_to_front(&mut self, id: BoxId) {
        if let Some(idx) = self.index_of(id) {
            let item = self.items.remove(idx);
            self.items.push(item);
        }
    }

    /// Overwrite a box's top-left position.
    pub fn move_to(&mut self, id: BoxId, x: f64, y: f64) {
        if let Some(b) = self.get_mut(id) {
            b.x = x;
            b.y = y;
        }
    }

    /// Overwrite a box's size, clamped into the allowed bounds.
    pub fn resize(&mut self, id: BoxId, w: f64, h: f64) {
        if let Some(b) = self.get_mut(id) {
            let size = clamp_size(w, h);
            b.w = size.width;
            b.h = size.height;
        }
    }

    /// Replace a box's text verbatim.
    pub fn update_text(&mut self, id: BoxId, text: impl Into<String>) {
        if let Some(b) = self.get_mut(id) {
            b.text = text.into();
        }
    }

    /// Remove a box. The caller is responsible for clearing its selection.
    pub fn remove(&mut self, id: BoxId) -> Option<InfoBox> {
        self.index_of(id).map(|idx| self.items.remove(idx))
    }

    /// Clone a box under a fresh id, shifted by `offset`, on top of the z-order.
    pub fn duplicate(&mut self, id: BoxId, offset: Vec2) -> Option<BoxId> {
        let copy = self.get(id)?.duplicated(offset);
        let new_id = copy.id;
        self.items.push(copy);
        Some(new_id)
    }

    /// Boxes in z-order (back to front).
    pub fn iter(&self) -> impl Iterator<Item = &InfoBox> {
        self.items.iter()
    }

    /// Ids in z-order (back to front).
    pub fn ids(&self) -> Vec<BoxId> {
        self.items.iter().map(|b| b.id).collect()
    }

    /// Topmost box id, if any.
    pub fn top(&self) -> Option<BoxId> {
        self.items.last().map(|b| b.id)
    }

    /// Bounding box of all content, or `None` when empty.
    pub fn bounds(&self) -> Option<Rect> {
        if self.items.is_empty() {
            None
        } else {
            Some(bounding_box_of(&self.items))
        }
    }

    /// Find the frontmost box under a world point and the region hit.
    pub fn hit_test(&self, point: Point) -> Option<(BoxId, BoxRegion)> {
        self.items
            .iter()
            .rev()
            .find_map(|b| b.hit_region(point).map(|region| (b.id, region)))
    }

    /// Copy the current contents.
    pub fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot {
            items: self.items.clone(),
        }
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the number of boxes.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info_box::{MAX_HEIGHT, MAX_WIDTH, MIN_HEIGHT, MIN_WIDTH};
    use kurbo::Size;
    use uuid::Uuid;

    fn boxed(text: &str, x: f64, y: f64) -> InfoBox {
        InfoBox::new(text, Point::new(x, y), Size::new(260.0, 140.0))
    }

    #[test]
    fn test_add_appends_on_top() {
        let mut store = ObjectStore::new();
        let a = store.add(boxed("a", 0.0, 0.0));
        let b = store.add(boxed("b", 10.0, 10.0));
        assert_eq!(store.ids(), vec![a, b]);
        assert_eq!(store.top(), Some(b));
    }

    #[test]
    fn test_add_ignores_duplicate_id() {
        let mut store = ObjectStore::new();
        let item = boxed("a", 0.0, 0.0);
        store.add(item.clone());
        store.add(item);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_bring_to_front() {
        let mut store = ObjectStore::new();
        let a = store.add(boxed("a", 0.0, 0.0));
        let b = store.add(boxed("b", 0.0, 0.0));
        let c = store.add(boxed("c", 0.0, 0.0));

        store.bring_to_front(a);
        assert_eq!(store.ids(), vec![b, c, a]);

        store.bring_to_front(Uuid::new_v4());
        assert_eq!(store.ids(), vec![b, c, a]);
    }

    #[test]
    fn test_move_and_missing_id() {
        let mut store = ObjectStore::new();
        let a = store.add(boxed("a", 0.0, 0.0));
        store.move_to(a, 42.0, -7.0);
        store.move_to(Uuid::new_v4(), 1.0, 1.0);

        let moved = store.get(a).unwrap();
        assert!((moved.x - 42.0).abs() < f64::EPSILON);
        assert!((moved.y - -7.0).abs() < f64::EPSILON);
        assert!((moved.w - 260.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_clamps() {
        let mut store = ObjectStore::new();
        let a = store.add(boxed("a", 0.0, 0.0));

        store.resize(a, 5.0, 5.0);
        let b = store.get(a).unwrap();
        assert!((b.w - MIN_WIDTH).abs() < f64::EPSILON);
        assert!((b.h - MIN_HEIGHT).abs() < f64::EPSILON);

        store.resize(a, 9000.0, 9000.0);
        let b = store.get(a).unwrap();
        assert!((b.w - MAX_WIDTH).abs() < f64::EPSILON);
        assert!((b.h - MAX_HEIGHT).abs() < f64::EPSILON);
    }

    #[test]
    fn test_update_text_verbatim() {
        let mut store = ObjectStore::new();
        let a = store.add(boxed("a", 0.0, 0.0));
        let long = "x".repeat(10_000);
        store.update_text(a, long.clone());
        assert_eq!(store.get(a).unwrap().text, long);
    }

    #[test]
    fn test_remove() {
        let mut store = ObjectStore::new();
        let a = store.add(boxed("a", 0.0, 0.0));
        assert!(store.remove(a).is_some());
        assert!(store.remove(a).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_duplicate_twice() {
        let mut store = ObjectStore::new();
        let a = store.add(boxed("a", 100.0, 200.0));
        let offset = Vec2::new(24.0, 24.0);

        let d1 = store.duplicate(a, offset).unwrap();
        let d2 = store.duplicate(a, offset).unwrap();
        assert_ne!(d1, d2);
        assert_ne!(d1, a);
        assert_eq!(store.ids(), vec![a, d1, d2]);

        for id in [d1, d2] {
            let d = store.get(id).unwrap();
            assert!((d.x - 124.0).abs() < f64::EPSILON);
            assert!((d.y - 224.0).abs() < f64::EPSILON);
        }
        let original = store.get(a).unwrap();
        assert!((original.x - 100.0).abs() < f64::EPSILON);

        assert!(store.duplicate(Uuid::new_v4(), offset).is_none());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_hit_test_prefers_front() {
        let mut store = ObjectStore::new();
        let back = store.add(boxed("back", 0.0, 0.0));
        let front = store.add(boxed("front", 100.0, 50.0));

        assert_eq!(store.hit_test(Point::new(150.0, 100.0)), Some((front, BoxRegion::Body)));
        assert_eq!(store.hit_test(Point::new(20.0, 10.0)), Some((back, BoxRegion::Header)));
        assert_eq!(store.hit_test(Point::new(-5.0, -5.0)), None);
    }

    #[test]
    fn test_bounds_empty_is_none() {
        let mut store = ObjectStore::new();
        assert!(store.bounds().is_none());
        store.add(boxed("a", 10.0, 20.0));
        assert_eq!(store.bounds(), Some(Rect::new(10.0, 20.0, 270.0, 160.0)));
    }
}

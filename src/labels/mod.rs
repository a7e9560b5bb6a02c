//! Capital-city labels: world anchors, per-frame visibility and screen
//! placement, and the exclusive selection.

pub mod occlusion;

use glam::{Mat4, Vec2, Vec3};

use self::occlusion::Occluder;
use crate::camera::Camera;
use crate::geo::City;

/// One label anchored on the globe.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Display text.
    pub name: String,
    /// Anchor in the globe's local space.
    pub anchor: Vec3,
    /// Anchor after the globe's model transform, as of the last update.
    pub world: Vec3,
    /// Whether the globe leaves the label in line of sight.
    pub visible: bool,
    /// Whether this is the selected label.
    pub selected: bool,
    /// Pixel position (origin top-left), `None` when behind the camera.
    pub screen: Option<Vec2>,
}

impl Label {
    /// Unplaced label at `anchor`.
    #[must_use]
    pub fn new(name: impl Into<String>, anchor: Vec3) -> Self {
        Self {
            name: name.into(),
            anchor,
            world: anchor,
            visible: true,
            selected: false,
            screen: None,
        }
    }

    /// Whether the label should be drawn this frame.
    #[must_use]
    pub fn is_shown(&self) -> bool {
        self.visible && self.screen.is_some()
    }

    /// Overlay position in CSS pixels for a device pixel ratio of `dpr`,
    /// `None` while the label is hidden. Selection is tracked independently
    /// so a hidden label can still lose or gain it.
    #[must_use]
    pub fn overlay_offset(&self, dpr: f32) -> Option<Vec2> {
        if !self.visible {
            return None;
        }
        self.screen.map(|p| p / dpr.max(f32::EPSILON))
    }
}

/// All labels of a scene with at most one selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelSet {
    labels: Vec<Label>,
    selected: Option<usize>,
}

impl LabelSet {
    /// One label per city, anchored on a globe of `radius`.
    #[must_use]
    pub fn from_cities(cities: &[City], radius: f32) -> Self {
        let labels = cities
            .iter()
            .map(|city| Label::new(city.name.clone(), city.position(radius)))
            .collect();
        Self {
            labels,
            selected: None,
        }
    }

    /// Refresh world positions, visibility and screen positions.
    pub fn update(
        &mut self,
        model: Mat4,
        camera: &Camera,
        viewport: (u32, u32),
        occluder: &impl Occluder,
    ) {
        let (width, height) = (viewport.0 as f32, viewport.1 as f32);
        let eye = camera.eye;
        for label in &mut self.labels {
            label.world = model.transform_point3(label.anchor);
            label.visible = !occluder.occludes(eye, label.world);
            label.screen = camera.project_to_screen(label.world, width, height);
        }
    }

    /// Make `index` the only selected label. Out-of-range indices are
    /// ignored and leave the selection unchanged.
    pub fn select(&mut self, index: usize) -> Option<&Label> {
        if index >= self.labels.len() {
            return None;
        }
        for (i, label) in self.labels.iter_mut().enumerate() {
            label.selected = i == index;
        }
        self.selected = Some(index);
        self.labels.get(index)
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        for label in &mut self.labels {
            label.selected = false;
        }
        self.selected = None;
    }

    /// Index of the selected label.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Nearest shown label within `radius_px` of `screen_pos`.
    #[must_use]
    pub fn pick(&self, screen_pos: Vec2, radius_px: f32) -> Option<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, label)| label.visible)
            .filter_map(|(i, label)| {
                label.screen.map(|p| (i, p.distance_squared(screen_pos)))
            })
            .filter(|&(_, d2)| d2 <= radius_px * radius_px)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Label at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Label> {
        self.labels.get(index)
    }

    /// All labels in catalog order.
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether there are no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::occlusion::SphereOccluder;
    use super::*;

    fn camera() -> Camera {
        Camera {
            eye: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.0,
            fovy: 60.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }

    fn cities() -> Vec<City> {
        vec![
            // lon -90 faces +Z, lon 90 faces -Z
            City::new("Front", 0.0, -90.0),
            City::new("Back", 0.0, 90.0),
            City::new("North", 60.0, -90.0),
        ]
    }

    fn updated_set() -> LabelSet {
        let mut set = LabelSet::from_cities(&cities(), 1.0);
        let globe = SphereOccluder { center: Vec3::ZERO, radius: 1.0 };
        set.update(Mat4::IDENTITY, &camera(), (800, 800), &globe);
        set
    }

    #[test]
    fn front_label_visible_back_label_hidden() {
        let set = updated_set();
        assert!(set.get(0).unwrap().visible);
        assert!(!set.get(1).unwrap().visible);
        assert!(set.get(2).unwrap().visible);
    }

    #[test]
    fn front_label_projects_to_centre() {
        let set = updated_set();
        let p = set.get(0).unwrap().screen.unwrap();
        assert!((p - Vec2::new(400.0, 400.0)).length() < 0.5);
    }

    #[test]
    fn model_transform_moves_labels() {
        let mut set = LabelSet::from_cities(&cities(), 1.0);
        let model = Mat4::from_rotation_y(std::f32::consts::PI);
        let globe = SphereOccluder::from_model(model, 1.0);
        set.update(model, &camera(), (800, 800), &globe);
        assert!(!set.get(0).unwrap().visible);
        assert!(set.get(1).unwrap().visible);
    }

    #[test]
    fn selection_is_exclusive() {
        let mut set = updated_set();
        for index in [0, 2, 1, 2] {
            let _ = set.select(index);
            let selected: Vec<_> = set
                .labels()
                .iter()
                .enumerate()
                .filter(|(_, l)| l.selected)
                .map(|(i, _)| i)
                .collect();
            assert_eq!(selected, vec![index]);
            assert_eq!(set.selected(), Some(index));
        }
        assert!(set.select(99).is_none());
        assert_eq!(set.selected(), Some(2));

        set.clear_selection();
        assert!(set.labels().iter().all(|l| !l.selected));
        assert_eq!(set.selected(), None);
    }

    #[test]
    fn hidden_label_loses_selection_and_overlay() {
        let mut set = updated_set();
        let _ = set.select(0);

        // Turn the globe so label 0 goes behind it, then select another.
        let model = Mat4::from_rotation_y(std::f32::consts::PI);
        let globe = SphereOccluder::from_model(model, 1.0);
        set.update(model, &camera(), (800, 800), &globe);
        let _ = set.select(1);

        let front = set.get(0).unwrap();
        assert_eq!(front.overlay_offset(2.0), None);
        assert!(!front.selected);
        let marked: Vec<_> = set.labels().iter().filter(|l| l.selected).collect();
        assert_eq!(marked.len(), 1);

        set.clear_selection();
        assert!(!set.get(0).unwrap().selected);
    }

    #[test]
    fn overlay_offset_is_in_css_pixels() {
        let set = updated_set();
        let front = set.get(0).unwrap();
        let css = front.overlay_offset(2.0).unwrap();
        assert!((css - front.screen.unwrap() / 2.0).length() < 1e-4);
        assert_eq!(set.get(1).unwrap().overlay_offset(1.0), None);
    }

    #[test]
    fn pick_finds_nearest_visible_label() {
        let set = updated_set();
        let front = set.get(0).unwrap().screen.unwrap();
        assert_eq!(set.pick(front + Vec2::new(3.0, 0.0), 10.0), Some(0));
        assert_eq!(set.pick(Vec2::new(5.0, 5.0), 10.0), None);
    }

    #[test]
    fn pick_skips_hidden_labels() {
        let set = updated_set();
        let back = set.get(1).unwrap();
        assert!(!back.visible);
        if let Some(p) = back.screen {
            assert_ne!(set.pick(p, 0.5), Some(1));
        }
    }
}

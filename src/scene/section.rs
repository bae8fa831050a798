//! Section tags and the single lookup table mapping them to a target shape,
//! camera pose, point size and motion.

use glam::{vec3, Vec3};
use log::warn;

use crate::shapes::{glyphs::ICON_COUNT, logos::BRAND_COUNT};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Section {
    Hero,
    Terrain,
    Sphere,
    Craft,
    Stars,
    Experience,
    Contact,
}

/// How section indices are laid out on the page.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Layout {
    /// Hero, terrain, sphere, craft, contact (satellite).
    Classic,
    /// Hero, terrain, sphere, craft, stars, experience, contact (logos).
    Extended,
}

impl Layout {
    pub fn sections(self) -> &'static [Section] {
        use Section::*;
        match self {
            Layout::Classic => &[Hero, Terrain, Sphere, Craft, Contact],
            Layout::Extended => &[Hero, Terrain, Sphere, Craft, Stars, Experience, Contact],
        }
    }

    pub fn section_count(self) -> usize {
        self.sections().len()
    }

    /// Unknown indices fall back to the hero section.
    pub fn section(self, index: i32) -> Section {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.sections().get(i).copied())
            .unwrap_or_else(|| {
                warn!("Section index {} out of range for {:?}", index, self);
                Section::Hero
            })
    }
}

/// Which precomputed shape a pose targets.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShapeKey {
    Text,
    Mountains,
    Sphere,
    Spacecraft,
    Satellite,
    Stars,
    Icon(usize),
    Brand(usize),
    AllLogos,
}

/// Rigid motion applied to the whole cloud every frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Motion {
    Still,
    Spin { y: f32 },
    Treadmill { speed: f32 },
    Drift { x: f32, y: f32 },
    Tilted { tilt: f32, y: f32 },
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SectionPose {
    pub shape: ShapeKey,
    pub camera: Vec3,
    /// Jump the camera instead of tweening it.
    pub snap: bool,
    pub particle_size: f32,
    pub dust_visible: bool,
    pub motion: Motion,
}

const GENERIC_SPIN: Motion = Motion::Spin { y: 0.002 };

const ICON_CAMERAS: [Vec3; ICON_COUNT] = [
    glam::const_vec3!([0.0, 0.0, 16.0]),
    glam::const_vec3!([2.0, 1.0, 14.0]),
    glam::const_vec3!([-2.0, 0.0, 13.0]),
    glam::const_vec3!([0.0, 3.0, 12.0]),
    glam::const_vec3!([0.0, -1.0, 15.0]),
];

/// Resolves the pose for `section` and its optional selectors.
///
/// Selectors out of range fall back to entry 0.
pub fn pose(
    section: Section,
    layout: Layout,
    selected_experience: Option<i32>,
    selected_social: Option<i32>,
) -> SectionPose {
    match section {
        Section::Hero => SectionPose {
            shape: ShapeKey::Text,
            camera: vec3(0.0, 0.0, 20.0),
            snap: false,
            particle_size: 0.09,
            dust_visible: false,
            motion: Motion::Still,
        },
        Section::Terrain => SectionPose {
            shape: ShapeKey::Mountains,
            camera: vec3(0.0, 5.0, 18.0),
            snap: false,
            particle_size: 0.11,
            dust_visible: false,
            motion: Motion::Treadmill { speed: 0.05 },
        },
        Section::Sphere => SectionPose {
            shape: ShapeKey::Sphere,
            camera: vec3(0.0, 0.0, 10.0),
            snap: false,
            particle_size: 0.07,
            dust_visible: false,
            motion: GENERIC_SPIN,
        },
        Section::Craft => SectionPose {
            shape: ShapeKey::Spacecraft,
            camera: vec3(-8.0, 1.0, 18.0),
            snap: false,
            particle_size: 0.08,
            dust_visible: false,
            motion: GENERIC_SPIN,
        },
        Section::Stars => SectionPose {
            shape: ShapeKey::Stars,
            camera: vec3(0.0, 0.0, 24.0),
            snap: false,
            particle_size: 0.06,
            dust_visible: true,
            motion: Motion::Drift { x: 0.0003, y: 0.0007 },
        },
        Section::Experience => {
            let entity = selector(selected_experience, ICON_COUNT, "experience");
            SectionPose {
                shape: ShapeKey::Icon(entity),
                camera: ICON_CAMERAS[entity],
                snap: true,
                particle_size: 0.09,
                dust_visible: false,
                motion: GENERIC_SPIN,
            }
        }
        Section::Contact => {
            let social = selected_social.map(|s| selector(Some(s), BRAND_COUNT, "social"));
            match (layout, social) {
                (_, Some(brand)) => SectionPose {
                    shape: ShapeKey::Brand(brand),
                    camera: vec3(0.0, 0.0, 14.0),
                    snap: false,
                    particle_size: 0.08,
                    dust_visible: false,
                    motion: GENERIC_SPIN,
                },
                (Layout::Classic, None) => SectionPose {
                    shape: ShapeKey::Satellite,
                    camera: vec3(0.0, 0.0, 12.0),
                    snap: false,
                    particle_size: 0.08,
                    dust_visible: false,
                    motion: Motion::Tilted { tilt: 0.35, y: 0.003 },
                },
                (Layout::Extended, None) => SectionPose {
                    shape: ShapeKey::AllLogos,
                    camera: vec3(0.0, 0.0, 16.0),
                    snap: false,
                    particle_size: 0.07,
                    dust_visible: false,
                    motion: GENERIC_SPIN,
                },
            }
        }
    }
}

fn selector(value: Option<i32>, len: usize, what: &str) -> usize {
    match value.map(usize::try_from) {
        None => 0,
        Some(Ok(i)) if i < len => i,
        Some(_) => {
            warn!("Selected {} {:?} out of range, using 0", what, value);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_the_documented_poses() {
        let l = Layout::Classic;
        assert_eq!(pose(Section::Hero, l, None, None).camera, vec3(0., 0., 20.));
        assert_eq!(pose(Section::Terrain, l, None, None).camera, vec3(0., 5., 18.));
        assert_eq!(pose(Section::Sphere, l, None, None).camera, vec3(0., 0., 10.));
        assert_eq!(pose(Section::Craft, l, None, None).camera, vec3(-8., 1., 18.));
        let contact = pose(Section::Contact, l, None, None);
        assert_eq!(contact.shape, ShapeKey::Satellite);
        assert_eq!(contact.camera, vec3(0., 0., 12.));
        assert!(!pose(Section::Hero, l, None, None).snap);
        assert!(pose(Section::Experience, l, Some(2), None).snap);
    }

    #[test]
    fn out_of_range_experience_falls_back_to_entity_zero() {
        let zero = pose(Section::Experience, Layout::Extended, Some(0), None);
        for bad in [-1, 5, 99, i32::MIN] {
            assert_eq!(pose(Section::Experience, Layout::Extended, Some(bad), None), zero);
        }
        assert_eq!(pose(Section::Experience, Layout::Extended, None, None), zero);
    }

    #[test]
    fn social_selector_overrides_contact_shape() {
        let p = pose(Section::Contact, Layout::Extended, None, Some(3));
        assert_eq!(p.shape, ShapeKey::Brand(3));
        let p = pose(Section::Contact, Layout::Extended, None, Some(7));
        assert_eq!(p.shape, ShapeKey::Brand(0));
    }

    #[test]
    fn only_stars_show_dust() {
        for &s in Layout::Extended.sections() {
            let p = pose(s, Layout::Extended, None, None);
            assert_eq!(p.dust_visible, s == Section::Stars);
        }
    }

    #[test]
    fn layouts_count_their_sections() {
        assert_eq!(Layout::Classic.section_count(), 5);
        assert_eq!(Layout::Extended.section_count(), 7);
    }

    #[test]
    fn bad_section_index_is_hero() {
        assert_eq!(Layout::Classic.section(-3), Section::Hero);
        assert_eq!(Layout::Classic.section(5), Section::Hero);
        assert_eq!(Layout::Extended.section(5), Section::Experience);
    }
}

use std::time::Duration;

use glam::{EulerRot, Quat, Vec3};
use log::{debug, info};
use rand_pcg::Pcg64Mcg;

use super::{
    cloud,
    section::{pose, Layout, Motion, Section, SectionPose, ShapeKey},
};
use crate::{
    entity::{Camera, PointLayer, Transform},
    shapes::{random, stars, terrain, text::Rasterizer, PointCloud, ShapeLibrary},
    window::Size,
};

const FOV: f32 = 75.0;
const DUST_COUNT: usize = 1500;
/// Time the dropping particles get before the text takes over.
const FALL_DELAY: Duration = Duration::from_millis(900);
/// How long the climb into the terrain counts as an entrance.
const RISE_DURATION: Duration = Duration::from_millis(2500);
const CAMERA_TWEEN: Duration = Duration::from_millis(1500);

/// Inputs from the hosting page.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct SceneInputs {
    pub current_section: i32,
    pub selected_experience: Option<i32>,
    pub selected_social: Option<i32>,
}

/// Short-lived sub-states of a section change.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Choreography {
    Settled,
    /// Leaving the terrain for the hero: particles drop, text follows at `text_at`.
    Falling { text_at: Duration },
    /// Entering the terrain from the hero: particles climb from below.
    Rising { until: Duration },
}

#[derive(Debug, Copy, Clone)]
struct CameraTween {
    from: Vec3,
    to: Vec3,
    start: Duration,
}

impl CameraTween {
    fn at(&self, now: Duration) -> (Vec3, bool) {
        let t = (now.saturating_sub(self.start).as_secs_f32() / CAMERA_TWEEN.as_secs_f32()).min(1.0);
        let eased = if t < 0.5 {
            4.0 * t * t * t
        } else {
            1.0 - (-2.0 * t + 2.0).powi(3) * 0.5
        };
        (self.from.lerp(self.to, eased), t >= 1.0)
    }
}

/// Everything owned for one mount.
struct SceneContext {
    camera: Camera,
    current: PointCloud,
    target: PointCloud,
    dust: PointCloud,
    rotation: Vec3,
    scroll: f32,
    section: Section,
    previous: Option<Section>,
    pose: SectionPose,
    choreography: Choreography,
    tween: Option<CameraTween>,
}

pub struct ParticleScene {
    layout: Layout,
    library: ShapeLibrary,
    inputs: SceneInputs,
    context: Option<SceneContext>,
    disposed: bool,
    frames: u64,
    rng: Pcg64Mcg,
}

impl ParticleScene {
    pub fn new(layout: Layout, library: ShapeLibrary, inputs: SceneInputs) -> Self {
        Self {
            layout,
            library,
            inputs,
            context: None,
            disposed: true,
            frames: 0,
            rng: random::entropy(),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.context.is_some()
    }

    pub fn inputs(&self) -> SceneInputs {
        self.inputs
    }

    pub fn section(&self) -> Option<Section> {
        self.context.as_ref().map(|c| c.section)
    }

    /// Builds the scene for `viewport`. Without a viewport nothing happens and
    /// the next call tries again. Mounting twice rebuilds from scratch.
    pub fn mount(&mut self, viewport: Option<Size>) -> bool {
        let viewport = match viewport.filter(|v| !v.is_empty()) {
            Some(v) => v,
            None => {
                debug!("No viewport yet, particle scene not mounted");
                return false;
            }
        };
        if self.context.is_some() {
            self.unmount();
        }

        let section = self.layout.section(self.inputs.current_section);
        let pose = self.pose_for(section);
        let shape = self.shape(pose.shape).clone();

        self.context = Some(SceneContext {
            camera: Camera::new(FOV, viewport.aspect_ratio(), pose.camera),
            current: shape.clone(),
            target: shape,
            dust: stars::dust(DUST_COUNT),
            rotation: Vec3::ZERO,
            scroll: 0.0,
            section,
            previous: None,
            pose,
            choreography: Choreography::Settled,
            tween: None,
        });
        self.disposed = false;
        info!(
            "Particle scene mounted at {:?} with {} particles ({}x{})",
            section,
            self.library.count(),
            viewport.width,
            viewport.height
        );
        true
    }

    /// Cancels pending timers and drops every buffer. Safe to call in any state.
    pub fn unmount(&mut self) {
        self.disposed = true;
        if let Some(mut ctx) = self.context.take() {
            ctx.choreography = Choreography::Settled;
            ctx.tween = None;
            info!("Particle scene unmounted after {} frames", self.frames);
        }
    }

    pub fn resize(&mut self, size: Size) {
        if size.is_empty() {
            return;
        }
        if let Some(ctx) = self.context.as_mut() {
            ctx.camera.aspect_ratio = size.aspect_ratio();
        }
    }

    /// Swaps in the rasterized text the first time a surface is available.
    pub fn rasterize_text(&mut self, rasterizer: &dyn Rasterizer) {
        if !self.library.rasterize_text(rasterizer) {
            return;
        }
        if let Some(ctx) = self.context.as_mut() {
            if ctx.pose.shape == ShapeKey::Text && ctx.choreography == Choreography::Settled {
                ctx.target = self.library.text.clone();
            }
        }
    }

    /// Applies new page inputs. Unchanged inputs are ignored.
    pub fn set_inputs(&mut self, inputs: SceneInputs, now: Duration) {
        if inputs == self.inputs {
            return;
        }
        self.inputs = inputs;
        if self.context.is_some() {
            self.apply(now);
        }
    }

    fn apply(&mut self, now: Duration) {
        let next = self.layout.section(self.inputs.current_section);
        let pose = self.pose_for(next);
        let Some(ctx) = self.context.as_mut() else { return };

        let prev = ctx.section;
        if prev == next && pose == ctx.pose {
            return;
        }

        if prev != next {
            ctx.choreography = match (prev, next) {
                (Section::Terrain, Section::Hero) => {
                    ctx.target = cloud::fall_targets(&ctx.current, &mut self.rng);
                    Choreography::Falling {
                        text_at: now + FALL_DELAY,
                    }
                }
                (Section::Hero, Section::Terrain) => {
                    ctx.target = self.library.mountains.clone();
                    ctx.current = cloud::rise_from_below(&ctx.target, &mut self.rng);
                    Choreography::Rising {
                        until: now + RISE_DURATION,
                    }
                }
                _ => {
                    ctx.target = shape_of(&self.library, pose.shape).clone();
                    Choreography::Settled
                }
            };
        } else if pose.shape != ctx.pose.shape {
            // A selector moved within the section.
            ctx.target = shape_of(&self.library, pose.shape).clone();
            ctx.choreography = Choreography::Settled;
        }

        if prev != next || pose.camera != ctx.pose.camera {
            if pose.snap {
                ctx.camera.position = pose.camera;
                ctx.tween = None;
            } else {
                ctx.tween = Some(CameraTween {
                    from: ctx.camera.position,
                    to: pose.camera,
                    start: now,
                });
            }
        }

        if prev != next {
            debug!("Leaving {:?}, entered from {:?}", prev, ctx.previous);
            ctx.previous = Some(prev);
        }
        ctx.section = next;
        ctx.pose = pose;
        debug!(
            "Section {:?} -> {:?}: {:?}, camera {:?}, {:?}",
            prev, next, pose.shape, pose.camera, ctx.choreography
        );
    }

    /// One animation step: timers, easing, section motion. Returns what to draw.
    pub fn frame(&mut self, now: Duration) -> Option<PointLayer<'_>> {
        if self.disposed {
            return None;
        }
        let ctx = self.context.as_mut()?;
        self.frames += 1;

        match ctx.choreography {
            Choreography::Falling { text_at } if now >= text_at => {
                ctx.target = self.library.text.clone();
                ctx.choreography = Choreography::Settled;
                debug!("Fall finished, showing text");
            }
            Choreography::Rising { until } if now >= until => {
                ctx.choreography = Choreography::Settled;
            }
            _ => (),
        }

        if let Some(tween) = ctx.tween {
            let (position, done) = tween.at(now);
            ctx.camera.position = position;
            if done {
                ctx.camera.position = tween.to;
                ctx.tween = None;
            }
        }

        cloud::ease(ctx.current.as_mut_slice(), &ctx.target, cloud::EASING);

        match ctx.pose.motion {
            Motion::Still => ctx.rotation = Vec3::ZERO,
            Motion::Spin { y } => ctx.rotation.y += y,
            Motion::Treadmill { speed } => {
                ctx.rotation = Vec3::ZERO;
                ctx.scroll = cloud::advance_scroll(ctx.scroll, speed, terrain::HALF_DEPTH);
                cloud::treadmill(
                    ctx.current.as_mut_slice(),
                    &self.library.mountains,
                    ctx.scroll,
                    terrain::HALF_DEPTH,
                );
            }
            Motion::Drift { x, y } => {
                ctx.rotation.x += x;
                ctx.rotation.y += y;
            }
            Motion::Tilted { tilt, y } => {
                ctx.rotation.x = tilt;
                ctx.rotation.y += y;
            }
        }

        let ctx = &*ctx;
        Some(PointLayer {
            camera: ctx.camera,
            transform: Transform {
                rotation: Quat::from_euler(EulerRot::XYZ, ctx.rotation.x, ctx.rotation.y, ctx.rotation.z),
                ..Default::default()
            },
            positions: &ctx.current,
            particle_size: ctx.pose.particle_size,
            dust: ctx.pose.dust_visible.then(|| &ctx.dust[..]),
        })
    }

    fn pose_for(&self, section: Section) -> SectionPose {
        pose(
            section,
            self.layout,
            self.inputs.selected_experience,
            self.inputs.selected_social,
        )
    }

    fn shape(&self, key: ShapeKey) -> &PointCloud {
        shape_of(&self.library, key)
    }
}

fn shape_of(library: &ShapeLibrary, key: ShapeKey) -> &PointCloud {
    match key {
        ShapeKey::Text => &library.text,
        ShapeKey::Mountains => &library.mountains,
        ShapeKey::Sphere => &library.sphere,
        ShapeKey::Spacecraft => &library.spacecraft,
        ShapeKey::Satellite => &library.satellite,
        ShapeKey::Stars => &library.stars,
        ShapeKey::Icon(i) => &library.icons[i],
        ShapeKey::Brand(i) => &library.brands[i],
        ShapeKey::AllLogos => &library.all_logos,
    }
}

#[cfg(test)]
impl ParticleScene {
    fn frames(&self) -> u64 {
        self.frames
    }

    fn choreography(&self) -> Option<Choreography> {
        self.context.as_ref().map(|c| c.choreography)
    }

    fn current(&self) -> Option<&PointCloud> {
        self.context.as_ref().map(|c| &c.current)
    }

    fn target(&self) -> Option<&PointCloud> {
        self.context.as_ref().map(|c| &c.target)
    }

    fn previous(&self) -> Option<Section> {
        self.context.as_ref().and_then(|c| c.previous)
    }

    fn camera(&self) -> Option<Camera> {
        self.context.as_ref().map(|c| c.camera)
    }

    fn scroll(&self) -> Option<f32> {
        self.context.as_ref().map(|c| c.scroll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size {
        width: 800,
        height: 600,
    };

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn at(section: i32) -> SceneInputs {
        SceneInputs {
            current_section: section,
            ..Default::default()
        }
    }

    fn mounted(layout: Layout, section: i32) -> ParticleScene {
        let mut scene = ParticleScene::new(layout, ShapeLibrary::new(300, "HI"), at(section));
        assert!(scene.mount(Some(VIEWPORT)));
        scene
    }

    #[test]
    fn mount_without_viewport_is_a_noop_and_retries() {
        let mut scene = ParticleScene::new(Layout::Classic, ShapeLibrary::new(50, "HI"), at(0));
        assert!(!scene.mount(None));
        assert!(!scene.mount(Some(Size::default())));
        assert!(scene.frame(ms(0)).is_none());
        assert_eq!(scene.frames(), 0);
        assert!(scene.mount(Some(VIEWPORT)));
        assert!(scene.frame(ms(16)).is_some());
    }

    #[test]
    fn buffers_keep_their_length_through_every_section() {
        let mut scene = mounted(Layout::Extended, 0);
        let mut now = 0;
        for section in [1, 0, 1, 2, 3, 4, 5, 6, 1, 0] {
            now += 2000;
            scene.set_inputs(at(section), ms(now));
            for _ in 0..3 {
                now += 16;
                let layer = scene.frame(ms(now)).unwrap();
                assert_eq!(layer.positions.len(), 900);
            }
            assert_eq!(scene.current().unwrap().len(), 900);
            assert_eq!(scene.target().unwrap().len(), 900);
        }
    }

    #[test]
    fn leaving_terrain_for_hero_falls_before_showing_text() {
        let mut scene = mounted(Layout::Classic, 1);
        scene.rasterize_text(&crate::shapes::text::BitmapCanvas::default());
        scene.frame(ms(16));

        scene.set_inputs(at(0), ms(1000));
        assert!(matches!(scene.choreography(), Some(Choreography::Falling { .. })));
        let current = scene.current().unwrap().clone();
        let target = scene.target().unwrap().clone();
        for i in 0..current.count() {
            assert_eq!(target.point(i).x, current.point(i).x);
            assert_eq!(target.point(i).z, current.point(i).z);
            assert!(target.point(i).y < -10.0);
        }

        scene.frame(ms(1000 + FALL_DELAY.as_millis() as u64 - 1));
        assert_ne!(scene.target().unwrap(), &scene.library.text);
        scene.frame(ms(1000 + FALL_DELAY.as_millis() as u64));
        assert_eq!(scene.target().unwrap(), &scene.library.text);
        assert_eq!(scene.choreography(), Some(Choreography::Settled));
        assert_eq!(scene.previous(), Some(Section::Terrain));
    }

    #[test]
    fn selector_change_during_the_fall_keeps_the_fall() {
        let mut scene = mounted(Layout::Classic, 1);
        scene.rasterize_text(&crate::shapes::text::BitmapCanvas::default());
        scene.set_inputs(at(0), ms(1000));
        let falling = scene.choreography();
        let fall = scene.target().unwrap().clone();
        let tween = scene.context.as_ref().unwrap().tween.map(|t| t.start);

        scene.set_inputs(
            SceneInputs {
                current_section: 0,
                selected_experience: Some(2),
                selected_social: None,
            },
            ms(1100),
        );
        assert_eq!(scene.choreography(), falling);
        assert!(matches!(falling, Some(Choreography::Falling { .. })));
        assert_eq!(scene.target().unwrap(), &fall);
        assert_eq!(scene.context.as_ref().unwrap().tween.map(|t| t.start), tween);

        scene.frame(ms(1000) + FALL_DELAY);
        assert_eq!(scene.target().unwrap(), &scene.library.text);
    }

    #[test]
    fn selector_change_within_experience_retargets() {
        let mut scene = mounted(Layout::Extended, 5);
        assert_eq!(scene.target().unwrap(), &scene.library.icons[0]);
        scene.set_inputs(
            SceneInputs {
                current_section: 5,
                selected_experience: Some(3),
                selected_social: None,
            },
            ms(100),
        );
        assert_eq!(scene.target().unwrap(), &scene.library.icons[3]);
        let expected = pose(Section::Experience, Layout::Extended, Some(3), None).camera;
        assert_eq!(scene.camera().unwrap().position, expected);
    }

    #[test]
    fn moving_on_before_the_fall_ends_cancels_the_text() {
        let mut scene = mounted(Layout::Classic, 1);
        scene.set_inputs(at(0), ms(0));
        scene.set_inputs(at(2), ms(100));
        scene.frame(ms(5000));
        assert_eq!(scene.target().unwrap(), &scene.library.sphere);
    }

    #[test]
    fn entering_terrain_from_hero_climbs_from_below() {
        let mut scene = mounted(Layout::Classic, 0);
        scene.set_inputs(at(1), ms(0));
        assert!(matches!(scene.choreography(), Some(Choreography::Rising { .. })));
        let current = scene.current().unwrap();
        let target = scene.target().unwrap();
        assert_eq!(target, &scene.library.mountains);
        for i in 0..current.count() {
            assert!(current.point(i).y < target.point(i).y - 10.0);
        }
        scene.frame(RISE_DURATION);
        assert_eq!(scene.choreography(), Some(Choreography::Settled));
    }

    #[test]
    fn other_transitions_replace_the_target_only() {
        let mut scene = mounted(Layout::Classic, 2);
        scene.frame(ms(16));
        let before = scene.current().unwrap().clone();
        scene.set_inputs(at(3), ms(20));
        assert_eq!(scene.current().unwrap(), &before);
        assert_eq!(scene.target().unwrap(), &scene.library.spacecraft);
    }

    #[test]
    fn terrain_scroll_wraps_and_overrides_z() {
        let mut scene = mounted(Layout::Classic, 1);
        let mut now = 0;
        let mut wrapped = false;
        let mut last = 0.0;
        for _ in 0..1000 {
            now += 16;
            scene.frame(ms(now));
            let scroll = scene.scroll().unwrap();
            assert!(scroll > -terrain::HALF_DEPTH && scroll <= terrain::HALF_DEPTH);
            if scroll < last {
                wrapped = true;
                assert!((last + 0.05 - 2.0 * terrain::HALF_DEPTH - scroll).abs() < 1e-3);
            }
            last = scroll;
        }
        assert!(wrapped);
        let current = scene.current().unwrap();
        let base = &scene.library.mountains;
        for i in 0..current.count() {
            let z = cloud::wrap(base.point(i).z + last, terrain::HALF_DEPTH);
            assert!((current.point(i).z - z).abs() < 1e-4);
        }
    }

    #[test]
    fn experience_camera_snaps_and_others_ease() {
        let mut scene = mounted(Layout::Extended, 0);
        let experience = SceneInputs {
            current_section: 5,
            selected_experience: Some(2),
            selected_social: None,
        };
        scene.set_inputs(experience, ms(0));
        let expected = pose(Section::Experience, Layout::Extended, Some(2), None).camera;
        assert_eq!(scene.camera().unwrap().position, expected);

        scene.set_inputs(at(2), ms(0));
        scene.frame(ms(16));
        assert_ne!(scene.camera().unwrap().position, Vec3::new(0., 0., 10.));
        scene.frame(CAMERA_TWEEN + ms(1));
        assert_eq!(scene.camera().unwrap().position, Vec3::new(0., 0., 10.));
    }

    #[test]
    fn out_of_range_experience_uses_entity_zero() {
        let mut scene = mounted(Layout::Extended, 0);
        scene.set_inputs(
            SceneInputs {
                current_section: 5,
                selected_experience: Some(-4),
                selected_social: None,
            },
            ms(0),
        );
        assert_eq!(scene.target().unwrap(), &scene.library.icons[0]);
        assert_eq!(scene.camera().unwrap().position, ICON_ZERO_CAMERA);
    }

    const ICON_ZERO_CAMERA: Vec3 = glam::const_vec3!([0.0, 0.0, 16.0]);

    #[test]
    fn dust_and_size_follow_the_section() {
        let mut scene = mounted(Layout::Extended, 3);
        let layer = scene.frame(ms(16)).unwrap();
        assert!(layer.dust.is_none());
        assert_eq!(layer.particle_size, 0.08);
        scene.set_inputs(at(4), ms(32));
        let layer = scene.frame(ms(48)).unwrap();
        assert_eq!(layer.dust.map(|d| d.len()), Some(DUST_COUNT * 3));
        assert_eq!(layer.particle_size, 0.06);
    }

    #[test]
    fn resize_updates_aspect_without_touching_buffers() {
        let mut scene = mounted(Layout::Classic, 2);
        let before = scene.current().unwrap().clone();
        scene.resize(Size {
            width: 1000,
            height: 500,
        });
        assert_eq!(scene.camera().unwrap().aspect_ratio, 2.0);
        assert_eq!(scene.current().unwrap(), &before);
    }

    #[test]
    fn unmounted_scene_ignores_frames() {
        let mut scene = mounted(Layout::Classic, 1);
        scene.set_inputs(at(0), ms(0));
        scene.frame(ms(16));
        let frames = scene.frames();
        scene.unmount();
        assert!(scene.frame(FALL_DELAY * 2).is_none());
        assert_eq!(scene.frames(), frames);
        assert!(!scene.is_mounted());
        scene.unmount();
        assert!(scene.mount(Some(VIEWPORT)));
        assert_eq!(scene.section(), Some(Section::Hero));
    }
}

use log::info;

use super::{
    craft, glyphs, logos, satellite, sphere, stars, terrain,
    text::{self, Rasterizer},
    PointCloud,
};

/// Every target a scene may ask for, generated once for a fixed particle count.
#[derive(Debug, Clone)]
pub struct ShapeLibrary {
    count: usize,
    text_source: String,
    text_rasterized: bool,
    pub text: PointCloud,
    pub mountains: PointCloud,
    pub sphere: PointCloud,
    pub spacecraft: PointCloud,
    pub satellite: PointCloud,
    pub stars: PointCloud,
    pub icons: Vec<PointCloud>,
    pub brands: Vec<PointCloud>,
    pub all_logos: PointCloud,
}

impl ShapeLibrary {
    /// Text stays zeroed until [`ShapeLibrary::rasterize_text`] gets a surface.
    pub fn new(count: usize, text_source: &str) -> Self {
        let library = Self {
            count,
            text_source: text_source.to_owned(),
            text_rasterized: false,
            text: text::text(text_source, count, None),
            mountains: terrain::mountains(count),
            sphere: sphere::sphere(count),
            spacecraft: craft::spacecraft(count),
            satellite: satellite::satellite(count),
            stars: stars::stars(count),
            icons: (0..glyphs::ICON_COUNT).map(|e| glyphs::icon(e, count)).collect(),
            brands: (0..logos::BRAND_COUNT).map(|b| logos::brand(b, count)).collect(),
            all_logos: logos::all_logos(count),
        };
        info!("Generated shape library for {} particles", count);
        library
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Regenerates the text shape once; later calls are ignored.
    pub fn rasterize_text(&mut self, rasterizer: &dyn Rasterizer) -> bool {
        if self.text_rasterized {
            return false;
        }
        self.text = text::text(&self.text_source, self.count, Some(rasterizer));
        self.text_rasterized = true;
        info!("Rasterized text shape {:?}", self.text_source);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::text::BitmapCanvas;

    fn all(lib: &ShapeLibrary) -> Vec<&PointCloud> {
        let mut shapes = vec![
            &lib.text,
            &lib.mountains,
            &lib.sphere,
            &lib.spacecraft,
            &lib.satellite,
            &lib.stars,
            &lib.all_logos,
        ];
        shapes.extend(lib.icons.iter());
        shapes.extend(lib.brands.iter());
        shapes
    }

    #[test]
    fn every_shape_has_three_finite_floats_per_particle() {
        for count in [0, 1, 2, 5, 7, 64, 999, 4000] {
            let mut lib = ShapeLibrary::new(count, "HELLO\nWORLD");
            lib.rasterize_text(&BitmapCanvas::default());
            for shape in all(&lib) {
                assert_eq!(shape.len(), count * 3);
                assert!(shape.is_finite());
            }
        }
    }

    #[test]
    fn seeded_shapes_are_bit_identical_across_runs() {
        let a = ShapeLibrary::new(1500, "A");
        let b = ShapeLibrary::new(1500, "A");
        let bits = |c: &PointCloud| c.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a.mountains), bits(&b.mountains));
        assert_eq!(bits(&a.sphere), bits(&b.sphere));
        assert_eq!(bits(&a.satellite), bits(&b.satellite));
        assert_eq!(bits(&a.stars), bits(&b.stars));
        assert_eq!(bits(&a.all_logos), bits(&b.all_logos));
        for e in 0..glyphs::ICON_COUNT {
            assert_eq!(bits(&a.icons[e]), bits(&b.icons[e]));
        }
    }

    #[test]
    fn text_is_rasterized_once() {
        let mut lib = ShapeLibrary::new(100, "HI");
        assert!(lib.text.iter().all(|v| *v == 0.0));
        assert!(lib.rasterize_text(&BitmapCanvas::default()));
        assert!(lib.text.iter().any(|v| *v != 0.0));
        assert!(!lib.rasterize_text(&BitmapCanvas { scale: 2 }));
    }
}

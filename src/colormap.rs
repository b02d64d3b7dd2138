//! Color maps
//!
//! Sequential palettes used to paint the heatmap cells and the colorbar.
//! [Colormap::Hot] is the default; the other maps come from [colorous].

use strum_macros::{Display, EnumIter, EnumString};

/// `hot` segment breakpoints: red saturates at the first, green at the second
const HOT_RED_END: f64 = 0.365079;
const HOT_GREEN_END: f64 = 0.746032;
const HOT_RED_START: f64 = 0.0416;

/// Sequential color maps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Colormap {
    /// black → red → yellow → white
    #[default]
    Hot,
    Inferno,
    Magma,
    Plasma,
    Viridis,
    Cividis,
    Turbo,
    Cubehelix,
    Greys,
}
impl Colormap {
    /// Returns the RGB color at `t`, `t` is clamped to [0,1]
    pub fn eval(&self, t: f64) -> [u8; 3] {
        let t = if t.is_nan() { 0. } else { t.clamp(0., 1.) };
        let gradient = match self {
            Colormap::Hot => return hot(t),
            Colormap::Inferno => colorous::INFERNO,
            Colormap::Magma => colorous::MAGMA,
            Colormap::Plasma => colorous::PLASMA,
            Colormap::Viridis => colorous::VIRIDIS,
            Colormap::Cividis => colorous::CIVIDIS,
            Colormap::Turbo => colorous::TURBO,
            Colormap::Cubehelix => colorous::CUBEHELIX,
            Colormap::Greys => colorous::GREYS,
        };
        let color = gradient.eval_continuous(t);
        [color.r, color.g, color.b]
    }
}

fn ramp(t: f64, start: f64, end: f64) -> f64 {
    ((t - start) / (end - start)).clamp(0., 1.)
}
fn to_u8(x: f64) -> u8 {
    (x * 255.).round() as u8
}
fn hot(t: f64) -> [u8; 3] {
    let r = HOT_RED_START + (1. - HOT_RED_START) * ramp(t, 0., HOT_RED_END);
    let g = ramp(t, HOT_RED_END, HOT_GREEN_END);
    let b = ramp(t, HOT_GREEN_END, 1.);
    [to_u8(r), to_u8(g), to_u8(b)]
}

/// Linear mapping of the `[min,max]` range onto `[0,1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalize {
    pub min: f64,
    pub max: f64,
}
impl Normalize {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
    /// Scales `value` into `[0,1]`; a degenerate range maps everything to 0
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        let t = if span.is_finite() {
            (value - self.min) / span
        } else {
            // range wider than f64::MAX, work on halves
            (value / 2. - self.min / 2.) / (self.max / 2. - self.min / 2.)
        };
        if span > 0. {
            t.clamp(0., 1.)
        } else {
            0.
        }
    }
    /// Inverse of [Normalize::normalize]
    pub fn value(&self, t: f64) -> f64 {
        self.min * (1. - t) + self.max * t
    }
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}
impl From<Option<(f64, f64)>> for Normalize {
    fn from(minmax: Option<(f64, f64)>) -> Self {
        let (min, max) = minmax.unwrap_or((0., 0.));
        Self::new(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn luminance([r, g, b]: [u8; 3]) -> f64 {
        0.2126 * r as f64 + 0.7152 * g as f64 + 0.0722 * b as f64
    }

    #[test]
    fn hot_endpoints() {
        assert_eq!(Colormap::Hot.eval(0.), [11, 0, 0]);
        assert_eq!(Colormap::Hot.eval(HOT_RED_END), [255, 0, 0]);
        assert_eq!(Colormap::Hot.eval(HOT_GREEN_END), [255, 255, 0]);
        assert_eq!(Colormap::Hot.eval(1.), [255, 255, 255]);
    }

    #[test]
    fn hot_is_monotonic() {
        let mut previous = [0u8; 3];
        for i in 0..=100 {
            let color = Colormap::Hot.eval(i as f64 / 100.);
            assert!(color.iter().zip(previous.iter()).all(|(c, p)| c >= p));
            previous = color;
        }
    }

    #[test]
    fn clamped() {
        for cmap in Colormap::iter() {
            assert_eq!(cmap.eval(-1.), cmap.eval(0.));
            assert_eq!(cmap.eval(2.), cmap.eval(1.));
            assert_eq!(cmap.eval(f64::NAN), cmap.eval(0.));
        }
    }

    #[test]
    fn sequential_maps_get_lighter() {
        for cmap in Colormap::iter().filter(|c| *c != Colormap::Greys && *c != Colormap::Turbo) {
            assert!(
                luminance(cmap.eval(1.)) > luminance(cmap.eval(0.)),
                "{cmap}"
            );
        }
    }

    #[test]
    fn names() {
        assert_eq!(Colormap::default(), Colormap::Hot);
        assert_eq!("hot".parse::<Colormap>().unwrap(), Colormap::Hot);
        assert_eq!("Viridis".parse::<Colormap>().unwrap(), Colormap::Viridis);
        assert_eq!(Colormap::Cubehelix.to_string(), "cubehelix");
        assert!("jet".parse::<Colormap>().is_err());
    }

    #[test]
    fn normalize() {
        let norm = Normalize::new(1., 5.);
        assert_eq!(norm.normalize(1.), 0.);
        assert_eq!(norm.normalize(3.), 0.5);
        assert_eq!(norm.normalize(9.), 1.);
        assert_eq!(norm.value(0.25), 2.);
        assert_eq!(Normalize::new(2., 2.).normalize(2.), 0.);
        assert_eq!(Normalize::from(None), Normalize::new(0., 0.));
    }

    #[test]
    fn normalize_full_f64_range() {
        let norm = Normalize::new(-1e308, 1e308);
        let t: Vec<f64> = [-1e308, 0., 1e307, 1e308]
            .into_iter()
            .map(|x| norm.normalize(x))
            .collect();
        assert!(t.iter().all(|t| t.is_finite()), "{t:?}");
        assert_eq!(t[0], 0.);
        assert_eq!(t[1], 0.5);
        assert!(t[2] > t[1] && t[2] < t[3], "{t:?}");
        assert_eq!(t[3], 1.);
        assert_eq!(norm.value(0.), -1e308);
        assert_eq!(norm.value(1.), 1e308);
        assert!(norm.value(0.75).is_finite());
    }
}

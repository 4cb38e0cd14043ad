use serde::Serialize;

/// 8-bit RGB color.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const YELLOW: Rgb = Rgb([255, 255, 0]);
    pub const RED: Rgb = Rgb([255, 0, 0]);
    pub const WHITE: Rgb = Rgb([255, 255, 255]);
    pub const GREY: Rgb = Rgb([128, 128, 128]);

    /// Adds an alpha channel from an opacity in `[0, 1]`.
    pub fn with_opacity(self, opacity: f64) -> [u8; 4] {
        let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        [self.0[0], self.0[1], self.0[2], a]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScaleError {
    NonFiniteBoundary { index: usize },
    NotIncreasing { index: usize },
    RangeLength { expected: usize, got: usize },
}

impl std::fmt::Display for ScaleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleError::NonFiniteBoundary { index } => {
                write!(f, "threshold {index} is not a finite number")
            }
            ScaleError::NotIncreasing { index } => {
                write!(f, "threshold {index} is not greater than the one before it")
            }
            ScaleError::RangeLength { expected, got } => {
                write!(f, "expected {expected} range values, got {got}")
            }
        }
    }
}

impl std::error::Error for ScaleError {}

/// Piecewise-constant scale over ordered boundaries.
///
/// Bucket `i` covers `[domain[i-1], domain[i])`; values below the first
/// boundary land in bucket 0, values at or above the last in the final one.
/// NaN has no bucket and maps to the `unknown` value if one is set.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdScale<T> {
    domain: Vec<f64>,
    range: Vec<T>,
    unknown: Option<T>,
}

impl<T> ThresholdScale<T> {
    pub fn new(domain: Vec<f64>, range: Vec<T>) -> Result<Self, ScaleError> {
        for (index, b) in domain.iter().enumerate() {
            if !b.is_finite() {
                return Err(ScaleError::NonFiniteBoundary { index });
            }
            if index > 0 && *b <= domain[index - 1] {
                return Err(ScaleError::NotIncreasing { index });
            }
        }
        if range.len() != domain.len() + 1 {
            return Err(ScaleError::RangeLength {
                expected: domain.len() + 1,
                got: range.len(),
            });
        }
        Ok(Self {
            domain,
            range,
            unknown: None,
        })
    }

    pub fn with_unknown(mut self, unknown: T) -> Self {
        self.unknown = Some(unknown);
        self
    }

    pub fn domain(&self) -> &[f64] {
        &self.domain
    }

    pub fn range(&self) -> &[T] {
        &self.range
    }

    pub fn bucket(&self, x: f64) -> Option<usize> {
        if x.is_nan() {
            return None;
        }
        Some(self.domain.partition_point(|b| *b <= x))
    }

    pub fn scale(&self, x: f64) -> Option<&T> {
        match self.bucket(x) {
            Some(i) => self.range.get(i),
            None => self.unknown.as_ref(),
        }
    }
}

/// `y = x * factor`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LinearScale {
    pub factor: f64,
}

impl LinearScale {
    pub const fn new(factor: f64) -> Self {
        Self { factor }
    }

    pub fn scale(&self, x: f64) -> f64 {
        x * self.factor
    }
}

/// Construction-year colors and vacancy-driven heights for building footprints.
#[derive(Debug, Clone, PartialEq)]
pub struct ThematicStyler {
    colors: ThresholdScale<Rgb>,
    elevation: LinearScale,
}

impl ThematicStyler {
    pub const DEFAULT_YEAR_THRESHOLDS: [f64; 2] = [2000.0, 2020.0];
    pub const DEFAULT_COLORS: [Rgb; 3] = [Rgb::YELLOW, Rgb::RED, Rgb::WHITE];
    pub const DEFAULT_ELEVATION_FACTOR: f64 = 50.0;

    pub fn new(colors: ThresholdScale<Rgb>, elevation: LinearScale) -> Self {
        Self { colors, elevation }
    }

    pub fn from_parts(
        thresholds: Vec<f64>,
        colors: Vec<Rgb>,
        unknown: Rgb,
        elevation_factor: f64,
    ) -> Result<Self, ScaleError> {
        let colors = ThresholdScale::new(thresholds, colors)?.with_unknown(unknown);
        Ok(Self::new(colors, LinearScale::new(elevation_factor)))
    }

    pub fn color_for(&self, year_completed: f64) -> Rgb {
        self.colors
            .scale(year_completed)
            .copied()
            .unwrap_or(Rgb::GREY)
    }

    pub fn elevation_for(&self, vacancy_rate: f64) -> f64 {
        self.elevation.scale(vacancy_rate)
    }

    pub fn thresholds(&self) -> &ThresholdScale<Rgb> {
        &self.colors
    }
}

impl Default for ThematicStyler {
    fn default() -> Self {
        let colors = ThresholdScale {
            domain: Self::DEFAULT_YEAR_THRESHOLDS.to_vec(),
            range: Self::DEFAULT_COLORS.to_vec(),
            unknown: Some(Rgb::GREY),
        };
        Self::new(colors, LinearScale::new(Self::DEFAULT_ELEVATION_FACTOR))
    }
}

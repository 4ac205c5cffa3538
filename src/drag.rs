//! Drag coefficient tables and the Mach → Cd resolver
use once_cell::sync::Lazy;

use crate::error::BallisticsError;
use crate::DragModel;

/// Drag table data structure
///
/// Points are stored as `(mach, cd)` pairs in strictly increasing Mach order.
#[derive(Debug, Clone)]
pub struct DragTable {
    points: Vec<(f64, f64)>,
}

impl DragTable {
    /// Build a drag table from `(mach, cd)` pairs.
    ///
    /// The pairs must be finite, start at Mach 0 or below, reach Mach 5 or
    /// above, and be strictly increasing in Mach. Drag coefficients must be
    /// non-negative.
    pub fn new(points: Vec<(f64, f64)>) -> Result<Self, BallisticsError> {
        if points.len() < 2 {
            return Err(BallisticsError::InvalidDragTable(format!(
                "need at least 2 points, got {}",
                points.len()
            )));
        }

        for (i, &(mach, cd)) in points.iter().enumerate() {
            if !mach.is_finite() || !cd.is_finite() {
                return Err(BallisticsError::InvalidDragTable(format!(
                    "non-finite point at index {i}: ({mach}, {cd})"
                )));
            }
            if cd < 0.0 {
                return Err(BallisticsError::InvalidDragTable(format!(
                    "negative drag coefficient {cd} at Mach {mach}"
                )));
            }
        }

        if let Some(w) = points.windows(2).find(|w| w[1].0 <= w[0].0) {
            return Err(BallisticsError::InvalidDragTable(format!(
                "Mach values must be strictly increasing ({} then {})",
                w[0].0, w[1].0
            )));
        }

        let first = points[0].0;
        let last = points[points.len() - 1].0;
        if first > 0.0 || last < 5.0 {
            return Err(BallisticsError::InvalidDragTable(format!(
                "table must cover Mach 0 to 5, covers {first} to {last}"
            )));
        }

        Ok(Self { points })
    }

    /// Table points as `(mach, cd)` pairs
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Interpolate the drag coefficient for a Mach number.
    ///
    /// Values outside the table are clamped to the end points rather than
    /// extrapolated. An exact tabulated Mach returns the tabulated value, and
    /// a NaN Mach resolves to the first coefficient.
    pub fn interpolate(&self, mach: f64) -> f64 {
        let n = self.points.len();
        let (first_mach, first_cd) = self.points[0];
        let (last_mach, last_cd) = self.points[n - 1];

        if mach.is_nan() || mach <= first_mach {
            return first_cd;
        }
        if mach >= last_mach {
            return last_cd;
        }

        let idx = match self
            .points
            .binary_search_by(|&(m, _)| m.partial_cmp(&mach).unwrap_or(std::cmp::Ordering::Less))
        {
            Ok(idx) => return self.points[idx].1,
            Err(idx) => idx,
        };

        // The end point checks above guarantee 0 < idx < n
        let (lo_mach, lo_cd) = self.points[idx - 1];
        let (hi_mach, hi_cd) = self.points[idx];

        let denominator = hi_mach - lo_mach;
        if denominator.abs() < crate::constants::MIN_DIVISION_THRESHOLD {
            return lo_cd;
        }
        lo_cd + (mach - lo_mach) / denominator * (hi_cd - lo_cd)
    }
}

fn builtin_table(data: &[(f64, f64)]) -> DragTable {
    DragTable {
        points: data.to_vec(),
    }
}

/// G1 standard projectile, Mach 0 to 5
const G1_DATA: [(f64, f64); 79] = [
    (0.00, 0.2629), (0.05, 0.2558), (0.10, 0.2487), (0.15, 0.2413),
    (0.20, 0.2344), (0.25, 0.2278), (0.30, 0.2214), (0.35, 0.2155),
    (0.40, 0.2104), (0.45, 0.2061), (0.50, 0.2032), (0.55, 0.2020),
    (0.60, 0.2034), (0.70, 0.2165), (0.725, 0.2230), (0.75, 0.2313),
    (0.775, 0.2417), (0.80, 0.2546), (0.825, 0.2706), (0.85, 0.2901),
    (0.875, 0.3136), (0.90, 0.3415), (0.925, 0.3734), (0.95, 0.4084),
    (0.975, 0.4448), (1.00, 0.4805), (1.025, 0.5136), (1.05, 0.5427),
    (1.075, 0.5677), (1.10, 0.5883), (1.125, 0.6053), (1.15, 0.6191),
    (1.20, 0.6393), (1.25, 0.6518), (1.30, 0.6589), (1.35, 0.6621),
    (1.40, 0.6625), (1.45, 0.6607), (1.50, 0.6573), (1.55, 0.6528),
    (1.60, 0.6474), (1.65, 0.6413), (1.70, 0.6347), (1.75, 0.6280),
    (1.80, 0.6210), (1.85, 0.6141), (1.90, 0.6072), (1.95, 0.6003),
    (2.00, 0.5934), (2.05, 0.5867), (2.10, 0.5804), (2.15, 0.5743),
    (2.20, 0.5685), (2.25, 0.5630), (2.30, 0.5577), (2.35, 0.5527),
    (2.40, 0.5481), (2.45, 0.5438), (2.50, 0.5397), (2.60, 0.5325),
    (2.70, 0.5264), (2.80, 0.5211), (2.90, 0.5168), (3.00, 0.5133),
    (3.10, 0.5105), (3.20, 0.5084), (3.30, 0.5067), (3.40, 0.5054),
    (3.50, 0.5040), (3.60, 0.5030), (3.70, 0.5022), (3.80, 0.5016),
    (3.90, 0.5010), (4.00, 0.5006), (4.20, 0.4998), (4.40, 0.4995),
    (4.60, 0.4992), (4.80, 0.4990), (5.00, 0.4988),
];

/// G7 standard projectile, Mach 0 to 5
const G7_DATA: [(f64, f64); 84] = [
    (0.00, 0.1198), (0.05, 0.1197), (0.10, 0.1196), (0.15, 0.1194),
    (0.20, 0.1193), (0.25, 0.1194), (0.30, 0.1194), (0.35, 0.1194),
    (0.40, 0.1193), (0.45, 0.1193), (0.50, 0.1194), (0.55, 0.1193),
    (0.60, 0.1194), (0.65, 0.1197), (0.70, 0.1202), (0.725, 0.1207),
    (0.75, 0.1215), (0.775, 0.1226), (0.80, 0.1242), (0.825, 0.1266),
    (0.85, 0.1306), (0.875, 0.1368), (0.90, 0.1464), (0.925, 0.1660),
    (0.95, 0.2054), (0.975, 0.2993), (1.00, 0.3803), (1.025, 0.4015),
    (1.05, 0.4043), (1.075, 0.4034), (1.10, 0.4014), (1.125, 0.3987),
    (1.15, 0.3955), (1.20, 0.3884), (1.25, 0.3810), (1.30, 0.3732),
    (1.35, 0.3657), (1.40, 0.3580), (1.50, 0.3440), (1.55, 0.3376),
    (1.60, 0.3315), (1.65, 0.3260), (1.70, 0.3209), (1.75, 0.3160),
    (1.80, 0.3117), (1.85, 0.3078), (1.90, 0.3042), (1.95, 0.3010),
    (2.00, 0.2980), (2.05, 0.2951), (2.10, 0.2922), (2.15, 0.2892),
    (2.20, 0.2864), (2.25, 0.2835), (2.30, 0.2807), (2.35, 0.2779),
    (2.40, 0.2752), (2.45, 0.2725), (2.50, 0.2697), (2.55, 0.2670),
    (2.60, 0.2643), (2.65, 0.2615), (2.70, 0.2588), (2.75, 0.2561),
    (2.80, 0.2533), (2.85, 0.2506), (2.90, 0.2479), (2.95, 0.2451),
    (3.00, 0.2424), (3.10, 0.2368), (3.20, 0.2313), (3.30, 0.2258),
    (3.40, 0.2205), (3.50, 0.2154), (3.60, 0.2106), (3.70, 0.2060),
    (3.80, 0.2017), (3.90, 0.1975), (4.00, 0.1935), (4.20, 0.1861),
    (4.40, 0.1793), (4.60, 0.1730), (4.80, 0.1672), (5.00, 0.1618),
];

static G1_DRAG_TABLE: Lazy<DragTable> = Lazy::new(|| builtin_table(&G1_DATA));

static G7_DRAG_TABLE: Lazy<DragTable> = Lazy::new(|| builtin_table(&G7_DATA));

/// Built-in table for a drag model; `None` has no table
pub fn drag_table_for(drag_model: DragModel) -> Option<&'static DragTable> {
    match drag_model {
        DragModel::None => None,
        DragModel::G1 => Some(&*G1_DRAG_TABLE),
        DragModel::G7 => Some(&*G7_DRAG_TABLE),
    }
}

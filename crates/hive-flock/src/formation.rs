//! Formation slot layouts.
//!
//! Pure functions: given a unit count, a center on the x/z plane and a
//! spacing, produce one slot per unit.  Nothing here moves boids; see
//! [`FlockingSystem::assign_formation`][crate::FlockingSystem::assign_formation]
//! for applying slots as seek targets.

use std::f32::consts::TAU;
use std::fmt;
use std::str::FromStr;

use hive_core::Vec3;

/// Spacing used when a caller has no preference.
pub const DEFAULT_SPACING: f32 = 1.5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FormationKind {
    /// Rows of `ceil(sqrt(n))`, half-spacing between rows.
    #[default]
    Line,
    /// Hollow square filled side by side.
    Box,
    /// Triangle: one unit in front, each row one wider behind it.
    Wedge,
    /// Even ring with radius `sqrt(n) * spacing / 2`.
    Circle,
    /// Three rows offset to one side of the center.
    Flank,
}

impl FormationKind {
    pub const ALL: [FormationKind; 5] = [
        FormationKind::Line,
        FormationKind::Box,
        FormationKind::Wedge,
        FormationKind::Circle,
        FormationKind::Flank,
    ];

    /// Case-insensitive name lookup; unknown names give `Line`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "box"    => FormationKind::Box,
            "wedge"  => FormationKind::Wedge,
            "circle" => FormationKind::Circle,
            "flank"  => FormationKind::Flank,
            _        => FormationKind::Line,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FormationKind::Line   => "line",
            FormationKind::Box    => "box",
            FormationKind::Wedge  => "wedge",
            FormationKind::Circle => "circle",
            FormationKind::Flank  => "flank",
        }
    }
}

impl FromStr for FormationKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FormationKind::parse(s))
    }
}

impl fmt::Display for FormationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `count` slots for `kind` around (`center_x`, `center_z`).  Slots have
/// `y = 0`.
pub fn get_formation(
    kind:     FormationKind,
    count:    usize,
    center_x: f32,
    center_z: f32,
    spacing:  f32,
) -> Vec<Vec3> {
    if count == 0 {
        return Vec::new();
    }
    match kind {
        FormationKind::Line   => line(count, center_x, center_z, spacing),
        FormationKind::Box    => square(count, center_x, center_z, spacing),
        FormationKind::Wedge  => wedge(count, center_x, center_z, spacing),
        FormationKind::Circle => circle(count, center_x, center_z, spacing),
        FormationKind::Flank  => flank(count, center_x, center_z, spacing),
    }
}

#[inline]
fn slot(x: f32, z: f32) -> Vec3 {
    Vec3::new(x, 0.0, z)
}

fn ceil_sqrt(n: usize) -> usize {
    (n as f64).sqrt().ceil() as usize
}

fn line(count: usize, cx: f32, cz: f32, spacing: f32) -> Vec<Vec3> {
    let per_row = ceil_sqrt(count);
    (0..count)
        .map(|i| {
            let row = (i / per_row) as f32;
            let col = (i % per_row) as f32;
            slot(cx + (col - per_row as f32 / 2.0) * spacing, cz + row * spacing * 0.5)
        })
        .collect()
}

fn square(count: usize, cx: f32, cz: f32, spacing: f32) -> Vec<Vec3> {
    // Walk the perimeter clockwise from the top-left corner, `per_side`
    // slots per side, widened when the square root would leave units
    // without a slot.
    let per_side = ceil_sqrt(count).max(count.div_ceil(4));
    let half = per_side as f32 / 2.0 * spacing;

    let mut out = Vec::with_capacity(count);
    'sides: for side in 0..4 {
        for i in 0..per_side {
            if out.len() == count {
                break 'sides;
            }
            let step = i as f32 * spacing;
            let (x, z) = match side {
                0 => (-half + step, half),
                1 => (half, half - step),
                2 => (half - step, -half),
                _ => (-half, -half + step),
            };
            out.push(slot(cx + x, cz + z));
        }
    }
    out
}

fn wedge(count: usize, cx: f32, cz: f32, spacing: f32) -> Vec<Vec3> {
    let mut out = Vec::with_capacity(count);
    let mut row = 0usize;
    while out.len() < count {
        let row_size = row + 1;
        for i in 0..row_size {
            if out.len() == count {
                break;
            }
            out.push(slot(
                cx + (i as f32 - row_size as f32 / 2.0) * spacing,
                cz - row as f32 * spacing,
            ));
        }
        row += 1;
    }
    out
}

fn circle(count: usize, cx: f32, cz: f32, spacing: f32) -> Vec<Vec3> {
    let radius = (count as f32).sqrt() * spacing * 0.5;
    (0..count)
        .map(|i| {
            let angle = i as f32 / count as f32 * TAU;
            slot(cx + angle.cos() * radius, cz + angle.sin() * radius)
        })
        .collect()
}

fn flank(count: usize, cx: f32, cz: f32, spacing: f32) -> Vec<Vec3> {
    let columns = count.div_ceil(3);
    (0..count)
        .map(|i| {
            let row = (i / columns) as f32;
            let col = (i % columns) as f32;
            slot(cx + col * spacing, cz + row * spacing)
        })
        .collect()
}

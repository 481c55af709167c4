use serde::{Deserialize, Serialize};

use crate::types::Rect;

/// 2D affine map, row-major free coefficients:
///
/// ```text
/// | dsdx  dtdx  tx |   | x |
/// | dtdy  dsdy  ty | * | y |
/// |  0     0     1 |   | 1 |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub dsdx: f64,
    pub dtdx: f64,
    pub tx: f64,
    pub dtdy: f64,
    pub dsdy: f64,
    pub ty: f64,
}

pub const IDENTITY_MATRIX: Matrix = Matrix {
    dsdx: 1.0,
    dtdx: 0.0,
    tx: 0.0,
    dtdy: 0.0,
    dsdy: 1.0,
    ty: 0.0,
};

impl Matrix {
    pub fn apply_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.dsdx * x + self.dtdx * y + self.tx,
            self.dtdy * x + self.dsdy * y + self.ty,
        )
    }

    /// Axis-aligned bounding box of the four transformed corners.
    pub fn apply_rect(&self, rect: &Rect) -> Rect {
        let corners = [
            self.apply_point(rect.left, rect.top),
            self.apply_point(rect.right, rect.top),
            self.apply_point(rect.left, rect.bottom),
            self.apply_point(rect.right, rect.bottom),
        ];
        let mut left = f64::INFINITY;
        let mut top = f64::INFINITY;
        let mut right = f64::NEG_INFINITY;
        let mut bottom = f64::NEG_INFINITY;
        for (x, y) in corners {
            left = left.min(x);
            top = top.min(y);
            right = right.max(x);
            bottom = bottom.max(y);
        }
        Rect::new(left, top, right, bottom)
    }

    /// Matrix product `self * other` (apply `other` first, then `self`).
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            dsdx: self.dsdx * other.dsdx + self.dtdx * other.dtdy,
            dtdx: self.dsdx * other.dtdx + self.dtdx * other.dsdy,
            tx: self.dsdx * other.tx + self.dtdx * other.ty + self.tx,
            dtdy: self.dtdy * other.dsdx + self.dsdy * other.dtdy,
            dsdy: self.dtdy * other.dtdx + self.dsdy * other.dsdy,
            ty: self.dtdy * other.tx + self.dsdy * other.ty + self.ty,
        }
    }
}

/// Classified transform kind, encoded as bit flags matching the source
/// system's wire values. Used to fast-path common cases (identity,
/// quarter rotations) without inspecting the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformType(pub u32);

impl TransformType {
    pub const EMPTY: TransformType = TransformType(0x0);
    pub const TRANSLATE: TransformType = TransformType(0x01);
    pub const ROT_90: TransformType = TransformType(0x02);
    pub const FLIP_V: TransformType = TransformType(0x04);
    pub const FLIP_H: TransformType = TransformType(0x08);
    pub const SCALE: TransformType = TransformType(0x10);
    pub const ROT_INVALID: TransformType = TransformType(0x20);

    pub fn contains(&self, flag: TransformType) -> bool {
        self.0 & flag.0 != 0
    }

    /// A rotation expressible as a multiple of 90 degrees.
    pub fn is_simple_rotation(&self) -> bool {
        !self.contains(TransformType::ROT_INVALID)
    }

    /// True for 90 and 270 degree rotations, where a transformed box
    /// swaps its width and height.
    pub fn swaps_width_height(&self) -> bool {
        self.is_simple_rotation() && self.contains(TransformType::ROT_90)
    }
}

impl Default for Matrix {
    fn default() -> Self {
        IDENTITY_MATRIX
    }
}

impl Default for TransformType {
    fn default() -> Self {
        TransformType::EMPTY
    }
}

/// A classified 2D affine transform. `kind` is the fast-path
/// classification, `matrix` the exact map. Wire payloads may omit
/// either field; both default to identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    #[serde(default)]
    pub kind: TransformType,
    #[serde(default)]
    pub matrix: Matrix,
}

impl Transform {
    /// The neutral element: identity classification and matrix.
    pub const EMPTY: Transform = Transform {
        kind: TransformType::EMPTY,
        matrix: IDENTITY_MATRIX,
    };

    pub fn new(kind: TransformType, matrix: Matrix) -> Self {
        Self { kind, matrix }
    }

    /// Quarter rotation (90 degrees clockwise), identity matrix aside
    /// from the rotation itself.
    pub fn rot_90() -> Self {
        Self {
            kind: TransformType::ROT_90,
            matrix: Matrix {
                dsdx: 0.0,
                dtdx: -1.0,
                tx: 0.0,
                dtdy: 1.0,
                dsdy: 0.0,
                ty: 0.0,
            },
        }
    }

    pub fn apply_rect(&self, rect: &Rect) -> Rect {
        self.matrix.apply_rect(rect)
    }

    /// Compose with `other` (apply `other` first). The kind of the
    /// result is reclassified from the product matrix.
    pub fn compose(&self, other: &Transform) -> Transform {
        let matrix = self.matrix.multiply(&other.matrix);
        Transform {
            kind: classify(&matrix),
            matrix,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::EMPTY
    }
}

/// Derive the classification flags from matrix coefficients.
fn classify(m: &Matrix) -> TransformType {
    let mut flags = 0u32;
    if m.tx != 0.0 || m.ty != 0.0 {
        flags |= TransformType::TRANSLATE.0;
    }
    if m.dtdx == 0.0 && m.dtdy == 0.0 {
        // Axis-aligned: scale and flips live on the diagonal.
        if m.dsdx < 0.0 {
            flags |= TransformType::FLIP_H.0;
        }
        if m.dsdy < 0.0 {
            flags |= TransformType::FLIP_V.0;
        }
        if m.dsdx.abs() != 1.0 || m.dsdy.abs() != 1.0 {
            flags |= TransformType::SCALE.0;
        }
    } else if m.dsdx == 0.0 && m.dsdy == 0.0 {
        // Quarter rotation family.
        flags |= TransformType::ROT_90.0;
        if m.dtdx > 0.0 {
            flags |= TransformType::FLIP_V.0;
        }
        if m.dtdy < 0.0 {
            flags |= TransformType::FLIP_H.0;
        }
        if m.dtdx.abs() != 1.0 || m.dtdy.abs() != 1.0 {
            flags |= TransformType::SCALE.0;
        }
    } else {
        flags |= TransformType::ROT_INVALID.0;
    }
    TransformType(flags)
}

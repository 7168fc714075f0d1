//! Die face sets
//!
//! A die always has exactly six faces. Index order follows a fixed spatial
//! convention so an index always names the same physical face:
//! `+Y, -Y, +X, -X, +Z, -Z`.

use serde::{Deserialize, Serialize};

use crate::core::types::SideType;

/// Number of faces on every die
pub const FACE_COUNT: usize = 6;

/// Spatial direction of a face, in index order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FaceAxis {
    PosY = 0,
    NegY = 1,
    PosX = 2,
    NegX = 3,
    PosZ = 4,
    NegZ = 5,
}

impl FaceAxis {
    pub const ALL: [FaceAxis; FACE_COUNT] = [
        FaceAxis::PosY,
        FaceAxis::NegY,
        FaceAxis::PosX,
        FaceAxis::NegX,
        FaceAxis::PosZ,
        FaceAxis::NegZ,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// One face: printed value plus payout type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Face {
    pub value: u32,
    pub side: SideType,
}

impl Face {
    pub fn score(value: u32) -> Self {
        Self { value, side: SideType::Score }
    }

    pub fn money(value: u32) -> Self {
        Self { value, side: SideType::Money }
    }
}

/// The six faces of a die
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceSet {
    faces: [Face; FACE_COUNT],
}

impl FaceSet {
    pub fn new(faces: [Face; FACE_COUNT]) -> Self {
        Self { faces }
    }

    /// All-score faces with the given values
    pub fn from_values(values: [u32; FACE_COUNT]) -> Self {
        Self {
            faces: values.map(Face::score),
        }
    }

    pub fn faces(&self) -> &[Face; FACE_COUNT] {
        &self.faces
    }

    pub fn face(&self, axis: FaceAxis) -> Face {
        self.faces[axis.index()]
    }

    pub fn values(&self) -> [u32; FACE_COUNT] {
        self.faces.map(|f| f.value)
    }

    pub fn sides(&self) -> [SideType; FACE_COUNT] {
        self.faces.map(|f| f.side)
    }

    pub fn sum(&self) -> u32 {
        self.faces.iter().map(|f| f.value).sum()
    }

    /// Replace values in place, keeping every face's side type
    ///
    /// Inputs that are not exactly six long are ignored.
    pub fn set_values(&mut self, values: &[u32]) -> bool {
        if values.len() != FACE_COUNT {
            return false;
        }
        for (face, value) in self.faces.iter_mut().zip(values) {
            face.value = *value;
        }
        true
    }
}

/// Visual/template identity a die was created from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DieTemplate {
    /// Faces 1-6, all scoring
    Standard,
    /// Faces 1-6, the +Y face pays currency
    Gilded,
    /// Low faces shaved toward the middle, high faces loaded
    Weighted,
}

impl DieTemplate {
    /// Fresh face set for a newly created die of this template
    pub fn faces(&self) -> FaceSet {
        match self {
            Self::Standard => FaceSet::from_values([1, 2, 3, 4, 5, 6]),
            Self::Gilded => {
                let mut faces = [1, 2, 3, 4, 5, 6].map(Face::score);
                faces[FaceAxis::PosY.index()].side = SideType::Money;
                FaceSet::new(faces)
            }
            Self::Weighted => FaceSet::from_values([2, 2, 3, 4, 6, 6]),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Gilded => "Gilded",
            Self::Weighted => "Weighted",
        }
    }
}

//! Owned dice and throw snapshots

use serde::{Deserialize, Serialize};

use crate::core::types::DieId;
use crate::dice::face::{DieTemplate, FaceSet};

/// A die owned by the player
///
/// Faces change only through enhancements. Duplicating deep-copies the
/// face set under a fresh id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryDie {
    pub id: DieId,
    pub template: DieTemplate,
    pub faces: FaceSet,
}

impl InventoryDie {
    pub fn new(template: DieTemplate) -> Self {
        Self {
            id: DieId::new(),
            template,
            faces: template.faces(),
        }
    }

    /// Copy of this die, with its current faces, under a new id
    pub fn duplicate(&self) -> Self {
        Self {
            id: DieId::new(),
            template: self.template,
            faces: self.faces,
        }
    }

    pub fn snapshot(&self) -> ThrownDie {
        ThrownDie {
            id: self.id,
            faces: self.faces,
        }
    }
}

/// What the physics layer needs to roll a die
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrownDie {
    pub id: DieId,
    pub faces: FaceSet,
}

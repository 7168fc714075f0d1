//! Enhancement definitions and the standard shop catalog

use serde::{Deserialize, Serialize};

use crate::dice::face::FACE_COUNT;
use crate::enhancements::transform;

/// How many dice must be selected together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRequirement {
    pub min: usize,
    pub max: usize,
}

impl DiceRequirement {
    pub const fn exactly(count: usize) -> Self {
        Self { min: count, max: count }
    }

    pub const fn between(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn accepts(&self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }
}

impl std::fmt::Display for DiceRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}-{}", self.min, self.max)
        }
    }
}

/// Every face-rewriting rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnhancementKind {
    /// All faces become the ceiling of their mean
    Flatten,
    /// Every face gains `amount`
    Add { amount: u32 },
    /// Every face is scaled, floored, minimum 1
    Multiply { factor: f64 },
    /// Faces at the current maximum are doubled
    DoubleMax,
    /// Faces below `floor` are raised to it
    RaiseFloor { floor: u32 },
    /// Below `low` gains `bonus`, above `high` loses `penalty`
    Threshold { low: u32, high: u32, bonus: u32, penalty: u32 },
    /// Lower half set to `low_value`, upper half gains `high_bonus`
    Polarize { low_value: u32, high_bonus: u32 },
    /// First maximum doubled, first minimum zeroed
    Specialize,
    /// Two dice both take the faces of whichever has the larger face sum
    Mirror,
    /// Each of N dice gains N-1 on every face
    Cascade,
    /// Faces halved (rounded up) and the die is duplicated
    Split,
}

impl EnhancementKind {
    pub fn requirement(&self) -> DiceRequirement {
        match self {
            Self::Mirror => DiceRequirement::exactly(2),
            Self::Cascade => DiceRequirement::between(2, 3),
            _ => DiceRequirement::exactly(1),
        }
    }

    pub fn creates_duplicate(&self) -> bool {
        matches!(self, Self::Split)
    }

    /// Analyse the whole selection once, before any die is rewritten
    pub fn prepare(&self, selected: &[[u32; FACE_COUNT]]) -> PreparedEnhancement {
        let shared = match self {
            Self::Mirror => selected
                .iter()
                .enumerate()
                .max_by(|(ia, a), (ib, b)| {
                    face_sum(*a).cmp(&face_sum(*b)).then(ib.cmp(ia))
                })
                .map(|(_, faces)| SharedState::Source(*faces))
                .unwrap_or(SharedState::None),
            Self::Cascade => {
                SharedState::Bonus(selected.len().saturating_sub(1) as u32)
            }
            _ => SharedState::None,
        };
        PreparedEnhancement { kind: *self, shared }
    }
}

fn face_sum(faces: &[u32]) -> u64 {
    faces.iter().map(|&v| v as u64).sum()
}

/// State computed across a joint selection
#[derive(Debug, Clone, Copy, PartialEq)]
enum SharedState {
    None,
    Source([u32; FACE_COUNT]),
    Bonus(u32),
}

/// An enhancement bound to the selection it was prepared for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreparedEnhancement {
    kind: EnhancementKind,
    shared: SharedState,
}

impl PreparedEnhancement {
    /// New faces for one selected die; the input is left untouched
    pub fn apply_to_die(&self, current: &[u32]) -> Vec<u32> {
        match (self.kind, self.shared) {
            (EnhancementKind::Flatten, _) => transform::flatten_to_mean(current),
            (EnhancementKind::Add { amount }, _) => transform::add_uniform(current, amount),
            (EnhancementKind::Multiply { factor }, _) => {
                transform::multiply_uniform(current, factor)
            }
            (EnhancementKind::DoubleMax, _) => transform::double_max(current),
            (EnhancementKind::RaiseFloor { floor }, _) => {
                transform::raise_to_floor(current, floor)
            }
            (EnhancementKind::Threshold { low, high, bonus, penalty }, _) => {
                transform::threshold_adjust(current, low, high, bonus, penalty)
            }
            (EnhancementKind::Polarize { low_value, high_bonus }, _) => {
                transform::polarize(current, low_value, high_bonus)
            }
            (EnhancementKind::Specialize, _) => transform::specialize(current),
            (EnhancementKind::Mirror, SharedState::Source(source))
                if current.len() == FACE_COUNT =>
            {
                source.to_vec()
            }
            (EnhancementKind::Mirror, _) => current.to_vec(),
            (EnhancementKind::Cascade, SharedState::Bonus(bonus)) => {
                transform::add_uniform(current, bonus)
            }
            (EnhancementKind::Cascade, _) => current.to_vec(),
            (EnhancementKind::Split, _) => transform::halve_ceil(current),
        }
    }
}

/// A purchasable enhancement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancementDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub cost: u32,
    pub kind: EnhancementKind,
}

impl EnhancementDefinition {
    pub fn new(id: &str, name: &str, description: &str, cost: u32, kind: EnhancementKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            cost,
            kind,
        }
    }
}

/// Enhancements offered by the shop
#[derive(Debug, Clone, Default)]
pub struct EnhancementCatalog {
    definitions: Vec<EnhancementDefinition>,
}

impl EnhancementCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn standard() -> Self {
        use EnhancementKind::*;
        let definitions = vec![
            EnhancementDefinition::new("even_out", "Even Out", "All faces become the average, rounded up", 4, Flatten),
            EnhancementDefinition::new("plus_one", "Plus One", "+1 to every face", 5, Add { amount: 1 }),
            EnhancementDefinition::new("amplify", "Amplify", "x1.5 every face, rounded down", 7, Multiply { factor: 1.5 }),
            EnhancementDefinition::new("peak", "Peak", "Double the highest face", 6, DoubleMax),
            EnhancementDefinition::new("safety_net", "Safety Net", "Faces below 3 become 3", 4, RaiseFloor { floor: 3 }),
            EnhancementDefinition::new("balance", "Balance", "Faces under 3 gain 2, faces over 4 lose 1", 3, Threshold { low: 3, high: 4, bonus: 2, penalty: 1 }),
            EnhancementDefinition::new("polarize", "Polarize", "Low half becomes 1, high half gains 2", 5, Polarize { low_value: 1, high_bonus: 2 }),
            EnhancementDefinition::new("specialize", "Specialize", "Double the highest face, zero the lowest", 5, Specialize),
            EnhancementDefinition::new("mirror", "Mirror", "Two dice both copy the stronger one", 6, Mirror),
            EnhancementDefinition::new("cascade", "Cascade", "2-3 dice each gain +1 per other die selected", 6, Cascade),
            EnhancementDefinition::new("split", "Split", "Halve the faces and gain a copy of the die", 8, Split),
        ];
        Self { definitions }
    }

    pub fn all(&self) -> &[EnhancementDefinition] {
        &self.definitions
    }

    pub fn get(&self, id: &str) -> Option<&EnhancementDefinition> {
        self.definitions.iter().find(|d| d.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirements() {
        assert_eq!(EnhancementKind::Split.requirement(), DiceRequirement::exactly(1));
        assert_eq!(EnhancementKind::Mirror.requirement(), DiceRequirement::exactly(2));
        assert!(EnhancementKind::Cascade.requirement().accepts(3));
        assert!(!EnhancementKind::Cascade.requirement().accepts(1));
        assert!(!EnhancementKind::Cascade.requirement().accepts(4));
    }

    #[test]
    fn test_mirror_copies_higher_sum() {
        let weak = [1, 1, 1, 1, 1, 1];
        let strong = [2, 2, 2, 2, 2, 9];
        let prepared = EnhancementKind::Mirror.prepare(&[weak, strong]);

        assert_eq!(prepared.apply_to_die(&weak), strong.to_vec());
        assert_eq!(prepared.apply_to_die(&strong), strong.to_vec());
    }

    #[test]
    fn test_mirror_tie_keeps_first_selected() {
        let a = [1, 2, 3, 4, 5, 6];
        let b = [6, 5, 4, 3, 2, 1];
        let prepared = EnhancementKind::Mirror.prepare(&[a, b]);
        assert_eq!(prepared.apply_to_die(&b), a.to_vec());
    }

    #[test]
    fn test_mirror_picks_strongest_of_many() {
        let low = [1, 1, 1, 1, 1, 1];
        let high = [6, 6, 6, 6, 6, 6];
        let mid = [3, 3, 3, 3, 3, 3];
        let prepared = EnhancementKind::Mirror.prepare(&[low, high, mid, high]);

        assert_eq!(prepared.apply_to_die(&low), high.to_vec());
        assert_eq!(prepared.apply_to_die(&mid), high.to_vec());
        assert_eq!(EnhancementKind::Mirror.prepare(&[]).apply_to_die(&low), low.to_vec());
    }

    #[test]
    fn test_cascade_bonus_scales_with_selection() {
        let faces = [1, 2, 3, 4, 5, 6];
        let two = EnhancementKind::Cascade.prepare(&[faces, faces]);
        let three = EnhancementKind::Cascade.prepare(&[faces, faces, faces]);

        assert_eq!(two.apply_to_die(&faces), vec![2, 3, 4, 5, 6, 7]);
        assert_eq!(three.apply_to_die(&faces), vec![3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_unprepared_joint_rules_are_identity() {
        let mirror = EnhancementKind::Mirror.prepare(&[]);
        assert_eq!(mirror.apply_to_die(&[1, 2, 3, 4, 5, 6]), vec![1, 2, 3, 4, 5, 6]);
        assert!(mirror.apply_to_die(&[]).is_empty());
    }

    #[test]
    fn test_only_split_duplicates() {
        let catalog = EnhancementCatalog::standard();
        let duplicating: Vec<&str> = catalog
            .all()
            .iter()
            .filter(|d| d.kind.creates_duplicate())
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(duplicating, vec!["split"]);
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = EnhancementCatalog::standard();
        assert_eq!(catalog.get("polarize").unwrap().cost, 5);
        assert!(catalog.get("missing").is_none());
    }
}

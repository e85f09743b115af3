//! Bond dipole directions and the electronegativity rule that grades them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Atom, Bond, BondId, Molecule};

/// Minimum electronegativity difference for a bond to count as polar.
/// Inclusive: a difference of exactly 0.4 is polar.
pub const POLAR_BOND_THRESHOLD: f64 = 0.4;

/// Arrow drawn on a bond, pointing at the atom that pulls electrons harder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DipoleDirection {
    #[default]
    None,
    AToB,
    BToA,
}

impl DipoleDirection {
    /// Next state of the bond-click cycle: None → AToB → BToA → None.
    pub fn cycled(self) -> Self {
        match self {
            Self::None => Self::AToB,
            Self::AToB => Self::BToA,
            Self::BToA => Self::None,
        }
    }
}

/// Scientifically correct dipole for a bond from A to B.
pub fn correct_direction(atom_a: &Atom, atom_b: &Atom) -> DipoleDirection {
    direction_from_electronegativity(atom_a.electronegativity, atom_b.electronegativity)
}

/// Same rule on raw Pauling values.
pub fn direction_from_electronegativity(en_a: f64, en_b: f64) -> DipoleDirection {
    let diff = en_b - en_a;
    if diff.abs() < POLAR_BOND_THRESHOLD {
        DipoleDirection::None
    } else if diff > 0.0 {
        DipoleDirection::AToB
    } else {
        DipoleDirection::BToA
    }
}

/// Correct dipole for one bond of a molecule. A bond whose atoms are missing
/// grades as `None`; validated catalogs never contain one.
pub fn bond_direction(molecule: &Molecule, bond: &Bond) -> DipoleDirection {
    molecule
        .bond_ends(bond)
        .map(|(a, b)| correct_direction(a, b))
        .unwrap_or_default()
}

/// The player's arrows for the current round. Unset bonds read as `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserDipoleMap {
    directions: HashMap<BondId, DipoleDirection>,
}

impl UserDipoleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, bond: BondId) -> DipoleDirection {
        self.directions.get(&bond).copied().unwrap_or_default()
    }

    pub fn set(&mut self, bond: BondId, direction: DipoleDirection) {
        self.directions.insert(bond, direction);
    }

    /// Advance the click cycle for `bond` and return the new direction.
    pub fn cycle(&mut self, bond: BondId) -> DipoleDirection {
        let next = self.get(bond).cycled();
        self.directions.insert(bond, next);
        next
    }

    /// Number of bonds with an arrow drawn.
    pub fn assigned(&self) -> usize {
        self.directions
            .values()
            .filter(|d| **d != DipoleDirection::None)
            .count()
    }

    pub fn clear(&mut self) {
        self.directions.clear();
    }
}

impl FromIterator<(BondId, DipoleDirection)> for UserDipoleMap {
    fn from_iter<I: IntoIterator<Item = (BondId, DipoleDirection)>>(iter: I) -> Self {
        Self {
            directions: iter.into_iter().collect(),
        }
    }
}

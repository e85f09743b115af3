//! Molecule catalog.
//!
//! The built-in molecules are embedded as JSON at compile time and validated
//! once at startup. A catalog that fails validation is a build defect, not a
//! runtime condition, so callers treat `CatalogError` as fatal.

use std::collections::HashSet;
use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Embed the molecule catalog JSON at compile time.
const MOLECULES_JSON: &str = include_str!("../data/molecules.json");

/// Identity of a bond within its molecule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BondId(pub u32);

impl fmt::Display for BondId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("molecule catalog JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("molecule catalog is empty")]
    Empty,

    #[error("molecule id '{0}' appears more than once")]
    DuplicateMolecule(String),

    #[error("molecule '{molecule}': bond {bond} references atom {atom}, but only {atom_count} atoms exist")]
    UnknownAtom {
        molecule: String,
        bond: BondId,
        atom: usize,
        atom_count: usize,
    },

    #[error("molecule '{molecule}': bond {bond} connects atom {atom} to itself")]
    SelfBond {
        molecule: String,
        bond: BondId,
        atom: usize,
    },

    #[error("molecule '{molecule}': bond id {bond} appears more than once")]
    DuplicateBond { molecule: String, bond: BondId },

    #[error("molecule '{molecule}': atom {atom} has a non-finite electronegativity")]
    BadElectronegativity { molecule: String, atom: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub id: usize,
    /// Element symbol ("H", "Cl", ...).
    pub element: String,
    pub position: Vec3,
    /// Pauling electronegativity.
    pub electronegativity: f64,
}

/// A bond between atoms `a` and `b` (indices into `Molecule::atoms`).
/// The A→B orientation is what `DipoleDirection::AToB` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bond {
    pub id: BondId,
    pub a: usize,
    pub b: usize,
}

/// Decorative lone pair; never scored.
#[derive(Debug, Clone, PartialEq)]
pub struct LonePair {
    pub id: usize,
    pub position: Vec3,
    pub rotation: Option<Vec3>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    pub id: String,
    pub name: String,
    pub formula: String,
    /// Geometry label shown to the player ("Bent", "Tetrahedral", ...).
    pub geometry: String,
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    pub lone_pairs: Vec<LonePair>,
    pub is_polar: bool,
    pub difficulty: Difficulty,
    pub hint: String,
    pub description: Option<String>,
}

impl Molecule {
    /// Look up a bond by id.
    pub fn bond(&self, id: BondId) -> Option<&Bond> {
        self.bonds.iter().find(|bond| bond.id == id)
    }

    /// The two atoms joined by `bond`, in (A, B) order.
    pub fn bond_ends(&self, bond: &Bond) -> Option<(&Atom, &Atom)> {
        Some((self.atoms.get(bond.a)?, self.atoms.get(bond.b)?))
    }

    /// Sum of bond dipoles. Each bond adds its A→B unit vector scaled by
    /// EN(B) − EN(A), so the result points toward electron density.
    pub fn net_dipole(&self) -> Vec3 {
        self.bonds
            .iter()
            .filter_map(|bond| self.bond_ends(bond))
            .fold(Vec3::ZERO, |net, (a, b)| {
                let diff = (b.electronegativity - a.electronegativity) as f32;
                net + (b.position - a.position).normalize_or_zero() * diff
            })
    }

    /// Check structural invariants: finite electronegativities, bonds that
    /// point at existing distinct atoms, unique bond ids.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for (index, atom) in self.atoms.iter().enumerate() {
            if !atom.electronegativity.is_finite() {
                return Err(CatalogError::BadElectronegativity {
                    molecule: self.id.clone(),
                    atom: index,
                });
            }
        }

        let mut seen = HashSet::new();
        for bond in &self.bonds {
            if !seen.insert(bond.id) {
                return Err(CatalogError::DuplicateBond {
                    molecule: self.id.clone(),
                    bond: bond.id,
                });
            }
            for atom in [bond.a, bond.b] {
                if atom >= self.atoms.len() {
                    return Err(CatalogError::UnknownAtom {
                        molecule: self.id.clone(),
                        bond: bond.id,
                        atom,
                        atom_count: self.atoms.len(),
                    });
                }
            }
            if bond.a == bond.b {
                return Err(CatalogError::SelfBond {
                    molecule: self.id.clone(),
                    bond: bond.id,
                    atom: bond.a,
                });
            }
        }
        Ok(())
    }
}

// ---- Raw JSON structures ----

#[derive(Debug, Deserialize)]
struct RawCatalog {
    molecules: Vec<RawMolecule>,
}

#[derive(Debug, Deserialize)]
struct RawMolecule {
    id: String,
    name: String,
    formula: String,
    geometry: String,
    is_polar: bool,
    difficulty: Difficulty,
    atoms: Vec<RawAtom>,
    #[serde(default)]
    bonds: Vec<RawBond>,
    #[serde(default)]
    lone_pairs: Vec<RawLonePair>,
    hint: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAtom {
    id: usize,
    element: String,
    position: [f32; 3],
    electronegativity: f64,
}

#[derive(Debug, Deserialize)]
struct RawBond {
    id: u32,
    a: usize,
    b: usize,
}

#[derive(Debug, Deserialize)]
struct RawLonePair {
    id: usize,
    position: [f32; 3],
    #[serde(default)]
    rotation: Option<[f32; 3]>,
}

impl From<RawMolecule> for Molecule {
    fn from(raw: RawMolecule) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            formula: raw.formula,
            geometry: raw.geometry,
            atoms: raw
                .atoms
                .into_iter()
                .map(|a| Atom {
                    id: a.id,
                    element: a.element,
                    position: Vec3::from_array(a.position),
                    electronegativity: a.electronegativity,
                })
                .collect(),
            bonds: raw
                .bonds
                .into_iter()
                .map(|b| Bond { id: BondId(b.id), a: b.a, b: b.b })
                .collect(),
            lone_pairs: raw
                .lone_pairs
                .into_iter()
                .map(|lp| LonePair {
                    id: lp.id,
                    position: Vec3::from_array(lp.position),
                    rotation: lp.rotation.map(Vec3::from_array),
                })
                .collect(),
            is_polar: raw.is_polar,
            difficulty: raw.difficulty,
            hint: raw.hint,
            description: raw.description,
        }
    }
}

/// Ordered, validated, read-only sequence of molecules played in order.
#[derive(Debug, Clone)]
pub struct Catalog {
    molecules: Vec<Molecule>,
}

impl Catalog {
    /// Load the built-in catalog from embedded JSON.
    pub fn load() -> Result<Self, CatalogError> {
        Self::from_json(MOLECULES_JSON)
    }

    /// Parse and validate a catalog from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        Self::from_molecules(raw.molecules.into_iter().map(Molecule::from).collect())
    }

    /// Validate an already-built list of molecules.
    pub fn from_molecules(molecules: Vec<Molecule>) -> Result<Self, CatalogError> {
        if molecules.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut ids = HashSet::new();
        for molecule in &molecules {
            if !ids.insert(molecule.id.as_str()) {
                return Err(CatalogError::DuplicateMolecule(molecule.id.clone()));
            }
            molecule.validate()?;
        }
        Ok(Self { molecules })
    }

    /// Molecule at round `index`.
    pub fn get(&self, index: usize) -> Option<&Molecule> {
        self.molecules.get(index)
    }

    /// Find a molecule by its id.
    pub fn find(&self, id: &str) -> Option<&Molecule> {
        self.molecules.iter().find(|m| m.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Molecule> {
        self.molecules.iter()
    }

    pub fn len(&self) -> usize {
        self.molecules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.molecules.is_empty()
    }
}

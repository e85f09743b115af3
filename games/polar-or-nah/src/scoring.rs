//! Round scoring: polarity call, bond arrows, time bonus.

use serde::Serialize;

use crate::catalog::{BondId, Molecule};
use crate::dipole::{bond_direction, DipoleDirection, UserDipoleMap};

/// Awarded for the correct polar / non-polar call.
pub const POLARITY_POINTS: u32 = 50;
/// Awarded when every bond arrow is right; scaled by the fraction correct.
pub const BOND_POINTS_MAX: u32 = 50;
/// Final score above which the game-over screen crowns a wizard.
pub const WIZARD_THRESHOLD: u32 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RoundScore {
    pub polarity_points: u32,
    pub bond_points: u32,
    pub time_bonus: u32,
}

impl RoundScore {
    pub const ZERO: Self = Self {
        polarity_points: 0,
        bond_points: 0,
        time_bonus: 0,
    };

    pub fn total(&self) -> u32 {
        self.polarity_points + self.bond_points + self.time_bonus
    }
}

/// Score one round.
///
/// A timeout scores zero in every component. Otherwise the polarity call is
/// worth `POLARITY_POINTS`, the bond arrows up to `BOND_POINTS_MAX`, and the
/// seconds left are added only when the polarity call was right. Entries in
/// `user_dipoles` for bonds the molecule lacks are ignored.
pub fn score(
    molecule: &Molecule,
    user_dipoles: &UserDipoleMap,
    user_says_polar: bool,
    time_left: u32,
    is_timeout: bool,
) -> RoundScore {
    if is_timeout {
        return RoundScore::ZERO;
    }

    let is_correct_polarity = user_says_polar == molecule.is_polar;

    RoundScore {
        polarity_points: if is_correct_polarity { POLARITY_POINTS } else { 0 },
        bond_points: bond_points(count_correct_bonds(molecule, user_dipoles), molecule.bonds.len()),
        time_bonus: if is_correct_polarity { time_left } else { 0 },
    }
}

/// Bonds whose arrow matches the electronegativity rule.
pub fn count_correct_bonds(molecule: &Molecule, user_dipoles: &UserDipoleMap) -> usize {
    molecule
        .bonds
        .iter()
        .filter(|bond| user_dipoles.get(bond.id) == bond_direction(molecule, bond))
        .count()
}

/// `round(correct / total * BOND_POINTS_MAX)`, halves rounding up.
/// A molecule without bonds has nothing to get wrong and earns the maximum.
pub fn bond_points(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return BOND_POINTS_MAX;
    }
    let max = BOND_POINTS_MAX as usize;
    ((2 * correct * max + total) / (2 * total)) as u32
}

/// Per-bond grading shown once the round is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BondVerdict {
    pub bond: BondId,
    pub expected: DipoleDirection,
    pub chosen: DipoleDirection,
    pub correct: bool,
}

pub fn bond_verdicts(molecule: &Molecule, user_dipoles: &UserDipoleMap) -> Vec<BondVerdict> {
    molecule
        .bonds
        .iter()
        .map(|bond| {
            let expected = bond_direction(molecule, bond);
            let chosen = user_dipoles.get(bond.id);
            BondVerdict {
                bond: bond.id,
                expected,
                chosen,
                correct: expected == chosen,
            }
        })
        .collect()
}

/// Closing line for the game-over screen.
pub fn final_verdict(total: u32) -> &'static str {
    if total > WIZARD_THRESHOLD {
        "You're a chemistry wizard!"
    } else {
        "Good effort! Keep practicing vectors."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn molecule(id: &str) -> Molecule {
        Catalog::load().unwrap().find(id).unwrap().clone()
    }

    fn all(molecule: &Molecule, direction: DipoleDirection) -> UserDipoleMap {
        molecule.bonds.iter().map(|b| (b.id, direction)).collect()
    }

    fn bondless() -> Molecule {
        let mut m = molecule("h2o");
        m.id = "he".into();
        m.bonds.clear();
        m
    }

    #[test]
    fn water_all_wrong() {
        let water = molecule("h2o");
        let dipoles = all(&water, DipoleDirection::AToB);
        let s = score(&water, &dipoles, false, 45, false);
        assert_eq!(s, RoundScore::ZERO);
        assert_eq!(s.total(), 0);
    }

    #[test]
    fn water_all_right() {
        let water = molecule("h2o");
        let dipoles = all(&water, DipoleDirection::BToA);
        let s = score(&water, &dipoles, true, 45, false);
        assert_eq!(
            s,
            RoundScore { polarity_points: 50, bond_points: 50, time_bonus: 45 }
        );
        assert_eq!(s.total(), 145);
    }

    #[test]
    fn carbon_dioxide_all_right() {
        let co2 = molecule("co2");
        let dipoles = all(&co2, DipoleDirection::AToB);
        let s = score(&co2, &dipoles, false, 30, false);
        assert_eq!(s.total(), 130);
    }

    #[test]
    fn right_arrows_wrong_call_keeps_bond_points_only() {
        let water = molecule("h2o");
        let dipoles = all(&water, DipoleDirection::BToA);
        let s = score(&water, &dipoles, false, 45, false);
        assert_eq!(s, RoundScore { polarity_points: 0, bond_points: 50, time_bonus: 0 });
    }

    #[test]
    fn partial_bonds_round_to_nearest() {
        let bf3 = molecule("bf3");
        let mut dipoles = UserDipoleMap::new();
        dipoles.set(BondId(0), DipoleDirection::AToB);
        assert_eq!(count_correct_bonds(&bf3, &dipoles), 1);
        assert_eq!(score(&bf3, &dipoles, false, 10, false).bond_points, 17);

        dipoles.set(BondId(1), DipoleDirection::AToB);
        assert_eq!(score(&bf3, &dipoles, false, 10, false).bond_points, 33);
    }

    #[test]
    fn halves_round_up() {
        assert_eq!(bond_points(1, 4), 13);
        assert_eq!(bond_points(3, 4), 38);
        assert_eq!(bond_points(1, 2), 25);
        assert_eq!(bond_points(0, 3), 0);
        assert_eq!(bond_points(3, 3), 50);
    }

    #[test]
    fn untouched_nonpolar_bond_counts_as_correct() {
        // C–H in chloroform is below the threshold, so leaving it alone is right.
        let chcl3 = molecule("chcl3");
        let dipoles = UserDipoleMap::new();
        assert_eq!(count_correct_bonds(&chcl3, &dipoles), 1);
        assert_eq!(bond_points(1, 4), score(&chcl3, &dipoles, true, 0, false).bond_points);
    }

    #[test]
    fn stray_bond_ids_are_ignored() {
        let water = molecule("h2o");
        let mut dipoles = all(&water, DipoleDirection::BToA);
        dipoles.set(BondId(99), DipoleDirection::AToB);
        assert_eq!(score(&water, &dipoles, true, 0, false).bond_points, 50);
    }

    #[test]
    fn verdicts_report_each_bond() {
        let water = molecule("h2o");
        let mut dipoles = UserDipoleMap::new();
        dipoles.set(BondId(0), DipoleDirection::BToA);
        dipoles.set(BondId(1), DipoleDirection::AToB);
        let verdicts = bond_verdicts(&water, &dipoles);
        assert_eq!(
            verdicts,
            vec![
                BondVerdict {
                    bond: BondId(0),
                    expected: DipoleDirection::BToA,
                    chosen: DipoleDirection::BToA,
                    correct: true,
                },
                BondVerdict {
                    bond: BondId(1),
                    expected: DipoleDirection::BToA,
                    chosen: DipoleDirection::AToB,
                    correct: false,
                },
            ]
        );
    }

    #[test]
    fn final_verdict_threshold() {
        assert_eq!(final_verdict(401), "You're a chemistry wizard!");
        assert_eq!(final_verdict(400), "Good effort! Keep practicing vectors.");
    }

    proptest! {
        #[test]
        fn timeout_always_scores_zero(
            index in 0usize..8,
            polar in any::<bool>(),
            time_left in 0u32..=60,
            picks in proptest::collection::vec(0u8..3, 0..6),
        ) {
            let catalog = Catalog::load().unwrap();
            let m = catalog.get(index).unwrap();
            let dipoles: UserDipoleMap = picks
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    let d = match p {
                        0 => DipoleDirection::None,
                        1 => DipoleDirection::AToB,
                        _ => DipoleDirection::BToA,
                    };
                    (BondId(i as u32), d)
                })
                .collect();
            prop_assert_eq!(score(m, &dipoles, polar, time_left, true), RoundScore::ZERO);
        }

        #[test]
        fn bondless_molecules_get_full_bond_points(polar in any::<bool>(), time_left in 0u32..=60) {
            let m = bondless();
            prop_assert_eq!(score(&m, &UserDipoleMap::new(), polar, time_left, false).bond_points, 50);
        }

        #[test]
        fn bond_points_stay_in_range(total in 1usize..12, correct_frac in 0.0f64..=1.0) {
            let correct = ((total as f64) * correct_frac).floor() as usize;
            let points = bond_points(correct.min(total), total);
            prop_assert!(points <= BOND_POINTS_MAX);
        }
    }
}

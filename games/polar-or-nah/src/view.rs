//! Snapshot of everything the presentation layer draws.
//!
//! Built from the controller after any state change and sent to the host as
//! JSON. Answer-revealing fields (`is_polar`, per-bond verdicts) are only
//! filled in once the round is over; electronegativity and the hint only
//! while their power-up is on.

use serde::Serialize;

use crate::catalog::{BondId, Molecule};
use crate::controller::PhaseController;
use crate::dipole::DipoleDirection;
use crate::elements::{style_for, ElementStyle};
use crate::explain::{Explanation, ExplanationService};
use crate::phase::GamePhase;
use crate::scoring::{bond_verdicts, final_verdict, BondVerdict, RoundScore};

/// Net dipoles shorter than this are not drawn.
pub const NET_DIPOLE_MIN: f32 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundView<'a> {
    pub phase: GamePhase,
    /// One-based round number for the HUD.
    pub round: usize,
    pub total_rounds: usize,
    pub score: u32,
    pub round_score: RoundScore,
    pub time_left: u32,
    pub low_time: bool,
    pub en_scanner: bool,
    pub show_hint: bool,
    pub molecule: Option<MoleculeView<'a>>,
    pub user_dipoles: Vec<DipoleEntry>,
    pub verdicts: Option<Vec<BondVerdict>>,
    pub explanation: Option<&'a Explanation>,
    pub loading: bool,
    pub last_guess_correct: bool,
    /// Closing line, game-over screen only.
    pub verdict: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoleculeView<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub formula: &'a str,
    pub geometry: &'a str,
    pub difficulty: &'static str,
    pub description: Option<&'a str>,
    pub hint: Option<&'a str>,
    pub is_polar: Option<bool>,
    /// Resultant arrow, shown in RESULT for polar molecules only.
    pub net_dipole: Option<[f32; 3]>,
    pub atoms: Vec<AtomView<'a>>,
    pub bonds: Vec<BondView>,
    pub lone_pairs: Vec<LonePairView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtomView<'a> {
    pub id: usize,
    pub element: &'a str,
    pub position: [f32; 3],
    pub style: ElementStyle,
    pub electronegativity: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BondView {
    pub id: BondId,
    pub a: usize,
    pub b: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LonePairView {
    pub id: usize,
    pub position: [f32; 3],
    pub rotation: Option<[f32; 3]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DipoleEntry {
    pub bond: BondId,
    pub direction: DipoleDirection,
}

impl<'a> RoundView<'a> {
    pub fn capture<S: ExplanationService>(ctl: &'a PhaseController<S>) -> Self {
        let phase = ctl.phase();
        let revealed = phase == GamePhase::Result;
        let molecule = ctl.molecule();

        let user_dipoles = molecule
            .map(|m| {
                m.bonds
                    .iter()
                    .map(|bond| DipoleEntry {
                        bond: bond.id,
                        direction: ctl.dipole(bond.id),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let verdicts = match molecule {
            Some(m) if revealed => Some(bond_verdicts(m, ctl.dipoles())),
            _ => None,
        };

        Self {
            phase,
            round: ctl.round() + 1,
            total_rounds: ctl.total_rounds(),
            score: ctl.score(),
            round_score: ctl.round_score(),
            time_left: ctl.time_left(),
            low_time: ctl.is_low_time(),
            en_scanner: ctl.en_scanner(),
            show_hint: ctl.show_hint(),
            molecule: molecule.map(|m| MoleculeView::new(m, ctl.en_scanner(), ctl.show_hint(), revealed)),
            user_dipoles,
            verdicts,
            explanation: ctl.explanation(),
            loading: ctl.is_loading(),
            last_guess_correct: ctl.last_guess_correct(),
            verdict: (phase == GamePhase::GameOver).then(|| final_verdict(ctl.score())),
        }
    }
}

impl<'a> MoleculeView<'a> {
    fn new(molecule: &'a Molecule, en_scanner: bool, show_hint: bool, revealed: bool) -> Self {
        Self {
            id: &molecule.id,
            name: &molecule.name,
            formula: &molecule.formula,
            geometry: &molecule.geometry,
            difficulty: molecule.difficulty.label(),
            description: molecule.description.as_deref(),
            hint: show_hint.then_some(molecule.hint.as_str()),
            is_polar: revealed.then_some(molecule.is_polar),
            net_dipole: Some(molecule.net_dipole())
                .filter(|v| revealed && molecule.is_polar && v.length() >= NET_DIPOLE_MIN)
                .map(|v| v.to_array()),
            atoms: molecule
                .atoms
                .iter()
                .map(|atom| AtomView {
                    id: atom.id,
                    element: &atom.element,
                    position: atom.position.to_array(),
                    style: style_for(&atom.element),
                    electronegativity: en_scanner.then_some(atom.electronegativity),
                })
                .collect(),
            bonds: molecule
                .bonds
                .iter()
                .map(|bond| BondView {
                    id: bond.id,
                    a: bond.a,
                    b: bond.b,
                })
                .collect(),
            lone_pairs: molecule
                .lone_pairs
                .iter()
                .map(|lp| LonePairView {
                    id: lp.id,
                    position: lp.position.to_array(),
                    rotation: lp.rotation.map(|r| r.to_array()),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::explain::OfflineExplainer;
    use crate::phase::{Action, PowerUp};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn controller() -> PhaseController<OfflineExplainer> {
        PhaseController::new(Catalog::load().unwrap(), OfflineExplainer)
    }

    #[test]
    fn menu_has_no_molecule() {
        let ctl = controller();
        let view = RoundView::capture(&ctl);
        assert_eq!(view.phase, GamePhase::Menu);
        assert!(view.molecule.is_none());
        assert!(view.user_dipoles.is_empty());
        assert_eq!(view.verdict, None);
    }

    #[test]
    fn setup_hides_answers_and_power_up_data() {
        let mut ctl = controller();
        ctl.dispatch(Action::Start);
        let view = RoundView::capture(&ctl);
        let molecule = view.molecule.unwrap();
        assert_eq!(molecule.name, "Water");
        assert_eq!(molecule.is_polar, None);
        assert_eq!(molecule.hint, None);
        assert!(molecule.atoms.iter().all(|a| a.electronegativity.is_none()));
        assert_eq!(molecule.atoms[0].style.color, "#FF0D0D");
        assert_eq!(view.verdicts, None);
        assert_eq!(view.round, 1);
        assert_eq!(view.total_rounds, 8);
    }

    #[test]
    fn power_ups_expose_data() {
        let mut ctl = controller();
        ctl.dispatch(Action::Start);
        ctl.dispatch(Action::TogglePowerUp(PowerUp::EnScanner));
        ctl.dispatch(Action::TogglePowerUp(PowerUp::Hint));
        let view = RoundView::capture(&ctl);
        let molecule = view.molecule.unwrap();
        assert_eq!(molecule.atoms[0].electronegativity, Some(3.44));
        assert!(molecule.hint.is_some());
    }

    #[test]
    fn result_reveals_verdicts() {
        let mut ctl = controller();
        ctl.dispatch(Action::Start);
        ctl.dispatch(Action::BondClick(BondId(0)));
        ctl.dispatch(Action::BondClick(BondId(0)));
        ctl.dispatch(Action::Advance);
        ctl.dispatch(Action::Guess { polar: true });

        let view = RoundView::capture(&ctl);
        assert_eq!(view.molecule.as_ref().and_then(|m| m.is_polar), Some(true));
        let verdicts = view.verdicts.unwrap();
        assert!(verdicts[0].correct);
        assert!(!verdicts[1].correct);
        assert_eq!(view.explanation.map(|e| e.remark.as_str()), Some("Correct!"));
    }

    #[test]
    fn net_dipole_only_for_polar_results() {
        let mut ctl = controller();
        ctl.dispatch(Action::Start);
        assert_eq!(RoundView::capture(&ctl).molecule.unwrap().net_dipole, None);

        ctl.dispatch(Action::Advance);
        ctl.dispatch(Action::Guess { polar: true });
        let arrow = RoundView::capture(&ctl).molecule.unwrap().net_dipole.unwrap();
        assert!(arrow[1] > 1.0);

        ctl.dispatch(Action::Next);
        ctl.dispatch(Action::Advance);
        ctl.dispatch(Action::Guess { polar: false });
        let co2 = RoundView::capture(&ctl).molecule.unwrap();
        assert_eq!(co2.id, "co2");
        assert_eq!(co2.net_dipole, None);
    }

    #[test]
    fn serializes_to_host_shape() {
        let mut ctl = controller();
        ctl.dispatch(Action::Start);
        ctl.dispatch(Action::BondClick(BondId(1)));
        let value = serde_json::to_value(RoundView::capture(&ctl)).unwrap();

        assert_eq!(value["phase"], json!("BOND_SETUP"));
        assert_eq!(value["time_left"], json!(60));
        assert_eq!(value["low_time"], json!(false));
        assert_eq!(
            value["user_dipoles"],
            json!([
                { "bond": 0, "direction": "none" },
                { "bond": 1, "direction": "a_to_b" }
            ])
        );
        assert_eq!(value["molecule"]["bonds"][0], json!({ "id": 0, "a": 0, "b": 1 }));
        assert_eq!(value["molecule"]["difficulty"], json!("Easy"));
    }

    #[test]
    fn game_over_carries_verdict() {
        let mut ctl = controller();
        ctl.dispatch(Action::Start);
        for _ in 0..ctl.total_rounds() {
            for _ in 0..61 * 60 {
                ctl.advance_clock(1.0 / 60.0);
            }
            ctl.dispatch(Action::Next);
        }
        let view = RoundView::capture(&ctl);
        assert_eq!(view.phase, GamePhase::GameOver);
        assert!(view.molecule.is_none());
        assert_eq!(view.verdict, Some("Good effort! Keep practicing vectors."));
    }
}

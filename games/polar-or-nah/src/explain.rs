//! Explanation service: flavor text for the result screen.
//!
//! The service is asynchronous. The controller files a request tagged with
//! the round's ticket and polls for the reply on later frames. When the
//! service is unavailable or fails, the controller falls back to text
//! derived from the molecule, so the game stays playable offline.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Molecule;

/// Remark and one-line explanation shown after a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Explanation {
    pub remark: String,
    pub explanation: String,
}

impl Explanation {
    pub fn new(remark: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            remark: remark.into(),
            explanation: explanation.into(),
        }
    }

    /// Fixed text for a round lost to the clock.
    pub fn time_up() -> Self {
        Self::new("Time's Up!", "The clock ran out before you could decide.")
    }

    /// Local text used whenever the service cannot answer.
    pub fn fallback(molecule: &Molecule, was_correct: bool) -> Self {
        if was_correct {
            let feature = if molecule.is_polar { "net dipole" } else { "symmetry" };
            Self::new(
                "Correct!",
                format!("Great job identifying the {} of {}.", feature, molecule.name),
            )
        } else {
            let reason = if molecule.is_polar {
                "The asymmetry creates a net dipole."
            } else {
                "The symmetry cancels out individual dipoles."
            };
            Self::new(
                "Incorrect!",
                format!("Look closely at the {} geometry. {}", molecule.geometry, reason),
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExplainError {
    #[error("explanation service unavailable: {0}")]
    Unavailable(String),

    #[error("explanation service failed: {0}")]
    Failed(String),
}

/// Identifies the round a request belongs to. Replies carrying an older
/// ticket are stale and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticket(pub u32);

/// What the service is told about the round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplanationRequest {
    pub ticket: Ticket,
    pub molecule_id: String,
    pub name: String,
    pub formula: String,
    pub geometry: String,
    pub is_polar: bool,
    pub was_correct: bool,
}

impl ExplanationRequest {
    pub fn new(ticket: Ticket, molecule: &Molecule, was_correct: bool) -> Self {
        Self {
            ticket,
            molecule_id: molecule.id.clone(),
            name: molecule.name.clone(),
            formula: molecule.formula.clone(),
            geometry: molecule.geometry.clone(),
            is_polar: molecule.is_polar,
            was_correct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplanationReply {
    pub ticket: Ticket,
    pub outcome: Result<Explanation, ExplainError>,
}

/// A source of round feedback.
pub trait ExplanationService {
    /// File a request. `Err` means the service cannot take it at all.
    fn request(&mut self, request: ExplanationRequest) -> Result<(), ExplainError>;

    /// Next finished reply, if any.
    fn poll(&mut self) -> Option<ExplanationReply>;
}

/// Service with no backend. Every request is refused, so every round uses
/// the local fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineExplainer;

impl ExplanationService for OfflineExplainer {
    fn request(&mut self, _request: ExplanationRequest) -> Result<(), ExplainError> {
        Err(ExplainError::Unavailable("no credential configured".into()))
    }

    fn poll(&mut self) -> Option<ExplanationReply> {
        None
    }
}

/// Remark used when a remote reply omits one.
const DEFAULT_REMARK_CORRECT: &str = "Well Done!";
const DEFAULT_REMARK_WRONG: &str = "Oops!";
/// Explanation used when a remote reply omits one.
const DEFAULT_EXPLANATION: &str = "Review the molecular geometry and bond vectors.";

/// Reply as the host sends it back. Every field but the ticket is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteReply {
    pub ticket: Ticket,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Service backed by the browser host.
///
/// Requests are queued for the host to pick up (it owns the network call and
/// the credential). Replies come back through `deliver`. While the host has
/// not declared itself online, requests are refused.
#[derive(Debug, Default)]
pub struct BridgeExplainer {
    online: bool,
    outbox: Vec<ExplanationRequest>,
    /// Ticket → was_correct, needed to pick default remarks.
    in_flight: HashMap<Ticket, bool>,
    inbox: VecDeque<ExplanationReply>,
}

impl BridgeExplainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_online(&mut self, online: bool) {
        if self.online != online {
            log::info!("explanation service {}", if online { "online" } else { "offline" });
        }
        self.online = online;
        if !online {
            self.abandon_in_flight();
        }
    }

    /// Fail every request still waiting on the host.
    fn abandon_in_flight(&mut self) {
        let mut tickets: Vec<Ticket> = self.in_flight.drain().map(|(ticket, _)| ticket).collect();
        tickets.sort();
        for ticket in tickets {
            self.inbox.push_back(ExplanationReply {
                ticket,
                outcome: Err(ExplainError::Unavailable("host went offline".into())),
            });
        }
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Requests waiting for the host, oldest first.
    pub fn take_requests(&mut self) -> Vec<ExplanationRequest> {
        std::mem::take(&mut self.outbox)
    }

    /// Accept a reply from the host. Returns false for tickets never issued
    /// or already answered.
    pub fn deliver(&mut self, reply: RemoteReply) -> bool {
        let Some(was_correct) = self.in_flight.remove(&reply.ticket) else {
            log::debug!("ignoring reply for unknown ticket {:?}", reply.ticket);
            return false;
        };

        let outcome = match reply.error {
            Some(error) => Err(ExplainError::Failed(error)),
            None => {
                let remark = non_empty(reply.remark).unwrap_or_else(|| {
                    if was_correct { DEFAULT_REMARK_CORRECT } else { DEFAULT_REMARK_WRONG }.to_string()
                });
                let explanation =
                    non_empty(reply.explanation).unwrap_or_else(|| DEFAULT_EXPLANATION.to_string());
                Ok(Explanation { remark, explanation })
            }
        };

        self.inbox.push_back(ExplanationReply {
            ticket: reply.ticket,
            outcome,
        });
        true
    }
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

impl ExplanationService for BridgeExplainer {
    fn request(&mut self, request: ExplanationRequest) -> Result<(), ExplainError> {
        if !self.online {
            return Err(ExplainError::Unavailable("host has no explanation backend".into()));
        }
        self.in_flight.insert(request.ticket, request.was_correct);
        self.outbox.push(request);
        Ok(())
    }

    fn poll(&mut self) -> Option<ExplanationReply> {
        self.inbox.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use pretty_assertions::assert_eq;

    fn molecule(id: &str) -> Molecule {
        Catalog::load().unwrap().find(id).unwrap().clone()
    }

    fn reply(ticket: u32) -> RemoteReply {
        RemoteReply {
            ticket: Ticket(ticket),
            remark: None,
            explanation: None,
            error: None,
        }
    }

    #[test]
    fn fallback_correct_polar() {
        let e = Explanation::fallback(&molecule("h2o"), true);
        assert_eq!(e, Explanation::new("Correct!", "Great job identifying the net dipole of Water."));
    }

    #[test]
    fn fallback_correct_nonpolar() {
        let e = Explanation::fallback(&molecule("co2"), true);
        assert_eq!(e.explanation, "Great job identifying the symmetry of Carbon Dioxide.");
    }

    #[test]
    fn fallback_wrong_mentions_geometry() {
        let e = Explanation::fallback(&molecule("bf3"), false);
        assert_eq!(
            e,
            Explanation::new(
                "Incorrect!",
                "Look closely at the Trigonal Planar geometry. The symmetry cancels out individual dipoles."
            )
        );
        let e = Explanation::fallback(&molecule("nh3"), false);
        assert_eq!(
            e.explanation,
            "Look closely at the Trigonal Pyramidal geometry. The asymmetry creates a net dipole."
        );
    }

    #[test]
    fn offline_refuses_everything() {
        let mut svc = OfflineExplainer;
        let req = ExplanationRequest::new(Ticket(1), &molecule("h2o"), true);
        assert!(matches!(svc.request(req), Err(ExplainError::Unavailable(_))));
        assert_eq!(svc.poll(), None);
    }

    #[test]
    fn bridge_refuses_while_offline() {
        let mut svc = BridgeExplainer::new();
        let req = ExplanationRequest::new(Ticket(1), &molecule("h2o"), true);
        assert!(svc.request(req).is_err());
        assert!(svc.take_requests().is_empty());
    }

    #[test]
    fn bridge_round_trip() {
        let mut svc = BridgeExplainer::new();
        svc.set_online(true);
        svc.request(ExplanationRequest::new(Ticket(3), &molecule("co2"), false)).unwrap();

        let sent = svc.take_requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].name, "Carbon Dioxide");
        assert!(!sent[0].was_correct);

        let mut r = reply(3);
        r.remark = Some("Dipoles cancelled you.".into());
        r.explanation = Some("Two equal pulls in a line cancel.".into());
        assert!(svc.deliver(r));

        assert_eq!(
            svc.poll(),
            Some(ExplanationReply {
                ticket: Ticket(3),
                outcome: Ok(Explanation::new("Dipoles cancelled you.", "Two equal pulls in a line cancel.")),
            })
        );
        assert_eq!(svc.poll(), None);
    }

    #[test]
    fn bridge_fills_missing_fields() {
        let mut svc = BridgeExplainer::new();
        svc.set_online(true);
        svc.request(ExplanationRequest::new(Ticket(1), &molecule("h2o"), true)).unwrap();
        svc.request(ExplanationRequest::new(Ticket(2), &molecule("h2o"), false)).unwrap();

        let mut blank = reply(1);
        blank.remark = Some("   ".into());
        svc.deliver(blank);
        svc.deliver(reply(2));

        let first = svc.poll().unwrap().outcome.unwrap();
        assert_eq!(first, Explanation::new("Well Done!", "Review the molecular geometry and bond vectors."));
        let second = svc.poll().unwrap().outcome.unwrap();
        assert_eq!(second.remark, "Oops!");
    }

    #[test]
    fn bridge_reports_host_errors() {
        let mut svc = BridgeExplainer::new();
        svc.set_online(true);
        svc.request(ExplanationRequest::new(Ticket(5), &molecule("h2o"), true)).unwrap();
        let mut r = reply(5);
        r.error = Some("quota exceeded".into());
        svc.deliver(r);
        assert_eq!(
            svc.poll().unwrap().outcome,
            Err(ExplainError::Failed("quota exceeded".into()))
        );
    }

    #[test]
    fn bridge_drops_unknown_and_repeated_tickets() {
        let mut svc = BridgeExplainer::new();
        svc.set_online(true);
        assert!(!svc.deliver(reply(9)));

        svc.request(ExplanationRequest::new(Ticket(1), &molecule("h2o"), true)).unwrap();
        assert!(svc.deliver(reply(1)));
        assert!(!svc.deliver(reply(1)));
        assert!(svc.poll().is_some());
        assert!(svc.poll().is_none());
    }

    #[test]
    fn going_offline_fails_requests_in_flight() {
        let mut svc = BridgeExplainer::new();
        svc.set_online(true);
        svc.request(ExplanationRequest::new(Ticket(2), &molecule("h2o"), true)).unwrap();
        svc.request(ExplanationRequest::new(Ticket(1), &molecule("co2"), false)).unwrap();
        svc.take_requests();

        svc.set_online(false);
        let tickets: Vec<Ticket> = std::iter::from_fn(|| svc.poll())
            .map(|reply| {
                assert!(matches!(reply.outcome, Err(ExplainError::Unavailable(_))));
                reply.ticket
            })
            .collect();
        assert_eq!(tickets, vec![Ticket(1), Ticket(2)]);

        // A late answer for an abandoned ticket is not applied twice.
        assert!(!svc.deliver(reply(1)));
    }

    #[test]
    fn remote_reply_parses_partial_json() {
        let r: RemoteReply = serde_json::from_str(r#"{ "ticket": 4, "remark": "Spot on!" }"#).unwrap();
        assert_eq!(r.ticket, Ticket(4));
        assert_eq!(r.remark.as_deref(), Some("Spot on!"));
        assert_eq!(r.explanation, None);
    }
}

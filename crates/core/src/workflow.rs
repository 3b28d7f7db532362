//! # Approval Workflow Engine
//!
//! A table-driven status transition engine shared by events and space
//! bookings. A [`Workflow`] holds the legal transitions for one item kind;
//! [`Workflow::check`] evaluates a proposed transition for an actor and
//! either resolves it (with the comment to record in the audit log) or
//! refuses it with a [`Denial`].
//!
//! Policy refusals are ordinary values, not errors: a denied transition
//! leaves the item, its audit log, and every aggregate untouched. Callers
//! perform the actual write only after a successful check.

use std::fmt;

use crate::errors::{CampusError, CampusResult};
use crate::models::booking::BookingStatus;
use crate::models::event::EventStatus;
use crate::models::principal::Principal;
use uuid::Uuid;

/// Human-readable reason a workflow operation was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial(String);

impl Denial {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    pub fn reason(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a guarded workflow operation: either the mutation was applied,
/// or policy refused it and no state changed.
#[derive(Debug)]
pub enum Outcome<T> {
    Applied(T),
    Denied(Denial),
}

impl<T> Outcome<T> {
    pub fn denied(reason: impl Into<String>) -> Self {
        Outcome::Denied(Denial::new(reason))
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Outcome::Denied(_))
    }

    /// Collapse a denial into [`CampusError::Policy`] for callers that
    /// surface it directly (e.g. HTTP handlers).
    pub fn into_result(self) -> CampusResult<T> {
        match self {
            Outcome::Applied(value) => Ok(value),
            Outcome::Denied(denial) => Err(CampusError::Policy(denial.0)),
        }
    }
}

/// Who may drive a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRule {
    /// Only the item's creator.
    Creator,
    /// Only actors with moderator capability (admin or teacher).
    Moderator,
    /// The creator or a moderator.
    CreatorOrModerator,
}

/// Comment requirements for a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentRule {
    /// Blank comments fall back to the given default phrase.
    Optional(&'static str),
    /// A non-blank comment must be supplied; the message is the denial text.
    Required(&'static str),
}

/// One legal edge of the transition table.
#[derive(Debug, Clone, Copy)]
pub struct TransitionRule<S> {
    pub from: S,
    pub to: S,
    pub actor: ActorRule,
    pub comment: CommentRule,
    /// Verb used in denial messages ("submit", "approve", ...).
    pub verb: &'static str,
}

/// A checked transition, ready to be written: the expected current status,
/// the target status, and the comment to record in the audit log.
#[derive(Debug, Clone)]
pub struct ResolvedTransition<S> {
    pub from: S,
    pub to: S,
    pub comment: String,
}

/// Transition table for one approvable item kind.
#[derive(Debug, Clone)]
pub struct Workflow<S> {
    name: &'static str,
    rules: Vec<TransitionRule<S>>,
}

impl<S> Workflow<S>
where
    S: Copy + Eq + fmt::Display,
{
    pub fn new(name: &'static str, rules: Vec<TransitionRule<S>>) -> Self {
        Self { name, rules }
    }

    /// Evaluate a proposed transition. Returns the resolved transition on
    /// success; otherwise the denial explaining which guard refused it.
    ///
    /// Guards run in order: legality of (current -> to), then the actor
    /// rule, then the comment rule.
    pub fn check(
        &self,
        current: S,
        to: S,
        actor: &Principal,
        creator: Option<Uuid>,
        comment: Option<&str>,
    ) -> Result<ResolvedTransition<S>, Denial> {
        let rule = match self
            .rules
            .iter()
            .find(|r| r.from == current && r.to == to)
        {
            Some(rule) => rule,
            None => {
                return Err(Denial::new(format!(
                    "{} cannot move from {} to {}",
                    self.name, current, to
                )));
            }
        };

        let is_creator = creator.is_some_and(|c| c == actor.id);
        let allowed = match rule.actor {
            ActorRule::Creator => is_creator,
            ActorRule::Moderator => actor.is_moderator(),
            ActorRule::CreatorOrModerator => is_creator || actor.is_moderator(),
        };
        if !allowed {
            let who = match rule.actor {
                ActorRule::Creator => "the creator",
                ActorRule::Moderator => "admin or teacher",
                ActorRule::CreatorOrModerator => "the creator, admin or teacher",
            };
            return Err(Denial::new(format!("Only {} can {}", who, rule.verb)));
        }

        let trimmed = comment.map(str::trim).filter(|c| !c.is_empty());
        let comment = match rule.comment {
            CommentRule::Optional(default) => trimmed.unwrap_or(default).to_string(),
            CommentRule::Required(message) => match trimmed {
                Some(c) => c.to_string(),
                None => return Err(Denial::new(message)),
            },
        };

        Ok(ResolvedTransition {
            from: current,
            to,
            comment,
        })
    }
}

/// Transition table for events: Draft -> Pending -> Approved | Rejected.
pub fn event_workflow() -> Workflow<EventStatus> {
    Workflow::new(
        "event",
        vec![
            TransitionRule {
                from: EventStatus::Draft,
                to: EventStatus::Pending,
                actor: ActorRule::Creator,
                comment: CommentRule::Optional("Submitted for approval"),
                verb: "submit",
            },
            TransitionRule {
                from: EventStatus::Pending,
                to: EventStatus::Approved,
                actor: ActorRule::Moderator,
                comment: CommentRule::Optional("Approved"),
                verb: "approve",
            },
            TransitionRule {
                from: EventStatus::Pending,
                to: EventStatus::Rejected,
                actor: ActorRule::Moderator,
                comment: CommentRule::Required("Rejection reason is required"),
                verb: "reject",
            },
        ],
    )
}

/// Transition table for space bookings: Pending -> Approved | Rejected,
/// Cancelled from Pending or Approved.
pub fn booking_workflow() -> Workflow<BookingStatus> {
    Workflow::new(
        "booking",
        vec![
            TransitionRule {
                from: BookingStatus::Pending,
                to: BookingStatus::Approved,
                actor: ActorRule::Moderator,
                comment: CommentRule::Optional("Approved"),
                verb: "approve",
            },
            TransitionRule {
                from: BookingStatus::Pending,
                to: BookingStatus::Rejected,
                actor: ActorRule::Moderator,
                comment: CommentRule::Required("Rejection reason is required"),
                verb: "reject",
            },
            TransitionRule {
                from: BookingStatus::Pending,
                to: BookingStatus::Cancelled,
                actor: ActorRule::CreatorOrModerator,
                comment: CommentRule::Optional("Cancelled by user"),
                verb: "cancel",
            },
            TransitionRule {
                from: BookingStatus::Approved,
                to: BookingStatus::Cancelled,
                actor: ActorRule::CreatorOrModerator,
                comment: CommentRule::Optional("Cancelled by user"),
                verb: "cancel",
            },
        ],
    )
}

//! Stack-mode message routing.
//!
//! An ordered table of (keyword set, role) pairs evaluated in fixed priority
//! order; the first matching category wins and no-match falls through to the
//! implementation agent. Adding a category is a table edit, not new
//! branching.

use crate::domain::models::StackRole;

/// Routing rules in priority order. Matching is case-insensitive substring
/// containment.
const ROUTING_RULES: &[(&[&str], StackRole)] = &[
    (
        &["design", "architect", "structure", "component"],
        StackRole::Architect,
    ),
    (
        &["requirement", "feature", "user story", "acceptance"],
        StackRole::Product,
    ),
    (
        &["review", "check", "quality", "standards"],
        StackRole::Reviewer,
    ),
    (&["test", "build", "ci", "coverage"], StackRole::BuildTest),
    (
        &["deploy", "infrastructure", "docker", "kubernetes"],
        StackRole::Infra,
    ),
];

/// Role selected when no category keyword matches.
pub const DEFAULT_ROLE: StackRole = StackRole::Implementation;

/// Route a message to exactly one stack role.
///
/// Never ambiguous and never fails: the table is scanned in priority order
/// and the default role absorbs everything else.
pub fn route_message(message: &str) -> StackRole {
    let lowered = message.to_lowercase();
    for (keywords, role) in ROUTING_RULES {
        if keywords.iter().any(|kw| lowered.contains(kw)) {
            return *role;
        }
    }
    DEFAULT_ROLE
}

//! Routing after the critique stage.
//!
//! The only branch in the workflow. Kept as a pure function so the loop's
//! termination rules can be checked without running any stage.

use crate::state::Grade;

/// Where the workflow goes after a critique.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The draft passed; return it.
    End,
    /// The draft failed and revisions remain.
    Revise,
    /// The draft failed and the revision cap is reached; return it unvalidated.
    Exhausted,
}

impl Transition {
    /// Key used for the conditional edge out of the critique node.
    pub fn as_key(&self) -> &'static str {
        match self {
            Transition::End => "end",
            Transition::Revise => "revise",
            Transition::Exhausted => "exhausted",
        }
    }
}

/// Decides the next step from the critic's grade and the revisions made so far.
///
/// `Unset` never triggers a revision; it routes to `Exhausted`.
pub fn route_after_critique(grade: Grade, revision_count: u32, max_revisions: u32) -> Transition {
    match grade {
        Grade::Pass => Transition::End,
        Grade::Fail if revision_count < max_revisions => Transition::Revise,
        Grade::Fail | Grade::Unset => Transition::Exhausted,
    }
}

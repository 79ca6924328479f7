//! Protocol statements exchanged in talk and whisper.
//!
//! - `parser`: text grammar turning a raw talk string into [`Content`].
//! - `claim`: what a parsed statement asserts about its speaker.

mod claim;
mod parser;

pub use claim::{Claim, ClaimKind};
pub use parser::{ContentParser, ParseError, ProtocolParser};

use crate::model::{Agent, Role, Species};
use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content {
    Comingout {
        subject: Option<Agent>,
        target: Agent,
        role: Role,
    },
    Divined {
        subject: Option<Agent>,
        target: Agent,
        result: Species,
    },
    Identified {
        subject: Option<Agent>,
        target: Agent,
        result: Species,
    },
    Vote {
        subject: Option<Agent>,
        target: Agent,
    },
    Skip,
    Over,
}

impl Content {
    pub const fn comingout(target: Agent, role: Role) -> Self {
        Content::Comingout {
            subject: None,
            target,
            role,
        }
    }

    pub const fn divined(target: Agent, result: Species) -> Self {
        Content::Divined {
            subject: None,
            target,
            result,
        }
    }

    pub const fn identified(target: Agent, result: Species) -> Self {
        Content::Identified {
            subject: None,
            target,
            result,
        }
    }

    pub const fn vote(target: Agent) -> Self {
        Content::Vote {
            subject: None,
            target,
        }
    }

    pub const fn is_skip(&self) -> bool {
        matches!(self, Content::Skip | Content::Over)
    }

    /// Explicit subject, if the statement carried one.
    pub const fn subject(&self) -> Option<Agent> {
        match self {
            Content::Comingout { subject, .. }
            | Content::Divined { subject, .. }
            | Content::Identified { subject, .. }
            | Content::Vote { subject, .. } => *subject,
            Content::Skip | Content::Over => None,
        }
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(subject) = self.subject() {
            write!(f, "{subject} ")?;
        }
        match self {
            Content::Comingout { target, role, .. } => write!(f, "COMINGOUT {target} {role}"),
            Content::Divined { target, result, .. } => write!(f, "DIVINED {target} {result}"),
            Content::Identified { target, result, .. } => {
                write!(f, "IDENTIFIED {target} {result}")
            }
            Content::Vote { target, .. } => write!(f, "VOTE {target}"),
            Content::Skip => f.write_str("Skip"),
            Content::Over => f.write_str("Over"),
        }
    }
}

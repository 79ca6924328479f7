use super::Content;
use crate::model::{Agent, Role, Species, Talk};

/// What a statement asserts. Never verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Claim {
    pub speaker: Agent,
    pub kind: ClaimKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimKind {
    RoleClaim { role: Role },
    DivinationResult { target: Agent, result: Species },
    IdentificationResult { target: Agent, result: Species },
    VoteDeclaration { subject: Agent, target: Agent },
}

impl Claim {
    /// Classifies a parsed statement. `Skip`/`Over` carry no claim.
    pub fn from_talk(talk: &Talk, content: &Content) -> Option<Self> {
        let speaker = talk.agent;
        let kind = match *content {
            Content::Comingout { role, .. } => ClaimKind::RoleClaim { role },
            Content::Divined { target, result, .. } => {
                ClaimKind::DivinationResult { target, result }
            }
            Content::Identified { target, result, .. } => {
                ClaimKind::IdentificationResult { target, result }
            }
            Content::Vote { subject, target } => ClaimKind::VoteDeclaration {
                subject: subject.unwrap_or(speaker),
                target,
            },
            Content::Skip | Content::Over => return None,
        };
        Some(Self { speaker, kind })
    }
}

use super::Content;
use crate::model::{Agent, Role, Species};
use thiserror::Error;

/// Turns a raw talk string into structured [`Content`].
pub trait ContentParser {
    fn parse(&self, text: &str) -> Result<Content, ParseError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty statement")]
    Empty,
    #[error("unknown topic '{0}'")]
    UnknownTopic(String),
    #[error("{topic}: missing {field}")]
    MissingField {
        topic: &'static str,
        field: &'static str,
    },
    #[error("invalid agent '{0}'")]
    InvalidAgent(String),
    #[error("invalid role '{0}'")]
    InvalidRole(String),
    #[error("invalid species '{0}'")]
    InvalidSpecies(String),
}

/// Parser for the plain-text talk protocol (`[subject] TOPIC target [value]`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtocolParser;

impl ContentParser for ProtocolParser {
    fn parse(&self, text: &str) -> Result<Content, ParseError> {
        let mut tokens = text.split_whitespace().peekable();
        let first = tokens.peek().copied().ok_or(ParseError::Empty)?;

        let subject = if first.starts_with("Agent[") {
            tokens.next();
            Some(parse_agent(first)?)
        } else {
            None
        };

        let topic = tokens.next().ok_or(ParseError::Empty)?;
        match topic.to_ascii_uppercase().as_str() {
            "SKIP" => Ok(Content::Skip),
            "OVER" => Ok(Content::Over),
            "COMINGOUT" => {
                let target = expect_agent(tokens.next(), "COMINGOUT")?;
                let raw = tokens.next().ok_or(ParseError::MissingField {
                    topic: "COMINGOUT",
                    field: "role",
                })?;
                let role = raw
                    .parse::<Role>()
                    .map_err(|_| ParseError::InvalidRole(raw.to_string()))?;
                Ok(Content::Comingout {
                    subject,
                    target,
                    role,
                })
            }
            "DIVINED" => {
                let target = expect_agent(tokens.next(), "DIVINED")?;
                let result = expect_species(tokens.next(), "DIVINED")?;
                Ok(Content::Divined {
                    subject,
                    target,
                    result,
                })
            }
            "IDENTIFIED" => {
                let target = expect_agent(tokens.next(), "IDENTIFIED")?;
                let result = expect_species(tokens.next(), "IDENTIFIED")?;
                Ok(Content::Identified {
                    subject,
                    target,
                    result,
                })
            }
            "VOTE" => {
                let target = expect_agent(tokens.next(), "VOTE")?;
                Ok(Content::Vote { subject, target })
            }
            other => Err(ParseError::UnknownTopic(other.to_string())),
        }
    }
}

fn parse_agent(raw: &str) -> Result<Agent, ParseError> {
    raw.parse::<Agent>()
        .map_err(|_| ParseError::InvalidAgent(raw.to_string()))
}

fn expect_agent(raw: Option<&str>, topic: &'static str) -> Result<Agent, ParseError> {
    let raw = raw.ok_or(ParseError::MissingField {
        topic,
        field: "target",
    })?;
    parse_agent(raw)
}

fn expect_species(raw: Option<&str>, topic: &'static str) -> Result<Species, ParseError> {
    let raw = raw.ok_or(ParseError::MissingField {
        topic,
        field: "result",
    })?;
    raw.parse::<Species>()
        .map_err(|_| ParseError::InvalidSpecies(raw.to_string()))
}

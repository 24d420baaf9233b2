//! Shorthand dart notation used by scripted scenarios.
//!
//! A visit is written as whitespace-separated darts: `S20`, `D16`, `T19`,
//! `OB` (outer bull), `DB` (double bull) and `IB` (inner bull). Numbers are
//! not range-checked here so scenarios can feed invalid darts to the engine.
use dartscore_game::RawDart;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

const DART_PATTERN: &str = r"(?i)^(?:(?P<ring>[SDT])(?P<number>\d{1,2})|(?P<bull>OB|DB|IB))$";

#[derive(Debug, Clone, Error)]
pub enum NotationError {
    #[error("unrecognised dart `{0}`")]
    UnknownDart(String),
    #[error("visit is empty")]
    EmptyVisit,
    #[error("dart pattern failed to compile: {0}")]
    Pattern(#[from] regex::Error),
}

fn dart_pattern() -> Result<&'static Regex, NotationError> {
    static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(DART_PATTERN))
        .as_ref()
        .map_err(|err| NotationError::Pattern(err.clone()))
}

pub fn parse_dart(token: &str) -> Result<RawDart, NotationError> {
    let captures = dart_pattern()?
        .captures(token.trim())
        .ok_or_else(|| NotationError::UnknownDart(token.to_string()))?;

    if let Some(bull) = captures.name("bull") {
        return Ok(match bull.as_str().to_ascii_uppercase().as_str() {
            "OB" => RawDart::new(1, 25),
            "DB" => RawDart::new(2, 25),
            _ => RawDart::new(1, 50),
        });
    }

    let multiplier = match captures
        .name("ring")
        .map(|ring| ring.as_str().to_ascii_uppercase())
        .as_deref()
    {
        Some("S") => 1,
        Some("D") => 2,
        Some("T") => 3,
        _ => return Err(NotationError::UnknownDart(token.to_string())),
    };
    let number = captures
        .name("number")
        .and_then(|number| number.as_str().parse::<u32>().ok())
        .ok_or_else(|| NotationError::UnknownDart(token.to_string()))?;
    Ok(RawDart::new(multiplier, number))
}

pub fn parse_visit(visit: &str) -> Result<Vec<RawDart>, NotationError> {
    let darts = visit
        .split_whitespace()
        .map(parse_dart)
        .collect::<Result<Vec<_>, _>>()?;
    if darts.is_empty() {
        return Err(NotationError::EmptyVisit);
    }
    Ok(darts)
}

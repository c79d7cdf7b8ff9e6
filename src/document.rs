//! Token documents and how they become timed segments.
//!
//! Token files are pipe-delimited, one token per line:
//! `fitt|para|para_first|non_verse|line|half|offset|caesura|pre|text|post|...`.
//! Consecutive tokens of the same verse half-line form one segment, and the
//! segment's timing comes from the cue with the matching `<line><half>` key.

use crate::segment::Segment;
use crate::timing::TimingTable;
use anyhow::{Context, Result, anyhow, bail};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

const MIN_TOKEN_FIELDS: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub fitt: u32,
    pub line: u32,
    pub half: String,
    pub pre_punc: String,
    pub text: String,
    pub post_punc: String,
}

impl Token {
    pub fn key(&self) -> String {
        format!("{}{}", self.line, self.half)
    }

    fn rendered(&self) -> String {
        format!("{}{}{}", self.pre_punc, self.text, self.post_punc)
    }
}

/// A readable slice of the text: one fitt, or an inclusive range of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chunk {
    Fitt(u32),
    Lines { start: u32, end: u32 },
}

impl Chunk {
    pub fn contains(&self, token: &Token) -> bool {
        match *self {
            Chunk::Fitt(fitt) => token.fitt == fitt,
            Chunk::Lines { start, end } => (start..=end).contains(&token.line),
        }
    }
}

impl FromStr for Chunk {
    type Err = anyhow::Error;

    fn from_str(spec: &str) -> Result<Self> {
        let (kind, value) = spec
            .split_once(':')
            .ok_or_else(|| anyhow!("chunk must look like fitt:N or lines:S-E, got {spec:?}"))?;
        match kind.trim() {
            "fitt" => Ok(Chunk::Fitt(
                value.trim().parse::<u32>().context("Parsing fitt number")?,
            )),
            "lines" => {
                let (start, end) = match value.split_once('-') {
                    Some((s, e)) => (s.trim().parse::<u32>()?, e.trim().parse::<u32>()?),
                    None => {
                        let line: u32 = value.trim().parse().context("Parsing line number")?;
                        (line, line)
                    }
                };
                if start > end {
                    bail!("line range {start}-{end} is reversed");
                }
                Ok(Chunk::Lines { start, end })
            }
            other => bail!("unknown chunk type {other:?}"),
        }
    }
}

pub fn load_tokens(path: &Path) -> Result<Vec<Token>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Reading token file {}", path.display()))?;
    let tokens =
        parse_tokens(&contents).with_context(|| format!("Parsing token file {}", path.display()))?;
    info!(path = %path.display(), tokens = tokens.len(), "Loaded token document");
    Ok(tokens)
}

pub fn parse_tokens(contents: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    for (line_no, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = line.split('|').collect();
        if parts.len() < MIN_TOKEN_FIELDS {
            bail!(
                "line {}: expected at least {MIN_TOKEN_FIELDS} fields, found {}",
                line_no + 1,
                parts.len()
            );
        }
        let number = |idx: usize, what: &str| -> Result<u32> {
            parts[idx]
                .trim()
                .parse::<u32>()
                .with_context(|| format!("line {}: invalid {what} {:?}", line_no + 1, parts[idx]))
        };
        tokens.push(Token {
            fitt: number(0, "fitt")?,
            line: number(4, "line number")?,
            half: parts[5].trim().to_string(),
            pre_punc: parts[8].trim().to_string(),
            text: parts[9].trim().to_string(),
            post_punc: parts[10].trim().to_string(),
        });
    }
    Ok(tokens)
}

/// Group tokens into half-line segments, attaching timing where a cue exists.
pub fn build_segments(
    tokens: &[Token],
    timing: &TimingTable,
    chunk: Option<Chunk>,
) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut current_key: Option<String> = None;

    for token in tokens {
        if chunk.is_some_and(|c| !c.contains(token)) || token.text.is_empty() {
            continue;
        }
        let key = token.key();
        if current_key.as_deref() == Some(key.as_str()) {
            if let Some(last) = segments.last_mut() {
                last.text.push(' ');
                last.text.push_str(&token.rendered());
            }
            continue;
        }
        let segment = match timing.lookup(&key) {
            Some(cue) => Segment::timed(key.clone(), token.rendered(), cue.start, Some(cue.end)),
            None => Segment::new(key.clone(), token.rendered()),
        };
        segments.push(segment);
        current_key = Some(key);
    }

    debug!(
        segments = segments.len(),
        timed = segments.iter().filter(|s| s.is_temporal()).count(),
        "Grouped tokens into segments"
    );
    segments
}

#[cfg(test)]
mod tests {
    use super::{Chunk, build_segments, parse_tokens};
    use crate::timing::{Cue, TimingTable};

    const TOKENS: &str = "\
# fitt|para|first|nonverse|line|half|offset|caesura|pre|text|post
0|1|True|False|1|a|1||| Hwæt|,
0|1|True|False|1|a|2|||we|
0|1|True|False|1|b|1|||in|
0|1|True|False|1|b|2|||gear-dagum|
0|1|True|False|2|a|1|||||
0|1|True|False|2|a|2|||þeod-cyninga|,
1|2|True|False|3|a|1|||Him|
";

    fn timing() -> TimingTable {
        let cue = |line, half: &str, start, end| Cue {
            line: Some(line),
            half: half.to_string(),
            start,
            end,
            text: String::new(),
        };
        TimingTable::from_cues(vec![cue(1, "a", 0.0, 2.0), cue(1, "b", 2.0, 4.0)])
    }

    #[test]
    fn parses_pipe_fields() {
        let tokens = parse_tokens(TOKENS).unwrap();
        assert_eq!(tokens.len(), 7);
        assert_eq!(tokens[0].text, "Hwæt");
        assert_eq!(tokens[0].post_punc, ",");
        assert_eq!(tokens[6].fitt, 1);
        assert_eq!(tokens[6].key(), "3a");
    }

    #[test]
    fn rejects_short_and_non_numeric_lines() {
        assert!(parse_tokens("0|1|2").is_err());
        let err = parse_tokens("x|1|T|F|1|a|1|||w|\n").unwrap_err();
        assert!(format!("{err:#}").contains("invalid fitt"));
    }

    #[test]
    fn groups_half_lines_and_attaches_timing() {
        let tokens = parse_tokens(TOKENS).unwrap();
        let segments = build_segments(&tokens, &timing(), None);
        let labels: Vec<_> = segments.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["1a", "1b", "2a", "3a"]);
        assert_eq!(segments[0].text, "Hwæt, we");
        assert_eq!(segments[1].start, Some(2.0));
        assert_eq!(segments[1].end, Some(4.0));
        assert_eq!(segments[2].text, "þeod-cyninga,");
        assert!(!segments[2].is_temporal());
    }

    #[test]
    fn chunk_filters_tokens() {
        let tokens = parse_tokens(TOKENS).unwrap();
        let fitt = build_segments(&tokens, &timing(), Some(Chunk::Fitt(1)));
        assert_eq!(fitt.len(), 1);
        assert_eq!(fitt[0].label, "3a");

        let lines = build_segments(&tokens, &timing(), Some("lines:2-3".parse().unwrap()));
        assert_eq!(lines.len(), 2);

        let none = build_segments(&tokens, &timing(), Some(Chunk::Fitt(9)));
        assert!(none.is_empty());
    }

    #[test]
    fn parses_chunk_specs() {
        assert_eq!("fitt:3".parse::<Chunk>().unwrap(), Chunk::Fitt(3));
        assert_eq!(
            "lines:1-11".parse::<Chunk>().unwrap(),
            Chunk::Lines { start: 1, end: 11 }
        );
        assert_eq!(
            "lines:7".parse::<Chunk>().unwrap(),
            Chunk::Lines { start: 7, end: 7 }
        );
        assert!("lines:9-2".parse::<Chunk>().is_err());
        assert!("page:2".parse::<Chunk>().is_err());
        assert!("12".parse::<Chunk>().is_err());
    }
}

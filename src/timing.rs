//! Audio timing loaded from Advanced SubStation Alpha (`.ass`) files.
//!
//! Each `Dialogue` event is one cue. The event's `Name` column identifies the
//! verse half-line it times (`12a`, `12b`, or a bare `12`), which is how token
//! documents look their timing up.

use crate::segment::Segment;
use anyhow::{Context, Result, anyhow, bail};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

static RE_ASS_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{1,2}):(\d{1,2})(?:\.(\d{1,3}))?$").expect("valid time regex")
});
static RE_CUE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d*)([^\d]*)").expect("valid cue name regex"));
static RE_OVERRIDE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^}]*\}").expect("valid override regex"));

const DEFAULT_FORMAT: [&str; 10] = [
    "Layer", "Start", "End", "Style", "Name", "MarginL", "MarginR", "MarginV", "Effect", "Text",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub line: Option<u32>,
    pub half: String,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl Cue {
    /// Lookup key shared with token documents, e.g. `"12a"`.
    pub fn key(&self) -> String {
        match self.line {
            Some(line) => format!("{line}{}", self.half),
            None => self.half.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TimingTable {
    cues: Vec<Cue>,
    by_key: HashMap<String, usize>,
}

impl TimingTable {
    pub fn from_cues(cues: Vec<Cue>) -> Self {
        let mut by_key = HashMap::with_capacity(cues.len());
        for (idx, cue) in cues.iter().enumerate() {
            if by_key.insert(cue.key(), idx).is_some() {
                warn!(key = %cue.key(), "Duplicate cue name; later cue wins");
            }
        }
        Self { cues, by_key }
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn lookup(&self, key: &str) -> Option<&Cue> {
        self.by_key.get(key).map(|idx| &self.cues[*idx])
    }

    /// One segment per cue, in file order.
    pub fn segments(&self) -> Vec<Segment> {
        self.cues
            .iter()
            .map(|cue| Segment::timed(cue.key(), cue.text.clone(), cue.start, Some(cue.end)))
            .collect()
    }
}

pub fn load_timing(path: &Path) -> Result<TimingTable> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Reading timing file {}", path.display()))?;
    let table =
        parse_ass(&contents).with_context(|| format!("Parsing timing file {}", path.display()))?;
    info!(path = %path.display(), cues = table.len(), "Loaded audio timing");
    Ok(table)
}

pub fn parse_ass(contents: &str) -> Result<TimingTable> {
    let mut in_events = false;
    let mut format: Vec<String> = DEFAULT_FORMAT.iter().map(|s| s.to_string()).collect();
    let mut cues = Vec::new();

    for (line_no, raw) in contents.lines().enumerate() {
        let line = raw.trim_start_matches('\u{feff}').trim();
        if line.starts_with('[') && line.ends_with(']') {
            in_events = line.eq_ignore_ascii_case("[events]");
            continue;
        }
        if !in_events {
            continue;
        }
        if let Some(rest) = line.strip_prefix("Format:") {
            format = rest.split(',').map(|col| col.trim().to_string()).collect();
            continue;
        }
        let Some(rest) = line.strip_prefix("Dialogue:") else {
            continue;
        };
        let cue = parse_dialogue(rest, &format)
            .with_context(|| format!("Dialogue on line {}", line_no + 1))?;
        cues.push(cue);
    }

    debug!(cues = cues.len(), "Parsed ASS events");
    Ok(TimingTable::from_cues(cues))
}

fn parse_dialogue(rest: &str, format: &[String]) -> Result<Cue> {
    let fields: Vec<&str> = rest.splitn(format.len(), ',').map(str::trim).collect();

    let start = parse_time(column(&fields, format, "Start")?)?;
    let end = parse_time(column(&fields, format, "End")?)?;
    let name = column(&fields, format, "Name")?;
    let text = column(&fields, format, "Text").unwrap_or("");
    let (line, half) = split_name(name);

    Ok(Cue {
        line,
        half,
        start,
        end,
        text: clean_text(text),
    })
}

fn column<'a>(fields: &[&'a str], format: &[String], name: &str) -> Result<&'a str> {
    let idx = format
        .iter()
        .position(|col| col.eq_ignore_ascii_case(name))
        .ok_or_else(|| anyhow!("missing {name} column in Format"))?;
    fields
        .get(idx)
        .copied()
        .ok_or_else(|| anyhow!("missing {name} field"))
}

/// `H:MM:SS.cc` to seconds.
pub fn parse_time(raw: &str) -> Result<f64> {
    let Some(caps) = RE_ASS_TIME.captures(raw.trim()) else {
        bail!("invalid ASS timestamp {raw:?}");
    };
    let hours: f64 = caps[1].parse()?;
    let minutes: f64 = caps[2].parse()?;
    let seconds: f64 = caps[3].parse()?;
    let fraction = match caps.get(4) {
        Some(frac) => format!("0.{}", frac.as_str()).parse::<f64>()?,
        None => 0.0,
    };
    Ok(hours * 3600.0 + minutes * 60.0 + seconds + fraction)
}

fn split_name(name: &str) -> (Option<u32>, String) {
    let Some(caps) = RE_CUE_NAME.captures(name) else {
        return (None, name.to_string());
    };
    let line = caps[1].parse::<u32>().ok();
    let half = caps
        .get(2)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();
    (line, half)
}

fn clean_text(text: &str) -> String {
    let stripped = RE_OVERRIDE_TAG.replace_all(text, "");
    stripped
        .replace("\\N", " ")
        .replace("\\n", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

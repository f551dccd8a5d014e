//! Outline view of a generated strategy
//!
//! The generator answers in loose markdown: upper-case section headings,
//! `- ` bullets, indented sub-bullets and the occasional `• ` line. Parsing
//! never fails; anything unrecognised is kept as plain text.

use serde::Serialize;

use crate::catalog::roster::ROSTER;

/// Section holding the ranked counter list
pub const COUNTERS_SECTION: &str = "UNITS I SHOULD USE";
pub const STRATEGY_SECTION: &str = "OVERALL STRATEGY";
pub const WEAKNESSES_SECTION: &str = "WEAKNESSES TO WATCH";

const STAR_CHARS: [char; 2] = ['⭐', '★'];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NarrativeLine {
    /// Section title without the trailing colon
    Heading(String),
    Bullet(String),
    SubBullet(String),
    /// A line introduced with `•`, rendered emphasised
    Emphasis(String),
    Text(String),
    Blank,
}

/// Lines under one heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeSection<'a> {
    /// `None` for lines before the first heading
    pub title: Option<&'a str>,
    pub lines: &'a [NarrativeLine],
}

/// One entry of the counter list with its star rating
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterRating {
    /// First roster unit mentioned in the entry
    pub unit: Option<&'static str>,
    pub stars: usize,
    pub text: String,
}

/// Generated strategy text with its parsed outline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Narrative {
    text: String,
    lines: Vec<NarrativeLine>,
}

impl Narrative {
    pub fn parse(text: &str) -> Self {
        Self {
            text: text.to_string(),
            lines: text.lines().map(classify).collect(),
        }
    }

    /// The text exactly as generated
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> &[NarrativeLine] {
        &self.lines
    }

    /// Lines grouped under their headings, in order
    pub fn sections(&self) -> Vec<NarrativeSection<'_>> {
        let mut sections = Vec::new();
        let mut title = None;
        let mut start = 0;
        for (i, line) in self.lines.iter().enumerate() {
            if let NarrativeLine::Heading(heading) = line {
                if title.is_some() || i > start {
                    sections.push(NarrativeSection {
                        title,
                        lines: &self.lines[start..i],
                    });
                }
                title = Some(heading.as_str());
                start = i + 1;
            }
        }
        if title.is_some() || start < self.lines.len() {
            sections.push(NarrativeSection {
                title,
                lines: &self.lines[start..],
            });
        }
        sections
    }

    /// The section whose title matches `title`, ignoring case
    pub fn section(&self, title: &str) -> Option<NarrativeSection<'_>> {
        self.sections()
            .into_iter()
            .find(|s| s.title.is_some_and(|t| t.eq_ignore_ascii_case(title)))
    }

    /// Star-rated entries of the counter list
    pub fn counter_ratings(&self) -> Vec<CounterRating> {
        let Some(section) = self.section(COUNTERS_SECTION) else {
            return Vec::new();
        };
        section
            .lines
            .iter()
            .filter_map(|line| match line {
                NarrativeLine::Bullet(text) | NarrativeLine::Emphasis(text) => Some(text),
                _ => None,
            })
            .filter_map(|text| {
                let stars = text.chars().filter(|c| STAR_CHARS.contains(c)).count();
                (stars > 0).then(|| CounterRating {
                    unit: first_roster_unit(text),
                    stars,
                    text: text.clone(),
                })
            })
            .collect()
    }

    /// Terminal-friendly outline. Runs of blank lines collapse to one.
    pub fn render_plain(&self) -> String {
        let mut out = String::with_capacity(self.text.len() + 64);
        let mut last_blank = true;
        for line in &self.lines {
            let rendered = match line {
                NarrativeLine::Heading(title) => {
                    if !last_blank {
                        out.push('\n');
                    }
                    format!("== {} ==", title)
                }
                NarrativeLine::Bullet(text) | NarrativeLine::Emphasis(text) => {
                    format!("  • {}", text)
                }
                NarrativeLine::SubBullet(text) => format!("      ◦ {}", text),
                NarrativeLine::Text(text) => text.clone(),
                NarrativeLine::Blank => {
                    if !last_blank {
                        out.push('\n');
                    }
                    last_blank = true;
                    continue;
                }
            };
            out.push_str(&rendered);
            out.push('\n');
            last_blank = false;
        }
        out
    }
}

fn classify(line: &str) -> NarrativeLine {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return NarrativeLine::Blank;
    }

    // Indented dash: sub-bullet. Checked before plain bullets.
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent >= 2 && line[indent..].starts_with("- ") {
        return NarrativeLine::SubBullet(line[indent + 2..].trim().to_string());
    }
    if let Some(rest) = trimmed.strip_prefix("- ") {
        return NarrativeLine::Bullet(rest.trim().to_string());
    }
    if let Some(rest) = trimmed.strip_prefix("• ") {
        return NarrativeLine::Emphasis(rest.trim().to_string());
    }
    if let Some(title) = heading_title(trimmed) {
        return NarrativeLine::Heading(title);
    }
    NarrativeLine::Text(trimmed.to_string())
}

/// `UNITS I SHOULD USE:`, `## OVERALL STRATEGY` or `**WEAKNESSES TO WATCH:**`
fn heading_title(trimmed: &str) -> Option<String> {
    let had_hashes = trimmed.starts_with('#');
    let core = trimmed.trim_start_matches('#').trim().trim_matches('*').trim();
    let had_colon = core.ends_with(':');
    let title = core.trim_end_matches(':').trim_matches('*').trim();

    let has_letters = title.chars().any(|c| c.is_alphabetic());
    let all_upper = title.chars().all(|c| !c.is_lowercase());
    if has_letters && all_upper && (had_colon || had_hashes) {
        Some(title.to_string())
    } else {
        None
    }
}

fn first_roster_unit(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    ROSTER
        .iter()
        .filter_map(|unit| lower.find(&unit.to_lowercase()).map(|pos| (pos, *unit)))
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, unit)| unit)
}

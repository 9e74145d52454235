use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
#[error("Invalid congress '{0}'. Accepted values: 'all' or a session number like '119'")]
pub struct CongressParseError(String);

/// Search scope for one numbered two-year session, or every session at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Congress {
    All,
    Number(u16),
}

impl FromStr for Congress {
    type Err = CongressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Congress::All);
        }
        s.parse::<u16>()
            .ok()
            .filter(|n| *n > 0)
            .map(Congress::Number)
            .ok_or_else(|| CongressParseError(s.to_string()))
    }
}

impl Display for Congress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Congress::All => write!(f, "all"),
            Congress::Number(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid source type '{0}'. Accepted values: 'legislation', 'comreports'")]
pub struct SourceTypeParseError(String);

/// Category of legislative record on the search endpoint. Closed set:
/// unknown tags are rejected at the edge instead of silently ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceType {
    Legislation,
    CommitteeReports,
}

impl SourceType {
    pub fn tag(&self) -> &'static str {
        match self {
            SourceType::Legislation => "legislation",
            SourceType::CommitteeReports => "comreports",
        }
    }
}

impl FromStr for SourceType {
    type Err = SourceTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legislation" => Ok(SourceType::Legislation),
            "comreports" => Ok(SourceType::CommitteeReports),
            _ => Err(SourceTypeParseError(s.to_string())),
        }
    }
}

impl Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// One listing item from a search-results page, before detail enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillSummary {
    pub bill_number: String,
    pub title: String,
    pub status: String,
    pub sponsor: String,
    pub url: String,
    pub scraped_at: DateTime<Utc>,
}

impl Display for BillSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {} — {}", self.bill_number, self.title, self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillAction {
    pub date: String,
    pub action: String,
}

impl Display for BillAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} — {}", self.date, self.action)
    }
}

/// Enrichment extracted from a bill's detail page. Every section is
/// optional; an absent section parses to an empty collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillDetails {
    pub committees: Vec<String>,
    pub actions: Vec<BillAction>,
    pub cosponsors: Vec<String>,
    pub last_action_date: Option<String>,
    pub introduced_date: Option<String>,
    pub scraped_at: DateTime<Utc>,
}

impl Display for BillDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(introduced) = &self.introduced_date {
            writeln!(f, "Introduced:  {}", introduced)?;
        }
        if let Some(last_action) = &self.last_action_date {
            writeln!(f, "Last action: {}", last_action)?;
        }
        if !self.committees.is_empty() {
            writeln!(f, "Committees:")?;
            for committee in &self.committees {
                writeln!(f, "  - {}", committee)?;
            }
        }
        if !self.actions.is_empty() {
            writeln!(f, "Actions:")?;
            for action in &self.actions {
                writeln!(f, "  - {}", action)?;
            }
        }
        if !self.cosponsors.is_empty() {
            writeln!(f, "Cosponsors:")?;
            for cosponsor in &self.cosponsors {
                writeln!(f, "  - {}", cosponsor)?;
            }
        }
        Ok(())
    }
}

/// The full output record: a search-result summary merged with its
/// detail-page enrichment. `enrich` fills the detail fields and never
/// touches the summary fields, so nothing from the listing is lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    pub bill_number: String,
    pub title: String,
    pub status: String,
    pub sponsor: String,
    pub url: String,
    pub scraped_at: DateTime<Utc>,
    pub committees: Vec<String>,
    pub actions: Vec<BillAction>,
    pub cosponsors: Vec<String>,
    pub last_action_date: Option<String>,
    pub introduced_date: Option<String>,
    pub enriched_at: Option<DateTime<Utc>>,
}

impl From<BillSummary> for Bill {
    fn from(summary: BillSummary) -> Self {
        Bill {
            bill_number: summary.bill_number,
            title: summary.title,
            status: summary.status,
            sponsor: summary.sponsor,
            url: summary.url,
            scraped_at: summary.scraped_at,
            committees: Vec::new(),
            actions: Vec::new(),
            cosponsors: Vec::new(),
            last_action_date: None,
            introduced_date: None,
            enriched_at: None,
        }
    }
}

impl Bill {
    pub fn enrich(&mut self, details: BillDetails) {
        self.committees = details.committees;
        self.actions = details.actions;
        self.cosponsors = details.cosponsors;
        self.last_action_date = details.last_action_date;
        self.introduced_date = details.introduced_date;
        self.enriched_at = Some(details.scraped_at);
    }
}

impl Display for Bill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.bill_number, self.title)?;
        write!(f, "\n   Status:  {}", self.status)?;
        write!(f, "\n   Sponsor: {}", self.sponsor)?;
        if self.enriched_at.is_some() {
            write!(
                f,
                "\n   {} committee(s) · {} action(s) · {} cosponsor(s)",
                self.committees.len(),
                self.actions.len(),
                self.cosponsors.len()
            )?;
        }
        Ok(())
    }
}

use crate::types::Bill;

/// Presentation-side filtering of an accumulated result set.
#[derive(Debug, Default)]
pub struct BillFilter {
    pub status_contains: Option<String>,
    pub sponsor_contains: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl BillFilter {
    pub fn apply(self, mut bills: Vec<Bill>) -> Vec<Bill> {
        if let Some(status) = self.status_contains {
            let needle = status.to_lowercase();
            bills.retain(|b| b.status.to_lowercase().contains(&needle));
        }
        if let Some(sponsor) = self.sponsor_contains {
            let needle = sponsor.to_lowercase();
            bills.retain(|b| b.sponsor.to_lowercase().contains(&needle));
        }
        if let Some(off) = self.offset {
            bills = bills.into_iter().skip(off).collect();
        }
        if let Some(lim) = self.limit {
            bills.truncate(lim);
        }
        bills
    }

    pub fn validate(self) -> Result<Self, String> {
        if self.offset.is_some_and(|o| o == 0) {
            return Err("Offset must be greater than 0".to_string());
        }
        if self.limit.is_some_and(|l| l == 0) {
            return Err("Limit must be greater than 0".to_string());
        }
        Ok(self)
    }
}

#[derive(Debug)]
pub struct ScrapeStats {
    pub total: usize,
    pub enriched: usize,
    pub with_cosponsors: usize,
}

impl ScrapeStats {
    pub fn from_bills(bills: &[Bill]) -> ScrapeStats {
        ScrapeStats {
            total: bills.len(),
            enriched: bills.iter().filter(|b| b.enriched_at.is_some()).count(),
            with_cosponsors: bills.iter().filter(|b| !b.cosponsors.is_empty()).count(),
        }
    }
}

impl std::fmt::Display for ScrapeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\nStatistics:")?;
        writeln!(f, "  Bills scraped:    {}", self.total)?;
        writeln!(f, "  Detail-enriched:  {}", self.enriched)?;
        writeln!(f, "  With cosponsors:  {}", self.with_cosponsors)
    }
}

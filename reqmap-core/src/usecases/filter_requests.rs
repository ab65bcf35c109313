use super::prelude::*;
use std::collections::HashSet;
use time::Date;

/// Selects requests by an inclusive range of days and by category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    date_from: Date,
    date_to: Date,
    /// Empty means all categories.
    categories: HashSet<String>,
}

impl FilterCriteria {
    pub fn try_new<I, S>(date_from: Date, date_to: Date, categories: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if date_from > date_to {
            return Err(Error::DateRange {
                from: date_from,
                to: date_to,
            });
        }
        let categories = categories
            .into_iter()
            .map(|c| c.as_ref().trim().to_owned())
            .filter(|c| !c.is_empty())
            .collect();
        Ok(Self {
            date_from,
            date_to,
            categories,
        })
    }

    /// The whole day of `date_to` is included, whatever the time of day.
    pub fn matches(&self, req: &ServiceRequest) -> bool {
        let day = req.created_at.date();
        day >= self.date_from
            && day <= self.date_to
            && (self.categories.is_empty() || self.categories.contains(&req.category))
    }
}

pub fn filter_requests(
    requests: Vec<ServiceRequest>,
    criteria: &FilterCriteria,
) -> Vec<ServiceRequest> {
    let total = requests.len();
    let filtered: Vec<_> = requests
        .into_iter()
        .filter(|req| criteria.matches(req))
        .collect();
    log::debug!(
        "{} of {total} requests between {} and {} match",
        filtered.len(),
        criteria.date_from,
        criteria.date_to
    );
    filtered
}

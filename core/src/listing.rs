//! Contract listing: status filters, free-text search, ordering and the
//! dashboard counters.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use quill_types::ContractStatus;
use thiserror::Error;

use crate::repository::Repository;
use crate::{Blueprint, Contract};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContractFilter {
    #[default]
    All,
    /// Not yet signed: created, approved or sent.
    Active,
    /// Awaiting dispatch: created or approved.
    Pending,
    /// Signed or locked.
    Signed,
}

impl ContractFilter {
    pub const ALL: [ContractFilter; 4] = [
        ContractFilter::All,
        ContractFilter::Active,
        ContractFilter::Pending,
        ContractFilter::Signed,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ContractFilter::All => "all",
            ContractFilter::Active => "active",
            ContractFilter::Pending => "pending",
            ContractFilter::Signed => "signed",
        }
    }

    #[must_use]
    pub const fn matches(self, status: ContractStatus) -> bool {
        use ContractStatus::{Approved, Created, Locked, Sent, Signed};
        match self {
            ContractFilter::All => true,
            ContractFilter::Active => matches!(status, Created | Approved | Sent),
            ContractFilter::Pending => matches!(status, Created | Approved),
            ContractFilter::Signed => matches!(status, Signed | Locked),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContractSort {
    #[default]
    NewestFirst,
    OldestFirst,
    NameAsc,
}

impl ContractSort {
    pub const ALL: [ContractSort; 3] = [
        ContractSort::NewestFirst,
        ContractSort::OldestFirst,
        ContractSort::NameAsc,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ContractSort::NewestFirst => "date-desc",
            ContractSort::OldestFirst => "date-asc",
            ContractSort::NameAsc => "name-asc",
        }
    }

    fn compare(self, a: &Contract, b: &Contract) -> Ordering {
        match self {
            ContractSort::NewestFirst => b.created_at().cmp(&a.created_at()),
            ContractSort::OldestFirst => a.created_at().cmp(&b.created_at()),
            ContractSort::NameAsc => a
                .name()
                .to_lowercase()
                .cmp(&b.name().to_lowercase())
                .then_with(|| a.name().cmp(b.name())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownListingOption {
    kind: &'static str,
    value: String,
}

impl FromStr for ContractFilter {
    type Err = UnknownListingOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownListingOption {
                kind: "filter",
                value: s.to_owned(),
            })
    }
}

impl FromStr for ContractSort {
    type Err = UnknownListingOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sort| sort.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownListingOption {
                kind: "sort order",
                value: s.to_owned(),
            })
    }
}

impl fmt::Display for ContractFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ContractSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing parameters. An empty search matches every contract.
#[derive(Debug, Clone, Default)]
pub struct ContractQuery {
    pub filter: ContractFilter,
    pub search: String,
    pub sort: ContractSort,
}

impl ContractQuery {
    /// Names match case-insensitively; the id must contain the query verbatim.
    fn matches_search<B>(&self, contract: &Contract, blueprints: &B) -> bool
    where
        B: Repository<Blueprint> + ?Sized,
    {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        contract.name().to_lowercase().contains(&needle)
            || contract.id().as_str().contains(self.search.as_str())
            || blueprints
                .get(contract.blueprint_id())
                .is_some_and(|bp| bp.name().to_lowercase().contains(&needle))
    }
}

/// Contracts matching `query`, in the requested order. Ties keep stored order.
#[must_use]
pub fn query_contracts<'a, C, B>(
    contracts: &'a C,
    blueprints: &B,
    query: &ContractQuery,
) -> Vec<&'a Contract>
where
    C: Repository<Contract> + ?Sized,
    B: Repository<Blueprint> + ?Sized,
{
    let mut matched: Vec<&Contract> = contracts
        .list()
        .iter()
        .filter(|c| query.filter.matches(c.status()))
        .filter(|c| query.matches_search(c, blueprints))
        .collect();
    matched.sort_by(|a, b| query.sort.compare(a, b));
    matched
}

/// Dashboard counters. `signed` counts only contracts in SIGNED, not LOCKED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardStats {
    pub total: usize,
    pub active: usize,
    pub signed: usize,
}

impl DashboardStats {
    #[must_use]
    pub fn collect(contracts: &[Contract]) -> Self {
        contracts.iter().fold(Self::default(), |mut stats, contract| {
            stats.total += 1;
            if ContractFilter::Active.matches(contract.status()) {
                stats.active += 1;
            }
            if contract.status() == ContractStatus::Signed {
                stats.signed += 1;
            }
            stats
        })
    }
}

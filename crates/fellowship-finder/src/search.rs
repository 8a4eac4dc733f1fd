use anyhow::Result;
use futures::future::join_all;
use serde::{Serialize, Deserialize};
use tracing::{debug, warn};

use fellowship_data::{
    Contribution,
    Donation,
    LedgerFilter,
    Member,
    MemberFilter,
    MonthlyDue,
    MonthlyDueFilter,
    Query,
};

/// Everything the finder needs from the data store.
pub trait FinderStore:
    Query<Member, Filter = MemberFilter>
    + Query<MonthlyDue, Filter = MonthlyDueFilter>
    + Query<Contribution, Filter = LedgerFilter>
    + Query<Donation, Filter = LedgerFilter>
    + Send
    + Sync
{
}

impl<T> FinderStore for T where
    T: Query<Member, Filter = MemberFilter>
        + Query<MonthlyDue, Filter = MonthlyDueFilter>
        + Query<Contribution, Filter = LedgerFilter>
        + Query<Donation, Filter = LedgerFilter>
        + Send
        + Sync
{
}

/// A member together with the complete financial history.
/// Only ever built when all three collections were fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberDetails {
    pub member: Member,
    pub monthly_dues: Vec<MonthlyDue>,
    pub contributions: Vec<Contribution>,
    pub donations: Vec<Donation>,
}

impl MemberDetails {
    /// Fetch dues, contributions and donations of a member
    /// concurrently. Fails if any of the three fails.
    pub async fn fetch<DB>(db: &DB, member: Member) -> Result<Self>
    where
        DB: FinderStore,
    {
        let (monthly_dues, contributions, donations) = tokio::try_join!(
            member.get_monthly_dues(db),
            member.get_contributions(db),
            member.get_donations(db),
        )?;
        Ok(Self {
            member,
            monthly_dues,
            contributions,
            donations,
        })
    }

    /// Number of months paid
    pub fn payment_count(&self) -> usize {
        self.monthly_dues.len()
    }

    /// Contributions and donations together
    pub fn contribution_count(&self) -> usize {
        self.contributions.len() + self.donations.len()
    }

    pub fn dues_total(&self) -> f64 {
        self.monthly_dues.iter().map(|d| d.amount).sum()
    }

    pub fn giving_total(&self) -> f64 {
        self.contributions.iter().map(|c| c.amount).sum::<f64>()
            + self.donations.iter().map(|d| d.amount).sum::<f64>()
    }
}

/// Outcome of a search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// The term as it was sent to the store
    pub term: String,
    /// Matches in the order the store returned them
    pub members: Vec<MemberDetails>,
    /// Matches left out because their history could
    /// not be fetched completely.
    pub dropped: usize,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Find members with a name containing the term.
pub async fn find_members<DB>(db: &DB, term: &str) -> Result<Vec<Member>>
where
    DB: Query<Member, Filter = MemberFilter>,
{
    let members = db.query(&MemberFilter {
        name: Some(term.to_string()),
        ..Default::default()
    }).await?;
    Ok(members)
}

/// Search members by a case insensitive fragment of their name
/// and fetch their financial history.
///
/// A blank term yields no results without asking the store.
/// If the member lookup fails the whole search fails. If fetching
/// the history of a single member fails, that member is dropped
/// and counted in [`SearchResults::dropped`].
pub async fn search<DB>(db: &DB, term: &str) -> Result<SearchResults>
where
    DB: FinderStore,
{
    let term = term.trim();
    if term.is_empty() {
        return Ok(SearchResults::default());
    }

    let candidates = find_members(db, term).await?;
    debug!(term, candidates = candidates.len(), "member lookup");

    let fetched = join_all(
        candidates
            .into_iter()
            .map(|member| MemberDetails::fetch(db, member)),
    ).await;

    let mut results = SearchResults {
        term: term.to_string(),
        ..Default::default()
    };
    for details in fetched {
        match details {
            Ok(details) => results.members.push(details),
            Err(err) => {
                warn!(term, error = %err, "dropping member with incomplete history");
                results.dropped += 1;
            }
        }
    }
    Ok(results)
}

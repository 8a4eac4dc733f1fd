use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

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

/// In memory store with call accounting and failure injection.
#[derive(Default)]
pub struct FakeStore {
    members: Mutex<Vec<Member>>,
    dues: Mutex<Vec<MonthlyDue>>,
    contributions: Mutex<Vec<Contribution>>,
    donations: Mutex<Vec<Donation>>,

    member_queries: Mutex<Vec<String>>,
    calls: AtomicUsize,

    slow_terms: Mutex<Vec<(String, Duration)>>,
    fail_members: Mutex<bool>,
    fail_contributions: Mutex<HashSet<i64>>,
}

impl FakeStore {
    pub fn add_member(&self, id: i64, name: &str) {
        self.members.lock().unwrap().push(Member {
            id,
            name: name.to_string(),
            ..Default::default()
        });
    }

    pub fn add_due(&self, due: MonthlyDue) {
        self.dues.lock().unwrap().push(due);
    }

    pub fn add_contribution(&self, contribution: Contribution) {
        self.contributions.lock().unwrap().push(contribution);
    }

    /// Delay member lookups for `term`
    pub fn slow_down(&self, term: &str, delay: Duration) {
        self.slow_terms.lock().unwrap().push((term.to_string(), delay));
    }

    pub fn fail_member_lookup(&self) {
        *self.fail_members.lock().unwrap() = true;
    }

    pub fn fail_contributions_for(&self, member_id: i64) {
        self.fail_contributions.lock().unwrap().insert(member_id);
    }

    /// Terms the member table was queried with
    pub fn member_queries(&self) -> Vec<String> {
        self.member_queries.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn count(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Query<Member> for FakeStore {
    type Filter = MemberFilter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<Member>> {
        self.count();
        let term = filter.name.clone().unwrap_or_default();
        self.member_queries.lock().unwrap().push(term.clone());
        let delay = self.slow_terms.lock().unwrap()
            .iter()
            .find(|(slow, _)| *slow == term)
            .map(|(_, delay)| *delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if *self.fail_members.lock().unwrap() {
            return Err(anyhow!("members table unavailable"));
        }
        let term = term.to_lowercase();
        Ok(self.members.lock().unwrap()
            .iter()
            .filter(|m| m.name.to_lowercase().contains(&term))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl Query<MonthlyDue> for FakeStore {
    type Filter = MonthlyDueFilter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<MonthlyDue>> {
        self.count();
        Ok(self.dues.lock().unwrap()
            .iter()
            .filter(|d| filter.member_id.map_or(true, |id| d.member_id == id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl Query<Contribution> for FakeStore {
    type Filter = LedgerFilter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<Contribution>> {
        self.count();
        if let Some(id) = filter.member_id {
            if self.fail_contributions.lock().unwrap().contains(&id) {
                return Err(anyhow!("contributions table unavailable"));
            }
        }
        Ok(self.contributions.lock().unwrap()
            .iter()
            .filter(|c| filter.member_id.map_or(true, |id| c.member_id == id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl Query<Donation> for FakeStore {
    type Filter = LedgerFilter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<Donation>> {
        self.count();
        Ok(self.donations.lock().unwrap()
            .iter()
            .filter(|d| filter.member_id.map_or(true, |id| d.member_id == id))
            .cloned()
            .collect())
    }
}

//! The board controller.
//!
//! Holds the authoritative demand collection and the active query. Every
//! mutation is snapshot -> compute -> replace: callers get owned values or
//! shared borrows, never a live mutable handle into the collection.

use std::collections::BTreeMap;

use docket_core::model::demand::{Demand, Status};
use docket_core::query::{DemandQuery, select_and_order};
use docket_core::transition::{Transition, apply_transition};

/// Outcome of resolving a user-supplied id or id prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdResolution {
    /// Nothing matched.
    None,
    /// Exactly one demand matched; carries the full id.
    Unique(String),
    /// Several demands share the prefix; carries the full ids.
    Ambiguous(Vec<String>),
}

/// Owns the demand collection and presents it as board columns.
#[derive(Debug, Clone, Default)]
pub struct Board {
    demands: Vec<Demand>,
    query: DemandQuery,
}

impl Board {
    #[must_use]
    pub fn new(demands: Vec<Demand>) -> Self {
        Self {
            demands,
            query: DemandQuery::default(),
        }
    }

    #[must_use]
    pub const fn query(&self) -> &DemandQuery {
        &self.query
    }

    pub fn set_query(&mut self, query: DemandQuery) {
        self.query = query;
    }

    /// The raw, unfiltered collection.
    #[must_use]
    pub fn demands(&self) -> &[Demand] {
        &self.demands
    }

    /// Consume the board, handing the collection back for persistence.
    #[must_use]
    pub fn into_demands(self) -> Vec<Demand> {
        self.demands
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.demands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.demands.is_empty()
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Demand> {
        self.demands.iter().find(|demand| demand.id == id)
    }

    pub fn insert(&mut self, demand: Demand) {
        self.demands.push(demand);
    }

    /// Remove a demand entirely. Returns the removed value, or `None` for an
    /// unknown id.
    pub fn remove(&mut self, id: &str) -> Option<Demand> {
        let position = self.demands.iter().position(|demand| demand.id == id)?;
        Some(self.demands.remove(position))
    }

    /// Replace a demand's fields wholesale (edit operation). Returns `false`
    /// for an unknown id.
    pub fn replace(&mut self, id: &str, demand: Demand) -> bool {
        match self.demands.iter().position(|existing| existing.id == id) {
            Some(position) => {
                self.demands[position] = demand;
                true
            }
            None => false,
        }
    }

    /// Resolve a raw id or unique prefix to a full demand id.
    ///
    /// An exact match always wins, even when other ids extend it.
    #[must_use]
    pub fn resolve_id(&self, raw: &str) -> IdResolution {
        if self.find(raw).is_some() {
            return IdResolution::Unique(raw.to_string());
        }

        let matches: Vec<String> = self
            .demands
            .iter()
            .filter(|demand| demand.id.starts_with(raw))
            .map(|demand| demand.id.clone())
            .collect();

        match matches.len() {
            0 => IdResolution::None,
            1 => IdResolution::Unique(matches.into_iter().next().unwrap_or_default()),
            _ => IdResolution::Ambiguous(matches),
        }
    }

    /// The filtered, sorted snapshot the board renders from.
    #[must_use]
    pub fn visible(&self) -> Vec<Demand> {
        select_and_order(&self.demands, &self.query)
    }

    /// Partition the visible snapshot into one bucket per status.
    ///
    /// Every visible demand lands in exactly one bucket; bucket order is the
    /// order of the filtered/sorted input. Empty columns are present so the
    /// board always renders all five.
    #[must_use]
    pub fn group_by_status(&self) -> BTreeMap<Status, Vec<Demand>> {
        let mut columns: BTreeMap<Status, Vec<Demand>> = Status::ALL
            .iter()
            .map(|status| (*status, Vec::new()))
            .collect();
        for demand in self.visible() {
            columns
                .entry(demand.status)
                .or_default()
                .push(demand);
        }
        columns
    }

    /// Per-status counts for badge display. Always agrees with the bucket
    /// sizes from [`Board::group_by_status`].
    #[must_use]
    pub fn counts_by_status(&self) -> BTreeMap<Status, usize> {
        let mut counts: BTreeMap<Status, usize> =
            Status::ALL.iter().map(|status| (*status, 0)).collect();
        for demand in self.visible() {
            if let Some(count) = counts.get_mut(&demand.status) {
                *count += 1;
            }
        }
        counts
    }

    /// Apply a status change to one demand and replace it in the collection.
    ///
    /// Returns `None` (a silent no-op) when the id is unknown: a stale
    /// gesture source is not a user-correctable condition, so it is logged
    /// rather than surfaced.
    pub fn request_transition(
        &mut self,
        id: &str,
        target: Status,
        now_ms: i64,
    ) -> Option<Transition> {
        let Some(position) = self.demands.iter().position(|demand| demand.id == id) else {
            tracing::debug!(id, target = %target, "transition requested for unknown demand, ignoring");
            return None;
        };

        let transition = apply_transition(&self.demands[position], target, now_ms);
        self.demands[position] = transition.demand.clone();
        Some(transition)
    }
}

//! Address resolution against the gazetteer.
//!
//! Each free-text address is scored against every canonical address and the
//! single best candidate is kept. Ties go to the lexicographically smallest
//! canonical address. A best score below the acceptance threshold becomes
//! "no match", but the score is kept for diagnostics.
//!
//! The per-address results are then joined back onto the record table,
//! along with the matched entry's gazetteer attributes.

use std::collections::HashMap;
use std::thread;

use crossbeam_channel::bounded;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::ReconConfig;
use crate::error::{ReconError, ReconResult, SchemaError, ValidationError};
use crate::gazetteer::Gazetteer;
use crate::scoring::{Scorer, ScorerKind, PERFECT_SCORE};
use crate::table::Table;

/// Score recorded when there was no candidate to compare against.
pub const NO_CANDIDATE_SCORE: f64 = 0.0;

/// Column holding the matched canonical address.
pub const MATCHED_ADDRESS_COLUMN: &str = "Matched Address";
/// Column holding the best score.
pub const SCORE_COLUMN: &str = "Score";

/// Name given to the linked table.
pub const LINKED_TABLE: &str = "linked";

/// Best candidate for one free-text address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// The free-text address that was resolved.
    pub query: String,
    /// Accepted canonical address, or `None` for "no match".
    pub matched: Option<String>,
    /// Best score found, 0–100, even when the match was rejected.
    pub score: f64,
}

impl MatchResult {
    /// Returns true if a canonical address was accepted.
    #[must_use]
    pub const fn is_match(&self) -> bool {
        self.matched.is_some()
    }

    /// Returns true if the score is below a perfect match.
    #[must_use]
    pub fn is_low_confidence(&self) -> bool {
        self.score < PERFECT_SCORE
    }
}

/// Scores addresses against a gazetteer and applies the acceptance threshold.
#[derive(Debug, Clone)]
pub struct AddressResolver<S = ScorerKind> {
    scorer: S,
    threshold: f64,
    workers: usize,
}

impl AddressResolver<ScorerKind> {
    /// Creates a resolver with the scorer, threshold and worker count of `config`.
    #[must_use]
    pub fn from_config(config: &ReconConfig) -> Self {
        Self::new(config.scorer, config.acceptance_threshold).with_workers(config.workers)
    }
}

impl<S: Scorer> AddressResolver<S> {
    /// Creates a sequential resolver.
    #[must_use]
    pub const fn new(scorer: S, threshold: f64) -> Self {
        Self {
            scorer,
            threshold,
            workers: 1,
        }
    }

    /// Sets the number of scoring threads. Values below 1 mean 1.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Acceptance threshold in use.
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Resolves one address.
    ///
    /// An empty gazetteer yields "no match" with `NO_CANDIDATE_SCORE`.
    #[must_use]
    pub fn best_match(&self, query: &str, gazetteer: &Gazetteer) -> MatchResult {
        let mut best: Option<(&str, f64)> = None;
        for entry in gazetteer.entries() {
            let candidate = entry.address();
            let score = self.scorer.score(query, candidate);
            let better = match best {
                None => true,
                Some((best_addr, best_score)) => {
                    score > best_score || (score == best_score && candidate < best_addr)
                }
            };
            if better {
                best = Some((candidate, score));
            }
        }

        match best {
            Some((candidate, score)) if score >= self.threshold => MatchResult {
                query: query.to_string(),
                matched: Some(candidate.to_string()),
                score,
            },
            Some((_, score)) => MatchResult {
                query: query.to_string(),
                matched: None,
                score,
            },
            None => MatchResult {
                query: query.to_string(),
                matched: None,
                score: NO_CANDIDATE_SCORE,
            },
        }
    }

    /// Resolves every address, returning one result per input in input order.
    pub fn match_all<A: AsRef<str> + Sync>(
        &self,
        addresses: &[A],
        gazetteer: &Gazetteer,
    ) -> ReconResult<Vec<MatchResult>> {
        if self.workers <= 1 || addresses.len() <= 1 {
            return Ok(addresses
                .iter()
                .map(|a| self.best_match(a.as_ref(), gazetteer))
                .collect());
        }
        self.match_parallel(addresses, gazetteer)
    }

    /// Bounded worker pool over scoped threads; results are slotted back by index.
    fn match_parallel<A: AsRef<str> + Sync>(
        &self,
        addresses: &[A],
        gazetteer: &Gazetteer,
    ) -> ReconResult<Vec<MatchResult>> {
        let workers = self.workers.min(addresses.len());
        let (job_tx, job_rx) = bounded::<usize>(workers * 4);
        let (result_tx, result_rx) = bounded::<(usize, MatchResult)>(workers * 4);

        thread::scope(|scope| -> ReconResult<Vec<MatchResult>> {
            let mut handles = Vec::with_capacity(workers);
            for idx in 0..workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                let handle = thread::Builder::new()
                    .name(format!("parcelink-resolve-{idx}"))
                    .spawn_scoped(scope, move || {
                        for i in job_rx {
                            let result = self.best_match(addresses[i].as_ref(), gazetteer);
                            if result_tx.send((i, result)).is_err() {
                                break;
                            }
                        }
                    })
                    .map_err(|e| ReconError::internal(format!("failed to spawn resolver worker: {e}")))?;
                handles.push(handle);
            }
            drop(job_rx);
            drop(result_tx);

            let feeder = scope.spawn(move || {
                for i in 0..addresses.len() {
                    if job_tx.send(i).is_err() {
                        break;
                    }
                }
            });

            let mut slots: Vec<Option<MatchResult>> = vec![None; addresses.len()];
            for (i, result) in result_rx {
                slots[i] = Some(result);
            }

            feeder
                .join()
                .map_err(|_| ReconError::internal("resolver feeder panicked"))?;
            for handle in handles {
                handle
                    .join()
                    .map_err(|_| ReconError::internal("resolver worker panicked"))?;
            }

            slots
                .into_iter()
                .enumerate()
                .map(|(i, slot)| {
                    slot.ok_or_else(|| ReconError::internal(format!("address {i} was never resolved")))
                })
                .collect()
        })
    }

    /// Resolves the address column of `records` and builds the output tables.
    ///
    /// The record table must contain `address_column`; this is checked before
    /// any scoring happens.
    pub fn link(
        &self,
        records: &Table,
        address_column: &str,
        gazetteer: &Gazetteer,
        collision_suffix: &str,
    ) -> ReconResult<Resolution> {
        if collision_suffix.is_empty() {
            return Err(ValidationError::EmptyField {
                field: "collision_suffix".to_string(),
            }
            .into());
        }
        let address_idx = records.require_column(address_column)?;

        // Score each distinct address once; the join below repeats the result
        // for every row carrying that address.
        let mut distinct: Vec<&str> = Vec::new();
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for row in records.rows() {
            let address = row[address_idx].as_str();
            seen.entry(address).or_insert_with(|| {
                distinct.push(address);
                distinct.len() - 1
            });
        }
        debug!(
            rows = records.len(),
            distinct = distinct.len(),
            candidates = gazetteer.len(),
            "resolving addresses"
        );
        let matches = self.match_all(&distinct, gazetteer)?;

        let mut headers: Vec<String> = records.headers().to_vec();
        headers.push(MATCHED_ADDRESS_COLUMN.to_string());
        headers.push(SCORE_COLUMN.to_string());
        for column in gazetteer.columns() {
            let mut name = column.clone();
            while headers.contains(&name) {
                name.push_str(collision_suffix);
            }
            headers.push(name);
        }

        let mut linked = Table::new(LINKED_TABLE, headers);
        let mut scores = Vec::with_capacity(records.len());
        let mut matched = 0;
        let blank_attributes = vec![String::new(); gazetteer.columns().len()];
        for row in records.rows() {
            let result = &matches[seen[row[address_idx].as_str()]];
            let attributes = result
                .matched
                .as_deref()
                .and_then(|addr| gazetteer.get(addr))
                .map_or(blank_attributes.as_slice(), |entry| entry.attributes());
            if result.is_match() {
                matched += 1;
            }

            let mut cells = row.clone();
            cells.push(result.matched.clone().unwrap_or_default());
            cells.push(result.score.to_string());
            cells.extend(attributes.iter().cloned());
            linked.push_row(cells)?;
            scores.push(result.score);
        }

        let linked = LinkedTable {
            table: linked,
            scores,
        };
        let resolution = Resolution {
            low_confidence: linked.low_confidence(),
            linked,
            matches,
            matched,
        };
        info!(
            rows = resolution.linked.len(),
            matched = resolution.matched,
            unmatched = resolution.unmatched(),
            low_confidence = resolution.low_confidence.len(),
            "resolved addresses"
        );
        Ok(resolution)
    }
}

/// A linked table and the numeric score of each of its rows.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkedTable {
    table: Table,
    scores: Vec<f64>,
}

impl LinkedTable {
    /// Reads scores back from the `Score` column of an existing linked table.
    pub fn from_table(table: Table) -> Result<Self, SchemaError> {
        let idx = table.require_column(SCORE_COLUMN)?;
        let scores = table
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row[idx]
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|score| score.is_finite())
                    .ok_or_else(|| SchemaError::InvalidScore {
                        column: SCORE_COLUMN.to_string(),
                        row: i + 1,
                        value: row[idx].clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { table, scores })
    }

    /// Rows scoring below a perfect match, in their original order.
    #[must_use]
    pub fn low_confidence(&self) -> Self {
        let table = self.table.select_rows(|i| self.scores[i] < PERFECT_SCORE);
        let scores = self
            .scores
            .iter()
            .copied()
            .filter(|s| *s < PERFECT_SCORE)
            .collect();
        Self { table, scores }
    }

    /// Underlying table.
    #[must_use]
    pub const fn table(&self) -> &Table {
        &self.table
    }

    /// Score of each row.
    #[must_use]
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Returns true if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Output of one resolver run.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Every record with its match and gazetteer attributes.
    pub linked: LinkedTable,
    /// Rows of `linked` scoring below 100, for manual review.
    pub low_confidence: LinkedTable,
    /// One result per distinct address, in first-seen order.
    pub matches: Vec<MatchResult>,
    /// Rows of `linked` that received a canonical address.
    pub matched: usize,
}

impl Resolution {
    /// Rows of `linked` left without a canonical address.
    #[must_use]
    pub fn unmatched(&self) -> usize {
        self.linked.len() - self.matched
    }
}

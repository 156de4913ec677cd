use dashmap::DashMap;

/// Run-scoped accumulator of incoming shares and out-shares, keyed by the
/// destination participant. Round-1 shares and round-2 out-shares live in
/// separate maps and must never be mixed.
///
/// Mutations of the same key serialize on the map entry; distinct keys do not
/// block each other. Entries are never removed or reset within a run, and a
/// key that was never written reads as zero.
#[derive(Default)]
pub struct AggregationStore {
    shares: DashMap<String, i64>,
    out_shares: DashMap<String, i64>,
}

impl AggregationStore {
    /// Accumulates a round-1 share part under `to`. Returns the new running
    /// total for that participant.
    pub fn add_share(&self, to: &str, part: i64) -> i64 {
        let mut total = self.shares.entry(to.to_string()).or_insert(0);
        *total += part;
        *total
    }

    /// Accumulates a round-2 partial sum under `to`. Returns the new running
    /// total for that participant.
    pub fn add_out_share(&self, to: &str, data: i64) -> i64 {
        let mut total = self.out_shares.entry(to.to_string()).or_insert(0);
        *total += data;
        *total
    }

    /// Current shares total for `participant`; zero if never written.
    pub fn shares_for(&self, participant: &str) -> i64 {
        self.shares.get(participant).map(|total| *total).unwrap_or(0)
    }

    /// Current out-shares total for `participant`; zero if never written.
    pub fn out_shares_for(&self, participant: &str) -> i64 {
        self.out_shares
            .get(participant)
            .map(|total| *total)
            .unwrap_or(0)
    }
}

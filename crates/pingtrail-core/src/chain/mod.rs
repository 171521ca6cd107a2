//! Reply-chain reconstruction.
//!
//! Pings arrive as a flat list where each ping may name the ping it replies
//! to. [`chains`] partitions that list into root-first chains by walking
//! parent references backward; the remaining functions answer membership
//! queries against the result and an [`ActivationSet`].
//!
//! ```text
//! input:  [1] [2 → 1] [3 → 2] [5] [6 → 99]
//! chains: [1, 2, 3]  [5]  [6]
//! ```
//!
//! Derivation never fails. A missing parent ends the walk (partial chain),
//! and the walk never revisits an id, so corrupted or cyclic parent
//! references still terminate.

mod activation;

pub use activation::ActivationSet;

use std::collections::{HashMap, HashSet, VecDeque};

use crate::types::{Ping, PingId};

/// Root-first sequence of pings linked by `parent_ping`.
pub type Chain = Vec<Ping>;

/// Partition `pings` into chains.
///
/// Leaves (pings nothing in the set replies to) head chains first, in input
/// order, so a thread comes out whole however the server ordered it. A walk
/// stops at an ancestor some earlier chain already holds; on a branching
/// thread the first branch keeps the shared ancestors and later branches
/// start below them. Pings no leaf reaches (parent cycles) are walked last.
pub fn chains(pings: &[Ping]) -> Vec<Chain> {
    let mut by_id: HashMap<PingId, &Ping> = HashMap::with_capacity(pings.len());
    for ping in pings {
        by_id.entry(ping.id).or_insert(ping);
    }
    let replied_to: HashSet<PingId> = pings.iter().filter_map(|p| p.parent_ping).collect();

    let mut claimed: HashSet<PingId> = HashSet::with_capacity(pings.len());
    let mut result = Vec::new();

    let leaves = pings.iter().filter(|p| !replied_to.contains(&p.id));
    for ping in leaves.chain(pings.iter()) {
        if claimed.contains(&ping.id) {
            continue;
        }
        let chain = walk_back(ping, &by_id, &claimed);
        claimed.extend(chain.iter().map(|p| p.id));
        result.push(chain);
    }

    result
}

/// Build the chain ending at `ping`.
fn walk_back<'a>(
    ping: &'a Ping,
    by_id: &HashMap<PingId, &'a Ping>,
    claimed: &HashSet<PingId>,
) -> Chain {
    let mut chain = VecDeque::from([ping.clone()]);
    let mut visited = HashSet::from([ping.id]);
    let mut current = ping;

    while let Some(parent_id) = current.parent_ping {
        if claimed.contains(&parent_id) || !visited.insert(parent_id) {
            break;
        }
        let Some(parent) = by_id.get(&parent_id) else {
            break;
        };
        chain.push_front((*parent).clone());
        current = *parent;
    }

    chain.into()
}

/// The chain holding `ping_id`, or an empty chain.
pub fn chain_for(chains: &[Chain], ping_id: PingId) -> Chain {
    find_chain(chains, ping_id).cloned().unwrap_or_default()
}

fn find_chain(chains: &[Chain], ping_id: PingId) -> Option<&Chain> {
    chains.iter().find(|c| c.iter().any(|p| p.id == ping_id))
}

/// One chain per activated id, in activation order.
///
/// Ids with no chain yield an empty placeholder. Two activated ids in the
/// same chain yield that chain twice.
pub fn active_chains(chains: &[Chain], activation: &ActivationSet) -> Vec<Chain> {
    activation
        .iter()
        .map(|id| chain_for(chains, id))
        .collect()
}

/// Whether `ping_id` sits in any active chain.
pub fn is_in_active_chain(chains: &[Chain], activation: &ActivationSet, ping_id: PingId) -> bool {
    activation
        .iter()
        .filter_map(|id| find_chain(chains, id))
        .any(|c| c.iter().any(|p| p.id == ping_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::User;
    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn ping(id: PingId, parent: Option<PingId>) -> Ping {
        Ping {
            id,
            parent_ping: parent,
            latitude: 0.0,
            longitude: 0.0,
            timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap(),
            user: User::from_id(1),
        }
    }

    fn ids(chain: &Chain) -> Vec<PingId> {
        chain.iter().map(|p| p.id).collect()
    }

    fn all_ids(chains: &[Chain]) -> Vec<Vec<PingId>> {
        chains.iter().map(ids).collect()
    }

    /// Every input id appears in exactly one chain, and links hold.
    fn assert_partition(input: &[Ping], output: &[Chain]) {
        let mut seen: Vec<PingId> = output.iter().flat_map(ids).collect();
        seen.sort();
        let mut expected: Vec<PingId> = input.iter().map(|p| p.id).collect();
        expected.sort();
        assert_eq!(seen, expected, "chains {:?}", all_ids(output));

        for chain in output {
            assert!(!chain.is_empty());
            for pair in chain.windows(2) {
                assert_eq!(pair[1].parent_ping, Some(pair[0].id));
            }
        }
    }

    #[test]
    fn test_linear_thread_is_one_chain() {
        let pings = vec![ping(1, None), ping(2, Some(1)), ping(3, Some(2))];
        assert_eq!(all_ids(&chains(&pings)), vec![vec![1, 2, 3]]);
    }

    #[test]
    fn test_linear_thread_newest_first() {
        let pings = vec![ping(3, Some(2)), ping(2, Some(1)), ping(1, None)];
        assert_eq!(all_ids(&chains(&pings)), vec![vec![1, 2, 3]]);
    }

    #[test]
    fn test_missing_parent_gives_partial_chain() {
        let pings = vec![ping(5, None), ping(6, Some(99))];
        assert_eq!(all_ids(&chains(&pings)), vec![vec![5], vec![6]]);
    }

    #[test]
    fn test_partial_chain_starts_at_earliest_resolvable_ancestor() {
        let pings = vec![ping(10, Some(4)), ping(11, Some(10)), ping(12, Some(11))];
        let result = chains(&pings);
        assert_eq!(all_ids(&result), vec![vec![10, 11, 12]]);
        assert_eq!(result[0][0].parent_ping, Some(4));
    }

    #[test]
    fn test_branching_thread_stays_a_partition() {
        // 1 ← 2 ← 3 and 1 ← 4
        let pings = vec![ping(1, None), ping(2, Some(1)), ping(3, Some(2)), ping(4, Some(1))];
        let result = chains(&pings);
        assert_eq!(all_ids(&result), vec![vec![1, 2, 3], vec![4]]);
        assert_partition(&pings, &result);
    }

    #[test]
    fn test_cycle_terminates() {
        let pings = vec![ping(1, Some(2)), ping(2, Some(1)), ping(3, Some(3))];
        let result = chains(&pings);
        assert_partition(&pings, &result);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_cycle_with_tail() {
        // 1 ↔ 2, and 3 replies to 2
        let pings = vec![ping(1, Some(2)), ping(2, Some(1)), ping(3, Some(2))];
        let result = chains(&pings);
        assert_eq!(all_ids(&result), vec![vec![1, 2, 3]]);
        assert_partition(&pings, &result);
    }

    #[test]
    fn test_partition_holds_for_any_order() {
        let base = vec![
            ping(1, None),
            ping(2, Some(1)),
            ping(3, Some(2)),
            ping(4, Some(2)),
            ping(5, Some(1)),
            ping(6, None),
            ping(7, Some(6)),
            ping(8, Some(42)),
            ping(9, Some(8)),
            ping(10, Some(11)),
            ping(11, Some(10)),
        ];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let mut pings = base.clone();
            pings.shuffle(&mut rng);
            assert_partition(&pings, &chains(&pings));
        }
    }

    #[test]
    fn test_complete_chain_when_root_present() {
        let pings = vec![ping(3, Some(2)), ping(1, None), ping(2, Some(1))];
        let result = chains(&pings);
        assert!(result[0][0].is_root());
    }

    #[test]
    fn test_empty_input() {
        assert!(chains(&[]).is_empty());
    }

    #[test]
    fn test_chain_for() {
        let pings = vec![ping(5, None), ping(6, Some(99)), ping(7, Some(5))];
        let result = chains(&pings);
        assert_eq!(ids(&chain_for(&result, 5)), vec![5, 7]);
        assert_eq!(ids(&chain_for(&result, 6)), vec![6]);
        assert!(chain_for(&result, 1234).is_empty());
    }

    #[test]
    fn test_activation_scenario() {
        let pings = vec![ping(5, None), ping(6, Some(99))];
        let result = chains(&pings);
        let mut activation = ActivationSet::new();

        activation.activate(6);
        assert_eq!(all_ids(&active_chains(&result, &activation)), vec![vec![6]]);
        assert!(is_in_active_chain(&result, &activation, 6));
        assert!(!is_in_active_chain(&result, &activation, 5));

        activation.toggle(6);
        assert!(active_chains(&result, &activation).is_empty());
        assert!(!is_in_active_chain(&result, &activation, 6));
    }

    #[test]
    fn test_active_chains_keeps_duplicates_and_placeholders() {
        let pings = vec![ping(1, None), ping(2, Some(1))];
        let result = chains(&pings);
        let mut activation = ActivationSet::new();
        activation.activate(2);
        activation.activate(77);
        activation.activate(1);

        let active = active_chains(&result, &activation);
        assert_eq!(all_ids(&active), vec![vec![1, 2], vec![], vec![1, 2]]);
        assert!(is_in_active_chain(&result, &activation, 1));
        assert!(!is_in_active_chain(&result, &activation, 77));
    }
}

// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Per-asset transfer graph
//!
//! Models one asset's ownership history as a directed multigraph: nodes are
//! wallet addresses, edges are individual transfers labeled with their
//! transaction hash and block. Parallel edges and self-loops are permitted —
//! two wallets can trade the same asset repeatedly, and an owner can send to
//! themselves.
//!
//! Transfers originating from the mint address only contribute their
//! destination node, never an edge. Without that exclusion every asset would
//! show trivially short "cycles" through the shared mint origin.
//!
//! The exposed structural signal is the number of distinct simple directed
//! cycles: round-trips through the ownership graph suggest circular trading.
//! Cycles are node-simple, so parallel edges between the same pair do not
//! multiply the count and a self-loop counts once.

use std::collections::{BTreeSet, HashMap};

use alloy_primitives::{Address, BlockNumber, B256};

use crate::model::Transfer;

/// One transfer edge, endpoints given as node indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEdge {
    pub from: usize,
    pub to: usize,
    pub tx_hash: B256,
    pub block: BlockNumber,
}

/// Directed multigraph over the addresses an asset has passed through.
#[derive(Debug, Default)]
pub struct TransferGraph {
    nodes: Vec<Address>,
    index: HashMap<Address, usize>,
    edges: Vec<TransferEdge>,
    /// Distinct successor sets; parallel edges collapse here so the cycle
    /// search stays node-simple.
    successors: Vec<BTreeSet<usize>>,
}

impl TransferGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for one asset's transfer list.
    pub fn from_transfers<'a>(
        transfers: impl IntoIterator<Item = &'a Transfer>,
        mint_address: Address,
    ) -> Self {
        let mut graph = Self::new();
        for transfer in transfers {
            graph.add_transfer(transfer, mint_address);
        }
        graph
    }

    /// Add one transfer. Mint-originated transfers add only the destination
    /// node.
    pub fn add_transfer(&mut self, transfer: &Transfer, mint_address: Address) {
        if transfer.from_address == mint_address {
            self.intern(transfer.to_address);
            return;
        }

        let from = self.intern(transfer.from_address);
        let to = self.intern(transfer.to_address);
        self.successors[from].insert(to);
        self.edges.push(TransferEdge {
            from,
            to,
            tx_hash: transfer.tx_hash,
            block: transfer.block,
        });
    }

    fn intern(&mut self, address: Address) -> usize {
        if let Some(&idx) = self.index.get(&address) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(address);
        self.index.insert(address, idx);
        self.successors.push(BTreeSet::new());
        idx
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of transfer edges, parallel edges counted individually.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_node(&self, address: Address) -> bool {
        self.index.contains_key(&address)
    }

    /// Count the distinct simple directed cycles in the graph.
    ///
    /// Enumerates each cycle exactly once at its lowest-indexed node: the
    /// search from start node `s` only walks nodes with index `> s`, and a
    /// successor equal to `s` closes one cycle. Self-loops count as
    /// one-node cycles.
    pub fn simple_cycle_count(&self) -> usize {
        let mut count = 0usize;
        let mut visited = vec![false; self.nodes.len()];

        for start in 0..self.nodes.len() {
            self.count_cycles_from(start, start, &mut visited, &mut count);
        }

        count
    }

    fn count_cycles_from(
        &self,
        start: usize,
        current: usize,
        visited: &mut Vec<bool>,
        count: &mut usize,
    ) {
        for &next in &self.successors[current] {
            if next == start {
                *count += 1;
            } else if next > start && !visited[next] {
                visited[next] = true;
                self.count_cycles_from(start, next, visited, count);
                visited[next] = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, U256};

    const MINT: Address = Address::ZERO;

    fn wallet(nibble: u8) -> Address {
        Address::repeat_byte(nibble)
    }

    fn transfer(from: Address, to: Address, block: u64) -> Transfer {
        Transfer {
            contract_address: address!("1111111111111111111111111111111111111111"),
            tx_hash: B256::repeat_byte(block as u8),
            log_index: 0,
            from_address: from,
            to_address: to,
            token_id: U256::from(1u64),
            block,
        }
    }

    #[test]
    fn test_two_node_round_trip_is_one_cycle() {
        let (a, b) = (wallet(0xaa), wallet(0xbb));
        let graph =
            TransferGraph::from_transfers([&transfer(a, b, 1), &transfer(b, a, 2)], MINT);
        assert_eq!(graph.simple_cycle_count(), 1);
    }

    #[test]
    fn test_triangle_is_one_cycle() {
        let (a, b, c) = (wallet(0xaa), wallet(0xbb), wallet(0xcc));
        let graph = TransferGraph::from_transfers(
            [&transfer(a, b, 1), &transfer(b, c, 2), &transfer(c, a, 3)],
            MINT,
        );
        assert_eq!(graph.simple_cycle_count(), 1);
    }

    #[test]
    fn test_parallel_edges_do_not_multiply_cycles() {
        let (a, b) = (wallet(0xaa), wallet(0xbb));
        let graph = TransferGraph::from_transfers(
            [
                &transfer(a, b, 1),
                &transfer(b, a, 2),
                &transfer(a, b, 3),
                &transfer(b, a, 4),
            ],
            MINT,
        );
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.simple_cycle_count(), 1);
    }

    #[test]
    fn test_self_loop_is_one_cycle() {
        let a = wallet(0xaa);
        let graph = TransferGraph::from_transfers([&transfer(a, a, 1)], MINT);
        assert_eq!(graph.simple_cycle_count(), 1);
    }

    #[test]
    fn test_mint_transfer_adds_node_but_no_edge() {
        let a = wallet(0xaa);
        let graph = TransferGraph::from_transfers([&transfer(MINT, a, 1)], MINT);
        assert!(graph.contains_node(a));
        assert!(!graph.contains_node(MINT));
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.simple_cycle_count(), 0);
    }

    #[test]
    fn test_overlapping_cycles_counted_separately() {
        // a -> b -> a and a -> b -> c -> a share the a->b edge.
        let (a, b, c) = (wallet(0xaa), wallet(0xbb), wallet(0xcc));
        let graph = TransferGraph::from_transfers(
            [
                &transfer(a, b, 1),
                &transfer(b, a, 2),
                &transfer(b, c, 3),
                &transfer(c, a, 4),
            ],
            MINT,
        );
        assert_eq!(graph.simple_cycle_count(), 2);
    }

    #[test]
    fn test_chain_without_return_has_no_cycles() {
        let (a, b, c) = (wallet(0xaa), wallet(0xbb), wallet(0xcc));
        let graph = TransferGraph::from_transfers(
            [&transfer(a, b, 1), &transfer(b, c, 2)],
            MINT,
        );
        assert_eq!(graph.simple_cycle_count(), 0);
    }
}

//! uShuffle-style Euler path shuffling.
//!
//! A sequence of length `l` is a walk through the multigraph whose vertices
//! are its distinct (k-1)-lets and whose edges are its `l - k + 1` k-lets.
//! Any Eulerian path from the first to the last (k-1)-let spells a sequence
//! with identical k-let counts. A uniform path is drawn by picking a random
//! arborescence of "last exit" edges pointing at the final vertex (Wilson's
//! algorithm), shuffling every other out-edge, and walking.

use crate::shuffle::{EngineError, ShuffleEngine};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

pub struct EulerShuffler {
    rng: StdRng,
    primed: Option<Primed>,
}

struct Primed {
    sequence: Vec<u8>,
    plan: Plan,
}

enum Plan {
    /// k >= length: the sequence is its own only arrangement.
    Identity,
    /// k == 1: any permutation keeps the counts.
    Permute,
    Euler(KletGraph),
}

struct KletGraph {
    /// Last byte of each vertex's (k-1)-let.
    tails: Vec<u8>,
    /// Out-edges of each vertex as target vertex ids.
    edges: Vec<Vec<usize>>,
    start: usize,
    root: usize,
    prefix_len: usize,
}

impl KletGraph {
    fn build(sequence: &[u8], k: usize) -> Self {
        let prefix_len = k - 1;
        let positions = sequence.len() - prefix_len + 1;

        let mut ids: HashMap<&[u8], usize> = HashMap::new();
        let mut tails = Vec::new();
        let mut path = Vec::with_capacity(positions);
        for i in 0..positions {
            let label = &sequence[i..i + prefix_len];
            let next_id = tails.len();
            let id = *ids.entry(label).or_insert(next_id);
            if id == next_id {
                tails.push(label[prefix_len - 1]);
            }
            path.push(id);
        }

        let mut edges = vec![Vec::new(); tails.len()];
        for step in path.windows(2) {
            edges[step[0]].push(step[1]);
        }

        Self {
            tails,
            edges,
            start: path[0],
            root: path[positions - 1],
            prefix_len,
        }
    }

    fn walk<R: Rng + ?Sized>(&self, rng: &mut R, sequence: &[u8], out: &mut [u8]) {
        let n = self.edges.len();

        // Wilson's loop-erased random walk; `exit[v]` is the index of v's
        // tree edge within edges[v].
        let mut in_tree = vec![false; n];
        let mut exit = vec![0usize; n];
        in_tree[self.root] = true;
        for v in 0..n {
            let mut u = v;
            while !in_tree[u] {
                exit[u] = rng.gen_range(0..self.edges[u].len());
                u = self.edges[u][exit[u]];
            }
            let mut u = v;
            while !in_tree[u] {
                in_tree[u] = true;
                u = self.edges[u][exit[u]];
            }
        }

        let mut order = self.edges.clone();
        for (v, targets) in order.iter_mut().enumerate() {
            if v == self.root {
                targets.shuffle(rng);
            } else {
                let last = targets.len() - 1;
                targets.swap(exit[v], last);
                targets[..last].shuffle(rng);
            }
        }

        out[..self.prefix_len].copy_from_slice(&sequence[..self.prefix_len]);
        let mut cursor = vec![0usize; n];
        let mut u = self.start;
        for slot in out[self.prefix_len..].iter_mut() {
            let v = order[u][cursor[u]];
            cursor[u] += 1;
            *slot = self.tails[v];
            u = v;
        }
    }
}

impl EulerShuffler {
    /// An engine with an entropy-seeded generator. The orchestrator replaces
    /// it through [`ShuffleEngine::set_random_source`].
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self { rng, primed: None }
    }

    pub fn is_primed(&self) -> bool {
        self.primed.is_some()
    }
}

impl Default for EulerShuffler {
    fn default() -> Self {
        Self::new()
    }
}

impl ShuffleEngine for EulerShuffler {
    fn set_random_source(&mut self, rng: StdRng) {
        self.rng = rng;
    }

    fn prime(&mut self, sequence: &[u8], k: usize) -> Result<(), EngineError> {
        if k == 0 {
            return Err(EngineError::InvalidKletSize);
        }
        if sequence.is_empty() {
            return Err(EngineError::EmptySequence);
        }

        let plan = if k >= sequence.len() {
            Plan::Identity
        } else if k == 1 {
            Plan::Permute
        } else {
            Plan::Euler(KletGraph::build(sequence, k))
        };

        self.primed = Some(Primed {
            sequence: sequence.to_vec(),
            plan,
        });
        Ok(())
    }

    fn draw(&mut self, out: &mut [u8]) -> Result<(), EngineError> {
        let primed = self.primed.as_ref().ok_or(EngineError::NotPrimed)?;
        if out.len() != primed.sequence.len() {
            return Err(EngineError::LengthMismatch {
                expected: primed.sequence.len(),
                actual: out.len(),
            });
        }

        match &primed.plan {
            Plan::Identity => out.copy_from_slice(&primed.sequence),
            Plan::Permute => {
                out.copy_from_slice(&primed.sequence);
                out.shuffle(&mut self.rng);
            }
            Plan::Euler(graph) => graph.walk(&mut self.rng, &primed.sequence, out),
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.primed = None;
    }
}

use crate::collections::change_log::ChangeLog;
use crate::collections::heap::IndexedPriorityQueue;
use crate::cost::Cost;
use crate::engine::key::Key;
use crate::error::{EngineError, Result};
use crate::oracle::GraphOracle;
use hashbrown::HashMap;
use smallvec::SmallVec;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};

/// The per-vertex (g, rhs) pair. Missing vertices are treated as
/// `{ g: INFINITY, rhs: INFINITY }`, so lookups never fail.
#[derive(Debug, Clone, Copy)]
struct VertexRecord {
    g: Cost,
    rhs: Cost,
}

impl Default for VertexRecord {
    fn default() -> Self {
        VertexRecord {
            g: Cost::INFINITY,
            rhs: Cost::INFINITY,
        }
    }
}

/// Incremental goal-rooted shortest-path replanner.
///
/// Maintains a consistent `(g, rhs)` estimate tree rooted at a fixed
/// `goal`, replanning from a `start` that may move between calls, and
/// reusing as much of the previous frontier as the change between calls
/// allows. Modeled on D* Lite.
///
/// `O` is taken by value behind a plain type parameter rather than
/// `Box<dyn GraphOracle<V>>`: an `Engine` is built against exactly one
/// oracle type for its lifetime, so there is no need for the dynamic
/// dispatch this codebase reserves for genuinely heterogeneous
/// collections (e.g. `Box<dyn Theory>` across multiple reasoners).
pub struct Engine<V, O> {
    oracle: O,
    goal: V,
    start: V,
    /// The start at which `k_m` was last updated.
    last_start: V,
    /// Running compensation added to primary keys so that moving `start`
    /// does not require re-keying the whole frontier.
    k_m: Cost,
    records: HashMap<V, VertexRecord>,
    queue: IndexedPriorityQueue<V, Key>,
    change_log: ChangeLog<V>,
    #[cfg(debug_assertions)]
    last_popped_key: Option<Key>,
}

impl<V, O> Engine<V, O>
where
    V: Eq + Hash + Clone + Debug,
    O: GraphOracle<V>,
{
    /// Builds a new engine. `rhs(goal)` is initialized to zero and `goal`
    /// is enqueued with a key computed against the initial `start`
    /// (`k_m = 0`, `last_start = start`).
    pub fn new(oracle: O, start: V, goal: V) -> Engine<V, O> {
        let mut records = HashMap::new();
        records.insert(
            goal.clone(),
            VertexRecord {
                g: Cost::INFINITY,
                rhs: Cost::ZERO,
            },
        );

        let mut engine = Engine {
            oracle,
            goal: goal.clone(),
            start: start.clone(),
            last_start: start,
            k_m: Cost::ZERO,
            records,
            queue: IndexedPriorityQueue::new(),
            change_log: ChangeLog::new(),
            #[cfg(debug_assertions)]
            last_popped_key: None,
        };
        let key = engine.key(&goal);
        engine.queue.add(goal, key);
        engine
    }

    pub fn start(&self) -> V {
        self.start.clone()
    }

    pub fn goal(&self) -> V {
        self.goal.clone()
    }

    /// Reports an edge-cost change without applying it: effects are
    /// realized at the top of the next `plan()` call. Safe to call from
    /// another thread while `plan()` runs, since the change log is its
    /// own synchronized component.
    pub fn flag_cost_change(&self, u: V, v: V, old_cost: Cost, new_cost: Cost) {
        self.change_log.push(crate::collections::change_log::ChangeRecord {
            u,
            v,
            old_cost,
            new_cost,
        });
    }

    /// Replans for a moved agent without re-keying the whole frontier:
    /// advances `k_m` by `h(last_start, new_start)` and moves
    /// `last_start`/`start` forward. Calling this twice with the same
    /// vertex is equivalent to calling it once, since `h(a, a) = 0`.
    pub fn update_start(&mut self, new_start: V) {
        let delta = self.oracle.h(&self.last_start, &new_start);
        self.k_m = self.k_m + delta;
        self.last_start = new_start.clone();
        self.start = new_start;
    }

    /// Drains the change log, restores frontier consistency, and returns
    /// an optimal start-to-goal path, or an empty sequence if none exists.
    pub fn plan(&mut self) -> Result<Vec<V>> {
        self.plan_impl(None)
    }

    /// As [`Engine::plan`], but checks `cancel` once per iteration of the
    /// main loop and returns early (with whatever path the
    /// currently-known estimates support) if it is set. Leaves `(g, rhs,
    /// queue)` internally consistent either way, so a cancelled plan can
    /// always be resumed by a later `plan()` call.
    pub fn plan_cancellable(&mut self, cancel: &AtomicBool) -> Result<Vec<V>> {
        self.plan_impl(Some(cancel))
    }

    fn plan_impl(&mut self, cancel: Option<&AtomicBool>) -> Result<Vec<V>> {
        let span = tracing::debug_span!("plan");
        let _enter = span.enter();

        let changes = self.change_log.drain();
        tracing::trace!(changed_edges = changes.len(), "draining change log");
        for record in &changes {
            if record.new_cost.into_inner() < 0.0 {
                return Err(EngineError::NegativeCost {
                    u: format!("{:?}", record.u),
                    v: format!("{:?}", record.v),
                    cost: record.new_cost.to_string(),
                });
            }
        }
        for record in changes {
            // a change to the cost of edge (u, v) can affect only rhs(u)
            // in a goal-rooted tree.
            self.update_vertex(&record.u)?;
        }

        self.compute_shortest_path(cancel)?;

        let start = self.start.clone();
        if self.record(&start).g.is_infinite() {
            tracing::debug!("no path to goal");
            return Ok(Vec::new());
        }

        let path = self.reconstruct_path();
        tracing::debug!(path_len = path.len(), cost = %self.record(&start).g, "plan complete");
        Ok(path)
    }

    fn reconstruct_path(&self) -> Vec<V> {
        let mut path = vec![self.start.clone()];
        let mut current = self.start.clone();
        // a safety cap against reconstructing forever if invariants were
        // somehow violated; a correct run visits each vertex at most once.
        let cap = self.records.len() + 1;
        for _ in 0..cap {
            if current == self.goal {
                return path;
            }
            let next = self
                .oracle
                .successors(&current)
                .min_by_key(|s| self.oracle.c(&current, s) + self.record(s).g);
            match next {
                Some(next) => {
                    path.push(next.clone());
                    current = next;
                }
                None => break,
            }
        }
        if current != self.goal {
            tracing::warn!("path reconstruction did not reach the goal; g(start) was stale");
            return Vec::new();
        }
        path
    }

    fn record(&self, v: &V) -> VertexRecord {
        self.records.get(v).copied().unwrap_or_default()
    }

    fn set_g(&mut self, v: &V, g: Cost) {
        self.records.entry(v.clone()).or_default().g = g;
    }

    fn set_rhs(&mut self, v: &V, rhs: Cost) {
        self.records.entry(v.clone()).or_default().rhs = rhs;
    }

    /// `key(s) = (min(g(s), rhs(s)) + h(start, s) + k_m, min(g(s), rhs(s)))`
    fn key(&self, v: &V) -> Key {
        let r = self.record(v);
        let base = r.g.min(r.rhs);
        Key::new(base + self.oracle.h(&self.start, v) + self.k_m, base)
    }

    /// Recomputes `rhs`, then fixes the vertex's frontier membership to
    /// match `g != rhs`.
    fn update_vertex(&mut self, v: &V) -> Result<()> {
        if *v != self.goal {
            let successors: SmallVec<[V; 8]> = self.oracle.successors(v).collect();
            for s in &successors {
                let edge_cost = self.oracle.c(v, s);
                if edge_cost.into_inner() < 0.0 {
                    return Err(EngineError::NegativeCost {
                        u: format!("{v:?}"),
                        v: format!("{s:?}"),
                        cost: edge_cost.to_string(),
                    });
                }
            }
            let best = successors
                .iter()
                .map(|s| self.oracle.c(v, s) + self.record(s).g)
                .min()
                .unwrap_or(Cost::INFINITY);
            self.set_rhs(v, best);
        }

        if self.queue.contains(v) {
            self.queue.remove(v);
        }
        let r = self.record(v);
        if r.g != r.rhs {
            let key = self.key(v);
            self.queue.add(v.clone(), key);
        }
        tracing::trace!(vertex = ?v, g = %self.record(v).g, rhs = %self.record(v).rhs, "update_vertex");
        Ok(())
    }

    /// Drains the frontier until the goal-rooted tree is consistent at
    /// `start` and no pending key could still improve it.
    fn compute_shortest_path(&mut self, cancel: Option<&AtomicBool>) -> Result<()> {
        loop {
            if let Some(flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    tracing::debug!("compute_shortest_path cancelled");
                    return Ok(());
                }
            }

            let start = self.start.clone();
            let start_key = self.key(&start);
            let top_key = self.queue.peek_key();
            let frontier_ahead = matches!(top_key, Some(k) if k < start_key);
            let start_inconsistent = {
                let r = self.record(&start);
                r.g != r.rhs
            };
            if !frontier_ahead && !start_inconsistent {
                break;
            }

            let Some(u) = self.queue.peek().cloned() else {
                // an empty queue with the loop condition still true means
                // the supplied heuristic is likely inconsistent; report no
                // path rather than looping forever.
                tracing::warn!("compute_shortest_path: frontier exhausted without reaching consistency");
                self.set_g(&start, Cost::INFINITY);
                break;
            };
            let k_old = self.queue.peek_key().expect("peek succeeded above");
            let k_new = self.key(&u);

            if k_old < k_new {
                self.queue.update(&u, k_new);
                continue;
            }

            self.debug_check_monotone(k_old);
            self.queue.poll();

            let r = self.record(&u);
            if r.g > r.rhs {
                self.set_g(&u, r.rhs);
                let predecessors: SmallVec<[V; 8]> = self.oracle.predecessors(&u).collect();
                for p in predecessors {
                    self.update_vertex(&p)?;
                }
            } else {
                self.set_g(&u, Cost::INFINITY);
                let mut affected: SmallVec<[V; 8]> = self.oracle.predecessors(&u).collect();
                affected.push(u);
                for p in affected {
                    self.update_vertex(&p)?;
                }
            }
        }
        Ok(())
    }

    #[cfg(debug_assertions)]
    fn debug_check_monotone(&mut self, popped_key: Key) {
        if let Some(last) = self.last_popped_key {
            if popped_key < last {
                tracing::warn!(
                    ?popped_key,
                    ?last,
                    "InconsistentHeuristic: popped key smaller than a previously popped key; \
                     the supplied heuristic is probably not consistent"
                );
            }
        }
        self.last_popped_key = Some(popped_key);
    }

    #[cfg(not(debug_assertions))]
    fn debug_check_monotone(&mut self, _popped_key: Key) {}
}

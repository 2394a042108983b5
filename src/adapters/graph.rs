use crate::cost::Cost;
use crate::oracle::GraphOracle;
use hashbrown::HashMap;
use smallvec::SmallVec;
use std::hash::Hash;

/// An adjacency-list graph over arbitrary vertex ids. Out- and in-edges
/// are stored separately so both
/// `successors` and `predecessors` are O(degree) rather than requiring a
/// reverse scan.
///
/// Each adjacency list is a `SmallVec` rather than a `Vec`: real graphs
/// fed to a path planner overwhelmingly have small, bounded fan-out (grid
/// neighbors, road intersections, waypoint graphs), the same "small fixed
/// fan-out" shape this codebase reaches for `smallvec` to cover elsewhere.
#[derive(Debug, Clone)]
pub struct GenericGraph<V> {
    out_edges: HashMap<V, SmallVec<[(V, Cost); 4]>>,
    in_edges: HashMap<V, SmallVec<[V; 4]>>,
}

impl<V> Default for GenericGraph<V>
where
    V: Eq + Hash + Clone,
{
    fn default() -> Self {
        GenericGraph {
            out_edges: HashMap::new(),
            in_edges: HashMap::new(),
        }
    }
}

impl<V> GenericGraph<V>
where
    V: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a directed edge `u -> v` with the given cost, overwriting any
    /// existing cost for that ordered pair.
    pub fn add_edge(&mut self, u: V, v: V, cost: Cost) {
        let outs = self.out_edges.entry(u.clone()).or_default();
        if let Some(slot) = outs.iter_mut().find(|(t, _)| *t == v) {
            slot.1 = cost;
        } else {
            outs.push((v.clone(), cost));
        }
        let ins = self.in_edges.entry(v).or_default();
        if !ins.contains(&u) {
            ins.push(u);
        }
    }

    /// Sets the cost of an existing edge `u -> v`. No-op if the edge does
    /// not exist; use [`GenericGraph::add_edge`] to create one.
    pub fn set_cost(&mut self, u: &V, v: &V, cost: Cost) {
        if let Some(outs) = self.out_edges.get_mut(u) {
            if let Some(slot) = outs.iter_mut().find(|(t, _)| t == v) {
                slot.1 = cost;
            }
        }
    }

    /// Wraps the graph in the shared, interior-mutable handle an `Engine`
    /// and the surrounding mutating code can hold at once.
    pub fn into_shared(self) -> SharedGraph<V> {
        std::rc::Rc::new(std::cell::RefCell::new(self))
    }
}

impl<V> GraphOracle<V> for GenericGraph<V>
where
    V: Eq + Hash + Clone,
{
    fn successors(&self, v: &V) -> impl Iterator<Item = V> + '_ {
        self.out_edges.get(v).into_iter().flatten().map(|(t, _)| t.clone())
    }

    fn predecessors(&self, v: &V) -> impl Iterator<Item = V> + '_ {
        self.in_edges.get(v).into_iter().flatten().cloned()
    }

    fn c(&self, u: &V, v: &V) -> Cost {
        self.out_edges
            .get(u)
            .and_then(|outs| outs.iter().find(|(t, _)| t == v))
            .map(|(_, c)| *c)
            .unwrap_or(Cost::INFINITY)
    }

    /// Defaults to zero, degrading the engine to uniform-cost search. Wrap
    /// this adapter (or implement `GraphOracle` directly) to supply a real
    /// admissible heuristic.
    fn h(&self, _a: &V, _b: &V) -> Cost {
        Cost::ZERO
    }
}

/// A graph shared between an `Engine` and the code that mutates it between
/// plan cycles, the same shape as [`crate::adapters::grid::SharedGrid`].
pub type SharedGraph<V> = std::rc::Rc<std::cell::RefCell<GenericGraph<V>>>;

impl<V> GraphOracle<V> for SharedGraph<V>
where
    V: Eq + Hash + Clone,
{
    fn successors(&self, v: &V) -> impl Iterator<Item = V> + '_ {
        self.borrow().successors(v).collect::<Vec<_>>().into_iter()
    }
    fn predecessors(&self, v: &V) -> impl Iterator<Item = V> + '_ {
        self.borrow().predecessors(v).collect::<Vec<_>>().into_iter()
    }
    fn c(&self, u: &V, v: &V) -> Cost {
        self.borrow().c(u, v)
    }
    fn h(&self, a: &V, b: &V) -> Cost {
        self.borrow().h(a, b)
    }
}

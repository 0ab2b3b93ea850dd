use std::cell::RefCell;
use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap};

use crate::foundation::error::{WobbleError, WobbleResult};

/// Handle to a layer owned by a [`LayerManager`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct LayerId(pub(crate) u32);

impl LayerId {
    /// Creation index; also the tie-breaker between unconstrained layers.
    pub fn index(self) -> u32 {
        self.0
    }
}

#[derive(Debug)]
struct Layer {
    name: String,
    /// Layers this one draws on top of.
    above: BTreeSet<u32>,
    /// Layers this one draws beneath.
    below: BTreeSet<u32>,
}

/// Named draw-order layers with "draw above / below" constraints.
///
/// Constraints are edges in a draw-order graph (`a.require_above(b)` is the edge `b -> a`, "b
/// before a"). The graph is kept acyclic: a constraint that would close a cycle is dropped at
/// insertion time, so the previously resolved order stays valid. Resolution is a deterministic
/// topological sort (smallest creation index first among ready layers), computed lazily on the
/// first read after a mutation.
///
/// Two sentinels bound every user layer: [`LayerManager::default_layer`] always resolves first
/// and [`LayerManager::top_layer`] always last. Constraints naming a sentinel are ignored.
#[derive(Debug)]
pub struct LayerManager {
    layers: Vec<Layer>,
    by_name: HashMap<String, u32>,
    /// `order[layer index]` = position in the resolved order.
    order: RefCell<Option<Vec<u32>>>,
}

const DEFAULT_LAYER: u32 = 0;
const TOP_LAYER: u32 = 1;

impl Default for LayerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerManager {
    /// Manager holding only the two sentinels.
    pub fn new() -> Self {
        let mut m = Self {
            layers: Vec::new(),
            by_name: HashMap::new(),
            order: RefCell::new(None),
        };
        m.push_layer("default");
        m.push_layer("top");
        m
    }

    /// Sentinel drawn beneath every user layer. Drawables without a layer live here.
    pub fn default_layer(&self) -> LayerId {
        LayerId(DEFAULT_LAYER)
    }

    /// Sentinel drawn above every user layer.
    pub fn top_layer(&self) -> LayerId {
        LayerId(TOP_LAYER)
    }

    /// Create a layer named `name`. Names are unique.
    pub fn new_layer(&mut self, name: &str) -> WobbleResult<LayerId> {
        if self.by_name.contains_key(name) {
            return Err(WobbleError::invalid_argument(format!(
                "layer '{name}' already exists"
            )));
        }
        let id = self.push_layer(name);
        self.invalidate();
        Ok(id)
    }

    /// Look a layer up by name.
    pub fn layer(&self, name: &str) -> Option<LayerId> {
        self.by_name.get(name).copied().map(LayerId)
    }

    /// Name of `id`.
    pub fn name(&self, id: LayerId) -> Option<&str> {
        self.layers.get(id.0 as usize).map(|l| l.name.as_str())
    }

    /// Number of layers including the two sentinels.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always `false`; the sentinels are permanent.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Require `layer` to draw above `other`.
    ///
    /// Returns whether the constraint was recorded. It is dropped when it names a sentinel, is a
    /// self-reference, or would close a cycle.
    pub fn require_above(&mut self, layer: LayerId, other: LayerId) -> WobbleResult<bool> {
        self.add_edge(other, layer)
    }

    /// Require `layer` to draw beneath `other`.
    ///
    /// Same recording rules as [`LayerManager::require_above`].
    pub fn require_below(&mut self, layer: LayerId, other: LayerId) -> WobbleResult<bool> {
        self.add_edge(layer, other)
    }

    /// Layers `layer` is constrained to draw above.
    pub fn above_of(&self, layer: LayerId) -> Vec<LayerId> {
        self.layers
            .get(layer.0 as usize)
            .map(|l| l.above.iter().copied().map(LayerId).collect())
            .unwrap_or_default()
    }

    /// Layers `layer` is constrained to draw beneath.
    pub fn below_of(&self, layer: LayerId) -> Vec<LayerId> {
        self.layers
            .get(layer.0 as usize)
            .map(|l| l.below.iter().copied().map(LayerId).collect())
            .unwrap_or_default()
    }

    /// Position of `layer` in the resolved draw order (lower draws first).
    pub fn order_of(&self, layer: LayerId) -> WobbleResult<u32> {
        self.check(layer)?;
        self.ensure_resolved();
        let order = self.order.borrow();
        Ok(order.as_ref().map_or(0, |o| o[layer.0 as usize]))
    }

    /// All layers from bottom to top.
    pub fn resolved_order(&self) -> Vec<LayerId> {
        self.ensure_resolved();
        let order = self.order.borrow();
        let mut out = vec![LayerId(0); self.layers.len()];
        if let Some(order) = order.as_ref() {
            for (idx, &pos) in order.iter().enumerate() {
                out[pos as usize] = LayerId(idx as u32);
            }
        }
        out
    }

    fn push_layer(&mut self, name: &str) -> LayerId {
        let idx = self.layers.len() as u32;
        self.layers.push(Layer {
            name: name.to_string(),
            above: BTreeSet::new(),
            below: BTreeSet::new(),
        });
        self.by_name.insert(name.to_string(), idx);
        LayerId(idx)
    }

    fn check(&self, id: LayerId) -> WobbleResult<()> {
        if (id.0 as usize) < self.layers.len() {
            Ok(())
        } else {
            Err(WobbleError::invalid_argument(format!(
                "layer {} does not belong to this manager",
                id.0
            )))
        }
    }

    fn is_sentinel(id: u32) -> bool {
        id == DEFAULT_LAYER || id == TOP_LAYER
    }

    fn invalidate(&mut self) {
        *self.order.get_mut() = None;
    }

    /// Record the edge `from -> to` ("from draws before to").
    fn add_edge(&mut self, from: LayerId, to: LayerId) -> WobbleResult<bool> {
        self.check(from)?;
        self.check(to)?;
        let (from, to) = (from.0, to.0);
        if Self::is_sentinel(from) || Self::is_sentinel(to) {
            tracing::debug!(from, to, "ignoring layer constraint on a pinned sentinel");
            return Ok(false);
        }
        if from == to {
            tracing::debug!(layer = from, "ignoring self-referencing layer constraint");
            return Ok(false);
        }
        if self.layers[to as usize].above.contains(&from) {
            return Ok(true);
        }
        if self.reaches(to, from) {
            tracing::debug!(
                from = %self.layers[from as usize].name,
                to = %self.layers[to as usize].name,
                "dropping layer constraint that would close a cycle"
            );
            return Ok(false);
        }
        self.layers[to as usize].above.insert(from);
        self.layers[from as usize].below.insert(to);
        self.invalidate();
        Ok(true)
    }

    /// Whether `target` is reachable from `start` along existing edges.
    fn reaches(&self, start: u32, target: u32) -> bool {
        let mut seen = vec![false; self.layers.len()];
        let mut stack = vec![start];
        while let Some(n) = stack.pop() {
            if n == target {
                return true;
            }
            if std::mem::replace(&mut seen[n as usize], true) {
                continue;
            }
            stack.extend(self.layers[n as usize].below.iter().copied());
        }
        false
    }

    fn ensure_resolved(&self) {
        if self.order.borrow().is_some() {
            return;
        }
        let resolved = self.resolve();
        *self.order.borrow_mut() = Some(resolved);
    }

    #[tracing::instrument(skip(self), fields(layers = self.layers.len()))]
    fn resolve(&self) -> Vec<u32> {
        let n = self.layers.len();
        let mut indeg: Vec<usize> = self.layers.iter().map(|l| l.above.len()).collect();
        let mut ready = BinaryHeap::<Reverse<u32>>::new();
        for (i, &deg) in indeg.iter().enumerate() {
            let i = i as u32;
            if deg == 0 && !Self::is_sentinel(i) {
                ready.push(Reverse(i));
            }
        }

        let mut order = vec![0u32; n];
        order[DEFAULT_LAYER as usize] = 0;
        let mut next = 1u32;
        let mut placed = vec![false; n];
        placed[DEFAULT_LAYER as usize] = true;
        placed[TOP_LAYER as usize] = true;

        while let Some(Reverse(i)) = ready.pop() {
            order[i as usize] = next;
            next += 1;
            placed[i as usize] = true;
            for &dep in &self.layers[i as usize].below {
                let d = &mut indeg[dep as usize];
                *d = d.saturating_sub(1);
                if *d == 0 {
                    ready.push(Reverse(dep));
                }
            }
        }

        // Insertion-time cycle rejection keeps the graph acyclic; anything left over would only
        // come from a broken invariant, so place it in creation order instead of failing.
        for (i, done) in placed.iter().enumerate() {
            if !done {
                tracing::debug!(layer = i, "layer left unresolved, appending in creation order");
                order[i] = next;
                next += 1;
            }
        }
        order[TOP_LAYER as usize] = next;
        order
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/manager.rs"]
mod tests;

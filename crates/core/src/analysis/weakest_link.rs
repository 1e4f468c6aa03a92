use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::Serialize;

use crate::analysis::{IdResolver, RecordSet, TokenResolution};

/// Resolved dependency edges: id -> ids of known records, in declaration order.
///
/// Tokens that do not resolve to a record in the set are dropped here, which
/// is what makes a missing dependency contribute no cap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    edges: BTreeMap<String, Vec<String>>,
    /// Per-token classification, parallel to each record's `depends_on`.
    tokens: BTreeMap<String, Vec<TokenResolution>>,
}

impl DependencyGraph {
    pub fn build(records: &RecordSet, ids: &IdResolver<'_>) -> Self {
        let mut edges = BTreeMap::new();
        let mut tokens = BTreeMap::new();
        for (id, record) in records {
            let resolved: Vec<TokenResolution> =
                record.depends_on.iter().map(|token| ids.classify(token)).collect();
            let deps = resolved
                .iter()
                .map(TokenResolution::target)
                .filter(|dep| records.contains(dep))
                .map(str::to_string)
                .collect();
            edges.insert(id.clone(), deps);
            tokens.insert(id.clone(), resolved);
        }
        Self { edges, tokens }
    }

    /// How each of `id`'s dependency tokens resolved, in declaration order.
    pub fn token_resolutions(&self, id: &str) -> &[TokenResolution] {
        self.tokens.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Known dependencies of `id`; empty for ids outside the graph.
    pub fn dependencies(&self, id: &str) -> &[String] {
        self.edges.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Output of one resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Effective bits for every id in the set.
    pub effective: BTreeMap<String, u64>,
    /// Ids that were revisited while still in progress (or cut by the depth
    /// ceiling). Each such occurrence resolved to 0.
    pub cyclic: BTreeSet<String>,
}

impl Resolution {
    pub fn effective_bits(&self, id: &str) -> Option<u64> {
        self.effective.get(id).copied()
    }
}

/// Weakest-link resolver:
/// `effective(r) = min(own(r), effective(d) for each known dependency d)`.
#[derive(Debug)]
pub struct WeakestLinkResolver<'a> {
    records: &'a RecordSet,
    graph: DependencyGraph,
}

struct Frame<'g> {
    id: &'g str,
    deps: &'g [String],
    next: usize,
    cap: u64,
}

impl<'a> WeakestLinkResolver<'a> {
    /// Resolve dependency tokens with the default prefix registry.
    pub fn new(records: &'a RecordSet) -> Self {
        Self::with_resolver(records, &IdResolver::new(records))
    }

    pub fn with_resolver(records: &'a RecordSet, ids: &IdResolver<'_>) -> Self {
        Self { records, graph: DependencyGraph::build(records, ids) }
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    fn own_bits(&self, id: &str) -> u64 {
        self.records.get(id).map(|r| r.own_bits_or_zero()).unwrap_or(0)
    }

    /// Compute effective bits for every record. Each id is computed once.
    pub fn resolve(&self) -> Resolution {
        let mut memo: HashMap<&str, u64> = HashMap::with_capacity(self.records.len());
        let mut cyclic: BTreeSet<String> = BTreeSet::new();
        for id in self.records.ids() {
            self.visit(id, &mut memo, &mut cyclic);
        }

        let effective = self
            .records
            .ids()
            .map(|id| (id.to_string(), memo.get(id).copied().unwrap_or(0)))
            .collect();
        Resolution { effective, cyclic }
    }

    /// Depth-first traversal from `root`, filling `memo` for every id reached.
    ///
    /// Any chain deeper than the record count must contain a cycle the
    /// visiting set missed, so it is cut the same way.
    fn visit<'g>(
        &'g self,
        root: &'g str,
        memo: &mut HashMap<&'g str, u64>,
        cyclic: &mut BTreeSet<String>,
    ) {
        if memo.contains_key(root) {
            return;
        }
        let max_depth = self.records.len().max(1);
        let mut visiting: HashSet<&'g str> = HashSet::new();
        let mut stack: Vec<Frame<'g>> = Vec::new();

        visiting.insert(root);
        stack.push(self.frame(root));

        loop {
            let depth = stack.len();
            let Some(top) = stack.last_mut() else { break };
            let deps = top.deps;
            if let Some(dep) = deps.get(top.next) {
                top.next += 1;
                if let Some(&bits) = memo.get(dep.as_str()) {
                    top.cap = top.cap.min(bits);
                    continue;
                }
                if visiting.contains(dep.as_str()) || depth >= max_depth {
                    tracing::warn!(from = top.id, to = %dep, "dependency cycle; capping to 0");
                    cyclic.insert(dep.clone());
                    top.cap = 0;
                    continue;
                }
                visiting.insert(dep.as_str());
                let frame = self.frame(dep);
                stack.push(frame);
                continue;
            }

            let Some(done) = stack.pop() else { break };
            visiting.remove(done.id);
            memo.insert(done.id, done.cap);
            if let Some(parent) = stack.last_mut() {
                parent.cap = parent.cap.min(done.cap);
            }
        }
    }

    fn frame<'g>(&'g self, id: &'g str) -> Frame<'g> {
        Frame { id, deps: self.graph.dependencies(id), next: 0, cap: self.own_bits(id) }
    }
}

/// Resolve effective bits for a record set using the default prefix registry.
pub fn compute_effective_bits(records: &RecordSet) -> Resolution {
    WeakestLinkResolver::new(records).resolve()
}

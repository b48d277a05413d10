use std::collections::{HashMap, HashSet};
use std::fmt;

use indexmap::IndexSet;
use lineage_types::{TypeEnv, TypeId};

use crate::{Hierarchy, HierarchyError, Result};

/// A path of direct supertype links: the first element is the class the search started from,
/// the last is the searched ancestor, and each element directly extends or implements the next.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SuperclassChain(Vec<TypeId>);

impl SuperclassChain {
    pub fn start(&self) -> TypeId {
        self.0[0]
    }

    pub fn target(&self) -> TypeId {
        self.0[self.0.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; a chain contains at least its start.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[TypeId] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.0.iter().copied()
    }

    /// Adjacent `(child, parent)` pairs, most-derived first.
    pub fn links(&self) -> impl Iterator<Item = (TypeId, TypeId)> + '_ {
        self.0.windows(2).map(|pair| (pair[0], pair[1]))
    }

    pub fn into_vec(self) -> Vec<TypeId> {
        self.0
    }

    /// Renders the chain as `a.B -> a.C -> ...` using `env` for names.
    pub fn display<'a, E: TypeEnv + ?Sized>(&'a self, env: &'a E) -> ChainDisplay<'a, E> {
        ChainDisplay { chain: self, env }
    }
}

impl AsRef<[TypeId]> for SuperclassChain {
    fn as_ref(&self) -> &[TypeId] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a SuperclassChain {
    type Item = &'a TypeId;
    type IntoIter = std::slice::Iter<'a, TypeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

pub struct ChainDisplay<'a, E: ?Sized> {
    chain: &'a SuperclassChain,
    env: &'a E,
}

impl<E: TypeEnv + ?Sized> fmt::Display for ChainDisplay<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, id) in self.chain.iter().enumerate() {
            if idx > 0 {
                f.write_str(" -> ")?;
            }
            f.write_str(&self.env.display_name(id))?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Edges {
    SuperclassOnly,
    WithInterfaces,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SearchMode {
    First,
    All,
}

fn parents<E: TypeEnv + ?Sized>(env: &E, id: TypeId, edges: Edges) -> Vec<TypeId> {
    let mut out = Vec::new();
    out.extend(env.super_class(id));
    if edges == Edges::WithInterfaces {
        out.extend(env.interfaces(id).iter().map(|iface| iface.def));
    }
    out
}

/// Per-query memo of which types can reach `target` along `edges`.
struct Reachability<'a, E: ?Sized> {
    env: &'a E,
    target: TypeId,
    edges: Edges,
    memo: HashMap<TypeId, bool>,
}

impl<'a, E: TypeEnv + ?Sized> Reachability<'a, E> {
    fn new(env: &'a E, target: TypeId, edges: Edges) -> Self {
        Self {
            env,
            target,
            edges,
            memo: HashMap::new(),
        }
    }

    fn parents(&self, id: TypeId) -> Vec<TypeId> {
        parents(self.env, id, self.edges)
    }

    fn can_reach(&mut self, start: TypeId) -> bool {
        if let Some(&known) = self.memo.get(&start) {
            return known;
        }

        // Post-order walk: a node is decided once all its parents are.
        let mut stack = vec![(start, false)];
        let mut in_progress = HashSet::new();
        while let Some((node, expanded)) = stack.pop() {
            if self.memo.contains_key(&node) {
                continue;
            }
            if node == self.target {
                self.memo.insert(node, true);
                continue;
            }

            if expanded {
                let reached = self
                    .parents(node)
                    .iter()
                    .any(|parent| self.memo.get(parent).copied().unwrap_or(false));
                self.memo.insert(node, reached);
                in_progress.remove(&node);
                continue;
            }

            if !in_progress.insert(node) {
                continue;
            }
            stack.push((node, true));
            for parent in self.parents(node) {
                if in_progress.contains(&parent) {
                    tracing::warn!(
                        class = %self.env.display_name(node),
                        supertype = %self.env.display_name(parent),
                        "supertype cycle; ignoring edge"
                    );
                    continue;
                }
                if !self.memo.contains_key(&parent) {
                    stack.push((parent, false));
                }
            }
        }

        self.memo.get(&start).copied().unwrap_or(false)
    }
}

struct Frame {
    node: TypeId,
    parents: Vec<TypeId>,
    next: usize,
}

impl<'env, E: TypeEnv + ?Sized> Hierarchy<'env, E> {
    /// Returns one chain of direct supertype links from `start` to `target`, or `None` if `target`
    /// is not a supertype of `start`. Which chain is returned when several exist is unspecified.
    pub fn find_one_chain(&self, start: TypeId, target: TypeId) -> Result<Option<SuperclassChain>> {
        let chains = self.search(start, target, SearchMode::First)?;
        Ok(chains.and_then(|chains| chains.into_iter().next()))
    }

    /// Returns every distinct chain from `start` to `target`, or `None` if there is none.
    ///
    /// Interface edges are only followed when `target` is an interface, so a class target yields
    /// exactly one chain along the superclass spine.
    pub fn find_all_chains(
        &self,
        start: TypeId,
        target: TypeId,
    ) -> Result<Option<IndexSet<SuperclassChain>>> {
        self.search(start, target, SearchMode::All)
    }

    /// Whether a value of type `start` can be assigned to `target`: reflexive, transitive over
    /// superclass and interface edges, and every interface is assignable to the root class.
    pub fn is_assignable_from(&self, target: TypeId, start: TypeId) -> Result<bool> {
        self.require_defined(target, "target")?;
        self.require_defined(start, "start")?;
        Ok(self.assignable(target, start))
    }

    /// Whether any of `targets` is assignable from `start`.
    pub fn is_any_assignable_from(&self, targets: &[TypeId], start: TypeId) -> Result<bool> {
        self.require_defined(start, "start")?;
        for &target in targets {
            self.require_defined(target, "targets")?;
        }
        Ok(targets.iter().any(|&target| self.assignable(target, start)))
    }

    pub(crate) fn assignable(&self, target: TypeId, start: TypeId) -> bool {
        if target == start {
            return true;
        }
        if self.env.is_interface(start) && self.env.root_class() == Some(target) {
            return true;
        }
        Reachability::new(self.env, target, Edges::WithInterfaces).can_reach(start)
    }

    fn search(
        &self,
        start: TypeId,
        target: TypeId,
        mode: SearchMode,
    ) -> Result<Option<IndexSet<SuperclassChain>>> {
        self.require_defined(start, "start")?;
        self.require_defined(target, "target")?;

        let edges = if self.env.is_interface(target) {
            Edges::WithInterfaces
        } else {
            Edges::SuperclassOnly
        };
        let mut reach = Reachability::new(self.env, target, edges);
        if !reach.can_reach(start) {
            tracing::trace!(
                start = %self.env.display_name(start),
                target = %self.env.display_name(target),
                "no supertype chain"
            );
            return Ok(None);
        }

        let mut chains = IndexSet::new();
        let mut on_path = HashSet::from([start]);
        let mut stack = vec![Frame {
            node: start,
            parents: reach.parents(start),
            next: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let node = frame.node;
            if node == target {
                chains.insert(SuperclassChain(stack.iter().map(|f| f.node).collect()));
                if mode == SearchMode::First {
                    break;
                }
                stack.pop();
                on_path.remove(&node);
                continue;
            }

            let Some(&parent) = frame.parents.get(frame.next) else {
                stack.pop();
                on_path.remove(&node);
                continue;
            };
            frame.next += 1;

            if on_path.contains(&parent) || !reach.can_reach(parent) {
                continue;
            }
            on_path.insert(parent);
            let parents = reach.parents(parent);
            stack.push(Frame {
                node: parent,
                parents,
                next: 0,
            });
        }

        if chains.is_empty() {
            // Only reachable when a cycle hides every path the memo found.
            return Ok(None);
        }
        tracing::trace!(
            start = %self.env.display_name(start),
            target = %self.env.display_name(target),
            chains = chains.len(),
            "found supertype chains"
        );
        Ok(Some(chains))
    }

    /// Like [`Hierarchy::find_one_chain`], but a missing chain is an `InternalConsistency` error.
    pub(crate) fn require_chain(&self, start: TypeId, target: TypeId) -> Result<SuperclassChain> {
        match self.find_one_chain(start, target)? {
            Some(chain) => Ok(chain),
            None => {
                let msg = format!(
                    "`{}` is not a supertype of `{}`",
                    self.env.display_name(target),
                    self.env.display_name(start)
                );
                tracing::error!("{msg}");
                Err(HierarchyError::InternalConsistency(msg))
            }
        }
    }
}

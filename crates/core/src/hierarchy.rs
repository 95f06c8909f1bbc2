//! Parent/child hierarchy of tickets.
//!
//! Tickets are placed in an index-addressed arena, parent links are resolved
//! in a second pass, cycles are broken, and only then are owned
//! [`TicketNode`] trees materialized. Sibling and root order always follows
//! input order.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::models::{Ticket, TicketId};

/// A ticket with its children attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketNode {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub children: Vec<TicketNode>,
}

impl TicketNode {
    /// Create a leaf node.
    pub fn new(ticket: Ticket) -> Self {
        Self {
            ticket,
            children: Vec::new(),
        }
    }

    /// Add a child node.
    pub fn with_child(mut self, child: TicketNode) -> Self {
        self.children.push(child);
        self
    }

    /// The wrapped ticket's id.
    pub fn id(&self) -> TicketId {
        self.ticket.id
    }

    /// Check if this node has children.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Number of nodes in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        self.iter().count()
    }

    /// Ids of this subtree in depth-first pre-order.
    pub fn ids(&self) -> Vec<TicketId> {
        self.iter().map(TicketNode::id).collect()
    }

    /// Depth-first pre-order walk over this subtree.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }
}

impl Drop for TicketNode {
    // Drops descendants iteratively.
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

/// Pre-order iterator returned by [`TicketNode::iter`].
pub struct PreOrder<'a> {
    stack: Vec<&'a TicketNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a TicketNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Arena of tickets addressed by input position.
struct Arena<'a> {
    tickets: Vec<&'a Ticket>,
    parent: Vec<Option<usize>>,
}

impl<'a> Arena<'a> {
    /// Index tickets by id, then resolve parent links.
    fn build(input: &'a [Ticket]) -> Self {
        let mut index: HashMap<TicketId, usize> = HashMap::with_capacity(input.len());
        let mut tickets = Vec::with_capacity(input.len());

        for ticket in input {
            if index.contains_key(&ticket.id) {
                warn!("Dropping duplicate ticket #{}", ticket.id);
                continue;
            }
            index.insert(ticket.id, tickets.len());
            tickets.push(ticket);
        }

        let parent = tickets
            .iter()
            .enumerate()
            .map(|(i, ticket)| {
                let resolved = ticket.parent.and_then(|p| index.get(&p).copied());
                match resolved {
                    Some(p) if p == i => {
                        debug!("Ticket #{} references itself as parent", ticket.id);
                        None
                    }
                    other => other,
                }
            })
            .collect();

        let mut arena = Self { tickets, parent };
        arena.break_cycles();
        arena
    }

    /// Detach one member of every parent cycle so the links form a forest.
    ///
    /// The detached member is the cycle member that came first in the input.
    fn break_cycles(&mut self) {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            Unvisited,
            OnPath,
            Done,
        }

        let mut marks = vec![Mark::Unvisited; self.tickets.len()];

        for start in 0..self.tickets.len() {
            if marks[start] != Mark::Unvisited {
                continue;
            }

            let mut path: Vec<usize> = Vec::new();
            let mut current = Some(start);

            while let Some(node) = current {
                match marks[node] {
                    Mark::Done => break,
                    Mark::OnPath => {
                        if let Some(pos) = path.iter().position(|&p| p == node)
                            && let Some(&detached) = path[pos..].iter().min()
                        {
                            warn!(
                                "Parent cycle detected; treating ticket #{} as a root",
                                self.tickets[detached].id
                            );
                            self.parent[detached] = None;
                        }
                        break;
                    }
                    Mark::Unvisited => {
                        marks[node] = Mark::OnPath;
                        path.push(node);
                        current = self.parent[node];
                    }
                }
            }

            for node in path {
                marks[node] = Mark::Done;
            }
        }
    }

    /// Materialize owned trees, roots and siblings in input order.
    fn into_roots(self) -> Vec<TicketNode> {
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); self.tickets.len()];
        let mut roots = Vec::new();

        for (i, parent) in self.parent.iter().enumerate() {
            match parent {
                Some(p) => children[*p].push(i),
                None => roots.push(i),
            }
        }

        let mut order = Vec::with_capacity(self.tickets.len());
        let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
        while let Some(i) = stack.pop() {
            order.push(i);
            stack.extend(children[i].iter().rev());
        }

        // Reverse pre-order builds every child before its parent.
        let mut built: Vec<Option<TicketNode>> = vec![None; self.tickets.len()];
        for &i in order.iter().rev() {
            let node = TicketNode {
                ticket: self.tickets[i].clone(),
                children: children[i].iter().filter_map(|&c| built[c].take()).collect(),
            };
            built[i] = Some(node);
        }

        roots.into_iter().filter_map(|i| built[i].take()).collect()
    }
}

/// Build the ticket forest from a flat list.
///
/// A ticket whose declared parent is not in `tickets` becomes a root, as does
/// a ticket that references itself. Parent cycles are broken by detaching the
/// cycle member that appears first in `tickets`. Duplicate ids keep their
/// first occurrence.
pub fn build_hierarchy(tickets: &[Ticket]) -> Vec<TicketNode> {
    let roots = Arena::build(tickets).into_roots();
    debug!(
        "Built hierarchy: {} tickets, {} roots",
        tickets.len(),
        roots.len()
    );
    roots
}

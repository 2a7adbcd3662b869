//! The derived per-chain tree index and its traversal algorithms.
//!
//! [`ChainTree`] stores messages in a [`HashMap`] and maintains a
//! forward-edge index (`children`) for child lookups. Construction validates
//! the structural invariants once; queries after that are infallible except
//! for slot exhaustion.
//!
//! # Invariants
//!
//! - Exactly one seed (parent-less message) per chain.
//! - Every parent reference resolves within the chain.
//! - `generation` equals parent generation + 1 (seed is 0), which also rules
//!   out cycles: generations strictly decrease walking any parent edge.

use std::collections::{HashMap, VecDeque};

use rand::Rng;
use tracing::debug;

use grapevine_types::{Chain, Message, MessageId, SelectionMethod};

use crate::error::{TreeError, TreeResult};
use crate::nest::{NestedChain, NestedMessage};

/// A chain's message tree, indexed for selection and traversal.
#[derive(Clone, Debug)]
pub struct ChainTree {
    chain: Chain,
    messages: HashMap<MessageId, Message>,
    /// Forward-edge index: parent -> children in creation order.
    children: HashMap<MessageId, Vec<MessageId>>,
    seed: MessageId,
}

impl ChainTree {
    /// Build and validate a tree from a chain and its message rows.
    ///
    /// The rows are typically a fresh read from the store; the tree is a
    /// snapshot and goes stale the moment another player submits. Staleness
    /// is healed at submission time, never here.
    pub fn build(chain: Chain, rows: Vec<Message>) -> TreeResult<Self> {
        if rows.is_empty() {
            return Err(TreeError::EmptyChain(chain.id));
        }

        let mut messages = HashMap::with_capacity(rows.len());
        let mut seed = None;
        for message in rows {
            if message.chain != chain.id {
                return Err(TreeError::ForeignMessage {
                    message: message.id,
                    expected: chain.id,
                    actual: message.chain,
                });
            }
            if message.is_seed() {
                if let Some(first) = seed {
                    return Err(TreeError::MultipleSeeds {
                        chain: chain.id,
                        first,
                        second: message.id,
                    });
                }
                seed = Some(message.id);
            }
            messages.insert(message.id, message);
        }
        let seed = seed.ok_or(TreeError::MissingSeed(chain.id))?;

        let mut children: HashMap<MessageId, Vec<MessageId>> = HashMap::new();
        for message in messages.values() {
            let Some(parent_id) = message.parent else {
                continue;
            };
            let parent = messages
                .get(&parent_id)
                .ok_or(TreeError::DanglingParent {
                    message: message.id,
                    parent: parent_id,
                })?;
            if message.generation != parent.generation + 1 {
                return Err(TreeError::GenerationMismatch {
                    message: message.id,
                    expected: parent.generation + 1,
                    actual: message.generation,
                });
            }
            children.entry(parent_id).or_default().push(message.id);
        }
        for siblings in children.values_mut() {
            siblings.sort();
        }

        Ok(Self {
            chain,
            messages,
            children,
            seed,
        })
    }

    /// The chain this tree was built from.
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Total number of messages in the chain.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The chain's seed message.
    pub fn seed(&self) -> &Message {
        &self.messages[&self.seed]
    }

    /// Retrieve a message by id.
    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.get(&id)
    }

    /// Direct children of a message, in creation order.
    pub fn children_of(&self, id: MessageId) -> &[MessageId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `true` iff the message has no children.
    pub fn is_leaf(&self, id: MessageId) -> bool {
        self.children_of(id).is_empty()
    }

    // ---------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------

    /// All empty messages, in creation order.
    pub fn empty_messages(&self) -> Vec<&Message> {
        let mut empty: Vec<&Message> = self
            .messages
            .values()
            .filter(|message| message.is_empty())
            .collect();
        empty.sort_by_key(|message| message.id);
        empty
    }

    /// Determine which message should be recorded next.
    ///
    /// `Youngest` picks the smallest generation among empty slots, ties
    /// broken by creation order, keeping growth breadth-first. `Random`
    /// picks uniformly. Fails with [`TreeError::NoEmptyMessage`] when the
    /// chain is exhausted; the caller treats that as "try another chain".
    pub fn select_empty_message<R: Rng>(&self, rng: &mut R) -> TreeResult<&Message> {
        let empty = self.empty_messages();
        if empty.is_empty() {
            return Err(TreeError::NoEmptyMessage(self.chain.id));
        }

        let picked: &Message = match self.chain.selection_method {
            SelectionMethod::Youngest => empty
                .iter()
                .min_by_key(|message| (message.generation, message.id))
                .copied()
                .expect("empty is non-empty"),
            SelectionMethod::Random => empty[rng.gen_range(0..empty.len())],
        };
        debug!(
            chain = %self.chain.id,
            message = %picked.id,
            generation = picked.generation,
            "selected empty message"
        );
        Ok(picked)
    }

    // ---------------------------------------------------------------
    // Shape statistics
    // ---------------------------------------------------------------

    /// Chain depth: deepest generation + 1.
    pub fn depth(&self) -> u32 {
        self.messages
            .values()
            .map(|message| message.generation)
            .max()
            .map(|generation| generation + 1)
            .unwrap_or(0)
    }

    /// Chain width: most messages in any single generation.
    pub fn width(&self) -> usize {
        let mut per_generation: HashMap<u32, usize> = HashMap::new();
        for message in self.messages.values() {
            *per_generation.entry(message.generation).or_default() += 1;
        }
        per_generation.values().copied().max().unwrap_or(0)
    }

    // ---------------------------------------------------------------
    // Serialization
    // ---------------------------------------------------------------

    /// Serialize the chain's messages in the nested inspect structure.
    ///
    /// Iterative in both passes: a BFS to order the nodes, then a reverse
    /// sweep assembling children before parents, so pathologically deep
    /// chains cannot blow the stack.
    pub fn nest(&self) -> NestedChain {
        // BFS from the seed: parents always precede their children.
        let mut order = Vec::with_capacity(self.messages.len());
        let mut queue = VecDeque::new();
        queue.push_back(self.seed);
        while let Some(id) = queue.pop_front() {
            order.push(id);
            queue.extend(self.children_of(id).iter().copied());
        }

        // Assemble bottom-up: by the time a node is built, every child
        // already sits in `built`.
        let mut built: HashMap<MessageId, NestedMessage> = HashMap::new();
        for id in order.into_iter().rev() {
            let message = &self.messages[&id];
            let children = self
                .children_of(id)
                .iter()
                .map(|child| built.remove(child).expect("children built before parents"))
                .collect();
            built.insert(
                id,
                NestedMessage {
                    pk: id,
                    audio: message.audio.clone(),
                    generation: message.generation,
                    children,
                },
            );
        }

        NestedChain {
            pk: self.chain.id,
            messages: built.remove(&self.seed).expect("seed is always built"),
            generations: self.depth(),
            branches: self.width(),
        }
    }
}

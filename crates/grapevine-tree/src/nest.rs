//! Serializable tree views consumed by the inspect surface.
//!
//! The field names (`pk`, `audio`, `generation`, `children`, `generations`,
//! `branches`) and the null-for-empty audio convention are a contract with
//! the client-side rendering layer; change them and the inspect page breaks.

use serde::{Deserialize, Serialize};

use grapevine_types::{AudioRef, ChainId, MessageId};

/// One message and, recursively, its children in creation order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NestedMessage {
    pub pk: MessageId,
    /// Storage path of the recording; `null` while the slot is empty.
    pub audio: Option<AudioRef>,
    pub generation: u32,
    pub children: Vec<NestedMessage>,
}

impl NestedMessage {
    /// Total number of messages in this subtree, the node itself included.
    pub fn size(&self) -> usize {
        // Iterative: the inspect surface tolerates arbitrarily deep chains.
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

/// A chain's full tree plus its shape statistics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NestedChain {
    pub pk: ChainId,
    /// The seed message with all descendants nested inside.
    pub messages: NestedMessage,
    /// Chain depth: deepest generation + 1.
    pub generations: u32,
    /// Chain width: most messages in any single generation.
    pub branches: usize,
}

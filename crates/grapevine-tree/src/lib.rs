//! Chain tree engine for Grapevine.
//!
//! A [`ChainTree`] is a *derived* index over one chain's message rows: it is
//! rebuilt from the store on demand and never persisted. It answers the two
//! questions gameplay needs (which empty slot next, what does the tree look
//! like) plus the shape statistics the inspect surface shows.

pub mod error;
pub mod nest;
pub mod tree;

pub use error::{TreeError, TreeResult};
pub use nest::{NestedChain, NestedMessage};
pub use tree::ChainTree;

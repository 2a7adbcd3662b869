//! Request and response DTOs.
//!
//! The inspect views carry a contract the client-side renderer depends on:
//! `pk`, `audio` (media URL or `null`), `generation`, `children`, plus
//! action URLs: `sprout_url` always, `close_url` and `upload_url` only
//! while a message is still empty.

use serde::{Deserialize, Serialize};

use grapevine_tree::{NestedChain, NestedMessage};
use grapevine_types::{ChainId, ChainOrder, Game, GameId, MessageId};

use crate::endpoint::routes;

fn default_num_chains() -> u32 {
    1
}

/// Body of `POST /api/games`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewGameRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_num_chains")]
    pub num_chains: u32,
    #[serde(default)]
    pub chain_order: ChainOrder,
}

/// One game in the public listing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameView {
    pub pk: GameId,
    pub name: String,
    pub chain_order: ChainOrder,
    pub play_url: String,
    pub inspect_url: String,
}

impl From<&Game> for GameView {
    fn from(game: &Game) -> Self {
        Self {
            pk: game.id,
            name: game.display_name(),
            chain_order: game.chain_order,
            play_url: routes::play_url(game.id),
            inspect_url: routes::inspect_url(game.id),
        }
    }
}

/// A recording task: which message to fill and what to imitate.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskView {
    pub message: MessageId,
    pub respond_url: String,
    /// Media URL of the parent's recording; absent at a seed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
}

/// What `GET /api/games/{id}/play` renders, by protocol state.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PlayView {
    Instruct { game: GameView },
    Task(TaskView),
    Complete { completion_code: String },
}

/// Response to a submission: the next task, or empty fields when the
/// player is done and should fetch the completion page.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RespondResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub respond_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
}

/// One message in the annotated inspect tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MessageNodeView {
    pub pk: MessageId,
    /// Media URL of the recording; `null` while the slot is empty.
    pub audio: Option<String>,
    pub generation: u32,
    pub sprout_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_url: Option<String>,
    pub children: Vec<MessageNodeView>,
}

impl MessageNodeView {
    /// Annotate a structural nest with media and action URLs.
    ///
    /// Iterative post-order: children are assembled before their parent, so
    /// depth is bounded by heap, not the call stack.
    pub fn from_nest(nest: &NestedMessage) -> Self {
        struct Frame<'a> {
            node: &'a NestedMessage,
            built: Vec<MessageNodeView>,
        }

        let mut stack = vec![Frame {
            node: nest,
            built: Vec::new(),
        }];
        loop {
            let (node, next_child) = {
                let frame = stack.last().expect("stack never drains mid-walk");
                (frame.node, frame.built.len())
            };
            if next_child < node.children.len() {
                stack.push(Frame {
                    node: &node.children[next_child],
                    built: Vec::new(),
                });
                continue;
            }

            let done = stack.pop().expect("frame exists");
            let view = Self::annotate(done.node, done.built);
            match stack.last_mut() {
                Some(parent) => parent.built.push(view),
                None => return view,
            }
        }
    }

    fn annotate(node: &NestedMessage, children: Vec<MessageNodeView>) -> Self {
        let empty = node.audio.is_none();
        Self {
            pk: node.pk,
            audio: node.audio.as_ref().map(routes::media_url),
            generation: node.generation,
            sprout_url: routes::sprout_url(node.pk),
            close_url: empty.then(|| routes::close_url(node.pk)),
            upload_url: empty.then(|| routes::upload_url(node.pk)),
            children,
        }
    }
}

/// One chain in the annotated inspect tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainView {
    pub pk: ChainId,
    pub messages: MessageNodeView,
    pub generations: u32,
    pub branches: usize,
}

impl From<&NestedChain> for ChainView {
    fn from(nest: &NestedChain) -> Self {
        Self {
            pk: nest.pk,
            messages: MessageNodeView::from_nest(&nest.messages),
            generations: nest.generations,
            branches: nest.branches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grapevine_types::AudioRef;

    fn leaf(pk: u64, audio: Option<&str>, generation: u32) -> NestedMessage {
        NestedMessage {
            pk: MessageId::new(pk),
            audio: audio.map(AudioRef::new),
            generation,
            children: Vec::new(),
        }
    }

    #[test]
    fn filled_messages_lose_their_action_urls() {
        let mut seed = leaf(1, Some("game-1/chain-1/0.wav"), 0);
        seed.children.push(leaf(2, None, 1));

        let view = MessageNodeView::from_nest(&seed);
        assert_eq!(view.audio.as_deref(), Some("/media/game-1/chain-1/0.wav"));
        assert_eq!(view.sprout_url, "/api/messages/1/sprout");
        assert!(view.close_url.is_none());
        assert!(view.upload_url.is_none());

        let child = &view.children[0];
        assert!(child.audio.is_none());
        assert_eq!(child.close_url.as_deref(), Some("/api/messages/2/close"));
        assert_eq!(child.upload_url.as_deref(), Some("/api/messages/2/upload"));
    }

    #[test]
    fn annotation_preserves_child_order_and_depth() {
        let mut seed = leaf(1, Some("a.wav"), 0);
        seed.children.push(leaf(2, Some("b.wav"), 1));
        seed.children.push(leaf(3, None, 1));
        seed.children[0].children.push(leaf(4, None, 2));

        let view = MessageNodeView::from_nest(&seed);
        assert_eq!(view.children.len(), 2);
        assert_eq!(view.children[0].pk, MessageId::new(2));
        assert_eq!(view.children[1].pk, MessageId::new(3));
        assert_eq!(view.children[0].children[0].pk, MessageId::new(4));
    }

    #[test]
    fn annotation_survives_deep_nests() {
        let mut node = leaf(5_000, None, 4_999);
        for pk in (1..5_000u64).rev() {
            let mut parent = leaf(pk, Some("x.wav"), pk as u32 - 1);
            parent.children.push(node);
            node = parent;
        }
        let view = MessageNodeView::from_nest(&node);
        assert_eq!(view.pk, MessageId::new(1));
    }

    #[test]
    fn empty_nest_serializes_with_null_audio() {
        let view = MessageNodeView::from_nest(&leaf(7, None, 0));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["audio"], serde_json::Value::Null);
        assert_eq!(json["pk"], 7);
        assert!(json["children"].as_array().unwrap().is_empty());
        assert!(json.get("close_url").is_some());
    }

    #[test]
    fn respond_response_empty_means_done() {
        let done = RespondResponse::default();
        let json = serde_json::to_string(&done).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn new_game_request_defaults() {
        let request: NewGameRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.num_chains, 1);
        assert!(request.name.is_none());
        assert_eq!(request.chain_order, ChainOrder::Sequential);
    }
}

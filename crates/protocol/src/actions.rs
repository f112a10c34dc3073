//! Player action definitions.
//!
//! Actions are the sole state import of the simulation core. They arrive
//! tagged by kind with a kind-specific payload; unknown kinds fail to
//! deserialize at the transport boundary and never reach the core.

use serde::{Deserialize, Serialize};

/// An action sent by a client, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "camelCase")]
pub enum GameAction {
    /// Set the acting player's movement target.
    Move { x: f32, y: f32 },
    /// Replace the acting player's selection (`None` clears it).
    Select {
        #[serde(rename = "selectedEntity")]
        selected_entity: Option<SelectedEntity>,
    },
}

/// A selection reference, resolved lazily against current ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SelectedEntity {
    /// The player itself.
    #[serde(rename = "self")]
    SelfPlayer,
    /// A specific owned pixel group, by id.
    PixelGroup { id: u32 },
}

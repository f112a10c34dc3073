//! Snapshot definitions.
//!
//! A snapshot is the fully-materialized, read-only representation of one
//! room's state at the end of a tick, and the sole state export of the
//! simulation core. It is plain owned data: safe to hand to a rendering or
//! transport collaborator that outlives the next tick.

use crate::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Serialized room state, keyed by player id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerState {
    pub players: HashMap<String, PlayerState>,
}

/// One player's serialized state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub pixel_groups: Vec<PixelGroupState>,
}

/// One pixel group's serialized state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelGroupState {
    pub id: u32,
    pub pixel_count: u32,
    pub distribution_type: String,
    pub pixels: Vec<PixelState>,
}

/// One pixel, reduced to what rendering needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelState {
    pub x: f32,
    pub y: f32,
    pub color: Color,
}

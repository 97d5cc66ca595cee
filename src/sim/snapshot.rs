//! Read-only view of the simulation for renderers

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Role;
use super::state::{GamePhase, GameState};

/// One entity as the renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: u32,
    pub role: Role,
    /// Top-left corner
    pub position: Vec2,
    pub size: Vec2,
    pub animation_key: String,
    /// Image reference of the frame to draw
    pub frame_image: String,
}

/// Everything a render pass needs, copied out of the game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub entities: Vec<EntityView>,
    pub remaining_seconds: i32,
    pub is_game_over: bool,
    pub phase: GamePhase,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let entities = state
            .entities
            .iter()
            .map(|e| EntityView {
                id: e.id,
                role: e.role,
                position: e.pos(),
                size: e.size(),
                animation_key: e.animation_key(),
                frame_image: e.animation().current_frame().image.clone(),
            })
            .collect();
        Self {
            entities,
            remaining_seconds: state.countdown.remaining(),
            is_game_over: state.countdown.is_game_over(),
            phase: state.phase,
        }
    }

    pub fn player(&self) -> Option<&EntityView> {
        self.entities.iter().find(|e| e.role == Role::Player)
    }
}

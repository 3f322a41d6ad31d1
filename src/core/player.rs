//! Player representation

use crate::core::{GameEntity, PlayerId, PlayerName};
use serde::{Deserialize, Serialize};

/// Represents a player in the duel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Unique ID for this player
    pub id: PlayerId,

    /// Player name
    pub name: PlayerName,

    /// Life points
    pub life: i32,

    /// Has the player lost?
    pub has_lost: bool,

    /// Normal summons used this turn
    pub normal_summons_this_turn: u8,

    /// Maximum normal summons per turn (usually 1)
    pub max_normal_summons_per_turn: u8,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<PlayerName>, starting_life: i32) -> Self {
        Player {
            id,
            name: name.into(),
            life: starting_life,
            has_lost: false,
            normal_summons_this_turn: 0,
            max_normal_summons_per_turn: 1,
        }
    }

    pub fn gain_life(&mut self, amount: i32) {
        self.life += amount;
    }

    pub fn lose_life(&mut self, amount: i32) {
        self.life -= amount;
        if self.life <= 0 {
            self.has_lost = true;
        }
    }

    /// Can the player pay `amount` life as a cost? Costs may not drop life
    /// to zero or below.
    pub fn can_pay_life(&self, amount: i32) -> bool {
        self.life > amount
    }

    pub fn can_normal_summon(&self) -> bool {
        self.normal_summons_this_turn < self.max_normal_summons_per_turn
    }

    pub fn note_normal_summon(&mut self) {
        self.normal_summons_this_turn += 1;
    }

    pub fn reset_normal_summons(&mut self) {
        self.normal_summons_this_turn = 0;
    }
}

impl GameEntity<Player> for Player {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EntityId;

    #[test]
    fn test_player_creation() {
        let id = EntityId::new(1);
        let player = Player::new(id, "Alice", 8000);

        assert_eq!(player.id, id);
        assert_eq!(player.name.as_str(), "Alice");
        assert_eq!(player.life, 8000);
        assert!(!player.has_lost);
    }

    #[test]
    fn test_player_life() {
        let id = EntityId::new(1);
        let mut player = Player::new(id, "Bob", 8000);

        player.lose_life(3000);
        assert_eq!(player.life, 5000);
        assert!(!player.has_lost);

        player.lose_life(5000);
        assert_eq!(player.life, 0);
        assert!(player.has_lost);

        player.gain_life(1000);
        assert_eq!(player.life, 1000);
        // has_lost stays true once triggered
        assert!(player.has_lost);
    }

    #[test]
    fn test_life_cost_legality() {
        let id = EntityId::new(1);
        let mut player = Player::new(id, "Carol", 1000);

        assert!(!player.can_pay_life(1000));
        player.gain_life(1);
        assert!(player.can_pay_life(1000));
    }

    #[test]
    fn test_normal_summon_allowance() {
        let id = EntityId::new(1);
        let mut player = Player::new(id, "Dave", 8000);

        assert!(player.can_normal_summon());
        player.note_normal_summon();
        assert!(!player.can_normal_summon());

        player.reset_normal_summons();
        assert!(player.can_normal_summon());
    }
}

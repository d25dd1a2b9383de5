//! # Actions Module
//!
//! The closed set of intents a caller can hand to the turn engine.

use crate::{Direction, ItemCategory};
use serde::{Deserialize, Serialize};

/// Equipment slots on the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Weapon,
    Armor,
}

impl EquipmentSlot {
    /// The item category this slot accepts.
    pub fn category(self) -> ItemCategory {
        match self {
            EquipmentSlot::Weapon => ItemCategory::Weapon,
            EquipmentSlot::Armor => ItemCategory::Armor,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EquipmentSlot::Weapon => "weapon",
            EquipmentSlot::Armor => "armor",
        }
    }
}

/// One player intent. Each successful action costs one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Step in a direction, fighting whatever hostile stands there
    Move(Direction),
    /// Attack the adjacent tile without moving
    Attack(Direction),
    /// Use the consumable at an inventory index
    UseItem(usize),
    /// Equip the item at an inventory index into a slot
    Equip(EquipmentSlot, usize),
    Unequip(EquipmentSlot),
    /// Discard the item at an inventory index
    Drop(usize),
    Descend,
    Ascend,
    Wait,
}

impl PlayerAction {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            PlayerAction::Move(_) => "move",
            PlayerAction::Attack(_) => "attack",
            PlayerAction::UseItem(_) => "use",
            PlayerAction::Equip(..) => "equip",
            PlayerAction::Unequip(_) => "unequip",
            PlayerAction::Drop(_) => "drop",
            PlayerAction::Descend => "descend",
            PlayerAction::Ascend => "ascend",
            PlayerAction::Wait => "wait",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_categories() {
        assert_eq!(EquipmentSlot::Weapon.category(), ItemCategory::Weapon);
        assert_eq!(EquipmentSlot::Armor.category(), ItemCategory::Armor);
    }

    #[test]
    fn test_actions_serialize() {
        let action = PlayerAction::Equip(EquipmentSlot::Armor, 3);
        let json = serde_json::to_string(&action).unwrap();
        let loaded: PlayerAction = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, action);
        assert_eq!(loaded.name(), "equip");
    }
}

//! Battle data model: soldiers, rounds, actions and the battle document.
//!
//! Everything here is plain data. The only behaviour is parsing and
//! validation; state changes happen in the interpreter.
//!
//! The roster is keyed by stable soldier id. List position in the source
//! document carries no meaning once the roster is built.

use crate::{
    error::{BattleError, BattleResult},
    map::MapData,
    types::{Position, RoundNumber, SoldierId},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

// ── Soldiers ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoldierStats {
    #[serde(default)]
    pub health:   i32,
    #[serde(default)]
    pub strength: i32,
    #[serde(default)]
    pub mana:     i32,
}

impl SoldierStats {
    pub fn new(health: i32, strength: i32, mana: i32) -> Self {
        Self { health, strength, mana }
    }
}

/// Faction tag. Only used for presentation colouring.
///
/// Any camp string other than `"Red"` reads as Blue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Camp {
    Red,
    Blue,
}

impl From<String> for Camp {
    fn from(value: String) -> Self {
        if value == "Red" { Camp::Red } else { Camp::Blue }
    }
}

impl From<Camp> for String {
    fn from(camp: Camp) -> Self {
        match camp {
            Camp::Red  => "Red".to_string(),
            Camp::Blue => "Blue".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoldierData {
    #[serde(rename = "ID", alias = "id")]
    pub id:           SoldierId,
    pub soldier_type: String,
    pub camp:         Camp,
    #[serde(default)]
    pub position:     Position,
    #[serde(default)]
    pub stats:        SoldierStats,
    /// Set when the roster is spawned, cleared on defeat. Never serialized.
    #[serde(skip)]
    pub alive:        bool,
}

impl SoldierData {
    pub fn new(
        id: SoldierId,
        soldier_type: impl Into<String>,
        camp: Camp,
        position: Position,
        stats: SoldierStats,
    ) -> Self {
        Self {
            id,
            soldier_type: soldier_type.into(),
            camp,
            position,
            alive: stats.health > 0,
            stats,
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.stats.health <= 0
    }
}

// ── Soldier catalog ────────────────────────────────────────────────

/// Static catalog entry. `prefab` is an opaque handle the presentation
/// layer resolves to a visual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoldierConfig {
    #[serde(rename = "type")]
    pub soldier_type: String,
    pub prefab:       String,
}

#[derive(Debug, Clone, Default)]
pub struct SoldierCatalog {
    configs: HashMap<String, SoldierConfig>,
}

impl SoldierCatalog {
    /// Later entries with the same type replace earlier ones.
    pub fn from_configs(configs: impl IntoIterator<Item = SoldierConfig>) -> Self {
        let configs = configs
            .into_iter()
            .map(|c| (c.soldier_type.clone(), c))
            .collect();
        Self { configs }
    }

    pub fn get(&self, soldier_type: &str) -> Option<&SoldierConfig> {
        self.configs.get(soldier_type)
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

// ── Roster ─────────────────────────────────────────────────────────

/// The live set of soldiers, keyed by id. Defeated soldiers stay in the
/// roster with `alive == false`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    soldiers: BTreeMap<SoldierId, SoldierData>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from soldier records, failing on duplicate ids.
    /// No catalog check; `alive` is derived from health.
    pub fn from_soldiers(soldiers: impl IntoIterator<Item = SoldierData>) -> BattleResult<Self> {
        let mut roster = Self::new();
        for mut soldier in soldiers {
            soldier.alive = soldier.stats.health > 0;
            roster.insert(soldier)?;
        }
        Ok(roster)
    }

    /// Build the live roster for a battle.
    ///
    /// Soldiers whose type has no catalog entry are skipped and returned
    /// as `MissingConfig` errors; the rest of the roster still loads.
    pub fn spawn(
        soldiers: &[SoldierData],
        catalog: &SoldierCatalog,
    ) -> BattleResult<(Self, Vec<BattleError>)> {
        let mut roster = Self::new();
        let mut missing = Vec::new();

        for soldier in soldiers {
            if catalog.get(&soldier.soldier_type).is_none() {
                log::error!(
                    "spawn: config for {} not found, skipping soldier {}",
                    soldier.soldier_type,
                    soldier.id
                );
                missing.push(BattleError::MissingConfig {
                    soldier_id:   soldier.id,
                    soldier_type: soldier.soldier_type.clone(),
                });
                continue;
            }
            let mut soldier = soldier.clone();
            soldier.alive = soldier.stats.health > 0;
            roster.insert(soldier)?;
        }

        log::info!(
            "spawn: {} soldiers spawned, {} skipped",
            roster.len(),
            missing.len()
        );
        Ok((roster, missing))
    }

    fn insert(&mut self, soldier: SoldierData) -> BattleResult<()> {
        if self.soldiers.contains_key(&soldier.id) {
            return Err(BattleError::malformed(format!(
                "duplicate soldier id {}",
                soldier.id
            )));
        }
        self.soldiers.insert(soldier.id, soldier);
        Ok(())
    }

    pub fn get(&self, id: SoldierId) -> Option<&SoldierData> {
        self.soldiers.get(&id)
    }

    pub fn get_mut(&mut self, id: SoldierId) -> Option<&mut SoldierData> {
        self.soldiers.get_mut(&id)
    }

    /// Resolve an id to a soldier that is still in the fight.
    pub fn get_alive_mut(&mut self, id: SoldierId) -> Option<&mut SoldierData> {
        self.soldiers.get_mut(&id).filter(|s| s.alive)
    }

    pub fn is_alive(&self, id: SoldierId) -> bool {
        self.soldiers.get(&id).is_some_and(|s| s.alive)
    }

    /// All soldiers in ascending id order, alive or not.
    pub fn iter(&self) -> impl Iterator<Item = &SoldierData> {
        self.soldiers.values()
    }

    pub fn alive(&self) -> impl Iterator<Item = &SoldierData> {
        self.soldiers.values().filter(|s| s.alive)
    }

    pub fn alive_count(&self) -> usize {
        self.alive().count()
    }

    pub fn len(&self) -> usize {
        self.soldiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.soldiers.is_empty()
    }
}

// ── Rounds and actions ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InitialState {
    #[serde(default)]
    pub soldiers: Vec<SoldierData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRound {
    pub round_number:  RoundNumber,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_state: Option<InitialState>,
    #[serde(default)]
    pub actions:       Vec<BattleAction>,
}

impl GameRound {
    pub fn new(round_number: RoundNumber, actions: Vec<BattleAction>) -> Self {
        Self { round_number, initial_state: None, actions }
    }
}

/// One authored action, in the flat shape the battle document uses.
///
/// Only the fields for its `action_type` are meaningful. Call
/// [`BattleAction::kind`] to get the typed view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleAction {
    pub action_type: String,
    pub soldier_id:  SoldierId,

    // Movement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path:               Option<Vec<Position>>,
    #[serde(default)]
    pub remaining_movement: i32,

    // Attack
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id:    Option<SoldierId>,
    #[serde(default)]
    pub damage_dealt: i32,
    /// Parsed and carried, never applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_stats:    Option<SoldierStats>,

    // Ability
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability:         Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_position: Option<Position>,
    #[serde(default)]
    pub mana_cost:       i32,
}

/// Typed view over a [`BattleAction`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionKind<'a> {
    Movement {
        path:               &'a [Position],
        remaining_movement: i32,
    },
    Attack {
        target_id:    SoldierId,
        damage_dealt: i32,
        new_stats:    Option<&'a SoldierStats>,
    },
    Ability {
        ability:         &'a str,
        target_position: Position,
        mana_cost:       i32,
    },
}

impl BattleAction {
    fn envelope(action_type: &str, soldier_id: SoldierId) -> Self {
        Self {
            action_type: action_type.to_string(),
            soldier_id,
            path: None,
            remaining_movement: 0,
            target_id: None,
            damage_dealt: 0,
            new_stats: None,
            ability: None,
            target_position: None,
            mana_cost: 0,
        }
    }

    pub fn movement(soldier_id: SoldierId, path: Vec<Position>) -> Self {
        Self { path: Some(path), ..Self::envelope("movement", soldier_id) }
    }

    pub fn attack(soldier_id: SoldierId, target_id: SoldierId, damage_dealt: i32) -> Self {
        Self {
            target_id: Some(target_id),
            damage_dealt,
            ..Self::envelope("attack", soldier_id)
        }
    }

    pub fn ability(soldier_id: SoldierId, ability: &str, target_position: Position) -> Self {
        Self {
            ability: Some(ability.to_string()),
            target_position: Some(target_position),
            ..Self::envelope("ability", soldier_id)
        }
    }

    /// An action with an arbitrary tag and no payload.
    pub fn untyped(action_type: &str, soldier_id: SoldierId) -> Self {
        Self::envelope(action_type, soldier_id)
    }

    /// Interpret the action by its tag (ASCII case-insensitive).
    ///
    /// Unknown tags, empty movement paths and attacks without a target are
    /// `InvalidAction`.
    pub fn kind(&self) -> BattleResult<ActionKind<'_>> {
        match self.action_type.to_ascii_lowercase().as_str() {
            "movement" => match self.path.as_deref() {
                Some(path) if !path.is_empty() => Ok(ActionKind::Movement {
                    path,
                    remaining_movement: self.remaining_movement,
                }),
                _ => Err(BattleError::invalid_action(format!(
                    "invalid movement path for soldier {}",
                    self.soldier_id
                ))),
            },
            "attack" => match self.target_id {
                Some(target_id) => Ok(ActionKind::Attack {
                    target_id,
                    damage_dealt: self.damage_dealt,
                    new_stats: self.new_stats.as_ref(),
                }),
                None => Err(BattleError::invalid_action(format!(
                    "attack by soldier {} has no target",
                    self.soldier_id
                ))),
            },
            "ability" => Ok(ActionKind::Ability {
                ability:         self.ability.as_deref().unwrap_or_default(),
                target_position: self.target_position.unwrap_or_default(),
                mana_cost:       self.mana_cost,
            }),
            _ => Err(BattleError::invalid_action(format!(
                "unknown action type: {}",
                self.action_type
            ))),
        }
    }
}

// ── Battle document ────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoldiersData {
    pub soldiers: Vec<SoldierData>,
}

/// The full battle document: map metadata, initial roster, rounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_metadata:  Option<MapData>,
    pub soldiers_data: SoldiersData,
    pub game_rounds:   Vec<GameRound>,
}

impl GameData {
    /// Parse and validate a battle document.
    pub fn from_json(text: &str) -> BattleResult<Self> {
        let data: GameData = serde_json::from_str(text)
            .map_err(|e| BattleError::malformed(format!("battle document: {e}")))?;
        data.validate()?;
        Ok(data)
    }

    pub fn from_file(path: impl AsRef<Path>) -> BattleResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        log::debug!("loaded battle document {} ({} bytes)", path.display(), text.len());
        Self::from_json(&text)
    }

    pub fn to_json_pretty(&self) -> BattleResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> BattleResult<()> {
        if let Some(map) = &self.map_metadata {
            if map.rows.as_ref().is_none_or(|rows| rows.is_empty()) {
                return Err(BattleError::malformed("map metadata has no rows"));
            }
        }

        // Duplicate ids fail here rather than at spawn time.
        Roster::from_soldiers(self.initial_soldiers().iter().cloned())?;

        let mut last: Option<RoundNumber> = None;
        for round in &self.game_rounds {
            if let Some(prev) = last {
                if round.round_number <= prev {
                    return Err(BattleError::malformed(format!(
                        "round {} follows round {prev}; rounds must be strictly increasing",
                        round.round_number
                    )));
                }
            }
            last = Some(round.round_number);
        }
        Ok(())
    }

    /// The roster the battle starts from.
    ///
    /// `soldiersData` wins; a round-0 `initialState` is the fallback when
    /// `soldiersData` is empty.
    pub fn initial_soldiers(&self) -> &[SoldierData] {
        if !self.soldiers_data.soldiers.is_empty() {
            return &self.soldiers_data.soldiers;
        }
        self.game_rounds
            .iter()
            .find(|r| r.round_number == 0)
            .and_then(|r| r.initial_state.as_ref())
            .map(|s| s.soldiers.as_slice())
            .unwrap_or_default()
    }

    /// Rounds to replay. Round 0 describes the initial state and is
    /// never replayed.
    pub fn playable_rounds(&self) -> Vec<GameRound> {
        self.game_rounds
            .iter()
            .filter(|r| r.round_number != 0)
            .cloned()
            .collect()
    }
}

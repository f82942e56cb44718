use serde::{Deserialize, Serialize};

/// Name + detail url pair from a catalog listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub detail_url: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatKey {
    Hp,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}

impl StatKey {
    pub const ALL: [StatKey; 6] = [
        StatKey::Hp,
        StatKey::Attack,
        StatKey::Defense,
        StatKey::SpecialAttack,
        StatKey::SpecialDefense,
        StatKey::Speed,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatKey::Hp => "hp",
            StatKey::Attack => "attack",
            StatKey::Defense => "defense",
            StatKey::SpecialAttack => "special-attack",
            StatKey::SpecialDefense => "special-defense",
            StatKey::Speed => "speed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatKey::Hp => "HP",
            StatKey::Attack => "Attack",
            StatKey::Defense => "Defense",
            StatKey::SpecialAttack => "Sp. Attack",
            StatKey::SpecialDefense => "Sp. Defense",
            StatKey::Speed => "Speed",
        }
    }

    pub fn short(self) -> &'static str {
        match self {
            StatKey::Hp => " HP",
            StatKey::Attack => "ATK",
            StatKey::Defense => "DEF",
            StatKey::SpecialAttack => "SAT",
            StatKey::SpecialDefense => "SDF",
            StatKey::Speed => "SPD",
        }
    }
}

/// The six base stats. Missing values are zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct StatSet {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub special_attack: u8,
    pub special_defense: u8,
    pub speed: u8,
}

impl StatSet {
    pub fn get(&self, key: StatKey) -> u8 {
        match key {
            StatKey::Hp => self.hp,
            StatKey::Attack => self.attack,
            StatKey::Defense => self.defense,
            StatKey::SpecialAttack => self.special_attack,
            StatKey::SpecialDefense => self.special_defense,
            StatKey::Speed => self.speed,
        }
    }

    pub fn set(&mut self, key: StatKey, value: u8) {
        let slot = match key {
            StatKey::Hp => &mut self.hp,
            StatKey::Attack => &mut self.attack,
            StatKey::Defense => &mut self.defense,
            StatKey::SpecialAttack => &mut self.special_attack,
            StatKey::SpecialDefense => &mut self.special_defense,
            StatKey::Speed => &mut self.speed,
        };
        *slot = value;
    }

    pub fn total(&self) -> u16 {
        StatKey::ALL
            .iter()
            .map(|key| u16::from(self.get(*key)))
            .sum()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureDetail {
    pub id: u32,
    pub name: String,
    pub image_url: String,
    pub types: Vec<String>,
    pub stats: StatSet,
}

impl CreatureDetail {
    pub fn has_type(&self, type_name: &str) -> bool {
        self.types.iter().any(|tag| tag == type_name)
    }
}

/// Inspect-view record: the compact detail plus what the composer needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedDetail {
    pub detail: CreatureDetail,
    pub moves: Vec<String>,
    pub abilities: Vec<String>,
    pub height: u32,
    pub weight: u32,
    pub species_url: Option<String>,
    pub sprite_default: Option<String>,
    pub sprite_shiny: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortOrder::Ascending => "↑",
            SortOrder::Descending => "↓",
        }
    }
}

/// A team slot. Serialized in the shape the team backend stores.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TeamMemberWire", into = "TeamMemberWire")]
pub struct TeamMember {
    pub detail: CreatureDetail,
    pub moves: Vec<String>,
}

impl TeamMember {
    pub fn id(&self) -> u32 {
        self.detail.id
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct TeamMemberWire {
    id: u32,
    name: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    types: Vec<TypeSlotWire>,
    #[serde(default)]
    stats: StatSet,
    #[serde(default)]
    moves: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct TypeSlotWire {
    #[serde(rename = "type")]
    type_info: TypeNameWire,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct TypeNameWire {
    name: String,
}

impl From<TeamMemberWire> for TeamMember {
    fn from(wire: TeamMemberWire) -> Self {
        TeamMember {
            detail: CreatureDetail {
                id: wire.id,
                name: wire.name,
                image_url: wire.image,
                types: wire
                    .types
                    .into_iter()
                    .map(|slot| slot.type_info.name)
                    .collect(),
                stats: wire.stats,
            },
            moves: wire.moves,
        }
    }
}

impl From<TeamMember> for TeamMemberWire {
    fn from(member: TeamMember) -> Self {
        TeamMemberWire {
            id: member.detail.id,
            name: member.detail.name,
            image: member.detail.image_url,
            types: member
                .detail
                .types
                .into_iter()
                .map(|name| TypeSlotWire {
                    type_info: TypeNameWire { name },
                })
                .collect(),
            stats: member.detail.stats,
            moves: member.moves,
        }
    }
}

//! Catalog API response types
//!
//! Structs that mirror the PokeAPI JSON response format, plus the flattened
//! `CreatureRecord` the rest of the crate works with.

use serde::{Deserialize, Serialize};

/// Response of `GET /pokemon/{idOrName}`
#[derive(Deserialize, Debug)]
pub struct PokemonResponse {
    /// Catalog identifier
    pub id: i64,
    /// Unique name
    pub name: String,
    /// Height in decimetres
    pub height: i64,
    /// Weight in hectograms
    pub weight: i64,
    /// Sprite URLs
    #[serde(default)]
    pub sprites: Sprites,
    /// Type slots, in catalog order
    #[serde(default)]
    pub types: Vec<TypeSlot>,
}

/// Sprite URLs (only the default front sprite is used)
#[derive(Deserialize, Debug, Default)]
pub struct Sprites {
    /// Default front sprite, may be null
    #[serde(default)]
    pub front_default: Option<String>,
}

/// One entry of `types[]`
#[derive(Deserialize, Debug)]
pub struct TypeSlot {
    /// The referenced type
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

/// Name/URL pair used throughout the API
#[derive(Deserialize, Debug)]
pub struct NamedResource {
    /// Resource name
    pub name: String,
}

/// Response of `GET /type/{name}`
#[derive(Deserialize, Debug)]
pub struct TypeResponse {
    /// Members of the type, in catalog order
    pub pokemon: Vec<TypeMember>,
}

/// One entry of `pokemon[]` in a type response
#[derive(Deserialize, Debug)]
pub struct TypeMember {
    /// The referenced creature
    pub pokemon: NamedResource,
}

/// A resolved creature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureRecord {
    /// Catalog identifier
    pub id: i64,
    /// Unique name
    pub name: String,
    /// Height
    pub height: i64,
    /// Weight
    pub weight: i64,
    /// Sprite URL, if the catalog has one
    pub image_url: Option<String>,
    /// Category (type) names in catalog order
    pub categories: Vec<String>,
}

impl From<PokemonResponse> for CreatureRecord {
    fn from(response: PokemonResponse) -> Self {
        Self {
            id: response.id,
            name: response.name,
            height: response.height,
            weight: response.weight,
            image_url: response.sprites.front_default,
            categories: response.types.into_iter().map(|slot| slot.kind.name).collect(),
        }
    }
}

impl TypeResponse {
    /// Member names in catalog order
    pub fn member_names(self) -> Vec<String> {
        self.pokemon.into_iter().map(|m| m.pokemon.name).collect()
    }
}

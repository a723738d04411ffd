use serde::{Deserialize, Serialize};

use crate::pricing::{
    Price, BASE_PREP_MINUTES, EXTRA_SHOT_PRICE, FLAVOR_PRICE, ICED_PREP_MINUTES,
    PREMIUM_MILK_PRICE,
};

pub const MAX_FLAVORS: usize = 3;
pub const MAX_EXTRA_SHOTS: i64 = 5;
pub const MAX_SPECIAL_INSTRUCTIONS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Small,
    Medium,
    Large,
}

impl Size {
    pub const ALL: [Size; 3] = [Size::Small, Size::Medium, Size::Large];

    pub fn base_price(self) -> Price {
        match self {
            Size::Small => Price::from_cents(350),
            Size::Medium => Price::from_cents(425),
            Size::Large => Price::from_cents(495),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoffeeType {
    Iced,
    Hot,
}

impl CoffeeType {
    pub const ALL: [CoffeeType; 2] = [CoffeeType::Iced, CoffeeType::Hot];

    /// Minutes added on top of the base preparation time.
    pub fn prep_delta(self) -> u32 {
        match self {
            CoffeeType::Iced => ICED_PREP_MINUTES,
            CoffeeType::Hot => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    #[serde(rename = "french vanilla")]
    FrenchVanilla,
    Hazelnut,
    Caramel,
    Mocha,
    Vanilla,
    Cinnamon,
}

impl Flavor {
    pub const ALL: [Flavor; 6] = [
        Flavor::FrenchVanilla,
        Flavor::Hazelnut,
        Flavor::Caramel,
        Flavor::Mocha,
        Flavor::Vanilla,
        Flavor::Cinnamon,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilkType {
    #[default]
    Whole,
    Oat,
    Almond,
    Soy,
    None,
}

impl MilkType {
    pub const ALL: [MilkType; 5] = [
        MilkType::Whole,
        MilkType::Oat,
        MilkType::Almond,
        MilkType::Soy,
        MilkType::None,
    ];

    pub fn is_premium(self) -> bool {
        matches!(self, MilkType::Oat | MilkType::Almond | MilkType::Soy)
    }
}

serde_plain::derive_display_from_serialize!(Size);
serde_plain::derive_fromstr_from_deserialize!(Size);
serde_plain::derive_display_from_serialize!(CoffeeType);
serde_plain::derive_fromstr_from_deserialize!(CoffeeType);
serde_plain::derive_display_from_serialize!(Flavor);
serde_plain::derive_fromstr_from_deserialize!(Flavor);
serde_plain::derive_display_from_serialize!(MilkType);
serde_plain::derive_fromstr_from_deserialize!(MilkType);

#[derive(Debug, Serialize, Deserialize)]
pub struct SizeEntry {
    pub size: Size,
    pub price: Price,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CoffeeTypeEntry {
    pub coffee_type: CoffeeType,
    pub extra_prep_minutes: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MilkEntry {
    pub milk: MilkType,
    pub premium: bool,
    pub upcharge: Price,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtraShotEntry {
    pub price: Price,
    pub prep_minutes: f64,
}

/// The full catalog served from `GET /menu`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Menu {
    pub sizes: Vec<SizeEntry>,
    pub coffee_types: Vec<CoffeeTypeEntry>,
    pub flavors: Vec<Flavor>,
    pub flavor_price: Price,
    pub milk_types: Vec<MilkEntry>,
    pub extra_shot: ExtraShotEntry,
    pub base_prep_minutes: u32,
    pub max_extra_shots: i64,
    pub max_flavors: usize,
}

impl Menu {
    pub fn load() -> Self {
        Self {
            sizes: Size::ALL
                .iter()
                .map(|&size| SizeEntry {
                    size,
                    price: size.base_price(),
                })
                .collect(),
            coffee_types: CoffeeType::ALL
                .iter()
                .map(|&coffee_type| CoffeeTypeEntry {
                    coffee_type,
                    extra_prep_minutes: coffee_type.prep_delta(),
                })
                .collect(),
            flavors: Flavor::ALL.to_vec(),
            flavor_price: FLAVOR_PRICE,
            milk_types: MilkType::ALL
                .iter()
                .map(|&milk| MilkEntry {
                    milk,
                    premium: milk.is_premium(),
                    upcharge: if milk.is_premium() {
                        PREMIUM_MILK_PRICE
                    } else {
                        Price::ZERO
                    },
                })
                .collect(),
            extra_shot: ExtraShotEntry {
                price: EXTRA_SHOT_PRICE,
                prep_minutes: 0.5,
            },
            base_prep_minutes: BASE_PREP_MINUTES,
            max_extra_shots: MAX_EXTRA_SHOTS,
            max_flavors: MAX_FLAVORS,
        }
    }
}

//! Closed set of food/drink icons for restaurants and lists.
//!
//! # Invariants
//! - Only the emoji listed in `food_icons!` can be persisted or deserialized.
//! - The wire/storage representation is the emoji string itself.

use crate::model::ValidationError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

macro_rules! food_icons {
    ($($variant:ident => $emoji:literal,)+) => {
        /// Display icon drawn from the fixed food emoji set.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum FoodIcon {
            $($variant,)+
        }

        impl FoodIcon {
            /// Every allowed icon, in code point order.
            pub const ALL: &'static [FoodIcon] = &[$(FoodIcon::$variant,)+];

            /// Returns the emoji string for this icon.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(FoodIcon::$variant => $emoji,)+
                }
            }

            /// Looks up an icon by its exact emoji string.
            pub fn from_emoji(value: &str) -> Option<Self> {
                match value {
                    $($emoji => Some(FoodIcon::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

food_icons! {
    HotDog => "🌭",
    Taco => "🌮",
    Burrito => "🌯",
    Chestnut => "🌰",
    HotPepper => "🌶",
    EarOfCorn => "🌽",
    BrownMushroom => "🍄‍🟫",
    Tomato => "🍅",
    Eggplant => "🍆",
    Grapes => "🍇",
    Melon => "🍈",
    Watermelon => "🍉",
    Tangerine => "🍊",
    Lemon => "🍋",
    Lime => "🍋‍🟩",
    Banana => "🍌",
    Pineapple => "🍍",
    RedApple => "🍎",
    GreenApple => "🍏",
    Pear => "🍐",
    Peach => "🍑",
    Cherries => "🍒",
    Strawberry => "🍓",
    Hamburger => "🍔",
    Pizza => "🍕",
    MeatOnBone => "🍖",
    PoultryLeg => "🍗",
    RiceCracker => "🍘",
    RiceBall => "🍙",
    CookedRice => "🍚",
    CurryRice => "🍛",
    SteamingBowl => "🍜",
    Spaghetti => "🍝",
    Bread => "🍞",
    FrenchFries => "🍟",
    RoastedSweetPotato => "🍠",
    Dango => "🍡",
    Oden => "🍢",
    Sushi => "🍣",
    FriedShrimp => "🍤",
    FishCakeWithSwirl => "🍥",
    SoftIceCream => "🍦",
    ShavedIce => "🍧",
    IceCream => "🍨",
    Doughnut => "🍩",
    Cookie => "🍪",
    ChocolateBar => "🍫",
    Candy => "🍬",
    Lollipop => "🍭",
    Custard => "🍮",
    HoneyPot => "🍯",
    Shortcake => "🍰",
    BentoBox => "🍱",
    PotOfFood => "🍲",
    Cooking => "🍳",
    ForkAndKnife => "🍴",
    TeacupWithoutHandle => "🍵",
    Sake => "🍶",
    WineGlass => "🍷",
    CocktailGlass => "🍸",
    TropicalDrink => "🍹",
    BeerMug => "🍺",
    ClinkingBeerMugs => "🍻",
    BabyBottle => "🍼",
    ForkAndKnifeWithPlate => "🍽",
    BottleWithPoppingCork => "🍾",
    Popcorn => "🍿",
    BirthdayCake => "🎂",
    Amphora => "🏺",
    Hocho => "🔪",
    ClinkingGlasses => "🥂",
    TumblerGlass => "🥃",
    Spoon => "🥄",
    Croissant => "🥐",
    Avocado => "🥑",
    Cucumber => "🥒",
    Bacon => "🥓",
    Potato => "🥔",
    Carrot => "🥕",
    BaguetteBread => "🥖",
    GreenSalad => "🥗",
    ShallowPanOfFood => "🥘",
    StuffedFlatbread => "🥙",
    Egg => "🥚",
    GlassOfMilk => "🥛",
    Peanuts => "🥜",
    KiwiFruit => "🥝",
    Pancakes => "🥞",
    Dumpling => "🥟",
    FortuneCookie => "🥠",
    TakeoutBox => "🥡",
    Chopsticks => "🥢",
    BowlWithSpoon => "🥣",
    CupWithStraw => "🥤",
    Coconut => "🥥",
    Broccoli => "🥦",
    Pie => "🥧",
    Pretzel => "🥨",
    CutOfMeat => "🥩",
    Sandwich => "🥪",
    CannedFood => "🥫",
    LeafyGreen => "🥬",
    Mango => "🥭",
    MoonCake => "🥮",
    Bagel => "🥯",
    CheeseWedge => "🧀",
    Cupcake => "🧁",
    Salt => "🧂",
    BeverageBox => "🧃",
    Garlic => "🧄",
    Onion => "🧅",
    Falafel => "🧆",
    Waffle => "🧇",
    Butter => "🧈",
    Mate => "🧉",
    Ice => "🧊",
    BubbleTea => "🧋",
    Blueberries => "🫐",
    BellPepper => "🫑",
    Olive => "🫒",
    Flatbread => "🫓",
    Tamale => "🫔",
    Fondue => "🫕",
    Teapot => "🫖",
    PouringLiquid => "🫗",
    Beans => "🫘",
    Jar => "🫙",
    GingerRoot => "🫚",
    PeaPod => "🫛",
    RootVegetable => "🫜",
}

impl Default for FoodIcon {
    /// Matches the column default of `restaurant.icon` and `list.icon`.
    fn default() -> Self {
        Self::ForkAndKnifeWithPlate
    }
}

impl Display for FoodIcon {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FoodIcon {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_emoji(value).ok_or_else(|| ValidationError::UnknownIcon(value.to_string()))
    }
}

impl Serialize for FoodIcon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FoodIcon {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

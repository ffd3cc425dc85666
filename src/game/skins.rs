//! The cosmetic hull skins and their unlock prices.

use bevy::{color::Hue, prelude::*};

/// A purchasable hull tint.
pub struct Skin {
    pub name: &'static str,
    pub color: Color,
    pub price: u32,
}

/// All skins, in shop order. The first one is owned from the start.
pub const SKINS: [Skin; 6] = [
    Skin {
        name: "ICE",
        // #22d3ee
        color: Color::srgb(0.133, 0.827, 0.933),
        price: 0,
    },
    Skin {
        name: "VENOM",
        // #4ade80
        color: Color::srgb(0.290, 0.871, 0.502),
        price: 500,
    },
    Skin {
        name: "ROSE",
        // #f472b6
        color: Color::srgb(0.957, 0.447, 0.714),
        price: 800,
    },
    Skin {
        name: "GOLD",
        // #fbbf24
        color: Color::srgb(0.984, 0.749, 0.141),
        price: 2000,
    },
    Skin {
        name: "OBSIDIAN",
        // #94a3b8
        color: Color::srgb(0.580, 0.639, 0.722),
        price: 3000,
    },
    Skin {
        name: "NEBULA",
        // #a855f7
        color: Color::srgb(0.659, 0.333, 0.969),
        price: 5000,
    },
];

/// Look up a skin, falling back to the default for out-of-range indices
/// (e.g. a profile written by a build with more skins).
pub fn skin(index: usize) -> &'static Skin {
    SKINS.get(index).unwrap_or(&SKINS[0])
}

/// The hull color for a player. The second ship flies the complementary hue
/// of the equipped skin so both pilots stay distinguishable.
pub fn ship_color(skin_index: usize, player_id: u8) -> Color {
    let base = skin(skin_index).color;
    if player_id == 0 {
        base
    } else {
        Hsla::from(base).rotate_hue(180.0).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_skin_is_free() {
        assert_eq!(SKINS[0].price, 0);
    }

    #[test]
    fn prices_rise_through_the_catalog() {
        for pair in SKINS.windows(2) {
            assert!(pair[0].price < pair[1].price);
        }
    }

    #[test]
    fn out_of_range_index_falls_back_to_default() {
        assert_eq!(skin(99).name, "ICE");
    }

    #[test]
    fn second_player_gets_a_distinct_tint() {
        assert_ne!(ship_color(0, 0), ship_color(0, 1));
    }
}

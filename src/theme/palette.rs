use bevy::prelude::*;

/// Deep space backdrop, #020617
pub const BACKDROP: Color = Color::srgb(0.008, 0.024, 0.090);

/// Dimmed text for labels
pub const LABEL_TEXT: Color = Color::srgb(0.70, 0.78, 0.85);

/// Bright text for headers
pub const HEADER_TEXT: Color = Color::srgb(0.92, 0.96, 1.0);

/// Text on buttons
pub const BUTTON_TEXT: Color = Color::srgb(0.92, 0.96, 1.0);
/// #155e75
pub const BUTTON_BACKGROUND: Color = Color::srgb(0.082, 0.369, 0.459);
/// #0e7490
pub const BUTTON_HOVERED_BACKGROUND: Color = Color::srgb(0.055, 0.455, 0.565);
/// #164e63
pub const BUTTON_PRESSED_BACKGROUND: Color = Color::srgb(0.086, 0.306, 0.388);

/// Warning/danger accent, #ef4444
pub const DANGER: Color = Color::srgb(0.937, 0.267, 0.267);

/// Credits/score accent, #fbbf24
pub const GOLD: Color = Color::srgb(0.984, 0.749, 0.141);

/// Status ticker accent, #22d3ee
pub const TICKER: Color = Color::srgb(0.133, 0.827, 0.933);

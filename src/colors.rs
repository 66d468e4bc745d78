use std::collections::HashMap;

use crate::models::Friend;

pub const FRIEND_COLORS: [&str; 10] = [
    "red", "blue", "green", "black", "orange", "teal", "limegreen", "purple", "grey", "brown",
];

/// Color for anyone no longer in the friend listing.
pub const FALLBACK_COLOR: &str = "grey";

/// Color of the friend at `index` in listing order. Wraps around the palette.
pub fn color_for(index: usize) -> &'static str {
    FRIEND_COLORS[index % FRIEND_COLORS.len()]
}

pub fn assign_friend_colors<T>(friends: impl IntoIterator<Item = T>) -> Vec<(T, &'static str)> {
    friends
        .into_iter()
        .enumerate()
        .map(|(index, friend)| (friend, color_for(index)))
        .collect()
}

/// Friend id to color, for painting messages and riders.
pub fn color_map(friends: &[Friend]) -> HashMap<i64, &'static str> {
    assign_friend_colors(friends)
        .into_iter()
        .map(|(friend, color)| (friend.id, color))
        .collect()
}

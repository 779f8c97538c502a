//! Taunts shown to the losers on the winner screen.

use rand::{rng, seq::IndexedRandom};

/// Lines a winner screen may pick from.
pub const ROASTS: [&str; 12] = [
    "Better luck next time, losers! 🔥",
    "Ouch! That's gotta hurt! 😬",
    "Maybe try a different strategy next time? 🤔",
    "Don't worry, participation trophies are still trophies! 🏆",
    "At least you had fun... right? 😅",
    "Time to practice more UNO! 📚",
    "The winner takes it all! 🎵",
    "Victory tastes so sweet! 🍯",
    "Dominated! Absolutely dominated! 💪",
    "That was brutal! 💀",
    "Someone call the fire department! 🚒",
    "Absolutely demolished! 🏗️",
];

/// Pick one roast at random.
pub fn pick_roast() -> &'static str {
    ROASTS.choose(&mut rng()).copied().unwrap_or(ROASTS[0])
}

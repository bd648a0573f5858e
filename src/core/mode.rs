//! Game modes.

use serde::{Deserialize, Serialize};

/// How the two seats of a round are filled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameMode {
    /// One human, one board. Turns never pass.
    Single,
    /// Two humans sharing the input device, alternating on a miss.
    Multiplayer,
    /// One human against the computer opponent.
    VsComputer,
}

impl GameMode {
    pub const ALL: [GameMode; 3] = [GameMode::Single, GameMode::Multiplayer, GameMode::VsComputer];

    /// Whether a miss hands the turn to the other seat.
    #[must_use]
    pub const fn passes_turns(self) -> bool {
        !matches!(self, GameMode::Single)
    }

    /// Whether high scores are tracked for this mode.
    ///
    /// Two-human rounds have no single score worth recording.
    #[must_use]
    pub const fn tracks_high_score(self) -> bool {
        matches!(self, GameMode::Single | GameMode::VsComputer)
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GameMode::Single => "single",
            GameMode::Multiplayer => "multiplayer",
            GameMode::VsComputer => "vs-computer",
        };
        f.write_str(name)
    }
}

//! The five party games, each a [`Rules`](crate::engine::Rules) policy.
//!
//! | Game           | Input         | Decided by                           |
//! |----------------|---------------|--------------------------------------|
//! | Reflex Battle  | `Tap`         | first tap after a random go-signal   |
//! | Number Duel    | `Pick(Side)`  | first correct pick, best of five     |
//! | Pattern Memory | `Press(box)`  | reproducing a flashed sequence       |
//! | Tap Rush       | `Tap`         | most taps before the buzzer          |
//! | Just Fit       | `Tap`         | stopping a bouncing cursor on target |

pub mod reflex;
pub mod compare;
pub mod memory;
pub mod mash;
pub mod justfit;

use serde::{Deserialize, Serialize};

pub use compare::{CompareRules, CompareSettings};
pub use justfit::{JustFitRules, JustFitSettings};
pub use mash::{MashRules, MashSettings};
pub use memory::{MemoryRules, MemorySettings};
pub use reflex::{ReflexRules, ReflexSettings};

use crate::engine::Engine;

pub type ReflexGame = Engine<ReflexRules>;
pub type CompareGame = Engine<CompareRules>;
pub type MemoryGame = Engine<MemoryRules>;
pub type MashGame = Engine<MashRules>;
pub type JustFitGame = Engine<JustFitRules>;

/// Which game to launch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    Reflex,
    Compare,
    Memory,
    Mash,
    JustFit,
}

impl GameKind {
    pub const ALL: [GameKind; 5] = [
        GameKind::Reflex,
        GameKind::Compare,
        GameKind::Memory,
        GameKind::Mash,
        GameKind::JustFit,
    ];

    /// Title shown on the hub card.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            GameKind::Reflex => "Reflex Battle",
            GameKind::Compare => "Number Duel",
            GameKind::Memory => "Pattern Memory",
            GameKind::Mash => "Tap Rush",
            GameKind::JustFit => "Just Fit",
        }
    }
}

impl std::fmt::Display for GameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GameKind::Reflex => "reflex",
            GameKind::Compare => "compare",
            GameKind::Memory => "memory",
            GameKind::Mash => "mash",
            GameKind::JustFit => "justfit",
        };
        f.write_str(name)
    }
}

/// Game-specific part of a [`Snapshot`](crate::engine::Snapshot).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    Reflex(reflex::ReflexView),
    Compare(compare::CompareView),
    Memory(memory::MemoryView),
    Mash(mash::MashView),
    JustFit(justfit::JustFitView),
}

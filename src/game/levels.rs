//! Static island, level and badge tables.
//!
//! Ten scenario levels are partitioned into six islands. Each island owns
//! one mini-game and awards one badge. The partition is fixed:
//!
//! ```text
//! island1  Phishing Lagoon   levels 1, 2
//! island2  Password Peak     levels 3, 4
//! island3  Payment Bay       levels 5, 6
//! island4  QR Cove           level  7
//! island5  Message Marsh     levels 8, 9
//! island6  Identity Isle     level  10
//! ```

use crate::game::minigame::GameId;

/// Highest level id. Level ids run `1..=MAX_LEVEL`.
pub const MAX_LEVEL: u32 = 10;

/// Points awarded or removed by the different outcomes of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringRules {
    pub correct: i32,
    pub wrong: i32,
    /// Bonus for passing the island's mini-game.
    pub completion: u32,
    /// Upper bound on the time bonus a single answer can earn.
    pub fast_answer_bonus: u32,
    pub perfect: u32,
}

const STANDARD: ScoringRules = ScoringRules {
    correct: 10,
    wrong: -5,
    completion: 50,
    fast_answer_bonus: 5,
    perfect: 15,
};

const FINALE: ScoringRules = ScoringRules {
    correct: 20,
    wrong: -10,
    completion: 100,
    fast_answer_bonus: 10,
    perfect: 25,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub text: &'static str,
    pub correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelDefinition {
    pub id: u32,
    pub island: GameId,
    pub title: &'static str,
    pub prompt: &'static str,
    pub choices: &'static [Choice],
    pub rules: ScoringRules,
}

impl LevelDefinition {
    /// Correctness flag of a choice, `None` if the index is out of range.
    pub fn is_correct(&self, choice: usize) -> Option<bool> {
        self.choices.get(choice).map(|c| c.correct)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeDefinition {
    pub island: GameId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IslandDefinition {
    pub id: GameId,
    pub name: &'static str,
    /// Level ids on this island, ascending.
    pub levels: &'static [u32],
    pub badge: BadgeDefinition,
}

impl IslandDefinition {
    pub fn first_level(&self) -> u32 {
        self.levels[0]
    }

    pub fn last_level(&self) -> u32 {
        self.levels[self.levels.len() - 1]
    }
}

const fn choice(text: &'static str, correct: bool) -> Choice {
    Choice { text, correct }
}

pub static LEVELS: [LevelDefinition; MAX_LEVEL as usize] = [
    LevelDefinition {
        id: 1,
        island: GameId::Island1,
        title: "The Urgent Email",
        prompt: "An email says your account closes today unless you click a link. What do you do?",
        choices: &[
            choice("Click the link quickly", false),
            choice("Check the sender and open the bank's site yourself", true),
            choice("Reply with your password", false),
        ],
        rules: STANDARD,
    },
    LevelDefinition {
        id: 2,
        island: GameId::Island1,
        title: "Look-alike Link",
        prompt: "A message links to 'paypa1-secure.com'. Is it safe?",
        choices: &[
            choice("Yes, it says secure", false),
            choice("No, the domain is misspelled", true),
        ],
        rules: STANDARD,
    },
    LevelDefinition {
        id: 3,
        island: GameId::Island2,
        title: "The OTP Call",
        prompt: "A caller from 'the bank' asks for the one-time code you just received.",
        choices: &[
            choice("Read it out, they are the bank", false),
            choice("Never share it and hang up", true),
        ],
        rules: STANDARD,
    },
    LevelDefinition {
        id: 4,
        island: GameId::Island2,
        title: "Password Picker",
        prompt: "Which password is hardest to guess?",
        choices: &[
            choice("rex2015", false),
            choice("password123", false),
            choice("Blue-Kite-Rainy-42!", true),
        ],
        rules: STANDARD,
    },
    LevelDefinition {
        id: 5,
        island: GameId::Island3,
        title: "Collect Request",
        prompt: "A buyer sends a payment request and says you must approve it to receive money.",
        choices: &[
            choice("Approve and enter your PIN", false),
            choice("Decline, receiving money never needs your PIN", true),
        ],
        rules: STANDARD,
    },
    LevelDefinition {
        id: 6,
        island: GameId::Island3,
        title: "Refund Helper",
        prompt: "A 'support agent' asks you to install a screen-sharing app to process a refund.",
        choices: &[
            choice("Install it to get the refund faster", false),
            choice("Refuse and contact support from the official app", true),
        ],
        rules: STANDARD,
    },
    LevelDefinition {
        id: 7,
        island: GameId::Island4,
        title: "Scan to Receive",
        prompt: "Someone sends a QR code and says scanning it will pay you.",
        choices: &[
            choice("Scan and confirm", false),
            choice("Scanning a code only ever sends money, so don't", true),
        ],
        rules: STANDARD,
    },
    LevelDefinition {
        id: 8,
        island: GameId::Island5,
        title: "You Won!",
        prompt: "An SMS says you won a prize and asks for a small fee to release it.",
        choices: &[
            choice("Pay the fee", false),
            choice("Ignore it, real prizes don't charge fees", true),
        ],
        rules: STANDARD,
    },
    LevelDefinition {
        id: 9,
        island: GameId::Island5,
        title: "Missed Delivery",
        prompt: "A text about a missed parcel links to a form asking for card details.",
        choices: &[
            choice("Fill in the form", false),
            choice("Track the parcel on the courier's own site", true),
        ],
        rules: STANDARD,
    },
    LevelDefinition {
        id: 10,
        island: GameId::Island6,
        title: "Friend in Trouble",
        prompt: "A new number claims to be your friend and urgently needs money.",
        choices: &[
            choice("Send the money right away", false),
            choice("Call your friend on their known number first", true),
            choice("Send half to be safe", false),
        ],
        rules: FINALE,
    },
];

pub static ISLANDS: [IslandDefinition; 6] = [
    IslandDefinition {
        id: GameId::Island1,
        name: "Phishing Lagoon",
        levels: &[1, 2],
        badge: BadgeDefinition {
            island: GameId::Island1,
            name: "Phish Finder",
            description: "Spotted every fake email in the lagoon",
            icon: "\u{1F3A3}",
        },
    },
    IslandDefinition {
        id: GameId::Island2,
        name: "Password Peak",
        levels: &[3, 4],
        badge: BadgeDefinition {
            island: GameId::Island2,
            name: "Code Keeper",
            description: "Kept every code and password secret",
            icon: "\u{1F510}",
        },
    },
    IslandDefinition {
        id: GameId::Island3,
        name: "Payment Bay",
        levels: &[5, 6],
        badge: BadgeDefinition {
            island: GameId::Island3,
            name: "Payment Protector",
            description: "Blocked the payment tricks",
            icon: "\u{1F6E1}",
        },
    },
    IslandDefinition {
        id: GameId::Island4,
        name: "QR Cove",
        levels: &[7],
        badge: BadgeDefinition {
            island: GameId::Island4,
            name: "QR Inspector",
            description: "Knows what a QR code really does",
            icon: "\u{1F50D}",
        },
    },
    IslandDefinition {
        id: GameId::Island5,
        name: "Message Marsh",
        levels: &[8, 9],
        badge: BadgeDefinition {
            island: GameId::Island5,
            name: "Message Master",
            description: "Sorted real messages from scams",
            icon: "\u{2709}",
        },
    },
    IslandDefinition {
        id: GameId::Island6,
        name: "Identity Isle",
        levels: &[10],
        badge: BadgeDefinition {
            island: GameId::Island6,
            name: "Identity Guardian",
            description: "Saw through every impersonator",
            icon: "\u{1F9B8}",
        },
    },
];

/// Look up a level by id.
pub fn level(id: u32) -> Option<&'static LevelDefinition> {
    LEVELS.iter().find(|l| l.id == id)
}

pub fn island(game: GameId) -> &'static IslandDefinition {
    &ISLANDS[game.index()]
}

/// Island that owns the given level.
pub fn island_for_level(id: u32) -> Option<GameId> {
    level(id).map(|l| l.island)
}

pub fn badge(game: GameId) -> &'static BadgeDefinition {
    &island(game).badge
}

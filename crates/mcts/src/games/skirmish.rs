//! A small card battle for exercising the search.
//!
//! One player with a 10-card deck, a 3-energy turn and a 5-card hand fights
//! one or more opponents whose intents are rolled at random each round.
//! Opponent intents and the draw pile order are driven by the snapshot's own
//! RNG, which `fork` reseeds.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use spire_core::{Action, Combat, Outcome, Vitals};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Cards available in the skirmish deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Card {
    /// 1 energy: deal 6 damage.
    Strike,
    /// 1 energy: gain 5 block.
    Defend,
    /// 2 energy: deal 8 damage and apply 2 vulnerable.
    Bash,
    /// 1 energy: deal 8 damage to every opponent.
    Cleave,
}

impl Card {
    pub fn cost(self) -> u32 {
        match self {
            Card::Bash => 2,
            Card::Strike | Card::Defend | Card::Cleave => 1,
        }
    }
}

/// What an opponent will do at the end of the player's turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Attack(u32),
    Defend(u32),
    Buff(u32),
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Attack(n) => write!(f, "attack {}", n),
            Intent::Defend(n) => write!(f, "defend {}", n),
            Intent::Buff(n) => write!(f, "buff {}", n),
        }
    }
}

/// Opponent archetypes with their health and intent tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpponentKind {
    JawWorm,
    Louse,
}

impl OpponentKind {
    pub fn max_health(self) -> u32 {
        match self {
            OpponentKind::JawWorm => 42,
            OpponentKind::Louse => 12,
        }
    }

    fn roll_intent<R: Rng + ?Sized>(self, rng: &mut R) -> Intent {
        let roll = rng.gen_range(0..100);
        match self {
            OpponentKind::JawWorm => match roll {
                0..=44 => Intent::Attack(11),
                45..=74 => Intent::Buff(3),
                _ => Intent::Defend(6),
            },
            OpponentKind::Louse => match roll {
                0..=74 => Intent::Attack(6),
                _ => Intent::Buff(3),
            },
        }
    }
}

impl fmt::Display for OpponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpponentKind::JawWorm => write!(f, "Jaw Worm"),
            OpponentKind::Louse => write!(f, "Louse"),
        }
    }
}

/// One opponent in the skirmish.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Opponent {
    pub kind: OpponentKind,
    pub health: u32,
    pub max_health: u32,
    pub block: u32,
    pub strength: u32,
    pub vulnerable: u32,
    pub intent: Intent,
}

impl Opponent {
    fn new<R: Rng + ?Sized>(kind: OpponentKind, rng: &mut R) -> Self {
        let max_health = kind.max_health();
        Self {
            kind,
            health: max_health,
            max_health,
            block: 0,
            strength: 0,
            vulnerable: 0,
            intent: kind.roll_intent(rng),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    fn take_damage(&mut self, amount: u32) {
        let amount = if self.vulnerable > 0 {
            amount * 3 / 2
        } else {
            amount
        };
        let absorbed = amount.min(self.block);
        self.block -= absorbed;
        self.health = self.health.saturating_sub(amount - absorbed);
    }
}

/// Full skirmish state.
#[derive(Clone, Debug)]
pub struct SkirmishState {
    player_health: u32,
    player_max_health: u32,
    player_block: u32,
    energy: u32,
    hand: Vec<Card>,
    draw_pile: Vec<Card>,
    discard_pile: Vec<Card>,
    opponents: Vec<Opponent>,
    turn: u32,
    rng: ChaCha8Rng,
}

impl SkirmishState {
    pub fn player_health(&self) -> u32 {
        self.player_health
    }

    pub fn player_block(&self) -> u32 {
        self.player_block
    }

    pub fn energy(&self) -> u32 {
        self.energy
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn draw_pile(&self) -> &[Card] {
        &self.draw_pile
    }

    pub fn discard_pile(&self) -> &[Card] {
        &self.discard_pile
    }

    pub fn opponents(&self) -> &[Opponent] {
        &self.opponents
    }

    /// Current turn number, starting at 1.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Index of the living opponent with the least health (first on ties).
    fn target(&self) -> Option<usize> {
        self.opponents
            .iter()
            .enumerate()
            .filter(|(_, o)| o.is_alive())
            .min_by_key(|(_, o)| o.health)
            .map(|(i, _)| i)
    }

    fn draw(&mut self, count: usize) {
        for _ in 0..count {
            if self.draw_pile.is_empty() {
                if self.discard_pile.is_empty() {
                    return;
                }
                self.draw_pile.append(&mut self.discard_pile);
                self.draw_pile.shuffle(&mut self.rng);
            }
            if let Some(card) = self.draw_pile.pop() {
                self.hand.push(card);
            }
        }
    }

    fn play(&mut self, card: Card) {
        match card {
            Card::Strike => {
                if let Some(t) = self.target() {
                    self.opponents[t].take_damage(6);
                }
            }
            Card::Defend => self.player_block += 5,
            Card::Bash => {
                if let Some(t) = self.target() {
                    self.opponents[t].take_damage(8);
                    self.opponents[t].vulnerable += 2;
                }
            }
            Card::Cleave => {
                for opponent in self.opponents.iter_mut().filter(|o| o.is_alive()) {
                    opponent.take_damage(8);
                }
            }
        }
    }

    fn opponents_act(&mut self) {
        for i in 0..self.opponents.len() {
            if !self.opponents[i].is_alive() || self.player_health == 0 {
                continue;
            }
            let opponent = &mut self.opponents[i];
            opponent.block = 0;
            match opponent.intent {
                Intent::Attack(n) => {
                    let damage = n + opponent.strength;
                    let absorbed = damage.min(self.player_block);
                    self.player_block -= absorbed;
                    self.player_health = self.player_health.saturating_sub(damage - absorbed);
                }
                Intent::Defend(n) => opponent.block += n,
                Intent::Buff(n) => opponent.strength += n,
            }
            opponent.vulnerable = opponent.vulnerable.saturating_sub(1);
        }

        for opponent in self.opponents.iter_mut().filter(|o| o.is_alive()) {
            opponent.intent = opponent.kind.roll_intent(&mut self.rng);
        }
    }
}

impl fmt::Display for SkirmishState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "turn {} | hp {}/{} block {} energy {}",
            self.turn, self.player_health, self.player_max_health, self.player_block, self.energy
        )?;
        writeln!(f, "hand {:?}", self.hand)?;
        for opponent in &self.opponents {
            writeln!(
                f,
                "{} {}/{} block {} (intent: {})",
                opponent.kind, opponent.health, opponent.max_health, opponent.block, opponent.intent
            )?;
        }
        Ok(())
    }
}

/// Preset decks and encounters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scenario {
    /// Starter deck at 40 health against a Jaw Worm.
    Starter,
    /// A Cleave deck at 36 health against a Louse and a Jaw Worm.
    Basic,
    /// A Cleave deck at 30 health against three Lice.
    Swarm,
    /// A defensive deck at 18 health against a Jaw Worm.
    LowHp,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::Starter,
        Scenario::Basic,
        Scenario::Swarm,
        Scenario::LowHp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scenario::Starter => "starter",
            Scenario::Basic => "basic",
            Scenario::Swarm => "swarm",
            Scenario::LowHp => "lowhp",
        }
    }

    pub fn player_health(self) -> u32 {
        match self {
            Scenario::Starter => 40,
            Scenario::Basic => 36,
            Scenario::Swarm => 30,
            Scenario::LowHp => 18,
        }
    }

    pub fn deck(self) -> Vec<Card> {
        use Card::*;
        match self {
            Scenario::Starter => Skirmish::starter_deck(),
            Scenario::Basic => vec![Strike, Strike, Defend, Defend, Defend, Bash, Cleave, Cleave],
            Scenario::Swarm => vec![Strike, Strike, Strike, Defend, Defend, Defend, Cleave, Cleave],
            Scenario::LowHp => vec![Strike, Strike, Defend, Defend, Defend, Defend, Bash],
        }
    }

    pub fn opponents(self) -> &'static [OpponentKind] {
        use OpponentKind::*;
        match self {
            Scenario::Starter | Scenario::LowHp => &[JawWorm],
            Scenario::Basic => &[Louse, JawWorm],
            Scenario::Swarm => &[Louse, Louse, Louse],
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scenario name that matches no preset.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown scenario `{0}` (expected starter, basic, swarm or lowhp)")]
pub struct UnknownScenario(pub String);

impl FromStr for Scenario {
    type Err = UnknownScenario;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownScenario(s.to_string()))
    }
}

/// Skirmish rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Skirmish {
    /// Cards drawn at the start of each turn.
    pub hand_size: usize,
    /// Energy restored at the start of each turn.
    pub energy_per_turn: u32,
    /// The combat is lost once this many turns have ended.
    pub max_turns: u32,
}

impl Default for Skirmish {
    fn default() -> Self {
        Self {
            hand_size: 5,
            energy_per_turn: 3,
            max_turns: 30,
        }
    }
}

impl Skirmish {
    /// The ironclad starter deck: 5 Strike, 4 Defend, 1 Bash.
    pub fn starter_deck() -> Vec<Card> {
        let mut deck = vec![Card::Strike; 5];
        deck.extend([Card::Defend; 4]);
        deck.push(Card::Bash);
        deck
    }

    /// Start a combat with the given deck and opponents.
    pub fn start(
        &self,
        player_health: u32,
        deck: Vec<Card>,
        opponents: &[OpponentKind],
        seed: u64,
    ) -> SkirmishState {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut draw_pile = deck;
        draw_pile.shuffle(&mut rng);
        let opponents = opponents.iter().map(|&kind| Opponent::new(kind, &mut rng)).collect();

        let mut state = SkirmishState {
            player_health,
            player_max_health: player_health,
            player_block: 0,
            energy: self.energy_per_turn,
            hand: Vec::new(),
            draw_pile,
            discard_pile: Vec::new(),
            opponents,
            turn: 1,
            rng,
        };
        state.draw(self.hand_size);
        state
    }

    /// Start one of the preset encounters.
    pub fn scenario(&self, scenario: Scenario, seed: u64) -> SkirmishState {
        self.start(
            scenario.player_health(),
            scenario.deck(),
            scenario.opponents(),
            seed,
        )
    }

    /// Shorthand for [`Scenario::Starter`].
    pub fn starter(&self, seed: u64) -> SkirmishState {
        self.scenario(Scenario::Starter, seed)
    }

    fn end_turn(&self, state: &mut SkirmishState) {
        state.discard_pile.append(&mut state.hand);
        state.opponents_act();
        if state.player_health == 0 {
            return;
        }
        state.turn += 1;
        state.player_block = 0;
        state.energy = self.energy_per_turn;
        state.draw(self.hand_size);
    }
}

impl Combat for Skirmish {
    type Snapshot = SkirmishState;

    fn fork(&self, live: &SkirmishState, seed: u64) -> SkirmishState {
        let mut state = live.clone();
        state.rng = ChaCha8Rng::seed_from_u64(seed);
        state.draw_pile.shuffle(&mut state.rng);
        state
    }

    fn hand_size(&self, state: &SkirmishState) -> usize {
        state.hand.len()
    }

    fn is_playable(&self, state: &SkirmishState, slot: usize) -> bool {
        state
            .hand
            .get(slot)
            .is_some_and(|card| card.cost() <= state.energy)
    }

    fn apply(&self, state: &mut SkirmishState, action: Action) {
        if self.is_terminal(state) {
            return;
        }
        match action {
            Action::PlayCard { slot } => {
                if !self.is_playable(state, slot) {
                    return;
                }
                let card = state.hand.remove(slot);
                state.energy -= card.cost();
                state.play(card);
                state.discard_pile.push(card);
            }
            Action::EndTurn => self.end_turn(state),
        }
    }

    fn outcome(&self, state: &SkirmishState) -> Option<Outcome> {
        if state.opponents.iter().all(|o| !o.is_alive()) {
            Some(Outcome::Win)
        } else if state.player_health == 0 || state.turn > self.max_turns {
            Some(Outcome::Loss)
        } else {
            None
        }
    }

    fn vitals(&self, state: &SkirmishState) -> Vitals {
        Vitals {
            player_health: state.player_health,
            player_max_health: state.player_max_health,
            opponent_health: state.opponents.iter().map(|o| o.health).sum(),
            opponent_max_health: state.opponents.iter().map(|o| o.max_health).sum(),
        }
    }
}

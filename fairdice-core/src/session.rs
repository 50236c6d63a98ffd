//! Game orchestration over a [`Console`].
//!
//! Order of play: a fair coin decides who picks first, both parties pick a
//! die, then every round derives a fair offset and throws both dice.

use crate::commitment::{Committer, FairChoice, FairScheme, GuessOutcome, GuessScheme, ModularSum};
use crate::error::Result;
use crate::game::{GameState, Party};
use crate::probability::ProbabilityTable;
use crate::round::{self, RoundEngine, RoundOutcome, Throw, Winner};
use crate::settings::SessionSettings;
use rand::{CryptoRng, RngCore};
use serde::Serialize;

pub const QUIT_KEY: &str = "X";
pub const HELP_KEY: &str = "?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    pub key: String,
    pub label: String,
}

impl MenuOption {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Human facing side of the game.
pub trait Console {
    /// Show `options` and block until one of their keys is entered.
    fn prompt_choice(&mut self, options: &[MenuOption], prompt: &str) -> Result<String>;

    fn display(&mut self, text: &str) -> Result<()>;

    /// Render the help table. Layout is up to the console.
    fn display_probabilities(&mut self, table: &ProbabilityTable) -> Result<()>;
}

impl<C: Console + ?Sized> Console for &mut C {
    fn prompt_choice(&mut self, options: &[MenuOption], prompt: &str) -> Result<String> {
        (**self).prompt_choice(options, prompt)
    }

    fn display(&mut self, text: &str) -> Result<()> {
        (**self).display(text)
    }

    fn display_probabilities(&mut self, table: &ProbabilityTable) -> Result<()> {
        (**self).display_probabilities(table)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Scoreboard {
    pub computer: u32,
    pub user: u32,
    pub ties: u32,
    pub rounds: Vec<RoundOutcome>,
}

impl Scoreboard {
    pub fn record(&mut self, outcome: RoundOutcome) {
        match outcome.winner {
            Winner::Party(Party::Computer) => self.computer += 1,
            Winner::Party(Party::User) => self.user += 1,
            Winner::Tie => self.ties += 1,
        }
        self.rounds.push(outcome);
    }

    pub fn leader(&self) -> Winner {
        round::compare(i64::from(self.computer), i64::from(self.user))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    Completed(Scoreboard),
    Quit,
}

pub struct Session<R, C> {
    state: GameState,
    settings: SessionSettings,
    committer: Committer<R>,
    engine: RoundEngine<R>,
    console: C,
}

impl<R, C> Session<R, C>
where
    R: RngCore + CryptoRng,
    C: Console,
{
    pub fn new(
        state: GameState,
        settings: SessionSettings,
        committer: Committer<R>,
        engine: RoundEngine<R>,
        console: C,
    ) -> Self {
        Self {
            state,
            settings,
            committer,
            engine,
            console,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Play the whole game. Quitting at any prompt ends it cleanly.
    pub fn run(mut self) -> Result<SessionEnd> {
        self.settings.validate()?;
        tracing::info!(
            "Starting game with {} dice, {} round(s)",
            self.state.dice().all().len(),
            self.settings.rounds
        );

        if self.decide_first_move()?.is_none() {
            return self.quit();
        }

        for party in self.state.selection_order()? {
            match party {
                Party::Computer => self.computer_selects()?,
                Party::User => {
                    if self.user_selects()?.is_none() {
                        return self.quit();
                    }
                }
            }
        }

        let mut board = Scoreboard::default();
        for number in 1..=self.settings.rounds {
            match self.play_round(number)? {
                Some(outcome) => board.record(outcome),
                None => return self.quit(),
            }
        }

        if self.settings.rounds > 1 {
            self.show_score(&board)?;
        }

        tracing::info!(
            "Game finished: computer {} / user {} / ties {}",
            board.computer,
            board.user,
            board.ties
        );
        Ok(SessionEnd::Completed(board))
    }

    fn quit(&mut self) -> Result<SessionEnd> {
        tracing::info!("Game aborted by the user");
        self.console.display("Game aborted. Bye!")?;
        Ok(SessionEnd::Quit)
    }

    fn decide_first_move(&mut self) -> Result<Option<Party>> {
        let secret = self.committer.draw(GuessScheme::coin().range())?;
        self.first_move_with(secret)
    }

    pub(crate) fn first_move_with(&mut self, secret: u32) -> Result<Option<Party>> {
        let choice = FairChoice::with_value(GuessScheme::coin(), &mut self.committer, secret)?;

        self.console
            .display("Let's determine who makes the first move.")?;
        self.console.display(&format!(
            "I selected a random value in the range 0..{} (HMAC={}).",
            choice.range() - 1,
            choice.mac()
        ))?;
        self.console.display("Try to guess my selection.")?;

        let Some(guess) = self.ask_number(choice.range(), "Your selection")? else {
            return Ok(None);
        };

        let revealed = choice.respond(guess)?.reveal();
        self.console.display(&format!(
            "My selection: {} (KEY={}).",
            revealed.value,
            revealed.key.to_hex()
        ))?;

        let first = match revealed.outcome {
            GuessOutcome::Guessed => {
                self.console
                    .display("You guessed it! You make the first move.")?;
                Party::User
            }
            GuessOutcome::Missed => {
                self.console.display("I make the first move.")?;
                Party::Computer
            }
        };

        self.state.set_first_mover(first)?;
        Ok(Some(first))
    }

    fn computer_selects(&mut self) -> Result<()> {
        let available = self.state.dice().available_indices();
        let pick = self.committer.draw(available.len() as u32)? as usize;
        self.computer_selects_index(available[pick])
    }

    pub(crate) fn computer_selects_index(&mut self, index: usize) -> Result<()> {
        let dice = self.state.select(Party::Computer, index)?;
        let text = format!("I choose the {} dice.", dice);
        self.console.display(&text)
    }

    fn user_selects(&mut self) -> Result<Option<()>> {
        loop {
            let options: Vec<MenuOption> = self
                .state
                .dice()
                .list()
                .into_iter()
                .map(|(index, dice)| MenuOption::new(index.to_string(), dice.to_string()))
                .collect();

            self.console.display("Choose your dice:")?;
            let Some(key) = self.ask(options, "Your selection")? else {
                return Ok(None);
            };

            let index = match key.parse::<usize>() {
                Ok(index) => index,
                Err(_) => {
                    self.console
                        .display(&format!("'{}' is not a dice number.", key))?;
                    continue;
                }
            };

            match self.state.select(Party::User, index) {
                Ok(dice) => {
                    let text = format!("You choose the {} dice.", dice);
                    self.console.display(&text)?;
                    return Ok(Some(()));
                }
                Err(e) if !e.is_fatal() => {
                    self.console.display(&e.to_string())?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn play_round(&mut self, number: u32) -> Result<Option<RoundOutcome>> {
        let faces = self.state.face_count();
        let secret = self.committer.draw(faces as u32)?;
        let selectors = [
            self.engine.draw_selector(faces)?,
            self.engine.draw_selector(faces)?,
        ];
        self.round_with(number, secret, selectors)
    }

    pub(crate) fn round_with(
        &mut self,
        number: u32,
        secret: u32,
        selectors: [usize; 2],
    ) -> Result<Option<RoundOutcome>> {
        let modulus = self.state.face_count() as u32;
        let choice = FairChoice::with_value(ModularSum::new(modulus), &mut self.committer, secret)?;

        self.console
            .display(&format!("Round {}. It's time to throw.", number))?;
        self.console.display(&format!(
            "I selected a random value in the range 0..{} (HMAC={}).",
            modulus - 1,
            choice.mac()
        ))?;
        self.console
            .display(&format!("Add your number modulo {}.", modulus))?;

        let Some(addend) = self.ask_number(modulus, "Your selection")? else {
            return Ok(None);
        };

        let revealed = choice.respond(addend)?.reveal();
        self.console.display(&format!(
            "My number is {} (KEY={}).",
            revealed.value,
            revealed.key.to_hex()
        ))?;
        self.console.display(&format!(
            "The fair number generation result is {} + {} = {} (mod {}).",
            revealed.value, revealed.response, revealed.outcome, modulus
        ))?;

        let (computer_dice, user_dice) = self.state.matchup()?;
        let outcome = round::play_with(computer_dice, user_dice, revealed.outcome, selectors)?;

        self.console
            .display(&describe_throw("My", &outcome.computer, revealed.outcome, modulus))?;
        self.console
            .display(&describe_throw("Your", &outcome.user, revealed.outcome, modulus))?;

        let verdict = match outcome.winner {
            Winner::Party(Party::User) => format!(
                "You win ({} > {})!",
                outcome.user.value, outcome.computer.value
            ),
            Winner::Party(Party::Computer) => format!(
                "I win ({} > {})!",
                outcome.computer.value, outcome.user.value
            ),
            Winner::Tie => format!(
                "It's a tie ({} = {}).",
                outcome.computer.value, outcome.user.value
            ),
        };
        self.console.display(&verdict)?;

        Ok(Some(outcome))
    }

    fn show_score(&mut self, board: &Scoreboard) -> Result<()> {
        let leader = match board.leader() {
            Winner::Party(Party::User) => "You win the game!",
            Winner::Party(Party::Computer) => "I win the game!",
            Winner::Tie => "The game is a draw.",
        };
        self.console.display(&format!(
            "Final score: you {}, me {}, ties {}. {}",
            board.user, board.computer, board.ties, leader
        ))
    }

    fn show_help(&mut self) -> Result<()> {
        let table = ProbabilityTable::new(self.state.dice().all(), self.settings.precision);
        self.console.display_probabilities(&table)
    }

    /// Numeric menu `0..range`.
    fn ask_number(&mut self, range: u32, prompt: &str) -> Result<Option<u32>> {
        let options: Vec<MenuOption> = (0..range)
            .map(|n| MenuOption::new(n.to_string(), n.to_string()))
            .collect();

        loop {
            let Some(key) = self.ask(options.clone(), prompt)? else {
                return Ok(None);
            };
            match key.parse::<u32>() {
                Ok(n) if n < range => return Ok(Some(n)),
                _ => {
                    self.console
                        .display(&format!("'{}' is not a number in 0..{}.", key, range - 1))?;
                }
            }
        }
    }

    /// Prompt with quit and help appended. `None` means the user quit.
    fn ask(&mut self, mut options: Vec<MenuOption>, prompt: &str) -> Result<Option<String>> {
        options.push(MenuOption::new(QUIT_KEY, "exit"));
        options.push(MenuOption::new(HELP_KEY, "help"));

        loop {
            let key = self.console.prompt_choice(&options, prompt)?;
            let key = key.trim();

            if key.eq_ignore_ascii_case(QUIT_KEY) {
                return Ok(None);
            }
            if key == HELP_KEY {
                self.show_help()?;
                continue;
            }
            if options.iter().any(|o| o.key == key) {
                return Ok(Some(key.to_string()));
            }

            self.console
                .display(&format!("'{}' is not one of the options.", key))?;
        }
    }
}

fn describe_throw(owner: &str, throw: &Throw, offset: u32, modulus: u32) -> String {
    format!(
        "{} throw: face #{} (({} + {}) mod {}) = {}.",
        owner, throw.face, throw.selector, offset, modulus, throw.value
    )
}

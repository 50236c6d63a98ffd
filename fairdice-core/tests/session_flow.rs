//! Full games driven through a scripted console, checked the way a
//! suspicious user would: every published HMAC must match the revealed
//! value and key.

use fairdice_core::commitment::verify;
use fairdice_core::{
    Committer, ConfigurationError, Console, DiceSet, GameError, GameState, MacTag, MenuOption,
    Party, ProbabilityTable, Result, RoundEngine, SecretKey, Session, SessionEnd,
    SessionSettings, Winner,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Always answers with the first real option, optionally quitting at the
/// n-th prompt.
struct BotConsole {
    prompts: usize,
    quit_at: Option<usize>,
    transcript: Vec<String>,
}

impl BotConsole {
    fn new(quit_at: Option<usize>) -> Self {
        Self {
            prompts: 0,
            quit_at,
            transcript: Vec::new(),
        }
    }
}

impl Console for BotConsole {
    fn prompt_choice(&mut self, options: &[MenuOption], _prompt: &str) -> Result<String> {
        self.prompts += 1;
        if self.quit_at == Some(self.prompts) {
            return Ok("X".to_string());
        }
        Ok(options[0].key.clone())
    }

    fn display(&mut self, text: &str) -> Result<()> {
        self.transcript.push(text.to_string());
        Ok(())
    }

    fn display_probabilities(&mut self, table: &ProbabilityTable) -> Result<()> {
        self.display(table.title())
    }
}

fn reference_dice() -> DiceSet {
    DiceSet::parse(&["2,2,4,4,9,9", "6,8,1,1,8,6", "7,5,3,7,5,3"]).unwrap()
}

fn run(rounds: u32, seed: u64, console: &mut BotConsole) -> SessionEnd {
    let settings = SessionSettings {
        rounds,
        ..Default::default()
    };
    Session::new(
        GameState::new(reference_dice()),
        settings,
        Committer::new(StdRng::seed_from_u64(seed)),
        RoundEngine::new(StdRng::seed_from_u64(seed ^ 0xdead_beef)),
        console,
    )
    .run()
    .unwrap()
}

fn hex_after(line: &str, marker: &str) -> String {
    let start = line.find(marker).expect("marker present") + marker.len();
    line[start..]
        .chars()
        .take_while(|c| c.is_ascii_hexdigit())
        .collect()
}

fn number_before_key(line: &str) -> u32 {
    let head = &line[..line.find(" (KEY=").expect("key marker")];
    head.rsplit(' ').next().unwrap().parse().unwrap()
}

#[test]
fn test_every_commitment_verifies() {
    let mut console = BotConsole::new(None);
    let end = run(3, 2024, &mut console);

    let SessionEnd::Completed(board) = end else {
        panic!("game should complete");
    };
    assert_eq!(board.rounds.len(), 3);
    assert_eq!(board.user + board.computer + board.ties, 3);

    let macs: Vec<&String> = console.transcript.iter().filter(|l| l.contains("HMAC=")).collect();
    let keys: Vec<&String> = console.transcript.iter().filter(|l| l.contains("KEY=")).collect();
    assert_eq!(macs.len(), 4);
    assert_eq!(keys.len(), 4);

    for (mac_line, key_line) in macs.iter().zip(&keys) {
        let mut mac = [0u8; 32];
        mac.copy_from_slice(&hex::decode(hex_after(mac_line, "HMAC=")).unwrap());
        let mac = MacTag::from_bytes(mac);
        let key = SecretKey::from_hex(&hex_after(key_line, "KEY=")).unwrap();
        let value = number_before_key(key_line);

        assert!(verify(value, &key, &mac), "{} / {}", mac_line, key_line);
        assert!(!verify(value + 1, &key, &mac));
    }

    let final_line = console.transcript.last().unwrap();
    assert!(final_line.starts_with("Final score:"));
}

#[test]
fn test_offsets_add_up() {
    let mut console = BotConsole::new(None);
    run(2, 7, &mut console);

    let results: Vec<&String> = console
        .transcript
        .iter()
        .filter(|l| l.starts_with("The fair number generation result is"))
        .collect();
    assert_eq!(results.len(), 2);

    for line in results {
        let numbers: Vec<u32> = line
            .split(|c: char| !c.is_ascii_digit())
            .filter(|s| !s.is_empty())
            .map(|s| s.parse().unwrap())
            .collect();
        let [x, y, r, m] = numbers.as_slice() else {
            panic!("unexpected line {}", line);
        };
        assert_eq!(*m, 6);
        assert_eq!((x + y) % m, *r);
    }
}

#[test]
fn test_first_mover_picks_first() {
    for seed in 0..10 {
        let mut console = BotConsole::new(None);
        run(1, seed, &mut console);

        let decided = console
            .transcript
            .iter()
            .find(|l| l.ends_with("make the first move."))
            .unwrap();
        let first_pick = console
            .transcript
            .iter()
            .find(|l| l.starts_with("I choose") || l.starts_with("You choose"))
            .unwrap();

        if decided.contains("I make the first move") {
            assert!(first_pick.starts_with("I choose"));
        } else {
            assert!(first_pick.starts_with("You choose"));
        }
    }
}

#[test]
fn test_quit_during_round() {
    // prompts: guess, user dice selection, round addend
    let mut console = BotConsole::new(Some(3));
    let end = run(1, 99, &mut console);

    let reached_round = console.transcript.iter().any(|l| l.starts_with("Round 1."));
    assert_eq!(end, SessionEnd::Quit);
    assert!(reached_round);
    assert_eq!(console.transcript.last().unwrap(), "Game aborted. Bye!");
}

#[test]
fn test_invalid_dice_never_start_a_game() {
    let err = DiceSet::parse(&["1,2,3", "4,5,6"]).unwrap_err();
    assert!(matches!(
        err,
        GameError::Configuration(ConfigurationError::TooFewDice { found: 2, .. })
    ));

    let err = DiceSet::parse(&["1,2,3", "4,5,6", "7,8,x"]).unwrap_err();
    assert!(matches!(
        err,
        GameError::Configuration(ConfigurationError::InvalidFace { position: 2, .. })
    ));
}

#[test]
fn test_game_state_after_selection() {
    let mut state = GameState::new(reference_dice());
    state.set_first_mover(Party::Computer).unwrap();
    state.select(Party::Computer, 0).unwrap();
    state.select(Party::User, 2).unwrap();

    let (computer, user) = state.matchup().unwrap();
    let outcome = fairdice_core::round::play_with(computer, user, 0, [4, 4]).unwrap();
    // 9 on the computer's die against 5
    assert_eq!(outcome.winner, Winner::Party(Party::Computer));
}

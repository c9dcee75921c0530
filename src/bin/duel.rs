//! Console front end: a menu, line-based choices and the roll ticker.
//!
//! Set `RUST_LOG=debug` to see the engine's own log next to the game text.

use std::io::{self, IsTerminal, Write};

use dice_duel::core::{CatalogVariant, EngineError, MatchConfig, MatchEvent, PlayerId, TurnChoice};
use dice_duel::effects::Stat;
use dice_duel::presentation::{text, RollTicker};
use dice_duel::rules::{DecisionProvider, Match, RollPurpose, RollRequest, TurnView};

const DEFAULT_DECK_SIZE: usize = 12;
const MIN_DECK_SIZE: usize = 4;
const MAX_DECK_SIZE: usize = 60;

/// Print `message` and read one trimmed line. `None` on end of input.
fn prompt(message: &str) -> Option<String> {
    print!("{message}");
    let _ = io::stdout().flush();
    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

/// Decisions typed in by whoever sits at the terminal.
#[derive(Default)]
struct Console {
    /// The next card roll was rolled garbled.
    hide_next_roll: bool,
}

impl DecisionProvider for Console {
    fn choose_action(&mut self, view: &TurnView) -> TurnChoice {
        println!();
        println!("{}", text::status_line(&view.me));
        println!("{}", text::status_line(&view.opponent));
        println!("Actions left: {}", view.actions_remaining);
        println!("{} hand: {}", view.me.name, text::hand_listing(&view.me.hand));

        let last = view.me.hand.len().saturating_sub(1);
        loop {
            let Some(line) = prompt(&format!(
                "Play a card (0-{last}), -1 to end the turn, -2 to surrender: "
            )) else {
                return TurnChoice::Surrender;
            };
            match line.parse::<i64>() {
                Ok(-1) => return TurnChoice::EndTurn,
                Ok(-2) => return TurnChoice::Surrender,
                Ok(index) if (0..view.me.hand.len() as i64).contains(&index) => {
                    return TurnChoice::Play(index as usize)
                }
                _ => println!("Invalid choice, try again."),
            }
        }
    }

    fn choose_discard(&mut self, view: &TurnView) -> usize {
        println!();
        println!(
            "{} holds {} cards, {} must go",
            view.me.name,
            view.me.hand.len(),
            view.excess_cards()
        );
        println!("{} hand: {}", view.me.name, text::hand_listing(&view.me.hand));

        let last = view.me.hand.len().saturating_sub(1);
        loop {
            let Some(line) = prompt(&format!("Discard which card (0-{last}): ")) else {
                return 0;
            };
            match line.parse::<usize>() {
                Ok(index) if index < view.me.hand.len() => return index,
                _ => println!("Invalid choice, try again."),
            }
        }
    }

    fn choose_stat(&mut self, chooser: PlayerId) -> Stat {
        loop {
            let question = format!("{chooser} rolled 300! Hit hp, san or actions: ");
            let Some(line) = prompt(&question) else {
                return Stat::Hp;
            };
            match line.to_lowercase().as_str() {
                "hp" => return Stat::Hp,
                "san" => return Stat::San,
                "actions" => return Stat::Actions,
                _ => println!("Type hp, san or actions."),
            }
        }
    }

    fn choose_preset_roll(&mut self, player: PlayerId) -> Option<i64> {
        prompt(&format!("{player}, value of your next roll: "))?
            .parse()
            .ok()
    }

    fn capture_roll_stop(&mut self, request: &RollRequest) {
        if request.purpose == RollPurpose::Primary {
            self.hide_next_roll = request.garbled;
        }
        let ticker = RollTicker::start(request, io::stdout());
        let _ = prompt(&format!(
            "{} rolls for {} (press Enter to stop) ",
            request.player, request.label
        ));
        if ticker.stop().is_none() {
            log::warn!("roll ticker did not stop in time");
        }
    }

    fn observe(&mut self, event: &MatchEvent) {
        for line in text::describe_event(event, self.hide_next_roll) {
            println!("{line}");
        }
        if matches!(event, MatchEvent::CardPlayed { .. }) {
            self.hide_next_roll = false;
        }
    }
}

fn play(config: MatchConfig) -> Result<(), EngineError> {
    log::info!(
        "new match: deck {} cards, {:?}, seed {}",
        config.deck_size,
        config.catalog,
        config.seed
    );
    let mut duel = Match::new(config, Console::default())?;
    duel.run()?;
    let _ = prompt("Press Enter to return to the menu...");
    Ok(())
}

fn main() {
    env_logger::init();

    let interactive = io::stdin().is_terminal();
    let base = MatchConfig::new().with_interactive_dice(interactive);

    loop {
        println!();
        println!("===== Dice Duel =====");
        println!("1. New game (deck size {DEFAULT_DECK_SIZE})");
        println!("2. New game (custom deck size)");
        println!("3. New game (with Debug Card)");
        println!("4. Quit");
        let Some(choice) = prompt("Choose (1/2/3/4): ") else {
            return;
        };

        let config = match choice.as_str() {
            "1" => base.clone(),
            "2" => {
                let Some(size) = prompt(&format!(
                    "Cards per deck (suggested 8-30, clamped to {MIN_DECK_SIZE}-{MAX_DECK_SIZE}): "
                ))
                .and_then(|line| line.parse::<usize>().ok()) else {
                    println!("Invalid number, back to the menu.");
                    continue;
                };
                let debug = prompt("Include the Debug Card? (y/n): ")
                    .is_some_and(|line| line.eq_ignore_ascii_case("y"));
                let catalog = if debug {
                    CatalogVariant::WithDebug
                } else {
                    CatalogVariant::Standard
                };
                base.clone()
                    .with_deck_size(size.clamp(MIN_DECK_SIZE, MAX_DECK_SIZE))
                    .with_catalog(catalog)
            }
            "3" => base.clone().with_catalog(CatalogVariant::WithDebug),
            "4" => {
                println!("Goodbye!");
                return;
            }
            _ => {
                println!("Unknown choice, try again.");
                continue;
            }
        };

        if let Err(err) = play(config.with_seed(rand::random())) {
            log::error!("match aborted: {err}");
            eprintln!("Match aborted: {err}");
        }
    }
}

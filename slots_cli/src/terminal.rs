//! Interactive terminal game loop.
//!
//! The loop reads from any `BufRead` and writes to any `Write` so it can run
//! against stdin/stdout or in-memory buffers.

use rand::Rng;
use std::io::{self, BufRead, Write};
use vegas_slots::{Reels, SlotEngine};

use crate::commands::{Command, parse_command};

const RULE_WIDTH: usize = 50;
const REEL_BORDER: &str = "     +-------+-------+-------+";

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Player typed `quit`
    Quit { balance: i64 },
    /// Balance reached zero
    GameOver,
    /// Input ran out before either of the above
    InputClosed { balance: i64 },
}

/// Title banner.
pub fn banner() -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("\n{rule}\n      *** VEGAS STYLE SLOT MACHINE ***\n{rule}")
}

/// Draw three reels as an ASCII box.
///
/// # Examples
///
/// ```
/// use slots_cli::terminal::render_reels;
/// use vegas_slots::Symbol;
///
/// let drawn = render_reels(&[Symbol::Seven, Symbol::Bar, Symbol::At]);
/// assert!(drawn.contains("|   7   |  BAR  |   @   |"));
/// ```
pub fn render_reels(reels: &Reels) -> String {
    let [a, b, c] = reels;
    format!("{REEL_BORDER}\n     |  {a:^3}  |  {b:^3}  |  {c:^3}  |\n{REEL_BORDER}")
}

/// Play until the player quits, the balance runs out, or input ends.
///
/// Each empty line bets `bet` and spins. A bet the balance cannot cover
/// prints `Not enough balance!` and waits for the next line.
///
/// # Errors
///
/// Returns any I/O error from reading input or writing output.
pub fn run_session<R, W, G>(
    engine: &mut SlotEngine,
    bet: i64,
    input: &mut R,
    output: &mut W,
    rng: &mut G,
) -> io::Result<SessionEnd>
where
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    writeln!(output, "{}", banner())?;
    writeln!(output, "\nStarting Balance: ${}", engine.balance())?;
    writeln!(output, "\nPress ENTER to SPIN... (bet = ${bet})")?;
    writeln!(output, "Type 'quit' to exit\n")?;

    let mut line = String::new();
    while engine.balance() > 0 {
        write!(output, ">>> ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(SessionEnd::InputClosed {
                balance: engine.balance(),
            });
        }

        match parse_command(&line) {
            Command::Quit => {
                writeln!(output, "\nFinal Balance: ${}", engine.balance())?;
                writeln!(output, "Thanks for playing!")?;
                return Ok(SessionEnd::Quit {
                    balance: engine.balance(),
                });
            }
            Command::Ignore => continue,
            Command::Spin => {}
        }

        if !engine.place_bet(bet) {
            writeln!(output, "Not enough balance!")?;
            continue;
        }

        writeln!(output, "\nSPINNING...")?;
        let reels = engine.spin_with(rng);
        writeln!(output, "\n\n{}\n", render_reels(&reels))?;

        let [a, b, c] = reels;
        let winnings = engine.check_win(a, b, c);
        if winnings > 0 {
            engine.add_winnings(winnings);
            writeln!(output, "*** YOU WIN ${winnings}!!! ***\n")?;
        } else {
            writeln!(output, "SORRY... BETTER LUCK NEXT TIME!\n")?;
        }

        writeln!(output, "Balance: ${}", engine.balance())?;
    }

    writeln!(output, "\nGAME OVER - NO BALANCE LEFT!")?;
    Ok(SessionEnd::GameOver)
}

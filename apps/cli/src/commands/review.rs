//! Interactive review loop.
//!
//! Input is read one line per key: an empty line (or a space) is the space
//! bar, `n` or the right-arrow escape sequence skips, `r` repeats later, `f`
//! forgets and `q` closes the session.

use crate::state::AppState;
use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::{BufRead, Write};
use std::sync::Arc;
use vocab_core::{
    command_for, practice_cards, CardStore, Clock, Key, Progress, ReviewMode, ReviewSession,
};

const HELP: &str = "keys: enter = flip / remember, n = skip, r = repeat later, f = forget, q = quit";
const ARROW_RIGHT: &str = "\u{1b}[C";

/// Review due cards (or practice every learning card) interactively.
pub async fn review<I, W>(
    state: &AppState,
    practice: bool,
    seed: Option<u64>,
    input: I,
    out: &mut W,
) -> Result<Progress>
where
    I: BufRead,
    W: Write,
{
    let mode = if practice {
        ReviewMode::Practice
    } else {
        state.config.mode
    };

    let cards = match mode {
        ReviewMode::Srs => state.store.get_due_cards(state.clock.today())?,
        ReviewMode::Practice => practice_cards(state.store.list_cards()?),
    };

    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut session = ReviewSession::start(
        cards,
        mode,
        state.config.intervals,
        Arc::clone(&state.store),
        Arc::clone(&state.clock),
        rng,
    );

    if session.total() == 0 {
        writeln!(out, "nothing to review")?;
        return Ok(session.progress());
    }

    writeln!(
        out,
        "{} review: {} cards",
        session.mode().as_str(),
        session.total()
    )?;
    writeln!(out, "{HELP}")?;
    drive(&mut session, input, out).await
}

/// Feed keys from `input` into `session` until it is closed or input ends.
pub async fn drive<S, C, R, I, W>(
    session: &mut ReviewSession<S, C, R>,
    input: I,
    out: &mut W,
) -> Result<Progress>
where
    S: CardStore,
    C: Clock,
    R: Rng + Send,
    I: BufRead,
    W: Write,
{
    let mut lines = input.lines();

    loop {
        if session.is_completed() {
            print_summary(out, &session.progress())?;
            write!(out, "review again? [y/N] ")?;
            out.flush()?;

            let again = match lines.next() {
                Some(line) => line?.trim().eq_ignore_ascii_case("y"),
                None => false,
            };
            if !again {
                break;
            }
            session.restart();
            continue;
        }

        render_card(out, session)?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        if line.trim() == "q" {
            break;
        }

        let command = parse_key(&line)
            .and_then(|key| command_for(key, session.is_revealed(), session.is_completed()));
        let Some(command) = command else {
            writeln!(out, "{HELP}")?;
            continue;
        };

        if let Err(e) = session.apply(command).await {
            writeln!(out, "could not save card: {e}; press the key again to retry")?;
        }
    }

    Ok(session.progress())
}

/// Translate one input line into a key.
pub fn parse_key(line: &str) -> Option<Key> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() || line == " " {
        return Some(Key::Space);
    }
    if line == ARROW_RIGHT || line.trim() == "n" {
        return Some(Key::ArrowRight);
    }

    let mut chars = line.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(Key::Char(c)),
        _ => None,
    }
}

fn render_card<S, C, R, W>(out: &mut W, session: &ReviewSession<S, C, R>) -> Result<()>
where
    S: CardStore,
    C: Clock,
    R: Rng + Send,
    W: Write,
{
    let Some(card) = session.current_card() else {
        return Ok(());
    };
    let progress = session.progress();

    writeln!(out, "[{}/{}] {}", progress.cursor + 1, progress.total, card.word)?;
    if progress.revealed {
        writeln!(out, "    {}  ({})", card.meaning, card.review_status.label())?;
    }
    Ok(())
}

fn print_summary<W: Write>(out: &mut W, progress: &Progress) -> Result<()> {
    writeln!(
        out,
        "done: {} remembered, {} forgotten, {} skipped",
        progress.remembered, progress.forgotten, progress.skipped
    )?;
    Ok(())
}

//! `Lectern` - interactive Bible reader on the command line.
//!
//! Reads one command per line from standard input:
//!
//! - `REFERENCE` or `goto REFERENCE` jumps to a verse
//! - `find KEY`, `next` search and step through matches
//! - `back`, `forward` walk the history
//! - `book+`, `book-`, `chapter+`, `chapter-`, `verse+`, `verse-` step
//! - `mode NAME`, `case on|off`, `scope FIRST LAST|all` adjust new searches
//! - `quit` exits

use std::io::{self, BufRead, Write};

use anyhow::Context;
use lectern::bible::books::lookup_book;
use lectern::bible::position::Scope;
use lectern::config::Config;
use lectern::corpus::{Bible, Case};
use lectern::services::search::{SearchMode, SearchRequest};
use lectern::session::Session;

/// Settings applied to each new search.
struct SearchDefaults {
    mode: SearchMode,
    case: Case,
    scope: Scope,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("lectern=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = Config::load()?;
    tracing::info!("{} {}", config.app_name(), config.app_version());

    let bible = Bible::load(&config.corpus_path)
        .with_context(|| format!("Failed to load corpus from {}", config.corpus_path.display()))?;
    let mut defaults = SearchDefaults {
        mode: config.search_mode,
        case: config.match_case,
        scope: bible.model.whole(),
    };
    let mut session = Session::from_config(&bible, &config);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    show(&mut stdout, &session)?;
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "q" | "quit" | "exit") {
            break;
        }
        run_command(&mut session, &bible, &mut defaults, line);
        show(&mut stdout, &session)?;
    }
    Ok(())
}

fn run_command(session: &mut Session<'_>, bible: &Bible, defaults: &mut SearchDefaults, line: &str) {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    // Failures are already on the status line; the results are not needed here.
    match command {
        "goto" | "g" => {
            let _ = session.goto(rest);
        }
        "find" | "f" => {
            let request = SearchRequest::new(rest, defaults.mode, defaults.case, defaults.scope);
            let _ = session.find(request);
        }
        "next" | "n" => {
            let _ = session.find_next();
        }
        "back" | "b" => {
            let _ = session.back();
        }
        "forward" | "fw" => {
            let _ = session.forward();
        }
        "book+" => {
            let _ = session.later_book();
        }
        "book-" => {
            let _ = session.earlier_book();
        }
        "chapter+" => {
            let _ = session.later_chapter();
        }
        "chapter-" => {
            let _ = session.earlier_chapter();
        }
        "verse+" => {
            let _ = session.next_verse();
        }
        "verse-" => {
            let _ = session.previous_verse();
        }
        "mode" => match rest.parse() {
            Ok(mode) => defaults.mode = mode,
            Err(e) => eprintln!("{e}"),
        },
        "case" => {
            defaults.case = if matches!(rest, "on" | "sensitive") {
                Case::Sensitive
            } else {
                Case::Insensitive
            };
        }
        "scope" => match parse_scope(bible, rest) {
            Some(scope) => defaults.scope = scope,
            None => eprintln!("Unknown scope {rest:?}"),
        },
        _ => {
            let _ = session.goto(line);
        }
    }
}

/// `all`, or a first and last book name.
fn parse_scope(bible: &Bible, text: &str) -> Option<Scope> {
    if text == "all" {
        return Some(bible.model.whole());
    }
    let (first, last) = text.split_once(' ').unwrap_or((text, text));
    let first = lookup_book(first.trim())?;
    let last = lookup_book(last.trim())?;
    bible.model.book_range_to_position_range(first, last).ok()
}

fn show(out: &mut impl Write, session: &Session<'_>) -> io::Result<()> {
    writeln!(out, "{}", session.status_message())?;
    writeln!(out, "{}", session.verse_text())?;
    if let Some(highlight) = session.highlight() {
        writeln!(out, "{}{}", " ".repeat(highlight.start), "^".repeat(highlight.len.max(1)))?;
    }
    out.flush()
}

//! `-i` mode: one question per stdin line, answered in the same [`Session`] so
//! follow-ups like "그럼 월차는?" see the earlier turns.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use cli::Session;

use crate::Output;

enum Input {
    Blank,
    Quit,
    Question(String),
}

fn classify(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Blank;
    }
    match line.to_lowercase().as_str() {
        "quit" | "exit" | "/quit" | "종료" => Input::Quit,
        _ => Input::Question(line.to_string()),
    }
}

/// Reads until EOF or a quit word. Turn failures go to stderr and do not end the loop.
pub async fn run_repl_loop(
    session: &mut Session,
    output: &Output,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = match classify(&line) {
            Input::Blank => continue,
            Input::Quit => break,
            Input::Question(q) => q,
        };
        match output.ask(session, &question).await {
            Ok(outcome) => output.print(&outcome)?,
            Err(e) => eprintln!("error: {}", e),
        }
    }
    Ok(())
}

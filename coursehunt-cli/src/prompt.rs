//! Cancellable stdin prompts.
//!
//! Reads run on a blocking thread so Ctrl-C (delivered through the
//! cancellation token) interrupts a pending prompt instead of hanging the
//! command.

use std::io::Write;

use coursehunt_engine::CancelToken;
use tokio::task;

/// A y/n/q answer to a review question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Accept.
    Yes,
    /// Skip.
    No,
    /// Stop reviewing.
    Quit,
}

/// Asks one question and reads a trimmed line.
///
/// Returns `None` on EOF or cancellation; callers treat that as "stop
/// here and save what we have".
pub async fn ask(question: &str, cancel: &CancelToken) -> Option<String> {
    print!("{question} ");
    std::io::stdout().flush().ok();

    let mut cancel = cancel.clone();
    let read = task::spawn_blocking(|| {
        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    });

    tokio::select! {
        () = cancel.cancelled() => None,
        result = read => result.ok().flatten(),
    }
}

/// Asks until the answer is non-empty.
pub async fn ask_nonempty(question: &str, cancel: &CancelToken) -> Option<String> {
    loop {
        let answer = ask(question, cancel).await?;
        if !answer.is_empty() {
            return Some(answer);
        }
    }
}

/// Asks a y/n/q question until one of the three is given.
pub async fn confirm(question: &str, cancel: &CancelToken) -> Option<Choice> {
    loop {
        match ask(question, cancel).await?.to_lowercase().as_str() {
            "y" => return Some(Choice::Yes),
            "n" => return Some(Choice::No),
            "q" => return Some(Choice::Quit),
            _ => {}
        }
    }
}

use std::io::{self, BufRead, IsTerminal, Read, Write};

pub fn interactive() -> bool {
    io::stdin().is_terminal()
}

/// Asks one line from the terminal. Returns `None` when stdin is not a
/// terminal so scripted runs never block.
pub fn ask(question: &str) -> io::Result<Option<String>> {
    if !interactive() {
        return Ok(None);
    }
    print!("{question}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(Some(line.trim().to_string()))
}

pub fn confirm(question: &str) -> io::Result<bool> {
    let answer = ask(&format!("{question} [y/N]: "))?;
    Ok(answer.as_deref().is_some_and(is_yes))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Uses the reason given on the command line, or reads all of stdin.
pub fn read_reason(given: Option<String>) -> io::Result<String> {
    if let Some(reason) = given {
        return Ok(reason);
    }
    if interactive() {
        println!("Reason for leaving (finish with Ctrl-D):");
    }
    let mut reason = String::new();
    io::stdin().read_to_string(&mut reason)?;
    Ok(reason)
}

#[cfg(test)]
mod tests {
    use super::is_yes;

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yeah"));
    }
}

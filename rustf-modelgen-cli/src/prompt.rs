//! Interactive prompts on stdin/stdout

use rustf_modelgen::prompt::{AmbiguityResolver, PrefixConfirmer};
use rustf_modelgen::GeneratorError;
use std::io::{self, Stdin, Stdout, Write};

/// Asks the user on the terminal
///
/// Stdin is locked per question, so a confirmer and a resolver can be live
/// in the same run.
pub struct TerminalPrompter {
    input: Stdin,
    output: Stdout,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            input: io::stdin(),
            output: io::stdout(),
        }
    }

    /// Print `question` and read one line; `None` once input is closed
    fn ask(&self, question: &str) -> io::Result<Option<String>> {
        {
            let mut out = self.output.lock();
            write!(out, "{}", question)?;
            out.flush()?;
        }

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

/// `y` / `yes` in any case
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Map a 1-based number to its candidate; anything else is returned as typed
pub fn choice(answer: &str, candidates: &[&str]) -> String {
    let answer = answer.trim();
    match answer.parse::<usize>() {
        Ok(n) if n >= 1 && n <= candidates.len() => candidates[n - 1].to_string(),
        _ => answer.to_string(),
    }
}

impl PrefixConfirmer for TerminalPrompter {
    fn confirm(&mut self, candidate: &str, tables: &[&str]) -> bool {
        println!();
        println!(
            "🔎 {} tables share the prefix '{}': {}",
            tables.len(),
            candidate,
            tables.join(", ")
        );
        match self.ask(&format!("Strip '{}' from model names? [y/N] ", candidate)) {
            Ok(Some(answer)) => is_affirmative(&answer),
            Ok(None) => false,
            Err(e) => {
                log::warn!("Could not read answer: {}", e);
                false
            }
        }
    }
}

impl AmbiguityResolver for TerminalPrompter {
    fn resolve(&mut self, column: &str, candidates: &[&str]) -> rustf_modelgen::Result<String> {
        println!();
        println!("🔗 Several tables match column '{}':", column);
        for (i, candidate) in candidates.iter().enumerate() {
            println!("  {}. {}", i + 1, candidate);
        }

        match self.ask("Related table (number or name): ")? {
            Some(answer) => Ok(choice(&answer, candidates)),
            None => Err(GeneratorError::Resolution {
                column: column.to_string(),
                reason: "input closed".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative(" YES "));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("no"));
    }

    #[test]
    fn test_choice_by_number_or_name() {
        let candidates = ["forum_posts", "blog_posts"];
        assert_eq!(choice("2", &candidates), "blog_posts");
        assert_eq!(choice(" forum_posts ", &candidates), "forum_posts");
        assert_eq!(choice("3", &candidates), "3");
        assert_eq!(choice("0", &candidates), "0");
    }
}

use owo_colors::OwoColorize;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "Corrector".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!("{}", "Proofreads the articles behind the links it receives\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.bright_red());
}

/// Mask all but the bot id of a token for display
pub fn mask_token(token: &str) -> String {
    match token.split_once(':') {
        Some((id, secret)) => format!("{}:{}", id, "*".repeat(secret.len().min(8))),
        None => "*".repeat(token.len().min(8)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("123456:ABCdefGHIjkl"), "123456:********");
        assert_eq!(mask_token("123:ab"), "123:**");
        assert_eq!(mask_token("secret"), "******");
    }
}

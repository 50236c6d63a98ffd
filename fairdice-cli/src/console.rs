use crate::render;
use dialoguer::Input;
use fairdice_core::{Console, GameError, MenuOption, ProbabilityTable, Result};

/// Console backed by stdin/stdout. Prompts repeat until a listed key is
/// entered.
#[derive(Debug, Default)]
pub struct TerminalConsole;

impl TerminalConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Console for TerminalConsole {
    fn prompt_choice(&mut self, options: &[MenuOption], prompt: &str) -> Result<String> {
        println!("{}", format_menu(options));

        let keys: Vec<&str> = options.iter().map(|o| o.key.as_str()).collect();
        let input: String = Input::new()
            .with_prompt(prompt)
            .validate_with(|input: &String| -> std::result::Result<(), String> {
                match match_option(options, input) {
                    Some(_) => Ok(()),
                    None => Err(format!("Choose one of: {}", keys.join(", "))),
                }
            })
            .interact_text()
            .map_err(|e| GameError::dialog(e.to_string()))?;

        match_option(options, &input)
            .map(|o| o.key.clone())
            .ok_or_else(|| GameError::dialog(format!("Unexpected input '{}'", input)))
    }

    fn display(&mut self, text: &str) -> Result<()> {
        println!("{}", text);
        Ok(())
    }

    fn display_probabilities(&mut self, table: &ProbabilityTable) -> Result<()> {
        println!("{}", table.title());
        println!("{}", render::probability_table(table));
        Ok(())
    }
}

fn format_menu(options: &[MenuOption]) -> String {
    options
        .iter()
        .map(|o| format!("{} - {}", o.key, o.label))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keys are matched case-insensitively, so `x` quits too.
fn match_option<'a>(options: &'a [MenuOption], input: &str) -> Option<&'a MenuOption> {
    options
        .iter()
        .find(|o| o.key.eq_ignore_ascii_case(input.trim()))
}

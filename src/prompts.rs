//! Prompts for LLM-based bank statement parsing.
//!
//! The system/user pair is fixed. Callers can override only the system
//! instruction via [`crate::config::RelayConfig::system_prompt`]; the user
//! message always embeds the statement text and the requested JSON shape.

/// Default system prompt sent ahead of the statement text.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a bank statement parser. Extract transactions into JSON.";

/// The JSON shape the model is asked to return.
///
/// Nothing checks the reply against it.
pub const TRANSACTION_FORMAT: &str = r#"[
  {"date": "DD/MM/YYYY", "description": "text", "amount": number, "type": "debit/credit"}
]"#;

/// Build the user message embedding the extracted statement text.
pub fn statement_prompt(statement_text: &str) -> String {
    format!(
        "\nHere is bank statement text:\n\n{statement_text}\n\n\
         Return ONLY valid JSON in this format:\n{TRANSACTION_FORMAT}\n"
    )
}

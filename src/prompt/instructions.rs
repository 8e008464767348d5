//! Instruction texts appended to prompts.

use genie_common::OutputSpec;

pub const README_INSTRUCTION: &str = "Write A Readme for the code. The Readme should include a brief \
summary of the code (including structures, features), the tech stack (Languages, Frameworks, \
Technologies), information about how to install dependencies, how to run the project locally, any \
configuration settings that need to be adjusted, instructions for testing, contributing guidelines, \
and licensing information. Make sure the format doesn't have any errors, especially the \
installation part.";

/// Appended to every chunk on the long path.
pub const SUMMARIZATION_INSTRUCTION: &str =
    "write a short summary like in 100 words summary of code and the languages used here.";

/// Prepended to the output instruction for the synthesis call.
pub const FINAL_PREFIX: &str = "Here are the snippets of different parts of the code. ";

/// The instruction that produces the requested output.
pub fn instruction_for(output: &OutputSpec) -> String {
    match output {
        OutputSpec::Readme => README_INSTRUCTION.to_string(),
        OutputSpec::Bullets(count) => format!(
            "Explain the code in {} bullet points to write on resume and an extra line explaining the tech stack",
            count
        ),
        OutputSpec::Custom(text) => text.clone(),
    }
}

/// The instruction for the synthesis call over concatenated chunk summaries.
pub fn final_instruction_for(output: &OutputSpec) -> String {
    format!("{}{}", FINAL_PREFIX, instruction_for(output))
}

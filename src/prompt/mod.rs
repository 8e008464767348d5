//! Prompt assembly.
//!
//! A prompt is a dump of every fetched file followed by one instruction.
//! Each file is written as its JSON-quoted path, its JSON-quoted content and
//! a newline, so file boundaries survive even when the dump is later split
//! into parts.

mod instructions;

pub use instructions::{
    FINAL_PREFIX, README_INSTRUCTION, SUMMARIZATION_INSTRUCTION, final_instruction_for,
    instruction_for,
};

use genie_common::FileRecord;

/// A prompt ready for classification: file dump plus trailing instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPrompt {
    dump: String,
    instruction: String,
}

impl AssembledPrompt {
    pub fn assemble(files: &[FileRecord], instruction: impl Into<String>) -> Self {
        Self {
            dump: serialize_files(files),
            instruction: instruction.into(),
        }
    }

    /// The serialized files, without the instruction.
    pub fn dump(&self) -> &str {
        &self.dump
    }

    /// Full prompt text: dump followed by instruction.
    pub fn text(&self) -> String {
        let mut text = String::with_capacity(self.dump.len() + self.instruction.len());
        text.push_str(&self.dump);
        text.push_str(&self.instruction);
        text
    }

    /// Length of [`Self::text`] in characters.
    pub fn len_chars(&self) -> usize {
        self.dump_chars() + self.instruction.chars().count()
    }

    /// Length of [`Self::dump`] in characters.
    pub fn dump_chars(&self) -> usize {
        self.dump.chars().count()
    }
}

/// Serialize files in order as `"path""content"\n` lines.
pub fn serialize_files(files: &[FileRecord]) -> String {
    let mut out = String::new();
    for file in files {
        out.push_str(&json_quote(&file.path));
        out.push_str(&json_quote(&file.content));
        out.push('\n');
    }
    out
}

fn json_quote(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

//! Output formatting utilities for the CLI.

use serde::Serialize;

/// A command result that can be printed for people or as JSON.
pub trait CommandOutput: Serialize {
    /// Plain-text rendering.
    fn to_human(&self) -> String;

    /// JSON rendering, the serialized value by default.
    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Print a command result in the requested format.
pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    println!("{}", render(result, json_mode));
}

/// Render a command result without printing it.
pub fn render<T: CommandOutput>(result: &T, json_mode: bool) -> String {
    if json_mode {
        serde_json::to_string_pretty(&result.to_json()).unwrap_or_default()
    } else {
        result.to_human()
    }
}

//! Subcommand implementations.

pub mod catalog;
pub mod migrate;
pub mod state;

use bozor_storefront::Result;
use serde::Serialize;

/// How command results are printed.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

impl Output {
    /// Print `value` as pretty JSON, or the text produced by `text`.
    pub fn emit<T, F>(self, value: &T, text: F) -> Result<()>
    where
        T: Serialize + ?Sized,
        F: FnOnce() -> String,
    {
        let rendered = if self.json {
            serde_json::to_string_pretty(value)?
        } else {
            text()
        };

        #[allow(clippy::print_stdout)]
        {
            println!("{rendered}");
        }
        Ok(())
    }
}

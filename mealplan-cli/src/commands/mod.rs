//! CLI command implementations

pub mod generate;
pub mod parse;
pub mod render;
pub mod secrets;

pub use generate::GenerateArgs;
pub use parse::ParseArgs;
pub use render::RenderArgs;
pub use secrets::SecretsArgs;

use std::io::Read;
use std::path::Path;

/// Read a text input file, with `-` meaning stdin
pub fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))
}

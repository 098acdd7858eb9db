/*!
Where the CLI reads from and writes to: a named file, or stdio for `-`
*/

use anyhow::Context;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    pub fn read_bytes(&self) -> anyhow::Result<Vec<u8>> {
        match self {
            Self::Stdin => {
                let mut buffer = Vec::new();
                std::io::stdin()
                    .read_to_end(&mut buffer)
                    .context("Failed to read stdin")?;
                Ok(buffer)
            }
            Self::File(path) => {
                std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
            }
        }
    }

    pub fn read_text(&self) -> anyhow::Result<String> {
        String::from_utf8(self.read_bytes()?).context("Input is not valid UTF-8")
    }
}

impl FromStr for Input {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "-" => Self::Stdin,
            path => Self::File(path.into()),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub enum Output {
    #[default]
    Stdout,
    File(PathBuf),
}

impl Output {
    pub fn is_stdout(&self) -> bool {
        matches!(self, Self::Stdout)
    }

    pub fn write(&self, data: &[u8]) -> anyhow::Result<()> {
        match self {
            Self::Stdout => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(data)?;
                stdout.flush().context("Failed to write stdout")
            }
            Self::File(path) => std::fs::write(path, data)
                .with_context(|| format!("Failed to write {}", path.display())),
        }
    }

    /// Text goes to stdout with a trailing newline, files get it verbatim
    pub fn write_text(&self, text: &str) -> anyhow::Result<()> {
        if self.is_stdout() {
            self.write(format!("{text}\n").as_bytes())
        } else {
            self.write(text.as_bytes())
        }
    }
}

impl FromStr for Output {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "" | "-" => Self::Stdout,
            path => Self::File(path.into()),
        })
    }
}

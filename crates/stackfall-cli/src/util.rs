use std::{
    fs::{self, File},
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use stackfall_engine::BoardConfig;

pub fn read_board_config(path: &Path) -> anyhow::Result<BoardConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read board config: {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse board config: {}", path.display()))?;
    Ok(config)
}

/// Destination of a command's report, stdout unless a path is given.
#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn from_output_path(output_path: Option<&Path>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path: path.to_owned(),
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_owned(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    /// Writes `value` as pretty JSON followed by a newline.
    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        self.write_line("")
    }

    /// Writes `value` as one line of compact JSON.
    pub fn write_json_line<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        self.write_line("")
    }

    pub fn write_line(&mut self, line: &str) -> anyhow::Result<()> {
        writeln!(&mut *self, "{line}")
            .with_context(|| format!("Failed to write to {}", self.display_path()))?;
        Ok(())
    }

    pub fn finish(mut self) -> anyhow::Result<()> {
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    #[test]
    fn test_read_board_config_fills_defaults() {
        let path = env::temp_dir().join(format!("stackfall-config-{}.json", std::process::id()));
        fs::write(&path, r#"{"height": 20}"#).unwrap();
        let config = read_board_config(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(
            config,
            BoardConfig {
                height: 20,
                ..BoardConfig::default()
            }
        );
    }

    #[test]
    fn test_read_board_config_reports_path() {
        let path = Path::new("/nonexistent/stackfall.json");
        let err = read_board_config(path).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/stackfall.json"));
    }
}

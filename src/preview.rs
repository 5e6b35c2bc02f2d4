//! Formatter preview: pipe a code sample through `clang-format` using a
//! draft style.

use crate::config::StyleConfig;
use crate::error::{Error, Result};
use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use tracing::debug;

pub const DEFAULT_FORMATTER: &str = "clang-format";

pub const SAMPLE_CODE: &str = r#"#include <iostream>
#include <string>
#include <vector>

namespace Example {
class FormatDemo {
public:
  FormatDemo(int value, const std::string& name) : m_value(value), m_name(name) {}

  void processData() {
    if (m_value > 0) {
      std::vector<int> numbers = {1, 2, 3, 4, 5};
      for (const auto& num : numbers) {
        if (num % 2 == 0) { std::cout << num << " is even" << std::endl; }
        else { std::cout << num << " is odd" << std::endl; }
      }
    }
  }

  template<typename T> bool compare(const T& a, const T& b) { return a < b; }

private:
  int m_value;
  std::string m_name;
};

enum class Status { Pending, InProgress, Completed, Failed };

struct Configuration {
  bool enableLogging = true;
  int maxRetries = 3;
  std::string outputPath = "/tmp/output";
};
}
"#;

pub struct PreviewOptions {
    /// Formatter executable.
    pub program: String,
    /// File name clang-format uses to pick the language.
    pub assume_filename: String,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            program: DEFAULT_FORMATTER.to_string(),
            assume_filename: "sample.cpp".to_string(),
        }
    }
}

fn formatter_error(options: &PreviewOptions, reason: impl Into<String>) -> Error {
    Error::Formatter {
        program: options.program.clone(),
        reason: reason.into(),
    }
}

/// Format `sample` with the draft `style`, returning the formatter's output.
pub fn run(options: &PreviewOptions, style: &StyleConfig, sample: &str) -> Result<String> {
    let style_arg = format!("--style={}", style.to_inline()?);
    debug!(program = %options.program, style = %style_arg, "running formatter");

    let mut child = Command::new(&options.program)
        .arg(&style_arg)
        .arg(format!("--assume-filename={}", options.assume_filename))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| match err.kind() {
            ErrorKind::NotFound => formatter_error(options, "executable not found"),
            _ => formatter_error(options, err.to_string()),
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        match stdin.write_all(sample.as_bytes()) {
            // Exited before reading everything; the exit status decides.
            Err(err) if err.kind() == ErrorKind::BrokenPipe => {}
            Err(err) => return Err(formatter_error(options, err.to_string())),
            Ok(()) => {}
        }
    }

    let output = child
        .wait_with_output()
        .map_err(|err| formatter_error(options, err.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(formatter_error(options, stderr.trim().to_string()));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

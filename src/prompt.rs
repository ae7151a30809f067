use std::io::{self, BufRead, Write};

/// Line-input seam for everything interactive, so the selection state
/// machine and the filename resolver are testable without a terminal.
pub trait Prompter {
    /// Show `label` with `default` pre-rendered and read one trimmed line.
    /// End of input reads as an empty line (accept the default).
    fn ask(&mut self, label: &str, default: &str) -> io::Result<String>;
}

/// Real terminal prompter. The default is printed after the label, then the
/// carriage return puts the cursor back so anything typed overwrites it.
pub struct TermPrompter;

impl Prompter for TermPrompter {
    fn ask(&mut self, label: &str, default: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{label}{default}\r{label}")?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}

#[cfg(test)]
pub mod testing {
    use super::Prompter;
    use std::collections::VecDeque;
    use std::io;

    /// Feeds a fixed script of answers; records every label it was shown.
    pub struct ScriptedPrompter {
        answers: VecDeque<String>,
        pub labels: Vec<String>,
    }

    impl ScriptedPrompter {
        pub fn new<const N: usize>(answers: [&str; N]) -> Self {
            Self {
                answers: answers.iter().map(|s| s.to_string()).collect(),
                labels: Vec::new(),
            }
        }

        pub fn exhausted(&self) -> bool {
            self.answers.is_empty()
        }
    }

    impl Prompter for ScriptedPrompter {
        fn ask(&mut self, label: &str, _default: &str) -> io::Result<String> {
            self.labels.push(label.to_string());
            // Past the end of the script, keep answering "accept default".
            Ok(self.answers.pop_front().unwrap_or_default())
        }
    }
}

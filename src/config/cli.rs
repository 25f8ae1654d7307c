use crate::config::PartialConnection;
use crate::core::navigator::FileNavigator;
use crate::core::seed::DEFAULT_DB_PATH;
use crate::domain::model::{ConnectionSettings, DbKind};
use crate::utils::error::{BrowserError, Result};
use crate::utils::validation::validate_port;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Line-based prompts over any reader/writer pair (stdin/stdout in the binary).
pub struct Prompter<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// Reads one trimmed line; `None` at end of input.
    pub fn read_line(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{} ", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompt with a default; an empty answer keeps the default.
    pub fn ask(&mut self, label: &str, default: &str) -> Result<String> {
        let prompt = if default.is_empty() {
            format!("{}:", label)
        } else {
            format!("{} [{}]:", label, default)
        };
        match self.read_line(&prompt)? {
            Some(answer) if !answer.is_empty() => Ok(answer),
            Some(_) => Ok(default.to_string()),
            None => Err(end_of_input()),
        }
    }

    /// Numbered menu; returns the chosen index. Re-asks on invalid input.
    pub fn choose(&mut self, label: &str, options: &[&str]) -> Result<usize> {
        self.say(label)?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}) {}", i + 1, option)?;
        }
        loop {
            let answer = self.read_line(">")?.ok_or_else(end_of_input)?;
            if answer.is_empty() {
                return Ok(0);
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(n - 1),
                _ => {
                    if let Some(i) = options.iter().position(|o| o.eq_ignore_ascii_case(&answer)) {
                        return Ok(i);
                    }
                    self.say(&format!("Please enter 1-{}", options.len()))?;
                }
            }
        }
    }
}

fn end_of_input() -> BrowserError {
    BrowserError::config("input closed before the connection was configured")
}

/// Fills the gaps in `partial` by asking the user.
pub fn prompt_connection<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    partial: &PartialConnection,
) -> Result<ConnectionSettings> {
    if let Some(settings) = partial.complete() {
        if !(partial.browse && settings.kind.is_file_based()) {
            return Ok(settings);
        }
    }

    prompter.say("🔌 Connection Settings")?;
    let kind = match partial.kind {
        Some(kind) => kind,
        None => {
            let names: Vec<&str> = DbKind::ALL.iter().map(|k| k.display_name()).collect();
            DbKind::ALL[prompter.choose("Database Type", &names)?]
        }
    };

    if kind.is_file_based() {
        let path = if partial.browse {
            browse_for_file(prompter, FileNavigator::from_current_dir()?)?
        } else {
            match prompter.choose("Select Database", &["Enter Path", "Browse Files"])? {
                0 => PathBuf::from(prompter.ask(
                    "Database File Path",
                    partial.path.as_deref().unwrap_or(DEFAULT_DB_PATH),
                )?),
                _ => browse_for_file(prompter, FileNavigator::from_current_dir()?)?,
            }
        };
        return Ok(ConnectionSettings::sqlite(path.to_string_lossy()));
    }

    let defaults = ConnectionSettings::server(kind, "");
    let host = prompter.ask("Host", partial.host.as_deref().unwrap_or(&defaults.host))?;
    let port = loop {
        let default_port = partial.port.unwrap_or(defaults.port).to_string();
        let answer = prompter.ask("Port", &default_port)?;
        match validate_port("port", &answer) {
            Ok(port) => break port,
            Err(e) => prompter.say(&e.user_friendly_message())?,
        }
    };
    let user = prompter.ask("Username", partial.user.as_deref().unwrap_or(&defaults.user))?;
    let password = match &partial.password {
        Some(password) => password.clone(),
        None => prompter.ask("Password", "")?,
    };
    let database = loop {
        let answer = prompter.ask("Database Name", partial.database.as_deref().unwrap_or(""))?;
        if !answer.is_empty() {
            break answer;
        }
        prompter.say("Database name is required")?;
    };

    Ok(ConnectionSettings {
        kind,
        host,
        port,
        user,
        password,
        database,
    })
}

/// Navigator loop: `..` goes up, a folder name enters it, a listed file is selected.
pub fn browse_for_file<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    mut navigator: FileNavigator,
) -> Result<PathBuf> {
    loop {
        prompter.say(&format!("Current Dir: {}", navigator.cwd().display()))?;

        let listing = match navigator.listing() {
            Ok(listing) => listing,
            Err(e @ BrowserError::PermissionDenied { .. }) => {
                prompter.say(&format!("❌ {}", e.user_friendly_message()))?;
                navigator.up();
                continue;
            }
            Err(e) => return Err(e),
        };

        prompter.say("  ..  (parent folder)")?;
        for dir in &listing.dirs {
            prompter.say(&format!("  {}/", dir))?;
        }
        for file in &listing.db_files {
            prompter.say(&format!("  {}", file))?;
        }
        if listing.db_files.is_empty() {
            prompter.say("  (no database files here)")?;
        }

        let answer = prompter
            .read_line("Go to folder or select file:")?
            .ok_or_else(end_of_input)?;
        let answer = answer.trim_end_matches('/');

        if answer.is_empty() {
            continue;
        }
        if answer == ".." {
            navigator.up();
        } else if listing.dirs.iter().any(|d| d == answer) {
            navigator.enter(answer)?;
        } else if listing.db_files.iter().any(|f| f == answer) {
            return navigator.select(answer);
        } else {
            prompter.say(&format!("'{}' is not listed here", answer))?;
        }
    }
}

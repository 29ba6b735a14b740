//! Script commands driving a [Session].
//!
//! Every command lives in the `qrencode` namespace and takes a fixed number of words:
//!
//! ```text
//! qrencode::setlevel 2
//! qrencode::setfiletype svg
//! qrencode::encode "Hello, World!" hello.svg
//! ```

use crate::settings::SettingsError;
use crate::{Error, Session};

pub const NAMESPACE: &str = "qrencode";

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("invalid command name \"{0}\"")]
    UnknownCommand(String),
    #[error("wrong # args: should be \"{name} {usage}\"")]
    WrongArgs { name: String, usage: &'static str },
    #[error("expected integer but got \"{0}\"")]
    NotAnInteger(String),
    #[error("{0} needs a non-empty argument")]
    EmptyArgument(String),
    #[error("missing close-quote or close-brace")]
    Unbalanced,
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Session(#[from] Error),
    #[error("line {line}: {source}")]
    Script {
        line: usize,
        #[source]
        source: Box<CommandError>,
    },
}

type Handler = fn(&Session, &[&str]) -> Result<(), CommandError>;

/// A command of the table.
pub struct Command {
    name: &'static str,
    usage: &'static str,
    handler: Handler,
}

impl Command {
    /// Get the name of the command, without namespace.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get the words the command expects after its name.
    pub fn usage(&self) -> &'static str {
        self.usage
    }

    fn arity(&self) -> usize {
        self.usage.split_whitespace().count()
    }

    fn qualified_name(&self) -> String {
        format!("{NAMESPACE}::{}", self.name)
    }
}

/// Command for a setter taking an integer and accepting any value.
macro_rules! int_setter {
    ($name:literal, $usage:literal, $setter:ident) => {
        Command {
            name: $name,
            usage: $usage,
            handler: |session, args| {
                let value = parse_int(args[0])?;
                session.update(|settings| settings.$setter(value));
                Ok(())
            },
        }
    };
}

static COMMANDS: &[Command] = &[
    int_setter!("set8bit_mode", "setup_8bit_mode", set_eight_bit),
    int_setter!("setcasesensitive", "casesensitive", set_case_sensitive),
    int_setter!("setkanji", "setup_kanji_mode", set_kanji),
    int_setter!("setmicro", "micro", set_micro),
    int_setter!("setstructured", "structured", set_structured),
    int_setter!("setrle", "rle", set_rle),
    int_setter!("setdpi", "dpi", set_dpi),
    int_setter!("setlevel", "level", set_level),
    Command {
        name: "setsize",
        usage: "size",
        handler: |session, args| {
            let size = parse_int(args[0])?;
            Ok(session.update(|settings| settings.set_size(size))?)
        },
    },
    Command {
        name: "setversion",
        usage: "version",
        handler: |session, args| {
            let version = parse_int(args[0])?;
            Ok(session.update(|settings| settings.set_version(version))?)
        },
    },
    Command {
        name: "setfiletype",
        usage: "filetype",
        handler: |session, args| {
            let name = non_empty("setfiletype", args[0])?;
            session.update(|settings| settings.set_file_type(name));
            Ok(())
        },
    },
    Command {
        name: "setforeground",
        usage: "foreground",
        handler: |session, args| {
            let color = non_empty("setforeground", args[0])?;
            Ok(session.update(|settings| settings.set_foreground(color))?)
        },
    },
    Command {
        name: "setbackground",
        usage: "background",
        handler: |session, args| {
            let color = non_empty("setbackground", args[0])?;
            Ok(session.update(|settings| settings.set_background(color))?)
        },
    },
    Command {
        name: "encode",
        usage: "string filename",
        handler: |session, args| {
            session.encode(args[0], args[1])?;
            Ok(())
        },
    },
];

/// Get the command table.
pub fn commands() -> &'static [Command] {
    COMMANDS
}

fn lookup(name: &str) -> Option<&'static Command> {
    let name = name.strip_prefix("::").unwrap_or(name);
    let name = name.strip_prefix(NAMESPACE)?.strip_prefix("::")?;
    COMMANDS.iter().find(|command| command.name == name)
}

/// Run the command made of `words`, the first one being its qualified name.
pub fn execute(session: &Session, words: &[&str]) -> Result<(), CommandError> {
    let Some((&name, args)) = words.split_first() else {
        return Ok(());
    };
    let command = lookup(name).ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;
    if args.len() != command.arity() {
        return Err(CommandError::WrongArgs {
            name: command.qualified_name(),
            usage: command.usage,
        });
    }
    tracing::trace!(command = command.name, ?args, "executing");
    (command.handler)(session, args)
}

/// Run every command of `script`, one per line. Blank lines and lines starting with `#` are
/// skipped. Stops at the first failing command. Returns the number of commands run.
pub fn run_script(session: &Session, script: &str) -> Result<usize, CommandError> {
    let mut count = 0;
    for (index, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let at_line = |source| CommandError::Script {
            line: index + 1,
            source: Box::new(source),
        };
        let words = split_words(line).map_err(at_line)?;
        let words: Vec<&str> = words.iter().map(String::as_str).collect();
        execute(session, &words).map_err(at_line)?;
        count += 1;
    }
    Ok(count)
}

/// Parse an integer written in decimal or, with a `0x`, `0o` or `0b` prefix, in hexadecimal,
/// octal or binary. Surrounding whitespace and a sign are allowed.
/// # Example
/// ```
/// use qrenc::commands::parse_int;
/// assert_eq!(parse_int(" -0x1f ").unwrap(), -31);
/// assert!(parse_int("3.0").is_err());
/// ```
pub fn parse_int(word: &str) -> Result<i64, CommandError> {
    let error = || CommandError::NotAnInteger(word.to_string());
    let trimmed = word.trim();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let prefix = digits.get(..2).map(str::to_ascii_lowercase);
    let (radix, digits) = match prefix.as_deref() {
        Some("0x") => (16, &digits[2..]),
        Some("0o") => (8, &digits[2..]),
        Some("0b") => (2, &digits[2..]),
        _ => (10, digits),
    };
    // `from_str_radix` would accept a second sign.
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(error());
    }
    let magnitude = i64::from_str_radix(digits, radix).map_err(|_| error())?;
    Ok(if negative { -magnitude } else { magnitude })
}

fn non_empty<'a>(command: &str, word: &'a str) -> Result<&'a str, CommandError> {
    if word.is_empty() {
        return Err(CommandError::EmptyArgument(format!("{NAMESPACE}::{command}")));
    }
    Ok(word)
}

/// Split a command line into words. Words are separated by whitespace; a word starting with `"`
/// extends to the next unescaped `"` and a word starting with `{` to the matching `}`, braces
/// keeping their content verbatim.
pub fn split_words(line: &str) -> Result<Vec<String>, CommandError> {
    let mut words = Vec::new();
    let mut chars = line.chars().peekable();
    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let Some(&first) = chars.peek() else {
            return Ok(words);
        };
        let mut word = String::new();
        match first {
            '"' => {
                chars.next();
                loop {
                    match chars.next().ok_or(CommandError::Unbalanced)? {
                        '"' => break,
                        '\\' => word.push(unescape(chars.next().ok_or(CommandError::Unbalanced)?)),
                        c => word.push(c),
                    }
                }
            }
            '{' => {
                chars.next();
                let mut depth = 1;
                loop {
                    let c = chars.next().ok_or(CommandError::Unbalanced)?;
                    match c {
                        '{' => depth += 1,
                        '}' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                    word.push(c);
                }
            }
            _ => {
                while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                    word.push(c);
                }
            }
        }
        words.push(word);
    }
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        c => c,
    }
}

//! Launch target handling.
//!
//! A session can be launched with an associated target: a URL-like string
//! or a file path from a file association. Exactly one initial line is
//! derived from it, once, before the prompt cycle starts. Targets that
//! arrive while the session is already interactive are inserted into the
//! current input line instead.

use std::collections::BTreeMap;

/// Maps file extensions to "open with" command templates.
#[derive(Debug, Clone, Default)]
pub struct ExtensionRegistry {
    commands: BTreeMap<String, String>,
}

impl ExtensionRegistry {
    /// Build a registry from an extension-to-command table (typically the
    /// `[extensions]` section of the config file).
    pub fn new(commands: BTreeMap<String, String>) -> Self {
        let commands = commands
            .into_iter()
            .map(|(ext, cmd)| (ext.to_lowercase(), cmd))
            .collect();
        Self { commands }
    }

    /// Look up the open command for an extension (case-insensitive).
    pub fn command_for(&self, extension: &str) -> Option<&str> {
        self.commands
            .get(&extension.to_lowercase())
            .map(String::as_str)
    }
}

/// What to do with a launch target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchDisposition {
    /// Session is already interactive: insert the (possibly quoted) target
    /// into the current input line.
    InsertIntoInput(String),
    /// Run this line once before steady-state prompting.
    InitialCommand(String),
    /// Target has no extension: adopt it as the initial working directory.
    InitialDirectory(String),
    /// No registered template for the target's extension; start in
    /// steady-state mode.
    None,
}

/// Decide what a launch target means for this session.
///
/// `editor_active` is true once the line editor exists, i.e. the session
/// was re-entered with a fresh target while running.
pub fn derive(target: &str, editor_active: bool, registry: &ExtensionRegistry) -> LaunchDisposition {
    if editor_active {
        return LaunchDisposition::InsertIntoInput(quote_target(target));
    }

    match extension(target) {
        None => LaunchDisposition::InitialDirectory(target.to_string()),
        Some(ext) => match registry.command_for(ext) {
            Some(command) => {
                LaunchDisposition::InitialCommand(format!("{} {}", command, quote_target(target)))
            }
            None => LaunchDisposition::None,
        },
    }
}

/// Quote a target when it contains whitespace.
pub fn quote_target(target: &str) -> String {
    if target.contains(char::is_whitespace) {
        format!("\"{}\"", target)
    } else {
        target.to_string()
    }
}

/// File-type extension of a target, if it has one.
///
/// The extension is whatever follows the last `.` of the final path
/// component. A leading dot does not count ("`.bashrc`" has no extension),
/// and neither does a trailing one.
pub fn extension(target: &str) -> Option<&str> {
    let name = target
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(target);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext)
}

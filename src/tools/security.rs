//! Safety rules for command validation.
//!
//! This module provides:
//! - The ordered [`SafetyRule`] list applied to every command
//! - The dangerous command pattern table, grouped by category
//! - Pipe-to-shell detection
//! - Sub-command splitting for chained commands
//! - Command normalization for bypass detection
//!
//! Detection is pattern based. Command names match wherever they stand as a
//! whole word, so prefixes such as `time`, `nice`, `sudo -u root` or `{ ...; }`
//! do not hide them. It does not interpret shell syntax and can be bypassed by
//! variable expansion or encoding.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use tracing::warn;

use crate::error::{ShellwardError, ShellwardResult};

/// Detail attached to pipe-to-shell rejections.
pub const PIPE_TO_SHELL_REASON: &str = "Pipe to shell execution is not allowed";

/// Detail attached to unsafe chain rejections.
pub const UNSAFE_CHAIN_REASON: &str = "Command chaining contains unsafe command";

/// Start of a command word: not the tail of a longer name or file name.
const START: &str = r"(?:^|[^\w.-])";

/// End of a command word.
const END: &str = r"(?:[\s;&|)}`]|$)";

/// Programs that run their arguments as a command, optionally by path.
const RUNNER: &str = r"(?:[\w./\\:-]*[/\\])?(?:sudo|doas|nohup|exec|command|builtin|env|time|nice|ionice|timeout|xargs|stdbuf)";

/// Shell interpreter names, optionally by path.
const SHELL: &str = r"(?:[\w./\\:-]*[/\\])?(?:(?:ba|z|da|k|c|tc|a)?sh|fish|pwsh|powershell|cmd)(?:\.exe)?";

/// Where a dangerous pattern is looked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternScope {
    /// A command name with its arguments, matched inside each sub-command.
    CommandWord,
    /// A shape that spans operators, matched against the whole command.
    Shape,
}

/// A category of destructive command together with the regex that detects it.
#[derive(Debug, Clone)]
pub struct DangerousPattern {
    /// Category named in the rejection message.
    pub category: &'static str,
    /// Where the pattern applies.
    pub scope: PatternScope,
    /// Case-insensitive pattern.
    pub regex: Regex,
}

impl DangerousPattern {
    /// Pattern for a command name, matched at any word boundary.
    fn word(category: &'static str, pattern: &str) -> Self {
        Self::compile(category, PatternScope::CommandWord, &format!("{START}{pattern}"))
    }

    /// Pattern for a shape that may span shell operators.
    fn shape(category: &'static str, pattern: &str) -> Self {
        Self::compile(category, PatternScope::Shape, pattern)
    }

    fn compile(category: &'static str, scope: PatternScope, pattern: &str) -> Self {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .unwrap_or_else(|e| panic!("invalid dangerous pattern for {category}: {e}"));
        Self {
            category,
            scope,
            regex,
        }
    }

    /// Returns `true` if the pattern matches the command.
    #[must_use]
    pub fn is_match(&self, command: &str) -> bool {
        self.regex.is_match(command)
    }
}

const RECURSIVE_DELETE: &str = "recursive deletion of root or wildcard path";
const SHUTDOWN: &str = "system shutdown or reboot";
const DISK_FORMAT: &str = "disk format";
const RAW_DEVICE_WRITE: &str = "raw device write";
const FORK_BOMB: &str = "fork bomb";
const ROOT_PERMISSIONS: &str = "recursive permission change on root";

/// Dangerous command patterns for all platforms.
///
/// Unix and Windows spellings live in one table: a workspace may be driven
/// through either interpreter, and a Windows command typed on Unix is at
/// worst a false positive.
pub static DANGEROUS_PATTERNS: Lazy<Vec<DangerousPattern>> = Lazy::new(|| {
    vec![
        // Destructive file operations
        DangerousPattern::word(
            RECURSIVE_DELETE,
            &format!(
                r"rm\s+(?:\S+\s+)*(?:-[a-z]*r[a-z]*|--recursive)\s+(?:\S+\s+)*(?:/+\*?|~/?\*?|\*|\$home/?\*?|\.\.?/?\*?){END}"
            ),
        ),
        DangerousPattern::word(RECURSIVE_DELETE, r"rm\s+.*--no-preserve-root"),
        DangerousPattern::word(
            RECURSIVE_DELETE,
            &format!(r"(?:del|erase)\s+(?:\S+\s+)*/s{END}"),
        ),
        DangerousPattern::word(
            RECURSIVE_DELETE,
            &format!(r"(?:rd|rmdir)\s+(?:\S+\s+)*/s{END}"),
        ),
        DangerousPattern::word(RECURSIVE_DELETE, r"(?:remove-item|ri)\s+.*-recurse"),
        // System disruption
        DangerousPattern::word(SHUTDOWN, &format!(r"(?:shutdown|reboot|halt|poweroff){END}")),
        DangerousPattern::word(SHUTDOWN, &format!(r"init\s+[06]{END}")),
        DangerousPattern::word(SHUTDOWN, r"systemctl\s+(?:-\S+\s+)*(?:poweroff|reboot|halt|kexec)\b"),
        DangerousPattern::word(SHUTDOWN, r"(?:stop|restart)-computer\b"),
        // Disk/filesystem destruction
        DangerousPattern::word(DISK_FORMAT, r"format(?:\.com|\.exe)?\s+(?:/\S+\s+)*[a-z]:"),
        DangerousPattern::word(DISK_FORMAT, &format!(r"mkfs(?:\.\w+)?{END}")),
        DangerousPattern::word(DISK_FORMAT, &format!(r"(?:diskpart|wipefs){END}")),
        // Low-level device writes
        DangerousPattern::word(
            RAW_DEVICE_WRITE,
            r"dd\s+.*(?:if=/dev/(?:zero|random|urandom)|of=/dev/)",
        ),
        DangerousPattern::word(RAW_DEVICE_WRITE, r"shred\s+.*/dev/"),
        DangerousPattern::shape(
            RAW_DEVICE_WRITE,
            r">\s*/dev/(?:sd[a-z]|hd[a-z]|vd[a-z]|xvd[a-z]|nvme\d|mmcblk\d|disk\d)",
        ),
        // Resource exhaustion
        DangerousPattern::shape(FORK_BOMB, r":\(\)\s*\{\s*:\s*\|\s*:\s*&\s*\}\s*;\s*:"),
        // Permissions on the whole filesystem
        DangerousPattern::word(
            ROOT_PERMISSIONS,
            &format!(r"ch(?:mod|own|grp)\s+(?:-\S+\s+)*-[a-z]*r[a-z]*\s+(?:\S+\s+)?/{END}"),
        ),
        DangerousPattern::word(
            ROOT_PERMISSIONS,
            &format!(r"chmod\s+(?:-\S+\s+)*0?777\s+/{END}"),
        ),
    ]
});

/// A pipe (`|` or `|&`, never `||`) whose right-hand side is a shell
/// interpreter, possibly behind runners such as `sudo -u root` or
/// `/usr/bin/env`.
static PIPE_TO_SHELL: Lazy<Regex> = Lazy::new(|| {
    let runners = format!(
        r"(?:{RUNNER}\s+(?:-\S+(?:\s+[^-\s|;&]\S*)?\s+|\w+=\S*\s+|\d\S*\s+)*)*"
    );
    RegexBuilder::new(&format!(r"(?:^|[^|])\|&?\s*{runners}{SHELL}{END}"))
        .case_insensitive(true)
        .build()
        .expect("invalid regex: pipe to shell")
});

/// Operators that separate sub-commands.
static SUBCOMMAND_SEPARATORS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&&|\|\||\$\(|[;|&\n`()]").expect("invalid regex: subcommand separators")
});

/// A named predicate over the raw command string.
///
/// Rules are evaluated in [`SafetyRule::ORDERED`] order and the first
/// violation wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SafetyRule {
    /// The leading command, or a shape spanning the whole line, is on the
    /// destructive denylist.
    DangerousCommand,
    /// Output is piped into a shell interpreter.
    PipeToShell,
    /// A chained sub-command is on the destructive denylist.
    UnsafeChain,
}

impl SafetyRule {
    /// All rules in evaluation order.
    pub const ORDERED: [SafetyRule; 3] = [
        SafetyRule::DangerousCommand,
        SafetyRule::PipeToShell,
        SafetyRule::UnsafeChain,
    ];

    /// Stable identifier used in logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::DangerousCommand => "dangerous_command",
            Self::PipeToShell => "pipe_to_shell",
            Self::UnsafeChain => "unsafe_chain",
        }
    }

    /// Returns the rejection detail if `command` violates this rule.
    #[must_use]
    pub fn violation(self, command: &str) -> Option<&'static str> {
        match self {
            Self::DangerousCommand => {
                let leading = split_subcommands(command).into_iter().next().unwrap_or_default();
                match_category(leading, PatternScope::CommandWord)
                    .or_else(|| match_category(command, PatternScope::Shape))
            }
            Self::PipeToShell => pipes_to_shell(command).then_some(PIPE_TO_SHELL_REASON),
            Self::UnsafeChain => {
                let subcommands = split_subcommands(command);
                let unsafe_part = subcommands.len() > 1
                    && subcommands
                        .iter()
                        .any(|sub| dangerous_category(sub).is_some());
                unsafe_part.then_some(UNSAFE_CHAIN_REASON)
            }
        }
    }
}

/// Runs every safety rule against `command`.
///
/// # Errors
///
/// Returns `ShellwardError::SafetyBlocked` for the first violated rule.
pub fn check_command(command: &str) -> ShellwardResult<()> {
    for rule in SafetyRule::ORDERED {
        if let Some(reason) = rule.violation(command) {
            warn!(
                rule = rule.name(),
                reason = reason,
                command = %command,
                "Security violation: command blocked"
            );
            return Err(ShellwardError::safety_blocked(rule, reason));
        }
    }
    Ok(())
}

/// Returns the category of the first dangerous pattern matching `command`.
///
/// Both the trimmed command and its normalized form are checked.
#[must_use]
pub fn dangerous_category(command: &str) -> Option<&'static str> {
    match_category(command, PatternScope::CommandWord)
        .or_else(|| match_category(command, PatternScope::Shape))
}

fn match_category(command: &str, scope: PatternScope) -> Option<&'static str> {
    let trimmed = command.trim();
    let normalized = normalize_command(trimmed);
    DANGEROUS_PATTERNS
        .iter()
        .filter(|p| p.scope == scope)
        .find(|p| p.is_match(trimmed) || p.is_match(&normalized))
        .map(|p| p.category)
}

/// Returns `true` if `command` pipes into a shell interpreter.
#[must_use]
pub fn pipes_to_shell(command: &str) -> bool {
    let trimmed = command.trim();
    PIPE_TO_SHELL.is_match(trimmed) || PIPE_TO_SHELL.is_match(&normalize_command(trimmed))
}

/// Splits a command on chaining, pipe and substitution operators.
///
/// Empty pieces are dropped. Quoting is not understood, so an operator inside
/// a string literal also splits.
#[must_use]
pub fn split_subcommands(command: &str) -> Vec<&str> {
    SUBCOMMAND_SEPARATORS
        .split(command)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Normalizes a command string for pattern matching.
///
/// - Backslashes before letters are removed (`r\m` is `rm` to the shell)
/// - Quote characters are removed (`"rm" -rf /` is `rm -rf /`)
/// - Runs of whitespace collapse to a single space
pub fn normalize_command(cmd: &str) -> String {
    let mut unescaped = String::with_capacity(cmd.len());
    let mut chars = cmd.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, chars.peek().copied()) {
            // Preserve escape sequences that don't affect command names
            ('\\', Some(next @ ('n' | 't' | 'r' | '0' | 'x'))) => {
                unescaped.push(c);
                unescaped.push(next);
                chars.next();
            }
            // For letters the backslash is a filter bypass, e.g. r\m -> rm
            ('\\', Some(next)) if next.is_ascii_alphabetic() => {
                unescaped.push(next);
                chars.next();
            }
            ('"' | '\'', _) => {}
            _ => unescaped.push(c),
        }
    }

    unescaped.split_whitespace().collect::<Vec<_>>().join(" ")
}

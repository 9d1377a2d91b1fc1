//! Translation of contextaider flags into aider flags.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlagMapping {
    /// Flag as typed on the contextaider command line.
    pub source_flag: &'static str,
    /// Flag aider understands.
    pub target_flag: &'static str,
    pub takes_value: bool,
    pub description: &'static str,
}

impl FlagMapping {
    /// Match `token` as either `--flag` or `--flag=value`. Returns the inline
    /// value for the equals form.
    fn matches<'a>(&self, token: &'a str) -> Option<Option<&'a str>> {
        if token == self.source_flag {
            return Some(None);
        }
        token
            .strip_prefix(self.source_flag)
            .and_then(|rest| rest.strip_prefix('='))
            .map(Some)
    }
}

/// Registry consulted in order; the first match wins.
pub static FLAG_MAPPINGS: &[FlagMapping] = &[
    FlagMapping {
        source_flag: "--exec",
        target_flag: "--message-file",
        takes_value: true,
        description: "Execute mode with specified file",
    },
    FlagMapping {
        source_flag: "--context",
        target_flag: "--read",
        takes_value: true,
        description: "Add a read-only context file to the chat",
    },
    FlagMapping {
        source_flag: "--auto-approve",
        target_flag: "--yes-always",
        takes_value: false,
        description: "Answer yes to every confirmation prompt",
    },
];

/// All known mappings, for help output.
pub fn available_flag_mappings() -> &'static [FlagMapping] {
    FLAG_MAPPINGS
}

pub fn translate_flags<S: AsRef<str>>(args: &[S]) -> Vec<String> {
    translate_flags_with(FLAG_MAPPINGS, args)
}

/// Translate `args` against an explicit registry.
///
/// Unknown tokens pass through untouched. A value-taking flag consumes the
/// next token only when that token does not itself look like a flag.
pub fn translate_flags_with<S: AsRef<str>>(registry: &[FlagMapping], args: &[S]) -> Vec<String> {
    let mut out = Vec::with_capacity(args.len());
    let mut i = 0;

    while i < args.len() {
        let arg = args[i].as_ref();
        let found = registry
            .iter()
            .find_map(|m| m.matches(arg).map(|inline| (m, inline)));

        let Some((mapping, inline)) = found else {
            out.push(arg.to_string());
            i += 1;
            continue;
        };

        if !mapping.takes_value {
            out.push(mapping.target_flag.to_string());
            i += 1;
            continue;
        }

        let value = match inline {
            Some(v) => Some(v),
            None => match args.get(i + 1).map(AsRef::as_ref) {
                Some(next) if !next.starts_with('-') => {
                    i += 1;
                    Some(next)
                }
                _ => None,
            },
        };

        match value {
            Some(v) if !v.is_empty() => out.push(format!("{}={v}", mapping.target_flag)),
            _ => out.push(mapping.target_flag.to_string()),
        }
        i += 1;
    }

    tracing::debug!(?out, "translated flags");
    out
}

/// Split a mixed token stream into positionals and flag tokens.
///
/// A registry flag that takes a value and has no `=value` keeps the next
/// token with it, unless that token looks like a flag. The flag side comes
/// back in its original order so [`translate_flags`] sees each value next to
/// its flag.
pub fn partition_flags<S: AsRef<str>>(args: &[S]) -> (Vec<String>, Vec<String>) {
    partition_flags_with(FLAG_MAPPINGS, args)
}

pub fn partition_flags_with<S: AsRef<str>>(
    registry: &[FlagMapping],
    args: &[S],
) -> (Vec<String>, Vec<String>) {
    let mut positionals = Vec::new();
    let mut flags = Vec::new();
    let mut tokens = args.iter().map(AsRef::as_ref).peekable();

    while let Some(token) = tokens.next() {
        if !token.starts_with('-') {
            positionals.push(token.to_string());
            continue;
        }
        flags.push(token.to_string());

        let wants_value = registry
            .iter()
            .find_map(|m| m.matches(token).map(|inline| m.takes_value && inline.is_none()))
            .unwrap_or(false);
        if wants_value {
            if let Some(value) = tokens.next_if(|next| !next.starts_with('-')) {
                flags.push(value.to_string());
            }
        }
    }

    (positionals, flags)
}

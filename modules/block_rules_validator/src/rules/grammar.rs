//! Grammar of the block validation rules setting
//!
//! `kind:arg,arg;kind:arg` - invocations separated by `;`, the kind separated
//! from its arguments by the first `:`, arguments separated by `,`. Nothing is
//! rejected here; each rule decides whether its own arguments make sense.

pub const RULE_SEPARATOR: char = ';';
pub const KIND_SEPARATOR: char = ':';
pub const ARGUMENT_SEPARATOR: char = ',';

/// One rule as written in the setting, not yet interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleInvocation<'a> {
    pub kind: &'a str,
    pub args: Vec<&'a str>,
}

/// Split a rules setting into invocations, in the order written
pub fn parse(raw: &str) -> Vec<RuleInvocation<'_>> {
    raw.split(RULE_SEPARATOR)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(parse_invocation)
        .collect()
}

fn parse_invocation(segment: &str) -> RuleInvocation<'_> {
    let (kind, arguments) = segment.split_once(KIND_SEPARATOR).unwrap_or((segment, ""));
    let arguments = arguments.trim();
    let args = if arguments.is_empty() {
        Vec::new()
    } else {
        arguments.split(ARGUMENT_SEPARATOR).map(str::trim).collect()
    };

    RuleInvocation {
        kind: kind.trim(),
        args,
    }
}

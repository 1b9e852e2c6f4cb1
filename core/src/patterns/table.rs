//! Compiled rule table
//!
//! Rules are compiled once per settings snapshot. A rule that fails to
//! compile (or cannot possibly extract what its kind needs) is rejected with
//! a warning and left out; the remaining rules keep working.

use regex::{Captures, Regex, RegexBuilder};
use spellfloat_types::SpellRule;
use spellfloat_types::formatting::{UNKNOWN_SUBJECT, render_template};

use crate::events::Event;

/// What a compiled rule extracts from a match
#[derive(Debug, Clone)]
enum RuleKind {
    /// Group 1 = subject, group 2 = amount
    Damage,
    /// Group 1 (optional) = subject, rendered into the template
    Special { template: String },
}

#[derive(Debug, Clone)]
struct CompiledRule {
    name: String,
    category: String,
    regex: Regex,
    kind: RuleKind,
}

/// A rule that was excluded at load time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRule {
    pub name: String,
    pub reason: String,
}

/// Ordered set of compiled extraction rules.
#[derive(Debug, Clone, Default)]
pub struct PatternTable {
    rules: Vec<CompiledRule>,
    rejected: Vec<RejectedRule>,
}

impl PatternTable {
    /// Compile rules in configured order, skipping malformed ones
    pub fn new(rules: &[SpellRule]) -> Self {
        let mut table = Self::default();
        for rule in rules {
            match compile(rule) {
                Ok(compiled) => table.rules.push(compiled),
                Err(reason) => {
                    tracing::warn!(rule = %rule.name, %reason, "skipping invalid spell pattern");
                    table.rejected.push(RejectedRule {
                        name: rule.name.clone(),
                        reason,
                    });
                }
            }
        }
        tracing::debug!(
            active = table.rules.len(),
            rejected = table.rejected.len(),
            "pattern table built"
        );
        table
    }

    /// Number of usable rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules excluded at load time
    pub fn rejected(&self) -> &[RejectedRule] {
        &self.rejected
    }

    /// Test every rule against `line`, appending one event per match.
    ///
    /// Rules are tried in configured order and matching does not stop at the
    /// first hit, so a line can yield several events.
    pub fn match_line_into(&self, line: &str, out: &mut Vec<Event>) {
        for rule in &self.rules {
            let Some(caps) = rule.regex.captures(line) else {
                continue;
            };
            if let Some(event) = rule.extract(&caps) {
                out.push(event);
            }
        }
    }

    /// Convenience wrapper over [`Self::match_line_into`]
    pub fn match_line(&self, line: &str) -> Vec<Event> {
        let mut events = Vec::new();
        self.match_line_into(line, &mut events);
        events
    }
}

impl CompiledRule {
    fn extract(&self, caps: &Captures<'_>) -> Option<Event> {
        match &self.kind {
            RuleKind::Damage => {
                let subject = caps.get(1)?.as_str();
                let raw = caps.get(2)?.as_str();
                let amount = match raw.trim().parse::<u64>() {
                    Ok(amount) => amount,
                    Err(e) => {
                        tracing::debug!(rule = %self.name, raw, error = %e, "unparseable amount");
                        return None;
                    }
                };
                Some(Event::Damage {
                    spell: self.name.clone(),
                    category: self.category.clone(),
                    subject: subject.to_string(),
                    amount,
                })
            }
            RuleKind::Special { template } => {
                let subject = caps
                    .get(1)
                    .map(|m| m.as_str())
                    .filter(|s| !s.is_empty())
                    .unwrap_or(UNKNOWN_SUBJECT);
                Some(Event::Special {
                    spell: self.name.clone(),
                    category: self.category.clone(),
                    subject: subject.to_string(),
                    message: render_template(template, subject),
                })
            }
        }
    }
}

fn compile(rule: &SpellRule) -> Result<CompiledRule, String> {
    let regex = RegexBuilder::new(&rule.pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| e.to_string())?;

    let kind = match &rule.message_template {
        Some(template) => RuleKind::Special {
            template: template.clone(),
        },
        None => {
            // captures_len counts the implicit whole-match group
            let groups = regex.captures_len().saturating_sub(1);
            if groups < 2 {
                return Err(format!(
                    "damage pattern needs subject and amount groups, found {groups}"
                ));
            }
            RuleKind::Damage
        }
    };

    Ok(CompiledRule {
        name: rule.name.clone(),
        category: rule.category.clone(),
        regex,
        kind,
    })
}

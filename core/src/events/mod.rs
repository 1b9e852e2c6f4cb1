//! Typed events produced by the classifier
//!
//! Every matched log line becomes one `Event` per matching rule. Events are
//! immutable and consumed once by the grouper.

/// A recognised spell occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A damage rule matched: subject took `amount` from `spell`
    Damage {
        spell: String,
        category: String,
        subject: String,
        amount: u64,
    },
    /// A special rule matched: `message` is the rendered template
    Special {
        spell: String,
        category: String,
        subject: String,
        message: String,
    },
}

impl Event {
    pub fn spell(&self) -> &str {
        match self {
            Event::Damage { spell, .. } | Event::Special { spell, .. } => spell,
        }
    }

    pub fn category(&self) -> &str {
        match self {
            Event::Damage { category, .. } | Event::Special { category, .. } => category,
        }
    }

    pub fn subject(&self) -> &str {
        match self {
            Event::Damage { subject, .. } | Event::Special { subject, .. } => subject,
        }
    }

    /// Damage amount, present only for damage events
    pub fn amount(&self) -> Option<u64> {
        match self {
            Event::Damage { amount, .. } => Some(*amount),
            Event::Special { .. } => None,
        }
    }

    /// Rendered message, present only for special events
    pub fn message(&self) -> Option<&str> {
        match self {
            Event::Damage { .. } => None,
            Event::Special { message, .. } => Some(message),
        }
    }

    pub fn is_damage(&self) -> bool {
        matches!(self, Event::Damage { .. })
    }
}

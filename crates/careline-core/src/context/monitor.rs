//! Context monitor for token estimation and prompt planning.
//!
//! Tracks context window usage via a word-count heuristic. The estimate
//! is intentionally rough: the service remains the final authority and
//! its own context errors are surfaced separately.

use crate::config::ContextPolicy;
use crate::types::{Role, Turn};

// Costs are kept in tenths of a token so sums stay exact.

/// Average tokens per whitespace-delimited word (1.3), in tenths.
const TOKENS_PER_WORD_TENTHS: usize = 13;

/// Overhead per message for role header / framing (4 tokens), in tenths.
const MESSAGE_OVERHEAD_TENTHS: usize = 40;

/// Monitors context window usage for one model.
#[derive(Debug, Clone)]
pub struct ContextMonitor {
    /// Model-specific context window limit in tokens.
    context_limit: usize,
    /// Tokens held back for the generated reply.
    reserved_output: usize,
}

/// Which prior turns go into the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextPlan {
    /// Index of the first prior turn to include.
    pub keep_from: usize,
    /// Estimated prompt tokens with that selection.
    pub estimated_tokens: usize,
}

impl ContextPlan {
    /// Number of prior turns left out of the prompt.
    pub fn dropped(&self) -> usize {
        self.keep_from
    }
}

/// The prompt cannot be made to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextOverflow {
    /// Estimated tokens of the smallest admissible prompt.
    pub used: usize,
    /// Token budget available for the prompt.
    pub max: usize,
}

impl ContextMonitor {
    /// Create a new monitor with the given context window limit.
    pub fn new(context_limit: usize) -> Self {
        Self {
            context_limit,
            reserved_output: 0,
        }
    }

    /// Reserve part of the window for the model's reply.
    pub fn with_reserved_output(mut self, tokens: usize) -> Self {
        self.reserved_output = tokens;
        self
    }

    /// Tokens available for the prompt itself.
    pub fn budget(&self) -> usize {
        self.context_limit.saturating_sub(self.reserved_output)
    }

    /// Estimate the token count for a sequence of message texts.
    ///
    /// Each message costs 4 tokens of framing plus 1.3 tokens per word,
    /// rounded up over the whole sequence.
    pub fn estimate_tokens<'a, I>(texts: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        tenths_to_tokens(texts.into_iter().map(message_cost).sum())
    }

    /// Choose the prior turns to send with `system` and `input`.
    ///
    /// With [`ContextPolicy::Reject`] every prior turn must fit. With
    /// [`ContextPolicy::TruncateOldest`] the oldest turns are left out until
    /// the prompt fits; the first kept turn is always a user turn.
    pub fn plan(
        &self,
        system: &str,
        history: &[Turn],
        input: &str,
        policy: ContextPolicy,
    ) -> Result<ContextPlan, ContextOverflow> {
        let budget = self.budget();
        let fixed = message_cost(system) + message_cost(input);
        let costs: Vec<usize> = history.iter().map(|t| message_cost(&t.content)).collect();

        // suffix[i] = cost of history[i..]
        let mut suffix = vec![0; costs.len() + 1];
        for i in (0..costs.len()).rev() {
            suffix[i] = suffix[i + 1] + costs[i];
        }

        let estimate = |from: usize| tenths_to_tokens(fixed + suffix[from]);

        let full = estimate(0);
        if full <= budget {
            return Ok(ContextPlan {
                keep_from: 0,
                estimated_tokens: full,
            });
        }

        if policy == ContextPolicy::Reject {
            return Err(ContextOverflow {
                used: full,
                max: budget,
            });
        }

        for from in 1..=history.len() {
            if from < history.len() && history[from].role != Role::User {
                continue;
            }
            let tokens = estimate(from);
            if tokens <= budget {
                return Ok(ContextPlan {
                    keep_from: from,
                    estimated_tokens: tokens,
                });
            }
        }

        Err(ContextOverflow {
            used: estimate(history.len()),
            max: budget,
        })
    }
}

/// Estimated cost of one message, in tenths of a token.
fn message_cost(text: &str) -> usize {
    MESSAGE_OVERHEAD_TENTHS + text.split_whitespace().count() * TOKENS_PER_WORD_TENTHS
}

fn tenths_to_tokens(tenths: usize) -> usize {
    tenths.div_ceil(10)
}

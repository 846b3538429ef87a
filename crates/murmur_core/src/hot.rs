//! Hot-message detection
//!
//! A message is hot when it meets any one of three signals: enough total
//! reactions, enough distinct reaction emojis, or any reaction matching a
//! target emoji. Matches are ranked by total reactions.

use serde::Serialize;

use crate::message::MessageRecord;
use crate::query::HotCriteria;

/// A message that passed the hot filter, with the signals it was judged on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HotMessage {
    #[serde(flatten)]
    pub message: MessageRecord,
    pub total_reactions: u64,
    pub reaction_types: usize,
    pub has_target_emoji: bool,
}

impl HotMessage {
    /// Score a message against the criteria, `None` if it is not hot
    pub fn evaluate(message: &MessageRecord, criteria: &HotCriteria) -> Option<Self> {
        if message.reactions.is_empty() {
            return None;
        }

        let total_reactions = message.total_reactions();
        let reaction_types = message.reaction_type_count();
        let has_target_emoji = message.reactions.iter().any(|reaction| {
            criteria
                .target_emojis
                .iter()
                .any(|target| reaction.emoji.contains(target.as_str()))
        });

        let hot = total_reactions >= criteria.min_reactions
            || reaction_types >= criteria.min_reaction_types
            || has_target_emoji;

        hot.then(|| Self {
            message: message.clone(),
            total_reactions,
            reaction_types,
            has_target_emoji,
        })
    }
}

/// Filter and rank. The input is left untouched; ties keep fetch order.
pub fn filter_hot_messages(messages: &[MessageRecord], criteria: &HotCriteria) -> Vec<HotMessage> {
    let mut hot: Vec<HotMessage> = messages
        .iter()
        .filter_map(|message| HotMessage::evaluate(message, criteria))
        .collect();

    hot.sort_by(|a, b| b.total_reactions.cmp(&a.total_reactions));
    hot
}

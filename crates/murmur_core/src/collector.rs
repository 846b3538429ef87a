use crate::channel::{Capability, PlatformChannel};
use crate::error::Result;
use crate::message::MessageRecord;
use crate::platform::ChatPlatform;
use crate::query::HistoryQuery;

/// Runs history and pin fetches and normalizes what comes back
#[derive(Clone, Copy)]
pub struct MessageCollector<'a> {
    platform: &'a dyn ChatPlatform,
}

impl<'a> MessageCollector<'a> {
    pub fn new(platform: &'a dyn ChatPlatform) -> Self {
        Self { platform }
    }

    /// Fetch a bounded history window. Records keep the order the platform
    /// returned them in.
    pub async fn collect(
        &self,
        channel: &PlatformChannel,
        query: &HistoryQuery,
    ) -> Result<Vec<MessageRecord>> {
        channel.require(Capability::History)?;

        tracing::debug!(
            channel_id = %channel.id,
            filters = %query.summary(),
            "collecting message history"
        );

        let raw = self.platform.history(channel, query).await?;
        Ok(raw.into_iter().map(MessageRecord::from).collect())
    }

    pub async fn collect_pinned(&self, channel: &PlatformChannel) -> Result<Vec<MessageRecord>> {
        channel.require(Capability::Pins)?;

        let raw = self.platform.pins(channel).await?;
        Ok(raw.into_iter().map(MessageRecord::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MurmurError;
    use crate::platform::MockChatPlatform;
    use crate::test_helpers::{FakePlatform, message, text_channel, voice_channel};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_collect_preserves_platform_order() {
        let platform = FakePlatform::new()
            .with_channel(text_channel("1", "general", None))
            .with_messages(
                "1",
                vec![
                    message("10", "ada", "first", &[]),
                    message("11", "grace", "second", &[("👍", 2)]),
                    message("12", "linus", "third", &[]),
                ],
            );
        let channel = platform.channel("1");

        let newest_first = MessageCollector::new(&platform)
            .collect(&channel, &HistoryQuery::new(10))
            .await
            .unwrap();
        let ids: Vec<_> = newest_first.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["12", "11", "10"]);

        let mut query = HistoryQuery::new(2);
        query.oldest_first = Some(true);
        let oldest_first = MessageCollector::new(&platform)
            .collect(&channel, &query)
            .await
            .unwrap();
        let ids: Vec<_> = oldest_first.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["10", "11"]);
    }

    #[tokio::test]
    async fn test_pins_rejected_before_any_platform_call() {
        let mut mock = MockChatPlatform::new();
        mock.expect_pins().never();

        let voice = voice_channel("2", "hangout", None);
        let err = MessageCollector::new(&mock)
            .collect_pinned(&voice)
            .await
            .unwrap_err();

        assert!(matches!(err, MurmurError::UnsupportedChannel { .. }));
    }

    #[tokio::test]
    async fn test_history_failure_propagates() {
        let platform = FakePlatform::new()
            .with_channel(text_channel("1", "general", None))
            .with_failing_history("1");
        let channel = platform.channel("1");

        let err = MessageCollector::new(&platform)
            .collect(&channel, &HistoryQuery::new(10))
            .await
            .unwrap_err();
        assert!(matches!(err, MurmurError::Platform { .. }));
    }
}

// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bot loop over the mock channel: delivery, button answers, shutdown.

use std::sync::Arc;
use std::time::Duration;

use leadline_core::ChannelAdapter;
use leadline_core::types::{ConversationId, Keyboard, MessageContent};
use leadline_flow::BotLoop;
use leadline_flow::menu::{ADD_CLIENT, ADD_COMPANY};
use leadline_test_utils::mock_channel::inbound;
use leadline_test_utils::{MockChannel, TestHarness};
use tokio_util::sync::CancellationToken;

async fn wait_for_sent(channel: &MockChannel, count: usize) {
    tokio::time::timeout(Duration::from_secs(20), async {
        while channel.sent_count().await < count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("replies were not delivered in time");
}

#[tokio::test]
async fn replies_are_sent_to_the_originating_conversation() {
    let harness = TestHarness::new().await.unwrap();
    let mock = Arc::new(MockChannel::new());
    let channel: Arc<dyn ChannelAdapter> = mock.clone();
    let bot = BotLoop::new(channel, harness.engine.clone());
    let cancel = CancellationToken::new();

    mock.inject(inbound(
        ConversationId(42),
        MessageContent::Text("/start".into()),
    ))
    .await;

    let run_cancel = cancel.clone();
    let handle = tokio::spawn(async move { bot.run(run_cancel).await });

    wait_for_sent(&mock, 1).await;
    cancel.cancel();
    handle.await.unwrap().unwrap();

    let sent = mock.sent_messages().await;
    assert_eq!(sent[0].conversation, ConversationId(42));
    assert!(matches!(sent[0].keyboard, Some(Keyboard::Menu(_))));
}

#[tokio::test]
async fn button_presses_are_answered_even_when_silent() {
    let harness = TestHarness::new().await.unwrap();
    let mock = Arc::new(MockChannel::new());
    let channel: Arc<dyn ChannelAdapter> = mock.clone();
    let bot = BotLoop::new(channel, harness.engine.clone());
    let cancel = CancellationToken::new();

    mock.inject(inbound(
        ConversationId(1),
        MessageContent::Button {
            data: "noop".into(),
            query_id: Some("q-1".into()),
        },
    ))
    .await;
    mock.inject(inbound(
        ConversationId(1),
        MessageContent::Text("/start".into()),
    ))
    .await;

    let run_cancel = cancel.clone();
    let handle = tokio::spawn(async move { bot.run(run_cancel).await });

    wait_for_sent(&mock, 1).await;
    cancel.cancel();
    handle.await.unwrap().unwrap();

    let answered = mock.answered_buttons().await;
    assert_eq!(answered.len(), 1);
    assert_eq!(answered[0].query_id, "q-1");
    assert!(answered[0].notice.is_none());
}

#[tokio::test]
async fn loop_stops_on_cancellation_without_input() {
    let harness = TestHarness::new().await.unwrap();
    let channel: Arc<dyn ChannelAdapter> = Arc::new(MockChannel::new());
    let bot = BotLoop::new(channel, harness.engine.clone());
    let cancel = CancellationToken::new();
    cancel.cancel();

    tokio::time::timeout(Duration::from_secs(2), bot.run(cancel))
        .await
        .expect("loop did not stop")
        .unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn turns_of_one_conversation_keep_arrival_order() {
    let harness = TestHarness::new().await.unwrap();
    let mock = Arc::new(MockChannel::new());
    let channel: Arc<dyn ChannelAdapter> = mock.clone();
    let bot = BotLoop::new(channel, harness.engine.clone());
    let cancel = CancellationToken::new();

    let chats = [ConversationId(7), ConversationId(8)];
    let turns = 100;
    for i in 0..turns {
        let label = if i % 2 == 0 { ADD_CLIENT } else { ADD_COMPANY };
        for chat in chats {
            mock.inject(inbound(chat, MessageContent::Text(label.into())))
                .await;
        }
    }

    let run_cancel = cancel.clone();
    let handle = tokio::spawn(async move { bot.run(run_cancel).await });

    wait_for_sent(&mock, turns * chats.len()).await;
    cancel.cancel();
    handle.await.unwrap().unwrap();

    let sent = mock.sent_messages().await;
    for chat in chats {
        let texts: Vec<&str> = sent
            .iter()
            .filter(|m| m.conversation == chat)
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(texts.len(), turns);
        for (i, text) in texts.iter().enumerate() {
            if i % 2 == 0 {
                assert!(text.contains("phone"), "turn {i} of {chat}: {text}");
            } else {
                assert_eq!(*text, "Company name:", "turn {i} of {chat}");
            }
        }
        assert_eq!(harness.engine.sessions().get(chat).flow(), "add_company");
    }
}

use sum_image::core::models::ThreadMessage;
use sum_image::core::{ThreadWindower, window};

const BOT: &str = "A0BOT";

fn human(ts: &str) -> ThreadMessage {
    ThreadMessage::new(ts, format!("message {ts}"))
}

fn bot(ts: &str) -> ThreadMessage {
    ThreadMessage::from_app(ts, format!(":frame_with_picture: {ts}"), BOT)
}

fn timestamps(messages: &[ThreadMessage]) -> Vec<&str> {
    messages.iter().map(|m| m.ts.as_str()).collect()
}

fn long_thread() -> Vec<ThreadMessage> {
    vec![
        human("1"),
        bot("2"),
        human("3"),
        human("4"),
        bot("5"),
        human("6"),
        human("7"),
        human("8"),
        human("9"),
    ]
}

#[test]
fn test_window_always_ends_with_target() {
    let thread = long_thread();
    for target in ["1", "3", "6", "9"] {
        for max in 0..6 {
            let got = window(&thread, target, max, Some(BOT));
            assert_eq!(got.last().map(|m| m.ts.as_str()), Some(target));
        }
    }
}

#[test]
fn test_window_never_exceeds_limit() {
    let thread = long_thread();
    for max in 0..12 {
        let got = window(&thread, "9", max, Some(BOT));
        assert!(got.len() <= max + 1, "max={max} got={}", got.len());
    }
}

#[test]
fn test_window_preserves_thread_order() {
    let thread = long_thread();
    let got = window(&thread, "9", 10, Some(BOT));
    assert_eq!(timestamps(&got), ["1", "3", "4", "6", "7", "8", "9"]);
}

#[test]
fn test_window_takes_the_most_recent_preceding() {
    let thread = long_thread();
    let got = window(&thread, "9", 3, Some(BOT));
    assert_eq!(timestamps(&got), ["6", "7", "8", "9"]);
}

#[test]
fn test_bot_messages_do_not_use_up_the_budget() {
    let thread = long_thread();
    let got = window(&thread, "6", 3, Some(BOT));
    assert_eq!(timestamps(&got), ["1", "3", "4", "6"]);
}

#[test]
fn test_window_excludes_every_self_message_before_target() {
    let thread = long_thread();
    let got = window(&thread, "9", 100, Some(BOT));
    assert!(got.iter().all(|m| !m.is_authored_by(BOT)));
}

#[test]
fn test_unknown_self_id_keeps_app_messages() {
    let thread = long_thread();
    let got = window(&thread, "6", 10, None);
    assert_eq!(timestamps(&got), ["1", "2", "3", "4", "5", "6"]);
}

#[test]
fn test_other_apps_are_not_filtered() {
    let thread = vec![
        human("1"),
        ThreadMessage::from_app("2", "deploy finished", "A0OTHER"),
        human("3"),
    ];
    let got = window(&thread, "3", 5, Some(BOT));
    assert_eq!(timestamps(&got), ["1", "2", "3"]);
}

#[test]
fn test_missing_target_yields_nothing() {
    let thread = long_thread();
    assert!(window(&thread, "42", 5, Some(BOT)).is_empty());
    assert!(window(&[], "1", 5, Some(BOT)).is_empty());
}

#[test]
fn test_windower_treats_empty_id_as_unknown() {
    let thread = long_thread();
    let windower = ThreadWindower::new(Some(""), 10);
    let got = windower.window(&thread, "3");
    assert_eq!(timestamps(&got), ["1", "2", "3"]);
}

#[test]
fn test_windower_matches_free_function() {
    let thread = long_thread();
    let windower = ThreadWindower::new(Some(BOT), 2);
    assert_eq!(
        windower.window(&thread, "8"),
        window(&thread, "8", 2, Some(BOT))
    );
}

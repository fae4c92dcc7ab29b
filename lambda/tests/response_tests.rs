use sum_image::core::models::ImagePromptSuggestion;
use sum_image::slack::response_builder::{
    IMAGE_MESSAGE_PREFIX, create_ephemeral_payload, create_in_channel_payload,
    format_direct_reply, format_mention_reply, format_suggestion,
};

fn urls() -> Vec<String> {
    vec![
        "https://img.example/1.png".to_string(),
        "https://img.example/2.png".to_string(),
    ]
}

#[test]
fn test_ephemeral_payload() {
    let payload = create_ephemeral_payload("only you can see this");
    assert_eq!(payload["response_type"], "ephemeral");
    assert_eq!(payload["text"], "only you can see this");
}

#[test]
fn test_in_channel_payload() {
    let payload = create_in_channel_payload("> a fox\nhttps://img.example/1.png");
    assert_eq!(payload["response_type"], "in_channel");
    assert_eq!(payload["text"], "> a fox\nhttps://img.example/1.png");
}

#[test]
fn test_format_suggestion() {
    let suggestion = ImagePromptSuggestion {
        keywords: vec!["camping".into(), "lake".into()],
        prompt: "a tent beside a mountain lake".into(),
    };
    assert_eq!(
        format_suggestion(&suggestion),
        "Keywords: camping, lake\nPrompt: \"a tent beside a mountain lake\"\n"
    );
}

#[test]
fn test_mention_reply_with_suggestion() {
    let suggestion = ImagePromptSuggestion {
        keywords: vec!["camping".into()],
        prompt: "a tent".into(),
    };
    let reply = format_mention_reply(Some(&suggestion), &urls());
    assert_eq!(
        reply,
        ":frame_with_picture: Keywords: camping\nPrompt: \"a tent\"\n\
         https://img.example/1.png\nhttps://img.example/2.png"
    );
}

#[test]
fn test_mention_reply_without_suggestion() {
    let reply = format_mention_reply(None, &urls());
    assert_eq!(
        reply,
        ":frame_with_picture: https://img.example/1.png\nhttps://img.example/2.png"
    );
}

#[test]
fn test_mention_reply_without_images_is_just_the_prefix() {
    assert_eq!(format_mention_reply(None, &[]), IMAGE_MESSAGE_PREFIX);
}

#[test]
fn test_direct_reply_quotes_prompt() {
    let reply = format_direct_reply("a fox in the snow", &urls()[..1]);
    assert_eq!(reply, "> a fox in the snow\nhttps://img.example/1.png");
}

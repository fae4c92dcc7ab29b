use sum_image::slack::command_parser::{decode_url_component, parse_form_data};

#[test]
fn test_decode_url_component() {
    let decoded = decode_url_component("hello%20world").unwrap();
    assert_eq!(decoded, "hello world");

    let decoded_plus = decode_url_component("hello+world").unwrap();
    assert_eq!(decoded_plus, "hello world");

    let decoded_special = decode_url_component("test%40example.com%26param%3Dvalue").unwrap();
    assert_eq!(decoded_special, "test@example.com&param=value");
}

#[test]
fn test_decode_keeps_encoded_plus() {
    assert_eq!(decode_url_component("C%2B%2B+code").unwrap(), "C++ code");
}

#[test]
fn test_decode_rejects_invalid_utf8() {
    assert!(decode_url_component("%FF%FE").is_err());
}

#[test]
fn test_parse_form_data_success() {
    let form_data = "token=abc123&team_id=T123&team_domain=example&\
                    channel_id=C123&channel_name=general&user_id=U123&\
                    user_name=username&command=%2Fsum-image&text=&\
                    response_url=https%3A%2F%2Fhooks.slack.com%2Fcommands%2F1&\
                    trigger_id=123.456&api_app_id=A0BOT";

    let event = parse_form_data(form_data).unwrap();

    assert_eq!(event.team_id, "T123");
    assert_eq!(event.channel_id, "C123");
    assert_eq!(event.user_id, "U123");
    assert_eq!(event.command, "/sum-image");
    assert_eq!(event.text, "");
    assert_eq!(event.response_url, "https://hooks.slack.com/commands/1");
    assert_eq!(event.trigger_id, "123.456");
    assert_eq!(event.api_app_id, "A0BOT");
}

#[test]
fn test_parse_form_data_with_text() {
    let form_data = "channel_id=C123&user_id=U123&command=%2Fsum-image&\
                    text=a+cat+wearing+a+%22tiny%22+hat&\
                    response_url=https%3A%2F%2Fhooks.slack.com%2F";

    let event = parse_form_data(form_data).unwrap();

    assert_eq!(event.text, "a cat wearing a \"tiny\" hat");
}

#[test]
fn test_parse_form_data_missing_fields() {
    let incomplete_data = "token=abc123&team_id=T123";
    assert!(parse_form_data(incomplete_data).is_err());
}

#[test]
fn test_parse_form_data_ignores_unknown_keys() {
    let form_data = "channel_id=C1&user_id=U1&response_url=https%3A%2F%2Fx&\
                    enterprise_id=E1&is_enterprise_install=false&flag";

    let event = parse_form_data(form_data).unwrap();

    assert_eq!(event.channel_id, "C1");
    assert_eq!(event.team_id, "");
}

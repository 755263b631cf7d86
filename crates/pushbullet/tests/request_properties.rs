//! Property tests for request construction.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use proptest::prelude::*;
use pushbullet::{HttpPushbulletClient, PushForm, DEVICES_ENDPOINT, PUSHES_ENDPOINT};

fn body_of(request: &reqwest::Request) -> String {
    request
        .body()
        .and_then(reqwest::Body::as_bytes)
        .map(|b| String::from_utf8_lossy(b).into_owned())
        .unwrap_or_default()
}

fn decode(body: &str) -> Vec<(String, String)> {
    body.split('&')
        .filter(|p| !p.is_empty())
        .map(|p| {
            let (k, v) = p.split_once('=').unwrap_or((p, ""));
            let dec = |s: &str| {
                urlencoding::decode(&s.replace('+', " "))
                    .expect("valid utf-8")
                    .into_owned()
            };
            (dec(k), dec(v))
        })
        .collect()
}

proptest! {
    #[test]
    fn authorization_is_basic_key_colon(key in "[ -~]{0,64}", with_form in any::<bool>()) {
        let client = HttpPushbulletClient::new(key.clone());
        let form = PushForm::new().with("type", "note");
        let request = if with_form {
            client.build_request(PUSHES_ENDPOINT, Some(&form))
        } else {
            client.build_request(DEVICES_ENDPOINT, None)
        };

        let expected = format!("Basic {}", STANDARD.encode(format!("{key}:")));
        let actual = request.headers().get("authorization").expect("auth header");
        prop_assert_eq!(actual.to_str().expect("ascii"), expected.as_str());
    }

    #[test]
    fn form_body_round_trips_as_multiset(
        fields in proptest::collection::vec(("[a-z_]{1,8}", "\\PC{0,16}"), 0..8)
    ) {
        let form: PushForm = fields.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        let client = HttpPushbulletClient::new("key");
        let request = client.build_request(PUSHES_ENDPOINT, Some(&form));

        prop_assert_eq!(request.method().as_str(), "POST");
        prop_assert_eq!(
            request.headers().get("content-type").expect("content type").to_str().expect("ascii"),
            "application/x-www-form-urlencoded"
        );

        let mut sent = decode(&body_of(&request));
        let mut expected = fields.clone();
        sent.sort();
        expected.sort();
        prop_assert_eq!(sent, expected);
    }
}

#[test]
fn get_request_has_no_body() {
    let request = HttpPushbulletClient::new("key").build_request(DEVICES_ENDPOINT, None);
    assert_eq!(request.method().as_str(), "GET");
    assert!(body_of(&request).is_empty());
}

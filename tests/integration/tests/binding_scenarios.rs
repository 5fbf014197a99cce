use httpmock::prelude::*;
use serde_json::json;
use vrc_bind_integration_tests::IsolatedRuntime;
use vrc_bind_runtime::InboundMessage;

fn api_base(server: &MockServer) -> String {
    format!("{}/api/1", server.base_url())
}

#[tokio::test]
async fn integration_private_login_binds_account_and_profile_replays_session() {
    let server = MockServer::start();
    let login = server.mock(|when, then| {
        when.method(POST)
            .path("/api/1/auth/user")
            .header("authorization", "Basic YWxpY2U6c2VjcmV0");
        then.status(200)
            .header("set-cookie", "auth=authcookie_abc; Path=/; HttpOnly")
            .json_body(json!({"displayName": "Alice"}));
    });
    let profile = server.mock(|when, then| {
        when.method(GET)
            .path("/api/1/auth/user")
            .header("cookie", "auth=authcookie_abc");
        then.status(200).json_body(json!({
            "displayName": "Alice",
            "currentAvatarThumbnailImageUrl": "https://files.vrchat.cloud/a.png"
        }));
    });
    let mut fixture = IsolatedRuntime::new(&api_base(&server));

    let reply = fixture
        .runtime
        .handle_message(&InboundMessage::private("u1", "login vrc alice secret"))
        .await
        .expect("login");
    assert_eq!(
        reply.as_deref(),
        Some("登录成功！VRChat账号已与您的QQ账号绑定。")
    );
    assert_eq!(
        fixture.persisted_json(),
        json!({
            "u1": {
                "qqId": "u1",
                "vrcUsername": "alice",
                "cookies": ["auth=authcookie_abc; Path=/; HttpOnly"]
            }
        })
    );

    let reply = fixture
        .runtime
        .handle_message(&InboundMessage::private("u1", "我的vrc"))
        .await
        .expect("profile");
    assert_eq!(
        reply.as_deref(),
        Some("您的VRChat昵称：Alice\n[CQ:image,file=https://files.vrchat.cloud/a.png]")
    );
    login.assert_calls(1);
    profile.assert_calls(1);
}

#[tokio::test]
async fn integration_group_login_leaves_store_untouched_until_yes() {
    let server = MockServer::start();
    let login = server.mock(|when, then| {
        when.method(POST).path("/api/1/auth/user");
        then.status(200)
            .header("set-cookie", "auth=authcookie_grp; Path=/")
            .json_body(json!({}));
    });
    let mut fixture = IsolatedRuntime::new(&api_base(&server));

    let warning = fixture
        .runtime
        .handle_message(&InboundMessage::group("u1", "g1", "login vrc alice secret"))
        .await
        .expect("park");
    assert!(warning
        .as_deref()
        .is_some_and(|text| text.contains("回复 Yes")));
    login.assert_calls(0);
    assert!(!fixture.store_path.exists());

    fixture
        .runtime
        .handle_message(&InboundMessage::group("u1", "g1", "Yes"))
        .await
        .expect("confirm");
    login.assert_calls(1);
    assert_eq!(fixture.persisted_json()["u1"]["vrcUsername"], "alice");
}

#[tokio::test]
async fn integration_two_factor_scenario_completes_binding() {
    let server = MockServer::start();
    let login = server.mock(|when, then| {
        when.method(POST).path("/api/1/auth/user");
        then.status(200)
            .json_body(json!({"requiresTwoFactorAuth": true}));
    });
    let two_factor = server.mock(|when, then| {
        when.method(POST)
            .path("/api/1/auth/twofactor")
            .header("authorization", "Basic YWxpY2U6c2VjcmV0")
            .body_includes("\"code\":\"123456\"");
        then.status(200)
            .header("set-cookie", "twoFactorAuth=tfa_1; Path=/")
            .json_body(json!({"verified": true}));
    });
    let mut fixture = IsolatedRuntime::new(&api_base(&server));

    let prompt = fixture
        .runtime
        .handle_message(&InboundMessage::private("u1", "login vrc alice secret"))
        .await
        .expect("login");
    assert_eq!(
        prompt.as_deref(),
        Some("2FA验证已启用，请输入验证码：2fa <验证码>")
    );
    assert!(!fixture.store_path.exists());

    let reply = fixture
        .runtime
        .handle_message(&InboundMessage::private("u1", "2fa 123456"))
        .await
        .expect("2fa");
    assert_eq!(
        reply.as_deref(),
        Some("2FA验证成功，登录完成！VRChat账号已与您的QQ账号绑定。")
    );
    login.assert_calls(1);
    two_factor.assert_calls(1);
    assert_eq!(
        fixture.persisted_json()["u1"]["cookies"],
        json!(["twoFactorAuth=tfa_1; Path=/"])
    );
}

#[tokio::test]
async fn integration_invalid_credentials_are_reported_verbatim() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/1/auth/user");
        then.status(401).json_body(json!({
            "error": {"message": "Invalid Credentials", "status_code": 401}
        }));
    });
    let mut fixture = IsolatedRuntime::new(&api_base(&server));

    let reply = fixture
        .runtime
        .handle_message(&InboundMessage::private("u1", "login vrc alice wrong"))
        .await
        .expect("login");

    assert_eq!(reply.as_deref(), Some("登录失败：Invalid Credentials"));
    assert!(!fixture.store_path.exists());
}

#[tokio::test]
async fn integration_binding_is_reloaded_after_restart() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/1/auth/user");
        then.status(200)
            .header("set-cookie", "auth=authcookie_abc; Path=/")
            .json_body(json!({}));
    });
    let profile = server.mock(|when, then| {
        when.method(GET)
            .path("/api/1/auth/user")
            .header("cookie", "auth=authcookie_abc");
        then.status(200).json_body(json!({
            "displayName": "Alice",
            "currentAvatarThumbnailImageUrl": "https://files.vrchat.cloud/a.png"
        }));
    });
    let mut fixture = IsolatedRuntime::new(&api_base(&server));
    fixture
        .runtime
        .handle_message(&InboundMessage::private("u1", "login vrc alice secret"))
        .await
        .expect("login");

    let mut restarted = fixture.restart(&api_base(&server));
    assert_eq!(
        restarted.flow().store().get("u1"),
        fixture.runtime.flow().store().get("u1")
    );
    let reply = restarted
        .handle_message(&InboundMessage::private("u1", "我的vrc"))
        .await
        .expect("profile");
    assert!(reply
        .as_deref()
        .is_some_and(|text| text.starts_with("您的VRChat昵称：Alice")));
    profile.assert_calls(1);
}

//! Reply texts sent back to chat users.

use vrc_bind_api::{VrcApiError, VrcProfile};

pub(super) const GROUP_LOGIN_WARNING: &str =
    "在群聊内登陆VRChat账号可能会导致vrc账号密码泄露，确认继续登陆请回复 Yes，否则请回复 No。";
pub(super) const LOGIN_CANCELLED: &str = "已取消登录操作。";
pub(super) const TWO_FACTOR_PROMPT: &str = "2FA验证已启用，请输入验证码：2fa <验证码>";
pub(super) const LOGIN_SUCCEEDED: &str = "登录成功！VRChat账号已与您的QQ账号绑定。";
pub(super) const TWO_FACTOR_SUCCEEDED: &str =
    "2FA验证成功，登录完成！VRChat账号已与您的QQ账号绑定。";
pub(super) const TWO_FACTOR_WITHOUT_LOGIN: &str = "请先使用 \"login vrc\" 命令登录！";
pub(super) const PROFILE_WITHOUT_BINDING: &str =
    "您尚未登录VRChat账号，请先使用 \"login vrc\" 命令登录。";
pub(super) const LOGIN_USAGE: &str = "请提供用户名和密码，格式为：login vrc <用户名> <密码>";
pub(super) const TWO_FACTOR_USAGE: &str = "请提供验证码，格式为：2fa <验证码>";

pub(super) fn binding_command_usage() -> String {
    [
        "VRChat 账号绑定命令：",
        "- login vrc <用户名> <密码>  绑定VRChat账号（群聊内需回复 Yes 确认）",
        "- 2fa <验证码>  提交两步验证码",
        "- 我的vrc  查看已绑定的VRChat信息",
    ]
    .join("\n")
}

pub(super) fn render_login_failure(error: &VrcApiError) -> String {
    format!("登录失败：{}", error.user_message())
}

pub(super) fn render_two_factor_failure(error: &VrcApiError) -> String {
    format!("2FA验证失败：{}", error.user_message())
}

pub(super) fn render_profile_failure(error: &VrcApiError) -> String {
    format!("获取VRChat信息失败：{}", error.user_message())
}

/// Display name line followed by an inline CQ image of the avatar thumbnail.
pub(super) fn render_profile(profile: &VrcProfile) -> String {
    [
        format!("您的VRChat昵称：{}", profile.display_name),
        format!(
            "[CQ:image,file={}]",
            profile.current_avatar_thumbnail_image_url
        ),
    ]
    .join("\n")
}

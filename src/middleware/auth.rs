use reqwest::RequestBuilder;

use crate::session::SessionStore;

/// 有访问令牌时附加 `Authorization: Bearer`，没有时原样放行（登录等公开接口）
pub fn attach_token(request: RequestBuilder, session: &SessionStore) -> RequestBuilder {
    match session.access_token() {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

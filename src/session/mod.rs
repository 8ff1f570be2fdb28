use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// 登录接口返回的令牌对
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "bearer")]
    pub token_type: String,
}

fn bearer() -> String {
    "bearer".to_string()
}

/// 会话令牌存储。
///
/// 两个令牌以 cookie 的形式保存（`Secure`、`SameSite=Strict`），配置了文件路径时
/// 同步写入磁盘，启动时再读回。克隆出来的句柄共享同一份状态，由登录、刷新、
/// 登出三处写入。
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<SessionInner>>,
}

#[derive(Default)]
struct SessionInner {
    jar: BTreeMap<String, Cookie<'static>>,
    path: Option<PathBuf>,
}

impl SessionStore {
    /// 仅在内存中保存
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// 从 cookie 文件恢复会话；文件不存在时得到空会话
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let jar = match load_cookie_file(&path) {
            Ok(jar) => jar,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!("Failed to read cookie file {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        tracing::debug!("Loaded {} session cookies from {}", jar.len(), path.display());
        Self {
            inner: Arc::new(RwLock::new(SessionInner {
                jar,
                path: Some(path),
            })),
        }
    }

    pub fn set(&self, access_token: &str, refresh_token: &str) {
        self.write(|jar| {
            jar.insert(ACCESS_TOKEN_COOKIE.into(), session_cookie(ACCESS_TOKEN_COOKIE, access_token));
            jar.insert(REFRESH_TOKEN_COOKIE.into(), session_cookie(REFRESH_TOKEN_COOKIE, refresh_token));
        });
    }

    /// 刷新成功后只替换访问令牌
    pub fn set_access_token(&self, access_token: &str) {
        self.write(|jar| {
            jar.insert(ACCESS_TOKEN_COOKIE.into(), session_cookie(ACCESS_TOKEN_COOKIE, access_token));
        });
    }

    pub fn get(&self) -> Option<AuthTokens> {
        Some(AuthTokens {
            access_token: self.access_token()?,
            refresh_token: self.refresh_token()?,
            token_type: bearer(),
        })
    }

    pub fn access_token(&self) -> Option<String> {
        self.value(ACCESS_TOKEN_COOKIE)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.value(REFRESH_TOKEN_COOKIE)
    }

    pub fn clear(&self) {
        self.write(|jar| jar.clear());
    }

    /// 只看访问令牌是否存在，过期由 401 被动发现
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    /// 当前 cookie 的 `Set-Cookie` 表示
    pub fn cookies(&self) -> Vec<Cookie<'static>> {
        match self.inner.read() {
            Ok(inner) => inner.jar.values().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().jar.values().cloned().collect(),
        }
    }

    fn value(&self, name: &str) -> Option<String> {
        let inner = match self.inner.read() {
            Ok(inner) => inner,
            Err(poisoned) => poisoned.into_inner(),
        };
        inner
            .jar
            .get(name)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }

    fn write(&self, mutate: impl FnOnce(&mut BTreeMap<String, Cookie<'static>>)) {
        let mut inner = match self.inner.write() {
            Ok(inner) => inner,
            Err(poisoned) => poisoned.into_inner(),
        };
        mutate(&mut inner.jar);
        if let Some(path) = inner.path.clone() {
            if let Err(e) = save_cookie_file(&path, &inner.jar) {
                tracing::warn!("Failed to persist session cookies to {}: {}", path.display(), e);
            }
        }
    }
}

fn session_cookie(name: &'static str, value: &str) -> Cookie<'static> {
    Cookie::build((name, value.to_string()))
        .path("/")
        .secure(true)
        .same_site(SameSite::Strict)
        .build()
}

fn load_cookie_file(path: &Path) -> io::Result<BTreeMap<String, Cookie<'static>>> {
    let content = fs::read_to_string(path)?;
    let mut jar = BTreeMap::new();
    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match Cookie::parse(line.to_string()) {
            Ok(cookie) if cookie.name() == ACCESS_TOKEN_COOKIE || cookie.name() == REFRESH_TOKEN_COOKIE => {
                // 文件被手工修改时也保证属性不被降级
                let cookie = session_cookie(
                    if cookie.name() == ACCESS_TOKEN_COOKIE {
                        ACCESS_TOKEN_COOKIE
                    } else {
                        REFRESH_TOKEN_COOKIE
                    },
                    cookie.value(),
                );
                jar.insert(cookie.name().to_string(), cookie);
            }
            Ok(cookie) => tracing::debug!("Ignoring unknown cookie {}", cookie.name()),
            Err(e) => tracing::warn!("Skipping malformed cookie line: {}", e),
        }
    }
    Ok(jar)
}

fn save_cookie_file(path: &Path, jar: &BTreeMap<String, Cookie<'static>>) -> io::Result<()> {
    if jar.is_empty() {
        return match fs::remove_file(path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        };
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let body: Vec<String> = jar.values().map(|cookie| cookie.to_string()).collect();
    fs::write(path, body.join("\n") + "\n")
}

//! MusixMatch 用户令牌的获取与并发合并。
//!
//! 令牌长期有效，优先使用设置里持久化的值。没有令牌时向上游
//! 申请，同一时刻最多只有一个申请在途：并发调用共享同一个
//! 在途请求的结果，无论成功失败。请求结束后清除在途槽位，
//! 失败后的下一次调用会发起全新的申请。

use std::sync::Arc;

use futures::{
    FutureExt,
    future::{BoxFuture, Shared},
};
use parking_lot::Mutex;
use tracing::info;

use crate::{
    error::{LyricsError, Result},
    providers::LyricsCatalog,
    settings::SettingsProvider,
};

type TokenFuture = Shared<BoxFuture<'static, std::result::Result<String, String>>>;

/// 管理用户令牌的获取、持久化与并发合并。
pub struct CredentialManager {
    settings: Arc<dyn SettingsProvider>,
    catalog: Arc<dyn LyricsCatalog>,
    in_flight: Mutex<Option<TokenFuture>>,
}

impl CredentialManager {
    #[must_use]
    pub fn new(settings: Arc<dyn SettingsProvider>, catalog: Arc<dyn LyricsCatalog>) -> Self {
        Self {
            settings,
            catalog,
            in_flight: Mutex::new(None),
        }
    }

    /// 返回可用的用户令牌。
    ///
    /// 有持久化令牌时直接返回；否则合并到在途申请上，新令牌
    /// 会先写回设置再返回。申请失败映射为 [`LyricsError::Auth`]，
    /// 所有等待同一次申请的调用方收到相同的失败。
    pub async fn token(&self) -> Result<String> {
        if let Some(token) = self
            .settings
            .persisted_token()
            .filter(|token| !token.is_empty())
        {
            return Ok(token);
        }

        let fetch = {
            let mut slot = self.in_flight.lock();
            if let Some(existing) = slot.as_ref() {
                existing.clone()
            } else {
                info!("正在获取 MusixMatch 用户令牌...");
                let catalog = Arc::clone(&self.catalog);
                let settings = Arc::clone(&self.settings);
                let fut: TokenFuture = async move {
                    let token = catalog
                        .request_token()
                        .await
                        .map_err(|err| err.to_string())?;
                    settings.store_token(&token);
                    Ok(token)
                }
                .boxed()
                .shared();
                *slot = Some(fut.clone());
                fut
            }
        };

        let outcome = fetch.clone().await;

        {
            let mut slot = self.in_flight.lock();
            if slot.as_ref().is_some_and(|current| current.ptr_eq(&fetch)) {
                *slot = None;
            }
        }

        outcome.map_err(LyricsError::Auth)
    }
}

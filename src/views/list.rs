use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::client::ApiClient;
use crate::common::{Id, PaginatedResponse};
use crate::notify::{Notice, Notifier};
use crate::result::ApiResult;
use crate::utils::{PageMarker, page_count, page_window, showing_range};

/// 可分页列出的资源
pub trait Listable: DeserializeOwned + Clone + Send + Sync + 'static {
    /// 集合路径，例如 `/students`
    const COLLECTION: &'static str;

    fn id(&self) -> Id;
}

/// 一次已发出的列表请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    params: Vec<(&'static str, Option<String>)>,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn params(&self) -> &[(&'static str, Option<String>)] {
        &self.params
    }
}

/// 分页列表的视图状态：页码、搜索、过滤和当前数据。
///
/// 每次请求领取一个递增序号，只有最后发出的请求的结果会写回视图，
/// 较早的慢请求晚到时直接丢弃。
pub struct ListView<T> {
    items: Vec<T>,
    total: u64,
    page: u32,
    size: u32,
    search: String,
    filter_key: Option<&'static str>,
    filter: Option<String>,
    loading: bool,
    issued: u64,
    mounted: bool,
    notifier: Arc<dyn Notifier>,
}

impl<T: Listable> ListView<T> {
    pub fn new(size: u32, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            size: size.max(1),
            search: String::new(),
            filter_key: None,
            filter: None,
            loading: false,
            issued: 0,
            mounted: true,
            notifier,
        }
    }

    /// 额外的过滤参数名，例如发票的 `status`
    pub fn with_filter(mut self, key: &'static str) -> Self {
        self.filter_key = Some(key);
        self
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn pages(&self) -> u32 {
        page_count(self.total, self.size)
    }

    pub fn can_prev(&self) -> bool {
        self.page > 1
    }

    pub fn can_next(&self) -> bool {
        self.page < self.pages()
    }

    pub fn page_strip(&self) -> Vec<PageMarker> {
        page_window(self.page, self.pages())
    }

    pub fn showing_range(&self) -> Option<(u64, u64)> {
        showing_range(self.page, self.size, self.total)
    }

    /// 加载完成且没有数据时显示的提示
    pub fn empty_message(&self) -> Option<&'static str> {
        (!self.loading && self.items.is_empty()).then_some(super::EMPTY_MESSAGE)
    }

    /// 分页条只在加载完成且有数据时显示
    pub fn shows_pagination(&self) -> bool {
        !self.loading && self.total > 0
    }

    /// 修改搜索词会回到第一页
    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term != self.search {
            self.search = term;
            self.page = 1;
        }
    }

    /// 修改过滤条件会回到第一页，空字符串等同于不过滤
    pub fn set_filter(&mut self, value: Option<String>) {
        let value = value.filter(|v| !v.trim().is_empty());
        if value != self.filter {
            self.filter = value;
            self.page = 1;
        }
    }

    /// 只接受 1..=pages 范围内的页码
    pub fn set_page(&mut self, page: u32) -> bool {
        if page == 0 || page > self.pages() || page == self.page {
            return false;
        }
        self.page = page;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.can_next() && self.set_page(self.page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        self.can_prev() && self.set_page(self.page - 1)
    }

    pub fn query(&self) -> Vec<(&'static str, Option<String>)> {
        let mut params = vec![
            ("page", Some(self.page.to_string())),
            ("size", Some(self.size.to_string())),
            (
                "search",
                Some(self.search.trim().to_string()).filter(|s| !s.is_empty()),
            ),
        ];
        if let Some(key) = self.filter_key {
            params.push((key, self.filter.clone()));
        }
        params
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        self.loading = true;
        FetchTicket {
            seq: self.issued,
            params: self.query(),
        }
    }

    pub async fn fetch(client: &ApiClient, ticket: &FetchTicket) -> ApiResult<PaginatedResponse<T>> {
        client.get(T::COLLECTION, ticket.params()).await
    }

    /// 写回请求结果，返回是否被采用
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: ApiResult<PaginatedResponse<T>>,
    ) -> bool {
        if !self.mounted {
            tracing::debug!("Dropping {} response after unmount", T::COLLECTION);
            return false;
        }
        if ticket.seq != self.issued {
            tracing::debug!(
                "Dropping stale {} response #{} (latest #{})",
                T::COLLECTION,
                ticket.seq,
                self.issued
            );
            return false;
        }
        self.loading = false;
        match result {
            Ok(envelope) => {
                self.items = envelope.items;
                self.total = envelope.total;
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", T::COLLECTION, e);
                self.items.clear();
                self.total = 0;
                self.notifier.notify(Notice::from_error(&e));
            }
        }
        true
    }

    /// 按当前页码、搜索和过滤重新拉取
    pub async fn refresh(&mut self, client: &ApiClient) {
        let ticket = self.begin_fetch();
        let result = Self::fetch(client, &ticket).await;
        self.complete_fetch(&ticket, result);

        // 删除等操作之后当前页可能已经不存在
        let pages = self.pages();
        if pages > 0 && self.page > pages {
            self.page = pages;
            let ticket = self.begin_fetch();
            let result = Self::fetch(client, &ticket).await;
            self.complete_fetch(&ticket, result);
        }
    }

    pub async fn delete(&mut self, client: &ApiClient, id: Id) -> ApiResult<()> {
        let path = format!("{}/{}", T::COLLECTION, id);
        match client.delete(&path).await {
            Ok(()) => {
                self.notifier.notify(Notice::success("Record deleted"));
                self.refresh(client).await;
                Ok(())
            }
            Err(e) => {
                self.notifier.notify(Notice::from_error(&e));
                Err(e)
            }
        }
    }

    pub fn find(&self, id: Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// 离开页面后到达的结果一律忽略
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.loading = false;
    }
}

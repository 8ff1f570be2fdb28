use std::sync::Arc;

use crate::client::ApiClient;
use crate::common::Id;
use crate::notify::Notifier;
use crate::result::ApiResult;

use super::form::{Editable, ModalForm};
use super::list::ListView;

/// 列表 + 弹窗表单的实体页面（学生、教师）
pub struct EntityPage<T: Editable> {
    pub list: ListView<T>,
    pub modal: ModalForm<T>,
}

impl<T: Editable> EntityPage<T> {
    pub fn new(page_size: u32, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            list: ListView::new(page_size, notifier.clone()),
            modal: ModalForm::new(notifier),
        }
    }

    pub async fn load(&mut self, client: &ApiClient) {
        self.list.refresh(client).await;
    }

    pub async fn search(&mut self, client: &ApiClient, term: &str) {
        self.list.set_search(term);
        self.list.refresh(client).await;
    }

    pub async fn go_to_page(&mut self, client: &ApiClient, page: u32) -> bool {
        if !self.list.set_page(page) {
            return false;
        }
        self.list.refresh(client).await;
        true
    }

    pub fn open_create(&mut self) {
        self.modal.open_create();
    }

    /// 从当前页中找到实体并预填表单
    pub fn open_edit(&mut self, id: Id) -> bool {
        match self.list.find(id) {
            Some(entity) => {
                let entity = entity.clone();
                self.modal.open_edit(&entity);
                true
            }
            None => false,
        }
    }

    /// 提交成功后总是重新拉取，让服务端计算的字段生效
    pub async fn submit(&mut self, client: &ApiClient) -> ApiResult<T> {
        let saved = self.modal.submit(client).await?;
        self.list.refresh(client).await;
        Ok(saved)
    }

    pub async fn delete(&mut self, client: &ApiClient, id: Id) -> ApiResult<()> {
        self.list.delete(client, id).await
    }
}

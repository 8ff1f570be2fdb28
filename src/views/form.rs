use std::sync::Arc;

use serde::Serialize;

use crate::client::ApiClient;
use crate::error::{ApiError, ValidationErrors};
use crate::notify::{Notice, Notifier};
use crate::result::ApiResult;

use super::list::Listable;

pub const REQUIRED: &str = "Required";

/// 弹窗表单绑定的数据
pub trait FormModel: Serialize + Default + Clone + Send {
    /// 必填字段名及其是否已填写
    fn required_fields(&self) -> Vec<(&'static str, bool)>;

    fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        for (field, filled) in self.required_fields() {
            if !filled {
                errors.add(field, REQUIRED);
            }
        }
        errors
    }
}

/// 字符串字段是否已填写（去掉空白后非空）
pub fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

/// 可新建、编辑的资源
pub trait Editable: Listable {
    type Form: FormModel;

    /// 提示文案里的名词，例如 "Student"
    const NOUN: &'static str;

    fn to_form(&self) -> Self::Form;
}

/// 新建/编辑弹窗。校验不通过时不发请求；提交失败时保持打开以便修改。
pub struct ModalForm<T: Editable> {
    open: bool,
    editing: Option<T>,
    form: T::Form,
    errors: ValidationErrors,
    saving: bool,
    notifier: Arc<dyn Notifier>,
}

impl<T: Editable> ModalForm<T> {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            open: false,
            editing: None,
            form: T::Form::default(),
            errors: ValidationErrors::default(),
            saving: false,
            notifier,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn editing(&self) -> Option<&T> {
        self.editing.as_ref()
    }

    pub fn form(&self) -> &T::Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut T::Form {
        &mut self.form
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn saving(&self) -> bool {
        self.saving
    }

    pub fn title(&self) -> String {
        if self.editing.is_some() {
            format!("Edit {}", T::NOUN)
        } else {
            format!("Add {}", T::NOUN)
        }
    }

    pub fn open_create(&mut self) {
        self.editing = None;
        self.form = T::Form::default();
        self.errors = ValidationErrors::default();
        self.open = true;
    }

    pub fn open_edit(&mut self, entity: &T) {
        self.form = entity.to_form();
        self.editing = Some(entity.clone());
        self.errors = ValidationErrors::default();
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.saving = false;
    }

    /// 新建发 POST，编辑发 PUT；成功后关闭弹窗，由调用方重新拉取列表
    pub async fn submit(&mut self, client: &ApiClient) -> ApiResult<T> {
        let errors = self.form.validate();
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Err(ApiError::Validation(errors));
        }
        self.errors = ValidationErrors::default();

        self.saving = true;
        let result = match &self.editing {
            Some(entity) => {
                let path = format!("{}/{}", T::COLLECTION, entity.id());
                client.put::<_, T>(&path, &self.form).await
            }
            None => client.post::<_, T>(T::COLLECTION, &self.form).await,
        };
        self.saving = false;

        match result {
            Ok(saved) => {
                let verb = if self.editing.is_some() { "updated" } else { "created" };
                self.notifier
                    .notify(Notice::success(format!("{} {}", T::NOUN, verb)));
                self.close();
                Ok(saved)
            }
            Err(e) => {
                self.notifier.notify(Notice::from_error(&e));
                Err(e)
            }
        }
    }
}

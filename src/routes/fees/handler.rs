use std::sync::Arc;

use chrono::Local;

use crate::client::ApiClient;
use crate::common::Id;
use crate::error::{ApiError, ValidationErrors};
use crate::notify::{Notice, Notifier};
use crate::result::ApiResult;
use crate::utils::format_inr;
use crate::views::ListView;

use super::model::{Invoice, InvoiceStatus, Payment, PaymentForm, validate_payment};

/// 当前页发票的汇总
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeStats {
    pub total_due: f64,
    pub total_collected: f64,
    pub overdue: usize,
}

impl FeeStats {
    pub fn from_invoices(invoices: &[Invoice]) -> Self {
        Self {
            total_due: invoices.iter().map(|i| i.due_amount).sum(),
            total_collected: invoices.iter().map(|i| i.paid_amount).sum(),
            overdue: invoices
                .iter()
                .filter(|i| i.status == InvoiceStatus::Overdue)
                .count(),
        }
    }

    /// 统计卡片上的文字：(已收, 欠款, 逾期张数)
    pub fn display(&self) -> (String, String, String) {
        (
            format_inr(self.total_collected),
            format_inr(self.total_due),
            self.overdue.to_string(),
        )
    }
}

/// 收款弹窗
#[derive(Debug, Clone)]
pub struct PaymentModal {
    pub invoice: Invoice,
    pub form: PaymentForm,
    pub errors: ValidationErrors,
    pub saving: bool,
}

impl PaymentModal {
    pub fn title(&self) -> String {
        format!("Record Payment: {}", self.invoice.student_name)
    }
}

/// 收费页：发票列表（搜索 + 状态过滤）和收款弹窗
pub struct FeesPage {
    pub list: ListView<Invoice>,
    payment: Option<PaymentModal>,
    notifier: Arc<dyn Notifier>,
}

impl FeesPage {
    pub fn new(page_size: u32, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            list: ListView::new(page_size, notifier.clone()).with_filter("status"),
            payment: None,
            notifier,
        }
    }

    pub async fn load(&mut self, client: &ApiClient) {
        self.list.refresh(client).await;
    }

    pub async fn search(&mut self, client: &ApiClient, term: &str) {
        self.list.set_search(term);
        self.list.refresh(client).await;
    }

    pub async fn filter_status(&mut self, client: &ApiClient, status: Option<InvoiceStatus>) {
        self.list
            .set_filter(status.map(|s| s.as_str().to_string()));
        self.list.refresh(client).await;
    }

    pub async fn go_to_page(&mut self, client: &ApiClient, page: u32) -> bool {
        if !self.list.set_page(page) {
            return false;
        }
        self.list.refresh(client).await;
        true
    }

    pub fn stats(&self) -> FeeStats {
        FeeStats::from_invoices(self.list.items())
    }

    pub fn payment(&self) -> Option<&PaymentModal> {
        self.payment.as_ref()
    }

    pub fn payment_form_mut(&mut self) -> Option<&mut PaymentForm> {
        self.payment.as_mut().map(|modal| &mut modal.form)
    }

    /// 已付清的发票不能再收款
    pub fn open_payment(&mut self, invoice_id: Id) -> bool {
        let Some(invoice) = self.list.find(invoice_id).filter(|i| i.is_payable()) else {
            return false;
        };
        let form = PaymentForm::for_invoice(invoice, Local::now().date_naive());
        self.payment = Some(PaymentModal {
            invoice: invoice.clone(),
            form,
            errors: ValidationErrors::default(),
            saving: false,
        });
        true
    }

    pub fn close_payment(&mut self) {
        self.payment = None;
    }

    /// 金额不合法时不发请求；成功后关闭弹窗并刷新列表
    pub async fn submit_payment(&mut self, client: &ApiClient) -> ApiResult<Payment> {
        let Some(modal) = self.payment.as_mut() else {
            return Err(ApiError::invalid("invoice_id", "No invoice selected"));
        };

        let errors = validate_payment(&modal.form, modal.invoice.due_amount);
        if !errors.is_empty() {
            modal.errors = errors.clone();
            return Err(ApiError::Validation(errors));
        }
        modal.errors = ValidationErrors::default();
        modal.form.invoice_id = modal.invoice.id;

        modal.saving = true;
        let result = modal.form.record(client).await;
        modal.saving = false;

        match result {
            Ok(payment) => {
                tracing::info!(
                    "Recorded payment of {} for invoice {}",
                    payment.amount,
                    payment.invoice_id
                );
                self.notifier.notify(Notice::success("Payment recorded"));
                self.payment = None;
                self.list.refresh(client).await;
                Ok(payment)
            }
            Err(e) => {
                self.notifier.notify(Notice::from_error(&e));
                Err(e)
            }
        }
    }
}

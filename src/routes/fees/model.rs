use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::common::{Id, number, optional_number};
use crate::error::ValidationErrors;
use crate::result::ApiResult;
use crate::views::{BadgeVariant, Listable, REQUIRED, fee_status_badge};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InvoiceStatus {
    Pending,
    Partial,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 4] = [
        InvoiceStatus::Pending,
        InvoiceStatus::Partial,
        InvoiceStatus::Paid,
        InvoiceStatus::Overdue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Partial => "Partial",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Overdue => "Overdue",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    #[default]
    Cash,
    #[serde(rename = "UPI")]
    Upi,
    Card,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    pub id: Id,
    pub school_id: Id,
    #[serde(default)]
    pub invoice_number: Option<String>,
    pub student_id: Id,
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub admission_number: String,
    #[serde(default)]
    pub academic_year_id: Option<Id>,
    #[serde(deserialize_with = "number")]
    pub total_amount: f64,
    #[serde(deserialize_with = "number")]
    pub paid_amount: f64,
    /// 服务端计算的 total − paid，客户端直接采用
    #[serde(deserialize_with = "number")]
    pub due_amount: f64,
    pub status: InvoiceStatus,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Invoice {
    pub fn is_payable(&self) -> bool {
        self.status != InvoiceStatus::Paid
    }

    pub fn badge(&self) -> BadgeVariant {
        fee_status_badge(self.status)
    }
}

impl Listable for Invoice {
    const COLLECTION: &'static str = "/fees/invoices";

    fn id(&self) -> Id {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: Id,
    pub invoice_id: Id,
    #[serde(default)]
    pub student_id: Option<Id>,
    #[serde(deserialize_with = "number")]
    pub amount: f64,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub receipt_number: Option<String>,
    #[serde(default, alias = "payment_date")]
    pub paid_at: Option<String>,
}

/// 收款表单
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PaymentForm {
    pub invoice_id: Id,
    #[serde(default, deserialize_with = "optional_number")]
    pub amount: Option<f64>,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

impl PaymentForm {
    pub fn for_invoice(invoice: &Invoice, today: NaiveDate) -> Self {
        Self {
            invoice_id: invoice.id,
            amount: None,
            payment_method: PaymentMethod::Cash,
            payment_date: Some(today),
            transaction_id: None,
        }
    }

    pub async fn record(&self, client: &ApiClient) -> ApiResult<Payment> {
        client.post("/fees/payment", self).await
    }
}

/// 金额必须满足 0 < amount ≤ due_amount，等于欠款时允许
pub fn validate_payment(form: &PaymentForm, due_amount: f64) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    match form.amount {
        None => errors.add("amount", REQUIRED),
        Some(amount) if !amount.is_finite() || amount <= 0.0 => {
            errors.add("amount", "Must be > 0")
        }
        Some(amount) if amount > due_amount => errors.add("amount", "Cannot exceed due amount"),
        Some(_) => {}
    }
    if form
        .transaction_id
        .as_deref()
        .is_some_and(|id| id.trim().is_empty())
    {
        errors.add("transaction_id", "Leave empty or enter a transaction id");
    }
    errors
}

mod test_support;

use dashboard::error::ApiError;
use dashboard::routes::fees::{InvoiceStatus, PaymentMethod};
use dashboard::views::BadgeVariant;
use reqwest::Method;
use serde_json::json;
use test_support::{Harness, envelope};

fn invoices() -> serde_json::Value {
    json!([
        {"id": 1, "school_id": 1, "invoice_number": "INV-001", "student_id": 1,
         "student_name": "Asha", "admission_number": "ADM001",
         "total_amount": "12000.00", "paid_amount": "2000.00", "due_amount": "10000.00",
         "status": "Partial", "due_date": "2025-01-31"},
        {"id": 2, "school_id": 1, "invoice_number": "INV-002", "student_id": 2,
         "student_name": "Kiran", "admission_number": "ADM002",
         "total_amount": 8000, "paid_amount": 8000, "due_amount": 0,
         "status": "Paid", "due_date": "2025-01-31"},
        {"id": 3, "school_id": 1, "invoice_number": "INV-003", "student_id": 3,
         "student_name": "Meera", "admission_number": "ADM003",
         "total_amount": 5000, "paid_amount": 0, "due_amount": 5000,
         "status": "Overdue", "due_date": "2024-12-31"}
    ])
}

async fn loaded() -> (Harness, dashboard::routes::fees::FeesPage) {
    let h = Harness::signed_in().await;
    h.backend
        .stub(Method::GET, "/fees/invoices", 200, envelope(invoices(), 3, 1, 10));
    let mut page = h.state.fees();
    page.load(&h.state.client).await;
    (h, page)
}

#[tokio::test]
async fn stats_summarize_loaded_page() {
    let (_h, page) = loaded().await;

    let stats = page.stats();
    assert_eq!(stats.total_due, 15000.0);
    assert_eq!(stats.total_collected, 10000.0);
    assert_eq!(stats.overdue, 1);
    assert_eq!(
        stats.display(),
        ("₹10,000".to_string(), "₹15,000".to_string(), "1".to_string())
    );
}

#[tokio::test]
async fn status_filter_is_sent_and_resets_page() {
    let (h, mut page) = loaded().await;

    page.filter_status(&h.state.client, Some(InvoiceStatus::Overdue)).await;
    page.filter_status(&h.state.client, None).await;

    let hits = h.backend.hits_for(Method::GET, "/fees/invoices");
    assert_eq!(hits.len(), 3);
    assert!(hits[1].query_has("status", "Overdue"));
    assert!(hits[1].query_has("page", "1"));
    assert!(!hits[2].query.clone().unwrap_or_default().contains("status"));
}

#[tokio::test]
async fn paid_invoice_cannot_open_payment() {
    let (_h, mut page) = loaded().await;

    assert_eq!(page.list.find(3).unwrap().badge(), BadgeVariant::Danger);
    assert!(!page.open_payment(2));
    assert!(!page.open_payment(42));
    assert!(page.open_payment(1));
    let modal = page.payment().unwrap();
    assert_eq!(modal.invoice.id, 1);
    assert_eq!(modal.form.payment_method, PaymentMethod::Cash);
}

#[tokio::test]
async fn payment_above_due_sends_nothing() {
    let (h, mut page) = loaded().await;
    page.open_payment(1);
    page.payment_form_mut().unwrap().amount = Some(10000.01);

    let err = page.submit_payment(&h.state.client).await.unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(
        page.payment().unwrap().errors.get("amount"),
        Some("Cannot exceed due amount")
    );
    assert_eq!(h.backend.count(Method::POST, "/fees/payment"), 0);

    page.payment_form_mut().unwrap().amount = Some(0.0);
    assert!(page.submit_payment(&h.state.client).await.is_err());
    assert_eq!(page.payment().unwrap().errors.get("amount"), Some("Must be > 0"));
    assert_eq!(h.backend.count(Method::POST, "/fees/payment"), 0);
}

#[tokio::test]
async fn full_due_payment_is_recorded_and_list_refetched() {
    let (h, mut page) = loaded().await;
    h.backend.stub(
        Method::POST,
        "/fees/payment",
        201,
        json!({"id": 9, "invoice_id": 1, "amount": "10000.00", "payment_method": "UPI",
               "transaction_id": "UPI-123", "receipt_number": "RCP-9"}),
    );
    page.open_payment(1);
    {
        let form = page.payment_form_mut().unwrap();
        form.amount = Some(10000.0);
        form.payment_method = PaymentMethod::Upi;
        form.transaction_id = Some("UPI-123".into());
    }

    let payment = page.submit_payment(&h.state.client).await.unwrap();

    assert_eq!(payment.amount, 10000.0);
    assert!(page.payment().is_none());
    let posted = &h.backend.hits_for(Method::POST, "/fees/payment")[0];
    assert_eq!(posted.body["invoice_id"], 1);
    assert_eq!(posted.body["amount"], 10000.0);
    assert_eq!(posted.body["payment_method"], "UPI");
    assert_eq!(h.backend.count(Method::GET, "/fees/invoices"), 2);
    assert_eq!(h.notices.last().unwrap().message, "Payment recorded");
}

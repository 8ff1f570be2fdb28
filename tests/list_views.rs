mod test_support;

use chrono::NaiveDate;
use dashboard::error::ApiError;
use dashboard::notify::NoticeLevel;
use dashboard::routes::student::Gender;
use dashboard::utils::PageMarker;
use reqwest::Method;
use serde_json::json;
use test_support::{Harness, envelope, student};

fn ten_students() -> serde_json::Value {
    let items: Vec<_> = (1..=10).map(|id| student(id, &format!("Student {}", id))).collect();
    json!(items)
}

#[tokio::test]
async fn pagination_follows_total_and_size() {
    let h = Harness::signed_in().await;
    h.backend
        .stub(Method::GET, "/students", 200, envelope(ten_students(), 25, 1, 10));
    let mut page = h.state.students();

    page.load(&h.state.client).await;

    assert_eq!(page.list.items().len(), 10);
    assert_eq!(page.list.items()[0].status_badge().1, "Active");
    assert_eq!(page.list.pages(), 3);
    assert_eq!(page.list.showing_range(), Some((1, 10)));
    assert!(page.list.shows_pagination());
    assert!(!page.list.can_prev());
    assert_eq!(
        page.list.page_strip(),
        vec![PageMarker::Page(1), PageMarker::Page(2), PageMarker::Page(3)]
    );

    assert!(page.go_to_page(&h.state.client, 3).await);
    assert!(!page.list.can_next());
    assert!(!page.go_to_page(&h.state.client, 4).await);

    let hits = h.backend.hits_for(Method::GET, "/students");
    assert_eq!(hits.len(), 2);
    assert!(hits[0].query_has("page", "1"));
    assert!(hits[0].query_has("size", "10"));
    assert!(hits[1].query_has("page", "3"));
}

#[tokio::test]
async fn search_resets_to_first_page() {
    let h = Harness::signed_in().await;
    h.backend
        .stub(Method::GET, "/students", 200, envelope(ten_students(), 25, 1, 10));
    let mut page = h.state.students();
    page.load(&h.state.client).await;
    page.go_to_page(&h.state.client, 2).await;

    page.search(&h.state.client, "ravi").await;

    assert_eq!(page.list.page(), 1);
    let last = h.backend.hits_for(Method::GET, "/students").pop().unwrap();
    assert!(last.query_has("page", "1"));
    assert!(last.query_has("search", "ravi"));
}

#[tokio::test]
async fn empty_search_is_not_sent() {
    let h = Harness::signed_in().await;
    h.backend
        .stub(Method::GET, "/teachers", 200, envelope(json!([]), 0, 1, 10));
    let mut page = h.state.teachers();

    page.search(&h.state.client, "   ").await;

    let hit = h.backend.hits_for(Method::GET, "/teachers").pop().unwrap();
    assert!(!hit.query.unwrap_or_default().contains("search"));
    assert!(page.list.is_empty());
    assert_eq!(page.list.empty_message(), Some("No records found"));
    assert!(!page.list.shows_pagination());
}

#[tokio::test]
async fn load_failure_shows_empty_table_and_notice() {
    let h = Harness::signed_in().await;
    h.backend.stub(
        Method::GET,
        "/teachers",
        403,
        json!({"detail": "Insufficient permissions"}),
    );
    let mut page = h.state.teachers();

    page.load(&h.state.client).await;

    assert!(page.list.is_empty());
    assert!(!page.list.loading());
    assert_eq!(h.notices.errors(), vec!["Insufficient permissions".to_string()]);
}

#[tokio::test]
async fn invalid_form_sends_nothing() {
    let h = Harness::signed_in().await;
    let mut page = h.state.students();

    page.open_create();
    page.modal.form_mut().full_name = "Asha Rao".into();
    let err = page.submit(&h.state.client).await.unwrap_err();

    let ApiError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert_eq!(errors.get("admission_number"), Some("Required"));
    assert_eq!(errors.get("full_name"), None);
    assert!(page.modal.is_open());
    assert_eq!(page.modal.errors().len(), 3);
    assert!(h.backend.hits().is_empty());
}

#[tokio::test]
async fn create_posts_then_refetches() {
    let h = Harness::signed_in().await;
    h.backend.stub(Method::POST, "/students", 201, student(11, "Asha Rao"));
    h.backend
        .stub(Method::GET, "/students", 200, envelope(json!([student(11, "Asha Rao")]), 1, 1, 10));
    let mut page = h.state.students();

    page.open_create();
    assert_eq!(page.modal.title(), "Add Student");
    {
        let form = page.modal.form_mut();
        form.admission_number = "ADM011".into();
        form.full_name = "Asha Rao".into();
        form.date_of_birth = NaiveDate::from_ymd_opt(2012, 4, 1);
        form.gender = Some(Gender::Female);
    }
    let saved = page.submit(&h.state.client).await.unwrap();

    assert_eq!(saved.id, 11);
    assert!(!page.modal.is_open());
    assert_eq!(page.list.items().len(), 1);
    let posted = &h.backend.hits_for(Method::POST, "/students")[0];
    assert_eq!(posted.body["full_name"], "Asha Rao");
    assert_eq!(posted.body["gender"], "Female");
    assert_eq!(h.backend.count(Method::GET, "/students"), 1);
    assert_eq!(h.notices.last().unwrap().message, "Student created");
}

#[tokio::test]
async fn edit_puts_to_entity_path() {
    let h = Harness::signed_in().await;
    h.backend
        .stub(Method::GET, "/students", 200, envelope(json!([student(4, "Kiran")]), 1, 1, 10));
    h.backend.stub(Method::PUT, "/students/4", 200, student(4, "Kiran Das"));
    let mut page = h.state.students();
    page.load(&h.state.client).await;

    assert!(page.open_edit(4));
    assert!(!page.open_edit(99));
    assert_eq!(page.modal.title(), "Edit Student");
    assert_eq!(page.modal.form().full_name, "Kiran");
    page.modal.form_mut().full_name = "Kiran Das".into();

    page.submit(&h.state.client).await.unwrap();

    let put = &h.backend.hits_for(Method::PUT, "/students/4")[0];
    assert_eq!(put.body["full_name"], "Kiran Das");
    assert_eq!(h.backend.count(Method::GET, "/students"), 2);
    assert_eq!(h.notices.last().unwrap().message, "Student updated");
}

#[tokio::test]
async fn failed_save_keeps_modal_open() {
    let h = Harness::signed_in().await;
    h.backend.stub(
        Method::POST,
        "/students",
        400,
        json!({"detail": "Admission number already exists"}),
    );
    let mut page = h.state.students();
    page.open_create();
    {
        let form = page.modal.form_mut();
        form.admission_number = "ADM001".into();
        form.full_name = "Asha Rao".into();
        form.date_of_birth = NaiveDate::from_ymd_opt(2012, 4, 1);
        form.gender = Some(Gender::Female);
    }

    assert!(page.submit(&h.state.client).await.is_err());

    assert!(page.modal.is_open());
    assert!(!page.modal.saving());
    let notice = h.notices.last().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, "Admission number already exists");
    assert_eq!(h.backend.count(Method::GET, "/students"), 0);
}

#[tokio::test]
async fn delete_refetches_list() {
    let h = Harness::signed_in().await;
    h.backend
        .stub(Method::GET, "/teachers", 200, envelope(json!([]), 0, 1, 10));
    h.backend.stub(Method::DELETE, "/teachers/2", 204, serde_json::Value::Null);
    let mut page = h.state.teachers();

    page.delete(&h.state.client, 2).await.unwrap();

    assert_eq!(h.backend.count(Method::DELETE, "/teachers/2"), 1);
    assert_eq!(h.backend.count(Method::GET, "/teachers"), 1);
}

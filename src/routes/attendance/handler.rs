use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::client::ApiClient;
use crate::common::Id;
use crate::error::ApiError;
use crate::notify::{Notice, Notifier};
use crate::result::ApiResult;
use crate::routes::class::Class;
use crate::routes::student::Student;

use super::model::{AttendanceMarkRequest, AttendanceReport, AttendanceRow, AttendanceStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Mark,
    Report,
}

/// 点名页：选班级和日期，加载名单，逐个或整体设置状态后一次提交
pub struct AttendancePage {
    classes: Vec<Class>,
    class_id: Option<Id>,
    date: NaiveDate,
    rows: Vec<AttendanceRow>,
    report: Vec<AttendanceReport>,
    tab: Tab,
    saving: bool,
    loading_roster: bool,
    roster_size: u32,
    notifier: Arc<dyn Notifier>,
}

impl AttendancePage {
    pub const NO_STUDENTS: &'static str = "Select a class and click Load Students";
    pub const NO_REPORT: &'static str = "Load a report to see attendance summary";

    pub fn new(roster_size: u32, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            classes: Vec::new(),
            class_id: None,
            date: Local::now().date_naive(),
            rows: Vec::new(),
            report: Vec::new(),
            tab: Tab::Mark,
            saving: false,
            loading_roster: false,
            roster_size,
            notifier,
        }
    }

    pub fn classes(&self) -> &[Class] {
        &self.classes
    }

    pub fn class_id(&self) -> Option<Id> {
        self.class_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn rows(&self) -> &[AttendanceRow] {
        &self.rows
    }

    pub fn report(&self) -> &[AttendanceReport] {
        &self.report
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn saving(&self) -> bool {
        self.saving
    }

    pub fn loading_roster(&self) -> bool {
        self.loading_roster
    }

    /// 各状态的人数，顺序同 [`AttendanceStatus::ALL`]
    pub fn tally(&self) -> [(AttendanceStatus, usize); 4] {
        AttendanceStatus::ALL.map(|status| {
            (status, self.rows.iter().filter(|r| r.status == status).count())
        })
    }

    pub async fn load_classes(&mut self, client: &ApiClient) {
        match Class::list(client).await {
            Ok(classes) => self.classes = classes,
            Err(e) => {
                tracing::warn!("Failed to load classes: {}", e);
                self.classes.clear();
                self.notifier.notify(Notice::from_error(&e));
            }
        }
    }

    /// 换班级时清空已加载的名单和报表
    pub fn select_class(&mut self, class_id: Option<Id>) {
        if self.class_id == class_id {
            return;
        }
        self.class_id = class_id;
        self.rows.clear();
        self.report.clear();
    }

    pub fn set_date(&mut self, date: NaiveDate) -> ApiResult<()> {
        if date > Local::now().date_naive() {
            let e = ApiError::invalid("date", "Date cannot be in the future");
            self.notifier.notify(Notice::from_error(&e));
            return Err(e);
        }
        self.date = date;
        Ok(())
    }

    fn require_class(&self) -> ApiResult<Id> {
        self.class_id.ok_or_else(|| {
            let e = ApiError::invalid("class_id", "Select a class first");
            self.notifier.notify(Notice::from_error(&e));
            e
        })
    }

    /// 名单里所有学生默认 Present
    pub async fn load_roster(&mut self, client: &ApiClient) -> ApiResult<()> {
        let class_id = self.require_class()?;

        self.loading_roster = true;
        let result = Student::roster(client, class_id, self.roster_size).await;
        self.loading_roster = false;

        match result {
            Ok(students) => {
                tracing::debug!("Loaded {} students for class {}", students.len(), class_id);
                self.rows = students.into_iter().map(AttendanceRow::from).collect();
                Ok(())
            }
            Err(e) => {
                self.rows.clear();
                self.notifier.notify(Notice::from_error(&e));
                Err(e)
            }
        }
    }

    pub fn set_status(&mut self, student_id: Id, status: AttendanceStatus) -> bool {
        match self.rows.iter_mut().find(|r| r.student_id == student_id) {
            Some(row) => {
                row.status = status;
                true
            }
            None => false,
        }
    }

    pub fn mark_all(&mut self, status: AttendanceStatus) {
        for row in &mut self.rows {
            row.status = status;
        }
    }

    pub async fn submit(&mut self, client: &ApiClient) -> ApiResult<()> {
        if self.rows.is_empty() {
            let e = ApiError::invalid("records", "No students loaded");
            self.notifier.notify(Notice::from_error(&e));
            return Err(e);
        }
        let class_id = self.require_class()?;
        let request = AttendanceMarkRequest::from_rows(class_id, self.date, &self.rows);

        self.saving = true;
        let result = request.send(client).await;
        self.saving = false;

        match result {
            Ok(_) => {
                tracing::info!(
                    "Saved attendance for class {} on {} ({} students)",
                    class_id,
                    self.date,
                    request.records.len()
                );
                self.notifier
                    .notify(Notice::success("Attendance saved successfully"));
                Ok(())
            }
            Err(e) => {
                self.notifier.notify(Notice::from_error(&e));
                Err(e)
            }
        }
    }

    /// 成功后切换到报表页签；点名数据保留
    pub async fn load_report(&mut self, client: &ApiClient) -> ApiResult<()> {
        let class_id = self.require_class()?;
        match AttendanceReport::for_class(client, class_id).await {
            Ok(report) => {
                self.report = report;
                self.tab = Tab::Report;
                Ok(())
            }
            Err(e) => {
                self.notifier.notify(Notice::from_error(&e));
                Err(e)
            }
        }
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn low_attendance(&self) -> impl Iterator<Item = &AttendanceReport> {
        self.report.iter().filter(|r| r.is_low())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NoticeLog;

    fn page() -> (AttendancePage, Arc<NoticeLog>) {
        let log = Arc::new(NoticeLog::default());
        (AttendancePage::new(200, log.clone()), log)
    }

    fn row(id: Id) -> AttendanceRow {
        AttendanceRow {
            student_id: id,
            student_name: format!("Student {}", id),
            admission_number: format!("A{}", id),
            status: AttendanceStatus::Present,
        }
    }

    #[test]
    fn future_date_is_rejected() {
        let (mut page, log) = page();
        let today = page.date();
        let tomorrow = today.succ_opt().unwrap();
        assert!(page.set_date(tomorrow).is_err());
        assert_eq!(page.date(), today);
        assert_eq!(log.errors(), vec!["Date cannot be in the future".to_string()]);

        let yesterday = today.pred_opt().unwrap();
        assert!(page.set_date(yesterday).is_ok());
        assert_eq!(page.date(), yesterday);
    }

    #[test]
    fn status_changes_and_tally() {
        let (mut page, _) = page();
        page.select_class(Some(1));
        page.rows = vec![row(1), row(2), row(3)];

        assert!(page.set_status(2, AttendanceStatus::Absent));
        assert!(!page.set_status(99, AttendanceStatus::Late));
        assert_eq!(page.tally()[0], (AttendanceStatus::Present, 2));
        assert_eq!(page.tally()[1], (AttendanceStatus::Absent, 1));

        page.mark_all(AttendanceStatus::Late);
        assert!(page.rows().iter().all(|r| r.status == AttendanceStatus::Late));
    }

    #[test]
    fn changing_class_drops_roster() {
        let (mut page, _) = page();
        page.select_class(Some(1));
        page.rows = vec![row(1)];
        page.select_class(Some(1));
        assert_eq!(page.rows().len(), 1);
        page.select_class(Some(2));
        assert!(page.rows().is_empty());
    }

    #[test]
    fn tabs_keep_both_datasets() {
        let (mut page, _) = page();
        page.rows = vec![row(1)];
        page.switch_tab(Tab::Report);
        page.switch_tab(Tab::Mark);
        assert_eq!(page.rows().len(), 1);
        assert_eq!(page.tab(), Tab::Mark);
    }
}

use std::sync::Arc;

use futures_util::future::join;

use crate::client::ApiClient;
use crate::common::Id;
use crate::error::{ApiError, ValidationErrors};
use crate::notify::{Notice, Notifier};
use crate::result::ApiResult;
use crate::routes::class::Class;
use crate::views::FormModel;

use super::model::{Exam, ExamForm, ExamSchedule, Mark, MarksUpload};

/// 某次选择考试对应的科目表请求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleTicket {
    seq: u64,
    exam_id: Id,
}

impl ScheduleTicket {
    pub fn exam_id(&self) -> Id {
        self.exam_id
    }
}

/// 成绩录入弹窗
#[derive(Debug, Clone)]
pub struct MarksSheet {
    pub schedule: ExamSchedule,
    pub marks: Vec<Mark>,
    pub saving: bool,
}

impl MarksSheet {
    pub fn title(&self) -> String {
        format!("Enter Marks: {}", self.schedule.subject_name)
    }
}

/// 新建考试弹窗
#[derive(Debug, Default)]
pub struct ExamModal {
    pub open: bool,
    pub form: ExamForm,
    pub errors: ValidationErrors,
    pub saving: bool,
}

/// 考试页：考试列表 → 科目表 → 成绩录入
pub struct ExamsPage {
    exams: Vec<Exam>,
    classes: Vec<Class>,
    loading: bool,
    selected: Option<Exam>,
    schedules: Vec<ExamSchedule>,
    issued: u64,
    marks: Option<MarksSheet>,
    exam_modal: ExamModal,
    notifier: Arc<dyn Notifier>,
}

impl ExamsPage {
    pub const NO_EXAMS: &'static str = "No exams yet";
    pub const NO_SCHEDULE: &'static str = "Select an exam to view its schedule";

    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            exams: Vec::new(),
            classes: Vec::new(),
            loading: false,
            selected: None,
            schedules: Vec::new(),
            issued: 0,
            marks: None,
            exam_modal: ExamModal::default(),
            notifier,
        }
    }

    pub fn exams(&self) -> &[Exam] {
        &self.exams
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn selected(&self) -> Option<&Exam> {
        self.selected.as_ref()
    }

    pub fn schedules(&self) -> &[ExamSchedule] {
        &self.schedules
    }

    pub fn marks(&self) -> Option<&MarksSheet> {
        self.marks.as_ref()
    }

    pub fn exam_modal(&self) -> &ExamModal {
        &self.exam_modal
    }

    /// 科目表里的班级名，找不到时显示 id
    pub fn class_name(&self, class_id: Id) -> String {
        self.classes
            .iter()
            .find(|c| c.id == class_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("Class #{}", class_id))
    }

    /// 考试列表和班级列表并行加载
    pub async fn load_exams(&mut self, client: &ApiClient) {
        self.loading = true;
        let (exams, classes) = join(Exam::list(client), Class::list(client)).await;
        self.loading = false;

        match exams {
            Ok(exams) => self.exams = exams,
            Err(e) => {
                tracing::warn!("Failed to load exams: {}", e);
                self.exams.clear();
                self.notifier.notify(Notice::from_error(&e));
            }
        }
        match classes {
            Ok(classes) => self.classes = classes,
            Err(e) => tracing::warn!("Failed to load classes: {}", e),
        }
    }

    /// 选中考试并清空旧科目表，返回本次请求的凭据
    pub fn begin_select(&mut self, exam_id: Id) -> Option<ScheduleTicket> {
        let exam = self.exams.iter().find(|e| e.id == exam_id)?.clone();
        self.selected = Some(exam);
        self.schedules.clear();
        self.issued += 1;
        Some(ScheduleTicket {
            seq: self.issued,
            exam_id,
        })
    }

    /// 之前选中的考试的响应晚到时丢弃
    pub fn complete_select(
        &mut self,
        ticket: ScheduleTicket,
        result: ApiResult<Vec<ExamSchedule>>,
    ) -> bool {
        if ticket.seq != self.issued {
            tracing::debug!(
                "Dropping stale schedule for exam {} (#{} < #{})",
                ticket.exam_id,
                ticket.seq,
                self.issued
            );
            return false;
        }
        match result {
            Ok(schedules) => self.schedules = schedules,
            Err(e) => {
                tracing::warn!("Failed to load schedule for exam {}: {}", ticket.exam_id, e);
                self.schedules.clear();
                self.notifier.notify(Notice::from_error(&e));
            }
        }
        true
    }

    pub async fn select_exam(&mut self, client: &ApiClient, exam_id: Id) -> bool {
        let Some(ticket) = self.begin_select(exam_id) else {
            return false;
        };
        let result = ExamSchedule::for_exam(client, exam_id).await;
        self.complete_select(ticket, result)
    }

    /// 拉取已有成绩后打开弹窗，拉取失败时以空表打开
    pub async fn open_marks(&mut self, client: &ApiClient, schedule_id: Id) -> bool {
        let Some(schedule) = self.schedules.iter().find(|s| s.id == schedule_id).cloned() else {
            return false;
        };
        let marks = match Mark::for_schedule(client, schedule_id).await {
            Ok(marks) => marks,
            Err(e) => {
                tracing::warn!("Failed to load marks for schedule {}: {}", schedule_id, e);
                self.notifier.notify(Notice::from_error(&e));
                Vec::new()
            }
        };
        self.marks = Some(MarksSheet {
            schedule,
            marks,
            saving: false,
        });
        true
    }

    /// 超出 [0, max_marks] 的分数直接拒绝，不做截断
    pub fn set_marks(&mut self, student_id: Id, value: f64) -> ApiResult<()> {
        let Some(sheet) = self.marks.as_mut() else {
            return Err(ApiError::invalid("exam_schedule_id", "No schedule selected"));
        };
        if !sheet.schedule.accepts(value) {
            return Err(ApiError::invalid(
                "marks_obtained",
                format!("Must be between 0 and {}", sheet.schedule.max_marks),
            ));
        }
        let Some(mark) = sheet.marks.iter_mut().find(|m| m.student_id == student_id) else {
            return Err(ApiError::invalid("student_id", "Student not in this schedule"));
        };
        mark.marks_obtained = Some(value);
        Ok(())
    }

    pub fn close_marks(&mut self) {
        self.marks = None;
    }

    pub async fn submit_marks(&mut self, client: &ApiClient) -> ApiResult<()> {
        let Some(sheet) = self.marks.as_mut() else {
            return Err(ApiError::invalid("exam_schedule_id", "No schedule selected"));
        };
        let upload = MarksUpload::from_marks(sheet.schedule.id, &sheet.marks);

        sheet.saving = true;
        let result = upload.send(client).await;
        sheet.saving = false;

        match result {
            Ok(_) => {
                tracing::info!(
                    "Uploaded {} marks for schedule {}",
                    upload.records.len(),
                    upload.exam_schedule_id
                );
                self.notifier.notify(Notice::success("Marks saved"));
                self.marks = None;
                Ok(())
            }
            Err(e) => {
                self.notifier.notify(Notice::from_error(&e));
                Err(e)
            }
        }
    }

    pub fn open_exam_form(&mut self) {
        self.exam_modal = ExamModal {
            open: true,
            ..ExamModal::default()
        };
    }

    pub fn exam_form_mut(&mut self) -> &mut ExamForm {
        &mut self.exam_modal.form
    }

    pub fn close_exam_form(&mut self) {
        self.exam_modal.open = false;
        self.exam_modal.saving = false;
    }

    /// 校验不通过时不发请求；成功后关闭弹窗并重新拉取考试列表
    pub async fn submit_exam(&mut self, client: &ApiClient) -> ApiResult<Exam> {
        let errors = self.exam_modal.form.validate();
        if !errors.is_empty() {
            self.exam_modal.errors = errors.clone();
            return Err(ApiError::Validation(errors));
        }
        self.exam_modal.errors = ValidationErrors::default();

        self.exam_modal.saving = true;
        let result = self.exam_modal.form.create(client).await;
        self.exam_modal.saving = false;

        match result {
            Ok(exam) => {
                self.notifier.notify(Notice::success("Exam created"));
                self.close_exam_form();
                self.load_exams(client).await;
                Ok(exam)
            }
            Err(e) => {
                self.notifier.notify(Notice::from_error(&e));
                Err(e)
            }
        }
    }
}

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::routes::auth::UserRole;

/// 页面跳转的副作用出口
pub trait Navigator: Send + Sync {
    fn redirect_to_login(&self);
}

/// 只写日志的跳转实现，命令行程序使用
#[derive(Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn redirect_to_login(&self) {
        tracing::warn!("Session ended, login required");
    }
}

/// 记录跳转次数
#[derive(Debug, Default)]
pub struct NavigationLog {
    login_redirects: AtomicUsize,
}

impl NavigationLog {
    pub fn login_redirects(&self) -> usize {
        self.login_redirects.load(Ordering::SeqCst)
    }
}

impl Navigator for NavigationLog {
    fn redirect_to_login(&self) {
        self.login_redirects.fetch_add(1, Ordering::SeqCst);
    }
}

/// 侧边栏中的功能入口
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Dashboard,
    Students,
    Teachers,
    Attendance,
    Fees,
    Exams,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Dashboard,
        Section::Students,
        Section::Teachers,
        Section::Attendance,
        Section::Fees,
        Section::Exams,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Students => "Students",
            Section::Teachers => "Teachers",
            Section::Attendance => "Attendance",
            Section::Fees => "Fees",
            Section::Exams => "Exams",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Section::Dashboard => "/dashboard",
            Section::Students => "/students",
            Section::Teachers => "/teachers",
            Section::Attendance => "/attendance",
            Section::Fees => "/fees",
            Section::Exams => "/exams",
        }
    }

    /// 可访问该入口的角色，None 表示所有登录用户
    fn roles(&self) -> Option<&'static [UserRole]> {
        use UserRole::*;
        match self {
            Section::Dashboard => None,
            Section::Students | Section::Attendance | Section::Exams => {
                Some(&[SchoolAdmin, Principal, Teacher])
            }
            Section::Teachers => Some(&[SchoolAdmin, Principal]),
            Section::Fees => Some(&[SchoolAdmin, Accountant]),
        }
    }
}

/// 某个角色能看到的全部入口，会话建立时算一次
pub fn allowed_sections(role: UserRole) -> BTreeSet<Section> {
    Section::ALL
        .into_iter()
        .filter(|section| section.roles().is_none_or(|roles| roles.contains(&role)))
        .collect()
}

use crate::routes::attendance::AttendanceStatus;
use crate::routes::fees::InvoiceStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeVariant {
    Success,
    Warning,
    Danger,
    Info,
    Neutral,
}

pub fn attendance_badge(status: AttendanceStatus) -> BadgeVariant {
    match status {
        AttendanceStatus::Present => BadgeVariant::Success,
        AttendanceStatus::Absent => BadgeVariant::Danger,
        AttendanceStatus::Late => BadgeVariant::Warning,
        AttendanceStatus::HalfDay => BadgeVariant::Info,
    }
}

pub fn fee_status_badge(status: InvoiceStatus) -> BadgeVariant {
    match status {
        InvoiceStatus::Paid => BadgeVariant::Success,
        InvoiceStatus::Pending => BadgeVariant::Warning,
        InvoiceStatus::Partial => BadgeVariant::Info,
        InvoiceStatus::Overdue => BadgeVariant::Danger,
    }
}

/// Active / Inactive
pub fn active_badge(is_active: bool) -> (BadgeVariant, &'static str) {
    if is_active {
        (BadgeVariant::Success, "Active")
    } else {
        (BadgeVariant::Neutral, "Inactive")
    }
}

pub fn pass_badge(is_pass: bool) -> BadgeVariant {
    if is_pass {
        BadgeVariant::Success
    } else {
        BadgeVariant::Danger
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_colours() {
        assert_eq!(attendance_badge(AttendanceStatus::Late), BadgeVariant::Warning);
        assert_eq!(attendance_badge(AttendanceStatus::HalfDay), BadgeVariant::Info);
        assert_eq!(fee_status_badge(InvoiceStatus::Overdue), BadgeVariant::Danger);
        assert_eq!(fee_status_badge(InvoiceStatus::Partial), BadgeVariant::Info);
    }

    #[test]
    fn flags() {
        assert_eq!(active_badge(false), (BadgeVariant::Neutral, "Inactive"));
        assert_eq!(pass_badge(true), BadgeVariant::Success);
        assert_eq!(pass_badge(false), BadgeVariant::Danger);
    }
}
